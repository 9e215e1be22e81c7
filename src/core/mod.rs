//! Core domain: app state, frame ordering, camera, and pausing.

mod resources;
mod state;
mod systems;

pub use resources::{FrameSet, GameplayPaused, now_ms};
pub use state::GameState;

use bevy::prelude::*;

use crate::core::systems::{
    follow_player, setup_camera, sync_virtual_time, track_window_focus, transition_to_playing,
};

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<GameplayPaused>()
            .configure_sets(
                Update,
                (
                    FrameSet::Input,
                    FrameSet::Run,
                    FrameSet::Movement,
                    FrameSet::Visuals,
                    FrameSet::Kinematics,
                    FrameSet::Hud,
                )
                    .chain(),
            )
            .add_systems(Startup, (setup_camera, transition_to_playing))
            .add_systems(
                Update,
                (track_window_focus, sync_virtual_time)
                    .chain()
                    .before(FrameSet::Input),
            )
            .add_systems(PostUpdate, follow_player);
    }
}
