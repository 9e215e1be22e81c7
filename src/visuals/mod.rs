//! Visuals domain: facing and animation selection for the player.

mod animation;
mod selector;

pub use animation::{AnimationChanged, AnimationController, AnimationKey};
pub use selector::{PlayerFacing, VisualSample, select_animation, select_facing};

use bevy::prelude::*;

use crate::core::{FrameSet, GameState};
use crate::run::movement_active;
use crate::visuals::animation::update_animation_frames;
use crate::visuals::selector::update_player_visuals;

pub struct VisualsPlugin;

impl Plugin for VisualsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<AnimationChanged>().add_systems(
            Update,
            (
                update_player_visuals.run_if(movement_active),
                update_animation_frames,
            )
                .chain()
                .in_set(FrameSet::Visuals)
                .run_if(in_state(GameState::Playing)),
        );
    }
}
