//! Core domain: boot flow, camera, and focus pausing.

use bevy::prelude::*;
use bevy::window::WindowFocused;

use crate::core::resources::GameplayPaused;
use crate::core::state::GameState;
use crate::movement::Player;

const FOCUS_PAUSE_SOURCE: &str = "window_focus";

pub(crate) fn transition_to_playing(mut game_state: ResMut<NextState<GameState>>) {
    game_state.set(GameState::Playing);
}

pub(crate) fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Keep the camera centered on the player.
pub(crate) fn follow_player(
    player_query: Query<&Transform, (With<Player>, Without<Camera2d>)>,
    mut camera_query: Query<&mut Transform, With<Camera2d>>,
) {
    let Ok(player) = player_query.single() else {
        return;
    };

    for mut camera in &mut camera_query {
        camera.translation.x = player.translation.x;
        camera.translation.y = player.translation.y;
    }
}

/// Pause the simulation while the window is unfocused.
pub(crate) fn track_window_focus(
    mut focus_events: MessageReader<WindowFocused>,
    mut paused: ResMut<GameplayPaused>,
) {
    for event in focus_events.read() {
        if event.focused {
            paused.unpause(FOCUS_PAUSE_SOURCE);
        } else {
            paused.pause(FOCUS_PAUSE_SOURCE);
        }
    }
}

/// Mirror pause sources onto the virtual clock so timers and the run clock
/// freeze together.
pub(crate) fn sync_virtual_time(paused: Res<GameplayPaused>, mut time: ResMut<Time<Virtual>>) {
    if !paused.is_changed() {
        return;
    }

    if paused.is_paused() && !time.is_paused() {
        info!("Gameplay paused: {:?}", paused.sources);
        time.pause();
    } else if !paused.is_paused() && time.is_paused() {
        info!("Gameplay resumed");
        time.unpause();
    }
}
