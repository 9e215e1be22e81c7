//! Run domain: the run timer state machine, the level, and finish, death
//! and restart handling.

mod clock;
mod events;
mod level;
mod systems;
mod timer;
#[cfg(test)]
mod tests;

pub use clock::{ClockParseError, RunClock, format_time_ms, parse_time_ms};
pub use events::{CountdownTick, LevelRestarted, PlayerDied, RunFinished, RunStarted};
pub use level::{FinishRegion, LevelBounds};
pub use systems::{DeathState, movement_active};
pub use timer::{CountdownStep, RunState, RunTimer};

use bevy::prelude::*;

use crate::core::{FrameSet, GameState};
use crate::run::level::spawn_level;
use crate::run::systems::{
    detect_fall_death, detect_finish, handle_restart, start_run, tick_countdown,
};

pub struct RunPlugin;

impl Plugin for RunPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RunTimer>()
            .init_resource::<DeathState>()
            .init_resource::<LevelBounds>()
            .add_message::<CountdownTick>()
            .add_message::<RunStarted>()
            .add_message::<RunFinished>()
            .add_message::<PlayerDied>()
            .add_message::<LevelRestarted>()
            .add_systems(OnEnter(GameState::Playing), (spawn_level, start_run).chain())
            .add_systems(
                Update,
                (handle_restart, tick_countdown, detect_finish, detect_fall_death)
                    .chain()
                    .in_set(FrameSet::Run)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
