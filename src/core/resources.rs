//! Core domain: shared resources for pausing and frame ordering.

use bevy::prelude::*;
use std::collections::HashSet;

/// Resource tracking if gameplay should be paused.
/// Gameplay is paused if any source is active.
#[derive(Resource, Debug, Default)]
pub struct GameplayPaused {
    pub sources: HashSet<String>,
}

impl GameplayPaused {
    pub fn is_paused(&self) -> bool {
        !self.sources.is_empty()
    }

    pub fn pause(&mut self, source: impl Into<String>) {
        self.sources.insert(source.into());
    }

    pub fn unpause(&mut self, source: impl Into<String>) {
        self.sources.remove(&source.into());
    }
}

/// Per-frame update phases. Configured as a strict chain so that input is
/// sampled before the run timer, and movement commands are issued before
/// the visuals read them and before kinematics integrate them.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Input,
    Run,
    Movement,
    Visuals,
    Kinematics,
    Hud,
}

/// Current virtual time in milliseconds. All run and wall-contact timestamps
/// use this clock, so they stop advancing while the game is paused.
pub fn now_ms(time: &Time) -> f64 {
    time.elapsed_secs_f64() * 1000.0
}
