//! Run domain: messages for run lifecycle transitions.

use bevy::ecs::message::Message;

/// Countdown advanced; `remaining` is the number now displayed
#[derive(Debug)]
pub struct CountdownTick {
    pub remaining: u32,
}

impl Message for CountdownTick {}

/// Countdown finished and the clock started
#[derive(Debug)]
pub struct RunStarted {
    pub start_ms: f64,
}

impl Message for RunStarted {}

/// Player reached the finish region
#[derive(Debug)]
pub struct RunFinished {
    pub final_ms: f64,
}

impl Message for RunFinished {}

/// Player fell out of the level
#[derive(Debug)]
pub struct PlayerDied;

impl Message for PlayerDied {}

/// Level was reset to a fresh countdown
#[derive(Debug)]
pub struct LevelRestarted;

impl Message for LevelRestarted {}
