//! Run domain: the Countdown -> Running -> Finished state machine.

use bevy::prelude::*;
use std::time::Duration;

use crate::content::RunSettings;
use crate::run::clock::RunClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Countdown,
    Running,
    Finished,
}

/// What a countdown tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// Show the remaining count.
    Show(u32),
    /// The countdown ended and the run started.
    Go,
}

/// Owns the run lifecycle. A restart replaces the whole resource.
#[derive(Resource, Debug)]
pub struct RunTimer {
    state: RunState,
    clock: RunClock,
    countdown: Timer,
    remaining: u32,
}

impl Default for RunTimer {
    fn default() -> Self {
        Self::new(&RunSettings::default())
    }
}

impl RunTimer {
    pub fn new(settings: &RunSettings) -> Self {
        Self {
            state: RunState::Countdown,
            clock: RunClock::default(),
            countdown: Timer::from_seconds(settings.countdown_interval_secs, TimerMode::Repeating),
            remaining: settings.countdown_ticks,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn clock(&self) -> &RunClock {
        &self.clock
    }

    /// Count still on screen during the countdown.
    pub fn countdown_remaining(&self) -> u32 {
        self.remaining
    }

    /// Advance the countdown. Each elapsed interval decrements the count;
    /// the final one starts the run at `now_ms`.
    pub fn tick_countdown(&mut self, delta: Duration, now_ms: f64) -> Vec<CountdownStep> {
        let mut steps = Vec::new();
        if self.state != RunState::Countdown {
            return steps;
        }

        if self.remaining == 0 {
            self.begin_run(now_ms);
            steps.push(CountdownStep::Go);
            return steps;
        }

        self.countdown.tick(delta);
        for _ in 0..self.countdown.times_finished_this_tick() {
            self.remaining -= 1;
            if self.remaining > 0 {
                steps.push(CountdownStep::Show(self.remaining));
            } else {
                self.begin_run(now_ms);
                steps.push(CountdownStep::Go);
                break;
            }
        }
        steps
    }

    fn begin_run(&mut self, now_ms: f64) {
        self.clock.start(now_ms);
        self.state = RunState::Running;
    }

    /// Elapsed run time, only while running.
    pub fn elapsed_ms(&self, now_ms: f64) -> Option<f64> {
        match self.state {
            RunState::Running => self.clock.elapsed_ms(now_ms),
            _ => None,
        }
    }

    /// Finish the run. Accepted only while running with a valid start;
    /// returns the final time on the one accepted call.
    pub fn finish(&mut self, now_ms: f64) -> Option<f64> {
        if self.state != RunState::Running || !self.clock.has_valid_start() {
            return None;
        }

        let final_ms = self.clock.freeze(now_ms)?;
        self.state = RunState::Finished;
        Some(final_ms)
    }
}
