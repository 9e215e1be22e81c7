//! Run domain: unit tests for the run timer and clock formatting.

use std::time::Duration;

use bevy::prelude::Vec2;

use super::{
    CountdownStep, LevelBounds, RunClock, RunState, RunTimer, format_time_ms, parse_time_ms,
};
use crate::content::RunSettings;

const SECOND: Duration = Duration::from_millis(1000);

/// Drive a timer through its countdown, starting the run at `start_ms`.
fn running_timer(start_ms: f64) -> RunTimer {
    let mut timer = RunTimer::default();
    timer.tick_countdown(SECOND, start_ms - 2000.0);
    timer.tick_countdown(SECOND, start_ms - 1000.0);
    timer.tick_countdown(SECOND, start_ms);
    timer
}

// -----------------------------------------------------------------------------
// Countdown
// -----------------------------------------------------------------------------

#[test]
fn test_countdown_runs_three_ticks_then_starts() {
    let mut timer = RunTimer::default();
    assert_eq!(timer.state(), RunState::Countdown);
    assert_eq!(timer.countdown_remaining(), 3);

    assert_eq!(timer.tick_countdown(SECOND, 1000.0), vec![CountdownStep::Show(2)]);
    assert_eq!(timer.tick_countdown(SECOND, 2000.0), vec![CountdownStep::Show(1)]);
    assert_eq!(timer.state(), RunState::Countdown);
    assert_eq!(timer.elapsed_ms(2000.0), None);

    assert_eq!(timer.tick_countdown(SECOND, 3000.0), vec![CountdownStep::Go]);
    assert_eq!(timer.state(), RunState::Running);
    assert_eq!(timer.elapsed_ms(3000.0), Some(0.0));
}

#[test]
fn test_partial_intervals_accumulate() {
    let mut timer = RunTimer::default();
    assert!(timer.tick_countdown(Duration::from_millis(600), 600.0).is_empty());
    assert_eq!(
        timer.tick_countdown(Duration::from_millis(600), 1200.0),
        vec![CountdownStep::Show(2)]
    );
}

#[test]
fn test_long_frame_finishes_countdown_once() {
    let mut timer = RunTimer::default();
    let steps = timer.tick_countdown(Duration::from_millis(5000), 5000.0);
    assert_eq!(
        steps,
        vec![
            CountdownStep::Show(2),
            CountdownStep::Show(1),
            CountdownStep::Go
        ]
    );
    assert!(timer.tick_countdown(SECOND, 6000.0).is_empty());
    assert_eq!(timer.clock().start_ms(), Some(5000.0));
}

#[test]
fn test_configured_countdown_length() {
    let settings = RunSettings {
        countdown_ticks: 1,
        ..Default::default()
    };
    let mut timer = RunTimer::new(&settings);
    assert_eq!(timer.tick_countdown(SECOND, 1000.0), vec![CountdownStep::Go]);
    assert_eq!(timer.state(), RunState::Running);
}

// -----------------------------------------------------------------------------
// Finishing
// -----------------------------------------------------------------------------

#[test]
fn test_finish_records_elapsed_since_start() {
    let mut timer = running_timer(10_000.0);
    assert_eq!(timer.elapsed_ms(12_500.0), Some(2500.0));

    assert_eq!(timer.finish(92_417.0), Some(82_417.0));
    assert_eq!(timer.state(), RunState::Finished);
    assert_eq!(timer.clock().final_ms(), Some(82_417.0));
    assert_eq!(timer.elapsed_ms(95_000.0), None);
}

#[test]
fn test_second_finish_is_ignored() {
    let mut timer = running_timer(0.0);
    assert_eq!(timer.finish(4000.0), Some(4000.0));
    assert_eq!(timer.finish(9000.0), None);
    assert_eq!(timer.clock().final_ms(), Some(4000.0));
}

#[test]
fn test_finish_during_countdown_is_ignored() {
    let mut timer = RunTimer::default();
    timer.tick_countdown(SECOND, 1000.0);
    assert_eq!(timer.finish(1500.0), None);
    assert_eq!(timer.state(), RunState::Countdown);
}

#[test]
fn test_state_never_moves_backwards() {
    let mut timer = running_timer(0.0);
    timer.finish(100.0);
    assert!(timer.tick_countdown(SECOND * 10, 200.0).is_empty());
    assert_eq!(timer.state(), RunState::Finished);
}

#[test]
fn test_clock_start_is_set_once() {
    let mut clock = RunClock::default();
    assert!(!clock.has_valid_start());
    assert!(clock.start(50.0));
    assert!(!clock.start(80.0));
    assert_eq!(clock.start_ms(), Some(50.0));
    assert_eq!(clock.freeze(150.0), Some(100.0));
    assert_eq!(clock.freeze(250.0), None);
}

#[test]
fn test_clock_without_start_cannot_freeze() {
    let mut clock = RunClock::default();
    assert_eq!(clock.freeze(100.0), None);
    assert_eq!(clock.final_ms(), None);
}

// -----------------------------------------------------------------------------
// Formatting
// -----------------------------------------------------------------------------

#[test]
fn test_format_time() {
    assert_eq!(format_time_ms(125_034.0), "2:05.034");
    assert_eq!(format_time_ms(0.0), "0:00.000");
    assert_eq!(format_time_ms(82_417.9), "1:22.417");
    assert_eq!(format_time_ms(-250.0), "0:00.000");
    assert_eq!(format_time_ms(f64::NAN), "0:00.000");
    assert_eq!(format_time_ms(3_600_000.0), "60:00.000");
}

#[test]
fn test_parse_inverts_format() {
    for ms in [0_u64, 999, 1000, 59_999, 60_000, 82_417, 125_034, 3_661_001] {
        let text = format_time_ms(ms as f64);
        assert_eq!(parse_time_ms(&text), Ok(ms), "round trip of {}", text);
    }
}

#[test]
fn test_parse_rejects_malformed_times() {
    for bad in ["", "2:05", "205.034", "2:5.034", "2:05.34", "2:60.000", "a:05.034", "-1:05.034"] {
        let err = parse_time_ms(bad).unwrap_err();
        assert_eq!(err.input, bad);
    }
}

// -----------------------------------------------------------------------------
// Level bounds
// -----------------------------------------------------------------------------

#[test]
fn test_death_margin_extends_level_bounds() {
    let settings = RunSettings::default();
    let bounds = LevelBounds::new(settings.tile_size);
    let margin = settings.death_margin();

    assert!(!bounds.is_out_of_bounds(bounds.spawn, margin));
    assert!(!bounds.is_out_of_bounds(Vec2::new(100.0, -margin + 1.0), margin));
    assert!(bounds.is_out_of_bounds(Vec2::new(100.0, -margin - 1.0), margin));
}
