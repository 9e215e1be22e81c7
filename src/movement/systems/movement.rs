//! Movement domain: the per-frame movement state machine.
//!
//! Each frame runs, in order: state update, horizontal movement, jump, and
//! wall-slide clamp. The jump step must see the freshly updated state, and
//! the clamp must come after the jump so a new wall-jump keeps its launch
//! velocity.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::core::now_ms;
use crate::movement::{
    ContactFlags, HorizontalDrive, MovementInput, MovementState, MovementTuning, Player,
    SampledWall, WallContactMemory, WallDirection,
};

/// Ground beats walls; a wall without ground means sliding.
pub fn next_movement_state(grounded: bool, wall: WallDirection) -> MovementState {
    if grounded {
        MovementState::Grounded
    } else if !wall.is_none() {
        MovementState::WallSlide
    } else {
        MovementState::Airborne
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalCommand {
    pub acceleration_x: f32,
    /// Velocity override, used to cancel motion into a wall.
    pub velocity_x: Option<f32>,
}

pub fn horizontal_command(
    state: MovementState,
    move_axis: f32,
    wall: WallDirection,
    velocity_x: f32,
    tuning: &MovementTuning,
) -> HorizontalCommand {
    match state {
        MovementState::WallSlide => {
            // Only pushing away from the wall accelerates
            if !wall.is_none() && move_axis == -wall.sign() {
                return HorizontalCommand {
                    acceleration_x: move_axis * tuning.accel_x,
                    velocity_x: None,
                };
            }

            let into_wall = (wall == WallDirection::Left && velocity_x < 0.0)
                || (wall == WallDirection::Right && velocity_x > 0.0);

            HorizontalCommand {
                acceleration_x: 0.0,
                velocity_x: into_wall.then_some(0.0),
            }
        }
        MovementState::Grounded | MovementState::Airborne => HorizontalCommand {
            acceleration_x: if move_axis == 0.0 {
                0.0
            } else {
                move_axis * tuning.accel_x
            },
            velocity_x: None,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpKind {
    Ground,
    /// Wall-jump away from the given wall.
    Wall(WallDirection),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpCommand {
    pub kind: JumpKind,
    pub velocity_x: Option<f32>,
    pub velocity_y: f32,
}

/// Decide what a jump press does. `None` means the press is ignored.
///
/// Off the ground, a wall-jump fires if a wall is touched now, or if the
/// last wall contact is within the coyote window.
pub fn jump_command(
    state: MovementState,
    wall: WallDirection,
    memory: &WallContactMemory,
    now_ms: f64,
    tuning: &MovementTuning,
) -> Option<JumpCommand> {
    if state == MovementState::Grounded {
        return Some(JumpCommand {
            kind: JumpKind::Ground,
            velocity_x: None,
            velocity_y: tuning.jump_velocity,
        });
    }

    let jump_wall = if !wall.is_none() {
        wall
    } else {
        memory
            .jump_contact_within(now_ms, tuning.wall_coyote_time_ms)
            .unwrap_or_default()
    };

    if jump_wall.is_none() {
        return None;
    }

    Some(JumpCommand {
        kind: JumpKind::Wall(jump_wall),
        velocity_x: Some(-jump_wall.sign() * tuning.wall_jump_velocity_x),
        velocity_y: tuning.jump_velocity,
    })
}

/// Cap the fall speed while sliding. Returns the clamped vertical velocity
/// when it changes.
pub fn clamp_wall_slide(state: MovementState, velocity_y: f32, max_fall_speed: f32) -> Option<f32> {
    if state != MovementState::WallSlide {
        return None;
    }

    (velocity_y < -max_fall_speed).then_some(-max_fall_speed)
}

pub(crate) fn update_movement_state(
    mut query: Query<(&ContactFlags, &SampledWall, &mut MovementState), With<Player>>,
) {
    for (contacts, wall, mut state) in &mut query {
        let next = next_movement_state(contacts.blocked_down, wall.0);
        if *state != next {
            debug!("Movement state: {:?} -> {:?}", *state, next);
            *state = next;
        }
    }
}

pub(crate) fn apply_horizontal_movement(
    input: Res<MovementInput>,
    tuning: Res<MovementTuning>,
    mut query: Query<
        (
            &MovementState,
            &SampledWall,
            &mut HorizontalDrive,
            &mut LinearVelocity,
        ),
        With<Player>,
    >,
) {
    for (state, wall, mut drive, mut velocity) in &mut query {
        let command = horizontal_command(*state, input.axis_x, wall.0, velocity.x, &tuning);

        drive.acceleration_x = command.acceleration_x;
        if let Some(vx) = command.velocity_x {
            velocity.x = vx;
        }
    }
}

pub(crate) fn apply_jump(
    time: Res<Time>,
    input: Res<MovementInput>,
    tuning: Res<MovementTuning>,
    mut query: Query<
        (
            &mut MovementState,
            &SampledWall,
            &WallContactMemory,
            &mut LinearVelocity,
        ),
        With<Player>,
    >,
) {
    if !input.jump_just_pressed {
        return;
    }

    let now = now_ms(&time);

    for (mut state, wall, memory, mut velocity) in &mut query {
        let Some(jump) = jump_command(*state, wall.0, memory, now, &tuning) else {
            continue;
        };

        if let Some(vx) = jump.velocity_x {
            velocity.x = vx;
        }
        velocity.y = jump.velocity_y;
        *state = MovementState::Airborne;

        debug!("Jump: kind={:?}, velocity={:?}", jump.kind, velocity.0);
    }
}

pub(crate) fn apply_wall_slide(
    tuning: Res<MovementTuning>,
    mut query: Query<(&MovementState, &mut LinearVelocity), With<Player>>,
) {
    for (state, mut velocity) in &mut query {
        if let Some(vy) = clamp_wall_slide(*state, velocity.y, tuning.wall_slide_max_fall_speed) {
            velocity.y = vy;
        }
    }
}
