//! Movement domain: velocity integration for acceleration, drag and gravity.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{Frozen, HorizontalDrive, MovementTuning, Player};

/// Advance a velocity by one step.
///
/// Acceleration and drag are exclusive: drag only acts while no horizontal
/// acceleration is commanded, and never pushes past zero. Both axes are then
/// clamped to the tuning's maximum speeds. Non-finite input is reset to rest.
pub fn integrate_velocity(
    velocity: Vec2,
    acceleration_x: f32,
    dt: f32,
    tuning: &MovementTuning,
) -> Vec2 {
    let mut v = Vec2::new(
        if velocity.x.is_finite() { velocity.x } else { 0.0 },
        if velocity.y.is_finite() { velocity.y } else { 0.0 },
    );

    if acceleration_x != 0.0 {
        v.x += acceleration_x * dt;
    } else if tuning.drag_x > 0.0 {
        let drag = tuning.drag_x * dt;
        if v.x - drag > 0.0 {
            v.x -= drag;
        } else if v.x + drag < 0.0 {
            v.x += drag;
        } else {
            v.x = 0.0;
        }
    }

    v.y -= tuning.gravity * dt;

    v.x = v.x.clamp(-tuning.max_velocity_x, tuning.max_velocity_x);
    v.y = v.y.clamp(-tuning.max_velocity_y, tuning.max_velocity_y);
    v
}

pub(crate) fn integrate_kinematics(
    time: Res<Time>,
    tuning: Res<MovementTuning>,
    mut query: Query<(&HorizontalDrive, &mut LinearVelocity), (With<Player>, Without<Frozen>)>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    for (drive, mut velocity) in &mut query {
        velocity.0 = integrate_velocity(velocity.0, drive.acceleration_x, dt, &tuning);
    }
}
