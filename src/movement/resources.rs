//! Movement domain: tuning and input resources.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Player movement constants for the active difficulty profile.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MovementTuning {
    pub accel_x: f32,
    pub jump_velocity: f32,
    pub max_velocity_x: f32,
    pub max_velocity_y: f32,
    /// Deceleration applied while no horizontal acceleration is commanded.
    pub drag_x: f32,
    pub gravity: f32,
    pub wall_slide_max_fall_speed: f32,
    pub wall_jump_velocity_x: f32,
    /// Grace window for wall-jumps after losing wall contact.
    pub wall_coyote_time_ms: f64,
    /// Grace window for the wall-hold animation after losing wall contact.
    pub wallhold_visual_coyote_ms: f64,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            accel_x: 1400.0,
            jump_velocity: 800.0,
            max_velocity_x: 720.0,
            max_velocity_y: 700.0,
            drag_x: 900.0 * 4.0,
            gravity: 1800.0,
            wall_slide_max_fall_speed: 320.0,
            wall_jump_velocity_x: 480.0,
            wall_coyote_time_ms: 120.0,
            wallhold_visual_coyote_ms: 120.0,
        }
    }
}

impl MovementTuning {
    /// Calculate the maximum height reachable from a single ground jump.
    /// Uses physics formula: h = v^2 / (2g)
    pub fn single_jump_height(&self) -> f32 {
        self.jump_velocity * self.jump_velocity / (2.0 * self.gravity)
    }
}

#[derive(Resource, Debug, Default)]
pub struct MovementInput {
    /// Horizontal axis: -1, 0 or 1. Opposing keys cancel out.
    pub axis_x: f32,
    /// Rising edge of any jump key this frame.
    pub jump_just_pressed: bool,
}
