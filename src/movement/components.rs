//! Movement domain: components and physics layers for locomotion.

use avian2d::prelude::*;
use bevy::prelude::*;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Ground surfaces (floors, platforms)
    Ground,
    /// Wall surfaces
    Wall,
    /// Player character
    Player,
    /// Sensors (finish region) - should not block movement
    Sensor,
}

#[derive(Component, Debug)]
pub struct Player;

/// Discrete locomotion state. Always derived from the grounded flag and the
/// sampled wall direction, never set from input handling.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementState {
    Grounded,
    #[default]
    Airborne,
    WallSlide,
}

/// Which side a wall is on, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallDirection {
    Left,
    #[default]
    None,
    Right,
}

impl WallDirection {
    /// -1 for left, 0 for none, +1 for right.
    pub fn sign(self) -> f32 {
        match self {
            WallDirection::Left => -1.0,
            WallDirection::None => 0.0,
            WallDirection::Right => 1.0,
        }
    }

    pub fn is_none(self) -> bool {
        self == WallDirection::None
    }
}

/// Blocked flags from this frame and the wall flags from the previous frame.
/// The previous-frame flags bridge one-frame contact loss at corners.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactFlags {
    pub blocked_down: bool,
    pub touching_left: bool,
    pub touching_right: bool,
    pub was_touching_left: bool,
    pub was_touching_right: bool,
}

impl ContactFlags {
    /// Record a new frame of contacts, shifting the current wall flags into
    /// the previous-frame slots.
    pub fn advance(&mut self, blocked_down: bool, touching_left: bool, touching_right: bool) {
        self.was_touching_left = self.touching_left;
        self.was_touching_right = self.touching_right;
        self.blocked_down = blocked_down;
        self.touching_left = touching_left;
        self.touching_right = touching_right;
    }

    /// Raw wall contact this frame, ignoring the previous frame.
    pub fn touching_wall_now(&self) -> bool {
        self.touching_left || self.touching_right
    }
}

/// Wall direction produced by the contact sampler this frame.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampledWall(pub WallDirection);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallTouch {
    pub at_ms: f64,
    pub direction: WallDirection,
}

/// Two independent records of the last wall contact. `jump` gates coyote
/// wall-jumps; `visual` keeps the wall-hold animation alive. They are updated
/// from different signals and must not be merged.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct WallContactMemory {
    pub jump: Option<WallTouch>,
    pub visual: Option<WallTouch>,
}

impl WallContactMemory {
    pub fn record_jump_contact(&mut self, at_ms: f64, direction: WallDirection) {
        record_forward(&mut self.jump, at_ms, direction);
    }

    pub fn record_visual_touch(&mut self, at_ms: f64, direction: WallDirection) {
        record_forward(&mut self.visual, at_ms, direction);
    }

    /// Direction of the last jump-eligible contact if it is within `window_ms`.
    pub fn jump_contact_within(&self, now_ms: f64, window_ms: f64) -> Option<WallDirection> {
        self.jump
            .filter(|touch| now_ms - touch.at_ms <= window_ms)
            .map(|touch| touch.direction)
    }

    /// Last visual touch if it is within `window_ms`.
    pub fn visual_touch_within(&self, now_ms: f64, window_ms: f64) -> Option<WallTouch> {
        self.visual
            .filter(|touch| now_ms - touch.at_ms <= window_ms)
    }
}

fn record_forward(slot: &mut Option<WallTouch>, at_ms: f64, direction: WallDirection) {
    if direction.is_none() {
        return;
    }
    if slot.is_some_and(|touch| touch.at_ms > at_ms) {
        return;
    }
    *slot = Some(WallTouch { at_ms, direction });
}

/// Horizontal acceleration commanded this frame (px/s^2).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct HorizontalDrive {
    pub acceleration_x: f32,
}

/// Marks a body whose motion is locked (countdown, finish, death).
#[derive(Component, Debug, Default)]
pub struct Frozen;

/// Marker for ground colliders
#[derive(Component, Debug)]
pub struct Ground;

/// Marker for wall colliders
#[derive(Component, Debug)]
pub struct Wall;
