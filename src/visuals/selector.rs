//! Facing and animation selection from movement state and velocity.

use avian2d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::core::now_ms;
use crate::movement::{
    ContactFlags, MovementInput, MovementTuning, Player, WallContactMemory, WallDirection,
    WallTouch,
};
use crate::visuals::animation::{AnimationChanged, AnimationController, AnimationKey};

/// Horizontal speed below which facing is left alone.
const FACING_DEADBAND: f32 = 5.0;
/// Horizontal speed above which a grounded player counts as running.
const RUN_THRESHOLD: f32 = 10.0;
/// Speed away from a remembered wall that ends the wall-hold pose early.
const WALL_RELEASE_SPEED: f32 = 80.0;

/// Whether the sprite is mirrored to face left.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlayerFacing {
    pub flip_x: bool,
}

/// Input to the animation selector for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualSample {
    pub grounded: bool,
    /// Raw wall contact this frame, without the previous-frame bridge.
    pub touching_wall_now: bool,
    pub velocity: Vec2,
    pub now_ms: f64,
    /// Last raw wall touch.
    pub last_wall_touch: Option<WallTouch>,
}

/// Input direction wins; otherwise velocity beyond the deadband; otherwise
/// keep the previous facing.
pub fn select_facing(previous_flip: bool, move_axis: f32, velocity_x: f32) -> bool {
    if move_axis != 0.0 {
        move_axis < 0.0
    } else if velocity_x < -FACING_DEADBAND {
        true
    } else if velocity_x > FACING_DEADBAND {
        false
    } else {
        previous_flip
    }
}

pub fn select_animation(sample: &VisualSample, wallhold_window_ms: f64) -> AnimationKey {
    if !sample.grounded {
        let remembered_hold = sample.last_wall_touch.is_some_and(|touch| {
            sample.now_ms - touch.at_ms <= wallhold_window_ms
                && sample.velocity.x * touch.direction.sign() > -WALL_RELEASE_SPEED
        });

        if sample.touching_wall_now || remembered_hold {
            return AnimationKey::WallHold;
        }

        return if sample.velocity.y > 0.0 {
            AnimationKey::Jump
        } else {
            AnimationKey::Fall
        };
    }

    if sample.velocity.x.abs() > RUN_THRESHOLD {
        AnimationKey::Run
    } else {
        AnimationKey::Idle
    }
}

/// Raw wall side this frame, left first.
fn raw_wall_side(contacts: &ContactFlags) -> WallDirection {
    if contacts.touching_left {
        WallDirection::Left
    } else if contacts.touching_right {
        WallDirection::Right
    } else {
        WallDirection::None
    }
}

pub(crate) fn update_player_visuals(
    time: Res<Time>,
    input: Res<MovementInput>,
    tuning: Res<MovementTuning>,
    mut query: Query<
        (
            Entity,
            &ContactFlags,
            &LinearVelocity,
            &mut WallContactMemory,
            &mut PlayerFacing,
            &mut AnimationController,
            &mut Sprite,
        ),
        With<Player>,
    >,
    mut changed: MessageWriter<AnimationChanged>,
) {
    let now = now_ms(&time);

    for (entity, contacts, velocity, mut memory, mut facing, mut controller, mut sprite) in
        &mut query
    {
        memory.record_visual_touch(now, raw_wall_side(contacts));

        let flip_x = select_facing(facing.flip_x, input.axis_x, velocity.x);
        facing.flip_x = flip_x;
        sprite.flip_x = flip_x;

        let sample = VisualSample {
            grounded: contacts.blocked_down,
            touching_wall_now: contacts.touching_wall_now(),
            velocity: velocity.0,
            now_ms: now,
            last_wall_touch: memory.visual,
        };
        let key = select_animation(&sample, tuning.wallhold_visual_coyote_ms);

        let from = controller.current();
        if controller.play(key) {
            changed.write(AnimationChanged {
                entity,
                from,
                to: key,
            });
            debug!("Animation: {:?} -> {}", from, key.name());
        }
    }
}
