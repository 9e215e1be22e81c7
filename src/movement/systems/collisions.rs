//! Movement domain: contact sampling for ground and walls.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::core::now_ms;
use crate::movement::{
    ContactFlags, GameLayer, MovementInput, Player, SampledWall, WallContactMemory, WallDirection,
};

/// Reach of the contact probes beyond the collider edge.
const PROBE_DISTANCE: f32 = 4.0;

/// Collapse this frame's and last frame's wall flags into one direction.
///
/// Touching both sides is resolved by the input axis, then by the sign of
/// the horizontal velocity (zero counts as left).
pub fn sample_wall_direction(
    contacts: &ContactFlags,
    move_axis: f32,
    velocity_x: f32,
) -> WallDirection {
    let left = contacts.touching_left || contacts.was_touching_left;
    let right = contacts.touching_right || contacts.was_touching_right;

    match (left, right) {
        (true, false) => WallDirection::Left,
        (false, true) => WallDirection::Right,
        (true, true) => {
            if move_axis < 0.0 {
                WallDirection::Left
            } else if move_axis > 0.0 {
                WallDirection::Right
            } else if velocity_x <= 0.0 {
                WallDirection::Left
            } else {
                WallDirection::Right
            }
        }
        (false, false) => WallDirection::None,
    }
}

pub(crate) fn detect_contacts(
    spatial_query: SpatialQuery,
    mut query: Query<(&Transform, &Collider, &mut ContactFlags), With<Player>>,
) {
    // Floors and the tops of walls both count as ground; only walls count as sides
    let ground_filter = SpatialQueryFilter::from_mask([GameLayer::Ground, GameLayer::Wall]);
    let wall_filter = SpatialQueryFilter::from_mask(GameLayer::Wall);

    for (transform, collider, mut contacts) in &mut query {
        let half_extents = match collider.shape_scaled().as_cuboid() {
            Some(c) => Vec2::new(c.half_extents.x, c.half_extents.y),
            None => Vec2::new(14.0, 28.0),
        };

        let origin = transform.translation.truncate();
        let feet = origin - Vec2::new(0.0, half_extents.y);

        let blocked_down = spatial_query
            .cast_ray(feet, Dir2::NEG_Y, PROBE_DISTANCE, true, &ground_filter)
            .is_some();

        let side_reach = half_extents.x + PROBE_DISTANCE;
        let touching_left = spatial_query
            .cast_ray(origin, Dir2::NEG_X, side_reach, true, &wall_filter)
            .is_some();
        let touching_right = spatial_query
            .cast_ray(origin, Dir2::X, side_reach, true, &wall_filter)
            .is_some();

        let was_grounded = contacts.blocked_down;
        contacts.advance(blocked_down, touching_left, touching_right);

        if blocked_down != was_grounded {
            debug!("Ground contact changed: blocked_down={}", blocked_down);
        }
    }
}

/// Resolve the wall direction for this frame and refresh the jump-eligibility
/// memory with it.
pub(crate) fn sample_walls(
    time: Res<Time>,
    input: Res<MovementInput>,
    mut query: Query<
        (
            &ContactFlags,
            &LinearVelocity,
            &mut SampledWall,
            &mut WallContactMemory,
        ),
        With<Player>,
    >,
) {
    let now = now_ms(&time);

    for (contacts, velocity, mut sampled, mut memory) in &mut query {
        let direction = sample_wall_direction(contacts, input.axis_x, velocity.x);
        sampled.0 = direction;

        if !direction.is_none() {
            memory.record_jump_contact(now, direction);
        }
    }
}
