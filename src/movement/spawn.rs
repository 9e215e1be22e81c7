//! Movement domain: player spawning and motion locking.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{
    ContactFlags, Frozen, GameLayer, HorizontalDrive, MovementState, Player, SampledWall,
    WallContactMemory,
};
use crate::visuals::{AnimationController, PlayerFacing};

pub const PLAYER_SIZE: Vec2 = Vec2::new(28.0, 56.0);

/// Spawn the player at `position`. The player starts frozen; the run timer
/// releases it when the countdown ends.
pub fn spawn_player(commands: &mut Commands, position: Vec2) -> Entity {
    commands
        .spawn((
            // Identity & Movement
            (
                Player,
                MovementState::default(),
                ContactFlags::default(),
                SampledWall::default(),
                WallContactMemory::default(),
                HorizontalDrive::default(),
                Frozen,
            ),
            // Rendering
            (
                Sprite {
                    color: Color::srgb(0.1, 0.1, 0.1),
                    custom_size: Some(PLAYER_SIZE),
                    ..default()
                },
                Transform::from_xyz(position.x, position.y, 1.0),
                AnimationController::default(),
                PlayerFacing::default(),
            ),
            // Physics
            (
                RigidBody::Dynamic,
                RigidBodyDisabled,
                Collider::rectangle(PLAYER_SIZE.x, PLAYER_SIZE.y),
                LockedAxes::ROTATION_LOCKED,
                LinearVelocity::ZERO,
                GravityScale(0.0), // Gravity is integrated with the rest of the tuning
                Friction::new(0.0),
                CollisionEventsEnabled,
                CollisionLayers::new(
                    GameLayer::Player,
                    [GameLayer::Ground, GameLayer::Wall, GameLayer::Sensor],
                ),
            ),
        ))
        .id()
}

/// Stop the body and detach it from the simulation.
pub fn freeze_player(commands: &mut Commands, entity: Entity) {
    commands.entity(entity).insert((
        Frozen,
        RigidBodyDisabled,
        LinearVelocity::ZERO,
        HorizontalDrive::default(),
    ));
}

/// Hand the body back to the simulation with no residual acceleration.
pub fn unfreeze_player(commands: &mut Commands, entity: Entity) {
    commands
        .entity(entity)
        .remove::<(Frozen, RigidBodyDisabled)>()
        .insert(HorizontalDrive::default());
}
