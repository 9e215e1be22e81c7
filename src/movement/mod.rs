//! Movement domain: contact sampling, the movement state machine, and
//! velocity integration for the player.

mod components;
mod resources;
mod spawn;
mod systems;

pub use components::{
    ContactFlags, Frozen, GameLayer, Ground, HorizontalDrive, MovementState, Player, SampledWall,
    Wall, WallContactMemory, WallDirection, WallTouch,
};
pub use resources::{MovementInput, MovementTuning};
pub use spawn::{PLAYER_SIZE, freeze_player, spawn_player, unfreeze_player};
pub use systems::collisions::sample_wall_direction;

use bevy::prelude::*;

use crate::core::{FrameSet, GameState};
use crate::movement::systems::{
    apply_horizontal_movement, apply_jump, apply_wall_slide, detect_contacts,
    integrate_kinematics, read_input, sample_walls, update_movement_state,
};
use crate::run::movement_active;

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTuning>()
            .init_resource::<MovementInput>()
            .add_systems(Update, read_input.in_set(FrameSet::Input))
            .add_systems(
                Update,
                (
                    detect_contacts,
                    sample_walls,
                    update_movement_state,
                    apply_horizontal_movement,
                    apply_jump,
                    apply_wall_slide,
                )
                    .chain()
                    .in_set(FrameSet::Movement)
                    .run_if(in_state(GameState::Playing))
                    .run_if(movement_active),
            )
            .add_systems(
                Update,
                integrate_kinematics
                    .in_set(FrameSet::Kinematics)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
