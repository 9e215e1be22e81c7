//! Movement domain: system modules for locomotion updates.

pub(crate) mod collisions;
pub(crate) mod input;
pub(crate) mod kinematics;
pub(crate) mod movement;

pub(crate) use collisions::{detect_contacts, sample_walls};
pub(crate) use input::read_input;
pub(crate) use kinematics::integrate_kinematics;
pub(crate) use movement::{
    apply_horizontal_movement, apply_jump, apply_wall_slide, update_movement_state,
};
