//! # Player Physics
//!
//! Interaction between the player and block data: picking the block under the
//! crosshair and keeping the player box out of solid blocks.

pub mod collision;
pub mod raycast;

pub use collision::{collide_with_world, Aabb, Axis, CollisionOutcome};
pub use raycast::{pick_block, BlockTarget};
