//! # Network Messages
//!
//! Wire formats the world exchanges with the server. Socket handling lives
//! elsewhere; this module only turns bytes into world inputs and back.
//!
//! * `block_update` - the 13-byte block edit record, in both directions
//! * `world_blob` - the raw voxel grid sent once on join

pub mod block_update;
pub mod world_blob;

pub use block_update::BlockUpdate;
pub use world_blob::{read_world_blob, write_world_blob};
