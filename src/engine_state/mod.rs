//! # Engine State Module
//!
//! The engine subsystems that make up the voxel client, below the application
//! session that drives them.
//!
//! ## Key Components
//!
//! * `camera_state` - Fly camera, projection and frustum culling
//! * `network` - Block update packets and the initial world blob
//! * `physics` - Block picking and player collision
//! * `rendering` - Meshing, packed vertices and the render backends
//! * `voxels` - Block data, chunks, world generation and the `World` itself
//!
//! ## Architecture
//!
//! Each subsystem is responsible for one aspect of the client. `voxels::world::World`
//! is the coordinator: it owns the block data and the chunk array, takes edits from
//! the player and the network, and hands dirty chunks to the mesher and visible
//! chunks to a `RenderBackend` every frame.
//!
//! ## Performance Considerations
//!
//! * Edits dirty at most four chunks and never trigger work on their own
//! * Remeshing happens lazily, once per dirty chunk per frame
//! * Vertices are packed into a single `u32` each
//! * Chunks outside the camera frustum skip their draw call

pub mod camera_state;
pub mod network;
pub mod physics;
pub mod rendering;
pub mod voxels;
