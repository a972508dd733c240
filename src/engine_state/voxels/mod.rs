//! # Voxel Engine Core
//!
//! This module contains the voxel world representation: block identifiers, the
//! flat voxel grid, the chunks that partition it for meshing, and the world that
//! ties them together.
//!
//! ## Architecture
//!
//! * **Block**: block ids, named block types, faces and the texture catalog
//! * **VoxelGrid**: one flat array of block ids covering the whole world
//! * **Chunk**: a 32³ window onto the grid with its cached mesh and dirty flag
//! * **World**: owns the grid and the chunk array; routes edits and drives rendering
//! * **Worldgen**: offline terrain for sessions without a server
//!
//! ## Data Flow
//!
//! 1. A local action or a network packet calls `World::set_block`
//! 2. The grid is written and reports the chunks the edit touches
//! 3. Those chunks are marked dirty
//! 4. The next render pass remeshes dirty chunks and draws the visible ones

pub mod block;
pub mod chunk;
pub mod voxel_grid;
pub mod world;
pub mod worldgen;
