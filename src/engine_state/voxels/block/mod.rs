//! # Block Module
//!
//! This module provides the block-related definitions for the voxel engine:
//! block identifiers, named block types, block faces and the texture catalog.
//!
//! A block is nothing more than a `BlockId` stored in the voxel grid. There is no
//! per-block metadata; lighting and ambient occlusion are computed at mesh time.

pub mod block_catalog;
pub mod block_side;
pub mod block_type;

/// The underlying integer type used to store a block in the voxel grid.
///
/// `0` is air. Every other value indexes into the `BlockCatalog`.
pub type BlockId = u8;

/// The block identifier for air (empty space).
pub const AIR: BlockId = 0;

/// Returns `true` if the identifier is anything other than air.
///
/// Every non-air block is opaque for both face culling and ambient occlusion.
#[inline]
pub fn is_solid(block: BlockId) -> bool {
    block != AIR
}
