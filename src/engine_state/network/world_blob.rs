//! Initial world transfer.
//!
//! On join the server streams the whole voxel grid as raw bytes in the grid's flat
//! layout. The client knows the dimensions up front and reads exactly that many
//! bytes; a stream that ends early is a size mismatch, not a partial world.

use std::io::{Read, Write};

use crate::engine_state::voxels::voxel_grid::{GridDimensions, VoxelGrid};
use crate::error::{Result, WorldError};

/// Reads a world blob of `dimensions.volume()` bytes into a new grid.
///
/// # Arguments
/// * `reader` - Source of the blob, positioned at its first byte
/// * `dimensions` - Size of the world in chunks
///
/// # Returns
/// The grid, `BlobSizeMismatch` if the stream holds fewer bytes, or
/// `InvalidDimensions` if the dimensions cannot describe a grid.
pub fn read_world_blob<R: Read>(reader: &mut R, dimensions: GridDimensions) -> Result<VoxelGrid> {
    let expected = dimensions.checked_volume()?;
    let mut bytes = Vec::with_capacity(expected);
    reader.take(expected as u64).read_to_end(&mut bytes)?;
    if bytes.len() != expected {
        log::warn!("World blob ended after {} of {} bytes", bytes.len(), expected);
        return Err(WorldError::BlobSizeMismatch {
            expected,
            actual: bytes.len(),
        });
    }
    log::info!("Received world blob of {} bytes", expected);
    VoxelGrid::from_bytes(dimensions, bytes)
}

/// Writes the grid in the flat layout `read_world_blob` expects.
pub fn write_world_blob<W: Write>(writer: &mut W, grid: &VoxelGrid) -> Result<()> {
    writer.write_all(grid.as_bytes())?;
    Ok(())
}
