//! # Voxel Grid Module
//!
//! This module provides `VoxelGrid`, the flat array of block identifiers backing the
//! whole world, and `AffectedChunks`, the set of chunks an edit invalidates.
//!
//! ## Layout
//!
//! The grid is one contiguous `Vec<BlockId>` of `max_w * max_w * max_h` bytes,
//! indexed as `(y * max_w * max_w) + (z * max_w) + x`. This is the exact layout the
//! server sends at load time, so the initial world is a straight byte copy.
//!
//! ## Bounds Policy
//!
//! Reads outside the grid return air and writes outside the grid are ignored.
//! "Outside the world" is not an error: it is empty space, and the mesh generator
//! relies on that when it samples neighbours across the world edge.

use cgmath::Point3;

use super::block::{BlockId, AIR};
use super::chunk::CHUNK_WIDTH;
use crate::error::{Result, WorldError};

/// Size of a voxel grid (or of a chunk region) measured in chunks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridDimensions {
    /// Number of chunks along X and along Z
    pub chunks_xz: u32,
    /// Number of chunks along Y
    pub chunks_y: u32,
}

impl GridDimensions {
    /// Creates a new set of dimensions.
    pub const fn new(chunks_xz: u32, chunks_y: u32) -> Self {
        GridDimensions {
            chunks_xz,
            chunks_y,
        }
    }

    /// Width and depth in blocks.
    pub fn max_w(&self) -> i32 {
        self.chunks_xz as i32 * CHUNK_WIDTH
    }

    /// Height in blocks.
    pub fn max_h(&self) -> i32 {
        self.chunks_y as i32 * CHUNK_WIDTH
    }

    /// Total number of voxels, which is also the byte size of the flat layout.
    ///
    /// Saturates for dimensions that `checked_volume` rejects.
    pub fn volume(&self) -> usize {
        let w = self.max_w() as usize;
        w.saturating_mul(w).saturating_mul(self.max_h() as usize)
    }

    /// Total number of chunks.
    pub fn chunk_count(&self) -> usize {
        let xz = self.chunks_xz as usize;
        xz * xz * self.chunks_y as usize
    }

    /// Returns `true` if the chunk coordinate lies inside these dimensions.
    pub fn contains_chunk(&self, chunk: Point3<i32>) -> bool {
        let xz = self.chunks_xz as i32;
        let y = self.chunks_y as i32;
        (0..xz).contains(&chunk.x) && (0..y).contains(&chunk.y) && (0..xz).contains(&chunk.z)
    }

    /// Checks that the dimensions describe a non-empty grid that can be
    /// allocated and returns its volume.
    pub fn checked_volume(&self) -> Result<usize> {
        if self.chunks_xz == 0 || self.chunks_y == 0 {
            return Err(WorldError::InvalidDimensions(format!(
                "grid of {}x{}x{} chunks is empty",
                self.chunks_xz, self.chunks_y, self.chunks_xz
            )));
        }
        let w = (self.chunks_xz as u64) * CHUNK_WIDTH as u64;
        let h = (self.chunks_y as u64) * CHUNK_WIDTH as u64;
        let volume = w
            .checked_mul(w)
            .and_then(|plane| plane.checked_mul(h))
            .filter(|_| w <= i32::MAX as u64 && h <= i32::MAX as u64)
            .filter(|&volume| volume <= isize::MAX as u64);
        match volume {
            Some(volume) => Ok(volume as usize),
            None => Err(WorldError::InvalidDimensions(format!(
                "grid of {}x{}x{} chunks is too large",
                self.chunks_xz, self.chunks_y, self.chunks_xz
            ))),
        }
    }
}

/// Read access to block identifiers by world coordinate.
///
/// Implementors must return air for coordinates outside their bounds.
pub trait BlockSource {
    /// Returns the block at world-block coordinates `(x, y, z)`.
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId;
}

/// Chunk-grid cells touched by a single edit.
///
/// An edit always touches the chunk that owns the block. A block on a chunk's
/// boundary plane also touches the neighbour across that plane, at most one per
/// axis, so an edit touches between one and four chunks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AffectedChunks {
    chunks: [Point3<i32>; 4],
    len: usize,
}

impl AffectedChunks {
    /// An empty set, returned for edits outside the grid.
    pub const fn none() -> Self {
        AffectedChunks {
            chunks: [Point3::new(0, 0, 0); 4],
            len: 0,
        }
    }

    fn push(&mut self, chunk: Point3<i32>) {
        self.chunks[self.len] = chunk;
        self.len += 1;
    }

    /// Number of affected chunks.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the edit touched nothing.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The affected chunk coordinates; the owning chunk comes first.
    pub fn as_slice(&self) -> &[Point3<i32>] {
        &self.chunks[..self.len]
    }

    /// Iterates over the affected chunk coordinates.
    pub fn iter(&self) -> impl Iterator<Item = Point3<i32>> + '_ {
        self.as_slice().iter().copied()
    }

    /// Returns `true` if the chunk coordinate is part of the set.
    pub fn contains(&self, chunk: Point3<i32>) -> bool {
        self.as_slice().contains(&chunk)
    }
}

/// The block identifiers for the entire world, stored as one flat buffer.
pub struct VoxelGrid {
    dimensions: GridDimensions,
    max_w: i32,
    max_h: i32,
    data: Vec<BlockId>,
}

impl VoxelGrid {
    /// Creates a grid filled with air.
    ///
    /// # Arguments
    /// * `dimensions` - Size of the grid in chunks
    ///
    /// # Returns
    /// The new grid, or `InvalidDimensions` if a dimension is zero or the grid
    /// is too large to address.
    pub fn new(dimensions: GridDimensions) -> Result<Self> {
        let volume = dimensions.checked_volume()?;
        Ok(VoxelGrid {
            dimensions,
            max_w: dimensions.max_w(),
            max_h: dimensions.max_h(),
            data: vec![AIR; volume],
        })
    }

    /// Adopts a flat byte buffer as the grid contents.
    ///
    /// The bytes must be exactly `dimensions.volume()` long. A blob of any other
    /// size is rejected rather than truncated or padded.
    ///
    /// # Arguments
    /// * `dimensions` - Size of the grid in chunks
    /// * `bytes` - Block ids in the grid's flat layout
    pub fn from_bytes(dimensions: GridDimensions, bytes: Vec<u8>) -> Result<Self> {
        let expected = dimensions.checked_volume()?;
        if bytes.len() != expected {
            log::warn!(
                "Rejecting world blob of {} bytes, expected {}",
                bytes.len(),
                expected
            );
            return Err(WorldError::BlobSizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(VoxelGrid {
            dimensions,
            max_w: dimensions.max_w(),
            max_h: dimensions.max_h(),
            data: bytes,
        })
    }

    /// The grid contents in flat layout.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Size of the grid in chunks.
    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Width and depth in blocks.
    pub fn max_w(&self) -> i32 {
        self.max_w
    }

    /// Height in blocks.
    pub fn max_h(&self) -> i32 {
        self.max_h
    }

    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if x < 0 || x >= self.max_w {
            return None;
        }
        if y < 0 || y >= self.max_h {
            return None;
        }
        if z < 0 || z >= self.max_w {
            return None;
        }
        let w = self.max_w as usize;
        Some((y as usize * w * w) + (z as usize * w) + x as usize)
    }

    /// Returns the block at `(x, y, z)`, or air if the coordinate is outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockId {
        match self.index(x, y, z) {
            Some(index) => self.data[index],
            None => AIR,
        }
    }

    /// Writes a block and reports which chunks must be remeshed.
    ///
    /// Writes outside the grid are ignored and report no chunks. Otherwise the
    /// owning chunk is reported first, followed by the neighbour across each
    /// boundary plane the block lies on. Neighbours outside the grid are omitted.
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - World-block coordinates
    /// * `block` - The new block identifier
    pub fn set(&mut self, x: i32, y: i32, z: i32, block: BlockId) -> AffectedChunks {
        let Some(index) = self.index(x, y, z) else {
            return AffectedChunks::none();
        };
        self.data[index] = block;

        let owner = Point3::new(x / CHUNK_WIDTH, y / CHUNK_WIDTH, z / CHUNK_WIDTH);
        let local = [x % CHUNK_WIDTH, y % CHUNK_WIDTH, z % CHUNK_WIDTH];

        let mut affected = AffectedChunks::none();
        affected.push(owner);

        for (axis, &coordinate) in local.iter().enumerate() {
            let step = if coordinate == 0 {
                -1
            } else if coordinate == CHUNK_WIDTH - 1 {
                1
            } else {
                continue;
            };
            let mut neighbour = owner;
            neighbour[axis] += step;
            if self.dimensions.contains_chunk(neighbour) {
                affected.push(neighbour);
            }
        }

        affected
    }
}

impl BlockSource for VoxelGrid {
    #[inline]
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        self.get(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(chunks_xz: u32, chunks_y: u32) -> VoxelGrid {
        VoxelGrid::new(GridDimensions::new(chunks_xz, chunks_y)).unwrap()
    }

    #[test]
    fn test_out_of_bounds_reads_are_air() {
        let mut grid = grid(1, 1);
        grid.set(0, 0, 0, 5);
        assert_eq!(grid.get(-1, 0, 0), AIR);
        assert_eq!(grid.get(0, -1, 0), AIR);
        assert_eq!(grid.get(0, 0, -1), AIR);
        assert_eq!(grid.get(32, 0, 0), AIR);
        assert_eq!(grid.get(0, 32, 0), AIR);
        assert_eq!(grid.get(0, 0, 32), AIR);
        assert_eq!(grid.get(i32::MIN, i32::MAX, 0), AIR);
    }

    #[test]
    fn test_out_of_bounds_writes_are_ignored() {
        let mut grid = grid(2, 1);
        let before = grid.as_bytes().to_vec();
        for (x, y, z) in [(-1, 0, 0), (64, 0, 0), (0, 32, 0), (0, -5, 0), (0, 0, 64)] {
            let affected = grid.set(x, y, z, 7);
            assert!(affected.is_empty());
        }
        assert_eq!(grid.as_bytes(), &before[..]);
    }

    #[test]
    fn test_write_then_read() {
        let mut grid = grid(2, 2);
        grid.set(3, 40, 63, 9);
        grid.set(63, 63, 0, 1);
        assert_eq!(grid.get(3, 40, 63), 9);
        assert_eq!(grid.get(63, 63, 0), 1);
        assert_eq!(grid.get(4, 40, 63), AIR);
    }

    #[test]
    fn test_flat_layout_index() {
        let mut grid = grid(2, 1);
        grid.set(1, 2, 3, 42);
        let w = 64usize;
        assert_eq!(grid.as_bytes()[2 * w * w + 3 * w + 1], 42);
    }

    #[test]
    fn test_interior_edit_affects_only_owner() {
        let mut grid = grid(3, 3);
        let affected = grid.set(40, 40, 40, 1);
        assert_eq!(affected.as_slice(), &[Point3::new(1, 1, 1)]);
    }

    #[test]
    fn test_low_boundary_edit_affects_lower_neighbour() {
        let mut grid = grid(3, 3);
        let affected = grid.set(32, 40, 40, 1);
        assert_eq!(affected.len(), 2);
        assert!(affected.contains(Point3::new(1, 1, 1)));
        assert!(affected.contains(Point3::new(0, 1, 1)));
    }

    #[test]
    fn test_high_boundary_edit_affects_upper_neighbour() {
        let mut grid = grid(3, 3);
        let affected = grid.set(40, 63, 40, 1);
        assert_eq!(affected.len(), 2);
        assert!(affected.contains(Point3::new(1, 1, 1)));
        assert!(affected.contains(Point3::new(1, 2, 1)));
    }

    #[test]
    fn test_corner_edit_affects_four_chunks() {
        let mut grid = grid(3, 3);
        let affected = grid.set(32, 63, 63, 1);
        assert_eq!(affected.len(), 4);
        assert_eq!(affected.as_slice()[0], Point3::new(1, 1, 1));
        assert!(affected.contains(Point3::new(0, 1, 1)));
        assert!(affected.contains(Point3::new(1, 2, 1)));
        assert!(affected.contains(Point3::new(1, 1, 2)));
    }

    #[test]
    fn test_world_edge_neighbours_are_omitted() {
        let mut grid = grid(1, 1);
        let affected = grid.set(0, 0, 0, 1);
        assert_eq!(affected.as_slice(), &[Point3::new(0, 0, 0)]);
    }

    #[test]
    fn test_blob_of_wrong_size_is_rejected() {
        let dims = GridDimensions::new(1, 1);
        let result = VoxelGrid::from_bytes(dims, vec![0; dims.volume() - 1]);
        assert!(matches!(
            result,
            Err(WorldError::BlobSizeMismatch { expected, actual }) if expected == 32768 && actual == 32767
        ));
        let result = VoxelGrid::from_bytes(dims, vec![0; dims.volume() + 1]);
        assert!(result.is_err());
    }

    #[test]
    fn test_byte_round_trip() {
        let dims = GridDimensions::new(2, 1);
        let mut original = VoxelGrid::new(dims).unwrap();
        let mut rng = fastrand::Rng::with_seed(11);
        for _ in 0..2000 {
            let (x, y, z) = (rng.i32(0..64), rng.i32(0..32), rng.i32(0..64));
            original.set(x, y, z, rng.u8(..));
        }

        let reloaded = VoxelGrid::from_bytes(dims, original.as_bytes().to_vec()).unwrap();
        for y in 0..32 {
            for z in 0..64 {
                for x in 0..64 {
                    assert_eq!(reloaded.get(x, y, z), original.get(x, y, z));
                }
            }
        }
    }

    #[test]
    fn test_zero_dimensions_are_rejected() {
        assert!(VoxelGrid::new(GridDimensions::new(0, 1)).is_err());
        assert!(VoxelGrid::new(GridDimensions::new(1, 0)).is_err());
    }

    #[test]
    fn test_oversized_dimensions_are_rejected() {
        for dims in [
            GridDimensions::new(1 << 21, 1 << 21),
            GridDimensions::new(u32::MAX, 1),
            GridDimensions::new(1, u32::MAX),
        ] {
            assert!(matches!(
                VoxelGrid::new(dims),
                Err(WorldError::InvalidDimensions(_))
            ));
            assert!(matches!(
                VoxelGrid::from_bytes(dims, Vec::new()),
                Err(WorldError::InvalidDimensions(_))
            ));
        }
        assert_eq!(GridDimensions::new(2, 1).checked_volume().unwrap(), 64 * 64 * 32);
    }
}
