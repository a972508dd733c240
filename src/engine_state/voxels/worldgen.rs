//! # Terrain Generation
//!
//! Offline terrain for sessions without a server. The server normally sends the
//! whole world as a blob on join; `TerrainGenerator` fills a `VoxelGrid` with
//! something comparable so the client can run standalone and benchmarks have
//! realistic data.
//!
//! ## Layers
//!
//! Each column gets a surface height from two octaves of 2D Perlin noise:
//! - the surface block is grass, snow above the snow line, or sand at low points
//! - the three blocks below the surface are dirt
//! - everything deeper is stone
//!
//! Grass columns occasionally grow a tree: a short log trunk with a leaf cap.

use noise::{NoiseFn, Perlin};

use super::block::{block_type::BlockType, BlockId};
use super::voxel_grid::VoxelGrid;

/// Scale of the broad terrain octave.
const BASE_SCALE: f64 = 0.01;
/// Scale of the detail octave.
const DETAIL_SCALE: f64 = 0.06;
/// Height swing of the broad octave, in blocks.
const BASE_AMPLITUDE: f64 = 24.0;
/// Height swing of the detail octave, in blocks.
const DETAIL_AMPLITUDE: f64 = 4.0;
/// Surface height above sea level where grass turns to snow.
const SNOW_LINE_OFFSET: i32 = 18;
/// Depth below sea level where grass turns to sand.
const BEACH_DEPTH: i32 = 2;
/// Dirt layers under the surface block.
const DIRT_DEPTH: i32 = 3;
/// Chance that a grass column grows a tree.
const TREE_CHANCE: f64 = 0.008;
/// Trunk height of generated trees.
const TRUNK_HEIGHT: i32 = 4;

/// Deterministic heightmap terrain generator.
pub struct TerrainGenerator {
    seed: u32,
    sea_level: i32,
    base: Perlin,
    detail: Perlin,
}

impl TerrainGenerator {
    /// Creates a generator.
    ///
    /// # Arguments
    /// * `seed` - Noise and decoration seed; equal seeds produce equal worlds
    /// * `sea_level` - Mean surface height in blocks
    pub fn new(seed: u32, sea_level: i32) -> Self {
        TerrainGenerator {
            seed,
            sea_level,
            base: Perlin::new(seed),
            detail: Perlin::new(seed.wrapping_add(1)),
        }
    }

    /// Surface height of the column at `(x, z)`, before clamping to a grid.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let (x, z) = (x as f64, z as f64);
        let base = self.base.get([x * BASE_SCALE, z * BASE_SCALE]) * BASE_AMPLITUDE;
        let detail = self.detail.get([x * DETAIL_SCALE, z * DETAIL_SCALE]) * DETAIL_AMPLITUDE;
        self.sea_level + (base + detail).round() as i32
    }

    fn surface_block(&self, height: i32) -> BlockType {
        if height > self.sea_level + SNOW_LINE_OFFSET {
            BlockType::SNOW
        } else if height <= self.sea_level - BEACH_DEPTH {
            BlockType::SAND
        } else {
            BlockType::GRASS
        }
    }

    /// Fills the whole grid with terrain.
    ///
    /// Existing contents are overwritten column by column; voxels above the
    /// surface are left as they were.
    pub fn fill(&self, grid: &mut VoxelGrid) {
        let start = web_time::Instant::now();
        let mut rng = fastrand::Rng::with_seed(u64::from(self.seed));
        let max_w = grid.max_w();
        let max_h = grid.max_h();
        let mut trees = 0usize;

        for z in 0..max_w {
            for x in 0..max_w {
                let height = self.surface_height(x, z).clamp(0, max_h - 1);
                let surface = self.surface_block(height);

                for y in 0..=height {
                    let block = if y == height {
                        surface
                    } else if y >= height - DIRT_DEPTH {
                        BlockType::DIRT
                    } else {
                        BlockType::STONE
                    };
                    grid.set(x, y, z, block.id());
                }

                if surface == BlockType::GRASS && rng.f64() < TREE_CHANCE {
                    Self::plant_tree(grid, x, height + 1, z);
                    trees += 1;
                }
            }
        }

        log::info!(
            "Generated {}x{}x{} terrain with {} trees in {:?}",
            max_w,
            max_h,
            max_w,
            trees,
            start.elapsed()
        );
    }

    fn plant_tree(grid: &mut VoxelGrid, x: i32, base_y: i32, z: i32) {
        let leaves: BlockId = BlockType::LEAVES.id();
        let top = base_y + TRUNK_HEIGHT;

        for dy in -1..=1 {
            for dz in -1..=1 {
                for dx in -1..=1 {
                    // trim the corners of the lower layers
                    if dy < 1 && dx != 0 && dz != 0 {
                        continue;
                    }
                    grid.set(x + dx, top + dy, z + dz, leaves);
                }
            }
        }
        for y in base_y..top {
            grid.set(x, y, z, BlockType::LOG.id());
        }
    }
}
