//! # World Module
//!
//! This module provides the `World` struct, which owns the voxel grid and the fixed
//! array of chunks that view it, and drives the remesh-then-draw cycle.
//!
//! ## Architecture
//!
//! - The `VoxelGrid` holds every block of the world as one flat buffer.
//! - The loaded region is a fixed 3D array of `Chunk`s anchored at the world
//!   origin, allocated once and kept until the world is destroyed. Chunks in the
//!   grid but outside this region are never meshed.
//! - Edits go through `set_block`, which writes the grid and marks every loaded
//!   chunk whose mesh the edit can change as dirty.
//! - `render` remeshes dirty chunks, then frustum-culls and draws the rest.
//!
//! ## Performance Considerations
//!
//! - Chunk lookup is a direct index into the chunk array
//! - Only dirty chunks are remeshed, and an edit dirties at most four of them
//! - Remeshing runs to completion inside the frame that observes the dirty flag
//! - Empty chunks skip the frustum test and the draw call entirely

use cgmath::Point3;
use web_time::{Duration, Instant};

use super::{
    block::{block_catalog::BlockCatalog, BlockId, AIR},
    chunk::{Chunk, CHUNK_WIDTH},
    voxel_grid::{AffectedChunks, BlockSource, GridDimensions, VoxelGrid},
};
use crate::config::WorldConfig;
use crate::engine_state::{
    camera_state::Camera,
    network::BlockUpdate,
    physics::BlockTarget,
    rendering::{backend::RenderBackend, meshing::MeshGenerator},
};
use crate::error::{Result, WorldError};

/// What a render pass did, chunk by chunk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Chunks remeshed this pass
    pub regenerated: usize,
    /// Chunks drawn
    pub drawn: usize,
    /// Non-empty chunks rejected by the frustum
    pub culled: usize,
    /// Chunks with no vertices
    pub empty: usize,
    /// Time spent remeshing
    pub regeneration_time: Duration,
}

/// A local edit, ready to be sent to the server.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockEdit {
    /// The block that was there before
    pub previous: BlockId,
    /// The packet announcing the edit
    pub update: BlockUpdate,
}

/// The voxel world: block data, chunk meshes and the logic tying them together.
pub struct World<B: RenderBackend> {
    grid: VoxelGrid,
    loaded: GridDimensions,
    chunks: Vec<Chunk<B>>,
    mesh_generator: MeshGenerator,
}

impl<B: RenderBackend> World<B> {
    /// Creates a world over `grid` with a loaded region of `loaded` chunks.
    ///
    /// Every chunk of the loaded region is allocated here, starts dirty, and gets
    /// its GPU buffer from `backend`.
    ///
    /// # Arguments
    /// * `grid` - The block data, usually from the server's world blob
    /// * `loaded` - Size of the chunk array, in chunks
    /// * `backend` - The render backend that owns chunk buffers
    ///
    /// # Returns
    /// The world, or `InvalidDimensions` if the loaded region is empty or does not
    /// fit inside the grid.
    pub fn new(grid: VoxelGrid, loaded: GridDimensions, backend: &mut B) -> Result<Self> {
        let dims = grid.dimensions();
        if loaded.chunks_xz == 0 || loaded.chunks_y == 0 {
            return Err(WorldError::InvalidDimensions(
                "loaded region must contain at least one chunk".to_string(),
            ));
        }
        if loaded.chunks_xz > dims.chunks_xz || loaded.chunks_y > dims.chunks_y {
            return Err(WorldError::InvalidDimensions(format!(
                "loaded region {}x{}x{} exceeds world {}x{}x{}",
                loaded.chunks_xz,
                loaded.chunks_y,
                loaded.chunks_xz,
                dims.chunks_xz,
                dims.chunks_y,
                dims.chunks_xz
            )));
        }

        let xz = loaded.chunks_xz as i32;
        let mut chunks = Vec::with_capacity(loaded.chunk_count());
        for y in 0..loaded.chunks_y as i32 {
            for z in 0..xz {
                for x in 0..xz {
                    let origin = Point3::new(x * CHUNK_WIDTH, y * CHUNK_WIDTH, z * CHUNK_WIDTH);
                    chunks.push(Chunk::new(origin, backend));
                }
            }
        }

        log::info!(
            "World created: {}x{}x{} blocks, {} chunks loaded ({}x{}x{})",
            grid.max_w(),
            grid.max_h(),
            grid.max_w(),
            chunks.len(),
            loaded.chunks_xz,
            loaded.chunks_y,
            loaded.chunks_xz
        );

        Ok(World {
            grid,
            loaded,
            chunks,
            mesh_generator: MeshGenerator::new(),
        })
    }

    /// Creates a world sized by `config` over `grid`.
    ///
    /// The grid must have the dimensions the config describes.
    pub fn from_config(config: &WorldConfig, grid: VoxelGrid, backend: &mut B) -> Result<Self> {
        config.validate()?;
        let expected = config.grid_dimensions();
        if grid.dimensions() != expected {
            return Err(WorldError::InvalidDimensions(format!(
                "grid is {:?} but config describes {:?}",
                grid.dimensions(),
                expected
            )));
        }
        Self::new(grid, config.loaded_dimensions(), backend)
    }

    /// Returns the block at `(x, y, z)`, or air outside the world.
    #[inline]
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockId {
        self.grid.get(x, y, z)
    }

    /// Writes a block and marks the chunks whose meshes it affects as dirty.
    ///
    /// Any id is accepted. Writes outside the world are ignored. Affected chunks
    /// outside the loaded region are reported but nothing is marked for them.
    ///
    /// # Returns
    /// The chunk-grid coordinates the edit touched, owner first.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockId) -> AffectedChunks {
        if block != AIR && !BlockCatalog::is_known(block) {
            log::debug!("Storing unknown block id {} at ({}, {}, {})", block, x, y, z);
        }

        let affected = self.grid.set(x, y, z, block);
        for chunk in affected.iter() {
            if let Some(index) = self.chunk_index(chunk) {
                self.chunks[index].mark_dirty();
            }
        }
        affected
    }

    /// Applies a block update received from the server.
    pub fn apply_block_update(&mut self, update: &BlockUpdate) -> AffectedChunks {
        let p = update.position;
        log::trace!("Applying block update {} at ({}, {}, {})", update.block, p.x, p.y, p.z);
        self.set_block(p.x, p.y, p.z, update.block)
    }

    /// Breaks the block a pick ray hit.
    ///
    /// # Returns
    /// The edit to announce, or `None` if there was nothing to break.
    pub fn break_block(&mut self, target: &BlockTarget) -> Option<BlockEdit> {
        let p = target.breakable;
        let previous = self.get_block(p.x, p.y, p.z);
        if previous == AIR {
            return None;
        }
        self.set_block(p.x, p.y, p.z, AIR);
        Some(BlockEdit {
            previous,
            update: BlockUpdate::new(p.x, p.y, p.z, AIR),
        })
    }

    /// Places `block` in front of the block a pick ray hit.
    ///
    /// # Returns
    /// The edit to announce, or `None` if the spot is occupied, outside the world,
    /// or `block` is air.
    pub fn place_block(&mut self, target: &BlockTarget, block: BlockId) -> Option<BlockEdit> {
        let p = target.placeable;
        if block == AIR || self.get_block(p.x, p.y, p.z) != AIR {
            return None;
        }
        if self.set_block(p.x, p.y, p.z, block).is_empty() {
            return None;
        }
        Some(BlockEdit {
            previous: AIR,
            update: BlockUpdate::new(p.x, p.y, p.z, block),
        })
    }

    fn chunk_index(&self, chunk: Point3<i32>) -> Option<usize> {
        if !self.loaded.contains_chunk(chunk) {
            return None;
        }
        let xz = self.loaded.chunks_xz as usize;
        Some(chunk.y as usize * xz * xz + chunk.z as usize * xz + chunk.x as usize)
    }

    /// Returns the loaded chunk at chunk-grid coordinate `chunk`.
    pub fn get_chunk(&self, chunk: Point3<i32>) -> Option<&Chunk<B>> {
        self.chunk_index(chunk).map(|index| &self.chunks[index])
    }

    /// Number of loaded chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of loaded chunks waiting to be remeshed.
    pub fn dirty_chunk_count(&self) -> usize {
        self.chunks.iter().filter(|chunk| chunk.is_dirty()).count()
    }

    /// The block data.
    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// Size of the loaded region in chunks.
    pub fn loaded_dimensions(&self) -> GridDimensions {
        self.loaded
    }

    /// Runs one render pass.
    ///
    /// Every dirty chunk is remeshed and uploaded first. Then each non-empty chunk
    /// whose bounds the camera can see is drawn.
    ///
    /// # Arguments
    /// * `camera` - The view to render from
    /// * `backend` - Receives uploads and draw calls
    pub fn render<C: Camera + ?Sized>(&mut self, camera: &C, backend: &mut B) -> RenderStats {
        let mut stats = RenderStats::default();
        backend.begin_frame(camera.view_projection(), camera.eye_position());

        for chunk in &mut self.chunks {
            if chunk.is_dirty() {
                let start = Instant::now();
                let vertices = self.mesh_generator.generate(&self.grid, chunk.origin());
                chunk.upload(backend, vertices);
                stats.regeneration_time += start.elapsed();
                stats.regenerated += 1;
                log::trace!(
                    "Regenerated chunk at {:?} with {} vertices",
                    chunk.origin(),
                    chunk.vertex_count()
                );
            }

            if chunk.is_empty() {
                stats.empty += 1;
                continue;
            }

            let (min, max) = chunk.bounds();
            if camera.is_box_visible(min, max) {
                chunk.render(backend);
                stats.drawn += 1;
            } else {
                stats.culled += 1;
            }
        }

        backend.end_frame();

        if stats.regenerated > 0 {
            log::debug!(
                "Frame: {} regenerated in {:?}, {} drawn, {} culled, {} empty",
                stats.regenerated,
                stats.regeneration_time,
                stats.drawn,
                stats.culled,
                stats.empty
            );
        }
        stats
    }

    /// Releases every chunk buffer and drops the block data.
    pub fn destroy(mut self, backend: &mut B) {
        for chunk in &mut self.chunks {
            chunk.destroy(backend);
        }
        log::info!("World destroyed, released {} chunk buffers", self.chunks.len());
    }
}

impl<B: RenderBackend> BlockSource for World<B> {
    #[inline]
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        self.grid.get(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Matrix4, SquareMatrix};

    use super::*;
    use crate::engine_state::rendering::backend::RecordingBackend;

    /// Sees everything or nothing.
    struct FixedCamera(bool);

    impl Camera for FixedCamera {
        fn view_projection(&self) -> Matrix4<f32> {
            Matrix4::identity()
        }

        fn eye_position(&self) -> Point3<f32> {
            Point3::new(0.0, 0.0, 0.0)
        }

        fn is_box_visible(&self, _min: Point3<f32>, _max: Point3<f32>) -> bool {
            self.0
        }
    }

    fn world(
        grid_xz: u32,
        grid_y: u32,
        loaded_xz: u32,
        loaded_y: u32,
    ) -> (World<RecordingBackend>, RecordingBackend) {
        let mut backend = RecordingBackend::default();
        let grid = VoxelGrid::new(GridDimensions::new(grid_xz, grid_y)).unwrap();
        let world = World::new(grid, GridDimensions::new(loaded_xz, loaded_y), &mut backend).unwrap();
        (world, backend)
    }

    #[test]
    fn test_all_chunks_start_dirty() {
        let (world, backend) = world(3, 2, 3, 2);
        assert_eq!(world.chunk_count(), 18);
        assert_eq!(world.dirty_chunk_count(), 18);
        assert_eq!(backend.live_buffers(), 18);
    }

    #[test]
    fn test_loaded_region_must_fit() {
        let mut backend = RecordingBackend::default();
        let grid = VoxelGrid::new(GridDimensions::new(2, 2)).unwrap();
        let result = World::new(grid, GridDimensions::new(3, 1), &mut backend);
        assert!(matches!(result, Err(WorldError::InvalidDimensions(_))));
    }

    #[test]
    fn test_first_render_meshes_everything_once() {
        let (mut world, mut backend) = world(2, 1, 2, 1);
        world.set_block(5, 5, 5, 4);

        let stats = world.render(&FixedCamera(true), &mut backend);
        assert_eq!(stats.regenerated, 4);
        assert_eq!(stats.drawn, 1);
        assert_eq!(stats.empty, 3);
        assert_eq!(world.dirty_chunk_count(), 0);

        let stats = world.render(&FixedCamera(true), &mut backend);
        assert_eq!(stats.regenerated, 0);
        assert_eq!(stats.drawn, 1);
    }

    #[test]
    fn test_interior_edit_dirties_owner_only() {
        let (mut world, mut backend) = world(3, 3, 3, 3);
        world.render(&FixedCamera(true), &mut backend);

        world.set_block(40, 40, 40, 4);
        assert_eq!(world.dirty_chunk_count(), 1);
        assert!(world.get_chunk(Point3::new(1, 1, 1)).unwrap().is_dirty());
    }

    #[test]
    fn test_boundary_edit_dirties_neighbour() {
        let (mut world, mut backend) = world(3, 3, 3, 3);
        world.render(&FixedCamera(true), &mut backend);

        world.set_block(63, 40, 40, 4);
        assert_eq!(world.dirty_chunk_count(), 2);
        assert!(world.get_chunk(Point3::new(1, 1, 1)).unwrap().is_dirty());
        assert!(world.get_chunk(Point3::new(2, 1, 1)).unwrap().is_dirty());

        let stats = world.render(&FixedCamera(true), &mut backend);
        assert_eq!(stats.regenerated, 2);
    }

    #[test]
    fn test_out_of_bounds_edit_marks_nothing() {
        let (mut world, mut backend) = world(2, 1, 2, 1);
        world.render(&FixedCamera(true), &mut backend);

        let affected = world.set_block(-1, 0, 0, 4);
        assert!(affected.is_empty());
        assert_eq!(world.dirty_chunk_count(), 0);
        assert_eq!(world.get_block(-1, 0, 0), AIR);
    }

    #[test]
    fn test_edits_outside_loaded_region_only_touch_grid() {
        let (mut world, mut backend) = world(4, 1, 2, 1);
        world.render(&FixedCamera(true), &mut backend);

        let affected = world.set_block(100, 5, 5, 4);
        assert_eq!(affected.len(), 1);
        assert_eq!(world.get_block(100, 5, 5), 4);
        assert_eq!(world.dirty_chunk_count(), 0);
    }

    #[test]
    fn test_edit_on_loaded_edge_dirties_loaded_neighbour_only() {
        let (mut world, mut backend) = world(4, 1, 2, 1);
        world.render(&FixedCamera(true), &mut backend);

        // x = 64 is the first column outside the loaded region
        let affected = world.set_block(64, 5, 5, 4);
        assert_eq!(affected.len(), 2);
        assert_eq!(world.dirty_chunk_count(), 1);
        assert!(world.get_chunk(Point3::new(1, 0, 0)).unwrap().is_dirty());
    }

    #[test]
    fn test_get_chunk_outside_region_is_none() {
        let (world, _backend) = world(2, 1, 2, 1);
        assert!(world.get_chunk(Point3::new(2, 0, 0)).is_none());
        assert!(world.get_chunk(Point3::new(0, -1, 0)).is_none());
        assert!(world.get_chunk(Point3::new(1, 0, 1)).is_some());
    }

    #[test]
    fn test_culled_chunks_are_not_drawn() {
        let (mut world, mut backend) = world(2, 1, 2, 1);
        world.set_block(5, 5, 5, 4);
        world.set_block(40, 5, 40, 4);

        let stats = world.render(&FixedCamera(false), &mut backend);
        assert_eq!(stats.drawn, 0);
        assert_eq!(stats.culled, 2);
        assert_eq!(stats.empty, 2);
        assert!(backend.draws().is_empty());
    }

    #[test]
    fn test_break_and_place_produce_updates() {
        let (mut world, mut backend) = world(1, 1, 1, 1);
        world.set_block(3, 3, 3, 9);
        world.render(&FixedCamera(true), &mut backend);

        let target = BlockTarget {
            breakable: Point3::new(3, 3, 3),
            placeable: Point3::new(3, 4, 3),
        };
        let placed = world.place_block(&target, 2).unwrap();
        assert_eq!(placed.update, BlockUpdate::new(3, 4, 3, 2));
        assert_eq!(world.get_block(3, 4, 3), 2);
        assert!(world.place_block(&target, 2).is_none());

        let broken = world.break_block(&target).unwrap();
        assert_eq!(broken.previous, 9);
        assert_eq!(broken.update, BlockUpdate::new(3, 3, 3, AIR));
        assert_eq!(world.get_block(3, 3, 3), AIR);
        assert!(world.break_block(&target).is_none());
    }

    #[test]
    fn test_unknown_ids_are_stored() {
        let (mut world, _backend) = world(1, 1, 1, 1);
        world.set_block(1, 1, 1, 200);
        assert_eq!(world.get_block(1, 1, 1), 200);
    }

    #[test]
    fn test_network_update_goes_through_set_block() {
        let (mut world, mut backend) = world(2, 1, 2, 1);
        world.render(&FixedCamera(true), &mut backend);

        let update = BlockUpdate::decode(&BlockUpdate::new(32, 0, 0, 5).encode()).unwrap();
        let affected = world.apply_block_update(&update);
        assert_eq!(world.get_block(32, 0, 0), 5);
        assert_eq!(affected.len(), 2);
        assert_eq!(world.dirty_chunk_count(), 2);
    }

    #[test]
    fn test_destroy_releases_every_buffer() {
        let (world, mut backend) = world(2, 2, 2, 2);
        assert_eq!(backend.live_buffers(), 8);
        world.destroy(&mut backend);
        assert_eq!(backend.live_buffers(), 0);
    }
}
