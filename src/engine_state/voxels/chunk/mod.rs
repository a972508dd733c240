//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a 32x32x32 window onto the voxel grid
//! together with its cached render output.
//!
//! A chunk does not own block data. It knows its minimum corner in world-block
//! coordinates, whether its mesh is stale, and the GPU vertex buffer holding the
//! last mesh generated for it. All chunks of the loaded region are created once
//! when the world is built and live until the world is destroyed.
//!
//! ## Lifecycle
//!
//! 1. Created dirty, with an empty GPU buffer
//! 2. Meshed on the next render pass, which uploads vertices and clears the flag
//! 3. Marked dirty again whenever an edit touches it
//! 4. Destroyed with the world, releasing its GPU buffer

use cgmath::Point3;

use crate::engine_state::rendering::{backend::RenderBackend, vertex::PackedVertex};

/// The edge length of a chunk in blocks.
pub const CHUNK_WIDTH: i32 = 32;

/// A cubic region of the world and its cached mesh.
pub struct Chunk<B: RenderBackend> {
    /// Minimum corner of the chunk in world-block coordinates.
    origin: Point3<i32>,
    /// Set when the cached mesh no longer matches the voxel grid.
    needs_update: bool,
    /// Number of vertices in the current GPU buffer.
    vertex_count: u32,
    /// The GPU-resident vertex buffer; `None` once destroyed.
    buffer: Option<B::Buffer>,
}

impl<B: RenderBackend> Chunk<B> {
    /// Creates a chunk at the given origin and allocates its GPU buffer.
    ///
    /// New chunks start dirty so the first render pass meshes them.
    ///
    /// # Arguments
    /// * `origin` - Minimum corner in world-block coordinates
    /// * `backend` - The render backend that owns GPU resources
    pub fn new(origin: Point3<i32>, backend: &mut B) -> Self {
        Chunk {
            origin,
            needs_update: true,
            vertex_count: 0,
            buffer: Some(backend.create_buffer(origin)),
        }
    }

    /// Minimum corner of the chunk in world-block coordinates.
    pub fn origin(&self) -> Point3<i32> {
        self.origin
    }

    /// Flags the cached mesh as stale.
    pub fn mark_dirty(&mut self) {
        self.needs_update = true;
    }

    /// Returns `true` if the mesh must be regenerated before the next draw.
    pub fn is_dirty(&self) -> bool {
        self.needs_update
    }

    /// Replaces the GPU payload with a freshly generated mesh and clears the dirty flag.
    ///
    /// The previous buffer contents are discarded, never patched.
    pub fn upload(&mut self, backend: &mut B, vertices: &[PackedVertex]) {
        if let Some(buffer) = self.buffer.as_mut() {
            backend.replace_vertices(buffer, vertices);
            self.vertex_count = vertices.len() as u32;
        }
        self.needs_update = false;
    }

    /// Number of vertices in the current mesh.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Returns `true` if the chunk has nothing to draw.
    ///
    /// Fully empty and fully enclosed chunks both end up here.
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// Issues a draw call for the chunk's mesh. Empty chunks are skipped.
    pub fn render(&self, backend: &mut B) {
        if self.vertex_count == 0 {
            return;
        }
        if let Some(buffer) = self.buffer.as_ref() {
            backend.draw(buffer, self.vertex_count);
        }
    }

    /// Releases the GPU buffer. Calling this twice is harmless.
    pub fn destroy(&mut self, backend: &mut B) {
        if let Some(buffer) = self.buffer.take() {
            backend.release(buffer);
        }
        self.vertex_count = 0;
    }

    /// Axis-aligned bounding box of the chunk in world space, as `(min, max)`.
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        let min = Point3::new(
            self.origin.x as f32,
            self.origin.y as f32,
            self.origin.z as f32,
        );
        let w = CHUNK_WIDTH as f32;
        (min, Point3::new(min.x + w, min.y + w, min.z + w))
    }
}
