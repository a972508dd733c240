//! # Render Backend Module
//!
//! The seam between the voxel world and whatever consumes its meshes.
//!
//! The world only ever needs four things from a renderer: allocate a per-chunk
//! vertex buffer, replace its contents wholesale, draw N vertices from it, and
//! release it. `RenderBackend` captures exactly that, plus optional per-frame
//! hooks that receive the camera state.
//!
//! Two implementations ship with the crate:
//! - `RecordingBackend` keeps everything in memory and records draw calls. Tests
//!   and headless sessions use it.
//! - `GpuChunkBackend` (see `gpu_backend`) owns real wgpu buffers.

use cgmath::{Matrix4, Point3, SquareMatrix};

use super::vertex::PackedVertex;

/// Capability interface for chunk rendering.
pub trait RenderBackend {
    /// Handle to one chunk's vertex buffer.
    type Buffer;

    /// Called once before any chunk of a frame is drawn.
    fn begin_frame(&mut self, _view_projection: Matrix4<f32>, _eye: Point3<f32>) {}

    /// Allocates an empty vertex buffer for the chunk at `origin`.
    fn create_buffer(&mut self, origin: Point3<i32>) -> Self::Buffer;

    /// Discards the buffer's contents and replaces them with `vertices`.
    fn replace_vertices(&mut self, buffer: &mut Self::Buffer, vertices: &[PackedVertex]);

    /// Draws the first `vertex_count` vertices of the buffer.
    fn draw(&mut self, buffer: &Self::Buffer, vertex_count: u32);

    /// Frees the buffer.
    fn release(&mut self, buffer: Self::Buffer);

    /// Called once after the last chunk of a frame is drawn.
    fn end_frame(&mut self) {}
}

/// A draw call captured by `RecordingBackend`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DrawCall {
    /// Origin of the chunk whose buffer was drawn
    pub origin: Point3<i32>,
    /// Number of vertices drawn
    pub vertex_count: u32,
}

#[derive(Debug)]
struct RecordedBuffer {
    origin: Point3<i32>,
    vertices: Vec<PackedVertex>,
}

/// In-memory render backend.
///
/// Buffers are slots in a vector and handles are slot indices. Draw calls are
/// cleared at the start of every frame, so after a render pass `draws()` holds
/// exactly that pass's calls.
#[derive(Debug)]
pub struct RecordingBackend {
    buffers: Vec<Option<RecordedBuffer>>,
    draws: Vec<DrawCall>,
    uploads: usize,
    frames: usize,
    view_projection: Matrix4<f32>,
    eye: Point3<f32>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        RecordingBackend {
            buffers: Vec::new(),
            draws: Vec::new(),
            uploads: 0,
            frames: 0,
            view_projection: Matrix4::identity(),
            eye: Point3::new(0.0, 0.0, 0.0),
        }
    }
}

impl RecordingBackend {
    /// Number of buffers created and not yet released.
    pub fn live_buffers(&self) -> usize {
        self.buffers.iter().filter(|slot| slot.is_some()).count()
    }

    /// Total number of `replace_vertices` calls.
    pub fn upload_count(&self) -> usize {
        self.uploads
    }

    /// Draw calls issued since the last `begin_frame`.
    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    /// Number of frames begun.
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    /// Current contents of a buffer, or `None` if it was released.
    pub fn vertices(&self, handle: usize) -> Option<&[PackedVertex]> {
        self.buffers
            .get(handle)
            .and_then(|slot| slot.as_ref())
            .map(|buffer| buffer.vertices.as_slice())
    }

    /// Current contents of the live buffer belonging to the chunk at `origin`.
    pub fn vertices_at(&self, origin: Point3<i32>) -> Option<&[PackedVertex]> {
        self.buffers
            .iter()
            .flatten()
            .find(|buffer| buffer.origin == origin)
            .map(|buffer| buffer.vertices.as_slice())
    }

    /// The camera state passed to the most recent `begin_frame`.
    pub fn last_camera(&self) -> (Matrix4<f32>, Point3<f32>) {
        (self.view_projection, self.eye)
    }
}

impl RenderBackend for RecordingBackend {
    type Buffer = usize;

    fn begin_frame(&mut self, view_projection: Matrix4<f32>, eye: Point3<f32>) {
        self.draws.clear();
        self.frames += 1;
        self.view_projection = view_projection;
        self.eye = eye;
    }

    fn create_buffer(&mut self, origin: Point3<i32>) -> usize {
        self.buffers.push(Some(RecordedBuffer {
            origin,
            vertices: Vec::new(),
        }));
        self.buffers.len() - 1
    }

    fn replace_vertices(&mut self, buffer: &mut usize, vertices: &[PackedVertex]) {
        if let Some(Some(recorded)) = self.buffers.get_mut(*buffer) {
            recorded.vertices.clear();
            recorded.vertices.extend_from_slice(vertices);
            self.uploads += 1;
        }
    }

    fn draw(&mut self, buffer: &usize, vertex_count: u32) {
        if let Some(Some(recorded)) = self.buffers.get(*buffer) {
            self.draws.push(DrawCall {
                origin: recorded.origin,
                vertex_count,
            });
        }
    }

    fn release(&mut self, buffer: usize) {
        if let Some(slot) = self.buffers.get_mut(buffer) {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffers_are_replaced_not_appended() {
        let mut backend = RecordingBackend::default();
        let mut handle = backend.create_buffer(Point3::new(0, 0, 0));
        backend.replace_vertices(&mut handle, &[PackedVertex(1), PackedVertex(2)]);
        backend.replace_vertices(&mut handle, &[PackedVertex(3)]);
        assert_eq!(backend.vertices(handle), Some(&[PackedVertex(3)][..]));
        assert_eq!(backend.upload_count(), 2);
    }

    #[test]
    fn test_begin_frame_clears_draws() {
        let mut backend = RecordingBackend::default();
        let handle = backend.create_buffer(Point3::new(32, 0, 0));
        backend.draw(&handle, 6);
        assert_eq!(backend.draws().len(), 1);
        backend.begin_frame(Matrix4::identity(), Point3::new(1.0, 2.0, 3.0));
        assert!(backend.draws().is_empty());
        assert_eq!(backend.frame_count(), 1);
        assert_eq!(backend.last_camera().1, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_released_buffers_are_not_drawn() {
        let mut backend = RecordingBackend::default();
        let handle = backend.create_buffer(Point3::new(0, 0, 0));
        backend.release(handle);
        backend.draw(&handle, 6);
        assert!(backend.draws().is_empty());
        assert_eq!(backend.live_buffers(), 0);
        assert!(backend.vertices(handle).is_none());
    }
}
