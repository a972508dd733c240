//! Rendering system for the voxel engine.
//!
//! This module contains everything between block data and draw calls: the packed
//! vertex format, the mesh generator, and the backends that own vertex buffers and
//! issue draws.
//!
//! # Architecture
//!
//! - `meshing`: converts a chunk's neighbourhood of blocks into packed vertices
//! - `vertex`: the packed vertex word and the per-chunk instance layout
//! - `backend`: the `RenderBackend` capability trait and an in-memory implementation
//! - `gpu_backend`: the wgpu implementation

pub mod backend;
pub mod gpu_backend;
pub mod meshing;
pub mod vertex;

// Re-export commonly used types
pub use backend::{DrawCall, RecordingBackend, RenderBackend};
pub use gpu_backend::GpuChunkBackend;
pub use meshing::MeshGenerator;
pub use vertex::PackedVertex;
