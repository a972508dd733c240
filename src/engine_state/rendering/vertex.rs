//! Vertex data structures and layouts for chunk rendering.
//!
//! This module defines the packed vertex format chunk meshes are uploaded in, and the
//! per-chunk instance data the vertex shader combines it with.
//!
//! # Packed Layout
//!
//! | bits  | field                          | range  |
//! |-------|--------------------------------|--------|
//! | 0-5   | x, chunk-local corner          | 0..=32 |
//! | 6-11  | y, chunk-local corner          | 0..=32 |
//! | 12-17 | z, chunk-local corner          | 0..=32 |
//! | 18-20 | ambient occlusion level        | 0..=3  |
//! | 21-22 | texture-coordinate corner      | 0..=3  |
//! | 23-31 | texture-array layer            | 0..512 |
//!
//! The shader decodes these fields with the same shifts, so the layout is a fixed
//! contract and must not change independently of the shader.

use cgmath::Point3;

const POSITION_BITS: u32 = 6;
const AO_BITS: u32 = 3;
const UV_BITS: u32 = 2;

const Y_SHIFT: u32 = POSITION_BITS;
const Z_SHIFT: u32 = POSITION_BITS * 2;
const AO_SHIFT: u32 = POSITION_BITS * 3;
const UV_SHIFT: u32 = AO_SHIFT + AO_BITS;
const LAYER_SHIFT: u32 = UV_SHIFT + UV_BITS;

const POSITION_MASK: u32 = (1 << POSITION_BITS) - 1;
const AO_MASK: u32 = (1 << AO_BITS) - 1;
const UV_MASK: u32 = (1 << UV_BITS) - 1;

/// One mesh vertex packed into a single 32-bit word.
///
/// # Memory Layout
/// A single `u32` (4 bytes); see the module documentation for the bit fields.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedVertex(pub u32);

impl PackedVertex {
    /// Packs the vertex fields into one word.
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - Chunk-local corner coordinates (0..=32)
    /// * `ao` - Ambient occlusion level (0 = darkest, 3 = unoccluded)
    /// * `uv_corner` - Which corner of the texture this vertex maps to (0..=3)
    /// * `texture_layer` - Layer in the block texture array
    #[inline]
    pub const fn pack(x: u8, y: u8, z: u8, ao: u8, uv_corner: u8, texture_layer: u16) -> Self {
        PackedVertex(
            x as u32
                | (y as u32) << Y_SHIFT
                | (z as u32) << Z_SHIFT
                | (ao as u32) << AO_SHIFT
                | (uv_corner as u32) << UV_SHIFT
                | (texture_layer as u32) << LAYER_SHIFT,
        )
    }

    /// Chunk-local X coordinate.
    pub const fn x(self) -> u8 {
        (self.0 & POSITION_MASK) as u8
    }

    /// Chunk-local Y coordinate.
    pub const fn y(self) -> u8 {
        ((self.0 >> Y_SHIFT) & POSITION_MASK) as u8
    }

    /// Chunk-local Z coordinate.
    pub const fn z(self) -> u8 {
        ((self.0 >> Z_SHIFT) & POSITION_MASK) as u8
    }

    /// Chunk-local position as a point.
    pub fn position(self) -> Point3<u8> {
        Point3::new(self.x(), self.y(), self.z())
    }

    /// Ambient occlusion level.
    pub const fn ao(self) -> u8 {
        ((self.0 >> AO_SHIFT) & AO_MASK) as u8
    }

    /// Texture-coordinate corner index.
    pub const fn uv_corner(self) -> u8 {
        ((self.0 >> UV_SHIFT) & UV_MASK) as u8
    }

    /// Texture-array layer.
    pub const fn texture_layer(self) -> u16 {
        (self.0 >> LAYER_SHIFT) as u16
    }

    /// Returns the vertex buffer layout for packed chunk vertices.
    ///
    /// # Shader Attributes
    /// - `location = 0`: packed vertex (u32)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PackedVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Uint32,
            }],
        }
    }
}

/// World-space origin of a chunk, bound as per-instance data alongside its vertices.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ChunkOrigin {
    /// Minimum corner X in world blocks
    pub x: i32,
    /// Minimum corner Y in world blocks
    pub y: i32,
    /// Minimum corner Z in world blocks
    pub z: i32,
}

impl From<Point3<i32>> for ChunkOrigin {
    fn from(origin: Point3<i32>) -> Self {
        ChunkOrigin {
            x: origin.x,
            y: origin.y,
            z: origin.z,
        }
    }
}

impl ChunkOrigin {
    /// Returns the instance buffer layout for chunk origins.
    ///
    /// # Shader Attributes
    /// - `location = 1`: chunk origin (i32, i32, i32)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ChunkOrigin>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 1,
                format: wgpu::VertexFormat::Sint32x3,
            }],
        }
    }
}
