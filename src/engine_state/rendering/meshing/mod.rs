//! Mesh generation for voxel chunks.
//!
//! This module turns the block data around one chunk into the packed vertex stream
//! the chunk shader draws.
//!
//! # Algorithm
//! For every solid block of the chunk, visited in y, z, x order:
//! 1. Each face (top, bottom, -x, +x, -z, +z) is culled unless the voxel in front
//!    of it is air. Voxels outside the world read as air, so faces on the world
//!    boundary are kept.
//! 2. Each face corner gets an AO level from its two edge neighbours and its
//!    diagonal neighbour.
//! 3. The quad is split along whichever diagonal keeps AO interpolation smooth.
//! 4. The face's texture layer comes from the `BlockCatalog`.
//!
//! Every emitted face is two triangles, six vertices, with no index buffer.
//!
//! # Architecture
//! - `MeshGenerator`: owns a reusable vertex buffer and runs the loop above
//! - `face`: per-face corner, AO sample and winding tables
//! - `ambient_occlusion`: AO level and diagonal selection
//!
//! # Performance Considerations
//! - One pass over the 32³ blocks of the chunk, up to six neighbour tests each
//! - At most three extra voxel reads per corner of a visible face
//! - The output buffer is kept between calls so steady-state meshing does not allocate

use cgmath::Point3;

pub mod ambient_occlusion;
pub mod face;

use ambient_occlusion::{choose_diagonal, vertex_ao};
use face::FaceTemplate;

use crate::engine_state::{
    rendering::vertex::PackedVertex,
    voxels::{
        block::{block_catalog::BlockCatalog, block_side::BlockSide, is_solid, AIR},
        chunk::CHUNK_WIDTH,
        voxel_grid::BlockSource,
    },
};

/// Vertices emitted per visible face.
pub const VERTICES_PER_FACE: usize = 6;

/// Builds packed vertex streams for chunks.
#[derive(Debug, Default)]
pub struct MeshGenerator {
    vertices: Vec<PackedVertex>,
}

impl MeshGenerator {
    /// Creates a generator with an empty scratch buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Meshes the chunk whose minimum corner is `origin`.
    ///
    /// The previous output is discarded. Neighbour samples may fall outside the
    /// chunk, and outside the world, so the block source must return air for any
    /// coordinate it does not hold.
    ///
    /// # Arguments
    /// * `source` - Read access to block data
    /// * `origin` - Minimum corner of the chunk in world-block coordinates
    ///
    /// # Returns
    /// The generated vertices, borrowed until the next call.
    pub fn generate<S: BlockSource + ?Sized>(
        &mut self,
        source: &S,
        origin: Point3<i32>,
    ) -> &[PackedVertex] {
        self.vertices.clear();

        for ly in 0..CHUNK_WIDTH {
            for lz in 0..CHUNK_WIDTH {
                for lx in 0..CHUNK_WIDTH {
                    let x = origin.x + lx;
                    let y = origin.y + ly;
                    let z = origin.z + lz;

                    let block = source.block_at(x, y, z);
                    if block == AIR {
                        continue;
                    }

                    let texture = BlockCatalog::texture_for(block);
                    let local = [lx as u8, ly as u8, lz as u8];

                    for side in BlockSide::all() {
                        let face = FaceTemplate::for_side(side);
                        let n = face.neighbour;
                        if is_solid(source.block_at(x + n.x, y + n.y, z + n.z)) {
                            continue;
                        }
                        self.emit_face(source, face, (x, y, z), local, texture.layer_for(side));
                    }
                }
            }
        }

        &self.vertices
    }

    fn emit_face<S: BlockSource + ?Sized>(
        &mut self,
        source: &S,
        face: &FaceTemplate,
        (x, y, z): (i32, i32, i32),
        local: [u8; 3],
        layer: u16,
    ) {
        let solid = |offset: cgmath::Vector3<i32>| {
            is_solid(source.block_at(x + offset.x, y + offset.y, z + offset.z))
        };

        let mut ao = [0u8; 4];
        for (level, corner) in ao.iter_mut().zip(face.corners.iter()) {
            *level = vertex_ao(
                solid(corner.edges[0]),
                solid(corner.edges[1]),
                solid(corner.diagonal),
            );
        }

        for &index in face.winding(choose_diagonal(ao)) {
            let position = face.corners[index].position;
            self.vertices.push(PackedVertex::pack(
                local[0] + position[0],
                local[1] + position[1],
                local[2] + position[2],
                ao[index],
                index as u8,
                layer,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::engine_state::voxels::{
        block::block_type::BlockType,
        voxel_grid::{GridDimensions, VoxelGrid},
    };

    const ORIGIN: Point3<i32> = Point3::new(0, 0, 0);

    fn one_chunk() -> VoxelGrid {
        VoxelGrid::new(GridDimensions::new(1, 1)).unwrap()
    }

    #[test]
    fn test_air_chunk_has_no_vertices() {
        let grid = one_chunk();
        let mut generator = MeshGenerator::new();
        assert!(generator.generate(&grid, ORIGIN).is_empty());
    }

    #[test]
    fn test_isolated_block_is_fully_lit() {
        let mut grid = one_chunk();
        grid.set(5, 5, 5, BlockType::STONE.id());
        let mut generator = MeshGenerator::new();
        let vertices = generator.generate(&grid, ORIGIN);
        assert_eq!(vertices.len(), 36);
        assert!(vertices.iter().all(|v| v.ao() == 3));
        assert!(vertices.iter().all(|v| v.texture_layer() == 3));
    }

    #[test]
    fn test_enclosed_solid_chunk_has_no_vertices() {
        // middle chunk of a 3x3x3 solid grid sees solid on every side
        let dims = GridDimensions::new(3, 3);
        let grid = VoxelGrid::from_bytes(dims, vec![BlockType::STONE.id(); dims.volume()]).unwrap();
        let mut generator = MeshGenerator::new();
        assert!(generator.generate(&grid, Point3::new(32, 32, 32)).is_empty());
    }

    #[test]
    fn test_solid_chunk_at_world_edge_keeps_outer_faces() {
        let dims = GridDimensions::new(1, 1);
        let grid = VoxelGrid::from_bytes(dims, vec![BlockType::STONE.id(); dims.volume()]).unwrap();
        let mut generator = MeshGenerator::new();
        let faces = generator.generate(&grid, ORIGIN).len() / VERTICES_PER_FACE;
        assert_eq!(faces, 6 * 32 * 32);
    }

    #[test]
    fn test_adjacent_blocks_cull_shared_faces() {
        let mut grid = one_chunk();
        grid.set(5, 5, 5, 4);
        grid.set(6, 5, 5, 4);
        let mut generator = MeshGenerator::new();
        assert_eq!(generator.generate(&grid, ORIGIN).len(), 10 * VERTICES_PER_FACE);
    }

    #[test]
    fn test_tied_ao_flips_the_quad() {
        let mut grid = one_chunk();
        grid.set(5, 5, 5, 4);
        // edge neighbour of top-face corners 0 and 1
        grid.set(4, 6, 5, 4);
        let mut generator = MeshGenerator::new();
        let vertices = generator.generate(&grid, ORIGIN);

        let top = &vertices[..VERTICES_PER_FACE];
        let corners: Vec<u8> = top.iter().map(|v| v.uv_corner()).collect();
        assert_eq!(corners, vec![3, 0, 1, 3, 1, 2]);
        assert_eq!(top[1].ao(), 2);
        assert_eq!(top[2].ao(), 2);
    }

    #[test]
    fn test_brighter_main_diagonal_keeps_normal_winding() {
        let mut grid = one_chunk();
        grid.set(5, 5, 5, 4);
        // diagonal neighbour of top-face corner 1 only
        grid.set(4, 6, 6, 4);
        let mut generator = MeshGenerator::new();
        let vertices = generator.generate(&grid, ORIGIN);

        let top = &vertices[..VERTICES_PER_FACE];
        let corners: Vec<u8> = top.iter().map(|v| v.uv_corner()).collect();
        assert_eq!(corners, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(top[1].ao(), 2);
    }

    #[test]
    fn test_two_solid_edges_fully_occlude_corner() {
        let mut grid = one_chunk();
        grid.set(5, 5, 5, 4);
        grid.set(5, 6, 4, 4);
        grid.set(4, 6, 5, 4);
        let mut generator = MeshGenerator::new();
        let vertices = generator.generate(&grid, ORIGIN);

        let top = &vertices[..VERTICES_PER_FACE];
        let corner_zero: Vec<_> = top.iter().filter(|v| v.uv_corner() == 0).collect();
        assert!(!corner_zero.is_empty());
        assert!(corner_zero.iter().all(|v| v.ao() == 0));
    }

    #[test]
    fn test_grass_uses_three_layers() {
        let mut grid = one_chunk();
        grid.set(10, 10, 10, BlockType::GRASS.id());
        let mut generator = MeshGenerator::new();
        let vertices = generator.generate(&grid, ORIGIN);
        let layers: HashSet<u16> = vertices.iter().map(|v| v.texture_layer()).collect();
        assert_eq!(layers, HashSet::from([0, 255, 3]));
    }

    #[test]
    fn test_positions_stay_in_packed_range() {
        let dims = GridDimensions::new(2, 1);
        let mut grid = VoxelGrid::new(dims).unwrap();
        let mut rng = fastrand::Rng::with_seed(3);
        for _ in 0..3000 {
            grid.set(rng.i32(0..64), rng.i32(0..32), rng.i32(0..64), rng.u8(1..10));
        }
        let mut generator = MeshGenerator::new();
        for origin in [Point3::new(0, 0, 0), Point3::new(32, 0, 0)] {
            for v in generator.generate(&grid, origin) {
                assert!(v.x() <= 32 && v.y() <= 32 && v.z() <= 32);
                assert!(v.ao() <= 3);
            }
        }
    }

    #[test]
    fn test_face_order_for_single_block() {
        let mut grid = one_chunk();
        grid.set(0, 0, 0, 4);
        let mut generator = MeshGenerator::new();
        let vertices = generator.generate(&grid, ORIGIN);
        // top face vertices all sit on y = 1, bottom on y = 0, then +x before -x
        assert!(vertices[0..6].iter().all(|v| v.y() == 1));
        assert!(vertices[6..12].iter().all(|v| v.y() == 0));
        assert!(vertices[12..18].iter().all(|v| v.x() == 1));
        assert!(vertices[18..24].iter().all(|v| v.x() == 0));
        assert!(vertices[24..30].iter().all(|v| v.z() == 0));
        assert!(vertices[30..36].iter().all(|v| v.z() == 1));
    }
}
