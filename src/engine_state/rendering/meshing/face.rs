//! # Face Templates
//!
//! Fixed per-face data the mesh generator stamps out for every visible face:
//! which neighbour culls the face, the four corners with their ambient occlusion
//! sample offsets, and the two triangle windings.
//!
//! Corner `i` of every template maps to texture corner `i`:
//! 0 = (u0, v0), 1 = (u0, v1), 2 = (u1, v1), 3 = (u1, v0).
//! Corners 0 and 2 form the main diagonal, corners 1 and 3 the other one.
//!
//! All offsets are relative to the block being meshed. Edge and diagonal samples
//! lie in the plane directly in front of the face.

use cgmath::Vector3;

use crate::engine_state::voxels::block::block_side::BlockSide;

use super::ambient_occlusion::QuadDiagonal;

/// One corner of a face.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CornerTemplate {
    /// Offsets of the two voxels sharing an edge with this corner
    pub edges: [Vector3<i32>; 2],
    /// Offset of the voxel touching this corner diagonally
    pub diagonal: Vector3<i32>,
    /// Position of the corner relative to the block's minimum corner
    pub position: [u8; 3],
}

/// Everything needed to emit one face of a block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FaceTemplate {
    /// Which face this is
    pub side: BlockSide,
    /// Offset of the neighbour that hides this face when solid
    pub neighbour: Vector3<i32>,
    /// The four corners, indexed by texture corner
    pub corners: [CornerTemplate; 4],
    /// Corner order used when the main diagonal is brighter
    pub main_winding: [usize; 6],
    /// Corner order used otherwise
    pub flipped_winding: [usize; 6],
}

impl FaceTemplate {
    /// Returns the template for a face.
    #[inline]
    pub fn for_side(side: BlockSide) -> &'static FaceTemplate {
        &FACES[side as usize]
    }

    /// Returns the corner order for the chosen diagonal.
    #[inline]
    pub fn winding(&self, diagonal: QuadDiagonal) -> &[usize; 6] {
        match diagonal {
            QuadDiagonal::Main => &self.main_winding,
            QuadDiagonal::Flipped => &self.flipped_winding,
        }
    }
}

const fn v(x: i32, y: i32, z: i32) -> Vector3<i32> {
    Vector3::new(x, y, z)
}

const fn corner(
    edge_a: Vector3<i32>,
    edge_b: Vector3<i32>,
    diagonal: Vector3<i32>,
    position: [u8; 3],
) -> CornerTemplate {
    CornerTemplate {
        edges: [edge_a, edge_b],
        diagonal,
        position,
    }
}

/// Templates in `BlockSide` order.
static FACES: [FaceTemplate; 6] = [
    FaceTemplate {
        side: BlockSide::TOP,
        neighbour: v(0, 1, 0),
        corners: [
            corner(v(0, 1, -1), v(-1, 1, 0), v(-1, 1, -1), [0, 1, 0]),
            corner(v(-1, 1, 0), v(0, 1, 1), v(-1, 1, 1), [0, 1, 1]),
            corner(v(0, 1, 1), v(1, 1, 0), v(1, 1, 1), [1, 1, 1]),
            corner(v(0, 1, -1), v(1, 1, 0), v(1, 1, -1), [1, 1, 0]),
        ],
        main_winding: [0, 1, 2, 0, 2, 3],
        flipped_winding: [3, 0, 1, 3, 1, 2],
    },
    FaceTemplate {
        side: BlockSide::BOTTOM,
        neighbour: v(0, -1, 0),
        corners: [
            corner(v(0, -1, -1), v(-1, -1, 0), v(-1, -1, -1), [0, 0, 0]),
            corner(v(-1, -1, 0), v(0, -1, 1), v(-1, -1, 1), [0, 0, 1]),
            corner(v(0, -1, 1), v(1, -1, 0), v(1, -1, 1), [1, 0, 1]),
            corner(v(0, -1, -1), v(1, -1, 0), v(1, -1, -1), [1, 0, 0]),
        ],
        main_winding: [0, 2, 1, 0, 3, 2],
        flipped_winding: [3, 1, 0, 3, 2, 1],
    },
    FaceTemplate {
        side: BlockSide::RIGHT,
        neighbour: v(1, 0, 0),
        corners: [
            corner(v(1, 0, -1), v(1, -1, 0), v(1, -1, -1), [1, 0, 0]),
            corner(v(1, 0, -1), v(1, 1, 0), v(1, 1, -1), [1, 1, 0]),
            corner(v(1, 1, 0), v(1, 0, 1), v(1, 1, 1), [1, 1, 1]),
            corner(v(1, 0, 1), v(1, -1, 0), v(1, -1, 1), [1, 0, 1]),
        ],
        main_winding: [0, 1, 2, 0, 2, 3],
        flipped_winding: [1, 2, 3, 1, 3, 0],
    },
    FaceTemplate {
        side: BlockSide::LEFT,
        neighbour: v(-1, 0, 0),
        corners: [
            corner(v(-1, 0, -1), v(-1, -1, 0), v(-1, -1, -1), [0, 0, 0]),
            corner(v(-1, 0, -1), v(-1, 1, 0), v(-1, 1, -1), [0, 1, 0]),
            corner(v(-1, 1, 0), v(-1, 0, 1), v(-1, 1, 1), [0, 1, 1]),
            corner(v(-1, 0, 1), v(-1, -1, 0), v(-1, -1, 1), [0, 0, 1]),
        ],
        main_winding: [0, 2, 1, 0, 3, 2],
        flipped_winding: [3, 1, 0, 3, 2, 1],
    },
    FaceTemplate {
        side: BlockSide::FRONT,
        neighbour: v(0, 0, -1),
        corners: [
            corner(v(-1, 0, -1), v(0, -1, -1), v(-1, -1, -1), [0, 0, 0]),
            corner(v(-1, 0, -1), v(0, 1, -1), v(-1, 1, -1), [0, 1, 0]),
            corner(v(0, 1, -1), v(1, 0, -1), v(1, 1, -1), [1, 1, 0]),
            corner(v(0, -1, -1), v(1, 0, -1), v(1, -1, -1), [1, 0, 0]),
        ],
        main_winding: [0, 1, 2, 0, 2, 3],
        flipped_winding: [3, 0, 1, 3, 1, 2],
    },
    FaceTemplate {
        side: BlockSide::BACK,
        neighbour: v(0, 0, 1),
        corners: [
            corner(v(-1, 0, 1), v(0, -1, 1), v(-1, -1, 1), [0, 0, 1]),
            corner(v(-1, 0, 1), v(0, 1, 1), v(-1, 1, 1), [0, 1, 1]),
            corner(v(0, 1, 1), v(1, 0, 1), v(1, 1, 1), [1, 1, 1]),
            corner(v(0, -1, 1), v(1, 0, 1), v(1, -1, 1), [1, 0, 1]),
        ],
        main_winding: [0, 2, 1, 0, 3, 2],
        flipped_winding: [3, 1, 0, 3, 2, 1],
    },
];
