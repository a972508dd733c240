//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the order in which the
//! mesh generator visits them.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The discriminants match the order faces are emitted into a chunk's vertex stream:
/// [TOP, BOTTOM, RIGHT, LEFT, FRONT, BACK]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The top face (facing positive Y)
    TOP = 0,

    /// The bottom face (facing negative Y)
    BOTTOM = 1,

    /// The right face (facing positive X)
    RIGHT = 2,

    /// The left face (facing negative X)
    LEFT = 3,

    /// The front face (facing negative Z)
    FRONT = 4,

    /// The back face (facing positive Z)
    BACK = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in emission order.
    ///
    /// # Returns
    /// An array containing all `BlockSide` variants.
    pub const fn all() -> [BlockSide; 6] {
        [
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::RIGHT,
            BlockSide::LEFT,
            BlockSide::FRONT,
            BlockSide::BACK,
        ]
    }

    /// Returns the unit offset from a block to the neighbour this face looks at.
    pub const fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::FRONT => Vector3::new(0, 0, -1),
            BlockSide::BACK => Vector3::new(0, 0, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normals_are_unit_and_distinct() {
        let normals: Vec<Vector3<i32>> = BlockSide::all().iter().map(|s| s.normal()).collect();
        for (i, n) in normals.iter().enumerate() {
            assert_eq!(n.x.abs() + n.y.abs() + n.z.abs(), 1);
            for other in &normals[i + 1..] {
                assert_ne!(n, other);
            }
        }
    }

    #[test]
    fn test_discriminants_follow_emission_order() {
        for (i, side) in BlockSide::all().iter().enumerate() {
            assert_eq!(*side as usize, i);
        }
    }
}
