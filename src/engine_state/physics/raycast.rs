//! Block picking by ray marching.
//!
//! The ray advances in `precision` equal steps up to `reach` blocks from the eye.
//! The first step that lands in a solid voxel gives the block the player would
//! break; the voxel of the step before it is where a new block would be placed.

use cgmath::{InnerSpace, Point3, Vector3};

use crate::engine_state::voxels::{block::is_solid, voxel_grid::BlockSource};

/// Default reach in blocks.
pub const REACH_DISTANCE: f32 = 5.0;
/// Default number of samples along the ray.
pub const RAY_PRECISION: u32 = 50;

/// The voxels a pick ray resolved to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockTarget {
    /// The solid voxel the ray hit
    pub breakable: Point3<i32>,
    /// The voxel just in front of the hit, along the ray
    pub placeable: Point3<i32>,
}

/// Converts a world-space point to the voxel containing it.
#[inline]
pub fn voxel_at(point: Point3<f32>) -> Point3<i32> {
    Point3::new(
        point.x.floor() as i32,
        point.y.floor() as i32,
        point.z.floor() as i32,
    )
}

/// Marches a ray from `eye` along `forward` and returns the first solid voxel hit.
///
/// # Arguments
/// * `source` - Block data to test against
/// * `eye` - Ray origin
/// * `forward` - Ray direction; normalised internally
/// * `reach` - Maximum distance in blocks
/// * `precision` - Number of samples along the ray
///
/// # Returns
/// `None` if nothing solid lies within reach.
pub fn pick_block<S: BlockSource + ?Sized>(
    source: &S,
    eye: Point3<f32>,
    forward: Vector3<f32>,
    reach: f32,
    precision: u32,
) -> Option<BlockTarget> {
    if precision == 0 || forward.magnitude2() == 0.0 {
        return None;
    }
    let step = forward.normalize() * (reach / precision as f32);

    let mut previous = voxel_at(eye);
    for i in 1..=precision {
        let sample = voxel_at(eye + step * i as f32);
        if is_solid(source.block_at(sample.x, sample.y, sample.z)) {
            return Some(BlockTarget {
                breakable: sample,
                placeable: previous,
            });
        }
        previous = sample;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::voxel_grid::{GridDimensions, VoxelGrid};

    fn grid_with_block(x: i32, y: i32, z: i32) -> VoxelGrid {
        let mut grid = VoxelGrid::new(GridDimensions::new(1, 1)).unwrap();
        grid.set(x, y, z, 4);
        grid
    }

    #[test]
    fn test_ray_hits_block_in_reach() {
        let grid = grid_with_block(10, 5, 5);
        let target = pick_block(
            &grid,
            Point3::new(7.55, 5.5, 5.5),
            Vector3::new(1.0, 0.0, 0.0),
            REACH_DISTANCE,
            RAY_PRECISION,
        )
        .unwrap();
        assert_eq!(target.breakable, Point3::new(10, 5, 5));
        assert_eq!(target.placeable, Point3::new(9, 5, 5));
    }

    #[test]
    fn test_ray_misses_block_out_of_reach() {
        let grid = grid_with_block(20, 5, 5);
        let target = pick_block(
            &grid,
            Point3::new(7.55, 5.5, 5.5),
            Vector3::new(1.0, 0.0, 0.0),
            REACH_DISTANCE,
            RAY_PRECISION,
        );
        assert!(target.is_none());
    }

    #[test]
    fn test_looking_down_places_on_top() {
        let grid = grid_with_block(3, 2, 3);
        let target = pick_block(
            &grid,
            Point3::new(3.5, 5.55, 3.5),
            Vector3::new(0.0, -1.0, 0.0),
            REACH_DISTANCE,
            RAY_PRECISION,
        )
        .unwrap();
        assert_eq!(target.breakable, Point3::new(3, 2, 3));
        assert_eq!(target.placeable, Point3::new(3, 3, 3));
    }

    #[test]
    fn test_degenerate_rays_hit_nothing() {
        let grid = grid_with_block(1, 1, 1);
        let eye = Point3::new(0.5, 1.5, 1.5);
        assert!(pick_block(&grid, eye, Vector3::new(0.0, 0.0, 0.0), 5.0, 50).is_none());
        assert!(pick_block(&grid, eye, Vector3::new(1.0, 0.0, 0.0), 5.0, 0).is_none());
    }
}
