//! Player collision against the voxel grid.
//!
//! The player is an axis-aligned box. Each update gathers the solid blocks around
//! it, orders them nearest first, and pushes the box out of each one in turn along
//! the axis of least penetration. Resolving nearest first keeps the box from
//! catching on the seams between flush blocks.

use std::cmp::Ordering;

use cgmath::{InnerSpace, Point3, Vector3};

use crate::engine_state::voxels::{block::is_solid, voxel_grid::BlockSource};

/// Width of the player box along X and Z.
pub const PLAYER_WIDTH: f32 = 1.0;
/// Height of the player box.
pub const PLAYER_HEIGHT: f32 = 2.0;

/// A world axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Left-right
    X,
    /// Up-down
    Y,
    /// Front-back
    Z,
}

/// Axis-aligned box given by its minimum corner and extent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub position: Point3<f32>,
    /// Extent along each axis
    pub size: Vector3<f32>,
}

impl Aabb {
    /// Creates a box from its minimum corner and extent.
    pub fn new(position: Point3<f32>, size: Vector3<f32>) -> Self {
        Aabb { position, size }
    }

    /// The unit box occupying a voxel.
    pub fn block(voxel: Point3<i32>) -> Self {
        Aabb::new(
            Point3::new(voxel.x as f32, voxel.y as f32, voxel.z as f32),
            Vector3::new(1.0, 1.0, 1.0),
        )
    }

    /// Centre of the box.
    pub fn center(&self) -> Point3<f32> {
        self.position + self.size * 0.5
    }

    fn overlap(&self, other: &Aabb) -> Vector3<f32> {
        let max = self.position + self.size;
        let other_max = other.position + other.size;
        Vector3::new(
            max.x.min(other_max.x) - self.position.x.max(other.position.x),
            max.y.min(other_max.y) - self.position.y.max(other.position.y),
            max.z.min(other_max.z) - self.position.z.max(other.position.z),
        )
    }

    /// Returns `true` if the boxes share volume. Touching faces do not count.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let overlap = self.overlap(other);
        overlap.x > 0.0 && overlap.y > 0.0 && overlap.z > 0.0
    }

    /// Moves this box out of `other` along the axis of least penetration.
    ///
    /// # Returns
    /// The axis the box was moved along, or `None` if the boxes did not intersect.
    pub fn resolve_against(&mut self, other: &Aabb) -> Option<Axis> {
        let overlap = self.overlap(other);
        if overlap.x <= 0.0 || overlap.y <= 0.0 || overlap.z <= 0.0 {
            return None;
        }

        let axis = if overlap.x <= overlap.y && overlap.x <= overlap.z {
            Axis::X
        } else if overlap.y <= overlap.z {
            Axis::Y
        } else {
            Axis::Z
        };

        let centre = self.center();
        let other_centre = other.center();
        let (i, depth) = match axis {
            Axis::X => (0, overlap.x),
            Axis::Y => (1, overlap.y),
            Axis::Z => (2, overlap.z),
        };
        if centre[i] < other_centre[i] {
            self.position[i] -= depth;
        } else {
            self.position[i] += depth;
        }
        Some(axis)
    }
}

/// Result of resolving the player against the world.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CollisionOutcome {
    /// Corrected minimum corner of the player box
    pub position: Point3<f32>,
    /// Vertical velocity after landing, if any
    pub y_velocity: f32,
    /// Set when the player landed on a block this update
    pub grounded: bool,
}

/// Pushes the player box out of every solid block around it.
///
/// Blocks in a 3x4x3 neighbourhood of the voxel holding `position` are considered,
/// one below the player's feet up to two above. Landing on a block below while
/// falling stops vertical motion and reports the player as grounded.
///
/// # Arguments
/// * `source` - Block data to collide with
/// * `position` - Minimum corner of the player box
/// * `size` - Extent of the player box
/// * `y_velocity` - Current vertical velocity
pub fn collide_with_world<S: BlockSource + ?Sized>(
    source: &S,
    position: Point3<f32>,
    size: Vector3<f32>,
    y_velocity: f32,
) -> CollisionOutcome {
    let base = Point3::new(
        position.x.floor() as i32,
        position.y.floor() as i32,
        position.z.floor() as i32,
    );

    let mut blocks = Vec::with_capacity(36);
    for x in -1..=1 {
        for y in -1..=2 {
            for z in -1..=1 {
                let voxel = Point3::new(base.x + x, base.y + y, base.z + z);
                if is_solid(source.block_at(voxel.x, voxel.y, voxel.z)) {
                    blocks.push(Aabb::block(voxel));
                }
            }
        }
    }

    let player_centre = position + size * 0.5;
    let distance = move |block: &Aabb| (block.center() - player_centre).magnitude();
    // sort_by is stable, so equidistant blocks keep their scan order
    blocks.sort_by(|a, b| {
        distance(a)
            .partial_cmp(&distance(b))
            .unwrap_or(Ordering::Equal)
    });

    let mut outcome = CollisionOutcome {
        position,
        y_velocity,
        grounded: false,
    };
    for block in &blocks {
        let mut player = Aabb::new(outcome.position, size);
        if player.resolve_against(block) == Some(Axis::Y)
            && block.position.y < outcome.position.y
            && outcome.y_velocity < 0.0
        {
            outcome.grounded = true;
            outcome.y_velocity = 0.0;
        }
        outcome.position = player.position;
    }
    outcome
}
