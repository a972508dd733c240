//! # Camera State Management
//!
//! This module defines what the world needs from a camera and ships a free-flying
//! implementation of it.
//!
//! ## Core Components
//! - `Camera`: the capability trait the world renders against
//! - `FlyCamera`: first-person camera with yaw/pitch orientation
//! - `Projection`: perspective projection in WGPU clip space
//! - `Frustum`: clipping planes used for chunk visibility

use cgmath::{Matrix4, Point3};

pub mod camera;
pub mod frustum;

pub use camera::{FlyCamera, Projection};
pub use frustum::Frustum;

/// The view the world is rendered from.
pub trait Camera {
    /// Combined projection and view matrix in WGPU clip space.
    fn view_projection(&self) -> Matrix4<f32>;

    /// Eye position in world space.
    fn eye_position(&self) -> Point3<f32>;

    /// Returns `true` if any part of the box may be on screen.
    fn is_box_visible(&self, min: Point3<f32>, max: Point3<f32>) -> bool;
}
