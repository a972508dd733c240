//! # Camera Implementation
//!
//! This module contains the free-flying camera the client renders the world with:
//! - `FlyCamera`: position and yaw/pitch orientation, with a cached frustum
//! - `Projection`: perspective projection settings
//!
//! ## Orientation
//! Yaw is measured from +X towards +Z, pitch from the horizon towards +Y. A camera
//! with zero yaw and pitch looks down +X.

use cgmath::*;
use std::f32::consts::FRAC_PI_2;

use super::{frustum::Frustum, Camera};

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// NDC depth is -1..1 in OpenGL and 0..1 in WGPU. This matrix:
/// 1. Scales the Z coordinate from [-1, 1] to [-0.5, 0.5]
/// 2. Translates the Z coordinate from [-0.5, 0.5] to [0, 1]
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Safe limit for pitch to prevent gimbal lock
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// Perspective projection settings.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view in radians
    fovy: Rad<f32>,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fovy` - Vertical field of view (can be any type convertible to `Rad<f32>`)
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Calculates the projection matrix in WGPU clip space.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// A first-person camera that moves freely through the world.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    /// The camera's position in world space
    position: Point3<f32>,
    /// Horizontal rotation (around Y axis) in radians
    yaw: Rad<f32>,
    /// Vertical rotation in radians, clamped short of straight up or down
    pitch: Rad<f32>,
    projection: Projection,
    view_projection: Matrix4<f32>,
    frustum: Frustum,
}

impl FlyCamera {
    /// Creates a camera at `position` with the given orientation.
    ///
    /// # Arguments
    /// * `position` - Eye position in world space
    /// * `yaw` - Horizontal rotation from +X towards +Z
    /// * `pitch` - Vertical rotation from the horizon
    /// * `projection` - Perspective settings
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
        projection: Projection,
    ) -> Self {
        let mut camera = FlyCamera {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
            projection,
            view_projection: Matrix4::identity(),
            frustum: Frustum::from_view_projection(Matrix4::identity()),
        };
        camera.refresh();
        camera
    }

    /// Eye position.
    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Normalized view direction.
    pub fn forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize()
    }

    /// Moves the eye to `position`.
    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
        self.refresh();
    }

    /// Moves relative to the current heading.
    ///
    /// # Arguments
    /// * `forward` - Distance along the horizontal view direction
    /// * `right` - Distance to the right of the view direction
    /// * `up` - Distance along +Y
    pub fn fly(&mut self, forward: f32, right: f32, up: f32) {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let ahead = Vector3::new(yaw_cos, 0.0, yaw_sin);
        let side = Vector3::new(-yaw_sin, 0.0, yaw_cos);
        self.position += ahead * forward + side * right + Vector3::unit_y() * up;
        self.refresh();
    }

    /// Turns the camera, clamping pitch short of vertical.
    pub fn rotate(&mut self, yaw: Rad<f32>, pitch: Rad<f32>) {
        self.yaw += yaw;
        self.pitch += pitch;
        if self.pitch < -Rad(SAFE_FRAC_PI_2) {
            self.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if self.pitch > Rad(SAFE_FRAC_PI_2) {
            self.pitch = Rad(SAFE_FRAC_PI_2);
        }
        self.refresh();
    }

    /// Calculates the view matrix for this camera.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }

    fn refresh(&mut self) {
        self.view_projection = self.projection.calc_matrix() * self.view_matrix();
        self.frustum = Frustum::from_view_projection(self.view_projection);
    }
}

impl Camera for FlyCamera {
    fn view_projection(&self) -> Matrix4<f32> {
        self.view_projection
    }

    fn eye_position(&self) -> Point3<f32> {
        self.position
    }

    fn is_box_visible(&self, min: Point3<f32>, max: Point3<f32>) -> bool {
        self.frustum.is_box_visible(min, max)
    }
}
