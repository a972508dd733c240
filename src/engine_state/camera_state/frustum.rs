//! View frustum extraction and box visibility.
//!
//! Planes are pulled straight out of the view-projection matrix (Gribb-Hartmann).
//! The projection targets wgpu clip space, where depth runs from 0 to 1, so the
//! near plane is row 2 on its own rather than row 3 + row 2.

use cgmath::{Matrix4, Point3, Vector4};

/// A plane `normal · p + d = 0` with the normal pointing into the frustum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Normal X component
    pub a: f32,
    /// Normal Y component
    pub b: f32,
    /// Normal Z component
    pub c: f32,
    /// Offset from the origin
    pub d: f32,
}

impl Plane {
    fn from_row(row: Vector4<f32>) -> Self {
        let len = (row.x * row.x + row.y * row.y + row.z * row.z).sqrt();
        if len > 0.0 {
            Plane {
                a: row.x / len,
                b: row.y / len,
                c: row.z / len,
                d: row.w / len,
            }
        } else {
            Plane {
                a: row.x,
                b: row.y,
                c: row.z,
                d: row.w,
            }
        }
    }

    /// Signed distance from a point to the plane; positive is inside.
    #[inline]
    pub fn distance_to_point(&self, point: Point3<f32>) -> f32 {
        self.a * point.x + self.b * point.y + self.c * point.z + self.d
    }
}

/// The six clipping planes of a camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Left, right, bottom, top, near, far
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extracts the planes of a wgpu-style view-projection matrix.
    pub fn from_view_projection(m: Matrix4<f32>) -> Self {
        // cgmath stores columns; row i is the i-th component of every column
        let row = |i: usize| Vector4::new(m.x[i], m.y[i], m.z[i], m.w[i]);
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));

        Frustum {
            planes: [
                Plane::from_row(r3 + r0),
                Plane::from_row(r3 - r0),
                Plane::from_row(r3 + r1),
                Plane::from_row(r3 - r1),
                Plane::from_row(r2),
                Plane::from_row(r3 - r2),
            ],
        }
    }

    /// Returns `true` unless the box lies entirely outside one of the planes.
    ///
    /// Uses the positive-vertex test, so boxes near a frustum corner may be kept
    /// even though they are not visible. They are never wrongly rejected.
    pub fn is_box_visible(&self, min: Point3<f32>, max: Point3<f32>) -> bool {
        self.planes.iter().all(|plane| {
            let positive = Point3::new(
                if plane.a >= 0.0 { max.x } else { min.x },
                if plane.b >= 0.0 { max.y } else { min.y },
                if plane.c >= 0.0 { max.z } else { min.z },
            );
            plane.distance_to_point(positive) >= 0.0
        })
    }
}
