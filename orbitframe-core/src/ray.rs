//! Rays for picking against scene geometry

use crate::point::{Point3d, Vector3d};
use crate::transform::Transform3D;

/// A half-line with a normalized direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3d,
    pub direction: Vector3d,
}

/// A ray intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f64,
    pub point: Point3d,
    /// Geometric face normal in the space the ray was cast in
    pub normal: Vector3d,
    pub face_index: usize,
}

impl Ray {
    pub fn new(origin: Point3d, direction: Vector3d) -> Self {
        Self {
            origin,
            direction: direction.try_normalize(f64::EPSILON).unwrap_or(direction),
        }
    }

    /// Point at parameter `t` along the ray
    pub fn at(&self, t: f64) -> Point3d {
        self.origin + self.direction * t
    }

    /// Express the ray in another space. Distances are not preserved under
    /// scaling, so hits must be recomputed from points, not parameters.
    pub fn transformed(&self, transform: &Transform3D) -> Ray {
        let origin = transform.transform_point(&self.origin);
        let direction = transform.transform_vector(&self.direction);
        Ray::new(origin, direction)
    }

    /// Möller-Trumbore intersection. Both faces count as hits.
    pub fn intersect_triangle(&self, a: &Point3d, b: &Point3d, c: &Point3d) -> Option<f64> {
        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.direction.cross(&edge2);
        let det = edge1.dot(&p);
        if det.abs() < 1e-12 {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(&p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(&edge1);
        let v = self.direction.dot(&q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = edge2.dot(&q) * inv_det;
        (t >= 0.0).then_some(t)
    }
}
