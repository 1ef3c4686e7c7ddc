//! Point and vector types
//!
//! Framing math runs in double precision, so the scene works in `f64`
//! throughout.

use nalgebra::{Point2, Point3, Vector3};

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// A 2D point, used for normalized device coordinates
pub type Point2d = Point2<f64>;

/// Squared horizontal (XZ plane) length of a vector
#[inline]
pub fn radius_xz_squared(v: &Vector3d) -> f64 {
    v.x * v.x + v.z * v.z
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_radius_xz_ignores_height() {
        let v = Vector3d::new(3.0, 100.0, 4.0);
        assert_relative_eq!(radius_xz_squared(&v).sqrt(), 5.0);
    }
}
