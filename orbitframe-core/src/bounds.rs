//! Axis-aligned bounding boxes

use crate::point::{Point3d, Vector3d};
use crate::transform::Transform3D;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box. The empty box has inverted infinite bounds
/// so that expanding it by any point yields that point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3d,
    pub max: Point3d,
}

impl BoundingBox {
    /// An empty box
    pub fn empty() -> Self {
        Self {
            min: Point3d::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3d::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Create a box from explicit corners
    pub fn new(min: Point3d, max: Point3d) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3d>) -> Self {
        points
            .into_iter()
            .fold(Self::empty(), |bounds, p| bounds.expand_by_point(p))
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Grow the box to include `point`
    pub fn expand_by_point(mut self, point: &Point3d) -> Self {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
        self
    }

    /// Smallest box containing both boxes
    pub fn union(self, other: &BoundingBox) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Center of the box, or the origin when empty
    pub fn center(&self) -> Point3d {
        if self.is_empty() {
            return Point3d::origin();
        }
        nalgebra::center(&self.min, &self.max)
    }

    /// Extent along each axis, or zero when empty
    pub fn size(&self) -> Vector3d {
        if self.is_empty() {
            return Vector3d::zeros();
        }
        self.max - self.min
    }

    /// The eight corners of the box
    pub fn corners(&self) -> [Point3d; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3d::new(a.x, a.y, a.z),
            Point3d::new(b.x, a.y, a.z),
            Point3d::new(a.x, b.y, a.z),
            Point3d::new(b.x, b.y, a.z),
            Point3d::new(a.x, a.y, b.z),
            Point3d::new(b.x, a.y, b.z),
            Point3d::new(a.x, b.y, b.z),
            Point3d::new(b.x, b.y, b.z),
        ]
    }

    /// Axis-aligned box enclosing this box after `transform`
    pub fn transformed(&self, transform: &Transform3D) -> Self {
        if self.is_empty() {
            return *self;
        }
        self.corners()
            .iter()
            .fold(Self::empty(), |bounds, c| {
                bounds.expand_by_point(&transform.transform_point(c))
            })
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_box_has_zero_center_and_size() {
        let bounds = BoundingBox::empty();
        assert!(bounds.is_empty());
        assert_eq!(bounds.center(), Point3d::origin());
        assert_eq!(bounds.size(), Vector3d::zeros());
    }

    #[test]
    fn test_expand_by_point() {
        let bounds = BoundingBox::empty()
            .expand_by_point(&Point3d::new(1.0, -2.0, 0.5))
            .expand_by_point(&Point3d::new(-1.0, 2.0, 0.0));
        assert_eq!(bounds.min, Point3d::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Point3d::new(1.0, 2.0, 0.5));
        assert_relative_eq!(bounds.center(), Point3d::new(0.0, 0.0, 0.25));
        assert_relative_eq!(bounds.size(), Vector3d::new(2.0, 4.0, 0.5));
    }

    #[test]
    fn test_transformed_box_encloses_rotation() {
        let bounds = BoundingBox::new(Point3d::new(-1.0, 0.0, -1.0), Point3d::new(1.0, 1.0, 1.0));
        let rotated = bounds.transformed(&Transform3D::rotation_y(std::f64::consts::FRAC_PI_4));
        let half = 2.0_f64.sqrt();
        assert_relative_eq!(rotated.max.x, half, epsilon = 1e-12);
        assert_relative_eq!(rotated.min.z, -half, epsilon = 1e-12);
        assert_relative_eq!(rotated.max.y, 1.0, epsilon = 1e-12);
    }
}
