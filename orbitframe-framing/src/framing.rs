//! Orbit-safe camera framing
//!
//! The camera orbits a pivot at a fixed distance. [`compute_framing`] finds
//! the smallest distance at which the model can never poke out of the default
//! field of view whatever the yaw and pitch, and how much wider than the
//! default the horizontal view must be at the vertical position where the
//! model comes closest to the camera. [`framed_field_of_view`] then turns that
//! into a vertical field of view for a concrete viewport aspect.

use crate::reduce::reduce_vertices;
use orbitframe_core::{radius_xz_squared, BoundingBox, NodeId, Point3d, SceneGraph};
use serde::{Deserialize, Serialize};

/// Default vertical field of view, in degrees
pub const DEFAULT_FOV_DEG: f64 = 45.0;

/// Half of the default vertical field of view, in radians
pub const DEFAULT_HALF_FOV: f64 = DEFAULT_FOV_DEG / 2.0 * std::f64::consts::PI / 180.0;

/// `sin(DEFAULT_HALF_FOV)`: a sphere of radius `r` fits the default view cone
/// at distance `r / safe_radius_ratio()`.
pub fn safe_radius_ratio() -> f64 {
    DEFAULT_HALF_FOV.sin()
}

/// `tan(DEFAULT_HALF_FOV)`
pub fn default_tan_fov() -> f64 {
    DEFAULT_HALF_FOV.tan()
}

/// Viewport-independent framing of a model about a pivot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Framing {
    /// Camera distance that keeps the whole model inside the default view
    pub ideal_camera_distance: f64,
    /// Required horizontal tangent relative to the default vertical tangent
    pub field_of_view_aspect: f64,
}

impl Framing {
    /// Framing from an externally measured bounding radius
    pub fn from_framed_radius(framed_radius: f64, field_of_view_aspect: f64) -> Self {
        Self {
            ideal_camera_distance: framed_radius / safe_radius_ratio(),
            field_of_view_aspect,
        }
    }

    /// Radius of the sphere about the pivot that this framing encloses
    pub fn framed_radius(&self) -> f64 {
        self.ideal_camera_distance * safe_radius_ratio()
    }
}

/// Bounds of every vertex under `root`, in `root`'s local space
pub fn tight_bounding_box(graph: &SceneGraph, root: NodeId) -> BoundingBox {
    reduce_vertices(graph, root, BoundingBox::empty(), |bounds, vertex| {
        bounds.expand_by_point(&vertex)
    })
}

/// Bounds from each primitive's own box; cheaper, but loose under rotation
pub fn loose_bounding_box(graph: &SceneGraph, root: NodeId) -> BoundingBox {
    graph.loose_bounds(root)
}

/// Distance and horizontal aspect that keep the model under `root` fully
/// visible at any orbit about `center`. Without a center, the tight bounding
/// box center is used.
///
/// Empty geometry yields a zero framing.
pub fn compute_framing(graph: &SceneGraph, root: NodeId, center: Option<Point3d>) -> Framing {
    let center = center.unwrap_or_else(|| tight_bounding_box(graph, root).center());

    let radius_squared = reduce_vertices(graph, root, 0.0_f64, |value, vertex| {
        value.max((vertex - center).norm_squared())
    });
    let framed_radius = radius_squared.sqrt();
    let ideal_camera_distance = framed_radius / safe_radius_ratio();

    // Widest horizontal angle, measured where the vertex sits closest to the
    // camera along the vertical axis.
    let horizontal_tan = reduce_vertices(graph, root, 0.0_f64, |value, vertex| {
        let offset = vertex - center;
        let radius_xz = radius_xz_squared(&offset).sqrt();
        value.max(radius_xz / (ideal_camera_distance - offset.y.abs()))
    });

    let framing = Framing {
        ideal_camera_distance,
        field_of_view_aspect: horizontal_tan / default_tan_fov(),
    };
    log::debug!(
        "framed radius {:.4} -> distance {:.4}, fov aspect {:.4}",
        framed_radius,
        framing.ideal_camera_distance,
        framing.field_of_view_aspect
    );
    framing
}

/// Vertical field of view in degrees for a viewport of `viewport_aspect`
/// (width / height). Wide viewports keep the default; narrow ones open the
/// vertical view until the horizontal coverage is preserved.
pub fn framed_field_of_view(field_of_view_aspect: f64, viewport_aspect: f64) -> f64 {
    let vertical = default_tan_fov() * (field_of_view_aspect / viewport_aspect).max(1.0);
    (2.0 * vertical.atan()).to_degrees()
}
