//! Renderable geometry primitives

use crate::bounds::BoundingBox;
use crate::point::*;
use crate::ray::{Ray, RayHit};
use crate::transform::Transform3D;
use serde::{Deserialize, Serialize};

/// A triangle primitive as handed over by the asset loader.
///
/// `deformed` holds the final skinned or morphed positions when the loader
/// resolved them; vertex queries prefer them over the base positions.
/// `instances` lists per-instance transforms for instanced draws; a primitive
/// without instances is drawn once with the identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Primitive {
    pub positions: Vec<Point3d>,
    pub faces: Vec<[usize; 3]>,
    pub deformed: Option<Vec<Point3d>>,
    pub instances: Option<Vec<Transform3D>>,
}

impl Primitive {
    /// Create a new empty primitive
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a primitive from vertices and faces
    pub fn from_vertices_and_faces(positions: Vec<Point3d>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            positions,
            faces,
            deformed: None,
            instances: None,
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the primitive has no vertices
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Add a vertex to the primitive
    pub fn add_vertex(&mut self, vertex: Point3d) -> usize {
        let index = self.positions.len();
        self.positions.push(vertex);
        index
    }

    /// Add a face to the primitive
    pub fn add_face(&mut self, face: [usize; 3]) {
        self.faces.push(face);
    }

    /// Set deformed positions. Ignored unless there is one per vertex.
    pub fn set_deformed_positions(&mut self, deformed: Vec<Point3d>) {
        if deformed.len() == self.positions.len() {
            self.deformed = Some(deformed);
        }
    }

    /// Set per-instance transforms
    pub fn set_instances(&mut self, instances: Vec<Transform3D>) {
        self.instances = Some(instances);
    }

    /// Positions after deformation, falling back to the base positions
    pub fn resolved_positions(&self) -> &[Point3d] {
        match &self.deformed {
            Some(deformed) => deformed,
            None => &self.positions,
        }
    }

    /// Instance transforms; a single identity for non-instanced primitives
    pub fn instance_transforms(&self) -> Vec<Transform3D> {
        match &self.instances {
            Some(instances) => instances.clone(),
            None => vec![Transform3D::identity()],
        }
    }

    /// Bounds of the resolved positions in primitive space, ignoring instances
    pub fn local_bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.resolved_positions())
    }

    /// Closest face hit by `ray`, in primitive space (instances ignored).
    pub fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        let positions = self.resolved_positions();
        let mut closest: Option<RayHit> = None;
        for (face_index, face) in self.faces.iter().enumerate() {
            let [a, b, c] = *face;
            if a >= positions.len() || b >= positions.len() || c >= positions.len() {
                continue;
            }
            let Some(distance) = ray.intersect_triangle(&positions[a], &positions[b], &positions[c])
            else {
                continue;
            };
            if closest.as_ref().map_or(true, |hit| distance < hit.distance) {
                let normal = (positions[b] - positions[a])
                    .cross(&(positions[c] - positions[a]))
                    .try_normalize(f64::EPSILON)
                    .unwrap_or_else(Vector3d::zeros);
                closest = Some(RayHit {
                    distance,
                    point: ray.at(distance),
                    normal,
                    face_index,
                });
            }
        }
        closest
    }
}
