//! Core traits for orbitframe

use crate::{bounds::BoundingBox, mesh::Primitive, point::*, scene_graph::SceneGraph, transform::Transform3D};

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> BoundingBox;

    /// Get the center point of the object
    fn center(&self) -> Point3d {
        self.bounding_box().center()
    }
}

/// Trait for objects that can be transformed
pub trait Transformable {
    /// Apply a transformation to the object
    fn transform(&mut self, transform: &Transform3D);
}

impl Drawable for Primitive {
    fn bounding_box(&self) -> BoundingBox {
        let local = self.local_bounds();
        self.instance_transforms()
            .iter()
            .fold(BoundingBox::empty(), |bounds, instance| {
                bounds.union(&local.transformed(instance))
            })
    }
}

impl Drawable for SceneGraph {
    fn bounding_box(&self) -> BoundingBox {
        self.loose_bounds(self.root())
    }
}

impl Transformable for Primitive {
    fn transform(&mut self, transform: &Transform3D) {
        for p in self.positions.iter_mut() {
            *p = transform.transform_point(p);
        }
        if let Some(deformed) = self.deformed.as_mut() {
            for p in deformed.iter_mut() {
                *p = transform.transform_point(p);
            }
        }
    }
}

impl Transformable for SceneGraph {
    /// Bake `transform` into the root so every descendant moves with it.
    fn transform(&mut self, transform: &Transform3D) {
        let root = self.root();
        if let Some(node) = self.get_mut(root) {
            node.transform = *transform * node.transform;
        }
    }
}
