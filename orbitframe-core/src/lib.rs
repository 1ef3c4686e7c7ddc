//! Core data structures and traits for orbitframe
//!
//! This crate provides the geometry a viewer frames: points and transforms,
//! bounding boxes, triangle primitives, and the arena scene graph that holds
//! a loaded model together with its pivot and annotation markers.

pub mod point;
pub mod bounds;
pub mod mesh;
pub mod ray;
pub mod hotspot;
pub mod scene_graph;
pub mod traits;
pub mod transform;
pub mod error;

pub use point::*;
pub use bounds::*;
pub use mesh::*;
pub use ray::*;
pub use hotspot::*;
pub use scene_graph::*;
pub use traits::*;
pub use transform::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix4, Point2, Point3, UnitQuaternion, Vector3};
