//! # orbitframe
//!
//! Automatic framing and damped orbit targets for interactive 3D model viewers.
//!
//! This is the umbrella crate that provides convenient access to all orbitframe
//! functionality. You can use this crate to get everything in one place, or use
//! individual crates for more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Geometry and the scene graph (Primitive, BoundingBox, SceneGraph, etc.)
//! - **Framing**: Damper, vertex reducer, framing calculator and target tracker
//! - **Scene**: The `ModelScene` orchestrator with loading, shadow, hotspots and animation
//!
//! ## Quick Start
//!
//! ```rust
//! use orbitframe::prelude::*;
//!
//! let cube = Primitive::from_vertices_and_faces(
//!     vec![
//!         Point3d::new(-1.0, -1.0, -1.0),
//!         Point3d::new(1.0, -1.0, -1.0),
//!         Point3d::new(1.0, 1.0, 1.0),
//!         Point3d::new(-1.0, 1.0, 1.0),
//!     ],
//!     vec![[0, 1, 2], [0, 2, 3]],
//! );
//!
//! let mut scene = ModelScene::new(SceneConfig::default());
//! scene.set_object(LoadedModel::new(SceneGraph::from_primitive("cube", cube)))?;
//! assert!(scene.ideal_camera_distance() > 0.0);
//! # Ok::<(), orbitframe::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables framing and scene
//! - `framing`: Framing math without the orchestrator
//! - `scene`: The scene orchestrator (implies `framing`)

// Re-export core functionality
pub use orbitframe_core::*;

// Re-export sub-crates
#[cfg(feature = "framing")]
pub use orbitframe_framing as framing;

#[cfg(feature = "scene")]
pub use orbitframe_scene as scene;

/// Convenient imports for common use cases
pub mod prelude {
    pub use orbitframe_core::*;

    #[cfg(feature = "framing")]
    pub use orbitframe_framing::*;

    #[cfg(feature = "scene")]
    pub use orbitframe_scene::*;
}
