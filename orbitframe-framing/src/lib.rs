//! Framing and target damping for orbitframe
//!
//! This crate holds the numeric heart of the viewer:
//! - Vertex reduction over a scene graph
//! - Orbit-safe camera distance and field of view
//! - Critically damped smoothing
//! - Damped pivot tracking

pub mod damper;
pub mod reduce;
pub mod framing;
pub mod target;

pub use damper::*;
pub use reduce::*;
pub use framing::*;
pub use target::*;
