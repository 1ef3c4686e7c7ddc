//! Model scene orchestration
//!
//! [`ModelScene`] owns a loaded model and keeps it framed for an orbiting
//! camera:
//! - Load supersession through [`LoadToken`]s
//! - Bounding box, framing and field of view derivation
//! - Damped pivot and yaw
//! - Contact shadow and hotspot state
//! - Animation clip bookkeeping
//!
//! Drawing is left to the embedding renderer, which polls
//! [`ModelScene::advance_frame`] once per frame.

pub mod animation;
pub mod camera;
pub mod config;
pub mod hotspot;
pub mod loader;
pub mod model_scene;
pub mod shadow;

pub use animation::*;
pub use camera::*;
pub use config::*;
pub use loader::*;
pub use model_scene::*;
pub use shadow::*;
