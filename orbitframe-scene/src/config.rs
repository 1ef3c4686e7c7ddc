//! Scene configuration

use crate::shadow::ShadowSide;
use orbitframe_core::Point3d;
use orbitframe_framing::DECAY_MILLISECONDS;
use serde::{Deserialize, Serialize};

/// Where the model is placed, which decides the side its shadow falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[default]
    Floor,
    Wall,
}

impl Placement {
    pub fn shadow_side(&self) -> ShadowSide {
        match self {
            Placement::Floor => ShadowSide::Bottom,
            Placement::Wall => ShadowSide::Back,
        }
    }
}

/// Initial settings of a [`crate::ModelScene`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Viewport width in CSS pixels
    pub width: f64,
    /// Viewport height in CSS pixels
    pub height: f64,
    /// Bound the model by its vertices instead of per-primitive boxes, and
    /// frame it about the current target rather than the box center
    pub tight_bounds: bool,
    /// Pivot in model coordinates; `None` centers it on the bounding box
    pub camera_target: Option<Point3d>,
    /// Decay time of target transitions, in milliseconds
    pub target_decay_ms: f64,
    pub shadow_intensity: f64,
    /// 0 is sharpest, 1 is softest
    pub shadow_softness: f64,
    pub placement: Placement,
    /// Suppress animation playback
    pub paused: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            tight_bounds: false,
            camera_target: None,
            target_decay_ms: DECAY_MILLISECONDS,
            shadow_intensity: 0.0,
            shadow_softness: 1.0,
            placement: Placement::Floor,
            paused: false,
        }
    }
}
