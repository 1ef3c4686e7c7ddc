//! Annotation markers attached to the pivot

use crate::point::Vector3d;
use serde::{Deserialize, Serialize};

/// A pivot-attached annotation marker.
///
/// `normal` is the outward surface direction in model space. `shown` is the
/// facing state driven every frame; `visible` is the coarse switch used to
/// hide all markers during transitions. A marker is drawn only when both are
/// set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub name: String,
    pub normal: Vector3d,
    pub shown: bool,
    pub visible: bool,
    /// Absolute roll in radians; zero is upright
    pub orientation: f64,
}

impl Hotspot {
    pub fn new(name: impl Into<String>, normal: Vector3d) -> Self {
        Self {
            name: name.into(),
            normal,
            shown: true,
            visible: true,
            orientation: 0.0,
        }
    }

    pub fn show(&mut self) {
        self.shown = true;
    }

    pub fn hide(&mut self) {
        self.shown = false;
    }

    pub fn orient(&mut self, radians: f64) {
        self.orientation = radians;
    }

    /// Whether the marker should be drawn this frame
    pub fn is_drawn(&self) -> bool {
        self.shown && self.visible
    }
}
