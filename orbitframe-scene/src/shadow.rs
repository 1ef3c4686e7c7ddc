//! Contact shadow state
//!
//! Rendering the shadow map is left to the renderer. This type tracks what
//! the renderer needs to know (footprint, floor height, map resolution,
//! rotation, intensity) and whether any of it changed since the last render.

use orbitframe_core::{BoundingBox, Vector3d};
use serde::{Deserialize, Serialize};

const LOG_MAX_RESOLUTION: f64 = 9.0;
const LOG_MIN_RESOLUTION: f64 = 6.0;

/// Which side of the model the shadow is cast onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShadowSide {
    /// Ground shadow below the model
    #[default]
    Bottom,
    /// Wall shadow behind the model
    Back,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    intensity: f64,
    softness: f64,
    rotation: f64,
    scale: f64,
    offset: f64,
    side: ShadowSide,
    size: Vector3d,
    boundary: f64,
    needs_update: bool,
}

impl Shadow {
    pub fn new(bounds: &BoundingBox, softness: f64, side: ShadowSide) -> Self {
        let mut shadow = Self {
            intensity: 0.0,
            softness,
            rotation: 0.0,
            scale: 1.0,
            offset: 0.0,
            side,
            size: Vector3d::zeros(),
            boundary: 0.0,
            needs_update: true,
        };
        shadow.set_scene(bounds, softness, side);
        shadow
    }

    /// Refit the shadow to new model bounds
    pub fn set_scene(&mut self, bounds: &BoundingBox, softness: f64, side: ShadowSide) {
        self.side = side;
        self.size = bounds.size();
        self.boundary = if bounds.is_empty() {
            0.0
        } else {
            match side {
                ShadowSide::Bottom => bounds.min.y,
                ShadowSide::Back => bounds.min.z,
            }
        };
        self.set_softness(softness);
        self.needs_update = true;
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn set_intensity(&mut self, intensity: f64) {
        if intensity != self.intensity {
            self.intensity = intensity;
            self.needs_update = true;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.intensity > 0.0
    }

    pub fn softness(&self) -> f64 {
        self.softness
    }

    /// Map softness in [0, 1] to a power-of-two map resolution; softer is
    /// smaller and cheaper.
    pub fn set_softness(&mut self, softness: f64) {
        self.softness = softness.clamp(0.0, 1.0);
        self.needs_update = true;
    }

    pub fn map_resolution(&self) -> u32 {
        let log_resolution = LOG_MAX_RESOLUTION - self.softness * (LOG_MAX_RESOLUTION - LOG_MIN_RESOLUTION);
        2f64.powf(log_resolution.round()) as u32
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Global orientation about +Y, matching the model's yaw
    pub fn set_rotation(&mut self, radians_y: f64) {
        if radians_y != self.rotation {
            self.rotation = radians_y;
            self.needs_update = true;
        }
    }

    pub fn side(&self) -> ShadowSide {
        self.side
    }

    /// Scale the footprint and shift the receiving plane from the model's
    /// boundary by `offset` (generally negative).
    pub fn set_scale_and_offset(&mut self, scale: f64, offset: f64) {
        self.scale = scale;
        self.offset = offset;
        self.needs_update = true;
    }

    /// Width and depth of the receiving plane
    pub fn footprint(&self) -> (f64, f64) {
        match self.side {
            ShadowSide::Bottom => (self.size.x * self.scale, self.size.z * self.scale),
            ShadowSide::Back => (self.size.x * self.scale, self.size.y * self.scale),
        }
    }

    /// Position of the receiving plane along its normal axis
    pub fn plane_position(&self) -> f64 {
        self.boundary + self.offset
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Return whether a re-render is needed and clear the flag
    pub fn take_needs_update(&mut self) -> bool {
        std::mem::take(&mut self.needs_update)
    }
}
