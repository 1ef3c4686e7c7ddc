//! Damped pivot tracking

use crate::damper::{Damper, SETTLING_TIME_MS};
use orbitframe_core::{Point3d, Vector3d};

/// Tracks the point the camera orbits around.
///
/// Goal and live values are kept as the translation of the pivot node, which
/// is the negated target: moving the model by `-target` puts the target on
/// the orbit origin. [`TargetTracker::target`] reports the non-negated goal.
#[derive(Debug, Clone, Default)]
pub struct TargetTracker {
    goal: Vector3d,
    live: Vector3d,
    dampers: [Damper; 3],
}

impl TargetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the point, in model coordinates, to transition toward
    pub fn set_goal(&mut self, target: Point3d) {
        self.goal = -target.coords;
    }

    /// The goal, in model coordinates
    pub fn target(&self) -> Point3d {
        Point3d::from(-self.goal)
    }

    /// Current translation of the pivot node
    pub fn pivot_translation(&self) -> Vector3d {
        self.live
    }

    pub fn is_converged(&self) -> bool {
        self.goal == self.live
    }

    /// Decay time of all three axis dampers
    pub fn set_decay_time(&mut self, decay_milliseconds: f64) {
        for damper in self.dampers.iter_mut() {
            damper.set_decay_time(decay_milliseconds);
        }
    }

    /// Advance the pivot toward the goal. `radius` is the framed camera
    /// distance, which scales the settle threshold. Returns whether the pivot
    /// moved.
    pub fn tick(&mut self, delta_ms: f64, radius: f64) -> bool {
        if self.is_converged() {
            return false;
        }
        let previous = self.live;
        for axis in 0..3 {
            self.live[axis] = self.dampers[axis].update(self.live[axis], self.goal[axis], delta_ms, radius);
        }
        self.live != previous
    }

    /// Move straight to the goal
    pub fn jump_to_goal(&mut self, radius: f64) -> bool {
        self.tick(SETTLING_TIME_MS, radius)
    }
}
