//! Critically damped scalar smoothing
//!
//! A [`Damper`] moves a value toward a goal along the exact solution of a
//! critically damped second-order system, so the motion never overshoots and
//! a frame-rate change does not change the trajectory. Each damper owns one
//! velocity; use one per axis.

/// Default decay time in milliseconds
pub const DECAY_MILLISECONDS: f64 = 50.0;

/// A time step long enough for any damper to settle on its goal
pub const SETTLING_TIME_MS: f64 = 10000.0;

const MIN_DECAY_MILLISECONDS: f64 = 0.001;

/// Fraction of the natural frequency (per unit of scale) below which the
/// motion is considered finished.
const NIL_SPEED_RATIO: f64 = 0.0002;

#[derive(Debug, Clone, PartialEq)]
pub struct Damper {
    velocity: f64,
    natural_frequency: f64,
}

impl Damper {
    pub fn new(decay_milliseconds: f64) -> Self {
        let mut damper = Self {
            velocity: 0.0,
            natural_frequency: 0.0,
        };
        damper.set_decay_time(decay_milliseconds);
        damper
    }

    /// Time constant of the approach. Takes effect on the next update.
    pub fn set_decay_time(&mut self, decay_milliseconds: f64) {
        self.natural_frequency = 1.0 / decay_milliseconds.max(MIN_DECAY_MILLISECONDS);
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Advance `x` toward `x_goal` by `time_step_ms`.
    ///
    /// `x_normalization` is the scale of the motion (typically the framed
    /// camera distance); the settle threshold is proportional to it so large
    /// models finish their approach in the same time as small ones. A zero
    /// scale jumps straight to the goal.
    pub fn update(&mut self, x: f64, x_goal: f64, time_step_ms: f64, x_normalization: f64) -> f64 {
        let nil_speed = NIL_SPEED_RATIO * self.natural_frequency;

        if x_normalization == 0.0 || (x == x_goal && self.velocity == 0.0) {
            return x_goal;
        }
        if time_step_ms < 0.0 {
            return x;
        }

        // acceleration = w^2 * (goal - x) - 2 * w * velocity
        let omega = self.natural_frequency;
        let delta_x = x - x_goal;
        let intermediate_velocity = self.velocity + omega * delta_x;
        let intermediate_x = delta_x + time_step_ms * intermediate_velocity;
        let decay = (-omega * time_step_ms).exp();
        let new_velocity = (intermediate_velocity - omega * intermediate_x) * decay;
        let acceleration = -omega * (new_velocity + intermediate_velocity * decay);

        if new_velocity.abs() < nil_speed * x_normalization.abs() && acceleration * delta_x >= 0.0 {
            self.velocity = 0.0;
            x_goal
        } else {
            self.velocity = new_velocity;
            x_goal + intermediate_x * decay
        }
    }
}

impl Default for Damper {
    fn default() -> Self {
        Self::new(DECAY_MILLISECONDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_step_keeps_value() {
        let mut damper = Damper::default();
        let next = damper.update(1.0, 0.0, 0.0, 10.0);
        assert_relative_eq!(next, 1.0);
    }

    #[test]
    fn test_negative_step_keeps_value() {
        let mut damper = Damper::default();
        assert_eq!(damper.update(1.0, 0.0, -16.0, 10.0), 1.0);
    }

    #[test]
    fn test_settling_time_reaches_goal_exactly() {
        let mut damper = Damper::default();
        let next = damper.update(3.0, -2.0, SETTLING_TIME_MS, 5.0);
        assert_eq!(next, -2.0);
        assert_eq!(damper.velocity(), 0.0);
    }

    #[test]
    fn test_zero_scale_jumps_to_goal() {
        let mut damper = Damper::default();
        assert_eq!(damper.update(3.0, 1.0, 16.0, 0.0), 1.0);
    }

    #[test]
    fn test_monotonic_convergence() {
        for decay in [1.0, 50.0, 400.0] {
            for step in [1.0, 16.0, 100.0] {
                let mut damper = Damper::new(decay);
                let goal = 2.0;
                let mut x: f64 = -8.0;
                let mut error = (x - goal).abs();
                let mut steps = 0;
                while error > 0.0 && steps < 100_000 {
                    x = damper.update(x, goal, step, 10.0);
                    let next_error = (x - goal).abs();
                    assert!(next_error < error, "decay {decay} step {step}: {next_error} !< {error}");
                    error = next_error;
                    steps += 1;
                }
                assert_eq!(x, goal);
                assert_eq!(damper.velocity(), 0.0);
                // Settled dampers stay put.
                assert_eq!(damper.update(x, goal, step, 10.0), goal);
            }
        }
    }

    #[test]
    fn test_decay_time_changes_speed() {
        let mut fast = Damper::new(10.0);
        let mut slow = Damper::new(1000.0);
        let fast_x = fast.update(1.0, 0.0, 16.0, 1.0);
        let slow_x = slow.update(1.0, 0.0, 16.0, 1.0);
        assert!(fast_x < slow_x);

        slow.set_decay_time(10.0);
        let mut reference = Damper::new(10.0);
        reference.velocity = slow.velocity;
        assert_relative_eq!(slow.update(slow_x, 0.0, 16.0, 1.0), reference.update(slow_x, 0.0, 16.0, 1.0));
    }
}
