// Spring-to-target steering: acceleration proportional to displacement.

use glam::DVec2;

use super::kinematics::KinematicObject;

/// Conventional gain for the camera chasing the target.
pub const PURSUIT_GAIN: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringController {
    /// In (0, 1). Paired with the follower's resistance it decides how
    /// tightly the follower tracks.
    pub gain: f64,
}

impl Default for SteeringController {
    fn default() -> Self {
        Self { gain: PURSUIT_GAIN }
    }
}

impl SteeringController {
    pub fn new(gain: f64) -> Self {
        Self { gain }
    }

    /// Point `follower`'s acceleration at `leader`. Only acceleration changes;
    /// the next `integrate` turns it into motion.
    pub fn pursue(&self, follower: &mut KinematicObject, leader: DVec2) {
        follower.acceleration = self.gain * (leader - follower.position);
    }
}
