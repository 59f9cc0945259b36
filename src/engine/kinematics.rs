// Point kinematics: position, velocity and acceleration advanced once per tick.
//
// Units are maze cells and ticks. There is no delta time: the host runs the
// orchestrator at a fixed rate.

use glam::DVec2;

/// Damping for the target (looser, it coasts a little after input stops).
pub const TARGET_RESISTANCE: f64 = 0.2;
/// Damping for the camera (settles fast behind the target).
pub const CAMERA_RESISTANCE: f64 = 0.1;

/// A moving point.
///
/// Acceleration is written by input or by steering only; collision
/// resolution moves `position` and never touches the other two fields.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KinematicObject {
    pub position: DVec2,
    pub velocity: DVec2,
    pub acceleration: DVec2,
}

impl KinematicObject {
    /// At rest at `position`.
    pub fn at(position: DVec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Advance one tick.
    ///
    /// Position moves by the velocity of the previous tick, then velocity is
    /// blended with acceleration and damped by `resistance`. With zero
    /// acceleration velocity decays as `resistance^n`.
    pub fn integrate(&mut self, resistance: f64) {
        self.position += self.velocity;
        self.velocity = resistance * (self.velocity + self.acceleration);
    }
}
