use std::f64::consts::TAU;

/// Default spin rate, in radians per second.
pub const DEFAULT_ANGULAR_VELOCITY: f32 = 10.0;

/// Accumulated rotation about the vertical axis.
///
/// The angle accumulates without bound; it is stored as `f64` so that long
/// sessions do not lose sub-frame precision. Use [`wrapped_angle`] when a value
/// in `[0, 2π)` is needed.
///
/// [`wrapped_angle`]: RotationState::wrapped_angle
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RotationState {
    angle: f64,
    angular_velocity: f32,
}

impl RotationState {
    /// Creates a rotation at angle 0 spinning at `angular_velocity` rad/s.
    pub fn new(angular_velocity: f32) -> Self {
        Self {
            angle: 0.0,
            angular_velocity,
        }
    }

    /// Advances the angle by `dt * angular_velocity`.
    ///
    /// Negative or non-finite `dt` is treated as zero.
    pub fn advance(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        self.angle += f64::from(dt) * f64::from(self.angular_velocity);
    }

    /// Total accumulated angle in radians.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Accumulated angle reduced to `[0, 2π)`.
    #[inline]
    pub fn wrapped_angle(&self) -> f32 {
        self.angle.rem_euclid(TAU) as f32
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::new(DEFAULT_ANGULAR_VELOCITY)
    }
}
