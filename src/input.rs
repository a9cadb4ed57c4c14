//! Joystick input shaping
//!
//! Converts raw, already-deadbanded controller axes into a bounded
//! (x, y, rotation) motion-intent vector. The translation vector is clamped
//! to unit magnitude, passed through a configurable power curve for stick
//! feel, then scaled by the current speed scales.

use crate::config::InputConfig;
use crate::types::DriveInputs;

/// Shapes raw joystick axes into drive powers.
#[derive(Debug, Clone)]
pub struct InputShaper {
    /// Power-curve exponent for the translation magnitude.
    curve_power: f64,
}

impl InputShaper {
    pub fn new(config: &InputConfig) -> Self {
        log::debug!(
            "InputShaper: curve_power={:.1}",
            config.curve_power
        );
        Self {
            curve_power: config.curve_power,
        }
    }

    /// Shape raw axis readings into bounded drive inputs.
    ///
    /// # Arguments
    /// * `x`, `y` - translation axes, deadband already applied
    /// * `rotation` - rotation axis, deadband already applied
    /// * `drive_scale` - current translation speed scale
    /// * `turn_scale` - current rotation speed scale
    pub fn shape(
        &self,
        x: f64,
        y: f64,
        rotation: f64,
        drive_scale: f64,
        turn_scale: f64,
    ) -> DriveInputs {
        let mut x = x;
        let mut y = y;
        let mut mag = x.hypot(y);

        if mag > 1.0 {
            x /= mag;
            y /= mag;
            mag = 1.0;
        }

        let new_mag = mag.powf(self.curve_power) * drive_scale;
        let rotation = rotation * turn_scale;

        // Zero magnitude short-circuits to (0, 0); no division by zero.
        if mag != 0.0 {
            x *= new_mag / mag;
            y *= new_mag / mag;
        }

        DriveInputs { x, y, rotation }
    }
}
