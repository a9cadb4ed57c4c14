//! Sensor driver traits

use crate::error::Result;

/// Absolute steering position encoder.
///
/// Accurate but slow and noisy; used as the reference the motor's internal
/// relative encoder is synchronized against, not for closed-loop control.
pub trait AbsoluteEncoder: Send {
    /// Current position as a fraction of one revolution in [0, 1).
    fn position(&self) -> Result<f64>;
}

/// Gyro / AHRS abstraction.
pub trait Gyro: Send {
    /// Integrated heading in degrees.
    fn heading(&self) -> f64;

    /// Pitch in degrees.
    fn pitch(&self) -> f64;

    /// Roll in degrees.
    fn roll(&self) -> f64;

    /// Magnetic compass heading in degrees, used for field-zero calibration.
    fn compass_heading(&self) -> f64;
}
