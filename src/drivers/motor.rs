//! Motor driver traits

use crate::error::Result;

/// Steering (azimuth) motor of one swerve module.
///
/// The motor carries a fast internal relative encoder that drifts or resets
/// on power cycle. It is re-anchored against the module's absolute encoder
/// by the steering synchronizer.
pub trait SteerMotor: Send {
    /// Current internal relative encoder position in counts.
    fn relative_position(&self) -> Result<f64>;

    /// Overwrite the internal relative encoder register.
    ///
    /// Used to force-correct drift against the absolute encoder reference.
    fn set_relative_position(&mut self, counts: f64) -> Result<()>;

    /// Command the module steering angle in degrees.
    ///
    /// # Arguments
    /// * `angle` - Target steering angle in degrees
    /// * `optimize` - true to allow the shortest rotation (possibly ending
    ///   180 degrees off with drive direction reversed), false to go to the
    ///   absolute angle
    fn set_steer_angle(&mut self, angle: f64, optimize: bool) -> Result<()>;
}

/// Drive (velocity) motor of one swerve module.
pub trait DriveMotor: Send {
    /// Configure the open-loop ramp time in seconds from zero to full
    /// output. Zero disables ramping.
    fn set_open_loop_ramp(&mut self, seconds: f64) -> Result<()>;
}
