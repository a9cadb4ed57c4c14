//! Drive base and closed-loop controller traits

use crate::error::Result;
use crate::types::Pose2D;

/// Odometry-enabled drive base.
///
/// The pose returned by [`field_position`](DriveBase::field_position) is a
/// copy; writing a new pose re-localizes the odometry.
pub trait DriveBase: Send {
    /// Current absolute field pose from odometry.
    fn field_position(&self) -> Pose2D;

    /// Overwrite the absolute field pose (robot re-localization).
    fn set_field_position(&mut self, pose: Pose2D) -> Result<()>;

    /// Current integrated heading in degrees.
    fn heading(&self) -> f64;

    /// Enable or disable odometry tracking.
    fn set_odometry_enabled(&mut self, enabled: bool) -> Result<()>;

    /// Enable gyro-assisted turning.
    ///
    /// # Arguments
    /// * `max_turn_rate` - maximum robot turn rate in degrees/sec
    /// * `gain` - assist turn gain
    fn enable_gyro_assist(&mut self, max_turn_rate: f64, gain: f64) -> Result<()>;

    /// Disable gyro-assisted turning.
    fn disable_gyro_assist(&mut self) -> Result<()>;

    /// Engage or release the anti-defense wheel lock (wheels in X formation).
    fn set_wheel_lock(&mut self, enabled: bool) -> Result<()>;

    /// Whether the anti-defense wheel lock is currently engaged.
    fn wheel_lock_enabled(&self) -> bool;

    /// Stop all drive outputs.
    fn stop(&mut self) -> Result<()>;
}

/// A closed-loop drive operation source (position PID drive, path follower).
///
/// These run in the external control library; the drive base only needs to
/// know whether one is active and how to cancel it. A cancel must make the
/// controller stop issuing outputs, not merely set a flag.
pub trait DriveController: Send {
    /// Whether a closed-loop operation is currently in flight.
    fn is_active(&self) -> bool;

    /// Cancel the in-flight operation on behalf of `owner` (None for an
    /// unconditional system-level cancel).
    fn cancel(&mut self, owner: Option<&str>) -> Result<()>;
}
