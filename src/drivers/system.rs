//! System service traits: watchdog and orientation indicator

use crate::error::Result;
use crate::types::DriveOrientation;

/// Liveness watchdog for the control loop.
///
/// The steering synchronizer legitimately blocks for up to its timeout, so
/// it must pause the watchdog for that duration; a watchdog trip during
/// synchronization would be a health false positive, not a real fault.
pub trait Watchdog: Send {
    /// Suspend the liveness timeout.
    fn pause(&mut self);

    /// Resume the liveness timeout.
    fn resume(&mut self);
}

/// Driver-facing indicator (LED strip, dashboard light) showing the current
/// drive orientation mode. Indicator failures must never fail the caller.
pub trait OrientationIndicator: Send {
    /// Show the given orientation mode.
    fn show_orientation(&mut self, orientation: DriveOrientation) -> Result<()>;
}
