//! chakra-drive - Swerve drive-base control layer
//!
//! This library turns joystick input and run-mode transitions into
//! coordinated drive-base behavior for a swerve robot:
//!
//! - **Input shaping**: deadbanded joystick axes to bounded (x, y, rotation)
//!   motion intent with a configurable power curve and speed scales.
//! - **Orientation control**: robot-, field-, and inverted-oriented driving
//!   with heading-reference bookkeeping.
//! - **Steering synchronization**: re-anchoring each wheel's fast motor
//!   encoder to its absolute steering encoder at mode start, best-effort
//!   with a bounded timeout.
//! - **Ownership arbitration**: exclusive, named access to the drive base
//!   for contended operations such as the anti-defense wheel lock.
//! - **Mode lifecycle**: ramp-rate and odometry management across run-mode
//!   transitions, including the autonomous-to-teleop pose carry-over.
//! - **Field localization**: alliance-mirrored start poses and the
//!   compass-referenced field-zero calibration.
//!
//! PID control, path following, and the physical motor/sensor drivers are
//! external; the library consumes them through the traits in [`drivers`].
//! Mock implementations in [`devices::mock`] support hardware-free testing.

pub mod calibration;
pub mod config;
pub mod devices;
pub mod drive;
pub mod drivers;
pub mod error;
pub mod field;
pub mod input;
pub mod lifecycle;
pub mod orientation;
pub mod ownership;
pub mod sync;
pub mod types;

// Re-export commonly used types
pub use config::DriveConfig;
pub use drive::{DriveHardware, SwerveDrive};
pub use error::{Error, Result};
pub use sync::SyncOutcome;
pub use types::{Alliance, DriveInputs, DriveOrientation, Pose2D, RunMode, Wheel};
