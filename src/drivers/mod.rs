//! Device driver traits
//!
//! Narrow trait seams for the external hardware and control-library objects
//! the drive base consumes. The closed-loop controllers, path follower, and
//! motor/encoder internals are black boxes behind these interfaces.

pub mod base;
pub mod motor;
pub mod sensor;
pub mod system;

pub use base::{DriveBase, DriveController};
pub use motor::{DriveMotor, SteerMotor};
pub use sensor::{AbsoluteEncoder, Gyro};
pub use system::{OrientationIndicator, Watchdog};
