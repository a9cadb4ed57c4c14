//! Mock devices for hardware-free testing
//!
//! Each mock is a cheap `Clone` handle around shared state, so a test can
//! keep one handle for inspection while the drive base owns another boxed
//! as the driver trait object.

mod base;
mod motor;
mod sensor;
mod system;

pub use base::{MockDriveBase, MockDriveController};
pub use motor::{MockDriveMotor, MockSteerMotor};
pub use sensor::{MockAbsoluteEncoder, MockGyro};
pub use system::{MockIndicator, MockWatchdog};
