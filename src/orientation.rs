//! Drive orientation state
//!
//! Holds the current driving-orientation mode and the heading reference it
//! implies. Switching to field-oriented driving re-zeroes the robot heading
//! so that "forward" becomes the direction the robot currently faces.

use crate::drivers::{DriveBase, OrientationIndicator};
use crate::types::DriveOrientation;

/// Orientation mode controller.
pub struct OrientationController {
    orientation: DriveOrientation,
    indicator: Box<dyn OrientationIndicator>,
}

impl OrientationController {
    pub fn new(indicator: Box<dyn OrientationIndicator>) -> Self {
        Self {
            orientation: DriveOrientation::Field,
            indicator,
        }
    }

    /// Current orientation mode.
    pub fn orientation(&self) -> DriveOrientation {
        self.orientation
    }

    /// Set the orientation mode, updating the driver indicator.
    ///
    /// Entering FIELD resets the stored heading so the current robot heading
    /// becomes field-zero. Indicator failures are logged, never propagated.
    pub fn set_orientation(&mut self, orientation: DriveOrientation, base: &mut dyn DriveBase) {
        self.orientation = orientation;

        if let Err(e) = self.indicator.show_orientation(orientation) {
            log::warn!("Orientation indicator update failed: {e}");
        }

        if orientation == DriveOrientation::Field {
            let pose = base.field_position().with_angle(0.0);
            if let Err(e) = base.set_field_position(pose) {
                log::warn!("Field heading reset failed: {e}");
            }
        }
    }

    /// Robot heading to be maintained in teleop drive for the current mode.
    pub fn heading_reference(&self, base: &dyn DriveBase) -> f64 {
        match self.orientation {
            DriveOrientation::Robot => 0.0,
            DriveOrientation::Inverted => 180.0,
            DriveOrientation::Field => base.heading(),
        }
    }
}
