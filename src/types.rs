//! Core types shared across the drive-base subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalize an angle in degrees to the range [0, 360).
#[inline]
pub fn normalize_angle(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// A 2D field pose: position in inches, heading in degrees.
///
/// The heading is normalized to [0, 360). Poses are plain values; every
/// consumer receives a copy, there is no shared mutable pose anywhere in
/// the subsystem.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position (inches), positive toward the right field edge.
    pub x: f64,
    /// Y position (inches), positive away from the blue alliance wall.
    pub y: f64,
    /// Heading in degrees [0, 360).
    pub angle: f64,
}

impl Pose2D {
    /// Create a new pose, normalizing the heading.
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        Self {
            x,
            y,
            angle: normalize_angle(angle),
        }
    }

    /// Replace the heading, keeping the position.
    pub fn with_angle(self, angle: f64) -> Self {
        Self::new(self.x, self.y, angle)
    }
}

impl fmt::Display for Pose2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.1}°)", self.x, self.y, self.angle)
    }
}

/// Driving orientation mode.
///
/// Determines how joystick forward is interpreted when driving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriveOrientation {
    /// Forward is chassis-relative.
    Robot,
    /// Forward is field-absolute; heading reference is re-zeroed on entry.
    Field,
    /// Forward is chassis-relative, mirrored 180 degrees.
    Inverted,
}

/// Robot run modes driven by the outer mode-sequencing runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    Disabled,
    Autonomous,
    Teleop,
    Test,
}

/// Match alliance. Start zones of the two alliances are geometric mirror
/// images of each other about the field midline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alliance {
    Blue,
    Red,
}

/// Swerve wheel positions in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wheel {
    LeftFront,
    RightFront,
    LeftBack,
    RightBack,
}

impl Wheel {
    /// All wheels in canonical order: lf, rf, lb, rb. Calibration files and
    /// wheel arrays follow this order everywhere.
    pub const ALL: [Wheel; 4] = [
        Wheel::LeftFront,
        Wheel::RightFront,
        Wheel::LeftBack,
        Wheel::RightBack,
    ];

    /// Index into canonically ordered wheel arrays.
    pub fn index(self) -> usize {
        match self {
            Wheel::LeftFront => 0,
            Wheel::RightFront => 1,
            Wheel::LeftBack => 2,
            Wheel::RightBack => 3,
        }
    }
}

impl fmt::Display for Wheel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Wheel::LeftFront => "lf",
            Wheel::RightFront => "rf",
            Wheel::LeftBack => "lb",
            Wheel::RightBack => "rb",
        };
        write!(f, "{name}")
    }
}

/// Shaped joystick drive inputs: bounded x/y translation and rotation powers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DriveInputs {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(360.0), 0.0);
        assert_eq!(normalize_angle(540.0), 180.0);
        assert_eq!(normalize_angle(-90.0), 270.0);
    }

    #[test]
    fn test_pose_normalizes_heading() {
        let pose = Pose2D::new(1.0, 2.0, 450.0);
        assert_eq!(pose.angle, 90.0);
        assert_eq!(pose.with_angle(-180.0).angle, 180.0);
    }

    #[test]
    fn test_wheel_order() {
        for (i, wheel) in Wheel::ALL.iter().enumerate() {
            assert_eq!(wheel.index(), i);
        }
    }
}
