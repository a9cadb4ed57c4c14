//! Field pose resolution
//!
//! Computes the robot's absolute starting pose from alliance and start slot,
//! mirrors poses across the field midline for the red alliance, and applies
//! the calibrated compass field-zero correction when one exists.

use crate::config::FieldConfig;
use crate::error::{Error, Result};
use crate::types::{Alliance, Pose2D};

/// Adjust a blue-alliance absolute pose for the given alliance.
///
/// The two alliance starting zones are geometric mirror images of one field:
/// blue poses pass through unchanged, red poses are reflected about the
/// field midline (y' = field_length - y) with heading rotated 180 degrees.
pub fn mirror_for_alliance(alliance: Alliance, pose: Pose2D, field_length: f64) -> Pose2D {
    match alliance {
        Alliance::Blue => pose,
        Alliance::Red => Pose2D::new(pose.x, field_length - pose.y, pose.angle + 180.0),
    }
}

/// Resolve the robot's starting pose.
///
/// An explicit pose wins; otherwise the pose comes from the configured
/// start-slot table for the given alliance.
pub fn resolve_start_pose(
    explicit: Option<Pose2D>,
    alliance: Alliance,
    start_slot: usize,
    field: &FieldConfig,
) -> Result<Pose2D> {
    if let Some(pose) = explicit {
        return Ok(pose);
    }

    let x = *field.start_slot_x.get(start_slot).ok_or_else(|| {
        Error::InvalidParameter(format!(
            "start slot {start_slot} out of range (0..{})",
            field.start_slot_x.len()
        ))
    })?;

    let blue = Pose2D::new(x, field.blue_start_y, field.blue_start_heading);
    Ok(mirror_for_alliance(alliance, blue, field.field_length))
}

/// Overwrite the pose heading from the compass if a field-zero calibration
/// exists; an uncalibrated robot keeps the pose heading untouched.
pub fn apply_compass_correction(
    pose: Pose2D,
    live_compass_heading: f64,
    field_zero: Option<f64>,
) -> Pose2D {
    match field_zero {
        Some(zero) => pose.with_angle(live_compass_heading - zero),
        None => pose,
    }
}
