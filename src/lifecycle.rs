//! Run-mode lifecycle transitions
//!
//! Orchestrates what happens to the drive base when the outer runtime moves
//! between run modes: speed-scale resets, odometry enable/disable, ramp-rate
//! reconfiguration, gyro-assist enablement, and the autonomous-to-teleop
//! pose carry-over.

use crate::config::{DrivetrainConfig, InputConfig};
use crate::drivers::{DriveBase, DriveController, DriveMotor};
use crate::types::{Pose2D, RunMode};

/// Mode lifecycle manager.
///
/// Owns the current speed scales and the transient end-of-auto pose. The
/// pose is captured when autonomous stops and consumed by the first teleop
/// start so the robot keeps its field localization across the transition.
pub struct ModeLifecycle {
    input: InputConfig,
    drivetrain: DrivetrainConfig,
    drive_scale: f64,
    turn_scale: f64,
    end_of_auto_pose: Option<Pose2D>,
}

impl ModeLifecycle {
    pub fn new(input: InputConfig, drivetrain: DrivetrainConfig) -> Self {
        let drive_scale = input.drive_fast_scale;
        let turn_scale = input.turn_fast_scale;
        Self {
            input,
            drivetrain,
            drive_scale,
            turn_scale,
            end_of_auto_pose: None,
        }
    }

    /// Current (drive, turn) speed scales.
    pub fn speed_scales(&self) -> (f64, f64) {
        (self.drive_scale, self.turn_scale)
    }

    /// Override the speed scales (e.g. a driver precision-mode toggle).
    pub fn set_speed_scales(&mut self, drive_scale: f64, turn_scale: f64) {
        self.drive_scale = drive_scale;
        self.turn_scale = turn_scale;
    }

    /// Switch between the configured slow and fast scale pairs.
    pub fn set_slow_mode(&mut self, slow: bool) {
        if slow {
            self.set_speed_scales(self.input.drive_slow_scale, self.input.turn_slow_scale);
        } else {
            self.set_speed_scales(self.input.drive_fast_scale, self.input.turn_fast_scale);
        }
    }

    /// Pending end-of-auto pose, if autonomous stopped and teleop has not
    /// consumed it yet.
    pub fn end_of_auto_pose(&self) -> Option<Pose2D> {
        self.end_of_auto_pose
    }

    /// Prepare the drive base before a run mode starts.
    pub fn start_mode(
        &mut self,
        mode: RunMode,
        _prev_mode: RunMode,
        drive_motors: &mut [Box<dyn DriveMotor>],
        base: &mut dyn DriveBase,
    ) {
        if mode == RunMode::Disabled {
            return;
        }

        self.set_slow_mode(false);
        if let Err(e) = base.set_odometry_enabled(true) {
            log::warn!("Odometry enable failed: {e}");
        }

        if mode == RunMode::Autonomous {
            // Full responsiveness for programmed paths.
            set_ramp_rate(drive_motors, 0.0);
        } else {
            set_ramp_rate(drive_motors, self.drivetrain.ramp_rate);

            if mode == RunMode::Teleop {
                if let Some(pose) = self.end_of_auto_pose.take() {
                    log::info!("Carrying end-of-auto pose into teleop: {pose}");
                    if let Err(e) = base.set_field_position(pose) {
                        log::warn!("End-of-auto pose restore failed: {e}");
                    }
                }
            }

            if self.drivetrain.gyro_assist_enabled {
                if let Err(e) = base.enable_gyro_assist(
                    self.drivetrain.max_turn_rate,
                    self.drivetrain.gyro_assist_gain,
                ) {
                    log::warn!("Gyro assist enable failed: {e}");
                }
            }
        }
    }

    /// Clean up the drive base right after a run mode has stopped.
    pub fn stop_mode(
        &mut self,
        mode: RunMode,
        _next_mode: RunMode,
        controllers: &mut [Box<dyn DriveController>],
        base: &mut dyn DriveBase,
    ) {
        if mode == RunMode::Disabled {
            return;
        }

        cancel_all(controllers, base);

        if self.drivetrain.gyro_assist_enabled {
            if let Err(e) = base.disable_gyro_assist() {
                log::warn!("Gyro assist disable failed: {e}");
            }
        }

        if mode == RunMode::Autonomous {
            let pose = base.field_position();
            log::info!("Captured end-of-auto pose: {pose}");
            self.end_of_auto_pose = Some(pose);
        }

        if let Err(e) = base.set_odometry_enabled(false) {
            log::warn!("Odometry disable failed: {e}");
        }
    }
}

/// Cancel any in-flight closed-loop drive operation and stop the base.
pub fn cancel_all(controllers: &mut [Box<dyn DriveController>], base: &mut dyn DriveBase) {
    for ctrl in controllers.iter_mut() {
        if ctrl.is_active() {
            if let Err(e) = ctrl.cancel(None) {
                log::warn!("Drive controller cancel failed: {e}");
            }
        }
    }
    if let Err(e) = base.stop() {
        log::warn!("Drive base stop failed: {e}");
    }
}

fn set_ramp_rate(drive_motors: &mut [Box<dyn DriveMotor>], seconds: f64) {
    for motor in drive_motors.iter_mut() {
        if let Err(e) = motor.set_open_loop_ramp(seconds) {
            // A single misconfigured wheel should not keep the robot from
            // driving in a degraded mode.
            log::warn!("Open-loop ramp config failed: {e}");
        }
    }
}
