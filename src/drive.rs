//! Swerve drive-base subsystem
//!
//! Wires the configuration, calibration store, and control components to the
//! device drivers, and exposes the surface the teleop/autonomous control
//! code calls: shaped drive inputs, orientation switching, mode lifecycle
//! hooks, field localization, anti-defense wheel locking, and steering
//! encoder synchronization.

use crate::calibration::{self, SteerCalibration};
use crate::config::DriveConfig;
use crate::drivers::{
    AbsoluteEncoder, DriveBase, DriveController, DriveMotor, Gyro, OrientationIndicator,
    SteerMotor, Watchdog,
};
use crate::error::Result;
use crate::field;
use crate::input::InputShaper;
use crate::lifecycle::{self, ModeLifecycle};
use crate::orientation::OrientationController;
use crate::ownership::DriveOwnership;
use crate::sync::{SteerEncoderSync, SwerveWheel, SyncOutcome};
use crate::types::{Alliance, DriveInputs, DriveOrientation, Pose2D, RunMode, Wheel};
use parking_lot::Mutex;
use std::sync::Arc;

/// Device handles for one swerve drive base.
///
/// Steering motors and encoders are in canonical wheel order (lf, rf, lb,
/// rb). Encoders are raw; the subsystem applies the calibrated zero offsets.
pub struct DriveHardware {
    pub steer_motors: [Box<dyn SteerMotor>; 4],
    pub steer_encoders: [Box<dyn AbsoluteEncoder>; 4],
    pub drive_motors: Vec<Box<dyn DriveMotor>>,
    pub base: Box<dyn DriveBase>,
    pub gyro: Box<dyn Gyro>,
    /// Closed-loop drive operation sources (position PID drive, path
    /// follower). All are cancelled on mode stop.
    pub controllers: Vec<Box<dyn DriveController>>,
    pub watchdog: Box<dyn Watchdog>,
    pub indicator: Box<dyn OrientationIndicator>,
}

/// The swerve drive-base subsystem.
pub struct SwerveDrive {
    config: DriveConfig,
    /// Shared with the [`ZeroedEncoder`] wrappers so a calibration save is
    /// visible to the wheel encoders immediately.
    calibration: Arc<Mutex<SteerCalibration>>,
    shaper: InputShaper,
    orientation: OrientationController,
    lifecycle: ModeLifecycle,
    ownership: DriveOwnership,
    sync: SteerEncoderSync,
    wheels: Vec<SwerveWheel>,
    drive_motors: Vec<Box<dyn DriveMotor>>,
    base: Box<dyn DriveBase>,
    gyro: Box<dyn Gyro>,
    controllers: Vec<Box<dyn DriveController>>,
    watchdog: Box<dyn Watchdog>,
}

/// Zero-adjusted view of a raw absolute encoder.
///
/// Reads the zero offset through the shared calibration on every sample, so
/// a persisted recalibration takes effect without rebuilding the subsystem.
struct ZeroedEncoder {
    raw: Box<dyn AbsoluteEncoder>,
    wheel: Wheel,
    calibration: Arc<Mutex<SteerCalibration>>,
}

impl AbsoluteEncoder for ZeroedEncoder {
    fn position(&self) -> Result<f64> {
        let zero = self.calibration.lock().zero(self.wheel);
        Ok((self.raw.position()? - zero).rem_euclid(1.0))
    }
}

impl SwerveDrive {
    /// Create the drive subsystem.
    ///
    /// Loads the steering zero calibration and seeds each steering motor's
    /// relative encoder from its zero-adjusted absolute encoder. A wheel
    /// whose seeding fails is logged and left in its prior state; one
    /// misconfigured wheel must not keep the robot from driving degraded.
    pub fn new(config: DriveConfig, hardware: DriveHardware) -> Self {
        let calibration = Arc::new(Mutex::new(SteerCalibration::load(
            &config.calibration.dir,
            config.calibration.steer_zero_defaults,
        )));

        let DriveHardware {
            steer_motors,
            steer_encoders,
            drive_motors,
            base,
            gyro,
            controllers,
            watchdog,
            indicator,
        } = hardware;

        let mut wheels: Vec<SwerveWheel> = Wheel::ALL
            .into_iter()
            .zip(steer_motors)
            .zip(steer_encoders)
            .map(|((wheel, motor), raw)| SwerveWheel {
                wheel,
                motor,
                encoder: Box::new(ZeroedEncoder {
                    raw,
                    wheel,
                    calibration: Arc::clone(&calibration),
                }),
            })
            .collect();

        let cpr = config.steer_sync.steer_motor_cpr;
        for w in wheels.iter_mut() {
            match w.encoder.position() {
                Ok(fraction) => {
                    if let Err(e) = w.motor.set_relative_position(fraction * cpr) {
                        log::warn!("{}: relative encoder seed failed: {e}", w.wheel);
                    }
                }
                Err(e) => log::warn!("{}: absolute encoder read failed: {e}", w.wheel),
            }
        }

        Self {
            shaper: InputShaper::new(&config.input),
            orientation: OrientationController::new(indicator),
            lifecycle: ModeLifecycle::new(config.input.clone(), config.drivetrain.clone()),
            ownership: DriveOwnership::new(),
            sync: SteerEncoderSync::new(config.steer_sync.clone()),
            calibration,
            config,
            wheels,
            drive_motors,
            base,
            gyro,
            controllers,
            watchdog,
        }
    }

    /// Shape raw joystick axes into bounded drive powers using the current
    /// speed scales.
    pub fn drive_inputs(&self, x: f64, y: f64, rotation: f64) -> DriveInputs {
        let (drive_scale, turn_scale) = self.lifecycle.speed_scales();
        self.shaper.shape(x, y, rotation, drive_scale, turn_scale)
    }

    /// Switch between the configured slow and fast speed scales.
    pub fn set_slow_mode(&mut self, slow: bool) {
        self.lifecycle.set_slow_mode(slow);
    }

    /// Override the speed scales directly, bypassing the slow/fast pairs.
    pub fn set_speed_scales(&mut self, drive_scale: f64, turn_scale: f64) {
        self.lifecycle.set_speed_scales(drive_scale, turn_scale);
    }

    /// Current drive orientation mode.
    pub fn drive_orientation(&self) -> DriveOrientation {
        self.orientation.orientation()
    }

    /// Set the drive orientation mode, updating the driver indicator.
    pub fn set_drive_orientation(&mut self, orientation: DriveOrientation) {
        self.orientation
            .set_orientation(orientation, self.base.as_mut());
    }

    /// Robot heading to be maintained in teleop for the current orientation.
    pub fn drive_gyro_angle(&self) -> f64 {
        self.orientation.heading_reference(self.base.as_ref())
    }

    /// Gyro pitch in degrees.
    pub fn gyro_pitch(&self) -> f64 {
        self.gyro.pitch()
    }

    /// Gyro roll in degrees.
    pub fn gyro_roll(&self) -> f64 {
        self.gyro.roll()
    }

    /// Ownership arbiter for contended drive-base operations.
    pub fn ownership(&self) -> &DriveOwnership {
        &self.ownership
    }

    /// Current steering zero calibration.
    pub fn steer_calibration(&self) -> SteerCalibration {
        *self.calibration.lock()
    }

    /// Prepare the drive base before a run mode starts.
    ///
    /// Besides the common lifecycle work, a swerve base synchronizes its
    /// steering encoders on every non-test mode start.
    pub fn start_mode(&mut self, mode: RunMode, prev_mode: RunMode) {
        self.lifecycle
            .start_mode(mode, prev_mode, &mut self.drive_motors, self.base.as_mut());

        if mode != RunMode::Test && mode != RunMode::Disabled {
            self.sync_steer_encoders(false);
        }
    }

    /// Clean up the drive base right after a run mode has stopped.
    pub fn stop_mode(&mut self, mode: RunMode, next_mode: RunMode) {
        self.lifecycle
            .stop_mode(mode, next_mode, &mut self.controllers, self.base.as_mut());
    }

    /// Cancel any in-flight closed-loop drive operation and stop the base.
    pub fn cancel(&mut self) {
        lifecycle::cancel_all(&mut self.controllers, self.base.as_mut());
    }

    /// Synchronize steering relative encoders against the absolute encoders.
    pub fn sync_steer_encoders(&mut self, force: bool) -> SyncOutcome {
        self.sync
            .sync(force, &mut self.wheels, self.watchdog.as_mut())
    }

    /// Set the robot's absolute field position for match-start localization.
    ///
    /// With no explicit pose the configured start-slot table provides one
    /// for the given alliance. When `use_compass_heading` is set and a
    /// field-zero calibration exists, the pose heading is corrected from the
    /// live compass; an uncalibrated robot keeps the table heading.
    pub fn set_field_position(
        &mut self,
        pose: Option<Pose2D>,
        alliance: Alliance,
        start_slot: usize,
        use_compass_heading: bool,
    ) -> Result<()> {
        let mut pose = field::resolve_start_pose(pose, alliance, start_slot, &self.config.field)?;

        if use_compass_heading {
            let field_zero = calibration::load_field_zero_heading(&self.config.calibration.dir);
            pose = field::apply_compass_correction(pose, self.gyro.compass_heading(), field_zero);
        }

        log::info!("Localizing at {pose}");
        self.base.set_field_position(pose)
    }

    /// Whether the anti-defense wheel lock is currently engaged.
    pub fn is_anti_defense_enabled(&self) -> bool {
        self.base.wheel_lock_enabled()
    }

    /// Engage or release the anti-defense wheel lock.
    ///
    /// Enabling with a named owner that does not already hold the drive
    /// base acquires exclusive access first; on an ownership conflict the
    /// lock action does not execute. Ownership is scoped strictly to this
    /// call: the guard releases it as soon as the action completes,
    /// whatever its outcome.
    pub fn set_anti_defense_enabled(&mut self, owner: Option<&str>, enabled: bool) {
        match owner {
            Some(owner) if enabled && !self.ownership.owned_by(owner) => {
                match self.ownership.try_guard(owner) {
                    Some(_guard) => {
                        if let Err(e) = self.base.set_wheel_lock(enabled) {
                            log::warn!("Wheel lock failed: {e}");
                        }
                    }
                    None => {
                        log::debug!(
                            "Anti-defense denied for {owner}: drive base owned by {:?}",
                            self.ownership.holder()
                        );
                    }
                }
            }
            _ => {
                if let Err(e) = self.base.set_wheel_lock(enabled) {
                    log::warn!("Wheel lock failed: {e}");
                }
            }
        }
    }

    /// Persist a new steering zero calibration.
    ///
    /// The new zeros apply immediately: subsequent encoder reads and
    /// synchronizations use them without rebuilding the subsystem.
    pub fn save_steer_zeros(&mut self, zeros: &[f64; 4]) -> Result<()> {
        SteerCalibration::save(&self.config.calibration.dir, zeros)?;
        *self.calibration.lock() =
            SteerCalibration::load(&self.config.calibration.dir, *zeros);
        Ok(())
    }

    /// Record the current compass heading as the field-zero calibration.
    ///
    /// Run while the robot is physically squared against field-absolute
    /// zero, outside normal match play.
    pub fn save_field_zero_heading(&mut self) -> Result<()> {
        calibration::save_field_zero_heading(
            &self.config.calibration.dir,
            self.gyro.compass_heading(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::mock::{
        MockAbsoluteEncoder, MockDriveBase, MockDriveController, MockDriveMotor, MockGyro,
        MockIndicator, MockSteerMotor, MockWatchdog,
    };

    struct Fixture {
        steer_motors: [MockSteerMotor; 4],
        base: MockDriveBase,
        gyro: MockGyro,
        drive: SwerveDrive,
    }

    fn fixture_with(config: DriveConfig) -> Fixture {
        let steer_motors: [MockSteerMotor; 4] =
            std::array::from_fn(|_| MockSteerMotor::converging(5000.0));
        fixture_with_motors(config, steer_motors)
    }

    fn fixture_with_motors(config: DriveConfig, steer_motors: [MockSteerMotor; 4]) -> Fixture {
        let encoders: [MockAbsoluteEncoder; 4] =
            std::array::from_fn(|i| MockAbsoluteEncoder::new(0.1 * (i as f64 + 1.0)));
        let base = MockDriveBase::new();
        let gyro = MockGyro::new();

        let hardware = DriveHardware {
            steer_motors: std::array::from_fn(|i| {
                Box::new(steer_motors[i].clone()) as Box<dyn SteerMotor>
            }),
            steer_encoders: std::array::from_fn(|i| {
                Box::new(encoders[i].clone()) as Box<dyn AbsoluteEncoder>
            }),
            drive_motors: (0..4)
                .map(|_| Box::new(MockDriveMotor::new()) as Box<dyn DriveMotor>)
                .collect(),
            base: Box::new(base.clone()),
            gyro: Box::new(gyro.clone()),
            controllers: vec![Box::new(MockDriveController::new())],
            watchdog: Box::new(MockWatchdog::new()),
            indicator: Box::new(MockIndicator::new()),
        };

        let drive = SwerveDrive::new(config, hardware);
        Fixture {
            steer_motors,
            base,
            gyro,
            drive,
        }
    }

    fn test_config() -> DriveConfig {
        let mut config = DriveConfig::default();
        // Empty calibration dir: built-in defaults apply. keep() disables
        // cleanup so the path stays valid for the test's lifetime.
        config.calibration.dir = tempfile::tempdir().unwrap().keep();
        config.steer_sync.settle_delay_ms = 0;
        config.steer_sync.timeout_ms = 20;
        config
    }

    #[test]
    fn test_construction_seeds_relative_encoders() {
        let config = test_config();
        let zeros = config.calibration.steer_zero_defaults;
        let cpr = config.steer_sync.steer_motor_cpr;
        let fx = fixture_with(config);

        for (i, motor) in fx.steer_motors.iter().enumerate() {
            let expected = (0.1 * (i as f64 + 1.0) - zeros[i]).rem_euclid(1.0) * cpr;
            assert!((motor.relative_position_value() - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_start_mode_syncs_except_test_mode() {
        let mut fx = fixture_with(test_config());

        fx.drive.start_mode(RunMode::Test, RunMode::Disabled);
        for m in &fx.steer_motors {
            assert_eq!(m.commanded_angle(), None);
        }

        fx.drive.start_mode(RunMode::Autonomous, RunMode::Disabled);
        for m in &fx.steer_motors {
            assert_eq!(m.commanded_angle(), Some((0.0, false)));
        }
    }

    #[test]
    fn test_anti_defense_scoped_ownership() {
        let mut fx = fixture_with(test_config());

        fx.drive.set_anti_defense_enabled(Some("teleop"), true);
        assert!(fx.drive.is_anti_defense_enabled());
        // Ownership was scoped to the call.
        assert_eq!(fx.drive.ownership().holder(), None);

        fx.drive.set_anti_defense_enabled(Some("teleop"), false);
        assert!(!fx.drive.is_anti_defense_enabled());
    }

    #[test]
    fn test_anti_defense_denied_while_owned() {
        let mut fx = fixture_with(test_config());

        assert!(fx.drive.ownership().acquire("auto"));
        fx.drive.set_anti_defense_enabled(Some("teleop"), true);
        // Conflict: the lock action did not execute.
        assert!(!fx.drive.is_anti_defense_enabled());
        assert_eq!(fx.drive.ownership().holder().as_deref(), Some("auto"));

        // The holder itself may lock, and a system-level call always may.
        fx.drive.set_anti_defense_enabled(Some("auto"), true);
        assert!(fx.drive.is_anti_defense_enabled());
        fx.drive.set_anti_defense_enabled(None, false);
        assert!(!fx.drive.is_anti_defense_enabled());
    }

    #[test]
    fn test_set_field_position_with_compass() {
        let mut fx = fixture_with(test_config());
        fx.gyro.set_compass_heading(250.0);

        // No calibration on disk: table heading kept.
        fx.drive
            .set_field_position(None, Alliance::Blue, 0, true)
            .unwrap();
        assert_eq!(fx.base.pose().angle, 180.0);

        // With a saved field zero the heading comes from the compass.
        fx.gyro.set_compass_heading(40.0);
        fx.drive.save_field_zero_heading().unwrap();
        fx.gyro.set_compass_heading(250.0);
        fx.drive
            .set_field_position(None, Alliance::Blue, 0, true)
            .unwrap();
        assert_eq!(fx.base.pose().angle, 210.0);
    }

    #[test]
    fn test_save_steer_zeros_round_trip() {
        let mut fx = fixture_with(test_config());
        let zeros = [0.11, 0.22, 0.33, 0.44];
        fx.drive.save_steer_zeros(&zeros).unwrap();
        for (a, b) in fx.drive.steer_calibration().zeros().iter().zip(zeros.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_saved_zeros_apply_without_rebuild() {
        let config = test_config();
        let cpr = config.steer_sync.steer_motor_cpr;
        // Motors that never converge, so the sync always ends in the forced
        // correction computed from the zero-adjusted absolute encoders.
        let motors: [MockSteerMotor; 4] =
            std::array::from_fn(|_| MockSteerMotor::with_position(5000.0));
        let mut fx = fixture_with_motors(config, motors);

        let zeros = [0.0, 0.0, 0.0, 0.0];
        fx.drive.save_steer_zeros(&zeros).unwrap();

        assert_eq!(fx.drive.sync_steer_encoders(true), SyncOutcome::Forced);
        for (i, motor) in fx.steer_motors.iter().enumerate() {
            // Raw absolute reading with the new zero offset of 0.
            let expected = 0.1 * (i as f64 + 1.0) * cpr;
            assert!((motor.relative_position_value() - expected).abs() < 1e-6);
        }
    }
}
