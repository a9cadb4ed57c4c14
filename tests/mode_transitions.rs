//! Integration tests for run-mode transitions through the public API.
//!
//! Exercises the full subsystem against mock devices: a simulated match
//! sequence from localization through autonomous into teleop, including the
//! end-of-auto pose carry-over and steering synchronization at mode starts.

use chakra_drive::devices::mock::{
    MockAbsoluteEncoder, MockDriveBase, MockDriveController, MockDriveMotor, MockGyro,
    MockIndicator, MockSteerMotor, MockWatchdog,
};
use chakra_drive::drivers::{AbsoluteEncoder, DriveController, DriveMotor, SteerMotor};
use chakra_drive::{
    Alliance, DriveConfig, DriveHardware, DriveOrientation, Pose2D, RunMode, SwerveDrive,
    SyncOutcome,
};

struct Rig {
    steer_motors: [MockSteerMotor; 4],
    drive_motors: [MockDriveMotor; 4],
    base: MockDriveBase,
    gyro: MockGyro,
    controller: MockDriveController,
    watchdog: MockWatchdog,
    drive: SwerveDrive,
}

fn rig() -> Rig {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut config = DriveConfig::default();
    config.calibration.dir = tempfile::tempdir().unwrap().keep();
    config.steer_sync.settle_delay_ms = 0;
    config.steer_sync.timeout_ms = 20;

    let steer_motors: [MockSteerMotor; 4] =
        std::array::from_fn(|_| MockSteerMotor::converging(3000.0));
    let drive_motors: [MockDriveMotor; 4] = std::array::from_fn(|_| MockDriveMotor::new());
    let base = MockDriveBase::new();
    let gyro = MockGyro::new();
    let controller = MockDriveController::new();
    let watchdog = MockWatchdog::new();

    let hardware = DriveHardware {
        steer_motors: std::array::from_fn(|i| {
            Box::new(steer_motors[i].clone()) as Box<dyn SteerMotor>
        }),
        steer_encoders: std::array::from_fn(|_| {
            Box::new(MockAbsoluteEncoder::new(0.5)) as Box<dyn AbsoluteEncoder>
        }),
        drive_motors: drive_motors
            .iter()
            .map(|m| Box::new(m.clone()) as Box<dyn DriveMotor>)
            .collect(),
        base: Box::new(base.clone()),
        gyro: Box::new(gyro.clone()),
        controllers: vec![Box::new(controller.clone())],
        watchdog: Box::new(watchdog.clone()),
        indicator: Box::new(MockIndicator::new()),
    };

    let drive = SwerveDrive::new(config, hardware);
    Rig {
        steer_motors,
        drive_motors,
        base,
        gyro,
        controller,
        watchdog,
        drive,
    }
}

#[test]
fn auto_pose_carries_into_teleop_once() {
    let mut rig = rig();

    // Match start: localize from the table and run autonomous.
    rig.drive
        .set_field_position(None, Alliance::Red, 1, false)
        .unwrap();
    rig.drive.start_mode(RunMode::Autonomous, RunMode::Disabled);
    assert!(rig.base.odometry_enabled());
    for m in &rig.drive_motors {
        assert_eq!(m.ramp_rate(), Some(0.0));
    }

    // Autonomous drives somewhere, a path follow is still active at stop.
    rig.base.set_pose(Pose2D::new(-60.0, 250.0, 45.0));
    rig.controller.set_active(true);
    rig.drive.stop_mode(RunMode::Autonomous, RunMode::Teleop);
    assert_eq!(rig.controller.cancel_count(), 1);
    assert!(!rig.controller.is_active());
    assert!(!rig.base.odometry_enabled());

    // Odometry pose is disturbed between modes.
    rig.base.set_pose(Pose2D::default());

    // Teleop start restores the captured pose and re-enables ramping.
    rig.drive.start_mode(RunMode::Teleop, RunMode::Autonomous);
    assert_eq!(rig.base.pose(), Pose2D::new(-60.0, 250.0, 45.0));
    for m in &rig.drive_motors {
        assert_eq!(m.ramp_rate(), Some(0.2));
    }

    // The carried pose was consumed; a second start does not reapply it.
    rig.base.set_pose(Pose2D::new(5.0, 5.0, 0.0));
    rig.drive.stop_mode(RunMode::Teleop, RunMode::Disabled);
    rig.drive.start_mode(RunMode::Teleop, RunMode::Disabled);
    assert_eq!(rig.base.pose(), Pose2D::new(5.0, 5.0, 0.0));
}

#[test]
fn steer_sync_runs_once_and_pauses_watchdog() {
    let mut rig = rig();

    rig.drive.start_mode(RunMode::Autonomous, RunMode::Disabled);
    assert_eq!(rig.watchdog.pause_count(), 1);
    assert_eq!(rig.watchdog.resume_count(), 1);
    for m in &rig.steer_motors {
        assert_eq!(m.commanded_angle(), Some((0.0, false)));
        // Converging mocks reach zero, so no forced correction beyond the
        // construction-time seeding.
        assert_eq!(m.forced_corrections(), 1);
    }

    // Already synced: the teleop start does not re-run the procedure.
    rig.drive.stop_mode(RunMode::Autonomous, RunMode::Teleop);
    rig.drive.start_mode(RunMode::Teleop, RunMode::Autonomous);
    assert_eq!(rig.watchdog.pause_count(), 1);

    // An explicit forced re-sync runs again.
    assert_eq!(rig.drive.sync_steer_encoders(true), SyncOutcome::Converged);
    assert_eq!(rig.watchdog.pause_count(), 2);
    assert_eq!(rig.watchdog.resume_count(), 2);
}

#[test]
fn field_orientation_round_trip() {
    let mut rig = rig();
    rig.base.set_pose(Pose2D::new(0.0, 0.0, 90.0));

    rig.drive.set_drive_orientation(DriveOrientation::Robot);
    assert_eq!(rig.drive.drive_gyro_angle(), 0.0);
    assert_eq!(rig.base.pose().angle, 90.0);

    rig.drive.set_drive_orientation(DriveOrientation::Inverted);
    assert_eq!(rig.drive.drive_gyro_angle(), 180.0);

    // Entering FIELD re-zeroes the heading reference.
    rig.drive.set_drive_orientation(DriveOrientation::Field);
    assert_eq!(rig.base.pose().angle, 0.0);
    assert_eq!(rig.drive.drive_gyro_angle(), 0.0);

    // The reference then tracks the live heading.
    rig.base.set_pose(rig.base.pose().with_angle(30.0));
    assert_eq!(rig.drive.drive_gyro_angle(), 30.0);
}

#[test]
fn shaped_inputs_respect_slow_mode() {
    let mut rig = rig();

    let fast = rig.drive.drive_inputs(0.0, 1.0, 1.0);
    assert!((fast.y - 0.75).abs() < 1e-9);
    assert!((fast.rotation - 0.6).abs() < 1e-9);

    rig.drive.set_slow_mode(true);
    let slow = rig.drive.drive_inputs(0.0, 1.0, 1.0);
    assert!((slow.y - 0.5).abs() < 1e-9);
    assert!((slow.rotation - 0.3).abs() < 1e-9);

    // Leaving disabled resets to the fast scales.
    rig.drive.start_mode(RunMode::Teleop, RunMode::Disabled);
    let reset = rig.drive.drive_inputs(0.0, 1.0, 1.0);
    assert!((reset.y - 0.75).abs() < 1e-9);
}

#[test]
fn gyro_attitude_passthrough() {
    let rig = {
        let r = rig();
        r.gyro.set_attitude(3.5, -2.0);
        r
    };
    assert_eq!(rig.drive.gyro_pitch(), 3.5);
    assert_eq!(rig.drive.gyro_roll(), -2.0);
}
