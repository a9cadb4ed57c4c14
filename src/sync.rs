//! Steering encoder synchronization
//!
//! Absolute steering encoders are accurate but too slow and noisy for
//! closed-loop control; the motors' internal relative encoders are fast but
//! drift and reset on power cycle. At every mode start the relative encoders
//! are re-anchored to the absolute reference:
//!
//! 1. Command every wheel to absolute steering zero (non-optimized).
//! 2. Wait a settle delay, then poll the relative encoders until all wheels
//!    are within the error threshold of zero or the deadline expires,
//!    yielding the scheduling quantum between polls.
//! 3. On timeout, force-write each motor's relative register from its
//!    absolute encoder. Synchronization is best-effort and always ends in
//!    the synced state.
//!
//! The watchdog is paused for the duration since the poll loop can
//! legitimately run close to its own timeout bound.

use crate::config::SteerSyncConfig;
use crate::drivers::{AbsoluteEncoder, SteerMotor, Watchdog};
use crate::types::Wheel;
use std::thread;
use std::time::{Duration, Instant};

/// One swerve module's steering actuator and its absolute reference encoder.
pub struct SwerveWheel {
    pub wheel: Wheel,
    pub motor: Box<dyn SteerMotor>,
    /// Zero-adjusted absolute encoder, position in [0, 1) of a revolution.
    pub encoder: Box<dyn AbsoluteEncoder>,
}

/// Synchronization state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    Unsynced,
    /// The blocking synchronization procedure is running.
    Syncing,
    Synced,
}

/// Caller-visible outcome of a synchronization request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Already synced and no re-sync was forced.
    AlreadySynced,
    /// All wheels converged to zero within the deadline.
    Converged,
    /// The deadline expired; relative encoders were force-corrected from
    /// the absolute encoders.
    Forced,
}

/// Steering encoder synchronizer.
pub struct SteerEncoderSync {
    state: SyncState,
    config: SteerSyncConfig,
}

impl SteerEncoderSync {
    pub fn new(config: SteerSyncConfig) -> Self {
        Self {
            state: SyncState::Unsynced,
            config,
        }
    }

    /// Current synchronization state.
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Synchronize the steering relative encoders against the absolute
    /// encoders.
    ///
    /// No-op if already synced unless `force` is set. May block the calling
    /// thread for up to the configured settle delay plus timeout; the
    /// watchdog is paused for that window.
    pub fn sync(
        &mut self,
        force: bool,
        wheels: &mut [SwerveWheel],
        watchdog: &mut dyn Watchdog,
    ) -> SyncOutcome {
        if self.state == SyncState::Synced && !force {
            return SyncOutcome::AlreadySynced;
        }

        watchdog.pause();
        self.state = SyncState::Syncing;
        let outcome = self.run_sync(wheels);
        self.state = SyncState::Synced;
        watchdog.resume();

        outcome
    }

    fn run_sync(&self, wheels: &mut [SwerveWheel]) -> SyncOutcome {
        // Point all wheels at absolute zero, not the optimized nearest angle.
        for w in wheels.iter_mut() {
            if let Err(e) = w.motor.set_steer_angle(0.0, false) {
                log::warn!("{}: steer zero command failed: {e}", w.wheel);
            }
        }

        thread::sleep(Duration::from_millis(self.config.settle_delay_ms));

        let deadline = Instant::now() + Duration::from_millis(self.config.timeout_ms);
        loop {
            if self.all_on_target(wheels) {
                log::info!("Steer encoders converged");
                return SyncOutcome::Converged;
            }
            if Instant::now() >= deadline {
                break;
            }
            thread::yield_now();
        }

        // Best-effort fallback: re-anchor each relative encoder to the
        // absolute reference instead of failing.
        for w in wheels.iter_mut() {
            match w.encoder.position() {
                Ok(fraction) => {
                    let counts = fraction * self.config.steer_motor_cpr;
                    log::info!("{}: forcing relative encoder to {:.0} counts", w.wheel, counts);
                    if let Err(e) = w.motor.set_relative_position(counts) {
                        log::warn!("{}: relative encoder correction failed: {e}", w.wheel);
                    }
                }
                Err(e) => {
                    log::warn!("{}: absolute encoder read failed: {e}", w.wheel);
                }
            }
        }

        SyncOutcome::Forced
    }

    fn all_on_target(&self, wheels: &[SwerveWheel]) -> bool {
        wheels.iter().all(|w| match w.motor.relative_position() {
            Ok(pos) => pos.abs() <= self.config.error_threshold,
            Err(e) => {
                log::warn!("{}: relative encoder read failed: {e}", w.wheel);
                false
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::mock::{MockAbsoluteEncoder, MockSteerMotor, MockWatchdog};

    fn test_config() -> SteerSyncConfig {
        SteerSyncConfig {
            settle_delay_ms: 0,
            timeout_ms: 20,
            error_threshold: 20.0,
            steer_motor_cpr: 21065.14,
        }
    }

    fn wheel(wheel: Wheel, motor: MockSteerMotor, abs_fraction: f64) -> SwerveWheel {
        SwerveWheel {
            wheel,
            motor: Box::new(motor),
            encoder: Box::new(MockAbsoluteEncoder::new(abs_fraction)),
        }
    }

    fn four_wheels(motors: &[MockSteerMotor; 4]) -> Vec<SwerveWheel> {
        Wheel::ALL
            .iter()
            .zip(motors.iter())
            .map(|(&w, m)| wheel(w, m.clone(), 0.25))
            .collect()
    }

    #[test]
    fn test_converges_without_forced_correction() {
        let motors: [MockSteerMotor; 4] =
            std::array::from_fn(|_| MockSteerMotor::with_position(5.0));
        let mut wheels = four_wheels(&motors);
        let watchdog = MockWatchdog::new();
        let mut wd = watchdog.clone();

        let mut sync = SteerEncoderSync::new(test_config());
        assert_eq!(sync.sync(false, &mut wheels, &mut wd), SyncOutcome::Converged);
        assert_eq!(sync.state(), SyncState::Synced);

        for m in &motors {
            assert_eq!(m.forced_corrections(), 0);
            assert_eq!(m.commanded_angle(), Some((0.0, false)));
        }
        assert_eq!(watchdog.pause_count(), 1);
        assert_eq!(watchdog.resume_count(), 1);
    }

    #[test]
    fn test_timeout_forces_correction_once_per_wheel() {
        // Positions far outside the threshold and never converging.
        let motors: [MockSteerMotor; 4] =
            std::array::from_fn(|_| MockSteerMotor::with_position(5000.0));
        let mut wheels = four_wheels(&motors);
        let mut wd = MockWatchdog::new();

        let mut sync = SteerEncoderSync::new(test_config());
        assert_eq!(sync.sync(false, &mut wheels, &mut wd), SyncOutcome::Forced);

        let expected = 0.25 * test_config().steer_motor_cpr;
        for m in &motors {
            assert_eq!(m.forced_corrections(), 1);
            assert!((m.relative_position_value() - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_second_sync_is_noop_unless_forced() {
        let motors: [MockSteerMotor; 4] =
            std::array::from_fn(|_| MockSteerMotor::with_position(0.0));
        let mut wheels = four_wheels(&motors);
        let mut wd = MockWatchdog::new();

        let mut sync = SteerEncoderSync::new(test_config());
        assert_eq!(sync.sync(false, &mut wheels, &mut wd), SyncOutcome::Converged);
        assert_eq!(sync.sync(false, &mut wheels, &mut wd), SyncOutcome::AlreadySynced);
        // Forcing re-runs the procedure.
        assert_eq!(sync.sync(true, &mut wheels, &mut wd), SyncOutcome::Converged);
    }
}
