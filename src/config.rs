//! Configuration for the drive-base subsystem
//!
//! Loads configuration from a TOML file with all tunable drive parameters.
//! Built-in defaults carry the values tuned on the reference robot and are
//! suitable for bench testing; competition deployments should use a proper
//! TOML configuration file.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level drive-base configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DriveConfig {
    pub input: InputConfig,
    pub drivetrain: DrivetrainConfig,
    pub steer_sync: SteerSyncConfig,
    pub field: FieldConfig,
    pub calibration: CalibrationConfig,
}

/// Joystick input shaping configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Power-curve exponent applied to the translation magnitude.
    ///
    /// Different input devices want different stick feel: 3.0 for gamepad
    /// thumbsticks, 2.0 for flight sticks. This is a tuning value, not a
    /// device check.
    pub curve_power: f64,
    /// Translation speed scale for normal (fast) driving
    pub drive_fast_scale: f64,
    /// Translation speed scale for precision (slow) driving
    pub drive_slow_scale: f64,
    /// Rotation speed scale for normal (fast) driving
    pub turn_fast_scale: f64,
    /// Rotation speed scale for precision (slow) driving
    pub turn_slow_scale: f64,
}

/// Drivetrain motor and assist configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DrivetrainConfig {
    /// Open-loop ramp time (seconds from zero to full output) applied in
    /// teleop/test for smoother driving. Autonomous runs with ramping
    /// disabled for full responsiveness on programmed paths.
    pub ramp_rate: f64,
    /// Enable gyro-assisted turning in driver-controlled modes
    pub gyro_assist_enabled: bool,
    /// Maximum robot turn rate (degrees/sec), used by gyro assist
    pub max_turn_rate: f64,
    /// Gyro assist turn gain
    pub gyro_assist_gain: f64,
}

/// Steering encoder synchronization tuning
///
/// These thresholds were chosen empirically on the reference robot; treat
/// them as tuning values rather than optima.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SteerSyncConfig {
    /// Delay after commanding wheels to zero before polling begins (ms)
    pub settle_delay_ms: u64,
    /// Wall-clock limit for the convergence poll loop (ms)
    pub timeout_ms: u64,
    /// Motor relative-encoder error threshold (counts) for convergence
    pub error_threshold: f64,
    /// Steering motor internal encoder counts per steering revolution
    pub steer_motor_cpr: f64,
}

/// Field geometry and start-position table
///
/// Only the blue alliance start poses are stored; red poses are derived by
/// mirroring about the field midline.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldConfig {
    /// Field length (inches), blue alliance wall to red alliance wall
    pub field_length: f64,
    /// X coordinates of the start slots, shared by both alliances
    pub start_slot_x: Vec<f64>,
    /// Y coordinate of the blue alliance start line
    pub blue_start_y: f64,
    /// Heading of a blue robot at its start position
    pub blue_start_heading: f64,
}

/// Calibration persistence configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CalibrationConfig {
    /// Directory holding the calibration data files
    pub dir: PathBuf,
    /// Built-in steering zero offsets (fraction of a revolution, lf/rf/lb/rb),
    /// used when the calibration file is missing or unreadable
    pub steer_zero_defaults: [f64; 4],
}

impl DriveConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: DriveConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            input: InputConfig {
                curve_power: 2.0,
                drive_fast_scale: 0.75,
                drive_slow_scale: 0.5,
                turn_fast_scale: 0.6,
                turn_slow_scale: 0.3,
            },
            drivetrain: DrivetrainConfig {
                ramp_rate: 0.2,
                gyro_assist_enabled: false,
                max_turn_rate: 562.5,
                gyro_assist_gain: 0.1,
            },
            steer_sync: SteerSyncConfig {
                settle_delay_ms: 200,
                timeout_ms: 500,
                error_threshold: 20.0,
                // 2048-count motor encoder through a (24:12)(72:14) steering gear train
                steer_motor_cpr: 2048.0 * (24.0 / 12.0) * (72.0 / 14.0),
            },
            field: FieldConfig {
                field_length: 54.0 * 12.0,
                start_slot_x: vec![-42.19, -108.19, -174.19],
                blue_start_y: 18.5,
                blue_start_heading: 180.0,
            },
            calibration: CalibrationConfig {
                dir: PathBuf::from("/var/lib/chakra-drive"),
                steer_zero_defaults: [0.493703, 0.278641, 0.409850, 0.443877],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DriveConfig::default();
        assert_eq!(config.input.drive_fast_scale, 0.75);
        assert_eq!(config.input.turn_slow_scale, 0.3);
        assert_eq!(config.steer_sync.timeout_ms, 500);
        assert_eq!(config.field.start_slot_x.len(), 3);
        assert_eq!(config.field.field_length, 648.0);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = DriveConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: DriveConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.input.curve_power, config.input.curve_power);
        assert_eq!(parsed.steer_sync.steer_motor_cpr, config.steer_sync.steer_motor_cpr);
        assert_eq!(
            parsed.calibration.steer_zero_defaults,
            config.calibration.steer_zero_defaults
        );
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drive.toml");
        let config = DriveConfig::default();
        config.to_file(&path).unwrap();
        let loaded = DriveConfig::from_file(&path).unwrap();
        assert_eq!(loaded.field.blue_start_y, config.field.blue_start_y);
    }
}
