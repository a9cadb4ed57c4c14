//! Mock motor drivers

use crate::drivers::{DriveMotor, SteerMotor};
use crate::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// Mock steering motor with an inspectable relative encoder register.
#[derive(Clone)]
pub struct MockSteerMotor {
    state: Arc<Mutex<SteerState>>,
}

#[derive(Debug)]
struct SteerState {
    relative_position: f64,
    commanded_angle: Option<(f64, bool)>,
    forced_corrections: u32,
    converge_on_command: bool,
}

impl MockSteerMotor {
    /// Mock whose relative encoder reads `counts` until corrected.
    pub fn with_position(counts: f64) -> Self {
        Self {
            state: Arc::new(Mutex::new(SteerState {
                relative_position: counts,
                commanded_angle: None,
                forced_corrections: 0,
                converge_on_command: false,
            })),
        }
    }

    /// Mock that snaps its relative encoder to the commanded angle,
    /// simulating a servo that converges instantly.
    pub fn converging(counts: f64) -> Self {
        let mock = Self::with_position(counts);
        mock.state.lock().converge_on_command = true;
        mock
    }

    /// Last commanded (angle, optimize) pair.
    pub fn commanded_angle(&self) -> Option<(f64, bool)> {
        self.state.lock().commanded_angle
    }

    /// Number of times the relative register was overwritten.
    pub fn forced_corrections(&self) -> u32 {
        self.state.lock().forced_corrections
    }

    /// Current relative register value.
    pub fn relative_position_value(&self) -> f64 {
        self.state.lock().relative_position
    }

    /// Script the relative encoder reading.
    pub fn set_position_value(&self, counts: f64) {
        self.state.lock().relative_position = counts;
    }
}

impl SteerMotor for MockSteerMotor {
    fn relative_position(&self) -> Result<f64> {
        Ok(self.state.lock().relative_position)
    }

    fn set_relative_position(&mut self, counts: f64) -> Result<()> {
        let mut state = self.state.lock();
        state.relative_position = counts;
        state.forced_corrections += 1;
        Ok(())
    }

    fn set_steer_angle(&mut self, angle: f64, optimize: bool) -> Result<()> {
        let mut state = self.state.lock();
        state.commanded_angle = Some((angle, optimize));
        if state.converge_on_command {
            state.relative_position = 0.0;
        }
        Ok(())
    }
}

/// Mock drive motor recording its ramp-rate configuration.
#[derive(Clone)]
pub struct MockDriveMotor {
    state: Arc<Mutex<DriveState>>,
}

#[derive(Debug, Default)]
struct DriveState {
    ramp_rate: Option<f64>,
    fail_config: bool,
}

impl MockDriveMotor {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(DriveState::default())),
        }
    }

    /// Mock whose configuration writes are not acknowledged.
    pub fn failing() -> Self {
        let mock = Self::new();
        mock.state.lock().fail_config = true;
        mock
    }

    /// Last configured ramp rate, None if never configured.
    pub fn ramp_rate(&self) -> Option<f64> {
        self.state.lock().ramp_rate
    }
}

impl Default for MockDriveMotor {
    fn default() -> Self {
        Self::new()
    }
}

impl DriveMotor for MockDriveMotor {
    fn set_open_loop_ramp(&mut self, seconds: f64) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail_config {
            return Err(crate::Error::Device("ramp config not acknowledged".into()));
        }
        state.ramp_rate = Some(seconds);
        Ok(())
    }
}
