//! Mock sensors

use crate::drivers::{AbsoluteEncoder, Gyro};
use crate::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// Mock absolute steering encoder with a scriptable position.
#[derive(Clone)]
pub struct MockAbsoluteEncoder {
    position: Arc<Mutex<f64>>,
}

impl MockAbsoluteEncoder {
    /// Mock reading `fraction` of a revolution, in [0, 1).
    pub fn new(fraction: f64) -> Self {
        Self {
            position: Arc::new(Mutex::new(fraction)),
        }
    }

    pub fn set_position(&self, fraction: f64) {
        *self.position.lock() = fraction;
    }
}

impl AbsoluteEncoder for MockAbsoluteEncoder {
    fn position(&self) -> Result<f64> {
        Ok(*self.position.lock())
    }
}

/// Mock gyro with scriptable readings.
#[derive(Clone, Default)]
pub struct MockGyro {
    state: Arc<Mutex<GyroState>>,
}

#[derive(Debug, Default)]
struct GyroState {
    heading: f64,
    pitch: f64,
    roll: f64,
    compass_heading: f64,
}

impl MockGyro {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_heading(&self, deg: f64) {
        self.state.lock().heading = deg;
    }

    pub fn set_attitude(&self, pitch: f64, roll: f64) {
        let mut state = self.state.lock();
        state.pitch = pitch;
        state.roll = roll;
    }

    pub fn set_compass_heading(&self, deg: f64) {
        self.state.lock().compass_heading = deg;
    }
}

impl Gyro for MockGyro {
    fn heading(&self) -> f64 {
        self.state.lock().heading
    }

    fn pitch(&self) -> f64 {
        self.state.lock().pitch
    }

    fn roll(&self) -> f64 {
        self.state.lock().roll
    }

    fn compass_heading(&self) -> f64 {
        self.state.lock().compass_heading
    }
}
