//! Mock drive base and closed-loop controller

use crate::drivers::{DriveBase, DriveController};
use crate::error::Result;
use crate::types::Pose2D;
use parking_lot::Mutex;
use std::sync::Arc;

/// Mock odometry-enabled drive base.
#[derive(Clone, Default)]
pub struct MockDriveBase {
    state: Arc<Mutex<BaseState>>,
}

#[derive(Debug, Default)]
struct BaseState {
    pose: Pose2D,
    odometry_enabled: bool,
    gyro_assist: Option<(f64, f64)>,
    wheel_lock: bool,
    stop_count: u32,
}

impl MockDriveBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pose(&self) -> Pose2D {
        self.state.lock().pose
    }

    pub fn set_pose(&self, pose: Pose2D) {
        self.state.lock().pose = pose;
    }

    pub fn odometry_enabled(&self) -> bool {
        self.state.lock().odometry_enabled
    }

    pub fn gyro_assist(&self) -> Option<(f64, f64)> {
        self.state.lock().gyro_assist
    }

    pub fn stop_count(&self) -> u32 {
        self.state.lock().stop_count
    }
}

impl DriveBase for MockDriveBase {
    fn field_position(&self) -> Pose2D {
        self.state.lock().pose
    }

    fn set_field_position(&mut self, pose: Pose2D) -> Result<()> {
        self.state.lock().pose = pose;
        Ok(())
    }

    fn heading(&self) -> f64 {
        self.state.lock().pose.angle
    }

    fn set_odometry_enabled(&mut self, enabled: bool) -> Result<()> {
        self.state.lock().odometry_enabled = enabled;
        Ok(())
    }

    fn enable_gyro_assist(&mut self, max_turn_rate: f64, gain: f64) -> Result<()> {
        self.state.lock().gyro_assist = Some((max_turn_rate, gain));
        Ok(())
    }

    fn disable_gyro_assist(&mut self) -> Result<()> {
        self.state.lock().gyro_assist = None;
        Ok(())
    }

    fn set_wheel_lock(&mut self, enabled: bool) -> Result<()> {
        self.state.lock().wheel_lock = enabled;
        Ok(())
    }

    fn wheel_lock_enabled(&self) -> bool {
        self.state.lock().wheel_lock
    }

    fn stop(&mut self) -> Result<()> {
        self.state.lock().stop_count += 1;
        Ok(())
    }
}

/// Mock closed-loop drive controller.
#[derive(Clone, Default)]
pub struct MockDriveController {
    state: Arc<Mutex<ControllerState>>,
}

#[derive(Debug, Default)]
struct ControllerState {
    active: bool,
    cancels: Vec<Option<String>>,
}

impl MockDriveController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock with an operation already in flight.
    pub fn active() -> Self {
        let mock = Self::new();
        mock.state.lock().active = true;
        mock
    }

    pub fn set_active(&self, active: bool) {
        self.state.lock().active = active;
    }

    pub fn cancel_count(&self) -> usize {
        self.state.lock().cancels.len()
    }
}

impl DriveController for MockDriveController {
    fn is_active(&self) -> bool {
        self.state.lock().active
    }

    fn cancel(&mut self, owner: Option<&str>) -> Result<()> {
        let mut state = self.state.lock();
        state.cancels.push(owner.map(str::to_string));
        // Cancel confirms the controller stopped issuing outputs.
        state.active = false;
        Ok(())
    }
}
