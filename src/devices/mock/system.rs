//! Mock watchdog and orientation indicator

use crate::drivers::{OrientationIndicator, Watchdog};
use crate::error::Result;
use crate::types::DriveOrientation;
use parking_lot::Mutex;
use std::sync::Arc;

/// Mock watchdog counting pause/resume calls.
#[derive(Clone, Default)]
pub struct MockWatchdog {
    state: Arc<Mutex<WatchdogState>>,
}

#[derive(Debug, Default)]
struct WatchdogState {
    pause_count: u32,
    resume_count: u32,
}

impl MockWatchdog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause_count(&self) -> u32 {
        self.state.lock().pause_count
    }

    pub fn resume_count(&self) -> u32 {
        self.state.lock().resume_count
    }
}

impl Watchdog for MockWatchdog {
    fn pause(&mut self) {
        self.state.lock().pause_count += 1;
    }

    fn resume(&mut self) {
        self.state.lock().resume_count += 1;
    }
}

/// Mock orientation indicator.
#[derive(Clone, Default)]
pub struct MockIndicator {
    state: Arc<Mutex<IndicatorState>>,
}

#[derive(Debug, Default)]
struct IndicatorState {
    shown: Option<DriveOrientation>,
    fail: bool,
}

impl MockIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock whose updates always fail, for error-path tests.
    pub fn failing() -> Self {
        let mock = Self::new();
        mock.state.lock().fail = true;
        mock
    }

    /// Last orientation shown, None if never updated (or failing).
    pub fn shown(&self) -> Option<DriveOrientation> {
        self.state.lock().shown
    }
}

impl OrientationIndicator for MockIndicator {
    fn show_orientation(&mut self, orientation: DriveOrientation) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail {
            return Err(crate::Error::Device("indicator offline".into()));
        }
        state.shown = Some(orientation);
        Ok(())
    }
}
