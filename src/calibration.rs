//! Calibration data persistence
//!
//! Two small line-oriented text files live in the calibration directory:
//!
//! - `steerzeros.txt`: one steering zero offset per line in canonical wheel
//!   order (lf, rf, lb, rb), each a fraction of one encoder revolution.
//! - `fieldzero.txt`: a single compass heading (degrees) recorded while the
//!   robot faced field-absolute zero.
//!
//! A missing or unreadable file is never an error. Steering zeros fall back
//! to the built-in defaults from the configuration and field zero simply
//! stays uncalibrated; both cases are surfaced as log warnings only.

use crate::error::Result;
use crate::types::Wheel;
use std::fs;
use std::path::Path;

const STEER_ZERO_FILE: &str = "steerzeros.txt";
const FIELD_ZERO_FILE: &str = "fieldzero.txt";

/// Steering zero offsets for all four wheels, loaded once at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteerCalibration {
    zeros: [f64; 4],
}

impl SteerCalibration {
    /// Load steering zeros from the calibration directory, falling back to
    /// the supplied defaults if the file is missing or malformed.
    pub fn load(dir: &Path, defaults: [f64; 4]) -> Self {
        let path = dir.join(STEER_ZERO_FILE);
        match read_floats(&path) {
            Ok(values) if values.len() >= 4 => {
                let zeros = [values[0], values[1], values[2], values[3]];
                log::info!("Loaded steer zeros from {}: {:?}", path.display(), zeros);
                Self { zeros }
            }
            Ok(values) => {
                log::warn!(
                    "Steer zero file {} has {} values, expected 4; using built-in defaults",
                    path.display(),
                    values.len()
                );
                Self { zeros: defaults }
            }
            Err(e) => {
                log::warn!(
                    "Steer zero file {} not readable ({}); using built-in defaults",
                    path.display(),
                    e
                );
                Self { zeros: defaults }
            }
        }
    }

    /// Save steering zeros to the calibration directory.
    pub fn save(dir: &Path, zeros: &[f64; 4]) -> Result<()> {
        fs::create_dir_all(dir)?;
        let path = dir.join(STEER_ZERO_FILE);
        let contents: String = zeros.iter().map(|z| format!("{z:.6}\n")).collect();
        fs::write(&path, contents)?;
        log::info!("Saved steer zeros to {}: {:?}", path.display(), zeros);
        Ok(())
    }

    /// Zero offset for one wheel, as a fraction of a revolution in [0, 1).
    pub fn zero(&self, wheel: Wheel) -> f64 {
        self.zeros[wheel.index()]
    }

    /// All four zero offsets in canonical order.
    pub fn zeros(&self) -> [f64; 4] {
        self.zeros
    }
}

/// Load the calibrated field-zero compass heading, if one has been recorded.
pub fn load_field_zero_heading(dir: &Path) -> Option<f64> {
    let path = dir.join(FIELD_ZERO_FILE);
    match read_floats(&path) {
        Ok(values) if !values.is_empty() => Some(values[0]),
        Ok(_) => {
            log::warn!("Field zero file {} is empty", path.display());
            None
        }
        Err(e) => {
            log::warn!("Field zero file {} not readable ({})", path.display(), e);
            None
        }
    }
}

/// Save the field-zero compass heading calibration.
pub fn save_field_zero_heading(dir: &Path, heading: f64) -> Result<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join(FIELD_ZERO_FILE);
    fs::write(&path, format!("{heading:.6}\n"))?;
    log::info!("Saved field zero heading {:.3} to {}", heading, path.display());
    Ok(())
}

/// Parse whitespace/newline separated floats from a text file.
fn read_floats(path: &Path) -> std::io::Result<Vec<f64>> {
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .split_whitespace()
        .filter_map(|tok| tok.parse::<f64>().ok())
        .collect())
}
