use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Empirical per-model geometry corrections.
///
/// These numbers come from device measurement, not from the algorithm:
/// the computed target rectangle is scaled by `scale` and shifted by
/// `shift_x`/`shift_y` after centering on the cutout. Treated purely as
/// external data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct DeviceCalibration {
    /// Multiplier applied to the target rectangle's size.
    pub scale: f32,
    /// Horizontal shift in pixels, applied after centering.
    pub shift_x: f32,
    /// Vertical shift in pixels, applied after centering.
    pub shift_y: f32,
    /// Ring stroke thickness in dp for persistent-image rendering.
    pub ring_thickness_dp: f32,
    /// Playback speed multiplier for sprite modes.
    pub speed: f32,
}

impl Default for DeviceCalibration {
    fn default() -> Self {
        Self {
            scale: 1.0,
            shift_x: 0.0,
            shift_y: 0.0,
            ring_thickness_dp: 3.0,
            speed: 1.0,
        }
    }
}

/// Calibration table keyed by device model string.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[schemars(title = "Calibration", inline)]
#[serde(default)]
pub struct CalibrationOptions {
    /// Fallback used when the model has no dedicated entry.
    pub default: DeviceCalibration,
    /// Per-model overrides.
    pub devices: BTreeMap<String, DeviceCalibration>,
}

impl CalibrationOptions {
    /// Calibration for `model`, falling back to the default entry.
    #[must_use]
    pub fn for_model(&self, model: &str) -> DeviceCalibration {
        self.devices.get(model).copied().unwrap_or(self.default)
    }
}
