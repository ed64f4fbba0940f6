//! Centralized indicator options with TOML preset support.
//!
//! All tweakable settings (per-quadrant modes, always-on-display behavior,
//! device calibration, delays and poll cadences) are consolidated here.
//! Options serialize to/from TOML; the host's settings UI reads the JSON
//! schema to build its controls.

mod aod;
mod calibration;
mod modes;
mod timing;

use std::path::Path;

pub use aod::{AodOptions, ScheduleWindow};
pub use calibration::{CalibrationOptions, DeviceCalibration};
pub use modes::{ModeOptions, QuadrantOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use timing::TimingOptions;

use crate::error::HaloError;

/// Top-level options container. All sub-structs use `#[serde(default)]`
/// so partial TOML files (e.g. only overriding `[aod]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Per-(charging × screen) enablement and playback modes.
    pub modes: ModeOptions,
    /// Always-on-display hide behavior and schedule window.
    pub aod: AodOptions,
    /// Per-device geometry calibration.
    #[schemars(skip)]
    pub calibration: CalibrationOptions,
    /// Delays, polls, and burn-in cycle timing.
    pub timing: TimingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`HaloError::Io`] when the file is unreadable,
    /// [`HaloError::OptionsParse`] on malformed TOML.
    pub fn load(path: &Path) -> Result<Self, HaloError> {
        let content = std::fs::read_to_string(path).map_err(HaloError::Io)?;
        toml::from_str(&content)
            .map_err(|e| HaloError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`HaloError::Io`] on write failure, [`HaloError::OptionsParse`]
    /// when serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), HaloError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HaloError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(HaloError::Io)?;
        }
        std::fs::write(path, content).map_err(HaloError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::PlaybackMode;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[timing]
linger_ms = 250

[modes.screen_off_battery]
mode = 'blink'
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.timing.linger_ms, 250);
        assert_eq!(
            opts.modes.screen_off_battery.mode,
            PlaybackMode::Blink
        );
        // Everything else should be default
        assert_eq!(opts.timing.poll_active_ms, 500);
        assert!(!opts.aod.hide_when_inactive);
        assert_eq!(opts.calibration.default.scale, 1.0);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        // UI-exposed sections should be present
        assert!(props.contains_key("modes"));
        assert!(props.contains_key("aod"));
        assert!(props.contains_key("timing"));

        // Calibration is device data, not a UI surface
        assert!(!props.contains_key("calibration"));
    }
}
