use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::mode::PlaybackMode;

/// Enablement and playback mode for one (charging × screen) quadrant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct QuadrantOptions {
    /// Whether the indicator is shown at all in this quadrant.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Playback mode used in this quadrant.
    #[schemars(title = "Mode")]
    pub mode: PlaybackMode,
}

impl Default for QuadrantOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: PlaybackMode::Swirl,
        }
    }
}

/// Per-(charging × screen-on) quadrant mode selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Modes", inline)]
#[serde(default)]
pub struct ModeOptions {
    /// Screen on, on battery.
    pub screen_on_battery: QuadrantOptions,
    /// Screen on, charging.
    pub screen_on_charging: QuadrantOptions,
    /// Screen off (doze), on battery.
    pub screen_off_battery: QuadrantOptions,
    /// Screen off (doze), charging.
    pub screen_off_charging: QuadrantOptions,
}

impl Default for ModeOptions {
    fn default() -> Self {
        Self {
            screen_on_battery: QuadrantOptions::default(),
            screen_on_charging: QuadrantOptions::default(),
            screen_off_battery: QuadrantOptions {
                enabled: true,
                mode: PlaybackMode::PersistentImage,
            },
            screen_off_charging: QuadrantOptions {
                enabled: true,
                mode: PlaybackMode::PersistentImage,
            },
        }
    }
}

impl ModeOptions {
    /// The quadrant matching the live (charging, screen-on) pair.
    #[must_use]
    pub fn quadrant(&self, charging: bool, screen_on: bool) -> &QuadrantOptions {
        match (charging, screen_on) {
            (false, true) => &self.screen_on_battery,
            (true, true) => &self.screen_on_charging,
            (false, false) => &self.screen_off_battery,
            (true, false) => &self.screen_off_charging,
        }
    }
}
