use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Daily time window during which the always-on indicator is active.
///
/// Minutes since midnight; the window may cross midnight (`start > end`
/// means "evening through next morning"). `start == end` means always
/// active.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct ScheduleWindow {
    /// Window start, minutes since midnight.
    pub start_minute: u16,
    /// Window end, minutes since midnight (exclusive).
    pub end_minute: u16,
}

impl Default for ScheduleWindow {
    fn default() -> Self {
        // Always active.
        Self {
            start_minute: 0,
            end_minute: 0,
        }
    }
}

impl ScheduleWindow {
    /// Whether `minute_of_day` falls inside the window.
    #[must_use]
    pub fn contains(&self, minute_of_day: u16) -> bool {
        if self.start_minute == self.end_minute {
            return true;
        }
        if self.start_minute < self.end_minute {
            (self.start_minute..self.end_minute).contains(&minute_of_day)
        } else {
            // Crosses midnight.
            minute_of_day >= self.start_minute
                || minute_of_day < self.end_minute
        }
    }
}

/// Always-on-display behavior while nothing is animating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Always-on display", inline)]
#[serde(default)]
pub struct AodOptions {
    /// Hide the persistent image when no colors are active or the
    /// schedule window is inactive.
    #[schemars(title = "Hide when inactive")]
    pub hide_when_inactive: bool,
    /// When hiding, also release the surface instead of keeping an
    /// invisible placeholder.
    #[schemars(title = "Hide fully")]
    pub hide_fully: bool,
    /// Allow the graceful hide path while the screen is off.
    #[schemars(title = "Allow hide during screen off")]
    pub allow_hide_during_screen_off: bool,
    /// Daily activity window.
    pub schedule: ScheduleWindow,
}

impl Default for AodOptions {
    fn default() -> Self {
        Self {
            hide_when_inactive: false,
            hide_fully: false,
            allow_hide_during_screen_off: true,
            schedule: ScheduleWindow::default(),
        }
    }
}
