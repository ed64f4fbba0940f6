use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Delays, poll cadences, and burn-in cycle timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Timing", inline)]
#[serde(default)]
pub struct TimingOptions {
    /// Delay before hiding a lingering persistent-image surface after
    /// the screen turns on, in milliseconds.
    #[schemars(title = "Linger (ms)")]
    pub linger_ms: u64,
    /// Re-evaluation poll while something is animating, in milliseconds.
    pub poll_active_ms: u64,
    /// Re-evaluation poll in persistent-image mode or with no colors,
    /// in milliseconds.
    pub poll_idle_ms: u64,
    /// Burn-in avoidance cycle length in seconds.
    pub burn_in_cycle_secs: u64,
    /// Draw suppression window after a persistent mode switch, ms.
    pub ring_settle_ms: u64,
    /// Window of every-tick draws after the settle window, ms.
    pub ring_fast_window_ms: u64,
    /// Minimum spacing between persistent draws past the fast window, ms.
    pub ring_throttle_ms: u64,
}

impl Default for TimingOptions {
    fn default() -> Self {
        Self {
            linger_ms: 125,
            poll_active_ms: 500,
            poll_idle_ms: 5000,
            burn_in_cycle_secs: 600,
            ring_settle_ms: 2000,
            ring_fast_window_ms: 10_000,
            ring_throttle_ms: 8000,
        }
    }
}

impl TimingOptions {
    /// Linger delay as a [`Duration`].
    #[must_use]
    pub fn linger(&self) -> Duration {
        Duration::from_millis(self.linger_ms)
    }

    /// Burn-in cycle as a [`Duration`].
    #[must_use]
    pub fn burn_in_cycle(&self) -> Duration {
        Duration::from_secs(self.burn_in_cycle_secs.max(1))
    }
}
