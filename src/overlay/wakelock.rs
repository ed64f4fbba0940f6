//! Reference-counted, time-bounded wake locks.
//!
//! Every acquisition carries a deadline; a lock is never held
//! indefinitely even if a release is lost. Re-acquiring while held
//! refreshes the deadline rather than stacking a second hold on the
//! platform side.

use web_time::{Duration, Instant};

use super::platform::WakeSource;

/// Default hold window, long enough to cover an always-on-display
/// toggle round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(250);

/// Ref-counted wrapper over a raw platform [`WakeSource`].
pub struct WakeLock {
    source: Box<dyn WakeSource>,
    refs: u32,
    deadline: Option<Instant>,
    timeout: Duration,
}

impl WakeLock {
    /// Wrap `source` with the given per-acquisition timeout.
    #[must_use]
    pub fn new(source: Box<dyn WakeSource>, timeout: Duration) -> Self {
        Self {
            source,
            refs: 0,
            deadline: None,
            timeout,
        }
    }

    /// Take (or refresh) a hold expiring `timeout` from `now`.
    pub fn acquire(&mut self, now: Instant) {
        self.deadline = Some(now + self.timeout);
        self.refs += 1;
        if self.refs == 1 {
            self.source.set_awake(true);
        }
    }

    /// Drop one hold. Releasing the last hold lets the CPU suspend.
    pub fn release(&mut self) {
        match self.refs {
            0 => log::warn!("wake lock released while not held"),
            1 => {
                self.refs = 0;
                self.deadline = None;
                self.source.set_awake(false);
            }
            _ => self.refs -= 1,
        }
    }

    /// Expire overdue holds. Called from every evaluation so a lost
    /// release cannot pin the CPU awake.
    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.deadline {
            if now >= deadline && self.refs > 0 {
                log::warn!(
                    "wake lock expired with {} hold(s) outstanding",
                    self.refs
                );
                self.refs = 0;
                self.deadline = None;
                self.source.set_awake(false);
            }
        }
    }

    /// Whether at least one hold is outstanding.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.refs > 0
    }

    /// Drop all holds immediately. Part of subsystem teardown.
    pub fn release_all(&mut self) {
        if self.refs > 0 {
            self.refs = 0;
            self.deadline = None;
            self.source.set_awake(false);
        }
    }
}

impl std::fmt::Debug for WakeLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WakeLock")
            .field("refs", &self.refs)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

impl Drop for WakeLock {
    fn drop(&mut self) {
        self.release_all();
    }
}
