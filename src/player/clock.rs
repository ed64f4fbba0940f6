//! Frame clocks driving the render thread.
//!
//! The render loop blocks on a [`FrameClock`] between ticks. Platforms
//! with a real vsync source implement the trait themselves; the core
//! ships [`IntervalClock`], a fixed-interval fallback that also provides
//! the relaxed ~250 ms cadence used once a persistent image has settled
//! and redraw cadence stops mattering.

use web_time::{Duration, Instant};

/// How urgently the next tick is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Animation is in flight; tick at display refresh rate.
    Animation,
    /// Persistent image past its fast-draw window; tick rarely.
    Relaxed,
}

/// Source of render ticks.
///
/// Implementations block the calling (render) thread until the next tick
/// for the requested cadence and return the tick timestamp.
pub trait FrameClock: Send {
    /// Block until the next tick.
    fn wait(&mut self, cadence: Cadence) -> Instant;
}

/// Fixed-interval fallback clock.
#[derive(Debug, Clone)]
pub struct IntervalClock {
    animation: Duration,
    relaxed: Duration,
    last_tick: Option<Instant>,
}

impl IntervalClock {
    /// Clock with explicit intervals.
    #[must_use]
    pub fn new(animation: Duration, relaxed: Duration) -> Self {
        Self {
            animation,
            relaxed,
            last_tick: None,
        }
    }
}

impl Default for IntervalClock {
    /// ~60 Hz animation ticks, 250 ms relaxed ticks.
    fn default() -> Self {
        Self::new(
            Duration::from_nanos(16_666_667),
            Duration::from_millis(250),
        )
    }
}

impl FrameClock for IntervalClock {
    fn wait(&mut self, cadence: Cadence) -> Instant {
        let interval = match cadence {
            Cadence::Animation => self.animation,
            Cadence::Relaxed => self.relaxed,
        };
        let now = Instant::now();
        let due = self.last_tick.map_or(now, |t| t + interval);
        if due > now {
            std::thread::sleep(due - now);
        }
        let tick = Instant::now();
        self.last_tick = Some(tick);
        tick
    }
}
