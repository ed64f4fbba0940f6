//! The overlay visibility state machine.
//!
//! [`OverlayManager`] is the single authority on whether the indicator
//! exists on screen and in what form. Every external [`Signal`] lands
//! here, gets folded into an input snapshot, and triggers one
//! evaluation: compute the desired [`OverlayState`], diff it against
//! the last-applied one, and touch the platform only when they differ.
//! The manager exclusively owns the overlay window, the always-on
//! toggle, and all wake locks; the render thread never adds or removes
//! the window, only draws into it.

pub mod platform;
pub mod state;
pub mod wakelock;

pub use platform::{AodToggle, OverlayHost, SurfaceError, SurfaceParams, WakeSource};
pub use state::{EvalInputs, OverlayState};
pub use wakelock::WakeLock;

use web_time::{Duration, Instant};

use crate::color::ColorSequence;
use crate::controller::{GeometryProvider, IndicatorController};
use crate::error::HaloError;
use crate::geometry::CutoutInfo;
use crate::options::Options;
use crate::signals::Signal;

/// Top-level policy driver. Owns the platform seams and the animation
/// controller beneath them.
pub struct OverlayManager {
    host: Box<dyn OverlayHost>,
    aod: Box<dyn AodToggle>,
    wake: WakeLock,
    controller: IndicatorController,
    options: Options,
    inputs: EvalInputs,
    /// Device model string for calibration table lookups.
    model: String,
    /// Cutout fallback used when no precise external geometry exists.
    cutout: Option<CutoutInfo>,
    bottom_hint: Option<i32>,
    last: Option<OverlayState>,
    linger_deadline: Option<Instant>,
    force_refresh: bool,
    immediate_hide: bool,
}

impl OverlayManager {
    /// Assemble the state machine over its platform seams.
    #[must_use]
    pub fn new(
        host: Box<dyn OverlayHost>,
        aod: Box<dyn AodToggle>,
        wake_source: Box<dyn WakeSource>,
        controller: IndicatorController,
        options: Options,
    ) -> Self {
        Self {
            host,
            aod,
            wake: WakeLock::new(wake_source, wakelock::DEFAULT_TIMEOUT),
            controller,
            options,
            inputs: EvalInputs::default(),
            model: String::new(),
            cutout: None,
            bottom_hint: None,
            last: None,
            linger_deadline: None,
            force_refresh: false,
            immediate_hide: false,
        }
    }

    /// Install the per-device cutout table entry used while no precise
    /// external geometry has been detected.
    pub fn set_cutout(&mut self, cutout: Option<CutoutInfo>) {
        self.cutout = cutout;
        self.push_geometry(None, None);
    }

    /// Update the wall-clock minute used for the schedule window.
    pub fn set_minute_of_day(&mut self, minute_of_day: u16) {
        self.inputs.minute_of_day = minute_of_day;
    }

    /// Record the device model used for calibration table lookups.
    pub fn set_model(&mut self, model: &str) {
        self.model = model.to_owned();
        self.controller
            .set_calibration(self.options.calibration.for_model(model));
    }

    /// Swap in edited options and force a refresh on the next
    /// evaluation.
    pub fn set_options(&mut self, options: Options) {
        self.controller
            .set_calibration(options.calibration.for_model(&self.model));
        self.options = options;
        self.force_refresh = true;
    }

    /// Last state actually applied to the platform, if any.
    #[must_use]
    pub fn applied(&self) -> Option<&OverlayState> {
        self.last.as_ref()
    }

    /// Borrow the animation controller (read-only observation).
    #[must_use]
    pub fn controller(&self) -> &IndicatorController {
        &self.controller
    }

    /// Fold one external event in and re-evaluate.
    ///
    /// Returns the delay until the next self-scheduled poll, or `None`
    /// when no poll is needed (nothing wanted, nothing animating).
    ///
    /// # Errors
    ///
    /// Propagates fatal surface failures; see [`Self::evaluate`].
    pub fn handle_signal(
        &mut self,
        signal: Signal,
        now: Instant,
    ) -> Result<Option<Duration>, HaloError> {
        match signal {
            Signal::ScreenOn => {
                self.inputs.on = true;
                self.inputs.doze = false;
            }
            Signal::ScreenOff => self.inputs.on = false,
            Signal::DozeEnter => {
                self.inputs.on = false;
                self.inputs.doze = true;
            }
            Signal::DozeExit => self.inputs.doze = false,
            Signal::ChargerConnected => self.inputs.charging = true,
            Signal::ChargerDisconnected => self.inputs.charging = false,
            Signal::UserPresent => {
                self.inputs.on = true;
                self.inputs.doze = false;
            }
            Signal::ColorsChanged {
                sequence,
                force_refresh,
            } => {
                self.inputs.colors = sequence;
                self.force_refresh |= force_refresh;
            }
            Signal::HideRequested { immediate } => {
                self.inputs.colors = ColorSequence::default();
                self.immediate_hide |= immediate;
            }
            Signal::GeometryDetected {
                rect,
                clock_exclusion,
                overlay_bottom_hint,
            } => {
                self.bottom_hint = overlay_bottom_hint;
                self.push_geometry(rect, clock_exclusion);
                self.force_refresh = true;
            }
            Signal::SettingsChanged => self.force_refresh = true,
        }
        self.evaluate(now)
    }

    /// Run one evaluation of the visibility policy at `now`.
    ///
    /// Safe to call spuriously; with no input change since the last
    /// call it applies nothing.
    ///
    /// # Errors
    ///
    /// Returns [`HaloError::Surface`] with
    /// [`SurfaceError::InvalidToken`] when the platform rejects the
    /// overlay token outright. That error is fatal
    /// ([`HaloError::is_fatal`]); the host process should exit and be
    /// restarted. Transient surface failures are logged and absorbed.
    pub fn evaluate(
        &mut self,
        now: Instant,
    ) -> Result<Option<Duration>, HaloError> {
        self.wake.tick(now);
        let _ = self.controller.pump();

        let desired = state::desired(&self.inputs, &self.options);

        if let Some(remaining) = self.linger(&desired, now) {
            log::debug!("lingering {remaining:?} before hiding overlay");
            return Ok(Some(remaining));
        }

        let force = std::mem::take(&mut self.force_refresh);
        let aod_flip = self
            .last
            .as_ref()
            .is_none_or(|l| {
                l.want_persistent_image != desired.want_persistent_image
            });
        if force || aod_flip || self.last.as_ref() != Some(&desired) {
            if self.apply(&desired, aod_flip, now)? {
                self.last = Some(desired.clone());
            }
        }

        // A graceful stop keeps the window up until the pass finishes.
        if !desired.wanted
            && self.host.is_created()
            && !self.controller.player().is_playing()
        {
            self.host.remove();
        }

        Ok(self.next_poll(&desired))
    }

    /// Tear down in dependency order: playback, window, wake locks.
    pub fn shutdown(&mut self) {
        self.controller.shutdown();
        self.host.remove();
        self.wake.release_all();
        self.last = None;
        log::info!("overlay manager shut down");
    }

    // ── internals ───────────────────────────────────────────────────

    /// Apply `desired` to the platform. Returns `false` when a
    /// transient failure means the state should not be recorded as
    /// applied (the next evaluation retries).
    fn apply(
        &mut self,
        desired: &OverlayState,
        aod_flip: bool,
        now: Instant,
    ) -> Result<bool, HaloError> {
        if aod_flip {
            // Cover the toggle round trip; the lock self-expires.
            self.wake.acquire(now);
            self.aod.set_enabled(desired.want_persistent_image);
            log::info!(
                "always-on-display {}",
                if desired.want_persistent_image { "on" } else { "off" }
            );
        }

        if !desired.wanted {
            let immediate = std::mem::take(&mut self.immediate_hide)
                || !desired.visible
                || desired.mode.is_persistent();
            self.controller.hide(immediate);
            if immediate {
                self.host.remove();
            }
            return Ok(true);
        }

        let params = SurfaceParams {
            bounds: self.controller.target_bounds(),
            opaque_background: desired.black_fill,
            bottom_hint: self.bottom_hint,
        };
        let result = if self.host.is_created() {
            self.host.update(&params)
        } else {
            self.host.create(&params)
        };
        match result {
            Ok(()) => {}
            Err(SurfaceError::InvalidToken) => {
                return Err(HaloError::Surface(SurfaceError::InvalidToken));
            }
            Err(e) => {
                log::warn!("overlay surface update failed: {e}");
                return Ok(false);
            }
        }

        self.controller.show(
            desired.colors.clone(),
            desired.mode,
            desired.black_fill,
            false,
        );
        Ok(true)
    }

    /// Keep a persistent-image surface up briefly while the display
    /// transitions, so removal does not flicker. Returns the remaining
    /// delay while the hold is active.
    fn linger(
        &mut self,
        desired: &OverlayState,
        now: Instant,
    ) -> Option<Duration> {
        let leaving_persistent = self.last.as_ref().is_some_and(|l| {
            l.wanted
                && l.mode.is_persistent()
                && (!desired.wanted || !desired.mode.is_persistent())
        });
        if !leaving_persistent || self.immediate_hide {
            self.linger_deadline = None;
            return None;
        }
        let deadline = *self
            .linger_deadline
            .get_or_insert(now + self.options.timing.linger());
        if now < deadline {
            return Some(deadline - now);
        }
        self.linger_deadline = None;
        None
    }

    fn next_poll(&self, desired: &OverlayState) -> Option<Duration> {
        if !desired.wanted && self.host.is_created() {
            // Graceful stop in flight: keep polling so the completion
            // gets pumped and the window comes down.
            return Some(Duration::from_millis(
                self.options.timing.poll_active_ms,
            ));
        }
        let active = desired.wanted
            && (self.inputs.on
                || (desired.doze && desired.want_persistent_image));
        if !active {
            return None;
        }
        let idle =
            desired.mode.is_persistent() || desired.colors.is_empty();
        let ms = if idle {
            self.options.timing.poll_idle_ms
        } else {
            self.options.timing.poll_active_ms
        };
        Some(Duration::from_millis(ms))
    }

    fn push_geometry(
        &mut self,
        rect: Option<crate::geometry::Rect>,
        clock_exclusion: Option<crate::geometry::Rect>,
    ) {
        let provider = match (rect, self.cutout) {
            (Some(rect), _) => GeometryProvider::ExternalPreciseSource(rect),
            (None, Some(cutout)) => {
                GeometryProvider::DeviceCalibrationTable(cutout)
            }
            (None, None) => GeometryProvider::NotAvailable,
        };
        self.controller.set_geometry(provider, clock_exclusion);
    }
}

impl std::fmt::Debug for OverlayManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayManager")
            .field("inputs", &self.inputs)
            .field("last", &self.last)
            .field("linger_deadline", &self.linger_deadline)
            .finish_non_exhaustive()
    }
}
