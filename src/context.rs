//! Explicit dependency wiring and subsystem lifecycle.
//!
//! There is no global state anywhere in this crate. A host shell
//! gathers its platform implementations into [`PlatformSeams`], calls
//! [`Context::init`], and gets back the fully wired engine. Teardown is
//! the mirror image: [`Context::shutdown`] stops playback, removes the
//! window, and releases wake locks in dependency order, after which it
//! is safe for the host to unregister its own event listeners.

use web_time::{Duration, Instant};

use crate::controller::IndicatorController;
use crate::error::HaloError;
use crate::geometry::DisplayMetrics;
use crate::options::Options;
use crate::overlay::platform::{AodToggle, OverlayHost, WakeSource};
use crate::overlay::OverlayManager;
use crate::player::{FrameClock, IntervalClock, PresentSurface, SpritePlayer};
use crate::signals::Signal;

/// Everything the engine needs from the platform, gathered in one
/// place so constructors stay explicit.
pub struct PlatformSeams {
    /// Overlay window lifecycle.
    pub host: Box<dyn OverlayHost>,
    /// Always-on-display toggle.
    pub aod: Box<dyn AodToggle>,
    /// Raw CPU wake hook.
    pub wake: Box<dyn WakeSource>,
    /// Frame presentation sink for the render thread.
    pub surface: Box<dyn PresentSurface>,
}

/// The wired engine. One per process.
#[derive(Debug)]
pub struct Context {
    manager: OverlayManager,
}

impl Context {
    /// Wire the engine with the fixed-interval fallback clock.
    ///
    /// # Errors
    ///
    /// Returns [`HaloError::ThreadSpawn`] when the render or baker
    /// thread cannot start.
    pub fn init(
        seams: PlatformSeams,
        metrics: DisplayMetrics,
        model: &str,
        options: Options,
    ) -> Result<Self, HaloError> {
        Self::init_with_clock(
            seams,
            metrics,
            model,
            options,
            IntervalClock::default,
        )
    }

    /// Wire the engine with a host-supplied frame clock, typically one
    /// aligned to the display's vsync.
    ///
    /// # Errors
    ///
    /// Same contract as [`Context::init`].
    pub fn init_with_clock<C, F>(
        seams: PlatformSeams,
        metrics: DisplayMetrics,
        model: &str,
        options: Options,
        clock_factory: F,
    ) -> Result<Self, HaloError>
    where
        C: FrameClock + 'static,
        F: FnOnce() -> C + Send + 'static,
    {
        let player = SpritePlayer::new(
            seams.surface,
            clock_factory,
            options.timing.clone(),
        )?;
        let controller = IndicatorController::new(
            player,
            metrics,
            options.calibration.for_model(model),
        );
        let mut manager = OverlayManager::new(
            seams.host,
            seams.aod,
            seams.wake,
            controller,
            options,
        );
        manager.set_model(model);
        log::info!("halolight engine initialized for model {model:?}");
        Ok(Self { manager })
    }

    /// Feed one external event through the state machine.
    ///
    /// # Errors
    ///
    /// See [`OverlayManager::handle_signal`].
    pub fn handle_signal(
        &mut self,
        signal: Signal,
        now: Instant,
    ) -> Result<Option<Duration>, HaloError> {
        self.manager.handle_signal(signal, now)
    }

    /// Run a scheduled re-evaluation.
    ///
    /// # Errors
    ///
    /// See [`OverlayManager::evaluate`].
    pub fn poll(
        &mut self,
        now: Instant,
    ) -> Result<Option<Duration>, HaloError> {
        self.manager.evaluate(now)
    }

    /// Direct access to the state machine.
    pub fn manager_mut(&mut self) -> &mut OverlayManager {
        &mut self.manager
    }

    /// Ordered teardown: stop playback, remove the window, release
    /// wake locks. Hosts unregister their listeners afterwards.
    pub fn shutdown(&mut self) {
        self.manager.shutdown();
    }
}
