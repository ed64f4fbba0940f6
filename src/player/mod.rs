//! The frame scheduler: render thread, playback state, and drawing.
//!
//! [`SpritePlayer`] owns the render surface and a dedicated render
//! thread driven by a [`FrameClock`]. All mutable scheduler state
//! (target, mode, colors, sheets, playback position) sits behind one
//! mutex; critical sections are field swaps only — rasterization and
//! blitting always happen outside the lock, which is why sheet sets are
//! handed around as [`Arc`]s. Sprite sheets are produced by the
//! [`SheetBaker`](crate::sprite::SheetBaker) loader thread and polled in
//! non-blockingly each tick.

pub mod clock;
pub mod playback;
pub mod ring;
pub mod surface;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use web_time::{Duration, Instant};

pub use clock::{Cadence, FrameClock, IntervalClock};
pub use playback::{Playback, RingParams, TickAction};
pub use surface::{PresentSurface, RenderTarget};

use crate::color::{Color, ColorSequence};
use crate::error::HaloError;
use crate::mode::PlaybackMode;
use crate::options::TimingOptions;
use crate::sprite::raster::blit_tinted;
use crate::sprite::{SheetBaker, SheetSet};

/// Fallback tint when the sequence is empty but a sprite frame is due.
const FALLBACK_TINT: Color = Color::from_rgb(0xFFFFFF);

/// Completion notifications flowing back to the animation controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// One full pass through the sheet finished.
    PassComplete,
}

/// Scheduler state guarded by the player mutex.
#[derive(Debug)]
struct Shared {
    target: RenderTarget,
    colors: ColorSequence,
    active_index: usize,
    speed: f32,
    timing: TimingOptions,
    ring_thickness_px: f32,
    dp_scale: f32,
    playback: Playback,
    /// Current sheet set plus the superseded one, kept one generation
    /// back so a failed re-bake never leaves playback sheetless.
    sheets: Option<Arc<SheetSet>>,
    prev_sheets: Option<Arc<SheetSet>>,
    /// Size of the most recent bake request; suppresses duplicate
    /// requests for identical dimensions.
    requested_dims: Option<(u32, u32)>,
    requested_gen: u64,
}

/// Owns the render surface and the vsync-aligned frame loop.
#[derive(Debug)]
pub struct SpritePlayer {
    shared: Arc<Mutex<Shared>>,
    events_rx: mpsc::Receiver<PlayerEvent>,
    running: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl SpritePlayer {
    /// Spawn the render thread and wait for its clock to come up.
    ///
    /// The clock is constructed on the render thread (vsync sources are
    /// usually thread-affine); readiness is signaled back through a
    /// one-shot channel rather than by polling.
    ///
    /// # Errors
    ///
    /// [`HaloError::ThreadSpawn`] if either background thread cannot be
    /// spawned or the render clock never becomes ready.
    pub fn new<C, F>(
        surface: Box<dyn PresentSurface>,
        clock_factory: F,
        timing: TimingOptions,
    ) -> Result<Self, HaloError>
    where
        C: FrameClock + 'static,
        F: FnOnce() -> C + Send + 'static,
    {
        let baker = SheetBaker::new().map_err(HaloError::ThreadSpawn)?;
        let shared = Arc::new(Mutex::new(Shared {
            target: RenderTarget::default(),
            colors: ColorSequence::default(),
            active_index: 0,
            speed: 1.0,
            timing,
            ring_thickness_px: 3.0,
            dp_scale: 1.0,
            playback: Playback::new(PlaybackMode::Swirl, Instant::now()),
            sheets: None,
            prev_sheets: None,
            requested_dims: None,
            requested_gen: 0,
        }));
        let running = Arc::new(AtomicBool::new(true));
        let (events_tx, events_rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel();

        let thread_shared = Arc::clone(&shared);
        let thread_running = Arc::clone(&running);
        let thread = std::thread::Builder::new()
            .name("indicator-render".into())
            .spawn(move || {
                let mut clock = clock_factory();
                let _ = ready_tx.send(());
                render_loop(
                    &thread_shared,
                    &thread_running,
                    &mut clock,
                    baker,
                    surface,
                    &events_tx,
                );
            })
            .map_err(HaloError::ThreadSpawn)?;

        ready_rx
            .recv_timeout(Duration::from_secs(2))
            .map_err(|_| {
                HaloError::ThreadSpawn(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "render clock never became ready",
                ))
            })?;

        Ok(Self {
            shared,
            events_rx,
            running,
            thread: Some(thread),
        })
    }

    /// Begin a pass from frame zero.
    pub fn play(&self) {
        self.locked(|s| s.playback.play());
    }

    /// Stop playback.
    ///
    /// Graceful lets the current pass finish (the completion event still
    /// fires and the controller decides not to restart); immediate drops
    /// the frame index now.
    pub fn stop(&self, graceful: bool) {
        if !graceful {
            self.locked(|s| s.playback.stop());
        }
    }

    /// Switch playback mode. Callers that need new geometry for the new
    /// mode must push it with [`Self::set_target`] first so both land
    /// before the next tick.
    pub fn set_mode(&self, mode: PlaybackMode) {
        self.locked(|s| s.playback.set_mode(mode, Instant::now()));
    }

    /// Replace the full color sequence (persistent ring gradient).
    pub fn set_colors(&self, colors: ColorSequence) {
        self.locked(|s| s.colors = colors);
    }

    /// Select which sequence entry tints sprite frames.
    pub fn set_active_index(&self, index: usize) {
        self.locked(|s| s.active_index = index);
    }

    /// Update the render target. A dimension change triggers exactly
    /// one sheet re-request on the next tick.
    pub fn set_target(&self, target: RenderTarget) {
        self.locked(|s| {
            if s.target != target {
                s.target = target;
                s.playback.invalidate();
            }
        });
    }

    /// Playback speed multiplier.
    pub fn set_speed(&self, speed: f32) {
        self.locked(|s| s.speed = speed.max(0.01));
    }

    /// Ring stroke thickness (px) and dp scale for persistent drawing.
    pub fn set_ring_style(&self, thickness_px: f32, dp_scale: f32) {
        self.locked(|s| {
            s.ring_thickness_px = thickness_px;
            s.dp_scale = dp_scale;
        });
    }

    /// Replace timing options after a settings change.
    pub fn set_timing(&self, timing: TimingOptions) {
        self.locked(|s| s.timing = timing);
    }

    /// Force a redraw on the next tick (surface content lost).
    pub fn invalidate(&self) {
        self.locked(|s| s.playback.invalidate());
    }

    /// Whether a pass is currently in flight.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.locked(|s| s.playback.is_playing())
    }

    /// Non-blocking poll for completion events.
    #[must_use]
    pub fn try_recv_event(&self) -> Option<PlayerEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Stop the render thread, drop sprite sheets, and join.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
        self.locked(|s| {
            s.playback.stop();
            s.sheets = None;
            s.prev_sheets = None;
        });
    }

    fn locked<R>(&self, f: impl FnOnce(&mut Shared) -> R) -> R {
        let mut guard = match self.shared.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

impl Drop for SpritePlayer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// One tick's worth of decisions, snapshotted under the lock.
struct TickPlan {
    action: TickAction,
    target: RenderTarget,
    tint: Color,
    colors: ColorSequence,
    sheets: Option<Arc<SheetSet>>,
    mode: PlaybackMode,
    thickness_px: f32,
    dp_scale: f32,
    bake: Option<(u32, u32, u64)>,
}

fn render_loop(
    shared: &Arc<Mutex<Shared>>,
    running: &Arc<AtomicBool>,
    clock: &mut dyn FrameClock,
    mut baker: SheetBaker,
    mut surface: Box<dyn PresentSurface>,
    events_tx: &mpsc::Sender<PlayerEvent>,
) {
    while running.load(Ordering::Acquire) {
        let now = clock.wait(cadence_of(shared));
        if !running.load(Ordering::Acquire) {
            break;
        }

        let baked = baker.try_recv();
        let plan = plan_tick(shared, now, baked);

        if let Some((w, h, generation)) = plan.bake {
            baker.submit(w, h, generation);
        }

        match plan.action {
            TickAction::Skip => {}
            TickAction::Complete => {
                let _ = events_tx.send(PlayerEvent::PassComplete);
            }
            TickAction::DrawBlank => {
                let canvas = surface::begin_frame(&plan.target);
                let frame = surface::finish_frame(canvas, &plan.target);
                surface.present(&frame);
            }
            TickAction::DrawFrame(index) => {
                draw_sprite_frame(&plan, index, surface.as_mut());
            }
            TickAction::DrawRing(params) => {
                let mut canvas = surface::begin_frame(&plan.target);
                ring::draw(
                    &mut canvas,
                    &plan.target,
                    &params,
                    &plan.colors,
                    plan.thickness_px,
                    plan.dp_scale,
                );
                let frame = surface::finish_frame(canvas, &plan.target);
                surface.present(&frame);
            }
        }
    }
    baker.shutdown();
}

fn cadence_of(shared: &Arc<Mutex<Shared>>) -> Cadence {
    let Ok(s) = shared.lock() else {
        return Cadence::Animation;
    };
    if s.playback.ring_settled(Instant::now(), &s.timing) {
        Cadence::Relaxed
    } else {
        Cadence::Animation
    }
}

/// Snapshot state and make the tick decision inside one short critical
/// section. Drawing happens outside, on the Arc'd sheet set.
fn plan_tick(
    shared: &Arc<Mutex<Shared>>,
    now: Instant,
    baked: Option<SheetSet>,
) -> TickPlan {
    let mut s = match shared.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    };

    if let Some(set) = baked {
        if set.generation == s.requested_gen {
            s.prev_sheets = s.sheets.take();
            s.sheets = Some(Arc::new(set));
            s.playback.invalidate();
        } else {
            log::debug!(
                "discarding stale sheet bake gen {} (current {})",
                set.generation,
                s.requested_gen
            );
        }
    }

    let mode = s.playback.mode();
    let dims = (s.target.width(), s.target.height());
    let mut bake = None;
    if mode.uses_sprite_sheet()
        && s.target.is_drawable()
        && s.requested_dims != Some(dims)
    {
        s.requested_gen += 1;
        s.requested_dims = Some(dims);
        bake = Some((dims.0, dims.1, s.requested_gen));
    }

    let sheets = s.sheets.clone().or_else(|| s.prev_sheets.clone());
    let action = if s.target.is_drawable() {
        let speed = s.speed;
        let colors = s.colors.clone();
        let timing = s.timing.clone();
        let sheet = sheets
            .as_deref()
            .filter(|set| (set.width, set.height) == dims)
            .and_then(|set| set.sheet_for(mode));
        s.playback.tick(now, sheet, &colors, speed, &timing)
    } else {
        TickAction::Skip
    };

    TickPlan {
        action,
        target: s.target,
        tint: s.colors.color_at(s.active_index).unwrap_or(FALLBACK_TINT),
        colors: s.colors.clone(),
        sheets,
        mode,
        thickness_px: s.ring_thickness_px,
        dp_scale: s.dp_scale,
        bake,
    }
}

fn draw_sprite_frame(
    plan: &TickPlan,
    index: usize,
    surface: &mut dyn PresentSurface,
) {
    let Some(set) = plan.sheets.as_deref() else {
        return;
    };
    let Some(sheet) = set.sheet_for(plan.mode) else {
        return;
    };
    let Some((page, rect)) = sheet.frame(index) else {
        log::warn!("frame {index} out of range, skipping draw");
        return;
    };
    let mut canvas = surface::begin_frame(&plan.target);
    blit_tinted(&mut canvas, page, rect, 0, 0, plan.tint);
    let frame = surface::finish_frame(canvas, &plan.target);
    surface.present(&frame);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    /// Surface that records how many frames were presented.
    struct CountingSurface {
        presents: Arc<Mutex<usize>>,
    }

    impl PresentSurface for CountingSurface {
        fn present(&mut self, _frame: &image::RgbaImage) {
            if let Ok(mut n) = self.presents.lock() {
                *n += 1;
            }
        }
    }

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn fast_clock() -> IntervalClock {
        IntervalClock::new(
            Duration::from_millis(2),
            Duration::from_millis(10),
        )
    }

    fn drawable_target() -> RenderTarget {
        RenderTarget {
            bounds: Rect::new(0, 0, 24, 24),
            draw_background_opaque: false,
            transparent_hole: None,
        }
    }

    #[test]
    fn stale_bake_generation_is_discarded() {
        let shared = Arc::new(Mutex::new(Shared {
            target: drawable_target(),
            colors: ColorSequence::default(),
            active_index: 0,
            speed: 1.0,
            timing: TimingOptions::default(),
            ring_thickness_px: 3.0,
            dp_scale: 1.0,
            playback: Playback::new(PlaybackMode::Blink, Instant::now()),
            sheets: None,
            prev_sheets: None,
            requested_dims: Some((24, 24)),
            requested_gen: 2,
        }));

        // A completion from a superseded request must not install.
        let stale = SheetSet::bake(24, 24, 1);
        let _ = plan_tick(&shared, Instant::now(), Some(stale));
        assert!(shared.lock().unwrap().sheets.is_none());

        let current = SheetSet::bake(24, 24, 2);
        let _ = plan_tick(&shared, Instant::now(), Some(current));
        let s = shared.lock().unwrap();
        assert_eq!(s.sheets.as_ref().map(|set| set.generation), Some(2));
        assert!(s.prev_sheets.is_none());
    }

    #[test]
    fn pass_completes_and_presents_frames() {
        init_logs();
        let presents = Arc::new(Mutex::new(0usize));
        let surface = Box::new(CountingSurface {
            presents: Arc::clone(&presents),
        });
        let mut player = SpritePlayer::new(
            surface,
            fast_clock,
            TimingOptions::default(),
        )
        .unwrap();

        player.set_target(drawable_target());
        player.set_colors(ColorSequence::new(vec![Color::from_rgb(
            0xFF0000,
        )]));
        // 30 fps × 40 frames at 20× speed ≈ 67 ms per pass.
        player.set_speed(20.0);
        player.set_mode(PlaybackMode::Blink);
        player.play();

        let deadline = std::time::Instant::now()
            + std::time::Duration::from_secs(5);
        let mut completed = false;
        while std::time::Instant::now() < deadline {
            if player.try_recv_event() == Some(PlayerEvent::PassComplete) {
                completed = true;
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(completed, "pass never completed");
        assert!(*presents.lock().unwrap() > 0, "nothing was presented");
        assert!(!player.is_playing());
        player.shutdown();
    }

    #[test]
    fn undrawable_target_never_presents() {
        init_logs();
        let presents = Arc::new(Mutex::new(0usize));
        let surface = Box::new(CountingSurface {
            presents: Arc::clone(&presents),
        });
        let mut player = SpritePlayer::new(
            surface,
            fast_clock,
            TimingOptions::default(),
        )
        .unwrap();

        player.set_colors(ColorSequence::new(vec![Color::from_rgb(
            0x00FF00,
        )]));
        player.play();
        std::thread::sleep(std::time::Duration::from_millis(50));
        assert_eq!(*presents.lock().unwrap(), 0);
        player.shutdown();
    }

    #[test]
    fn shutdown_joins_cleanly() {
        let presents = Arc::new(Mutex::new(0usize));
        let surface = Box::new(CountingSurface {
            presents: Arc::clone(&presents),
        });
        let mut player = SpritePlayer::new(
            surface,
            fast_clock,
            TimingOptions::default(),
        )
        .unwrap();
        player.shutdown();
        // Idempotent.
        player.shutdown();
    }
}
