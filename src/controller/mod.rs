//! The animation controller: geometry, color sequencing, and player
//! commands.
//!
//! Sits between the overlay state machine (which decides *whether* the
//! indicator shows) and the frame scheduler (which decides *when* pixels
//! move). Translates "show these N colors in this mode" into target
//! geometry and playback commands, and keeps the round-robin color
//! rotation going as passes complete.

pub mod layout;
pub mod sequence;

pub use layout::GeometryProvider;
pub use sequence::{Advance, ColorSequencer};

use crate::color::ColorSequence;
use crate::geometry::{DisplayMetrics, Rect};
use crate::mode::PlaybackMode;
use crate::options::DeviceCalibration;
use crate::player::{PlayerEvent, RenderTarget, SpritePlayer};
use crate::sprite::SpriteStyle;

/// Drives the player from abstract show/hide requests.
#[derive(Debug)]
pub struct IndicatorController {
    player: SpritePlayer,
    sequencer: ColorSequencer,
    provider: GeometryProvider,
    metrics: DisplayMetrics,
    calibration: DeviceCalibration,
    clock_exclusion: Option<Rect>,
    mode: PlaybackMode,
    black_fill: bool,
    target: Option<RenderTarget>,
    /// Graceful stop requested; the pass in flight finishes and the
    /// completion handler goes idle instead of advancing.
    stopping: bool,
    geometry_recomputes: u64,
}

impl IndicatorController {
    /// Wrap a player with initial display metrics and calibration.
    #[must_use]
    pub fn new(
        player: SpritePlayer,
        metrics: DisplayMetrics,
        calibration: DeviceCalibration,
    ) -> Self {
        let controller = Self {
            player,
            sequencer: ColorSequencer::default(),
            provider: GeometryProvider::NotAvailable,
            metrics,
            calibration,
            clock_exclusion: None,
            mode: PlaybackMode::Swirl,
            black_fill: false,
            target: None,
            stopping: false,
            geometry_recomputes: 0,
        };
        controller.push_style();
        controller
    }

    /// Show `colors` in `mode`.
    ///
    /// A mode change that crosses into or out of persistent-image
    /// rendering recomputes geometry before any playback command lands,
    /// so the next tick already sees the new target. While a sprite
    /// pass is in flight a new color set is queued and swaps in at the
    /// next wrap-around instead of restarting mid-pass.
    pub fn show(
        &mut self,
        colors: ColorSequence,
        mode: PlaybackMode,
        black_fill: bool,
        once: bool,
    ) {
        let crossing =
            mode.is_persistent() != self.mode.is_persistent();
        self.black_fill = black_fill;
        if crossing || self.target.is_none() {
            self.recompute_geometry();
        }

        let effective = if mode.is_persistent() && self.target.is_none()
        {
            // Geometry unknown: keep the surface but draw nothing.
            PlaybackMode::PersistentImageHidden
        } else {
            mode
        };
        self.mode = mode;
        self.stopping = false;

        if effective.uses_sprite_sheet() && self.player.is_playing() {
            // The pass in flight keeps its colors; the queued set
            // reaches the player in the completion handler.
            self.sequencer.queue(colors);
            self.player.set_mode(effective);
            return;
        }

        self.sequencer.start(colors.clone(), once);
        self.player.set_colors(colors);
        self.player.set_active_index(0);
        self.player.set_mode(effective);
        if effective.uses_sprite_sheet() {
            self.player.play();
        }
    }

    /// Stop showing.
    ///
    /// Graceful lets the current pass finish; immediate drops playback
    /// state now.
    pub fn hide(&mut self, immediate: bool) {
        if immediate {
            self.stopping = false;
            self.player.stop(false);
        } else {
            self.stopping = true;
            self.player.stop(true);
        }
    }

    /// Absorb a geometry signal from the detection source.
    pub fn set_geometry(
        &mut self,
        provider: GeometryProvider,
        clock_exclusion: Option<Rect>,
    ) {
        self.provider = provider;
        self.clock_exclusion = clock_exclusion;
        self.recompute_geometry();
        if self.mode.is_persistent() {
            // Promote out of the hidden placeholder once bounds exist.
            let effective = if self.target.is_some() {
                self.mode
            } else {
                PlaybackMode::PersistentImageHidden
            };
            self.player.set_mode(effective);
        }
    }

    /// Display configuration changed; cached cutout geometry is stale.
    pub fn set_display_metrics(&mut self, metrics: DisplayMetrics) {
        if self.metrics != metrics {
            self.metrics = metrics;
            self.push_style();
            self.recompute_geometry();
        }
    }

    /// Swap in new device calibration after a settings change.
    pub fn set_calibration(&mut self, calibration: DeviceCalibration) {
        self.calibration = calibration;
        self.push_style();
        self.recompute_geometry();
    }

    /// Poll player completions and keep the color rotation going.
    /// Returns `true` while playback remains active.
    pub fn pump(&mut self) -> bool {
        while let Some(event) = self.player.try_recv_event() {
            match event {
                PlayerEvent::PassComplete => {
                    if self.stopping {
                        self.stopping = false;
                        continue;
                    }
                    match self.sequencer.advance() {
                        Advance::Next(index) => {
                            self.player.set_active_index(index);
                            self.player.play();
                        }
                        Advance::Swapped => {
                            self.player.set_colors(
                                self.sequencer.colors().clone(),
                            );
                            self.player.set_active_index(0);
                            self.player.play();
                        }
                        Advance::Finished => {
                            self.player.stop(false);
                        }
                    }
                }
            }
        }
        self.player.is_playing() || self.mode.is_persistent()
    }

    /// Force the player to redraw (surface content lost).
    pub fn invalidate(&self) {
        self.player.invalidate();
    }

    /// Number of geometry recomputes performed so far.
    #[must_use]
    pub fn geometry_recomputes(&self) -> u64 {
        self.geometry_recomputes
    }

    /// Current target bounds, if geometry is known.
    #[must_use]
    pub fn target_bounds(&self) -> Option<Rect> {
        self.target.map(|t| t.bounds)
    }

    /// Borrow the underlying player.
    #[must_use]
    pub fn player(&self) -> &SpritePlayer {
        &self.player
    }

    /// Stop playback and tear down the render thread.
    pub fn shutdown(&mut self) {
        self.player.stop(false);
        self.player.shutdown();
    }

    fn recompute_geometry(&mut self) {
        self.geometry_recomputes += 1;
        let bounds = layout::compute_bounds(
            &self.provider,
            &self.metrics,
            &self.calibration,
            SpriteStyle::Swirl.natural_aspect(),
        );
        match bounds {
            Some(bounds) => {
                let hole = self.clock_exclusion.and_then(|e| {
                    layout::surface_local_hole(bounds, e)
                });
                let target = RenderTarget {
                    bounds,
                    draw_background_opaque: self.black_fill,
                    transparent_hole: hole,
                };
                self.target = Some(target);
                self.player.set_target(target);
            }
            None => {
                self.target = None;
                self.player.set_target(RenderTarget::default());
            }
        }
    }

    fn push_style(&self) {
        self.player.set_ring_style(
            self.metrics.dp_to_px(self.calibration.ring_thickness_dp),
            self.metrics.dp_to_px(1.0),
        );
        self.player.set_speed(self.calibration.speed);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use web_time::Duration;

    use super::*;
    use crate::color::Color;
    use crate::geometry::{CutoutInfo, Rotation};
    use crate::options::TimingOptions;
    use crate::player::{IntervalClock, PresentSurface};

    struct NullSurface;
    impl PresentSurface for NullSurface {
        fn present(&mut self, _frame: &image::RgbaImage) {}
    }

    struct CountingSurface(Arc<Mutex<usize>>);
    impl PresentSurface for CountingSurface {
        fn present(&mut self, _frame: &image::RgbaImage) {
            if let Ok(mut n) = self.0.lock() {
                *n += 1;
            }
        }
    }

    /// Records summed red/green channels per presented frame.
    struct TintLog(Arc<Mutex<Vec<(u64, u64)>>>);
    impl PresentSurface for TintLog {
        fn present(&mut self, frame: &image::RgbaImage) {
            let mut red = 0u64;
            let mut green = 0u64;
            for p in frame.pixels() {
                red += u64::from(p[0]);
                green += u64::from(p[1]);
            }
            if let Ok(mut v) = self.0.lock() {
                v.push((red, green));
            }
        }
    }

    fn make_controller() -> IndicatorController {
        let player = SpritePlayer::new(
            Box::new(NullSurface),
            || {
                IntervalClock::new(
                    Duration::from_millis(2),
                    Duration::from_millis(10),
                )
            },
            TimingOptions::default(),
        )
        .unwrap();
        IndicatorController::new(
            player,
            DisplayMetrics {
                width: 1080,
                height: 2400,
                density_dpi: 480.0,
                rotation: Rotation::Deg0,
            },
            DeviceCalibration::default(),
        )
    }

    fn cutout_provider() -> GeometryProvider {
        GeometryProvider::DeviceCalibrationTable(CutoutInfo {
            area_rect: Rect::new(500, 40, 80, 80),
            native_resolution: (1080, 2400),
        })
    }

    fn red() -> ColorSequence {
        ColorSequence::new(vec![Color::from_rgb(0xFF0000)])
    }

    #[test]
    fn mode_switch_recomputes_geometry_exactly_once() {
        let mut c = make_controller();
        c.set_geometry(cutout_provider(), None);
        c.show(red(), PlaybackMode::Swirl, false, false);
        let before = c.geometry_recomputes();

        c.show(red(), PlaybackMode::PersistentImage, true, false);
        assert_eq!(c.geometry_recomputes(), before + 1);

        // Staying within persistent modes adds nothing.
        c.show(red(), PlaybackMode::PersistentImage, true, false);
        assert_eq!(c.geometry_recomputes(), before + 1);
        c.shutdown();
    }

    #[test]
    fn persistent_without_geometry_stays_hidden() {
        let mut c = make_controller();
        c.show(red(), PlaybackMode::PersistentImage, true, false);
        assert!(c.target_bounds().is_none());

        // Geometry arriving promotes out of the hidden placeholder.
        c.set_geometry(cutout_provider(), None);
        assert!(c.target_bounds().is_some());
        c.shutdown();
    }

    #[test]
    fn color_round_robin_across_completions() {
        let presents = Arc::new(Mutex::new(0usize));
        let player = SpritePlayer::new(
            Box::new(CountingSurface(Arc::clone(&presents))),
            || {
                IntervalClock::new(
                    Duration::from_millis(1),
                    Duration::from_millis(10),
                )
            },
            TimingOptions::default(),
        )
        .unwrap();
        let mut c = IndicatorController::new(
            player,
            DisplayMetrics {
                width: 1080,
                height: 2400,
                density_dpi: 480.0,
                rotation: Rotation::Deg0,
            },
            DeviceCalibration {
                speed: 40.0,
                ..DeviceCalibration::default()
            },
        );
        c.set_geometry(cutout_provider(), None);
        c.show(
            ColorSequence::new(vec![
                Color::from_rgb(0x111111),
                Color::from_rgb(0x222222),
                Color::from_rgb(0x333333),
            ]),
            PlaybackMode::Blink,
            false,
            false,
        );

        // Pump through several completions; the sequencer must wrap
        // 0,1,2,0,1,… and playback must stay alive throughout.
        let deadline = std::time::Instant::now()
            + std::time::Duration::from_secs(10);
        let mut indices = vec![c.sequencer.index()];
        while indices.len() < 5
            && std::time::Instant::now() < deadline
        {
            let _ = c.pump();
            let idx = c.sequencer.index();
            if indices.last() != Some(&idx) {
                indices.push(idx);
            }
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        assert!(
            indices.starts_with(&[0, 1, 2, 0]),
            "unexpected rotation {indices:?}"
        );
        assert!(*presents.lock().unwrap() > 0);
        c.shutdown();
    }

    #[test]
    fn queued_colors_wait_for_the_pass_to_end() {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let player = SpritePlayer::new(
            Box::new(TintLog(Arc::clone(&frames))),
            || {
                IntervalClock::new(
                    Duration::from_millis(1),
                    Duration::from_millis(10),
                )
            },
            TimingOptions::default(),
        )
        .unwrap();
        // Slow enough that the first pass outlives the whole test.
        let mut c = IndicatorController::new(
            player,
            DisplayMetrics {
                width: 1080,
                height: 2400,
                density_dpi: 480.0,
                rotation: Rotation::Deg0,
            },
            DeviceCalibration {
                speed: 0.1,
                ..DeviceCalibration::default()
            },
        );
        c.set_geometry(cutout_provider(), None);
        c.show(red(), PlaybackMode::Blink, false, false);

        let deadline = std::time::Instant::now()
            + std::time::Duration::from_secs(5);
        while std::time::Instant::now() < deadline {
            if frames.lock().unwrap().iter().any(|&(r, _)| r > 0) {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(
            frames.lock().unwrap().iter().any(|&(r, _)| r > 0),
            "no red frame from the first pass"
        );

        // Replacement arrives mid-pass and is queued; with no
        // completion pumped the pass in flight must keep its tint.
        assert!(c.player.is_playing());
        c.show(
            ColorSequence::new(vec![Color::from_rgb(0x00FF00)]),
            PlaybackMode::Blink,
            false,
            false,
        );
        std::thread::sleep(std::time::Duration::from_millis(800));
        assert!(
            frames.lock().unwrap().iter().all(|&(_, g)| g == 0),
            "queued colors tinted the pass in flight"
        );
        c.shutdown();
    }

    #[test]
    fn graceful_hide_goes_idle_after_pass() {
        let mut c = make_controller();
        c.set_geometry(cutout_provider(), None);
        c.show(red(), PlaybackMode::Blink, false, false);
        c.hide(false);

        let deadline = std::time::Instant::now()
            + std::time::Duration::from_secs(10);
        while c.player.is_playing()
            && std::time::Instant::now() < deadline
        {
            let _ = c.pump();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(!c.player.is_playing());
        c.shutdown();
    }
}
