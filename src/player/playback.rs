//! The per-tick playback state machine.
//!
//! This is the deliberately pure core of the frame scheduler: given the
//! current time and a snapshot of mode/colors/sheet state it decides
//! whether this tick draws anything and what. The hard requirement is
//! the dirty-draw contract: the sprite path never redraws solely because
//! time advanced — only a changed frame index, changed color set, mode
//! switch, or explicit invalidation produces a draw. Doze-mode power
//! correctness depends on this, since the host compositor only refreshes
//! the overlay opportunistically there.

use web_time::{Duration, Instant};

use crate::color::ColorSequence;
use crate::mode::PlaybackMode;
use crate::options::TimingOptions;
use crate::sprite::SpriteSheet;

/// Procedural ring parameters for a persistent-image draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingParams {
    /// Gradient rotation in degrees, `cycle_part * 360`.
    pub rotation_deg: f32,
    /// Radial drift fraction in `[0, 1]`, folded as a triangle wave so
    /// the cycle boundary has no jump. Scales the 16 dp drift span.
    pub drift_frac: f32,
}

/// What one tick should do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickAction {
    /// Nothing changed; draw nothing.
    Skip,
    /// Sprite mode with no sheet yet: draw a placeholder blank frame.
    DrawBlank,
    /// Blit this sprite frame.
    DrawFrame(usize),
    /// Draw the procedural persistent ring.
    DrawRing(RingParams),
    /// The current pass ran past its last frame. The caller decides
    /// whether to start another pass (next color) or go idle.
    Complete,
}

/// Playback position and dirty-tracking state.
#[derive(Debug)]
pub struct Playback {
    mode: PlaybackMode,
    mode_started: Instant,
    drawing: bool,
    /// Set at the first tick of a pass; `None` means "not started".
    pass_started: Option<Instant>,
    last_drawn_frame: Option<usize>,
    last_colors: Option<ColorSequence>,
    last_ring_draw: Option<Instant>,
    invalidated: bool,
}

impl Playback {
    /// Idle playback in the given mode.
    #[must_use]
    pub fn new(mode: PlaybackMode, now: Instant) -> Self {
        Self {
            mode,
            mode_started: now,
            drawing: false,
            pass_started: None,
            last_drawn_frame: None,
            last_colors: None,
            last_ring_draw: None,
            invalidated: true,
        }
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Whether a pass is in flight.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.drawing
    }

    /// Begin a pass; the frame index resets to "not started".
    pub fn play(&mut self) {
        self.drawing = true;
        self.pass_started = None;
        self.last_drawn_frame = None;
    }

    /// Stop immediately; drops the frame index.
    pub fn stop(&mut self) {
        self.drawing = false;
        self.pass_started = None;
        self.last_drawn_frame = None;
    }

    /// Switch modes. Resets the burn-in cycle origin and forces the
    /// next tick to draw.
    pub fn set_mode(&mut self, mode: PlaybackMode, now: Instant) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.mode_started = now;
        self.last_drawn_frame = None;
        self.last_ring_draw = None;
        self.invalidated = true;
    }

    /// Force the next tick to draw regardless of dirty tracking (the
    /// surface content was lost or resized).
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    /// Whether the persistent ring is past its fast-draw window and the
    /// render loop may relax its tick cadence.
    #[must_use]
    pub fn ring_settled(&self, now: Instant, timing: &TimingOptions) -> bool {
        self.mode.is_persistent()
            && now.saturating_duration_since(self.mode_started)
                >= Duration::from_millis(
                    timing.ring_settle_ms + timing.ring_fast_window_ms,
                )
    }

    /// Decide what this tick does.
    pub fn tick(
        &mut self,
        now: Instant,
        sheet: Option<&SpriteSheet>,
        colors: &ColorSequence,
        speed: f32,
        timing: &TimingOptions,
    ) -> TickAction {
        match self.mode {
            PlaybackMode::PersistentImageHidden => TickAction::Skip,
            PlaybackMode::PersistentImage => {
                self.tick_ring(now, colors, timing)
            }
            _ => self.tick_sprite(now, sheet, colors, speed),
        }
    }

    fn tick_sprite(
        &mut self,
        now: Instant,
        sheet: Option<&SpriteSheet>,
        colors: &ColorSequence,
        speed: f32,
    ) -> TickAction {
        if !self.drawing {
            return TickAction::Skip;
        }
        let Some(sheet) = sheet.filter(|s| s.is_valid()) else {
            // Keep the surface defined until a sheet shows up.
            return TickAction::DrawBlank;
        };

        let started = *self.pass_started.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started);
        let rate = f64::from(sheet.frame_rate()) * f64::from(speed.max(0.01));
        let index = (elapsed.as_secs_f64() * rate) as usize;

        if index >= sheet.frame_count() {
            self.drawing = false;
            self.pass_started = None;
            return TickAction::Complete;
        }

        let colors_changed =
            self.last_colors.as_ref() != Some(colors);
        if Some(index) == self.last_drawn_frame
            && !colors_changed
            && !self.invalidated
        {
            return TickAction::Skip;
        }

        self.last_drawn_frame = Some(index);
        if colors_changed {
            self.last_colors = Some(colors.clone());
        }
        self.invalidated = false;
        TickAction::DrawFrame(index)
    }

    fn tick_ring(
        &mut self,
        now: Instant,
        colors: &ColorSequence,
        timing: &TimingOptions,
    ) -> TickAction {
        let since_mode = now.saturating_duration_since(self.mode_started);

        // Upstream geometry is still settling right after a mode
        // switch; drawing here produces a visible jump.
        if since_mode < Duration::from_millis(timing.ring_settle_ms) {
            return TickAction::Skip;
        }

        let colors_changed =
            self.last_colors.as_ref() != Some(colors);
        let fast = since_mode
            < Duration::from_millis(
                timing.ring_settle_ms + timing.ring_fast_window_ms,
            );
        let throttled_due = self.last_ring_draw.is_none_or(|t| {
            now.saturating_duration_since(t)
                >= Duration::from_millis(timing.ring_throttle_ms)
        });

        if !(fast || throttled_due || colors_changed || self.invalidated) {
            return TickAction::Skip;
        }

        let cycle = timing.burn_in_cycle().as_secs_f64();
        let part =
            ((since_mode.as_secs_f64() % cycle) / cycle) as f32;

        self.last_ring_draw = Some(now);
        if colors_changed {
            self.last_colors = Some(colors.clone());
        }
        self.invalidated = false;
        TickAction::DrawRing(RingParams {
            rotation_deg: part * 360.0,
            drift_frac: 1.0 - (2.0 * part - 1.0).abs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::sprite::{SpriteSheet, SpriteStyle};

    fn seq(rgb: u32) -> ColorSequence {
        ColorSequence::new(vec![Color::from_rgb(rgb)])
    }

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn sprite_pass_walks_frames_and_completes() {
        let base = Instant::now();
        let sheet = SpriteSheet::bake(SpriteStyle::Blink, 8, 8);
        let timing = TimingOptions::default();
        let colors = seq(0xFF0000);

        let mut pb = Playback::new(PlaybackMode::Blink, base);
        pb.play();

        // First tick draws frame 0.
        assert_eq!(
            pb.tick(base, Some(&sheet), &colors, 1.0, &timing),
            TickAction::DrawFrame(0)
        );
        // One frame interval later (30 fps → ~33ms) index advances.
        assert_eq!(
            pb.tick(at(base, 34), Some(&sheet), &colors, 1.0, &timing),
            TickAction::DrawFrame(1)
        );
        // Far past the end of the pass.
        assert_eq!(
            pb.tick(at(base, 10_000), Some(&sheet), &colors, 1.0, &timing),
            TickAction::Complete
        );
        assert!(!pb.is_playing());
    }

    #[test]
    fn unchanged_frame_index_never_redraws() {
        let base = Instant::now();
        let sheet = SpriteSheet::bake(SpriteStyle::Blink, 8, 8);
        let timing = TimingOptions::default();
        let colors = seq(0xFF0000);

        let mut pb = Playback::new(PlaybackMode::Blink, base);
        pb.play();
        let _ = pb.tick(base, Some(&sheet), &colors, 1.0, &timing);

        // Many ticks within the same frame interval: zero draws.
        for ms in [1, 5, 10, 20, 30] {
            assert_eq!(
                pb.tick(at(base, ms), Some(&sheet), &colors, 1.0, &timing),
                TickAction::Skip
            );
        }
    }

    #[test]
    fn color_change_forces_redraw_of_same_frame() {
        let base = Instant::now();
        let sheet = SpriteSheet::bake(SpriteStyle::Blink, 8, 8);
        let timing = TimingOptions::default();

        let mut pb = Playback::new(PlaybackMode::Blink, base);
        pb.play();
        let _ = pb.tick(base, Some(&sheet), &seq(0xFF0000), 1.0, &timing);
        assert_eq!(
            pb.tick(at(base, 1), Some(&sheet), &seq(0x00FF00), 1.0, &timing),
            TickAction::DrawFrame(0)
        );
    }

    #[test]
    fn invalidation_forces_redraw() {
        let base = Instant::now();
        let sheet = SpriteSheet::bake(SpriteStyle::Blink, 8, 8);
        let timing = TimingOptions::default();
        let colors = seq(0xFF0000);

        let mut pb = Playback::new(PlaybackMode::Blink, base);
        pb.play();
        let _ = pb.tick(base, Some(&sheet), &colors, 1.0, &timing);
        pb.invalidate();
        assert_eq!(
            pb.tick(at(base, 1), Some(&sheet), &colors, 1.0, &timing),
            TickAction::DrawFrame(0)
        );
    }

    #[test]
    fn missing_sheet_draws_blank_placeholder() {
        let base = Instant::now();
        let timing = TimingOptions::default();
        let colors = seq(0xFF0000);

        let mut pb = Playback::new(PlaybackMode::Swirl, base);
        pb.play();
        assert_eq!(
            pb.tick(base, None, &colors, 1.0, &timing),
            TickAction::DrawBlank
        );
        assert_eq!(
            pb.tick(at(base, 5), None, &colors, 1.0, &timing),
            TickAction::DrawBlank
        );
    }

    #[test]
    fn idle_playback_skips() {
        let base = Instant::now();
        let sheet = SpriteSheet::bake(SpriteStyle::Blink, 8, 8);
        let timing = TimingOptions::default();
        assert_eq!(
            Playback::new(PlaybackMode::Blink, base).tick(
                base,
                Some(&sheet),
                &seq(0xFF0000),
                1.0,
                &timing
            ),
            TickAction::Skip
        );
    }

    #[test]
    fn ring_suppressed_during_settle_window() {
        let base = Instant::now();
        let timing = TimingOptions::default();
        let colors = seq(0xFF0000);

        let mut pb = Playback::new(PlaybackMode::PersistentImage, base);
        assert_eq!(
            pb.tick(at(base, 100), None, &colors, 1.0, &timing),
            TickAction::Skip
        );
        // Past the 2s settle window, draws start.
        assert!(matches!(
            pb.tick(at(base, 2500), None, &colors, 1.0, &timing),
            TickAction::DrawRing(_)
        ));
    }

    #[test]
    fn ring_throttles_after_fast_window() {
        let base = Instant::now();
        let timing = TimingOptions::default();
        let colors = seq(0xFF0000);

        let mut pb = Playback::new(PlaybackMode::PersistentImage, base);
        // End of the fast window: draws every tick.
        assert!(matches!(
            pb.tick(at(base, 11_000), None, &colors, 1.0, &timing),
            TickAction::DrawRing(_)
        ));
        // Shortly after the fast window: throttled.
        assert_eq!(
            pb.tick(at(base, 13_000), None, &colors, 1.0, &timing),
            TickAction::Skip
        );
        // 8s after the last draw: due again.
        assert!(matches!(
            pb.tick(at(base, 19_100), None, &colors, 1.0, &timing),
            TickAction::DrawRing(_)
        ));
        // Invalidation bypasses the throttle.
        pb.invalidate();
        assert!(matches!(
            pb.tick(at(base, 19_200), None, &colors, 1.0, &timing),
            TickAction::DrawRing(_)
        ));
        assert!(pb.ring_settled(at(base, 13_000), &timing));
    }

    #[test]
    fn burn_in_cycle_wraps_without_discontinuity() {
        let base = Instant::now();
        // Throttle shrunk so consecutive draws land around the wrap.
        let timing = TimingOptions {
            ring_throttle_ms: 0,
            ..TimingOptions::default()
        };
        let colors = seq(0xFF0000);

        let mut pb = Playback::new(PlaybackMode::PersistentImage, base);
        let cycle_ms = timing.burn_in_cycle_secs * 1000;

        let before = match pb.tick(
            at(base, cycle_ms - 100),
            None,
            &colors,
            1.0,
            &timing,
        ) {
            TickAction::DrawRing(p) => p,
            other => panic!("expected ring draw, got {other:?}"),
        };
        let after = match pb.tick(
            at(base, cycle_ms + 100),
            None,
            &colors,
            1.0,
            &timing,
        ) {
            TickAction::DrawRing(p) => p,
            other => panic!("expected ring draw, got {other:?}"),
        };

        // Rotation wraps modulo 360: the angular step across the
        // boundary matches the step elsewhere (200ms of a 600s cycle).
        let step = (after.rotation_deg - before.rotation_deg)
            .rem_euclid(360.0);
        let expected = 0.2 / 600.0 * 360.0;
        assert!((step - expected).abs() < 0.01, "step was {step}");

        // Radial drift is triangle-folded: continuous through the wrap.
        let drift_jump = (after.drift_frac - before.drift_frac).abs();
        assert!(drift_jump < 0.001, "drift jumped by {drift_jump}");
    }

    #[test]
    fn hidden_mode_never_draws() {
        let base = Instant::now();
        let timing = TimingOptions::default();
        let mut pb =
            Playback::new(PlaybackMode::PersistentImageHidden, base);
        pb.play();
        assert_eq!(
            pb.tick(at(base, 5000), None, &seq(0xFF0000), 1.0, &timing),
            TickAction::Skip
        );
    }
}
