//! Procedural frame compositions for the three sprite styles.
//!
//! Each style is a small vector composition rasterized frame-by-frame at
//! the exact target size. Frames are baked white-on-transparent and
//! tinted with the active notification color at blit time, so one sheet
//! serves every color.

use glam::Vec2;

use crate::color::Color;
use crate::mode::PlaybackMode;
use crate::sprite::raster::Canvas;

/// Baked mask color; tint is applied when blitting.
const MASK: Color = Color::from_rgb(0xFFFFFF);

/// One of the three sprite-sheet animation styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteStyle {
    /// Arc chases around the ring.
    Swirl,
    /// Full ring fades in and out.
    Blink,
    /// Single expanding pulse.
    Single,
}

impl SpriteStyle {
    /// All styles, in bake order.
    pub const ALL: [Self; 3] = [Self::Swirl, Self::Blink, Self::Single];

    /// Style matching a sprite-sheet playback mode.
    #[must_use]
    pub const fn for_mode(mode: PlaybackMode) -> Option<Self> {
        match mode {
            PlaybackMode::Swirl => Some(Self::Swirl),
            PlaybackMode::Blink => Some(Self::Blink),
            PlaybackMode::Single => Some(Self::Single),
            PlaybackMode::PersistentImage
            | PlaybackMode::PersistentImageHidden => None,
        }
    }

    /// Frames in one full pass.
    #[must_use]
    pub const fn frame_count(self) -> usize {
        match self {
            Self::Swirl => 60,
            Self::Blink => 40,
            Self::Single => 48,
        }
    }

    /// Nominal playback rate in frames per second.
    #[must_use]
    pub const fn frame_rate(self) -> f32 {
        30.0
    }

    /// Natural width/height ratio of the composition. All three styles
    /// are circular, so this is 1.
    #[must_use]
    pub const fn natural_aspect(self) -> f32 {
        1.0
    }

    /// Rasterize frame `frame` of `self` into `canvas`.
    pub fn render_frame(self, frame: usize, canvas: &mut Canvas) {
        let w = canvas.width() as f32;
        let h = canvas.height() as f32;
        let center = Vec2::new(w / 2.0, h / 2.0);
        let outer = w.min(h) / 2.0 - 1.0;
        let inner = (outer - (w.min(h) / 8.0).max(2.0)).max(0.0);
        let t = frame as f32 / self.frame_count() as f32;

        match self {
            Self::Swirl => {
                // A 120° arc chasing clockwise, with a fading tail.
                let head = t * 360.0;
                canvas.ring_arc(
                    center, outer, inner, head, 120.0, MASK, 1.0,
                );
                canvas.ring_arc(
                    center,
                    outer,
                    inner,
                    head - 60.0,
                    60.0,
                    MASK,
                    0.35,
                );
            }
            Self::Blink => {
                // Triangle fade: transparent → opaque → transparent.
                let opacity = 1.0 - (2.0 * t - 1.0).abs();
                canvas.ring_arc(
                    center, outer, inner, 0.0, 360.0, MASK, opacity,
                );
            }
            Self::Single => {
                // Pulse grows from the inner edge out, then fades.
                let grow = (t * 2.0).min(1.0);
                let fade = 1.0 - (t * 2.0 - 1.0).clamp(0.0, 1.0);
                let r = inner + (outer - inner) * grow;
                canvas.ring_arc(
                    center,
                    r,
                    (r - (outer - inner)).max(0.0),
                    0.0,
                    360.0,
                    MASK,
                    fade,
                );
            }
        }
    }
}
