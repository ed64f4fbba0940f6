//! The render target record and the host-facing surface seam.

use image::RgbaImage;

use crate::geometry::Rect;
use crate::sprite::raster::Canvas;

/// Where and how the player draws.
///
/// Owned exclusively by the frame scheduler and written only inside its
/// critical section; the overlay state machine sends updates through
/// player commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderTarget {
    /// Surface bounds in display pixels.
    pub bounds: Rect,
    /// Fill the frame with opaque black before drawing content.
    pub draw_background_opaque: bool,
    /// Surface-local rectangle punched fully transparent every frame,
    /// keeping the system clock visible through the overlay.
    pub transparent_hole: Option<Rect>,
}

impl RenderTarget {
    /// Frame width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.bounds.width
    }

    /// Frame height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.bounds.height
    }

    /// Whether the target has drawable area.
    #[must_use]
    pub const fn is_drawable(&self) -> bool {
        !self.bounds.is_empty()
    }
}

/// Host-side sink for finished frames.
///
/// The host presents each frame inside the overlay surface at
/// [`RenderTarget::bounds`]. Implementations must not block for longer
/// than a frame interval.
pub trait PresentSurface: Send {
    /// Push one finished frame.
    fn present(&mut self, frame: &RgbaImage);
}

/// Start a frame for `target`: transparent, or opaque black when the
/// target asks for it.
#[must_use]
pub fn begin_frame(target: &RenderTarget) -> Canvas {
    let mut canvas = Canvas::new(target.width(), target.height());
    if target.draw_background_opaque {
        canvas.fill(crate::color::Color::from_rgb(0x000000));
    }
    canvas
}

/// Apply end-of-frame obligations (the transparent hole) and return the
/// finished image.
#[must_use]
pub fn finish_frame(mut canvas: Canvas, target: &RenderTarget) -> RgbaImage {
    if let Some(hole) = target.transparent_hole {
        canvas.punch_hole(hole);
    }
    canvas.into_image()
}
