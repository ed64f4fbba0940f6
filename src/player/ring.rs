//! Procedural persistent-image ring rendering.
//!
//! Persistent mode paints one full region and leaves it on screen, so
//! instead of sprite frames it draws a swept color gradient ring whose
//! rotation and radius drift slowly across the burn-in cycle.

use glam::Vec2;

use crate::color::ColorSequence;
use crate::player::playback::RingParams;
use crate::player::surface::RenderTarget;
use crate::sprite::raster::Canvas;

/// Maximum radial drift over one burn-in cycle, in dp.
const DRIFT_SPAN_DP: f32 = 16.0;

/// Draw the persistent ring for this tick into `canvas`.
///
/// `thickness_px` and `dp_scale` (physical pixels per dp) come from
/// device calibration and display metrics respectively.
pub fn draw(
    canvas: &mut Canvas,
    target: &RenderTarget,
    params: &RingParams,
    colors: &ColorSequence,
    thickness_px: f32,
    dp_scale: f32,
) {
    if colors.is_empty() || !target.is_drawable() {
        return;
    }
    let w = target.width() as f32;
    let h = target.height() as f32;
    let center = Vec2::new(w / 2.0, h / 2.0);

    let drift_px = params.drift_frac * DRIFT_SPAN_DP * dp_scale;
    let outer = (w.min(h) / 2.0 - 1.0 - drift_px).max(1.0);
    let inner = (outer - thickness_px.max(1.0)).max(0.0);

    canvas.swept_ring(
        center,
        outer,
        inner,
        params.rotation_deg,
        colors.colors(),
    );
}
