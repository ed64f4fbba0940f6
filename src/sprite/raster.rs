//! Software raster canvas for sprite baking and procedural ring drawing.
//!
//! Everything draws into an [`RgbaImage`]. Shapes get a one-pixel
//! distance-based feather so rings stay smooth at the small sizes the
//! cutout demands; there is no general path rasterizer here, only the
//! primitives the indicator styles need.

use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::color::Color;
use crate::geometry::Rect;

/// Mutable drawing surface over an RGBA pixel buffer.
#[derive(Debug)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// A transparent canvas of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Wrap an existing image.
    #[must_use]
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the backing image.
    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Take the backing image.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Reset every pixel to fully transparent black.
    pub fn clear(&mut self) {
        for px in self.image.pixels_mut() {
            *px = Rgba([0, 0, 0, 0]);
        }
    }

    /// Fill the whole canvas with an opaque color.
    pub fn fill(&mut self, color: Color) {
        let rgba = Rgba(color.rgba8());
        for px in self.image.pixels_mut() {
            *px = rgba;
        }
    }

    /// Force a rectangle fully transparent.
    ///
    /// Used to keep the system clock visible through the overlay; runs
    /// after all other drawing for the frame.
    pub fn punch_hole(&mut self, rect: Rect) {
        let x0 = rect.left.max(0) as u32;
        let y0 = rect.top.max(0) as u32;
        let x1 = (rect.right().max(0) as u32).min(self.image.width());
        let y1 = (rect.bottom().max(0) as u32).min(self.image.height());
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            }
        }
    }

    /// Draw an annular ring segment in a single color.
    ///
    /// `start_deg`/`sweep_deg` follow screen convention: 0° points up,
    /// angles grow clockwise. A full ring is `sweep_deg >= 360`.
    pub fn ring_arc(
        &mut self,
        center: Vec2,
        outer_r: f32,
        inner_r: f32,
        start_deg: f32,
        sweep_deg: f32,
        color: Color,
        opacity: f32,
    ) {
        let full = sweep_deg >= 360.0;
        self.ring_pixels(center, outer_r, inner_r, |angle, cover| {
            if !full {
                let rel = (angle - start_deg).rem_euclid(360.0);
                if rel > sweep_deg {
                    return None;
                }
            }
            Some((color, cover * opacity))
        });
    }

    /// Draw a full ring whose color sweeps through `colors` around the
    /// circumference, rotated by `rotation_deg`.
    ///
    /// With one color this degenerates to a solid ring. Adjacent colors
    /// are blended linearly; the sweep wraps so the seam between the
    /// last and first color is as smooth as every other boundary.
    pub fn swept_ring(
        &mut self,
        center: Vec2,
        outer_r: f32,
        inner_r: f32,
        rotation_deg: f32,
        colors: &[Color],
    ) {
        if colors.is_empty() {
            return;
        }
        let n = colors.len();
        self.ring_pixels(center, outer_r, inner_r, |angle, cover| {
            let pos =
                (angle - rotation_deg).rem_euclid(360.0) / 360.0 * n as f32;
            let idx = pos as usize % n;
            let frac = pos - pos.floor();
            let c = colors[idx].lerp(colors[(idx + 1) % n], frac);
            Some((c, cover))
        });
    }

    /// Blend one pixel over the existing content.
    fn blend_pixel(&mut self, x: u32, y: u32, color: Color, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let a = alpha.min(1.0);
        let dst = self.image.get_pixel(x, y);
        let mix = |src: u8, dst: u8| -> u8 {
            (f32::from(src) * a + f32::from(dst) * (1.0 - a)).round() as u8
        };
        let out_a = (a + f32::from(dst[3]) / 255.0 * (1.0 - a)) * 255.0;
        let px = Rgba([
            mix(color.r(), dst[0]),
            mix(color.g(), dst[1]),
            mix(color.b(), dst[2]),
            out_a.round().min(255.0) as u8,
        ]);
        self.image.put_pixel(x, y, px);
    }

    /// Visit every pixel inside the ring band and blend what the
    /// callback returns. `cover` is the feathered edge coverage in
    /// `[0, 1]`; `angle` is degrees, 0° up, clockwise.
    fn ring_pixels(
        &mut self,
        center: Vec2,
        outer_r: f32,
        inner_r: f32,
        mut shade: impl FnMut(f32, f32) -> Option<(Color, f32)>,
    ) {
        if outer_r <= 0.0 || inner_r >= outer_r {
            return;
        }
        let x0 = ((center.x - outer_r).floor().max(0.0)) as u32;
        let y0 = ((center.y - outer_r).floor().max(0.0)) as u32;
        let x1 = (((center.x + outer_r).ceil() + 1.0) as u32)
            .min(self.image.width());
        let y1 = (((center.y + outer_r).ceil() + 1.0) as u32)
            .min(self.image.height());

        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = p.distance(center);
                // 1px feather on both edges of the band.
                let cover = (outer_r - d + 0.5).clamp(0.0, 1.0)
                    * (d - inner_r + 0.5).clamp(0.0, 1.0);
                if cover <= 0.0 {
                    continue;
                }
                let rel = p - center;
                let angle =
                    rel.x.atan2(-rel.y).to_degrees().rem_euclid(360.0);
                if let Some((color, alpha)) = shade(angle, cover) {
                    self.blend_pixel(x, y, color, alpha);
                }
            }
        }
    }
}

/// Copy a frame out of a sheet page into `dst`, tinting white mask
/// pixels with `tint`.
///
/// Sprite frames are baked as white-on-transparent alpha masks so a
/// single sheet serves every notification color; the tint multiplies the
/// mask's RGB at blit time.
pub fn blit_tinted(
    dst: &mut Canvas,
    src: &RgbaImage,
    src_rect: Rect,
    dst_left: i32,
    dst_top: i32,
    tint: Color,
) {
    for dy in 0..src_rect.height {
        for dx in 0..src_rect.width {
            let sx = (src_rect.left as u32) + dx;
            let sy = (src_rect.top as u32) + dy;
            if sx >= src.width() || sy >= src.height() {
                continue;
            }
            let px = src.get_pixel(sx, sy);
            if px[3] == 0 {
                continue;
            }
            let tx = dst_left + dx as i32;
            let ty = dst_top + dy as i32;
            if tx < 0 || ty < 0 {
                continue;
            }
            let (tx, ty) = (tx as u32, ty as u32);
            if tx >= dst.width() || ty >= dst.height() {
                continue;
            }
            // Mask luminance scales the tint; alpha carries coverage.
            let lum = f32::from(px[0]) / 255.0;
            let alpha = f32::from(px[3]) / 255.0 * lum.max(0.01);
            dst.blend_pixel(tx, ty, tint, alpha);
        }
    }
}
