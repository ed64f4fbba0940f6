//! Pixel rectangles, display metrics, and cutout geometry.
//!
//! All coordinates are physical display pixels. The cutout rectangle is
//! reported by the platform at a native resolution and rescaled whenever
//! the display configuration (resolution, rotation, density) changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Integer pixel rectangle, `left`/`top` inclusive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default,
)]
pub struct Rect {
    /// Left edge in pixels.
    pub left: i32,
    /// Top edge in pixels.
    pub top: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Build a rectangle from its left/top corner and size.
    #[must_use]
    pub const fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.left + self.width as i32
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.top + self.height as i32
    }

    /// Geometric center.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.left as f32 + self.width as f32 / 2.0,
            self.top as f32 + self.height as f32 / 2.0,
        )
    }

    /// Width / height; 0 when degenerate.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            0.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// A rectangle of the given size centered on `center`.
    #[must_use]
    pub fn centered_on(center: Vec2, width: u32, height: u32) -> Self {
        Self {
            left: (center.x - width as f32 / 2.0).round() as i32,
            top: (center.y - height as f32 / 2.0).round() as i32,
            width,
            height,
        }
    }

    /// Whether the rectangle has zero area.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Display rotation quadrant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub enum Rotation {
    /// Natural orientation.
    #[default]
    Deg0,
    /// 90° counter-clockwise.
    Deg90,
    /// Upside down.
    Deg180,
    /// 270° counter-clockwise.
    Deg270,
}

/// Live display configuration used to scale cutout geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMetrics {
    /// Current horizontal resolution in pixels.
    pub width: u32,
    /// Current vertical resolution in pixels.
    pub height: u32,
    /// Pixel density in dots per inch.
    pub density_dpi: f32,
    /// Current rotation.
    pub rotation: Rotation,
}

impl DisplayMetrics {
    /// Convert density-independent pixels to physical pixels.
    #[must_use]
    pub fn dp_to_px(&self, dp: f32) -> f32 {
        dp * self.density_dpi / 160.0
    }
}

/// Where the camera/sensor island sits on the physical panel.
///
/// `area_rect` is expressed at `native_resolution`; [`CutoutInfo::scaled`]
/// maps it into the current resolution. Computed once per
/// display-configuration change and cached by the caller; a metrics change
/// invalidates the cache.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutoutInfo {
    /// Cutout bounds at native resolution.
    pub area_rect: Rect,
    /// Resolution the bounds were measured at.
    pub native_resolution: (u32, u32),
}

impl CutoutInfo {
    /// Cutout bounds rescaled to the current display resolution.
    #[must_use]
    pub fn scaled(&self, metrics: &DisplayMetrics) -> Rect {
        let (nw, nh) = self.native_resolution;
        if nw == 0 || nh == 0 {
            return self.area_rect;
        }
        let sx = metrics.width as f32 / nw as f32;
        let sy = metrics.height as f32 / nh as f32;
        Rect {
            left: (self.area_rect.left as f32 * sx).round() as i32,
            top: (self.area_rect.top as f32 * sy).round() as i32,
            width: (self.area_rect.width as f32 * sx).round() as u32,
            height: (self.area_rect.height as f32 * sy).round() as u32,
        }
    }
}

/// Fit `outer` to `natural_aspect`, trimming the long axis.
///
/// The result is centered inside `outer` and never stretched: when the
/// reported rectangle is wider than the animation's natural aspect the
/// width is trimmed, when taller the height is trimmed.
#[must_use]
pub fn aspect_fit(outer: Rect, natural_aspect: f32) -> Rect {
    if outer.is_empty() || natural_aspect <= 0.0 {
        return outer;
    }
    let current = outer.aspect();
    if current > natural_aspect {
        let width = (outer.height as f32 * natural_aspect).round() as u32;
        Rect::centered_on(outer.center(), width, outer.height)
    } else if current < natural_aspect {
        let height = (outer.width as f32 / natural_aspect).round() as u32;
        Rect::centered_on(outer.center(), outer.width, height)
    } else {
        outer
    }
}
