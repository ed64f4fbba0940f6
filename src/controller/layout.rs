//! Target geometry computation for the render surface.
//!
//! The surface must end up centered on the physical cutout/sensor
//! center after device-specific scale and shift corrections. Geometry
//! can come from three places of increasing trust: nowhere yet, the
//! per-device calibration table plus the platform cutout rect, or a
//! precise externally detected rectangle.

use glam::Vec2;

use crate::geometry::{aspect_fit, CutoutInfo, DisplayMetrics, Rect};
use crate::options::DeviceCalibration;

/// Where target geometry comes from.
///
/// The core depends only on this interface, never on how a variant was
/// obtained (the precise source is typically read out of another
/// process's layout by the host shell).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryProvider {
    /// Nothing detected yet; persistent-image rendering must wait.
    NotAvailable,
    /// Platform cutout rect, corrected by the calibration table.
    DeviceCalibrationTable(CutoutInfo),
    /// Precise indicator rectangle from a higher-trust external source.
    ExternalPreciseSource(Rect),
}

/// Compute the surface bounds for the current provider.
///
/// Returns `None` while geometry is unknown. The result is centered on
/// the cutout center, scaled by `calibration.scale` and shifted by the
/// calibration offsets; an external rectangle is first aspect-fitted
/// (long axis trimmed, never stretched) to `natural_aspect`.
#[must_use]
pub fn compute_bounds(
    provider: &GeometryProvider,
    metrics: &DisplayMetrics,
    calibration: &DeviceCalibration,
    natural_aspect: f32,
) -> Option<Rect> {
    let base = match provider {
        GeometryProvider::NotAvailable => return None,
        GeometryProvider::DeviceCalibrationTable(cutout) => {
            let rect = cutout.scaled(metrics);
            // Ring diameter: twice the island's long edge, so the band
            // clears the sensor cluster.
            let side = rect.width.max(rect.height) * 2;
            Rect::centered_on(rect.center(), side, side)
        }
        GeometryProvider::ExternalPreciseSource(rect) => {
            aspect_fit(*rect, natural_aspect)
        }
    };
    if base.is_empty() {
        return None;
    }

    let scaled_w =
        ((base.width as f32) * calibration.scale).round().max(1.0) as u32;
    let scaled_h =
        ((base.height as f32) * calibration.scale).round().max(1.0) as u32;
    let center = base.center()
        + Vec2::new(calibration.shift_x, calibration.shift_y);
    Some(Rect::centered_on(center, scaled_w, scaled_h))
}

/// Convert a display-space exclusion rect into surface-local
/// coordinates, clipped to the surface. `None` when they don't overlap.
#[must_use]
pub fn surface_local_hole(bounds: Rect, exclusion: Rect) -> Option<Rect> {
    let left = exclusion.left.max(bounds.left);
    let top = exclusion.top.max(bounds.top);
    let right = exclusion.right().min(bounds.right());
    let bottom = exclusion.bottom().min(bounds.bottom());
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        left - bounds.left,
        top - bounds.top,
        (right - left) as u32,
        (bottom - top) as u32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> DisplayMetrics {
        DisplayMetrics {
            width: 1080,
            height: 2400,
            density_dpi: 480.0,
            rotation: crate::geometry::Rotation::Deg0,
        }
    }

    #[test]
    fn unknown_geometry_yields_none() {
        assert!(compute_bounds(
            &GeometryProvider::NotAvailable,
            &metrics(),
            &DeviceCalibration::default(),
            1.0,
        )
        .is_none());
    }

    #[test]
    fn cutout_bounds_center_on_island() {
        let cutout = CutoutInfo {
            area_rect: Rect::new(500, 40, 80, 80),
            native_resolution: (1080, 2400),
        };
        let bounds = compute_bounds(
            &GeometryProvider::DeviceCalibrationTable(cutout),
            &metrics(),
            &DeviceCalibration::default(),
            1.0,
        )
        .unwrap();
        assert_eq!(bounds.center(), cutout.area_rect.center());
        assert_eq!(bounds.width, 160);
        assert_eq!(bounds.height, 160);
    }

    #[test]
    fn calibration_scale_and_shift_apply() {
        let cutout = CutoutInfo {
            area_rect: Rect::new(500, 40, 80, 80),
            native_resolution: (1080, 2400),
        };
        let cal = DeviceCalibration {
            scale: 1.25,
            shift_x: 4.0,
            shift_y: -6.0,
            ..DeviceCalibration::default()
        };
        let bounds = compute_bounds(
            &GeometryProvider::DeviceCalibrationTable(cutout),
            &metrics(),
            &cal,
            1.0,
        )
        .unwrap();
        assert_eq!(bounds.width, 200);
        let expected =
            cutout.area_rect.center() + Vec2::new(4.0, -6.0);
        assert!((bounds.center() - expected).length() <= 1.0);
    }

    #[test]
    fn external_rect_is_aspect_fitted() {
        let bounds = compute_bounds(
            &GeometryProvider::ExternalPreciseSource(Rect::new(
                100, 50, 300, 100,
            )),
            &metrics(),
            &DeviceCalibration::default(),
            1.0,
        )
        .unwrap();
        // Long axis trimmed to a square.
        assert_eq!(bounds.width, 100);
        assert_eq!(bounds.height, 100);
        assert_eq!(
            bounds.center(),
            Rect::new(100, 50, 300, 100).center()
        );
    }

    #[test]
    fn hole_is_clipped_and_localized() {
        let bounds = Rect::new(100, 100, 50, 50);
        let hole =
            surface_local_hole(bounds, Rect::new(90, 110, 30, 10))
                .unwrap();
        assert_eq!(hole, Rect::new(0, 10, 20, 10));
        assert!(
            surface_local_hole(bounds, Rect::new(0, 0, 10, 10)).is_none()
        );
    }
}
