use crate::types::OverlayGeometry;
use serde::{Deserialize, Serialize};

pub const MIN_OVERLAY_SIZE: f64 = 0.05;
pub const MAX_OVERLAY_SIZE: f64 = 1.0;

/// Clamp a geometry into the frame.
///
/// Size is clamped first so the position bounds are computed from the final
/// width and height: `0.05 <= w,h <= 1`, `0 <= x <= 1 - w`, `0 <= y <= 1 - h`.
/// A NaN component falls back to its lower bound.
pub fn constrain_overlay(g: OverlayGeometry) -> OverlayGeometry {
    let width = clamp_or_min(g.width, MIN_OVERLAY_SIZE, MAX_OVERLAY_SIZE);
    let height = clamp_or_min(g.height, MIN_OVERLAY_SIZE, MAX_OVERLAY_SIZE);
    OverlayGeometry {
        x: clamp_or_min(g.x, 0.0, 1.0 - width),
        y: clamp_or_min(g.y, 0.0, 1.0 - height),
        width,
        height,
    }
}

fn clamp_or_min(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

/// A rectangle in pixels, as measured on the rendered preview.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Convert a pixel rectangle to frame fractions. `None` for an empty container.
pub fn to_relative_geometry(
    rect: PixelRect,
    container_width: f64,
    container_height: f64,
) -> Option<OverlayGeometry> {
    if container_width <= 0.0 || container_height <= 0.0 {
        return None;
    }
    Some(OverlayGeometry {
        x: rect.x / container_width,
        y: rect.y / container_height,
        width: rect.width / container_width,
        height: rect.height / container_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_in_frame(g: OverlayGeometry) {
        assert!(g.width >= MIN_OVERLAY_SIZE && g.width <= MAX_OVERLAY_SIZE, "{g:?}");
        assert!(g.height >= MIN_OVERLAY_SIZE && g.height <= MAX_OVERLAY_SIZE, "{g:?}");
        assert!(g.x >= 0.0 && g.x <= 1.0 - g.width + 1e-12, "{g:?}");
        assert!(g.y >= 0.0 && g.y <= 1.0 - g.height + 1e-12, "{g:?}");
    }

    #[test]
    fn valid_geometry_is_untouched() {
        let g = OverlayGeometry::new(0.2, 0.3, 0.4, 0.5);
        assert_eq!(constrain_overlay(g), g);
    }

    #[test]
    fn pushes_overlay_back_inside_right_edge() {
        let g = constrain_overlay(OverlayGeometry::new(0.9, 0.0, 0.3, 0.2));
        assert!((g.x - 0.7).abs() < 1e-12);
        assert_eq!(g.width, 0.3);
    }

    #[test]
    fn tiny_width_is_grown_before_position_is_clamped() {
        let g = constrain_overlay(OverlayGeometry::new(0.99, 0.99, 0.001, 0.001));
        assert_eq!(g.width, MIN_OVERLAY_SIZE);
        assert_eq!(g.height, MIN_OVERLAY_SIZE);
        assert!((g.x - 0.95).abs() < 1e-12);
        assert!((g.y - 0.95).abs() < 1e-12);
    }

    #[test]
    fn extreme_inputs_stay_in_frame() {
        let values = [-1e9, -2.0, -0.5, 0.0, 0.03, 0.5, 0.97, 1.0, 1.5, 1e9, f64::NAN];
        for &x in &values {
            for &w in &values {
                assert_in_frame(constrain_overlay(OverlayGeometry::new(x, x, w, w)));
                assert_in_frame(constrain_overlay(OverlayGeometry::new(w, x, x, w)));
            }
        }
    }

    #[test]
    fn pixel_rect_maps_to_fractions() {
        let rect = PixelRect {
            x: 192.0,
            y: 108.0,
            width: 960.0,
            height: 540.0,
        };
        let g = to_relative_geometry(rect, 1920.0, 1080.0).unwrap();
        assert_eq!(g, OverlayGeometry::new(0.1, 0.1, 0.5, 0.5));
    }

    #[test]
    fn empty_container_has_no_relative_geometry() {
        let rect = PixelRect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        };
        assert!(to_relative_geometry(rect, 0.0, 1080.0).is_none());
    }
}
