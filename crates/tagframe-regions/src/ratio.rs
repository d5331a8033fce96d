//! Ratio-based region extraction.

use serde::{Deserialize, Serialize};
use tagframe_core::Rect;

/// Unit-interval window over an image extent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionRatios {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Pixel rectangle from normalised ratios of the extent's size.
///
/// No clamping is performed against the extent and degenerate outputs are
/// permitted; callers validate before use.
pub fn region_from_ratios(extent: &Rect, ratios: RegionRatios) -> Rect {
    Rect::new(
        ratios.x * extent.width,
        ratios.y * extent.height,
        ratios.width * extent.width,
        ratios.height * extent.height,
    )
}

/// Symmetric inset by fractions of the rectangle's own size: shrink by
/// `width * dx_frac` on each horizontal side and `height * dy_frac` on each
/// vertical side.
pub fn inset_by_fractions(rect: Rect, dx_frac: f64, dy_frac: f64) -> Rect {
    rect.inset_by(rect.width * dx_frac, rect.height * dy_frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_is_exact_product_of_ratios_and_extent() {
        let extent = Rect::new(0.0, 0.0, 640.0, 480.0);
        let ratios = RegionRatios {
            x: 0.16,
            y: 0.4,
            width: 0.1,
            height: 0.3,
        };
        let rect = region_from_ratios(&extent, ratios);
        assert_eq!(rect.x, 0.16 * 640.0);
        assert_eq!(rect.y, 0.4 * 480.0);
        assert_eq!(rect.width, 0.1 * 640.0);
        assert_eq!(rect.height, 0.3 * 480.0);
    }

    #[test]
    fn boundary_ratios_are_not_clamped() {
        let extent = Rect::new(0.0, 0.0, 100.0, 100.0);
        let rect = region_from_ratios(
            &extent,
            RegionRatios {
                x: 1.0,
                y: 0.0,
                width: 1.0,
                height: 0.0,
            },
        );
        assert_eq!(rect.x, 100.0);
        assert_eq!(rect.width, 100.0);
        assert!(rect.is_empty());
    }

    #[test]
    fn zero_inset_fraction_is_identity() {
        let rect = Rect::new(10.0, 20.0, 64.0, 32.0);
        assert_eq!(inset_by_fractions(rect, 0.0, 0.0), rect);
    }

    #[test]
    fn inset_fractions_scale_with_the_rect_itself() {
        let rect = Rect::new(0.0, 0.0, 50.0, 20.0);
        let inset = inset_by_fractions(rect, 0.1, 0.25);
        assert_eq!(inset, Rect::new(5.0, 5.0, 40.0, 10.0));
    }
}
