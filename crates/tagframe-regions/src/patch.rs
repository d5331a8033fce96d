//! Quantum-patch cropper.
//!
//! The quantum patch sits inside a search window anchored at the barcode
//! anchor and spanning from there to the right edge of the baseframe. The
//! window is then shrunk by an asymmetric inset derived from the tag
//! design's identity-area crop fractions.

use log::warn;
use serde::{Deserialize, Serialize};
use tagframe_core::{Rect, RgbaCanvas};

/// Sign of a search direction along one axis.
///
/// Not consumed by the crop geometry yet; recorded so designs scanned in
/// mirrored orientations can carry their direction through the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSign {
    Positive,
    Negative,
}

/// How the declared inset fractions map onto the crop axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsetAxisOrder {
    /// The width fraction insets horizontally, the height fraction
    /// vertically.
    AsDeclared,
    /// The fractions swap roles: the declared width fraction insets
    /// vertically and the height fraction horizontally. Tag designs declare
    /// the identity-area crop against transposed axes, and their calibration
    /// tables are tuned for this mapping.
    Transposed,
}

/// Construction parameters for [`PatchCropper`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PatchCropperParams {
    /// Barcode anchor, unit-interval coordinates against the baseframe.
    pub anchor_x: f64,
    pub anchor_y: f64,
    pub x_direction: AxisSign,
    pub y_direction: AxisSign,
    /// Nominal search-frame width fraction. The crop itself spans from the
    /// anchor to the right edge of the frame.
    pub x_ratio: f64,
    pub y_ratio: f64,
    pub width_inset: f64,
    pub height_inset: f64,
    pub inset_axis_order: InsetAxisOrder,
}

/// Locates the quantum-patch search window and crops it.
#[derive(Clone, Debug)]
pub struct PatchCropper {
    params: PatchCropperParams,
    // inset fractions with the axis order already applied
    width_inset: f64,
    height_inset: f64,
}

impl PatchCropper {
    pub fn new(params: PatchCropperParams) -> Self {
        let (width_inset, height_inset) = match params.inset_axis_order {
            InsetAxisOrder::AsDeclared => (params.width_inset, params.height_inset),
            InsetAxisOrder::Transposed => (params.height_inset, params.width_inset),
        };
        Self {
            params,
            width_inset,
            height_inset,
        }
    }

    pub fn params(&self) -> &PatchCropperParams {
        &self.params
    }

    /// Crop the patch window from `baseframe`.
    ///
    /// The crop is forced fully opaque, premultiplied, and translated to the
    /// world origin. A degenerate window produces an empty canvas; geometry
    /// validation is the caller's responsibility.
    pub fn execute(&self, baseframe: &RgbaCanvas) -> RgbaCanvas {
        let extent = baseframe.extent();
        let w = extent.width;
        let h = extent.height;

        let search_height = (1.0 - self.params.y_ratio) * h;
        let window = Rect::new(
            self.params.anchor_x * w,
            self.params.y_ratio * search_height,
            w - self.params.anchor_x * w,
            self.params.y_ratio * search_height,
        );

        let dx = (window.width * (1.0 - self.width_inset) / 2.0).ceil();
        let dy = (window.height * (1.0 - self.height_inset) / 2.0).ceil();
        let crop_rect = window.inset_by(dx, dy);
        if crop_rect.is_empty() {
            warn!(
                "patch window degenerated to {:.1}x{:.1}",
                crop_rect.width, crop_rect.height
            );
        }

        baseframe
            .cropped(crop_rect)
            .with_alpha_one(crop_rect)
            .premultiplied()
            .translated_to_origin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(width_inset: f64, height_inset: f64, order: InsetAxisOrder) -> PatchCropperParams {
        PatchCropperParams {
            anchor_x: 0.1333,
            anchor_y: 0.75,
            x_direction: AxisSign::Positive,
            y_direction: AxisSign::Positive,
            x_ratio: 0.5066666666,
            y_ratio: 0.25,
            width_inset,
            height_inset,
            inset_axis_order: order,
        }
    }

    fn solid(width: u32, height: u32) -> RgbaCanvas {
        RgbaCanvas::filled(width, height, [90, 120, 200, 255])
    }

    #[test]
    fn transposed_order_swaps_the_inset_axes() {
        let baseframe = solid(300, 400);

        let transposed = PatchCropper::new(params(0.9, 0.4, InsetAxisOrder::Transposed));
        let declared_swapped = PatchCropper::new(params(0.4, 0.9, InsetAxisOrder::AsDeclared));

        assert_eq!(
            transposed.execute(&baseframe),
            declared_swapped.execute(&baseframe)
        );
    }

    #[test]
    fn swapping_fractions_swaps_horizontal_and_vertical_shrinkage() {
        let baseframe = solid(300, 400);

        let wide = PatchCropper::new(params(0.9, 0.4, InsetAxisOrder::AsDeclared))
            .execute(&baseframe);
        let tall = PatchCropper::new(params(0.4, 0.9, InsetAxisOrder::AsDeclared))
            .execute(&baseframe);

        // a large width fraction keeps the window wide; swapping hands that
        // retention to the vertical axis instead
        assert!(wide.width() > tall.width());
        assert!(wide.height() < tall.height());
    }

    #[test]
    fn crop_is_opaque_premultiplied_and_origin_normalised() {
        let baseframe = RgbaCanvas::filled(300, 400, [100, 60, 20, 128]);
        let crop =
            PatchCropper::new(params(0.9, 0.4, InsetAxisOrder::Transposed)).execute(&baseframe);

        assert!(!crop.is_empty());
        assert_eq!(crop.extent().x, 0.0);
        assert_eq!(crop.extent().y, 0.0);
        // alpha forced to one before premultiplying, so colours survive
        let px = crop.pixel(0, 0);
        assert_eq!(px[3], 255);
        assert_eq!(px[0], 100);
    }

    #[test]
    fn anchor_at_right_edge_degenerates_silently() {
        let baseframe = solid(300, 400);
        let mut p = params(0.9, 0.4, InsetAxisOrder::Transposed);
        p.anchor_x = 1.0;
        let crop = PatchCropper::new(p).execute(&baseframe);
        assert!(crop.is_empty());
    }
}
