//! Composite reference-region cropper.
//!
//! Two narrow reference windows flank the tag's identity area; quality
//! checks want them as one image. The cropper cuts both windows and joins
//! them side by side with a one-pixel seam overlap.

use log::warn;
use tagframe_core::{CompositeError, RgbaCanvas};

use crate::ratio::{inset_by_fractions, region_from_ratios, RegionRatios};

/// Crops the left/right reference windows and composites them into a single
/// origin-normalised image.
#[derive(Clone, Debug)]
pub struct CompositeReferenceCropper {
    left: RegionRatios,
    right: RegionRatios,
    inset_width_frac: f64,
}

impl Default for CompositeReferenceCropper {
    fn default() -> Self {
        Self {
            left: RegionRatios {
                x: 0.16,
                y: 0.4,
                width: 0.1,
                height: 0.3,
            },
            right: RegionRatios {
                x: 0.75,
                y: 0.4,
                width: 0.1,
                height: 0.3,
            },
            inset_width_frac: 0.1,
        }
    }
}

impl CompositeReferenceCropper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract both windows from `baseframe` and join them.
    ///
    /// The right crop is translated so it starts one pixel before the left
    /// crop ends, then composited source-over; the output width is the sum
    /// of both crop widths minus the shared column.
    pub fn execute(&self, baseframe: &RgbaCanvas) -> Result<RgbaCanvas, CompositeError> {
        let extent = baseframe.extent();

        let left_rect = inset_by_fractions(
            region_from_ratios(&extent, self.left),
            self.inset_width_frac,
            0.0,
        );
        let right_rect = inset_by_fractions(
            region_from_ratios(&extent, self.right),
            self.inset_width_frac,
            0.0,
        );

        let left = baseframe.cropped(left_rect).translated_to_origin();
        let right = baseframe.cropped(right_rect).translated_to_origin();
        if left.is_empty() || right.is_empty() {
            warn!(
                "reference window crop is empty (left {}x{}, right {}x{})",
                left.width(),
                left.height(),
                right.width(),
                right.height()
            );
        }

        let shifted = right.translated(left.extent().width - 1.0, 0.0);
        let joined = shifted.composited_over(&left)?;
        Ok(joined.translated_to_origin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagframe_core::Rect;

    fn gradient(width: u32, height: u32) -> RgbaCanvas {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 0, 255]);
            }
        }
        RgbaCanvas::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn output_width_is_sum_of_crops_minus_shared_column() {
        let baseframe = gradient(100, 100);
        let cropper = CompositeReferenceCropper::new();

        let out = cropper.execute(&baseframe).expect("composite");

        // both windows are 10% of the frame wide, inset by 10% of their own
        // width on each horizontal side
        let left = baseframe
            .cropped(Rect::new(17.0, 40.0, 8.0, 30.0))
            .translated_to_origin();
        let expected_width = 2 * left.width() - 1;

        assert_eq!(out.width(), expected_width);
        assert_eq!(out.height(), left.height());
        assert_eq!(out.extent().x, 0.0);
        assert_eq!(out.extent().y, 0.0);
    }

    #[test]
    fn seam_column_takes_the_right_crop() {
        let mut data = Vec::new();
        for _y in 0..100u32 {
            for x in 0..100u32 {
                // left half red, right half green
                if x < 50 {
                    data.extend_from_slice(&[255, 0, 0, 255]);
                } else {
                    data.extend_from_slice(&[0, 255, 0, 255]);
                }
            }
        }
        let baseframe = RgbaCanvas::from_raw(100, 100, data).unwrap();
        let out = CompositeReferenceCropper::new()
            .execute(&baseframe)
            .expect("composite");

        // the column where both crops meet belongs to the translated right crop
        let left_width = 8;
        assert_eq!(out.pixel(left_width - 1, 0), [0, 255, 0, 255]);
        assert_eq!(out.pixel(0, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn empty_baseframe_reports_composite_failure() {
        let baseframe = RgbaCanvas::filled(0, 0, [0, 0, 0, 0]);
        let err = CompositeReferenceCropper::new()
            .execute(&baseframe)
            .unwrap_err();
        assert!(matches!(err, CompositeError::EmptyInput { .. }));
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let baseframe = gradient(128, 96);
        let cropper = CompositeReferenceCropper::new();
        let a = cropper.execute(&baseframe).unwrap();
        let b = cropper.execute(&baseframe).unwrap();
        assert_eq!(a, b);
    }
}
