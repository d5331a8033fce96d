//! Interop with the `image` crate.

use image::RgbaImage;
use tagframe_core::{CanvasError, RgbaCanvas};

/// Copy an `image::RgbaImage` into a canvas at the world origin.
pub fn canvas_from_image(img: &RgbaImage) -> Result<RgbaCanvas, CanvasError> {
    RgbaCanvas::from_raw(img.width(), img.height(), img.as_raw().clone())
}

/// Copy a canvas's pixels into an `image::RgbaImage`.
///
/// Returns `None` for an empty canvas.
pub fn image_from_canvas(canvas: &RgbaCanvas) -> Option<RgbaImage> {
    if canvas.is_empty() {
        return None;
    }
    RgbaImage::from_raw(canvas.width(), canvas.height(), canvas.pixels().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_pixels() {
        let mut img = RgbaImage::new(4, 3);
        img.put_pixel(2, 1, image::Rgba([9, 8, 7, 255]));

        let canvas = canvas_from_image(&img).expect("convert");
        assert_eq!(canvas.pixel(2, 1), [9, 8, 7, 255]);

        let back = image_from_canvas(&canvas).expect("non-empty");
        assert_eq!(back, img);
    }

    #[test]
    fn empty_canvas_has_no_image() {
        let canvas = RgbaCanvas::filled(0, 0, [0, 0, 0, 0]);
        assert!(image_from_canvas(&canvas).is_none());
    }
}
