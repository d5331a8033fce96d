//! Immutable RGBA pixel buffer with a floating origin.
//!
//! Every operation returns a newly allocated canvas; the source is never
//! mutated. The origin places the buffer in a shared "world" pixel space so
//! that crops keep their position and can later be composited or translated
//! back to the world origin. Origins are kept on the integer pixel grid by
//! all operations in this crate.

use crate::Rect;

#[derive(thiserror::Error, Debug)]
pub enum CanvasError {
    #[error("invalid RGBA buffer length (expected {expected} bytes, got {got})")]
    InvalidBufferLength { expected: usize, got: usize },
}

/// Errors from source-over compositing.
#[derive(thiserror::Error, Debug)]
pub enum CompositeError {
    #[error(
        "compositing input has no pixels (foreground {fg_width}x{fg_height}, \
         background {bg_width}x{bg_height})"
    )]
    EmptyInput {
        fg_width: u32,
        fg_height: u32,
        bg_width: u32,
        bg_height: u32,
    },
}

/// Immutable RGBA8 image buffer positioned in world pixel space.
#[derive(Clone, Debug, PartialEq)]
pub struct RgbaCanvas {
    pub(crate) origin_x: f64,
    pub(crate) origin_y: f64,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) data: Vec<u8>, // row-major RGBA, len = w*h*4
}

impl RgbaCanvas {
    /// Build a canvas at the world origin from a raw RGBA buffer.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CanvasError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CanvasError::InvalidBufferLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            origin_x: 0.0,
            origin_y: 0.0,
            width,
            height,
            data,
        })
    }

    /// Uniformly filled canvas at the world origin.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&rgba);
        }
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            width,
            height,
            data,
        }
    }

    fn empty_at(x: f64, y: f64) -> Self {
        Self {
            origin_x: x,
            origin_y: y,
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Position and size of the buffer in world pixel space.
    pub fn extent(&self) -> Rect {
        Rect::new(
            self.origin_x,
            self.origin_y,
            self.width as f64,
            self.height as f64,
        )
    }

    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Buffer-local pixel lookup. Panics outside the buffer.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    #[inline]
    fn pixel_at_world(&self, wx: i64, wy: i64) -> [u8; 4] {
        let lx = wx - self.origin_x as i64;
        let ly = wy - self.origin_y as i64;
        if lx < 0 || ly < 0 || lx >= self.width as i64 || ly >= self.height as i64 {
            return [0, 0, 0, 0];
        }
        self.pixel(lx as u32, ly as u32)
    }

    /// Crop to `rect` (world coordinates), snapped outwards to the pixel grid
    /// and clipped against the buffer's extent.
    ///
    /// A rectangle that misses the extent entirely yields an empty canvas;
    /// this is not an error, degenerate geometry is the caller's concern.
    pub fn cropped(&self, rect: Rect) -> RgbaCanvas {
        let isect = rect.intersection(&self.extent());
        if isect.is_empty() {
            return RgbaCanvas::empty_at(isect.x, isect.y);
        }

        let px0 = ((isect.x - self.origin_x).floor().max(0.0)) as u32;
        let py0 = ((isect.y - self.origin_y).floor().max(0.0)) as u32;
        let px1 = ((isect.max_x() - self.origin_x).ceil() as u32).min(self.width);
        let py1 = ((isect.max_y() - self.origin_y).ceil() as u32).min(self.height);
        if px1 <= px0 || py1 <= py0 {
            return RgbaCanvas::empty_at(isect.x, isect.y);
        }

        let w = px1 - px0;
        let h = py1 - py0;
        let mut data = Vec::with_capacity(w as usize * h as usize * 4);
        for row in py0..py1 {
            let start = (row as usize * self.width as usize + px0 as usize) * 4;
            let end = start + w as usize * 4;
            data.extend_from_slice(&self.data[start..end]);
        }

        RgbaCanvas {
            origin_x: self.origin_x + px0 as f64,
            origin_y: self.origin_y + py0 as f64,
            width: w,
            height: h,
            data,
        }
    }

    /// Shift the buffer's world position without touching pixels.
    pub fn translated(&self, dx: f64, dy: f64) -> RgbaCanvas {
        let mut out = self.clone();
        out.origin_x += dx;
        out.origin_y += dy;
        out
    }

    /// Move the buffer so its extent starts at the world origin.
    pub fn translated_to_origin(&self) -> RgbaCanvas {
        let mut out = self.clone();
        out.origin_x = 0.0;
        out.origin_y = 0.0;
        out
    }

    /// Rotate the buffer 90° counter-clockwise (as displayed).
    ///
    /// The result sits at the world origin with width and height swapped.
    pub fn rotated_left(&self) -> RgbaCanvas {
        let w = self.width;
        let h = self.height;
        let mut data = vec![0u8; self.data.len()];
        for y in 0..w {
            for x in 0..h {
                // dst(x, y) takes src(w-1-y, x)
                let src = ((x as usize) * w as usize + (w - 1 - y) as usize) * 4;
                let dst = ((y as usize) * h as usize + x as usize) * 4;
                data[dst..dst + 4].copy_from_slice(&self.data[src..src + 4]);
            }
        }
        RgbaCanvas {
            origin_x: 0.0,
            origin_y: 0.0,
            width: h,
            height: w,
            data,
        }
    }

    /// Force alpha to fully opaque inside `rect` (world coordinates).
    pub fn with_alpha_one(&self, rect: Rect) -> RgbaCanvas {
        let mut out = self.clone();
        let isect = rect.intersection(&self.extent());
        if isect.is_empty() {
            return out;
        }
        let px0 = ((isect.x - self.origin_x).floor().max(0.0)) as u32;
        let py0 = ((isect.y - self.origin_y).floor().max(0.0)) as u32;
        let px1 = ((isect.max_x() - self.origin_x).ceil() as u32).min(self.width);
        let py1 = ((isect.max_y() - self.origin_y).ceil() as u32).min(self.height);
        for y in py0..py1 {
            for x in px0..px1 {
                let i = (y as usize * self.width as usize + x as usize) * 4 + 3;
                out.data[i] = 255;
            }
        }
        out
    }

    /// Multiply colour channels by alpha.
    pub fn premultiplied(&self) -> RgbaCanvas {
        let mut out = self.clone();
        for px in out.data.chunks_exact_mut(4) {
            let a = px[3] as u16;
            px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
            px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
            px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
        }
        out
    }

    /// Source-over composite of `self` onto `background`.
    ///
    /// The output covers the union of both extents. Fails when either input
    /// has no pixels; for valid non-empty inputs the operation always
    /// succeeds.
    pub fn composited_over(&self, background: &RgbaCanvas) -> Result<RgbaCanvas, CompositeError> {
        if self.is_empty() || background.is_empty() {
            return Err(CompositeError::EmptyInput {
                fg_width: self.width,
                fg_height: self.height,
                bg_width: background.width,
                bg_height: background.height,
            });
        }

        let union = self.extent().union(&background.extent());
        let ox = union.x.floor() as i64;
        let oy = union.y.floor() as i64;
        let w = (union.max_x().ceil() as i64 - ox) as u32;
        let h = (union.max_y().ceil() as i64 - oy) as u32;

        let mut data = Vec::with_capacity(w as usize * h as usize * 4);
        for j in 0..h {
            for i in 0..w {
                let wx = ox + i as i64;
                let wy = oy + j as i64;
                let fg = self.pixel_at_world(wx, wy);
                let bg = background.pixel_at_world(wx, wy);
                data.extend_from_slice(&source_over(fg, bg));
            }
        }

        Ok(RgbaCanvas {
            origin_x: ox as f64,
            origin_y: oy as f64,
            width: w,
            height: h,
            data,
        })
    }
}

#[inline]
fn source_over(fg: [u8; 4], bg: [u8; 4]) -> [u8; 4] {
    let fa = fg[3] as f32 / 255.0;
    let ba = bg[3] as f32 / 255.0;
    let oa = fa + ba * (1.0 - fa);
    if oa <= 0.0 {
        return [0, 0, 0, 0];
    }
    let mut out = [0u8; 4];
    for c in 0..3 {
        let v = (fg[c] as f32 * fa + bg[c] as f32 * ba * (1.0 - fa)) / oa;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (oa * 255.0).round() as u8;
    out
}

/// Bilinear RGBA sample at buffer-local coordinates. Outside pixels read as
/// fully transparent.
#[inline]
pub fn sample_bilinear_rgba(src: &RgbaCanvas, x: f64, y: f64) -> [f32; 4] {
    let x0 = (x - 0.5).floor();
    let y0 = (y - 0.5).floor();
    let fx = (x - 0.5 - x0) as f32;
    let fy = (y - 0.5 - y0) as f32;
    let x0 = x0 as i64;
    let y0 = y0 as i64;

    let get = |px: i64, py: i64| -> [f32; 4] {
        if px < 0 || py < 0 || px >= src.width() as i64 || py >= src.height() as i64 {
            return [0.0; 4];
        }
        let p = src.pixel(px as u32, py as u32);
        [p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32]
    };

    let p00 = get(x0, y0);
    let p10 = get(x0 + 1, y0);
    let p01 = get(x0, y0 + 1);
    let p11 = get(x0 + 1, y0 + 1);

    let mut out = [0.0f32; 4];
    for c in 0..4 {
        let a = p00[c] + fx * (p10[c] - p00[c]);
        let b = p01[c] + fx * (p11[c] - p01[c]);
        out[c] = a + fy * (b - a);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> RgbaCanvas {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        RgbaCanvas::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn from_raw_rejects_bad_length() {
        let err = RgbaCanvas::from_raw(2, 2, vec![0u8; 15]).unwrap_err();
        assert!(matches!(
            err,
            CanvasError::InvalidBufferLength {
                expected: 16,
                got: 15
            }
        ));
    }

    #[test]
    fn crop_keeps_world_position() {
        let img = checker(10, 10);
        let crop = img.cropped(Rect::new(2.0, 3.0, 4.0, 5.0));
        assert_eq!(crop.extent(), Rect::new(2.0, 3.0, 4.0, 5.0));
        assert_eq!(crop.pixel(0, 0), img.pixel(2, 3));

        let back = crop.translated_to_origin();
        assert_eq!(back.extent(), Rect::new(0.0, 0.0, 4.0, 5.0));
        assert_eq!(back.pixel(0, 0), img.pixel(2, 3));
    }

    #[test]
    fn crop_outside_extent_is_empty() {
        let img = checker(4, 4);
        assert!(img.cropped(Rect::new(10.0, 10.0, 5.0, 5.0)).is_empty());
        assert!(img.cropped(Rect::new(1.0, 1.0, -3.0, 2.0)).is_empty());
    }

    #[test]
    fn rotate_left_moves_right_column_to_top_row() {
        let mut data = vec![0u8; 3 * 2 * 4];
        // mark src(2, 0) red and src(0, 1) green
        data[(0 * 3 + 2) * 4] = 255;
        data[(0 * 3 + 2) * 4 + 3] = 255;
        data[(1 * 3 + 0) * 4 + 1] = 255;
        data[(1 * 3 + 0) * 4 + 3] = 255;
        let img = RgbaCanvas::from_raw(3, 2, data).unwrap();

        let rot = img.rotated_left();
        assert_eq!((rot.width(), rot.height()), (2, 3));
        // top-right corner of the source lands at the top-left
        assert_eq!(rot.pixel(0, 0), [255, 0, 0, 255]);
        // src(0, 1) -> dst(1, 2)
        assert_eq!(rot.pixel(1, 2), [0, 255, 0, 255]);
    }

    #[test]
    fn composite_over_disjoint_extents_covers_union() {
        let left = RgbaCanvas::filled(4, 4, [255, 0, 0, 255]);
        let right = RgbaCanvas::filled(4, 4, [0, 255, 0, 255]).translated(3.0, 0.0);

        let out = left.composited_over(&right).unwrap();
        assert_eq!(out.extent(), Rect::new(0.0, 0.0, 7.0, 4.0));
        // foreground wins in the overlapping column
        assert_eq!(out.pixel(3, 0), [255, 0, 0, 255]);
        assert_eq!(out.pixel(6, 0), [0, 255, 0, 255]);
    }

    #[test]
    fn composite_with_empty_input_fails() {
        let a = RgbaCanvas::filled(4, 4, [0, 0, 0, 255]);
        let b = a.cropped(Rect::new(100.0, 100.0, 1.0, 1.0));
        assert!(matches!(
            a.composited_over(&b),
            Err(CompositeError::EmptyInput { .. })
        ));
        assert!(matches!(
            b.composited_over(&a),
            Err(CompositeError::EmptyInput { .. })
        ));
    }

    #[test]
    fn alpha_one_and_premultiply() {
        let img = RgbaCanvas::filled(2, 2, [100, 200, 50, 128]);
        let opaque = img.with_alpha_one(img.extent());
        assert_eq!(opaque.pixel(0, 0)[3], 255);

        let pre = img.premultiplied();
        let px = pre.pixel(1, 1);
        assert_eq!(px[3], 128);
        assert_eq!(px[0], ((100u16 * 128 + 127) / 255) as u8);
    }

    #[test]
    fn operations_are_deterministic() {
        let img = checker(16, 16);
        let a = img.cropped(Rect::new(1.0, 1.0, 9.0, 9.0)).rotated_left();
        let b = img.cropped(Rect::new(1.0, 1.0, 9.0, 9.0)).rotated_left();
        assert_eq!(a, b);
    }
}
