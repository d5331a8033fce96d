use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel space.
///
/// Coordinates are raster-style: origin at the top-left, y growing downwards.
/// Width and height may be zero or negative; degenerate rectangles are legal
/// and propagate through the crop operations unchanged. Callers that need a
/// non-empty region must check [`Rect::is_empty`] themselves.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Shrink by `dx` on each horizontal side and `dy` on each vertical side.
    ///
    /// The inset is applied about the rectangle's own centre, not the image's.
    /// Negative values grow the rectangle.
    pub fn inset_by(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(
            self.x + dx,
            self.y + dy,
            self.width - 2.0 * dx,
            self.height - 2.0 * dy,
        )
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Intersection with `other`. Empty results keep the clamped origin.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.max_x().min(other.max_x());
        let y1 = self.max_y().min(other.max_y());
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.max_x().max(other.max_x());
        let y1 = self.max_y().max(other.max_y());
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inset_is_symmetric_about_centre() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        let inset = r.inset_by(5.0, 2.0);
        assert_eq!(inset, Rect::new(15.0, 22.0, 90.0, 46.0));

        let cx = r.x + r.width / 2.0;
        let cy = r.y + r.height / 2.0;
        assert_eq!(inset.x + inset.width / 2.0, cx);
        assert_eq!(inset.y + inset.height / 2.0, cy);
    }

    #[test]
    fn zero_inset_is_identity() {
        let r = Rect::new(3.5, -1.0, 40.0, 12.0);
        assert_eq!(r.inset_by(0.0, 0.0), r);
    }

    #[test]
    fn over_inset_produces_degenerate_rect() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let inset = r.inset_by(6.0, 6.0);
        assert!(inset.is_empty());
        assert_eq!(inset.width, -2.0);
    }

    #[test]
    fn intersection_and_union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersection(&b), Rect::new(5.0, 5.0, 5.0, 5.0));
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 15.0, 15.0));

        let disjoint = Rect::new(20.0, 20.0, 5.0, 5.0);
        assert!(a.intersection(&disjoint).is_empty());
    }
}
