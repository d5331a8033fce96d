//! Core pixel-buffer and geometry types for tag region extraction.
//!
//! This crate is intentionally small and purely geometric: an immutable RGBA
//! buffer with a floating origin, rectangle arithmetic, and the four-point
//! perspective transform. It does *not* depend on any detection backend or
//! concrete tag design.

mod canvas;
mod geometry;
mod homography;
mod logger;

pub use canvas::{sample_bilinear_rgba, CanvasError, CompositeError, RgbaCanvas};
pub use geometry::Rect;
pub use homography::{homography_from_4pt, warp_perspective_rgba, Homography};
pub use logger::init_with_level;
