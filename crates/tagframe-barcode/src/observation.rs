//! Barcode observations and tag orientation handling.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Symbologies the detection backend may be asked to recognise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    DataMatrix,
    Qr,
    MicroQr,
}

impl Symbology {
    /// The 2D matrix symbologies printed on identity tags.
    pub const MATRIX: [Symbology; 3] = [Symbology::DataMatrix, Symbology::Qr, Symbology::MicroQr];
    /// QR-only set for simpler tag formats.
    pub const QR_ONLY: [Symbology; 1] = [Symbology::Qr];
}

/// One candidate symbol reported by the detection backend.
///
/// Corner points are normalised to [0, 1] against the detection frame's
/// extent in raster convention (origin top-left, y down), in the backend's
/// raw order.
#[derive(Clone, Debug)]
pub struct BarcodeObservation {
    /// Backend confidence in [0, 1].
    pub confidence: f32,
    /// Decoded payload, when the backend decoded one.
    pub payload: Option<String>,
    pub corners: Vec<Point2<f64>>,
}

/// Orientation of the printed tag in the captured frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagOrientation {
    Upright,
    RotatedClockwise,
    RotatedCounterClockwise,
    UpsideDown,
}

impl TagOrientation {
    /// Index permutation applied to the backend's raw corner order to obtain
    /// (bottom-left, top-left, top-right, bottom-right).
    ///
    /// A matrix symbol is indistinguishable from its 180° rotation, so the
    /// upside-down variant shifts the cycle by two positions; the backend
    /// cannot disambiguate which printed corner is "top" on its own.
    pub fn corner_permutation(self) -> [usize; 4] {
        match self {
            TagOrientation::Upright
            | TagOrientation::RotatedClockwise
            | TagOrientation::RotatedCounterClockwise => [0, 1, 2, 3],
            TagOrientation::UpsideDown => [2, 3, 0, 1],
        }
    }
}

/// Four ordered corners of a detected symbol in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrderedCorners {
    pub bottom_left: Point2<f64>,
    pub top_left: Point2<f64>,
    pub top_right: Point2<f64>,
    pub bottom_right: Point2<f64>,
}

impl OrderedCorners {
    /// Label the backend's raw corners for the given orientation.
    pub fn from_raw(raw: &[Point2<f64>; 4], orientation: TagOrientation) -> Self {
        let p = orientation.corner_permutation();
        Self {
            bottom_left: raw[p[0]],
            top_left: raw[p[1]],
            top_right: raw[p[2]],
            bottom_right: raw[p[3]],
        }
    }
}
