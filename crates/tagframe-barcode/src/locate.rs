//! Barcode location and perspective rectification.

use std::sync::Arc;

use log::debug;
use nalgebra::Point2;
use tagframe_core::{homography_from_4pt, warp_perspective_rgba, RgbaCanvas};

use crate::{
    BarcodeDetector, BarcodeObservation, DetectorError, OrderedCorners, Symbology, TagOrientation,
};

/// Errors from barcode location and rectification.
#[derive(thiserror::Error, Debug)]
pub enum BarcodeCropError {
    #[error("no barcode symbol detected in the source frame")]
    NoSymbolDetected,
    #[error("perspective transform could not be constructed from the detected corners")]
    TransformConstruction,
    #[error("perspective correction produced an empty output")]
    EmptyOutput,
    #[error(transparent)]
    Detector(#[from] DetectorError),
    #[error("detection task did not complete")]
    DetectionTask,
}

/// Finds the tag's barcode symbol in a baseframe and produces an upright,
/// perspective-corrected image of it.
pub struct BarcodeCropOperation {
    detector: Arc<dyn BarcodeDetector>,
    orientation: TagOrientation,
    payload_filter: String,
    symbologies: Vec<Symbology>,
}

impl BarcodeCropOperation {
    /// New operation recognising the 2D matrix symbologies.
    ///
    /// `payload_filter` keeps only candidates whose decoded payload contains
    /// the given substring; the empty string matches any payload.
    pub fn new(
        detector: Arc<dyn BarcodeDetector>,
        orientation: TagOrientation,
        payload_filter: impl Into<String>,
    ) -> Self {
        Self {
            detector,
            orientation,
            payload_filter: payload_filter.into(),
            symbologies: Symbology::MATRIX.to_vec(),
        }
    }

    /// Restrict detection to the given symbology set.
    pub fn with_symbologies(mut self, symbologies: &[Symbology]) -> Self {
        self.symbologies = symbologies.to_vec();
        self
    }

    /// Locate and rectify the barcode region of `baseframe`.
    ///
    /// Detection runs on the blocking pool and the returned future resolves
    /// exactly once; dropping it detaches the detection task without
    /// re-entering its completion path. The baseframe is never mutated.
    pub async fn execute(&self, baseframe: &RgbaCanvas) -> Result<RgbaCanvas, BarcodeCropError> {
        // detection always runs against a left-rotated frame so corner order
        // is consistent across capture orientations
        let rotated = baseframe.rotated_left();

        let detector = Arc::clone(&self.detector);
        let symbologies = self.symbologies.clone();
        let frame = rotated.clone();
        let observations =
            tokio::task::spawn_blocking(move || detector.detect(&frame, &symbologies))
                .await
                .map_err(|_| BarcodeCropError::DetectionTask)??;

        let candidate = select_candidate(&observations, &self.payload_filter)
            .ok_or(BarcodeCropError::NoSymbolDetected)?;

        let w = rotated.width() as f64;
        let h = rotated.height() as f64;
        let mut raw = [Point2::new(0.0, 0.0); 4];
        for (out, p) in raw.iter_mut().zip(candidate.corners.iter()) {
            *out = Point2::new(p.x * w, p.y * h);
        }

        let ordered = OrderedCorners::from_raw(&raw, self.orientation);
        rectify_quad(&rotated, &ordered)
    }
}

/// Keep maximum-confidence candidates whose payload contains `filter` and
/// that carry exactly four corner points; pick the first.
#[allow(clippy::float_cmp)]
fn select_candidate<'a>(
    observations: &'a [BarcodeObservation],
    filter: &str,
) -> Option<&'a BarcodeObservation> {
    let total = observations.len();
    let candidate = observations
        .iter()
        .filter(|o| o.confidence == 1.0)
        .filter(|o| o.payload.as_deref().unwrap_or("").contains(filter))
        .find(|o| o.corners.len() == 4);
    if candidate.is_none() && total > 0 {
        debug!("{total} candidate(s) rejected by confidence/payload/corner filters");
    }
    candidate
}

/// Perspective-correct the quad into an upright rectangle sized from the
/// quad's edge lengths.
fn rectify_quad(
    frame: &RgbaCanvas,
    corners: &OrderedCorners,
) -> Result<RgbaCanvas, BarcodeCropError> {
    let top = (corners.top_right - corners.top_left).norm();
    let bottom = (corners.bottom_right - corners.bottom_left).norm();
    let left = (corners.top_left - corners.bottom_left).norm();
    let right = (corners.top_right - corners.bottom_right).norm();

    let out_w = top.max(bottom).round() as u32;
    let out_h = left.max(right).round() as u32;
    if out_w == 0 || out_h == 0 {
        return Err(BarcodeCropError::EmptyOutput);
    }

    // raster coordinates: the printed top edge maps to y = 0
    let dst = [
        Point2::new(0.0, out_h as f64),
        Point2::new(0.0, 0.0),
        Point2::new(out_w as f64, 0.0),
        Point2::new(out_w as f64, out_h as f64),
    ];
    let src = [
        corners.bottom_left,
        corners.top_left,
        corners.top_right,
        corners.bottom_right,
    ];

    let h = homography_from_4pt(&dst, &src).ok_or(BarcodeCropError::TransformConstruction)?;
    let out = warp_perspective_rgba(frame, h, out_w, out_h);
    if out.is_empty() {
        return Err(BarcodeCropError::EmptyOutput);
    }
    Ok(out)
}
