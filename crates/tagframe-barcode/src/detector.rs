//! Optical symbol-detection backends.

use std::collections::HashSet;
use std::sync::Mutex;

use image::{DynamicImage, RgbaImage};
use log::debug;
use nalgebra::Point2;
use rxing::common::HybridBinarizer;
use rxing::multi::{GenericMultipleBarcodeReader, MultipleBarcodeReader};
use rxing::{
    BarcodeFormat, BinaryBitmap, BufferedImageLuminanceSource, DecodeHintType, DecodeHintValue,
    DecodingHintDictionary, Exceptions, MultiFormatReader,
};
use tagframe_core::RgbaCanvas;

use crate::{BarcodeObservation, Symbology};

/// Optical symbol-detection capability.
///
/// Implementations report every candidate found in `frame` with its decoded
/// payload, a confidence in [0, 1], and corner points normalised against the
/// frame's extent. Implementations are called from a blocking worker thread
/// and must serialise internally if their backend does not support
/// concurrent invocations.
pub trait BarcodeDetector: Send + Sync {
    fn detect(
        &self,
        frame: &RgbaCanvas,
        symbologies: &[Symbology],
    ) -> Result<Vec<BarcodeObservation>, DetectorError>;
}

#[derive(thiserror::Error, Debug)]
pub enum DetectorError {
    #[error("detection frame has no pixels")]
    EmptyFrame,
    #[error("detection backend failed: {0}")]
    Backend(String),
}

/// Multi-format optical detector backed by `rxing`.
///
/// The underlying reader needs exclusive access, so concurrent calls are
/// serialised on an internal mutex.
pub struct RxingDetector {
    reader: Mutex<GenericMultipleBarcodeReader<MultiFormatReader>>,
}

impl RxingDetector {
    pub fn new() -> Self {
        Self {
            reader: Mutex::new(GenericMultipleBarcodeReader::new(
                MultiFormatReader::default(),
            )),
        }
    }
}

impl Default for RxingDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn format_for(symbology: Symbology) -> BarcodeFormat {
    match symbology {
        Symbology::DataMatrix => BarcodeFormat::DATA_MATRIX,
        Symbology::Qr => BarcodeFormat::QR_CODE,
        Symbology::MicroQr => BarcodeFormat::MICRO_QR_CODE,
    }
}

impl BarcodeDetector for RxingDetector {
    fn detect(
        &self,
        frame: &RgbaCanvas,
        symbologies: &[Symbology],
    ) -> Result<Vec<BarcodeObservation>, DetectorError> {
        if frame.is_empty() {
            return Err(DetectorError::EmptyFrame);
        }
        let rgba = RgbaImage::from_raw(frame.width(), frame.height(), frame.pixels().to_vec())
            .ok_or(DetectorError::EmptyFrame)?;

        let source = BufferedImageLuminanceSource::new(DynamicImage::ImageRgba8(rgba));
        let mut bitmap = BinaryBitmap::new(HybridBinarizer::new(source));

        let formats: HashSet<BarcodeFormat> = symbologies.iter().copied().map(format_for).collect();
        let mut hints = DecodingHintDictionary::new();
        hints.insert(
            DecodeHintType::POSSIBLE_FORMATS,
            DecodeHintValue::PossibleFormats(formats),
        );
        hints.insert(DecodeHintType::TRY_HARDER, DecodeHintValue::TryHarder(true));

        let mut reader = self
            .reader
            .lock()
            .map_err(|_| DetectorError::Backend("reader mutex poisoned".to_owned()))?;
        let results = match reader.decode_multiple_with_hints(&mut bitmap, &hints) {
            Ok(results) => results,
            Err(Exceptions::NotFoundException(_)) => Vec::new(),
            Err(e) => return Err(DetectorError::Backend(e.to_string())),
        };
        debug!("rxing reported {} candidate(s)", results.len());

        let w = frame.width() as f64;
        let h = frame.height() as f64;
        let observations = results
            .into_iter()
            .map(|r| BarcodeObservation {
                // rxing only reports symbols it fully decoded
                confidence: 1.0,
                payload: Some(r.getText().to_owned()),
                corners: r
                    .getPoints()
                    .iter()
                    .map(|p| Point2::new(p.x as f64 / w, p.y as f64 / h))
                    .collect(),
            })
            .collect();
        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame_is_rejected() {
        let detector = RxingDetector::new();
        let frame = RgbaCanvas::filled(0, 0, [0, 0, 0, 0]);
        assert!(matches!(
            detector.detect(&frame, &Symbology::MATRIX),
            Err(DetectorError::EmptyFrame)
        ));
    }

    #[test]
    fn blank_frame_yields_no_observations() {
        let detector = RxingDetector::new();
        let frame = RgbaCanvas::filled(64, 64, [255, 255, 255, 255]);
        let observations = detector
            .detect(&frame, &Symbology::QR_ONLY)
            .expect("detection runs");
        assert!(observations.is_empty());
    }
}
