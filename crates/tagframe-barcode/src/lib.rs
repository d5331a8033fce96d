//! Barcode location and perspective rectification for tag baseframes.
//!
//! Optical detection is delegated to a [`BarcodeDetector`] implementation;
//! [`RxingDetector`] is the default backend. [`BarcodeCropOperation`]
//! filters the returned candidates, orders the detected corners for the
//! tag's printed orientation, and perspective-corrects the symbol into an
//! upright image. Detection is the one asynchronous boundary in the
//! workspace and is modelled as a single-shot future.

mod detector;
mod locate;
mod observation;

pub use detector::{BarcodeDetector, DetectorError, RxingDetector};
pub use locate::{BarcodeCropError, BarcodeCropOperation};
pub use observation::{BarcodeObservation, OrderedCorners, Symbology, TagOrientation};
