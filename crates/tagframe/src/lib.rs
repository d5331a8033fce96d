//! High-level facade crate for the `tagframe-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the underlying extraction crates
//! - the [`analysis`] module assembling one captured baseframe and its
//!   derived regions into an analysis frame
//! - (feature `image`) conversions between canvases and `image` buffers
//!
//! ## Quickstart
//!
//! ```no_run
//! use std::sync::Arc;
//! use tagframe::analysis::{CaptureSettings, FrameAssembler, TagPayload};
//! use tagframe::regions::{AxisSign, InsetAxisOrder, TagDesignDescription};
//! use tagframe::{
//!     BarcodeCropOperation, CompositeReferenceCropper, PatchCropper, PatchCropperParams,
//!     RxingDetector, TagOrientation,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let design = TagDesignDescription::nc01();
//! let baseframe =
//!     tagframe::convert::canvas_from_image(&image::open("baseframe.png")?.to_rgba8())?;
//!
//! let assembler = FrameAssembler::new(
//!     CompositeReferenceCropper::new(),
//!     PatchCropper::new(PatchCropperParams {
//!         anchor_x: 0.1333,
//!         anchor_y: 0.75,
//!         x_direction: AxisSign::Positive,
//!         y_direction: AxisSign::Positive,
//!         x_ratio: 0.5066666666,
//!         y_ratio: 0.25,
//!         width_inset: design.identity_area_inset.width,
//!         height_inset: design.identity_area_inset.height,
//!         inset_axis_order: InsetAxisOrder::Transposed,
//!     }),
//!     BarcodeCropOperation::new(Arc::new(RxingDetector::new()), TagOrientation::Upright, ""),
//! );
//!
//! let frame = assembler
//!     .assemble("frame-0001", &baseframe, CaptureSettings::default(), TagPayload(String::new()))
//!     .await?;
//! println!("complete: {}", frame.is_complete());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - [`core`](tagframe_core): canvas, rectangle, and perspective primitives.
//! - [`regions`](tagframe_regions): tag designs, ratio windows, reference
//!   and patch croppers.
//! - [`barcode`](tagframe_barcode): detection backends, orientation
//!   handling, and barcode rectification.
//! - [`analysis`]: the assembled analysis frame and its region policy.

pub use tagframe_barcode as barcode;
pub use tagframe_core as core;
pub use tagframe_regions as regions;

pub use tagframe_barcode::{
    BarcodeCropError, BarcodeCropOperation, BarcodeDetector, RxingDetector, Symbology,
    TagOrientation,
};
pub use tagframe_core::{Rect, RgbaCanvas};
pub use tagframe_regions::{
    CompositeReferenceCropper, PatchCropper, PatchCropperParams, TagDesignDescription,
};

pub mod analysis;

#[cfg(feature = "image")]
pub mod convert;
