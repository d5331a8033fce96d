//! Extract the reference, patch, and barcode regions from one baseframe.
//!
//! ```sh
//! cargo run --example analyze_frame -- baseframe.png out/
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use log::{info, warn, LevelFilter};
use tagframe::analysis::{CaptureSettings, FrameAssembler, TagPayload};
use tagframe::convert::{canvas_from_image, image_from_canvas};
use tagframe::regions::{AxisSign, InsetAxisOrder, TagDesignDescription};
use tagframe::{
    BarcodeCropOperation, CompositeReferenceCropper, PatchCropper, PatchCropperParams,
    RxingDetector, TagOrientation,
};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tagframe::core::init_with_level(LevelFilter::Info)?;

    let mut args = std::env::args().skip(1);
    let input = PathBuf::from(
        args.next()
            .ok_or("usage: analyze_frame <baseframe> [out_dir]")?,
    );
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_owned()));

    let design = TagDesignDescription::nc01();
    design.validate()?;
    info!(
        "tag design {} ({}x{} mm baseframe)",
        design.format_id, design.baseframe_mm.width, design.baseframe_mm.height
    );

    let baseframe = canvas_from_image(&image::open(&input)?.to_rgba8())?;
    info!(
        "baseframe {}x{} px from {}",
        baseframe.width(),
        baseframe.height(),
        input.display()
    );

    let patch_params = PatchCropperParams {
        anchor_x: 0.1333,
        anchor_y: 0.75,
        x_direction: AxisSign::Positive,
        y_direction: AxisSign::Positive,
        x_ratio: 0.5066666666,
        y_ratio: 0.25,
        width_inset: design.identity_area_inset.width,
        height_inset: design.identity_area_inset.height,
        inset_axis_order: InsetAxisOrder::Transposed,
    };

    let assembler = FrameAssembler::new(
        CompositeReferenceCropper::new(),
        PatchCropper::new(patch_params),
        BarcodeCropOperation::new(Arc::new(RxingDetector::new()), TagOrientation::Upright, ""),
    );

    let frame = assembler
        .assemble(
            "frame-0001",
            &baseframe,
            CaptureSettings::default(),
            TagPayload(String::new()),
        )
        .await?;

    std::fs::create_dir_all(&out_dir)?;
    for (name, region) in [
        ("reference", frame.reference_region()),
        ("patch", frame.quantum_patch_region()),
        ("barcode", frame.barcode_region()),
    ] {
        match region.and_then(image_from_canvas) {
            Some(img) => {
                let path = out_dir.join(format!("{name}.png"));
                img.save(&path)?;
                info!("wrote {}", path.display());
            }
            None => warn!("{name} region unavailable"),
        }
    }
    for failure in frame.failures() {
        warn!("{:?} region failed: {}", failure.region, failure.reason);
    }

    Ok(())
}
