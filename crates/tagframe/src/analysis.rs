//! Analysis-frame assembly.
//!
//! An [`AnalysisFrame`] aggregates one captured baseframe with the region
//! images derived from it. The assembler runs the three extraction
//! operations and either requires every region or records failures per
//! region, depending on the configured [`RegionPolicy`].

use log::warn;
use serde::{Deserialize, Serialize};
use tagframe_barcode::{BarcodeCropError, BarcodeCropOperation};
use tagframe_core::{CompositeError, RgbaCanvas};
use tagframe_regions::{CompositeReferenceCropper, PatchCropper};

/// Camera white-balance mode at capture time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhiteBalanceMode {
    Automatic,
    Locked,
}

/// Camera exposure mode at capture time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureMode {
    Automatic,
    Locked,
}

/// Torch state at capture time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TorchMode {
    Off,
    On,
}

/// Camera settings recorded at capture time, opaque to the extraction core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSettings {
    pub white_balance: WhiteBalanceMode,
    pub exposure: ExposureMode,
    pub torch: TorchMode,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            white_balance: WhiteBalanceMode::Automatic,
            exposure: ExposureMode::Automatic,
            torch: TorchMode::Off,
        }
    }
}

/// Decoded tag payload carried with the frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPayload(pub String);

/// Which derived region an outcome refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionKind {
    Reference,
    QuantumPatch,
    Barcode,
}

/// A region that could not be derived, with the reason.
#[derive(Clone, Debug)]
pub struct RegionFailure {
    pub region: RegionKind,
    pub reason: String,
}

/// Whether a failed region aborts assembly or is recorded on the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RegionPolicy {
    /// Any region failure fails the whole frame.
    RequireAll,
    /// Failed regions are recorded on the frame and assembly continues.
    #[default]
    AllowPartial,
}

/// Errors from frame assembly under [`RegionPolicy::RequireAll`].
#[derive(thiserror::Error, Debug)]
pub enum AssembleError {
    #[error("reference region failed")]
    Reference(#[source] CompositeError),
    #[error("quantum patch region is empty")]
    EmptyPatch,
    #[error("barcode region failed")]
    Barcode(#[source] BarcodeCropError),
}

/// One captured baseframe with its derived region images.
///
/// Immutable after assembly. Regions that failed under
/// [`RegionPolicy::AllowPartial`] read as `None`, with the reason recorded
/// in [`AnalysisFrame::failures`].
#[derive(Clone, Debug)]
pub struct AnalysisFrame {
    id: String,
    baseframe: RgbaCanvas,
    reference_region: Option<RgbaCanvas>,
    quantum_patch_region: Option<RgbaCanvas>,
    barcode_region: Option<RgbaCanvas>,
    settings_at_capture: CaptureSettings,
    payload: TagPayload,
    failures: Vec<RegionFailure>,
}

impl AnalysisFrame {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn baseframe(&self) -> &RgbaCanvas {
        &self.baseframe
    }

    pub fn reference_region(&self) -> Option<&RgbaCanvas> {
        self.reference_region.as_ref()
    }

    pub fn quantum_patch_region(&self) -> Option<&RgbaCanvas> {
        self.quantum_patch_region.as_ref()
    }

    pub fn barcode_region(&self) -> Option<&RgbaCanvas> {
        self.barcode_region.as_ref()
    }

    pub fn settings_at_capture(&self) -> CaptureSettings {
        self.settings_at_capture
    }

    pub fn payload(&self) -> &TagPayload {
        &self.payload
    }

    pub fn failures(&self) -> &[RegionFailure] {
        &self.failures
    }

    /// True when every region was derived.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs the three extraction operations against one baseframe.
pub struct FrameAssembler {
    reference: CompositeReferenceCropper,
    patch: PatchCropper,
    barcode: BarcodeCropOperation,
    policy: RegionPolicy,
}

impl FrameAssembler {
    pub fn new(
        reference: CompositeReferenceCropper,
        patch: PatchCropper,
        barcode: BarcodeCropOperation,
    ) -> Self {
        Self {
            reference,
            patch,
            barcode,
            policy: RegionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RegionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Derive all three regions from `baseframe` and build the frame.
    ///
    /// The baseframe is read-only; every derived image is newly allocated.
    pub async fn assemble(
        &self,
        id: impl Into<String>,
        baseframe: &RgbaCanvas,
        settings: CaptureSettings,
        payload: TagPayload,
    ) -> Result<AnalysisFrame, AssembleError> {
        let mut failures = Vec::new();

        let reference_region = match self.reference.execute(baseframe) {
            Ok(img) => Some(img),
            Err(e) => {
                if self.policy == RegionPolicy::RequireAll {
                    return Err(AssembleError::Reference(e));
                }
                warn!("reference region failed: {e}");
                failures.push(RegionFailure {
                    region: RegionKind::Reference,
                    reason: e.to_string(),
                });
                None
            }
        };

        // degenerate geometry surfaces here, not inside the cropper
        let patch = self.patch.execute(baseframe);
        let quantum_patch_region = if patch.is_empty() {
            if self.policy == RegionPolicy::RequireAll {
                return Err(AssembleError::EmptyPatch);
            }
            warn!("quantum patch region is empty");
            failures.push(RegionFailure {
                region: RegionKind::QuantumPatch,
                reason: "patch window degenerated to an empty crop".to_owned(),
            });
            None
        } else {
            Some(patch)
        };

        let barcode_region = match self.barcode.execute(baseframe).await {
            Ok(img) => Some(img),
            Err(e) => {
                if self.policy == RegionPolicy::RequireAll {
                    return Err(AssembleError::Barcode(e));
                }
                warn!("barcode region failed: {e}");
                failures.push(RegionFailure {
                    region: RegionKind::Barcode,
                    reason: e.to_string(),
                });
                None
            }
        };

        Ok(AnalysisFrame {
            id: id.into(),
            baseframe: baseframe.clone(),
            reference_region,
            quantum_patch_region,
            barcode_region,
            settings_at_capture: settings,
            payload,
            failures,
        })
    }
}
