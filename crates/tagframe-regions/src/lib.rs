//! Calibrated region extraction from captured tag baseframes.
//!
//! Three operations read the baseframe and a design-derived parameter set:
//! ratio-window rectangles ([`region_from_ratios`]), the composite reference
//! image ([`CompositeReferenceCropper`]), and the quantum-patch crop
//! ([`PatchCropper`]). All of them are stateless with respect to shared
//! mutable state and return newly allocated images.

mod design;
mod patch;
mod ratio;
mod reference;

pub use design::{
    DesignError, InsetFractions, MinResolution, NormPoint, PrintDriftMm, SizeMm,
    TagDesignDescription,
};
pub use patch::{AxisSign, InsetAxisOrder, PatchCropper, PatchCropperParams};
pub use ratio::{inset_by_fractions, region_from_ratios, RegionRatios};
pub use reference::CompositeReferenceCropper;
