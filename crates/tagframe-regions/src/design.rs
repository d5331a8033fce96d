//! Physical tag layout descriptions.
//!
//! A [`TagDesignDescription`] is a pure configuration value: it records the
//! printed geometry of one tag format and carries no behaviour beyond
//! validation. Designs are injected by the caller; nothing in this workspace
//! reads them from ambient state.

use serde::{Deserialize, Serialize};

/// Physical size in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeMm {
    pub width: f64,
    pub height: f64,
}

/// Position normalised against the baseframe extent, unit interval per axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormPoint {
    pub x: f64,
    pub y: f64,
}

/// Unit-interval crop fractions for the identity-area inset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsetFractions {
    pub width: f64,
    pub height: f64,
}

/// Pixel resolution floor for identification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinResolution {
    pub width: u32,
    pub height: u32,
}

/// Allowed print placement drift, millimetres per axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrintDriftMm {
    pub x: f64,
    pub y: f64,
}

/// Design description validation errors.
#[derive(thiserror::Error, Debug)]
pub enum DesignError {
    #[error("{field} must lie in [0, 1], got {value}")]
    RatioOutOfRange { field: &'static str, value: f64 },
    #[error("{field} must be positive, got {value}")]
    NonPositiveDimension { field: &'static str, value: f64 },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Immutable description of one physical tag format.
///
/// Timestamps and ids are opaque strings: they are recorded verbatim for
/// traceability and never parsed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TagDesignDescription {
    pub id: String,
    pub format_id: String,
    pub created_at: String,
    pub updated_at: String,

    pub baseframe_mm: SizeMm,
    pub carrier_mm: SizeMm,
    pub identity_area_mm: SizeMm,
    pub tracking_marker_mm: SizeMm,
    pub reference_area_mm: SizeMm,

    /// Left corner of the reference area, normalised against the baseframe.
    pub reference_area_corner: NormPoint,
    /// Left corner of the tracking marker, normalised against the baseframe.
    pub tracking_marker_corner: NormPoint,
    /// Identity-area position relative to the tracking marker's bottom-left
    /// corner.
    pub identity_area_offset: NormPoint,

    pub identity_area_inset: InsetFractions,
    pub identity_area_min_resolution: MinResolution,
    pub print_drift_mm: PrintDriftMm,
}

impl TagDesignDescription {
    /// Check the ratio and dimension invariants.
    pub fn validate(&self) -> Result<(), DesignError> {
        let ratios = [
            ("reference_area_corner.x", self.reference_area_corner.x),
            ("reference_area_corner.y", self.reference_area_corner.y),
            ("tracking_marker_corner.x", self.tracking_marker_corner.x),
            ("tracking_marker_corner.y", self.tracking_marker_corner.y),
            ("identity_area_offset.x", self.identity_area_offset.x),
            ("identity_area_offset.y", self.identity_area_offset.y),
            ("identity_area_inset.width", self.identity_area_inset.width),
            ("identity_area_inset.height", self.identity_area_inset.height),
        ];
        for (field, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(DesignError::RatioOutOfRange { field, value });
            }
        }

        let dims = [
            ("baseframe_mm.width", self.baseframe_mm.width),
            ("baseframe_mm.height", self.baseframe_mm.height),
            ("carrier_mm.width", self.carrier_mm.width),
            ("carrier_mm.height", self.carrier_mm.height),
            ("identity_area_mm.width", self.identity_area_mm.width),
            ("identity_area_mm.height", self.identity_area_mm.height),
            ("tracking_marker_mm.width", self.tracking_marker_mm.width),
            ("tracking_marker_mm.height", self.tracking_marker_mm.height),
            ("reference_area_mm.width", self.reference_area_mm.width),
            ("reference_area_mm.height", self.reference_area_mm.height),
        ];
        for (field, value) in dims {
            if !value.is_finite() || value <= 0.0 {
                return Err(DesignError::NonPositiveDimension { field, value });
            }
        }

        Ok(())
    }

    /// Parse a design from JSON and validate it.
    pub fn from_json_str(s: &str) -> Result<Self, DesignError> {
        let design: Self = serde_json::from_str(s)?;
        design.validate()?;
        Ok(design)
    }

    /// Calibration values for the NC01 tag format.
    pub fn nc01() -> Self {
        Self {
            id: "NC01".to_owned(),
            format_id: "NC01".to_owned(),
            created_at: String::new(),
            updated_at: String::new(),
            baseframe_mm: SizeMm {
                width: 15.0,
                height: 28.0,
            },
            carrier_mm: SizeMm {
                width: 13.0,
                height: 28.0,
            },
            identity_area_mm: SizeMm {
                width: 7.59,
                height: 7.0,
            },
            tracking_marker_mm: SizeMm {
                width: 8.5,
                height: 6.5,
            },
            reference_area_mm: SizeMm {
                width: 2.5,
                height: 10.0,
            },
            reference_area_corner: NormPoint { x: 0.13, y: 0.75 },
            tracking_marker_corner: NormPoint { x: 0.299, y: 0.55 },
            identity_area_offset: NormPoint { x: 0.0, y: 0.0 },
            identity_area_inset: InsetFractions {
                width: 0.9,
                height: 0.4,
            },
            identity_area_min_resolution: MinResolution {
                width: 150,
                height: 150,
            },
            print_drift_mm: PrintDriftMm { x: 0.0, y: 0.0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nc01_passes_validation() {
        TagDesignDescription::nc01().validate().expect("valid design");
    }

    #[test]
    fn out_of_range_ratio_is_rejected() {
        let mut design = TagDesignDescription::nc01();
        design.reference_area_corner.x = 1.3;
        let err = design.validate().unwrap_err();
        assert!(matches!(
            err,
            DesignError::RatioOutOfRange {
                field: "reference_area_corner.x",
                ..
            }
        ));
    }

    #[test]
    fn non_positive_dimension_is_rejected() {
        let mut design = TagDesignDescription::nc01();
        design.reference_area_mm.height = 0.0;
        let err = design.validate().unwrap_err();
        assert!(matches!(err, DesignError::NonPositiveDimension { .. }));
    }

    #[test]
    fn json_round_trip_preserves_fields() {
        let design = TagDesignDescription::nc01();
        let json = serde_json::to_string(&design).expect("serialize");
        let parsed = TagDesignDescription::from_json_str(&json).expect("parse");
        assert_eq!(parsed.format_id, "NC01");
        assert_eq!(parsed.identity_area_inset, design.identity_area_inset);
        assert_eq!(parsed.baseframe_mm, design.baseframe_mm);
    }

    #[test]
    fn invalid_json_design_fails_on_validation() {
        let mut design = TagDesignDescription::nc01();
        design.identity_area_inset.width = -0.1;
        let json = serde_json::to_string(&design).expect("serialize");
        assert!(TagDesignDescription::from_json_str(&json).is_err());
    }
}
