//! Validated, strongly typed calculator input.
//!
//! Values of these types are only produced by [`crate::Validator`], so the
//! calculation core never sees NaN or out-of-range numbers.

use crate::catalog::{FrameSize, LensType, PriorityPreset};
use serde::Serialize;

/// Prescription values for a single eye
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EyePrescription {
    pub sph: f64,
    pub cyl: f64,
    pub axis: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub right_eye: EyePrescription,
    pub left_eye: EyePrescription,
}

impl Prescription {
    /// Largest absolute sphere over both eyes
    pub fn max_sphere(&self) -> f64 {
        self.right_eye.sph.abs().max(self.left_eye.sph.abs())
    }

    /// Largest absolute cylinder over both eyes
    pub fn max_cylinder(&self) -> f64 {
        self.right_eye.cyl.abs().max(self.left_eye.cyl.abs())
    }

    /// `max|sph| + weight * max|cyl|`
    pub fn total_power(&self, cylinder_weight: f64) -> f64 {
        self.max_sphere() + cylinder_weight * self.max_cylinder()
    }

    /// Total power carrying the sign of the dominant eye
    ///
    /// The eye with the larger absolute sphere decides (right eye on ties).
    /// A plano sphere takes the sign of the dominant cylinder instead.
    pub fn signed_power(&self, cylinder_weight: f64) -> f64 {
        let magnitude = self.total_power(cylinder_weight);
        let sph = if self.left_eye.sph.abs() > self.right_eye.sph.abs() {
            self.left_eye.sph
        } else {
            self.right_eye.sph
        };
        let cyl = if self.left_eye.cyl.abs() > self.right_eye.cyl.abs() {
            self.left_eye.cyl
        } else {
            self.right_eye.cyl
        };

        let sign_source = if sph != 0.0 { sph } else { cyl };
        if sign_source < 0.0 {
            -magnitude
        } else {
            magnitude
        }
    }
}

/// Frame choice; manual measurements are validated but not used in thickness math
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub size: FrameSize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridge: Option<f64>,
}

impl Frame {
    pub fn diameter(&self) -> f64 {
        self.size.diameter()
    }
}

/// Priority sliders, each 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriorityWeights {
    pub thickness: f64,
    pub price: f64,
    pub quality: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            thickness: 50.0,
            price: 50.0,
            quality: 50.0,
        }
    }
}

impl PriorityWeights {
    /// Collapse the sliders into the preset used by index recommendation
    ///
    /// A strictly dominant thickness slider means thin, a strictly dominant
    /// price slider means cheap; anything else is balanced.
    pub fn preset(&self) -> PriorityPreset {
        if self.thickness > self.price && self.thickness > self.quality {
            PriorityPreset::Thin
        } else if self.price > self.thickness && self.price > self.quality {
            PriorityPreset::Cheap
        } else {
            PriorityPreset::Balanced
        }
    }

    /// Whether recommendations are ranked by price instead of rating
    pub fn ranks_by_price(&self) -> bool {
        self.price > self.quality
    }
}

/// A complete, validated calculator request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub prescription: Prescription,
    pub frame: Frame,
    pub lens_type: LensType,
    pub priority: PriorityWeights,
    pub usage: String,
    pub subsidy_eligible: bool,
}
