//! Lens thickness estimation
//!
//! Geometric sag model: the curvature-induced depth of a surface with power
//! `P` diopters over a lens of radius `r` mm is
//!
//! ```text
//! sag = r² × |P| / (2000 × (n − 1))
//! ```
//!
//! A minus (myopic) lens keeps the minimum gauge at its center and grows at
//! the edge; a plus (hyperopic) lens keeps the gauge at the edge and grows at
//! the center.

use crate::catalog::LensIndex;
use crate::{InputLimits, OptikError, OptikResult};
use serde::{Deserialize, Serialize};

/// Default minimum glass thickness, mm
pub const DEFAULT_MIN_THICKNESS: f64 = 1.0;

/// Estimated lens dimensions in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThicknessResult {
    pub center: f64,
    pub edge: f64,
    pub sag: f64,
    pub diameter: f64,
}

impl ThicknessResult {
    /// The dimension that decides how thick the lens looks
    pub fn critical(&self) -> f64 {
        self.center.max(self.edge)
    }
}

/// When a lens can no longer be stocked and must be manufactured on demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialOrderPolicy {
    /// Absolute power at or above which a lens is a special order
    pub threshold: f64,
    pub min_days: u32,
    pub max_days: u32,
}

impl Default for SpecialOrderPolicy {
    fn default() -> Self {
        Self {
            threshold: 7.0,
            min_days: 7,
            max_days: 14,
        }
    }
}

/// Marker for a lens that needs special manufacture
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialOrder {
    pub power: f64,
    pub min_days: u32,
    pub max_days: u32,
}

/// Result of assessing a lens: a thickness estimate or a special-order route
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThicknessOutcome {
    Estimated(ThicknessResult),
    SpecialOrder(SpecialOrder),
}

/// Visual thickness class shown next to a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThicknessRisk {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ThicknessRisk {
    pub fn classify(thickness_mm: f64) -> Self {
        if thickness_mm <= 3.0 {
            ThicknessRisk::Low
        } else if thickness_mm <= 5.0 {
            ThicknessRisk::Medium
        } else if thickness_mm <= 7.0 {
            ThicknessRisk::High
        } else {
            ThicknessRisk::VeryHigh
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThicknessRisk::Low => "low",
            ThicknessRisk::Medium => "medium",
            ThicknessRisk::High => "high",
            ThicknessRisk::VeryHigh => "very high",
        }
    }
}

/// Thickness estimator over the sag model
#[derive(Debug, Clone, PartialEq)]
pub struct ThicknessEstimator {
    limits: InputLimits,
    special_order: SpecialOrderPolicy,
}

impl Default for ThicknessEstimator {
    fn default() -> Self {
        Self::new(InputLimits::default(), SpecialOrderPolicy::default())
    }
}

impl ThicknessEstimator {
    pub fn new(limits: InputLimits, special_order: SpecialOrderPolicy) -> Self {
        Self {
            limits,
            special_order,
        }
    }

    pub fn special_order(&self) -> &SpecialOrderPolicy {
        &self.special_order
    }

    /// Center and edge thickness for a lens of `power` diopters
    pub fn estimate(
        &self,
        power: f64,
        index: f64,
        diameter: f64,
        min_thickness: f64,
    ) -> OptikResult<ThicknessResult> {
        self.check_power(power)?;
        self.check_index(index)?;
        self.check_diameter(diameter)?;
        if !min_thickness.is_finite() || min_thickness <= 0.0 {
            return Err(OptikError::invalid(
                "minThickness",
                format!("must be a positive number, got {}", min_thickness),
            ));
        }

        let radius = diameter / 2.0;
        let sag = radius * radius * power.abs() / (2000.0 * (index - 1.0));

        let (center, edge) = if power < 0.0 {
            (min_thickness, min_thickness + sag)
        } else if power > 0.0 {
            (min_thickness + sag, min_thickness)
        } else {
            (min_thickness, min_thickness)
        };

        Ok(ThicknessResult {
            center,
            edge,
            sag,
            diameter,
        })
    }

    /// Percent reduction of the critical dimension versus a 1.50 lens
    ///
    /// Edge is compared for minus lenses, center otherwise. Never negative,
    /// rounded to one decimal.
    pub fn improvement_percent(
        &self,
        power: f64,
        new_index: f64,
        diameter: f64,
    ) -> OptikResult<f64> {
        let standard = self.estimate(
            power,
            LensIndex::STANDARD.value(),
            diameter,
            DEFAULT_MIN_THICKNESS,
        )?;
        let candidate = self.estimate(power, new_index, diameter, DEFAULT_MIN_THICKNESS)?;

        let (old, new) = if power < 0.0 {
            (standard.edge, candidate.edge)
        } else {
            (standard.center, candidate.center)
        };

        let improvement = (old - new) / old * 100.0;
        Ok(round_to(improvement, 1).max(0.0))
    }

    /// Estimate, or route to special manufacture above the power threshold
    pub fn assess(&self, power: f64, index: f64, diameter: f64) -> OptikResult<ThicknessOutcome> {
        self.check_power(power)?;
        self.check_index(index)?;
        self.check_diameter(diameter)?;
        if power.abs() >= self.special_order.threshold {
            return Ok(ThicknessOutcome::SpecialOrder(SpecialOrder {
                power,
                min_days: self.special_order.min_days,
                max_days: self.special_order.max_days,
            }));
        }
        self.estimate(power, index, diameter, DEFAULT_MIN_THICKNESS)
            .map(ThicknessOutcome::Estimated)
    }

    fn check_power(&self, power: f64) -> OptikResult<()> {
        if !power.is_finite() {
            return Err(OptikError::invalid("power", "must be a finite number"));
        }
        if power.abs() > self.limits.max_power {
            return Err(OptikError::invalid(
                "power",
                format!("{} D is outside ±{} D", power, self.limits.max_power),
            ));
        }
        Ok(())
    }

    fn check_index(&self, index: f64) -> OptikResult<()> {
        if !index.is_finite() || index <= 1.0 || index > self.limits.max_index {
            return Err(OptikError::invalid(
                "index",
                format!(
                    "refractive index must be above 1.0 and at most {}, got {}",
                    self.limits.max_index, index
                ),
            ));
        }
        Ok(())
    }

    fn check_diameter(&self, diameter: f64) -> OptikResult<()> {
        if !diameter.is_finite() || diameter <= 0.0 || diameter > self.limits.max_diameter {
            return Err(OptikError::invalid(
                "diameter",
                format!(
                    "diameter must be above 0 and at most {} mm, got {}",
                    self.limits.max_diameter, diameter
                ),
            ));
        }
        Ok(())
    }
}

/// Pure sag-model estimate with the default limits
pub fn estimate_thickness(
    power: f64,
    index: f64,
    diameter: f64,
    min_thickness: f64,
) -> OptikResult<ThicknessResult> {
    ThicknessEstimator::default().estimate(power, index, diameter, min_thickness)
}

/// Pure improvement estimate with the default limits
pub fn estimate_improvement_percent(power: f64, new_index: f64, diameter: f64) -> OptikResult<f64> {
    ThicknessEstimator::default().improvement_percent(power, new_index, diameter)
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
