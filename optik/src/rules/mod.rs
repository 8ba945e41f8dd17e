//! Rule tables
//!
//! Index recommendation, candidate short-lists, coating selection and
//! pricing are plain data. The tables are injected into the engine and
//! treated as immutable for the duration of a calculation; an external
//! writer (an admin tool, the HTTP `PUT /rules` endpoint) may replace them
//! between calculations.

pub mod coating;
pub mod index;
pub mod pricing;

pub use coating::{CoatingRule, LensTypeRule};
pub use index::{CandidateBand, IndexRule, IndexSuggestion, PriorityOffsets};
pub use pricing::{CoatingPrice, IndexPrice, PriceBand, PricingRules};

use crate::catalog::{Coating, LensIndex, LensType};
use crate::physics::SpecialOrderPolicy;
use crate::{OptikError, OptikResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All static configuration consumed by the calculation core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleTables {
    /// Weight of the cylinder in `total = max|sph| + weight * max|cyl|`
    pub cylinder_weight: f64,
    pub index_rules: Vec<IndexRule>,
    pub priority_offsets: PriorityOffsets,
    pub candidate_bands: Vec<CandidateBand>,
    pub coating_rules: Vec<CoatingRule>,
    pub lens_types: Vec<LensTypeRule>,
    pub pricing: PricingRules,
    pub special_order: SpecialOrderPolicy,
}

impl Default for RuleTables {
    fn default() -> Self {
        Self {
            cylinder_weight: 0.2,
            index_rules: index::default_index_rules(),
            priority_offsets: PriorityOffsets::default(),
            candidate_bands: index::default_candidate_bands(),
            coating_rules: coating::default_coating_rules(),
            lens_types: coating::default_lens_type_rules(),
            pricing: PricingRules::default(),
            special_order: SpecialOrderPolicy::default(),
        }
    }
}

impl RuleTables {
    /// Parse and validate a rule-table document
    ///
    /// Sections missing from the document keep their built-in defaults.
    pub fn from_json(text: &str, source_id: &str) -> OptikResult<Self> {
        let tables: RuleTables = serde_json::from_str(text)
            .map_err(|e| OptikError::config_parse(&e, source_id, text))?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn to_json_pretty(&self) -> OptikResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| OptikError::Engine(format!("Failed to serialize rule tables: {}", e)))
    }

    /// Check the tables for gaps and nonsensical values
    ///
    /// Coverage gaps in the banded tables are configuration defects: once
    /// tables pass this check every diopter value resolves to a rule.
    pub fn validate(&self) -> OptikResult<()> {
        let mut errors = Vec::new();

        if !self.cylinder_weight.is_finite() || self.cylinder_weight < 0.0 {
            errors.push(defect(format!(
                "cylinder_weight must be a non-negative number, got {}",
                self.cylinder_weight
            )));
        }

        check_bands(
            "index_rules",
            self.index_rules.iter().map(|r| r.max_diopter),
            &mut errors,
        );
        check_bands(
            "candidate_bands",
            self.candidate_bands.iter().map(|b| b.max_power),
            &mut errors,
        );

        for (i, band) in self.candidate_bands.iter().enumerate() {
            if band.indices.is_empty() {
                errors.push(defect(format!("candidate_bands[{}] lists no indices", i)));
            }
            for index in &band.indices {
                if self.pricing.base_price_for(*index).is_none() {
                    errors.push(defect(format!(
                        "candidate_bands[{}] offers {} but pricing.base_prices has no entry for it",
                        i, index
                    )));
                }
            }
        }

        let offsets = &self.priority_offsets;
        if ![offsets.thin, offsets.cheap, offsets.balanced]
            .iter()
            .all(|o| o.is_finite())
        {
            errors.push(defect("priority_offsets must be finite numbers".to_string()));
        }

        for rule in &self.coating_rules {
            if rule.scenario.trim().is_empty() {
                errors.push(defect("coating_rules contains an empty scenario".to_string()));
            }
        }

        for rule in &self.lens_types {
            check_price(
                &format!("lens_types[{}].surcharge", rule.lens_type),
                rule.surcharge,
                &mut errors,
            );
        }
        let mut seen: Vec<LensType> = Vec::new();
        for rule in &self.lens_types {
            if seen.contains(&rule.lens_type) {
                errors.push(defect(format!(
                    "lens_types lists {} more than once",
                    rule.lens_type
                )));
            }
            seen.push(rule.lens_type);
        }

        self.pricing.validate(&mut errors);

        let special = &self.special_order;
        if !special.threshold.is_finite() || special.threshold <= 0.0 {
            errors.push(defect(format!(
                "special_order.threshold must be positive, got {}",
                special.threshold
            )));
        }
        if special.min_days > special.max_days {
            errors.push(defect(format!(
                "special_order.min_days ({}) exceeds max_days ({})",
                special.min_days, special.max_days
            )));
        }

        match OptikError::collect(errors) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Surcharge charged for a single coating, zero when unpriced
    pub fn coating_price(&self, coating: Coating) -> Decimal {
        self.pricing.coating_price(coating)
    }

    /// Short list of indices offered for a total power
    pub fn candidate_indices(&self, total_power: f64) -> OptikResult<&[LensIndex]> {
        let power = total_power.abs();
        self.candidate_bands
            .iter()
            .find(|band| band.max_power.map_or(true, |max| power <= max))
            .map(|band| band.indices.as_slice())
            .ok_or_else(|| {
                OptikError::Config(format!(
                    "no candidate band covers total power {}",
                    total_power
                ))
            })
    }
}

fn defect(message: String) -> OptikError {
    OptikError::Config(message)
}

/// Upper bounds must increase strictly and only the final entry may be open
fn check_bands(
    table: &str,
    bounds: impl Iterator<Item = Option<f64>>,
    errors: &mut Vec<OptikError>,
) {
    let bounds: Vec<Option<f64>> = bounds.collect();
    if bounds.is_empty() {
        errors.push(defect(format!("{} is empty", table)));
        return;
    }

    let last = bounds.len() - 1;
    let mut previous: Option<f64> = None;
    for (i, bound) in bounds.iter().enumerate() {
        match bound {
            None if i != last => errors.push(defect(format!(
                "{}[{}] is a catch-all but is not the last entry",
                table, i
            ))),
            None => {}
            Some(max) if i == last => errors.push(defect(format!(
                "{} must end with a catch-all entry; the last entry stops at {}",
                table, max
            ))),
            Some(max) if !max.is_finite() => {
                errors.push(defect(format!("{}[{}] has a non-finite bound", table, i)))
            }
            Some(max) => {
                if let Some(prev) = previous {
                    if *max <= prev {
                        errors.push(defect(format!(
                            "{}[{}] bound {} does not increase over {}",
                            table, i, max, prev
                        )));
                    }
                }
                previous = Some(*max);
            }
        }
    }
}

pub(crate) fn check_price(name: &str, price: Decimal, errors: &mut Vec<OptikError>) {
    if price.is_sign_negative() && !price.is_zero() {
        errors.push(defect(format!("{} must not be negative, got {}", name, price)));
    }
}
