use crate::catalog::{Category, Coating};
use crate::physics::{SpecialOrder, ThicknessRisk};
use crate::rules::IndexSuggestion;
use rust_decimal::Decimal;
use serde::Serialize;

/// A priced, ranked lens package
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub index: f64,
    pub lens_index: String,
    /// Critical (thickest) dimension, mm, two decimals
    pub thickness: f64,
    pub base_price: Decimal,
    pub coating_price: Decimal,
    pub total_price: Decimal,
    pub coatings: Vec<Coating>,
    pub category: Category,
    pub rating: f64,
    /// Thickness reduction versus a 1.50 lens, percent
    pub improvement: f64,
    pub risk: ThicknessRisk,
}

/// A priced package that must be manufactured on demand
///
/// Carries a turnaround instead of a thickness and is never ranked.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialOrderQuote {
    pub index: f64,
    pub lens_index: String,
    pub base_price: Decimal,
    pub coating_price: Decimal,
    pub total_price: Decimal,
    pub coatings: Vec<Coating>,
    pub category: Category,
    pub special_order: SpecialOrder,
}

/// Everything computed for one calculator session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub total_power: f64,
    pub suggested_index: IndexSuggestion,
    /// Coatings suggested for the usage description and lens design
    pub usage_coatings: Vec<Coating>,
    /// Best first, at most three
    pub recommendations: Vec<Recommendation>,
    pub special_orders: Vec<SpecialOrderQuote>,
}

impl Quote {
    pub fn requires_special_order(&self) -> bool {
        !self.special_orders.is_empty()
    }
}
