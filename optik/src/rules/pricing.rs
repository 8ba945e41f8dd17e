use super::check_price;
use crate::catalog::{Coating, LensIndex};
use crate::{OptikError, OptikResult};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexPrice {
    pub index: LensIndex,
    pub price: Decimal,
}

/// Fixed price for an index inside a power range, replacing the scaled base price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub index: LensIndex,
    pub min: f64,
    pub max: f64,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoatingPrice {
    pub coating: Coating,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingRules {
    pub base_prices: Vec<IndexPrice>,
    /// Relative markup per diopter of total power
    pub power_markup: Decimal,
    pub price_bands: Vec<PriceBand>,
    pub coating_prices: Vec<CoatingPrice>,
    pub labor_cost: Decimal,
    pub vat_rate: Decimal,
    /// Deducted from the taxed total for eligible customers
    pub subsidy: Decimal,
}

impl Default for PricingRules {
    fn default() -> Self {
        let base = |index, price: i64| IndexPrice {
            index,
            price: Decimal::from(price),
        };
        let coating = |coating, price: i64| CoatingPrice {
            coating,
            price: Decimal::from(price),
        };

        Self {
            base_prices: vec![
                base(LensIndex::N150, 1200),
                base(LensIndex::N156, 1800),
                base(LensIndex::N160, 2400),
                base(LensIndex::N167, 3200),
                base(LensIndex::N174, 4800),
            ],
            power_markup: Decimal::new(1, 1),
            price_bands: Vec::new(),
            coating_prices: vec![
                coating(Coating::BlueCut, 600),
                coating(Coating::AntiReflective, 800),
                coating(Coating::Photochromic, 1200),
                coating(Coating::Drive, 900),
                coating(Coating::Hydrophobic, 700),
                coating(Coating::AntiFog, 500),
                coating(Coating::ScratchResistant, 400),
            ],
            labor_cost: Decimal::from(600),
            vat_rate: Decimal::new(20, 2),
            subsidy: Decimal::from(150),
        }
    }
}

impl PricingRules {
    pub fn base_price_for(&self, index: LensIndex) -> Option<Decimal> {
        self.base_prices
            .iter()
            .find(|p| p.index == index)
            .map(|p| p.price)
    }

    pub fn coating_price(&self, coating: Coating) -> Decimal {
        self.coating_prices
            .iter()
            .find(|p| p.coating == coating)
            .map(|p| p.price)
            .unwrap_or(Decimal::ZERO)
    }

    /// Lens price before coatings and labor
    ///
    /// A configured price band wins; otherwise the index base price is
    /// scaled by `1 + total_power × power_markup` and rounded to whole units.
    pub fn base_price(&self, index: LensIndex, total_power: f64) -> OptikResult<Decimal> {
        let power = total_power.abs();
        if let Some(band) = self
            .price_bands
            .iter()
            .find(|b| b.index == index && b.min <= power && power <= b.max)
        {
            return Ok(band.price);
        }

        let base = self.base_price_for(index).ok_or_else(|| {
            OptikError::Config(format!("no base price configured for index {}", index))
        })?;
        let power = to_decimal(power)?;
        Ok(round_whole(base * (Decimal::ONE + power * self.power_markup)))
    }

    /// Taxed total, with the subsidy deducted when eligible, never below zero
    pub fn total_price(
        &self,
        base_price: Decimal,
        coating_price: Decimal,
        subsidy_eligible: bool,
    ) -> Decimal {
        let subtotal = base_price + coating_price + self.labor_cost;
        let taxed = subtotal * (Decimal::ONE + self.vat_rate);
        let subsidy = if subsidy_eligible {
            self.subsidy
        } else {
            Decimal::ZERO
        };
        round_whole(taxed - subsidy).max(Decimal::ZERO)
    }

    pub(super) fn validate(&self, errors: &mut Vec<OptikError>) {
        for entry in &self.base_prices {
            check_price(
                &format!("pricing.base_prices[{}]", entry.index),
                entry.price,
                errors,
            );
        }
        for entry in &self.coating_prices {
            check_price(
                &format!("pricing.coating_prices[{}]", entry.coating),
                entry.price,
                errors,
            );
        }
        for (i, band) in self.price_bands.iter().enumerate() {
            check_price(&format!("pricing.price_bands[{}].price", i), band.price, errors);
            if !band.min.is_finite() || !band.max.is_finite() || band.min > band.max {
                errors.push(OptikError::Config(format!(
                    "pricing.price_bands[{}] has an invalid range {}..{}",
                    i, band.min, band.max
                )));
            }
        }
        check_price("pricing.power_markup", self.power_markup, errors);
        check_price("pricing.labor_cost", self.labor_cost, errors);
        check_price("pricing.vat_rate", self.vat_rate, errors);
        check_price("pricing.subsidy", self.subsidy, errors);
    }
}

/// Half-up rounding to whole currency units
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn to_decimal(value: f64) -> OptikResult<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(4))
        .ok_or_else(|| OptikError::Engine(format!("{} is not representable as a decimal", value)))
}
