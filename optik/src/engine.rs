use crate::catalog::{Category, LensType, PriorityPreset};
use crate::physics::{
    round_to, ThicknessEstimator, ThicknessOutcome, ThicknessResult, ThicknessRisk,
    DEFAULT_MIN_THICKNESS,
};
use crate::request::{PriorityWeights, QuoteRequest};
use crate::rules::{IndexSuggestion, RuleTables};
use crate::{
    Coating, FormData, InputLimits, OptikResult, Quote, Recommendation, SpecialOrderQuote,
    Validator,
};
use rust_decimal::Decimal;
use tracing::debug;

/// Number of ranked recommendations returned per quote
pub const MAX_RECOMMENDATIONS: usize = 3;

/// The Optik calculation engine.
///
/// Holds the injected rule tables and input limits. Every operation is a pure
/// function of its arguments and this configuration.
#[derive(Debug, Clone)]
pub struct Engine {
    tables: RuleTables,
    estimator: ThicknessEstimator,
    validator: Validator,
    limits: InputLimits,
}

impl Default for Engine {
    fn default() -> Self {
        let tables = RuleTables::default();
        let limits = InputLimits::default();
        Self {
            estimator: ThicknessEstimator::new(limits.clone(), tables.special_order.clone()),
            tables,
            validator: Validator,
            limits,
        }
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine over custom rule tables
    pub fn with_tables(tables: RuleTables) -> OptikResult<Self> {
        let mut engine = Self::default();
        engine.set_tables(tables)?;
        Ok(engine)
    }

    /// Create an engine with custom input limits
    pub fn with_limits(limits: InputLimits) -> Self {
        let tables = RuleTables::default();
        Self {
            estimator: ThicknessEstimator::new(limits.clone(), tables.special_order.clone()),
            tables,
            validator: Validator,
            limits,
        }
    }

    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    pub fn limits(&self) -> &InputLimits {
        &self.limits
    }

    /// Replace the rule tables; rejected tables leave the engine unchanged
    pub fn set_tables(&mut self, tables: RuleTables) -> OptikResult<()> {
        tables.validate()?;
        self.estimator = ThicknessEstimator::new(self.limits.clone(), tables.special_order.clone());
        self.tables = tables;
        Ok(())
    }

    /// Center/edge thickness for a lens; `min_thickness` defaults to 1.0 mm
    pub fn estimate_thickness(
        &self,
        power: f64,
        index: f64,
        diameter: f64,
        min_thickness: Option<f64>,
    ) -> OptikResult<ThicknessResult> {
        self.estimator.estimate(
            power,
            index,
            diameter,
            min_thickness.unwrap_or(DEFAULT_MIN_THICKNESS),
        )
    }

    pub fn estimate_improvement_percent(
        &self,
        power: f64,
        new_index: f64,
        diameter: f64,
    ) -> OptikResult<f64> {
        self.estimator.improvement_percent(power, new_index, diameter)
    }

    pub fn assess_thickness(
        &self,
        power: f64,
        index: f64,
        diameter: f64,
    ) -> OptikResult<ThicknessOutcome> {
        self.estimator.assess(power, index, diameter)
    }

    pub fn recommend_index(
        &self,
        total_diopter: f64,
        preset: PriorityPreset,
    ) -> OptikResult<IndexSuggestion> {
        self.tables.recommend_index(total_diopter, preset)
    }

    pub fn recommend_coatings(
        &self,
        usage: &str,
        lens_type: LensType,
    ) -> OptikResult<Vec<Coating>> {
        self.tables.recommend_coatings(usage, lens_type)
    }

    pub fn validate(&self, form: &FormData) -> OptikResult<QuoteRequest> {
        self.validator.validate(form, &self.limits)
    }

    /// Ranked recommendations only, best first, at most three
    pub fn generate_recommendations(&self, form: &FormData) -> OptikResult<Vec<Recommendation>> {
        Ok(self.quote(form)?.recommendations)
    }

    /// Validate raw input and compute the full quote
    pub fn quote(&self, form: &FormData) -> OptikResult<Quote> {
        let request = self.validate(form)?;
        self.quote_request(&request)
    }

    /// Compute a quote for an already validated request
    pub fn quote_request(&self, request: &QuoteRequest) -> OptikResult<Quote> {
        let weight = self.tables.cylinder_weight;
        let total_power = request.prescription.total_power(weight);
        let signed_power = request.prescription.signed_power(weight);
        let diameter = request.frame.diameter();
        let pricing = &self.tables.pricing;

        let suggested_index = self
            .tables
            .recommend_index(total_power, request.priority.preset())?;
        let usage_coatings = self
            .tables
            .recommend_coatings(&request.usage, request.lens_type)?;

        let (mut coatings, mut coating_price) =
            match self.tables.lens_type_rule(request.lens_type) {
                Some(rule) => (rule.coatings.clone(), rule.surcharge),
                None => (Vec::new(), Decimal::ZERO),
            };
        for coating in &usage_coatings {
            if !coatings.contains(coating) {
                coatings.push(*coating);
                coating_price += self.tables.coating_price(*coating);
            }
        }

        let category = category_for(&request.priority);
        let candidates = self.tables.candidate_indices(total_power)?;
        debug!(
            total_power,
            signed_power,
            diameter,
            candidates = ?candidates,
            "Generating recommendations"
        );

        let mut recommendations = Vec::new();
        let mut special_orders = Vec::new();

        for &index in candidates {
            let base_price = pricing.base_price(index, total_power)?;
            let total_price =
                pricing.total_price(base_price, coating_price, request.subsidy_eligible);

            match self.estimator.assess(signed_power, index.value(), diameter)? {
                ThicknessOutcome::Estimated(estimate) => {
                    let thickness = round_to(estimate.critical(), 2);
                    recommendations.push(Recommendation {
                        index: index.value(),
                        lens_index: index.key().to_string(),
                        thickness,
                        base_price,
                        coating_price,
                        total_price,
                        coatings: coatings.clone(),
                        category,
                        rating: rating_for(category, thickness),
                        improvement: self.estimator.improvement_percent(
                            signed_power,
                            index.value(),
                            diameter,
                        )?,
                        risk: ThicknessRisk::classify(thickness),
                    });
                }
                ThicknessOutcome::SpecialOrder(special_order) => {
                    debug!(index = %index, power = signed_power, "Routing to special order");
                    special_orders.push(SpecialOrderQuote {
                        index: index.value(),
                        lens_index: index.key().to_string(),
                        base_price,
                        coating_price,
                        total_price,
                        coatings: coatings.clone(),
                        category,
                        special_order,
                    });
                }
            }
        }

        if request.priority.ranks_by_price() {
            recommendations.sort_by(|a, b| a.total_price.cmp(&b.total_price));
        } else {
            recommendations.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        }
        recommendations.truncate(MAX_RECOMMENDATIONS);

        Ok(Quote {
            total_power,
            suggested_index,
            usage_coatings,
            recommendations,
            special_orders,
        })
    }
}

/// Price-leaning sliders give economy, quality-leaning give premium
fn category_for(priority: &PriorityWeights) -> Category {
    if priority.price > 50.0 && priority.quality < 50.0 {
        Category::Economy
    } else if priority.quality > 50.0 && priority.price < 50.0 {
        Category::Premium
    } else {
        Category::Standard
    }
}

fn rating_for(category: Category, thickness: f64) -> f64 {
    let mut rating = 4.0;

    match category {
        Category::Premium => rating += 1.0,
        Category::Economy => rating -= 0.5,
        Category::Standard => {}
    }

    if thickness <= 3.0 {
        rating += 0.5;
    } else if thickness > 7.0 {
        rating -= 0.5;
    }

    f64::clamp(rating, 1.0, 5.0)
}
