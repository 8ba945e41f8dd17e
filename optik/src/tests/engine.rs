use super::{close, sample_form};
use crate::request::{EyePrescription, Prescription, PriorityWeights};
use crate::{
    Category, Coating, Engine, LensIndex, LensType, OptikError, PriorityPreset, RuleTables,
    ThicknessRisk,
};
use rust_decimal::Decimal;

fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

#[test]
fn test_quote_for_sample_prescription() {
    let engine = Engine::new();
    let quote = engine.quote(&sample_form()).unwrap();

    assert!(close(quote.total_power, 4.2));
    assert_eq!(quote.suggested_index.index, LensIndex::N160);
    assert!(quote.usage_coatings.is_empty());
    assert!(!quote.requires_special_order());

    let indices: Vec<&str> = quote
        .recommendations
        .iter()
        .map(|r| r.lens_index.as_str())
        .collect();
    assert_eq!(indices, vec!["1.67", "1.74", "1.60"]);

    let first = &quote.recommendations[0];
    assert_eq!(first.index, 1.67);
    assert_eq!(first.thickness, 3.12);
    assert_eq!(first.base_price, dec(4544));
    assert_eq!(first.coating_price, Decimal::ZERO);
    assert_eq!(first.total_price, dec(6173));
    assert_eq!(first.category, Category::Premium);
    assert_eq!(first.rating, 5.0);
    assert_eq!(first.risk, ThicknessRisk::Medium);
    assert!(first.improvement > 0.0);

    let second = &quote.recommendations[1];
    assert_eq!(second.thickness, 2.92);
    assert_eq!(second.total_price, dec(8899));
    assert_eq!(second.risk, ThicknessRisk::Low);

    assert_eq!(quote.recommendations[2].total_price, dec(4810));
}

#[test]
fn test_price_priority_sorts_cheapest_first() {
    let mut form = sample_form();
    form.priority.thickness = 10.0;
    form.priority.price = 80.0;
    form.priority.quality = 20.0;

    let recommendations = Engine::new().generate_recommendations(&form).unwrap();
    let totals: Vec<Decimal> = recommendations.iter().map(|r| r.total_price).collect();
    assert_eq!(totals, vec![dec(4810), dec(6173), dec(8899)]);
    assert!(recommendations.iter().all(|r| r.category == Category::Economy));
    assert_eq!(recommendations[0].rating, 3.5);
    assert_eq!(recommendations[2].rating, 4.0);
}

#[test]
fn test_equal_sliders_are_standard() {
    let mut form = sample_form();
    form.priority.price = 50.0;
    form.priority.quality = 50.0;

    let quote = Engine::new().quote(&form).unwrap();
    assert!(quote
        .recommendations
        .iter()
        .all(|r| r.category == Category::Standard));
}

#[test]
fn test_usage_coatings_are_priced() {
    let mut form = sample_form();
    form.usage = "ofiste bilgisayar".to_string();

    let quote = Engine::new().quote(&form).unwrap();
    assert_eq!(
        quote.usage_coatings,
        vec![Coating::BlueCut, Coating::AntiReflective, Coating::Hydrophobic]
    );
    for recommendation in &quote.recommendations {
        assert_eq!(recommendation.coatings, quote.usage_coatings);
        assert_eq!(recommendation.coating_price, dec(2100));
    }
}

#[test]
fn test_lens_type_coatings_are_not_charged_twice() {
    let mut form = sample_form();
    form.lens_type = "progressive".to_string();
    form.usage = "gece araba".to_string();

    let quote = Engine::new().quote(&form).unwrap();
    let first = &quote.recommendations[0];
    assert_eq!(first.coatings, vec![Coating::AntiReflective, Coating::Drive]);
    // 600 progressive surcharge + 900 drive
    assert_eq!(first.coating_price, dec(1500));
}

#[test]
fn test_subsidy_lowers_every_total() {
    let engine = Engine::new();
    let mut form = sample_form();
    let full = engine.quote(&form).unwrap();
    form.subsidy_eligible = true;
    let subsidized = engine.quote(&form).unwrap();

    for (a, b) in full.recommendations.iter().zip(&subsidized.recommendations) {
        assert_eq!(a.total_price - b.total_price, dec(150));
    }
}

#[test]
fn test_high_power_goes_to_special_order() {
    let mut form = sample_form();
    form.prescription.right_eye.sph = -7.5;
    form.prescription.left_eye.sph = -7.0;

    let quote = Engine::new().quote(&form).unwrap();
    assert!(quote.recommendations.is_empty());
    assert!(quote.requires_special_order());
    assert_eq!(quote.special_orders.len(), 2);
    assert_eq!(quote.special_orders[0].lens_index, "1.74");
    assert!(quote.special_orders[0].special_order.power < 0.0);
    assert_eq!(quote.special_orders[0].special_order.min_days, 7);
    assert!(quote.special_orders[0].total_price > Decimal::ZERO);
}

#[test]
fn test_invalid_form_is_rejected() {
    let mut form = sample_form();
    form.prescription.right_eye.sph = 40.0;

    match Engine::new().quote(&form) {
        Err(OptikError::InvalidInput { field, .. }) => {
            assert_eq!(field, "prescription.rightEye.sph")
        }
        other => panic!("Expected InvalidInput, got {:?}", other),
    }
}

#[test]
fn test_quotes_are_deterministic() {
    let engine = Engine::new();
    let form = sample_form();
    assert_eq!(engine.quote(&form).unwrap(), engine.quote(&form).unwrap());
}

#[test]
fn test_rejected_tables_leave_engine_unchanged() {
    let mut engine = Engine::new();
    let mut broken = RuleTables::default();
    broken.index_rules.clear();

    assert!(engine.set_tables(broken.clone()).is_err());
    assert_eq!(engine.tables(), &RuleTables::default());
    assert!(Engine::with_tables(broken).is_err());
}

#[test]
fn test_replaced_tables_apply_to_next_quote() {
    let mut engine = Engine::new();
    let before = engine.quote(&sample_form()).unwrap();

    let mut tables = RuleTables::default();
    tables.pricing.labor_cost = dec(1000);
    tables.special_order.threshold = 4.0;
    engine.set_tables(tables).unwrap();

    let after = engine.quote(&sample_form()).unwrap();
    assert!(!before.requires_special_order());
    assert!(after.recommendations.is_empty());
    assert_eq!(after.special_orders.len(), 3);
    assert_eq!(after.special_orders[0].total_price, dec(6653));
}

#[test]
fn test_cylinder_weight_is_configurable() {
    let mut tables = RuleTables::default();
    tables.cylinder_weight = 0.5;
    let engine = Engine::with_tables(tables).unwrap();

    let quote = engine.quote(&sample_form()).unwrap();
    assert!(close(quote.total_power, 4.5));
}

#[test]
fn test_quote_request_for_prebuilt_input() {
    let engine = Engine::new();
    let mut request = engine.validate(&sample_form()).unwrap();
    request.prescription = Prescription {
        right_eye: EyePrescription {
            sph: 0.5,
            cyl: 0.0,
            axis: 0.0,
        },
        left_eye: EyePrescription::default(),
    };
    request.priority = PriorityWeights::default();
    request.lens_type = LensType::SingleVision;

    let quote = engine.quote_request(&request).unwrap();
    assert_eq!(quote.suggested_index.index, LensIndex::N150);
    let indices: Vec<f64> = quote.recommendations.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![1.50, 1.56]);
    assert!(quote.recommendations.iter().all(|r| r.thickness > 1.0));
}

#[test]
fn test_signed_power_follows_dominant_eye() {
    let prescription = Prescription {
        right_eye: EyePrescription {
            sph: 1.0,
            cyl: 0.0,
            axis: 0.0,
        },
        left_eye: EyePrescription {
            sph: -2.0,
            cyl: -1.0,
            axis: 90.0,
        },
    };
    assert!(close(prescription.total_power(0.2), 2.2));
    assert!(close(prescription.signed_power(0.2), -2.2));

    let plano = Prescription {
        right_eye: EyePrescription {
            sph: 0.0,
            cyl: 1.5,
            axis: 10.0,
        },
        left_eye: EyePrescription::default(),
    };
    assert!(close(plano.signed_power(0.2), 0.3));
}

#[test]
fn test_priority_presets_from_sliders() {
    let weights = |thickness, price, quality| PriorityWeights {
        thickness,
        price,
        quality,
    };
    assert_eq!(weights(80.0, 20.0, 50.0).preset(), PriorityPreset::Thin);
    assert_eq!(weights(20.0, 80.0, 50.0).preset(), PriorityPreset::Cheap);
    assert_eq!(weights(50.0, 50.0, 50.0).preset(), PriorityPreset::Balanced);
    assert_eq!(weights(60.0, 60.0, 10.0).preset(), PriorityPreset::Balanced);
}

#[test]
fn test_engine_delegates() {
    let engine = Engine::new();
    let thickness = engine.estimate_thickness(-4.0, 1.5, 65.0, None).unwrap();
    assert!(close(thickness.edge, 5.225));
    assert_eq!(engine.estimate_improvement_percent(-4.0, 1.5, 65.0).unwrap(), 0.0);
    assert_eq!(
        engine
            .recommend_index(0.75, PriorityPreset::Balanced)
            .unwrap()
            .index,
        LensIndex::N150
    );
    assert_eq!(
        engine.recommend_coatings("", LensType::Bifocal).unwrap(),
        vec![Coating::AntiReflective]
    );
}
