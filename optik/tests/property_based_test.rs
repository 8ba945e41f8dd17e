use optik::{
    estimate_improvement_percent, estimate_thickness, Engine, EyeForm, FormData, FrameForm,
    FrameSize, LensType, PrescriptionForm, PriorityForm, PriorityPreset, RuleTables,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Quarter-diopter steps, the way prescriptions are written
fn quarter_steps(max_quarters: i32) -> impl Strategy<Value = f64> {
    (-max_quarters..=max_quarters).prop_map(|q| q as f64 * 0.25)
}

fn eye() -> impl Strategy<Value = EyeForm> {
    (quarter_steps(80), quarter_steps(24), 0u32..=180).prop_map(|(sph, cyl, axis)| EyeForm {
        sph,
        cyl,
        axis: axis as f64,
    })
}

fn form() -> impl Strategy<Value = FormData> {
    (
        eye(),
        eye(),
        prop::sample::select(FrameSize::ALL.to_vec()),
        prop::sample::select(LensType::ALL.to_vec()),
        (0u32..=100, 0u32..=100, 0u32..=100),
        prop::sample::select(vec!["", "ofis", "gece araba", "dış mekan", "hastane"]),
        any::<bool>(),
    )
        .prop_map(
            |(right_eye, left_eye, size, lens_type, (thickness, price, quality), usage, subsidy)| {
                FormData {
                    prescription: PrescriptionForm {
                        right_eye,
                        left_eye,
                    },
                    frame: FrameForm {
                        size: size.to_string(),
                        width: None,
                        height: None,
                        bridge: None,
                    },
                    lens_type: lens_type.to_string(),
                    priority: PriorityForm {
                        thickness: thickness as f64,
                        price: price as f64,
                        quality: quality as f64,
                    },
                    usage: usage.to_string(),
                    subsidy_eligible: subsidy,
                }
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 100,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_zero_power_is_minimum_thickness(
        index in 1.01f64..2.0,
        diameter in 1.0f64..90.0,
        min in 0.1f64..3.0,
    ) {
        let result = estimate_thickness(0.0, index, diameter, min).unwrap();
        prop_assert_eq!(result.center, min);
        prop_assert_eq!(result.edge, min);
    }

    #[test]
    fn prop_minus_edge_grows_with_power(
        power in 0.25f64..20.0,
        step in 0.25f64..5.0,
        index in 1.5f64..1.8,
        diameter in 20.0f64..90.0,
    ) {
        let weaker = estimate_thickness(-power, index, diameter, 1.0).unwrap();
        let stronger = estimate_thickness(-(power + step), index, diameter, 1.0).unwrap();
        prop_assert!(stronger.edge > weaker.edge);
        prop_assert_eq!(stronger.center, weaker.center);
    }

    #[test]
    fn prop_higher_index_is_never_thicker(
        power in -20.0f64..20.0,
        low in 1.5f64..1.7,
        raise in 0.0f64..0.2,
        diameter in 20.0f64..90.0,
    ) {
        let standard = estimate_thickness(power, low, diameter, 1.0).unwrap();
        let thinner = estimate_thickness(power, low + raise, diameter, 1.0).unwrap();
        prop_assert!(thinner.center <= standard.center);
        prop_assert!(thinner.edge <= standard.edge);
    }

    #[test]
    fn prop_no_improvement_over_standard(
        power in -20.0f64..20.0,
        diameter in 20.0f64..90.0,
    ) {
        prop_assert_eq!(estimate_improvement_percent(power, 1.50, diameter).unwrap(), 0.0);
    }

    #[test]
    fn prop_improvement_is_a_percentage(
        power in -20.0f64..20.0,
        index in 1.01f64..2.0,
        diameter in 20.0f64..90.0,
    ) {
        let improvement = estimate_improvement_percent(power, index, diameter).unwrap();
        prop_assert!((0.0..100.0).contains(&improvement));
    }

    #[test]
    fn prop_index_recommendation_is_monotonic(
        diopter in 0.0f64..20.0,
        step in 0.0f64..5.0,
    ) {
        let tables = RuleTables::default();
        for preset in [PriorityPreset::Thin, PriorityPreset::Cheap, PriorityPreset::Balanced] {
            let lower = tables.recommend_index(diopter, preset).unwrap();
            let higher = tables.recommend_index(diopter + step, preset).unwrap();
            prop_assert!(higher.index >= lower.index);
        }
    }

    #[test]
    fn prop_recommendations_are_bounded_and_sorted(form in form()) {
        let engine = Engine::new();
        let quote = engine.quote(&form).unwrap();

        prop_assert!(quote.recommendations.len() <= 3);
        prop_assert!(quote.recommendations.len() + quote.special_orders.len() >= 2);
        for recommendation in &quote.recommendations {
            prop_assert!(recommendation.total_price >= Decimal::ZERO);
            prop_assert!((1.0..=5.0).contains(&recommendation.rating));
            prop_assert!(recommendation.thickness >= 1.0);
        }

        let by_price = form.priority.price > form.priority.quality;
        for pair in quote.recommendations.windows(2) {
            if by_price {
                prop_assert!(pair[0].total_price <= pair[1].total_price);
            } else {
                prop_assert!(pair[0].rating >= pair[1].rating);
            }
        }
    }

    #[test]
    fn prop_quotes_are_deterministic(form in form()) {
        let engine = Engine::new();
        prop_assert_eq!(engine.quote(&form).unwrap(), engine.quote(&form).unwrap());
    }

    #[test]
    fn prop_multi_zone_always_gets_anti_reflective(
        usage in "[a-zçğıöşü ]{0,40}",
    ) {
        let tables = RuleTables::default();
        for lens_type in [LensType::Progressive, LensType::Bifocal, LensType::Multifocal] {
            let coatings = tables.recommend_coatings(&usage, lens_type).unwrap();
            prop_assert!(coatings.contains(&optik::Coating::AntiReflective));
        }
    }
}
