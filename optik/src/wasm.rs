use crate::{Engine, FormData, LensType, OptikError, PriorityPreset, RuleTables};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmEngine {
    engine: Engine,
}

#[wasm_bindgen]
impl WasmEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();

        WasmEngine {
            engine: Engine::new(),
        }
    }

    /// Replace the rule tables with an admin-edited JSON document
    #[wasm_bindgen(js_name = setRules)]
    pub fn set_rules(&mut self, rules_json: &str) -> String {
        let result = RuleTables::from_json(rules_json, "rules.json")
            .and_then(|tables| self.engine.set_tables(tables));
        envelope(result.map(|_| "Rules updated"))
    }

    #[wasm_bindgen(js_name = getRules)]
    pub fn get_rules(&self) -> String {
        envelope(Ok(self.engine.tables()))
    }

    #[wasm_bindgen(js_name = estimateThickness)]
    pub fn estimate_thickness(
        &self,
        power: f64,
        index: f64,
        diameter: f64,
        min_thickness: Option<f64>,
    ) -> String {
        envelope(
            self.engine
                .estimate_thickness(power, index, diameter, min_thickness),
        )
    }

    #[wasm_bindgen(js_name = estimateImprovementPercent)]
    pub fn estimate_improvement_percent(
        &self,
        power: f64,
        new_index: f64,
        diameter: f64,
    ) -> String {
        envelope(
            self.engine
                .estimate_improvement_percent(power, new_index, diameter),
        )
    }

    #[wasm_bindgen(js_name = recommendIndex)]
    pub fn recommend_index(&self, total_diopter: f64, priority: &str) -> String {
        let result = priority
            .parse::<PriorityPreset>()
            .and_then(|preset| self.engine.recommend_index(total_diopter, preset));
        envelope(result)
    }

    #[wasm_bindgen(js_name = recommendCoatings)]
    pub fn recommend_coatings(&self, usage: &str, lens_type: &str) -> String {
        let result = lens_type
            .parse::<LensType>()
            .and_then(|lens_type| self.engine.recommend_coatings(usage, lens_type));
        envelope(result)
    }

    #[wasm_bindgen(js_name = generateRecommendations)]
    pub fn generate_recommendations(&self, form_json: &str) -> String {
        let result = FormData::from_json(form_json)
            .and_then(|form| self.engine.generate_recommendations(&form));
        envelope(result)
    }

    #[wasm_bindgen(js_name = quote)]
    pub fn quote(&self, form_json: &str) -> String {
        let result =
            FormData::from_json(form_json).and_then(|form| self.engine.quote(&form));
        envelope(result)
    }
}

impl Default for WasmEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// `{ success, data, error }` with exactly one of data/error set
fn envelope<T: Serialize>(result: Result<T, OptikError>) -> String {
    let value = match result {
        Ok(data) => match serde_json::to_value(&data) {
            Ok(data) => serde_json::json!({ "success": true, "data": data, "error": null }),
            Err(e) => serde_json::json!({
                "success": false,
                "data": null,
                "error": format!("Failed to serialize response: {}", e)
            }),
        },
        Err(e) => serde_json::json!({ "success": false, "data": null, "error": e.to_string() }),
    };
    value.to_string()
}
