use super::RuleTables;
use crate::catalog::{LensIndex, PriorityPreset};
use crate::{OptikError, OptikResult};
use serde::{Deserialize, Serialize};

/// `diopter <= max_diopter → index`; `None` is the catch-all
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRule {
    pub max_diopter: Option<f64>,
    pub index: LensIndex,
    pub reason: String,
}

/// Diopter shift applied per priority preset before the rules are evaluated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityOffsets {
    pub thin: f64,
    pub cheap: f64,
    pub balanced: f64,
}

impl Default for PriorityOffsets {
    fn default() -> Self {
        Self {
            thin: 1.0,
            cheap: -1.0,
            balanced: 0.0,
        }
    }
}

impl PriorityOffsets {
    pub fn offset(&self, preset: PriorityPreset) -> f64 {
        match preset {
            PriorityPreset::Thin => self.thin,
            PriorityPreset::Cheap => self.cheap,
            PriorityPreset::Balanced => self.balanced,
        }
    }
}

/// Candidate short list for `total_power <= max_power`; `None` is the catch-all
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateBand {
    pub max_power: Option<f64>,
    pub indices: Vec<LensIndex>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSuggestion {
    pub index: LensIndex,
    pub reason: String,
    /// Diopter value the rules were evaluated at, after the priority offset
    pub evaluated_diopter: f64,
}

impl RuleTables {
    /// Recommend a lens index for a total diopter value
    ///
    /// The magnitude of `total_diopter` is shifted by the preset's offset
    /// and the first matching rule wins.
    pub fn recommend_index(
        &self,
        total_diopter: f64,
        preset: PriorityPreset,
    ) -> OptikResult<IndexSuggestion> {
        if !total_diopter.is_finite() {
            return Err(OptikError::invalid(
                "totalDiopter",
                "must be a finite number",
            ));
        }

        let evaluated = total_diopter.abs() + self.priority_offsets.offset(preset);
        let rule = self
            .index_rules
            .iter()
            .find(|rule| rule.max_diopter.map_or(true, |max| evaluated <= max))
            .ok_or_else(|| {
                OptikError::Config(format!("no index rule covers {} D", evaluated))
            })?;

        Ok(IndexSuggestion {
            index: rule.index,
            reason: rule.reason.clone(),
            evaluated_diopter: evaluated,
        })
    }
}

pub(super) fn default_index_rules() -> Vec<IndexRule> {
    vec![
        IndexRule {
            max_diopter: Some(1.0),
            index: LensIndex::N150,
            reason: "Standard material is enough for a low power".to_string(),
        },
        IndexRule {
            max_diopter: Some(2.5),
            index: LensIndex::N156,
            reason: "Slight thinning at a balanced price".to_string(),
        },
        IndexRule {
            max_diopter: Some(4.5),
            index: LensIndex::N160,
            reason: "Good balance for a medium power".to_string(),
        },
        IndexRule {
            max_diopter: Some(6.0),
            index: LensIndex::N167,
            reason: "Ultra thin for a high power".to_string(),
        },
        IndexRule {
            max_diopter: None,
            index: LensIndex::N174,
            reason: "Thinnest material for a very high power".to_string(),
        },
    ]
}

pub(super) fn default_candidate_bands() -> Vec<CandidateBand> {
    use LensIndex::*;
    vec![
        CandidateBand {
            max_power: Some(1.0),
            indices: vec![N150, N156],
        },
        CandidateBand {
            max_power: Some(2.5),
            indices: vec![N156, N160, N150],
        },
        CandidateBand {
            max_power: Some(4.0),
            indices: vec![N160, N167, N156],
        },
        CandidateBand {
            max_power: Some(6.0),
            indices: vec![N167, N174, N160],
        },
        CandidateBand {
            max_power: None,
            indices: vec![N174, N167],
        },
    ]
}
