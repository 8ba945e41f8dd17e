use super::RuleTables;
use crate::catalog::{Coating, LensType};
use crate::{OptikError, OptikResult};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Tokens and terms shorter than this never match on their own
const MIN_MATCH_CHARS: usize = 3;

/// Usage scenario keyword and the coatings it calls for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoatingRule {
    /// Scenario key, hyphen-separated words (e.g. `gece-surus`)
    pub scenario: String,
    /// Extra words that select the scenario
    #[serde(default)]
    pub keywords: Vec<String>,
    pub coatings: Vec<Coating>,
}

impl CoatingRule {
    fn matches(&self, token: &str) -> bool {
        let key = fold(&self.scenario);
        if token.chars().count() >= MIN_MATCH_CHARS && key.contains(token) {
            return true;
        }

        key.split('-')
            .map(str::to_string)
            .chain(self.keywords.iter().map(|k| fold(k)))
            .filter(|term| term.chars().count() >= MIN_MATCH_CHARS)
            .any(|term| token.starts_with(&term))
    }
}

/// Coatings bundled with a lens design, and the design's surcharge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensTypeRule {
    pub lens_type: LensType,
    pub coatings: Vec<Coating>,
    pub surcharge: Decimal,
}

impl RuleTables {
    /// Coatings suggested by a free-text usage description
    ///
    /// Matched scenarios are unioned in rule order without duplicates.
    /// Multi-zone designs always end up with anti-reflective.
    pub fn recommend_coatings(
        &self,
        usage: &str,
        lens_type: LensType,
    ) -> OptikResult<Vec<Coating>> {
        let tokens = tokenize(usage)?;
        let mut coatings: Vec<Coating> = Vec::new();

        for rule in &self.coating_rules {
            if tokens.iter().any(|token| rule.matches(token)) {
                for coating in &rule.coatings {
                    if !coatings.contains(coating) {
                        coatings.push(*coating);
                    }
                }
            }
        }

        if lens_type.is_multi_zone() && !coatings.contains(&Coating::AntiReflective) {
            coatings.push(Coating::AntiReflective);
        }

        Ok(coatings)
    }

    pub fn lens_type_rule(&self, lens_type: LensType) -> Option<&LensTypeRule> {
        self.lens_types.iter().find(|r| r.lens_type == lens_type)
    }
}

/// Lowercase and fold Turkish letters to their ASCII base
pub fn fold(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| *c != '\u{307}')
        .map(|c| match c {
            'ç' => 'c',
            'ğ' => 'g',
            'ı' => 'i',
            'ö' => 'o',
            'ş' => 's',
            'ü' => 'u',
            'â' => 'a',
            'î' => 'i',
            'û' => 'u',
            other => other,
        })
        .collect()
}

/// Split folded text on anything that is not a letter or a digit
pub fn tokenize(text: &str) -> OptikResult<Vec<String>> {
    let separator = token_separator()?;
    Ok(separator
        .split(&fold(text))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect())
}

fn token_separator() -> OptikResult<&'static Regex> {
    static SEPARATOR: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    SEPARATOR
        .get_or_init(|| Regex::new(r"[^\p{L}\p{N}]+"))
        .as_ref()
        .map_err(|e| OptikError::Engine(format!("Invalid token pattern: {}", e)))
}

pub(super) fn default_coating_rules() -> Vec<CoatingRule> {
    fn rule(scenario: &str, keywords: &[&str], coatings: &[Coating]) -> CoatingRule {
        CoatingRule {
            scenario: scenario.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            coatings: coatings.to_vec(),
        }
    }

    use Coating::*;
    vec![
        rule(
            "ekran-agir",
            &["bilgisayar", "telefon", "dijital", "tablet", "oyun"],
            &[BlueCut],
        ),
        rule(
            "gece-surus",
            &["araba", "arac", "trafik", "direksiyon", "sofor"],
            &[AntiReflective, Drive],
        ),
        rule(
            "dis-mekan",
            &["gunes", "spor", "yuruyus", "kamp", "bisiklet"],
            &[Photochromic],
        ),
        rule("ofis", &["masa", "buro", "toplanti"], &[AntiReflective, Hydrophobic]),
        rule(
            "endustriyel",
            &["fabrika", "atolye", "insaat", "santiye"],
            &[ScratchResistant, AntiFog],
        ),
        rule(
            "saglik",
            &["hastane", "doktor", "hemsire", "klinik", "maske"],
            &[AntiFog, AntiReflective],
        ),
    ]
}

pub(super) fn default_lens_type_rules() -> Vec<LensTypeRule> {
    fn rule(lens_type: LensType, coatings: &[Coating], surcharge: i64) -> LensTypeRule {
        LensTypeRule {
            lens_type,
            coatings: coatings.to_vec(),
            surcharge: Decimal::from(surcharge),
        }
    }

    vec![
        rule(LensType::SingleVision, &[], 0),
        rule(LensType::Bifocal, &[Coating::AntiReflective], 400),
        rule(LensType::Progressive, &[Coating::AntiReflective], 600),
        rule(LensType::Multifocal, &[Coating::AntiReflective], 600),
        rule(LensType::Photochromic, &[Coating::Photochromic], 1200),
        rule(LensType::BlueCut, &[Coating::BlueCut], 600),
        rule(LensType::AntiReflex, &[Coating::AntiReflective], 800),
    ]
}
