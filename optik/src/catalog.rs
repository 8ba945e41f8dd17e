//! Fixed catalogs: lens indices, lens types, coatings, frame sizes and
//! priority presets.
//!
//! Every name accepted on the wire is listed here; parsing is strict and
//! unknown names are reported as `OptikError::InvalidInput`.

use crate::OptikError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Refractive index of a lens material offered by the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LensIndex {
    #[serde(rename = "1.50")]
    N150,
    #[serde(rename = "1.56")]
    N156,
    #[serde(rename = "1.60")]
    N160,
    #[serde(rename = "1.67")]
    N167,
    #[serde(rename = "1.74")]
    N174,
}

impl LensIndex {
    pub const ALL: [LensIndex; 5] = [
        LensIndex::N150,
        LensIndex::N156,
        LensIndex::N160,
        LensIndex::N167,
        LensIndex::N174,
    ];

    /// The standard material every improvement is measured against
    pub const STANDARD: LensIndex = LensIndex::N150;

    pub fn value(self) -> f64 {
        match self {
            LensIndex::N150 => 1.50,
            LensIndex::N156 => 1.56,
            LensIndex::N160 => 1.60,
            LensIndex::N167 => 1.67,
            LensIndex::N174 => 1.74,
        }
    }

    /// Two-decimal key, e.g. `"1.60"`
    pub fn key(self) -> &'static str {
        match self {
            LensIndex::N150 => "1.50",
            LensIndex::N156 => "1.56",
            LensIndex::N160 => "1.60",
            LensIndex::N167 => "1.67",
            LensIndex::N174 => "1.74",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LensIndex::N150 => "1.50 Standard",
            LensIndex::N156 => "1.56 Thin",
            LensIndex::N160 => "1.60 Extra Thin",
            LensIndex::N167 => "1.67 Ultra Thin",
            LensIndex::N174 => "1.74 Thinnest",
        }
    }

    /// Nominal thickness relative to 1.50, as quoted to customers
    pub fn nominal_thinning(self) -> f64 {
        match self {
            LensIndex::N150 => 1.00,
            LensIndex::N156 => 0.85,
            LensIndex::N160 => 0.80,
            LensIndex::N167 => 0.67,
            LensIndex::N174 => 0.50,
        }
    }

    /// Catalog entry for a numeric index, tolerant to formatting (1.5 == 1.50)
    pub fn from_value(value: f64) -> Option<LensIndex> {
        Self::ALL
            .into_iter()
            .find(|index| (index.value() - value).abs() < 0.005)
    }
}

impl fmt::Display for LensIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for LensIndex {
    type Err = OptikError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<f64>()
            .ok()
            .and_then(LensIndex::from_value)
            .ok_or_else(|| {
                OptikError::invalid(
                    "lensIndex",
                    format!(
                        "unknown lens index '{}', expected one of {}",
                        s,
                        names(LensIndex::ALL.iter().map(|i| i.key()))
                    ),
                )
            })
    }
}

/// Surface treatment applied to a lens
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Coating {
    #[serde(rename = "blue-cut")]
    BlueCut,
    #[serde(rename = "anti-refle")]
    AntiReflective,
    #[serde(rename = "photochromic")]
    Photochromic,
    #[serde(rename = "drive")]
    Drive,
    #[serde(rename = "hydrophobic")]
    Hydrophobic,
    #[serde(rename = "anti-fog")]
    AntiFog,
    #[serde(rename = "scratch-resistant")]
    ScratchResistant,
}

impl Coating {
    pub const ALL: [Coating; 7] = [
        Coating::BlueCut,
        Coating::AntiReflective,
        Coating::Photochromic,
        Coating::Drive,
        Coating::Hydrophobic,
        Coating::AntiFog,
        Coating::ScratchResistant,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Coating::BlueCut => "blue-cut",
            Coating::AntiReflective => "anti-refle",
            Coating::Photochromic => "photochromic",
            Coating::Drive => "drive",
            Coating::Hydrophobic => "hydrophobic",
            Coating::AntiFog => "anti-fog",
            Coating::ScratchResistant => "scratch-resistant",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Coating::BlueCut => "Blue Cut (blue light filter)",
            Coating::AntiReflective => "Anti-Reflective",
            Coating::Photochromic => "Photochromic (darkens in sunlight)",
            Coating::Drive => "Drive (night driving)",
            Coating::Hydrophobic => "Hydrophobic (water repellent)",
            Coating::AntiFog => "Anti-Fog",
            Coating::ScratchResistant => "Scratch Resistant",
        }
    }
}

impl fmt::Display for Coating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Coating {
    type Err = OptikError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Coating::ALL
            .into_iter()
            .find(|c| c.id() == wanted)
            .ok_or_else(|| {
                OptikError::invalid(
                    "coating",
                    format!(
                        "unknown coating '{}', expected one of {}",
                        s,
                        names(Coating::ALL.iter().map(|c| c.id()))
                    ),
                )
            })
    }
}

/// Lens design ordered by the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LensType {
    #[serde(alias = "uzak", alias = "yakın", alias = "yakin")]
    SingleVision,
    Bifocal,
    #[serde(alias = "progresif")]
    Progressive,
    Multifocal,
    Photochromic,
    BlueCut,
    AntiReflex,
}

impl LensType {
    pub const ALL: [LensType; 7] = [
        LensType::SingleVision,
        LensType::Bifocal,
        LensType::Progressive,
        LensType::Multifocal,
        LensType::Photochromic,
        LensType::BlueCut,
        LensType::AntiReflex,
    ];

    pub fn id(self) -> &'static str {
        match self {
            LensType::SingleVision => "single_vision",
            LensType::Bifocal => "bifocal",
            LensType::Progressive => "progressive",
            LensType::Multifocal => "multifocal",
            LensType::Photochromic => "photochromic",
            LensType::BlueCut => "blue_cut",
            LensType::AntiReflex => "anti_reflex",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            LensType::SingleVision => &["uzak", "yakın", "yakin", "single-vision"],
            LensType::Progressive => &["progresif"],
            LensType::BlueCut => &["blue-cut"],
            LensType::AntiReflex => &["anti-reflex"],
            _ => &[],
        }
    }

    /// Designs with more than one focal zone; these always get anti-reflective
    pub fn is_multi_zone(self) -> bool {
        matches!(
            self,
            LensType::Progressive | LensType::Bifocal | LensType::Multifocal
        )
    }
}

impl fmt::Display for LensType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for LensType {
    type Err = OptikError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        LensType::ALL
            .into_iter()
            .find(|t| t.id() == wanted || t.aliases().contains(&wanted.as_str()))
            .ok_or_else(|| {
                OptikError::invalid(
                    "lensType",
                    format!(
                        "unknown lens type '{}', expected one of {}",
                        s,
                        names(LensType::ALL.iter().map(|t| t.id()))
                    ),
                )
            })
    }
}

/// Standard frame sizes and their effective lens diameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameSize {
    Small,
    Medium,
    Large,
}

impl FrameSize {
    pub const ALL: [FrameSize; 3] = [FrameSize::Small, FrameSize::Medium, FrameSize::Large];

    pub fn id(self) -> &'static str {
        match self {
            FrameSize::Small => "small",
            FrameSize::Medium => "medium",
            FrameSize::Large => "large",
        }
    }

    /// Effective lens diameter, mm
    pub fn diameter(self) -> f64 {
        match self {
            FrameSize::Small => 48.0,
            FrameSize::Medium => 52.0,
            FrameSize::Large => 56.0,
        }
    }

    /// Thickness multiplier relative to a medium frame
    ///
    /// Shown to customers; the sag model already scales with `diameter()`.
    pub fn thickness_multiplier(self) -> f64 {
        match self {
            FrameSize::Small => 0.9,
            FrameSize::Medium => 1.0,
            FrameSize::Large => 1.15,
        }
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FrameSize {
    type Err = OptikError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        FrameSize::ALL
            .into_iter()
            .find(|f| f.id() == wanted)
            .ok_or_else(|| {
                OptikError::invalid(
                    "frame.size",
                    format!("unknown frame size '{}', expected small, medium or large", s),
                )
            })
    }
}

/// Coarse customer preference used by the index recommendation rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityPreset {
    Thin,
    Cheap,
    #[default]
    Balanced,
}

impl PriorityPreset {
    pub fn id(self) -> &'static str {
        match self {
            PriorityPreset::Thin => "thin",
            PriorityPreset::Cheap => "cheap",
            PriorityPreset::Balanced => "balanced",
        }
    }
}

impl fmt::Display for PriorityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PriorityPreset {
    type Err = OptikError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "thin" => Ok(PriorityPreset::Thin),
            "cheap" => Ok(PriorityPreset::Cheap),
            "balanced" => Ok(PriorityPreset::Balanced),
            _ => Err(OptikError::invalid(
                "priority",
                format!("unknown priority '{}', expected thin, cheap or balanced", s),
            )),
        }
    }
}

/// Product tier assigned to a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Economy,
    Standard,
    Premium,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Economy => "economy",
            Category::Standard => "standard",
            Category::Premium => "premium",
        })
    }
}

fn names<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.collect::<Vec<_>>().join(", ")
}
