//! # Optik Engine
//!
//! **Lens thickness, pricing and recommendations for optical retail**
//!
//! Optik estimates how thick a spectacle lens will be for a prescription,
//! prices a short list of lens packages from data-driven rule tables and
//! ranks them against the customer's priorities.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use optik::{Engine, FormData, OptikResult};
//!
//! fn main() -> OptikResult<()> {
//!     let engine = Engine::new();
//!
//!     // Thickness of a -4.00 D lens in 1.60 material, 65 mm blank
//!     let thickness = engine.estimate_thickness(-4.0, 1.60, 65.0, None)?;
//!     println!("edge {:.2} mm", thickness.edge);
//!
//!     let form = FormData::from_json(r#"{
//!         "prescription": {
//!             "rightEye": { "sph": -3.25, "cyl": -0.75, "axis": 90 },
//!             "leftEye":  { "sph": -3.00, "cyl": 0, "axis": 0 }
//!         },
//!         "frame": { "size": "medium" },
//!         "lensType": "single_vision",
//!         "priority": { "thickness": 60, "price": 30, "quality": 70 }
//!     }"#)?;
//!
//!     for recommendation in engine.generate_recommendations(&form)? {
//!         println!("{} → {}", recommendation.lens_index, recommendation.total_price);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Thickness
//! A geometric sag model: thickness grows with the square of the lens radius
//! and with power, and shrinks as the refractive index rises.
//!
//! ### Rule tables
//! Index recommendation, candidate short lists, coating selection and pricing
//! are plain data ([`RuleTables`]) injected into the engine. They can be
//! loaded from JSON and replaced between calculations.
//!
//! ### Special orders
//! Lenses at or above the special-manufacture threshold are quoted with a
//! turnaround instead of a thickness and are never ranked.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod limits;
pub mod physics;
pub mod request;
pub mod response;
pub mod rules;
pub mod validator;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use catalog::{Category, Coating, FrameSize, LensIndex, LensType, PriorityPreset};
pub use engine::Engine;
pub use error::{ConfigErrorDetails, OptikError};
pub use limits::InputLimits;
pub use physics::{
    estimate_improvement_percent, estimate_thickness, SpecialOrder, SpecialOrderPolicy,
    ThicknessEstimator, ThicknessOutcome, ThicknessResult, ThicknessRisk,
};
pub use request::{EyePrescription, Frame, Prescription, PriorityWeights, QuoteRequest};
pub use response::{Quote, Recommendation, SpecialOrderQuote};
pub use rules::{IndexSuggestion, RuleTables};
pub use validator::{EyeForm, FormData, FrameForm, PrescriptionForm, PriorityForm, Validator};

/// Result type for Optik operations
pub type OptikResult<T> = Result<T, OptikError>;

#[cfg(test)]
mod tests;
