use std::ops::RangeInclusive;

/// Accepted ranges for every numeric input of the engine
///
/// Values outside these ranges are rejected at the boundary instead of
/// being clamped, so data-entry mistakes surface as errors.
#[derive(Debug, Clone, PartialEq)]
pub struct InputLimits {
    /// Sphere power per eye, diopters
    pub sphere: RangeInclusive<f64>,

    /// Cylinder power per eye, diopters
    pub cylinder: RangeInclusive<f64>,

    /// Cylinder axis, degrees
    pub axis: RangeInclusive<f64>,

    /// Optional frame width measurement, mm
    pub frame_width: RangeInclusive<f64>,

    /// Optional frame height measurement, mm
    pub frame_height: RangeInclusive<f64>,

    /// Optional bridge measurement, mm
    pub frame_bridge: RangeInclusive<f64>,

    /// Priority slider weights
    pub priority_weight: RangeInclusive<f64>,

    /// Largest absolute lens power the estimator accepts, diopters
    pub max_power: f64,

    /// Largest refractive index accepted; the lower bound 1.0 is always exclusive
    pub max_index: f64,

    /// Largest lens diameter accepted, mm
    pub max_diameter: f64,

    /// Maximum length of the free-text usage description, in chars
    pub max_usage_chars: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            sphere: -20.0..=20.0,
            cylinder: -6.0..=6.0,
            axis: 0.0..=180.0,
            frame_width: 40.0..=70.0,
            frame_height: 25.0..=60.0,
            frame_bridge: 10.0..=25.0,
            priority_weight: 0.0..=100.0,
            max_power: 26.0,
            max_index: 2.0,
            max_diameter: 90.0,
            max_usage_chars: 500,
        }
    }
}

impl InputLimits {
    pub fn new() -> Self {
        Self::default()
    }
}
