//! Boundary validation of raw calculator input
//!
//! [`FormData`] mirrors what a form or a JSON client sends. [`Validator`]
//! turns it into a [`QuoteRequest`], reporting every problem at once.

use crate::catalog::{FrameSize, LensType};
use crate::request::{EyePrescription, Frame, Prescription, PriorityWeights, QuoteRequest};
use crate::{InputLimits, OptikError, OptikResult};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EyeForm {
    pub sph: f64,
    #[serde(default)]
    pub cyl: f64,
    #[serde(default)]
    pub axis: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionForm {
    pub right_eye: EyeForm,
    pub left_eye: EyeForm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameForm {
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityForm {
    pub thickness: f64,
    pub price: f64,
    pub quality: f64,
}

/// Raw calculator input, as submitted by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub prescription: PrescriptionForm,
    pub frame: FrameForm,
    pub lens_type: String,
    pub priority: PriorityForm,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub subsidy_eligible: bool,
}

impl FormData {
    pub fn from_json(text: &str) -> OptikResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| OptikError::invalid("formData", format!("malformed request: {}", e)))
    }
}

/// Checks raw input against [`InputLimits`]
#[derive(Debug, Default, Clone, Copy)]
pub struct Validator;

impl Validator {
    pub fn validate(&self, form: &FormData, limits: &InputLimits) -> OptikResult<QuoteRequest> {
        let mut errors = Vec::new();

        let right_eye = check_eye(
            "prescription.rightEye",
            &form.prescription.right_eye,
            limits,
            &mut errors,
        );
        let left_eye = check_eye(
            "prescription.leftEye",
            &form.prescription.left_eye,
            limits,
            &mut errors,
        );

        let size = keep(form.frame.size.parse::<FrameSize>(), &mut errors);
        let width = check_optional(
            "frame.width",
            form.frame.width,
            &limits.frame_width,
            &mut errors,
        );
        let height = check_optional(
            "frame.height",
            form.frame.height,
            &limits.frame_height,
            &mut errors,
        );
        let bridge = check_optional(
            "frame.bridge",
            form.frame.bridge,
            &limits.frame_bridge,
            &mut errors,
        );

        let lens_type = keep(form.lens_type.parse::<LensType>(), &mut errors);

        let weights = &limits.priority_weight;
        let thickness = check_range(
            "priority.thickness",
            form.priority.thickness,
            weights,
            &mut errors,
        );
        let price = check_range("priority.price", form.priority.price, weights, &mut errors);
        let quality = check_range(
            "priority.quality",
            form.priority.quality,
            weights,
            &mut errors,
        );

        let usage_chars = form.usage.chars().count();
        if usage_chars > limits.max_usage_chars {
            errors.push(OptikError::invalid(
                "usage",
                format!(
                    "description is {} characters, at most {} allowed",
                    usage_chars, limits.max_usage_chars
                ),
            ));
        }

        if let Some(err) = OptikError::collect(errors) {
            return Err(err);
        }

        match (size, lens_type) {
            (Some(size), Some(lens_type)) => Ok(QuoteRequest {
                prescription: Prescription {
                    right_eye,
                    left_eye,
                },
                frame: Frame {
                    size,
                    width,
                    height,
                    bridge,
                },
                lens_type,
                priority: PriorityWeights {
                    thickness,
                    price,
                    quality,
                },
                usage: form.usage.trim().to_string(),
                subsidy_eligible: form.subsidy_eligible,
            }),
            _ => Err(OptikError::Engine(
                "validation passed without a frame size or lens type".to_string(),
            )),
        }
    }
}

fn check_eye(
    field: &str,
    eye: &EyeForm,
    limits: &InputLimits,
    errors: &mut Vec<OptikError>,
) -> EyePrescription {
    EyePrescription {
        sph: check_range(&format!("{}.sph", field), eye.sph, &limits.sphere, errors),
        cyl: check_range(&format!("{}.cyl", field), eye.cyl, &limits.cylinder, errors),
        axis: check_range(&format!("{}.axis", field), eye.axis, &limits.axis, errors),
    }
}

fn check_range(
    field: &str,
    value: f64,
    range: &RangeInclusive<f64>,
    errors: &mut Vec<OptikError>,
) -> f64 {
    if !value.is_finite() {
        errors.push(OptikError::invalid(field, "must be a finite number"));
    } else if !range.contains(&value) {
        errors.push(OptikError::invalid(
            field,
            format!(
                "{} is outside {}..={}",
                value,
                range.start(),
                range.end()
            ),
        ));
    }
    value
}

fn check_optional(
    field: &str,
    value: Option<f64>,
    range: &RangeInclusive<f64>,
    errors: &mut Vec<OptikError>,
) -> Option<f64> {
    value.map(|v| check_range(field, v, range, errors))
}

fn keep<T>(result: OptikResult<T>, errors: &mut Vec<OptikError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push(err);
            None
        }
    }
}
