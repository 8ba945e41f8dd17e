use anyhow::{Context, Result};
use inquire::{Confirm, CustomType, Select, Text};
use optik::{
    EyeForm, FormData, FrameForm, FrameSize, InputLimits, LensType, PrescriptionForm,
    PriorityForm,
};
use std::ops::RangeInclusive;

/// Walk the customer through the calculator form
pub fn prompt_form(limits: &InputLimits) -> Result<FormData> {
    println!("Right eye (OD):");
    let right_eye = prompt_eye(limits)?;
    println!("Left eye (OS):");
    let left_eye = prompt_eye(limits)?;

    let size = Select::new("Frame size:", FrameSize::ALL.to_vec())
        .with_starting_cursor(1)
        .with_help_message("Use arrow keys to navigate, Enter to select")
        .prompt()
        .context("Failed to get frame size")?;

    let lens_type = Select::new("Lens type:", LensType::ALL.to_vec())
        .with_help_message("Use arrow keys to navigate, Enter to select")
        .prompt()
        .context("Failed to get lens type")?;

    println!("\nHow much does each of these matter? (0-100)");
    let weights = &limits.priority_weight;
    let priority = PriorityForm {
        thickness: prompt_number("Thin lenses", 50.0, weights)?,
        price: prompt_number("Low price", 50.0, weights)?,
        quality: prompt_number("Quality", 50.0, weights)?,
    };

    let usage = Text::new("How will you use the glasses?")
        .with_help_message("Free text, e.g. 'ofiste bilgisayar, gece araba'")
        .with_default("")
        .prompt()
        .context("Failed to get usage description")?;

    let subsidy_eligible = Confirm::new("Eligible for the insurance subsidy?")
        .with_default(false)
        .prompt()
        .context("Failed to get subsidy eligibility")?;

    Ok(FormData {
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
        priority,
        usage,
        subsidy_eligible,
    })
}

fn prompt_eye(limits: &InputLimits) -> Result<EyeForm> {
    let sph = prompt_number("  SPH", 0.0, &limits.sphere)?;
    let cyl = prompt_number("  CYL", 0.0, &limits.cylinder)?;
    let axis = if cyl != 0.0 {
        prompt_number("  AXIS", 0.0, &limits.axis)?
    } else {
        0.0
    };
    Ok(EyeForm { sph, cyl, axis })
}

fn prompt_number(name: &str, default: f64, range: &RangeInclusive<f64>) -> Result<f64> {
    let (min, max) = (*range.start(), *range.end());
    let value = CustomType::<f64>::new(name)
        .with_default(default)
        .with_help_message(&format!("Between {} and {}", min, max))
        .with_error_message("Please type a number")
        .with_validator(move |value: &f64| {
            if (min..=max).contains(value) {
                Ok(inquire::validator::Validation::Valid)
            } else {
                Ok(inquire::validator::Validation::Invalid(
                    format!("Must be between {} and {}", min, max).into(),
                ))
            }
        })
        .prompt()
        .context(format!("Failed to get value for {}", name.trim()))?;
    Ok(value)
}
