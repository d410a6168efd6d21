//! Form field parsing for the predict endpoint.
//!
//! Eight fields are required; the ten symptom flags default to "0" when the
//! checkbox is absent from the submission. Values are coerced, not
//! range-checked, so an unexpected code still reaches the model the same way
//! it would have reached the original classifier.

use anemia_core::features::{InputRecord, SCALE, SYMPTOM_COUNT, SYMPTOM_NAMES};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("missing required field '{0}'")]
    Missing(String),

    #[error("invalid value '{value}' for field '{field}'")]
    Invalid { field: String, value: String },
}

/// Build an [`InputRecord`] from urlencoded form fields
pub fn parse_record(form: &HashMap<String, String>) -> Result<InputRecord, FormError> {
    let mut symptoms = [0i64; SYMPTOM_COUNT];
    for (flag, name) in symptoms.iter_mut().zip(SYMPTOM_NAMES.iter()) {
        *flag = optional_code(form, name)?;
    }

    Ok(InputRecord {
        age: required_age(form)?,
        gender: required_code(form, "gender")?,
        diet: required_code(form, "diet")?,
        activity: required_code(form, "activity")?,
        menstrual_cycle: required_code(form, "menstrual_cycle")?,
        iron_intake: required_code(form, "iron_intake")?,
        sleep_duration: required_code(form, "sleep_duration")?,
        bmi: required_code(form, "bmi")?,
        symptoms,
    })
}

/// Age accepts a decimal string and is converted to micro-scaled years
fn required_age(form: &HashMap<String, String>) -> Result<i64, FormError> {
    let raw = form
        .get("age")
        .ok_or_else(|| FormError::Missing("age".to_string()))?;

    let years: f64 = raw.trim().parse().map_err(|_| FormError::Invalid {
        field: "age".to_string(),
        value: raw.clone(),
    })?;
    if !years.is_finite() {
        return Err(FormError::Invalid {
            field: "age".to_string(),
            value: raw.clone(),
        });
    }

    Ok((years * SCALE as f64).round() as i64)
}

fn required_code(form: &HashMap<String, String>, field: &str) -> Result<i64, FormError> {
    let raw = form
        .get(field)
        .ok_or_else(|| FormError::Missing(field.to_string()))?;
    parse_code(field, raw)
}

fn optional_code(form: &HashMap<String, String>, field: &str) -> Result<i64, FormError> {
    match form.get(field) {
        Some(raw) => parse_code(field, raw),
        None => Ok(0),
    }
}

fn parse_code(field: &str, raw: &str) -> Result<i64, FormError> {
    raw.trim().parse::<i64>().map_err(|_| FormError::Invalid {
        field: field.to_string(),
        value: raw.to_string(),
    })
}
