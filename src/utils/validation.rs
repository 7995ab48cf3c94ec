use crate::domain::model::{Feature, ProjectInputs, FEATURE_COUNT};
use crate::utils::error::{EstimatorError, RequestError, Result};
use std::collections::HashMap;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(EstimatorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EstimatorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(EstimatorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EstimatorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Open interval check, used for fractions such as the test split size.
pub fn validate_open_range(field_name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !(value > min && value < max) {
        return Err(EstimatorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be strictly between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Parses and range-checks the nine form fields.
///
/// Every field is parsed before any range is checked, so a missing or
/// non-numeric field wins over an out-of-range one. Ranges are checked in
/// `Feature::ALL` order and the first violation is returned.
pub fn validate_inputs(
    fields: &HashMap<String, String>,
) -> std::result::Result<ProjectInputs, RequestError> {
    let mut values = [0.0; FEATURE_COUNT];
    for feature in Feature::ALL {
        let raw = fields
            .get(feature.name())
            .ok_or_else(|| RequestError::parse(feature.name(), "field is missing"))?;
        values[feature.index()] = raw.trim().parse::<f64>().map_err(|_| {
            RequestError::parse(feature.name(), format!("'{}' is not a number", raw))
        })?;
    }

    for feature in Feature::ALL {
        let (min, max) = feature.range();
        let value = values[feature.index()];
        // NaN fails both comparisons
        if !(min <= value && value <= max) {
            return Err(RequestError::out_of_range(feature));
        }
    }

    Ok(ProjectInputs::new(values))
}
