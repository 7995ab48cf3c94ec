use crate::domain::model::{BreakdownRow, ProjectInputs};
use crate::utils::error::RequestError;

pub const TOTAL_LABEL: &str = "Total";

/// Allocates `predicted_cost` across the features in proportion to the
/// model's importance weights.
///
/// Rows follow `Feature::ALL` order and end with a total row whose cost is
/// `predicted_cost` itself, not the sum of the allocations.
pub fn allocate(
    inputs: &ProjectInputs,
    importances: &[f64],
    predicted_cost: f64,
) -> Result<Vec<BreakdownRow>, RequestError> {
    if importances.len() != inputs.as_slice().len() {
        return Err(RequestError::internal(format!(
            "model reports {} importance weights for {} features",
            importances.len(),
            inputs.as_slice().len()
        )));
    }

    let weights = normalize(importances)?;

    let mut rows = Vec::with_capacity(weights.len() + 1);
    let mut allocated = 0.0;
    for ((feature, value), weight) in inputs.iter().zip(weights) {
        let cost = weight * predicted_cost;
        allocated += cost;
        rows.push(BreakdownRow {
            label: title_case(&feature.label()),
            value: Some(value),
            cost,
        });
    }

    tracing::debug!(
        "Allocated {:.6} of predicted {:.6} (drift {:e})",
        allocated,
        predicted_cost,
        allocated - predicted_cost
    );

    rows.push(BreakdownRow {
        label: TOTAL_LABEL.to_string(),
        value: None,
        cost: predicted_cost,
    });
    Ok(rows)
}

/// Scales non-negative weights so they sum to one.
pub fn normalize(weights: &[f64]) -> Result<Vec<f64>, RequestError> {
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(RequestError::internal(
            "feature importances must be finite and non-negative",
        ));
    }

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(RequestError::internal("feature importances sum to zero"));
    }

    Ok(weights.iter().map(|w| w / total).collect())
}

/// Upper-cases the first letter of every word and lower-cases the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Feature, FEATURE_COUNT};

    fn inputs() -> ProjectInputs {
        ProjectInputs::new([2000.0, 12.0, 8.0, 5.0, 3.0, 500.0, 3.0, 3.0, 3.0])
    }

    #[test]
    fn test_rows_follow_feature_order_and_end_with_total() {
        let importances = [8.0, 2.0, 2.0, 1.0, 1.0, 1.0, 0.5, 0.25, 0.25];
        let rows = allocate(&inputs(), &importances, 1000.0).unwrap();

        assert_eq!(rows.len(), FEATURE_COUNT + 1);
        assert_eq!(rows[0].label, "Project Size");
        assert_eq!(rows[0].value, Some(2000.0));
        assert_eq!(rows[0].cost, 500.0);
        assert_eq!(rows[7].label, "Developer Experience");

        let total = rows.last().unwrap();
        assert_eq!(total.label, "Total");
        assert_eq!(total.value, None);
        assert_eq!(total.cost, 1000.0);
    }

    #[test]
    fn test_total_is_the_prediction_not_the_sum() {
        let importances = [1.0 / 3.0; FEATURE_COUNT];
        let predicted = 123_456.789_012_345;
        let rows = allocate(&inputs(), &importances, predicted).unwrap();

        let total = rows.last().unwrap().cost;
        assert_eq!(total.to_bits(), predicted.to_bits());

        let summed: f64 = rows[..FEATURE_COUNT].iter().map(|r| r.cost).sum();
        assert!((summed - predicted).abs() < 1e-6);
    }

    #[test]
    fn test_zero_prediction_gives_zero_rows() {
        let rows = allocate(&inputs(), &[1.0; FEATURE_COUNT], 0.0).unwrap();
        assert!(rows.iter().all(|r| r.cost == 0.0));
    }

    #[test]
    fn test_zero_importances_are_an_internal_error() {
        let err = allocate(&inputs(), &[0.0; FEATURE_COUNT], 10.0).unwrap_err();
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_wrong_importance_length_is_an_internal_error() {
        let err = allocate(&inputs(), &[1.0; 3], 10.0).unwrap_err();
        assert!(matches!(err, RequestError::Internal { .. }));
    }

    #[test]
    fn test_normalize() {
        let weights = normalize(&[1.0, 3.0]).unwrap();
        assert_eq!(weights, vec![0.25, 0.75]);
        assert!(normalize(&[1.0, -1.0]).is_err());
        assert!(normalize(&[f64::NAN]).is_err());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("Project Size"), "Project Size");
        assert_eq!(title_case("COCOMO II"), "Cocomo Ii");
        assert_eq!(title_case("team_size"), "Team_Size");
        assert_eq!(title_case(&Feature::SoftwareTools.label()), "Software Tools");
    }
}
