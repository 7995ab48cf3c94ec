use crate::core::breakdown;
use crate::domain::model::{Estimate, ProjectInputs};
use crate::domain::ports::Regressor;
use crate::utils::error::RequestError;
use crate::utils::validation::validate_inputs;
use std::collections::HashMap;

/// Immutable prediction service built once at startup and shared by handle
/// with every request handler.
pub struct EstimatorService<R: Regressor> {
    model: R,
}

impl<R: Regressor> EstimatorService<R> {
    pub fn new(model: R) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &R {
        &self.model
    }

    /// Model output for one project, clamped at zero.
    pub fn predict(&self, inputs: &ProjectInputs) -> Result<f64, RequestError> {
        let raw = self.model.predict(inputs.as_slice());
        if !raw.is_finite() {
            return Err(RequestError::internal(format!(
                "model produced a non-finite prediction ({})",
                raw
            )));
        }
        Ok(raw.max(0.0))
    }

    pub fn estimate(&self, inputs: &ProjectInputs) -> Result<Estimate, RequestError> {
        let predicted_cost = self.predict(inputs)?;
        let breakdown =
            breakdown::allocate(inputs, self.model.feature_importances(), predicted_cost)?;

        Ok(Estimate {
            predicted_cost,
            breakdown,
        })
    }

    /// Validates raw form fields, then estimates. No prediction runs when
    /// validation fails.
    pub fn estimate_form(&self, fields: &HashMap<String, String>) -> Result<Estimate, RequestError> {
        let inputs = validate_inputs(fields)?;
        tracing::debug!("Validated inputs: {:?}", inputs);
        self.estimate(&inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Feature, FEATURE_COUNT};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedModel {
        prediction: f64,
        importances: Vec<f64>,
        calls: AtomicUsize,
    }

    impl FixedModel {
        fn new(prediction: f64) -> Self {
            Self {
                prediction,
                importances: vec![1.0; FEATURE_COUNT],
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Regressor for FixedModel {
        fn predict(&self, row: &[f64]) -> f64 {
            assert_eq!(row.len(), FEATURE_COUNT);
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prediction
        }

        fn feature_importances(&self) -> &[f64] {
            &self.importances
        }
    }

    fn fields(size: &str) -> HashMap<String, String> {
        Feature::ALL
            .iter()
            .map(|f| {
                let value = match f {
                    Feature::ProjectSize => size.to_string(),
                    other => other.range().0.to_string(),
                };
                (f.name().to_string(), value)
            })
            .collect()
    }

    #[test]
    fn test_negative_predictions_are_clamped() {
        let service = EstimatorService::new(FixedModel::new(-250.0));
        let estimate = service.estimate_form(&fields("1000")).unwrap();

        assert_eq!(estimate.predicted_cost, 0.0);
        assert!(estimate.breakdown.iter().all(|row| row.cost >= 0.0));
        assert_eq!(estimate.total().unwrap().cost, 0.0);
    }

    #[test]
    fn test_total_row_matches_prediction() {
        let service = EstimatorService::new(FixedModel::new(98_765.4321));
        let estimate = service.estimate_form(&fields("1000")).unwrap();

        assert_eq!(estimate.breakdown.len(), FEATURE_COUNT + 1);
        assert_eq!(estimate.feature_rows().len(), FEATURE_COUNT);
        assert_eq!(estimate.total().unwrap().cost, 98_765.4321);
        assert_eq!(estimate.feature_rows()[0].value, Some(1000.0));
    }

    #[test]
    fn test_invalid_input_skips_the_model() {
        let service = EstimatorService::new(FixedModel::new(1.0));
        let err = service.estimate_form(&fields("50")).unwrap_err();

        assert_eq!(err, RequestError::out_of_range(Feature::ProjectSize));
        assert_eq!(service.model().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_non_finite_prediction_is_internal() {
        let service = EstimatorService::new(FixedModel::new(f64::NAN));
        let err = service.estimate_form(&fields("1000")).unwrap_err();
        assert!(matches!(err, RequestError::Internal { .. }));
    }
}
