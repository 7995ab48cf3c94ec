use crate::core::dataset::Dataset;
use crate::core::forest::{ForestConfig, RandomForestRegressor};
use crate::domain::model::FEATURE_COUNT;
use crate::domain::ports::Regressor;
use crate::utils::error::{EstimatorError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    /// Fraction of rows held out for evaluation.
    pub test_size: f64,
    /// Seed for both the partition and the forest.
    pub seed: u64,
    pub forest: ForestConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            seed: 42,
            forest: ForestConfig::default(),
        }
    }
}

/// Held-out metrics, reported once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingReport {
    pub train_rows: usize,
    pub test_rows: usize,
    pub mse: f64,
    pub r2: f64,
}

#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub model: RandomForestRegressor,
    pub report: TrainingReport,
}

pub struct ModelTrainer {
    config: TrainerConfig,
}

impl ModelTrainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    pub fn train(&self, dataset: &Dataset) -> Result<TrainedModel> {
        let (train_idx, test_idx) =
            train_test_split(dataset.len(), self.config.test_size, self.config.seed)?;
        tracing::info!(
            "Split {} rows into {} training / {} test rows (seed {})",
            dataset.len(),
            train_idx.len(),
            test_idx.len(),
            self.config.seed
        );

        let features = dataset.features();
        let targets = dataset.targets();

        let x_train: Vec<[f64; FEATURE_COUNT]> = train_idx.iter().map(|&i| features[i]).collect();
        let y_train: Vec<f64> = train_idx.iter().map(|&i| targets[i]).collect();

        let model = RandomForestRegressor::fit(
            &x_train,
            &y_train,
            &self.config.forest,
            self.config.seed,
        )?;

        let y_test: Vec<f64> = test_idx.iter().map(|&i| targets[i]).collect();
        let y_pred: Vec<f64> = test_idx.iter().map(|&i| model.predict(&features[i])).collect();

        let report = TrainingReport {
            train_rows: train_idx.len(),
            test_rows: test_idx.len(),
            mse: mean_squared_error(&y_test, &y_pred),
            r2: r2_score(&y_test, &y_pred),
        };

        Ok(TrainedModel { model, report })
    }
}

/// Shuffles `0..n` with a seeded RNG; the first `ceil(test_size * n)` indices
/// are the test partition, the rest the training partition.
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(EstimatorError::InvalidConfigValueError {
            field: "model.test_size".to_string(),
            value: test_size.to_string(),
            reason: "must be strictly between 0 and 1".to_string(),
        });
    }

    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(EstimatorError::TrainingError {
            message: format!(
                "{} rows cannot be split into non-empty training and test partitions",
                n
            ),
        });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok((train, indices))
}

pub fn mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let total: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    total / y_true.len() as f64
}

/// Coefficient of determination. Constant targets score 1.0 on a perfect fit
/// and 0.0 otherwise.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean) * (t - mean)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}
