use crate::core::tree::{RegressionTree, TreeConfig};
use crate::domain::ports::Regressor;
use crate::utils::error::{EstimatorError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, PartialEq)]
pub struct ForestConfig {
    pub n_estimators: usize,
    pub tree: TreeConfig,
    /// Grow each tree on a bootstrap draw of the training rows.
    pub bootstrap: bool,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            tree: TreeConfig::default(),
            bootstrap: true,
        }
    }
}

/// Bagged ensemble of regression trees. Immutable once fitted.
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    trees: Vec<RegressionTree>,
    importances: Vec<f64>,
    n_features: usize,
}

impl RandomForestRegressor {
    pub fn fit<R: AsRef<[f64]>>(
        x: &[R],
        y: &[f64],
        config: &ForestConfig,
        seed: u64,
    ) -> Result<Self> {
        if x.is_empty() {
            return Err(EstimatorError::TrainingError {
                message: "cannot fit a forest on zero rows".to_string(),
            });
        }
        if x.len() != y.len() {
            return Err(EstimatorError::TrainingError {
                message: format!("{} feature rows but {} targets", x.len(), y.len()),
            });
        }
        if config.n_estimators == 0 {
            return Err(EstimatorError::TrainingError {
                message: "n_estimators must be at least 1".to_string(),
            });
        }

        let n_features = x[0].as_ref().len();
        if let Some(bad) = x.iter().position(|row| row.as_ref().len() != n_features) {
            return Err(EstimatorError::TrainingError {
                message: format!("row {} has a different number of features", bad),
            });
        }

        let n = x.len();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut trees = Vec::with_capacity(config.n_estimators);

        for _ in 0..config.n_estimators {
            // 每棵樹使用獨立的子種子
            let mut tree_rng = StdRng::seed_from_u64(rng.random::<u64>());
            let sample: Vec<usize> = if config.bootstrap {
                (0..n).map(|_| tree_rng.random_range(0..n)).collect()
            } else {
                (0..n).collect()
            };
            trees.push(RegressionTree::fit(
                x,
                y,
                &sample,
                n_features,
                &config.tree,
                &mut tree_rng,
            ));
        }

        let importances = average_importances(&trees, n_features);
        tracing::debug!(
            "Fitted {} trees, mean node count {:.1}",
            trees.len(),
            trees.iter().map(RegressionTree::node_count).sum::<usize>() as f64 / trees.len() as f64
        );

        Ok(Self {
            trees,
            importances,
            n_features,
        })
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

fn average_importances(trees: &[RegressionTree], n_features: usize) -> Vec<f64> {
    let mut totals = vec![0.0; n_features];
    for tree in trees {
        for (total, value) in totals.iter_mut().zip(tree.feature_importances()) {
            *total += value;
        }
    }

    let sum: f64 = totals.iter().sum();
    if sum > 0.0 {
        totals.iter().map(|v| v / sum).collect()
    } else {
        totals
    }
}

impl Regressor for RandomForestRegressor {
    fn predict(&self, row: &[f64]) -> f64 {
        debug_assert_eq!(row.len(), self.n_features);
        let total: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
        total / self.trees.len() as f64
    }

    fn feature_importances(&self) -> &[f64] {
        &self.importances
    }
}
