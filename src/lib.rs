pub mod config;
pub mod core;
pub mod domain;
pub mod utils;
pub mod web;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{Settings, TomlConfig};

pub use core::{
    catalog::FeatureCatalog,
    dataset::Dataset,
    estimator::EstimatorService,
    forest::RandomForestRegressor,
    trainer::{ModelTrainer, TrainedModel, TrainingReport},
};
pub use utils::error::{EstimatorError, RequestError, Result};
