pub mod breakdown;
pub mod catalog;
pub mod dataset;
pub mod estimator;
pub mod forest;
pub mod trainer;
pub mod tree;

pub use crate::domain::model::{BreakdownRow, Estimate, Feature, ProjectInputs, ProjectRecord};
pub use crate::domain::ports::Regressor;
pub use crate::utils::error::Result;
