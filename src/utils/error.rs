use crate::domain::model::Feature;
use thiserror::Error;

/// Startup errors. Any of these aborts the process before the server binds.
#[derive(Error, Debug)]
pub enum EstimatorError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Dataset '{path}' is missing required columns: {}", .columns.join(", "))]
    MissingColumnsError { path: String, columns: Vec<String> },

    #[error("Dataset '{path}' line {line}: column '{column}' has non-finite value {value}")]
    NonFiniteValueError {
        path: String,
        line: u64,
        column: String,
        value: f64,
    },

    #[error("Training error: {message}")]
    TrainingError { message: String },
}

impl EstimatorError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            EstimatorError::CsvError(e) => format!("Could not read the dataset: {}", e),
            EstimatorError::IoError(e) => format!("File system error: {}", e),
            EstimatorError::SerializationError(e) => {
                format!("Could not decode feature details: {}", e)
            }
            EstimatorError::ConfigError { message } => message.clone(),
            EstimatorError::ConfigValidationError { field, message } => {
                format!("Invalid configuration ({}): {}", field, message)
            }
            EstimatorError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("Setting '{}' has invalid value '{}': {}", field, value, reason),
            EstimatorError::MissingColumnsError { .. } => {
                "Dataset is missing required columns. Ensure the dataset contains all required fields."
                    .to_string()
            }
            EstimatorError::NonFiniteValueError { line, column, .. } => format!(
                "Dataset line {} has a missing or non-finite {} value",
                line, column
            ),
            EstimatorError::TrainingError { message } => {
                format!("Model training failed: {}", message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EstimatorError::CsvError(_) | EstimatorError::MissingColumnsError { .. } => {
                "Check that the dataset is a CSV file with a header row naming all nine features and Project_Cost"
            }
            EstimatorError::IoError(_) | EstimatorError::ConfigError { .. } => {
                "Check the --dataset and --feature-details paths"
            }
            EstimatorError::SerializationError(_) => {
                "The feature details file must be a JSON object mapping feature names to text"
            }
            EstimatorError::ConfigValidationError { .. }
            | EstimatorError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line flags"
            }
            EstimatorError::NonFiniteValueError { .. } => {
                "Replace NaN, inf or out-of-range numbers in the dataset with finite values"
            }
            EstimatorError::TrainingError { .. } => {
                "Provide more historical projects in the dataset"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EstimatorError>;

/// Per-request failures. Each kind renders through its own page.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("{} must be between {} and {}.", .feature.label(), .min, .max)]
    Validation { feature: Feature, min: f64, max: f64 },

    #[error("{field}: {reason}")]
    Parse { field: String, reason: String },

    #[error("{message}")]
    Internal { message: String },
}

impl RequestError {
    pub fn out_of_range(feature: Feature) -> Self {
        let (min, max) = feature.range();
        RequestError::Validation { feature, min, max }
    }

    pub fn parse(field: impl Into<String>, reason: impl Into<String>) -> Self {
        RequestError::Parse {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        RequestError::Internal {
            message: message.into(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        !matches!(self, RequestError::Internal { .. })
    }
}
