use crate::utils::error::{EstimatorError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Read-only map from feature name to a descriptive HTML fragment.
#[derive(Debug, Clone, Default)]
pub struct FeatureCatalog {
    details: HashMap<String, String>,
}

impl FeatureCatalog {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => EstimatorError::ConfigError {
                message: format!(
                    "Feature details file '{}' not found. Ensure the file exists and is accessible.",
                    path.display()
                ),
            },
            _ => EstimatorError::IoError(e),
        })?;

        Self::from_json_str(&content).map_err(|e| match e {
            EstimatorError::SerializationError(inner) => EstimatorError::ConfigError {
                message: format!(
                    "Error decoding JSON from '{}': {}. Ensure the file is properly formatted.",
                    path.display(),
                    inner
                ),
            },
            other => other,
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let details: HashMap<String, String> = serde_json::from_str(content)?;
        Ok(Self { details })
    }

    pub fn get(&self, feature: &str) -> Option<&str> {
        self.details.get(feature).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.details.len()
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }
}
