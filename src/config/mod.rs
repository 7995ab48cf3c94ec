#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::core::forest::ForestConfig;
use crate::core::trainer::TrainerConfig;
use crate::core::tree::TreeConfig;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_open_range, validate_path, validate_positive_number,
    Validate,
};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATASET_PATH: &str = "data/software_cost_dataset.csv";
pub const DEFAULT_FEATURE_DETAILS_PATH: &str = "data/feature_details.json";

/// Fully resolved process settings: defaults, then the TOML file, then CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub dataset_path: String,
    pub feature_details_path: String,
    pub trainer: TrainerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            dataset_path: DEFAULT_DATASET_PATH.to_string(),
            feature_details_path: DEFAULT_FEATURE_DETAILS_PATH.to_string(),
            trainer: TrainerConfig::default(),
        }
    }
}

impl Settings {
    pub fn from_toml(file: &TomlConfig) -> Self {
        let defaults = Settings::default();
        let tree_defaults = TreeConfig::default();
        let model = &file.model;

        Self {
            host: file.server.host.clone().unwrap_or(defaults.host),
            port: file.server.port.unwrap_or(defaults.port),
            dataset_path: file.data.dataset_path.clone().unwrap_or(defaults.dataset_path),
            feature_details_path: file
                .data
                .feature_details_path
                .clone()
                .unwrap_or(defaults.feature_details_path),
            trainer: TrainerConfig {
                test_size: model.test_size.unwrap_or(defaults.trainer.test_size),
                seed: model.seed.unwrap_or(defaults.trainer.seed),
                forest: ForestConfig {
                    n_estimators: model
                        .n_estimators
                        .unwrap_or(defaults.trainer.forest.n_estimators),
                    tree: TreeConfig {
                        max_depth: model.max_depth.or(tree_defaults.max_depth),
                        min_samples_split: model
                            .min_samples_split
                            .unwrap_or(tree_defaults.min_samples_split),
                        min_samples_leaf: model
                            .min_samples_leaf
                            .unwrap_or(tree_defaults.min_samples_leaf),
                        max_features: model.max_features.or(tree_defaults.max_features),
                    },
                    ..defaults.trainer.forest
                },
            },
        }
    }

    /// 應用命令列覆蓋設定
    #[cfg(feature = "cli")]
    pub fn apply_cli(&mut self, cli: &CliConfig) {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(dataset) = &cli.dataset {
            self.dataset_path = dataset.clone();
        }
        if let Some(details) = &cli.feature_details {
            self.feature_details_path = details.clone();
        }
    }

    /// Loads the optional TOML file named by `--config` and layers the flags on top.
    #[cfg(feature = "cli")]
    pub fn resolve(cli: &CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        let mut settings = Self::from_toml(&file);
        settings.apply_cli(cli);
        Ok(settings)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.host)?;
        validate_path("data.dataset_path", &self.dataset_path)?;
        validate_path("data.feature_details_path", &self.feature_details_path)?;
        validate_open_range("model.test_size", self.trainer.test_size, 0.0, 1.0)?;

        let forest = &self.trainer.forest;
        validate_positive_number("model.n_estimators", forest.n_estimators, 1)?;
        validate_positive_number("model.min_samples_split", forest.tree.min_samples_split, 2)?;
        validate_positive_number("model.min_samples_leaf", forest.tree.min_samples_leaf, 1)?;
        if let Some(max_depth) = forest.tree.max_depth {
            validate_positive_number("model.max_depth", max_depth, 1)?;
        }
        if let Some(max_features) = forest.tree.max_features {
            validate_positive_number("model.max_features", max_features, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.bind_address(), "127.0.0.1:5000");
        assert_eq!(settings.trainer.seed, 42);
        assert_eq!(settings.trainer.forest.n_estimators, 100);
        assert_eq!(settings.trainer.test_size, 0.2);
    }

    #[test]
    fn test_toml_values_override_defaults() {
        let file = TomlConfig::from_toml_str(
            "[server]\nport = 8000\n[model]\nn_estimators = 10\nmax_depth = 6\n",
        )
        .unwrap();
        let settings = Settings::from_toml(&file);

        assert_eq!(settings.port, 8000);
        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(settings.trainer.forest.n_estimators, 10);
        assert_eq!(settings.trainer.forest.tree.max_depth, Some(6));
        assert!(settings.trainer.forest.bootstrap);
    }

    #[test]
    fn test_invalid_model_settings_fail_validation() {
        let file = TomlConfig::from_toml_str("[model]\ntest_size = 1.5\n").unwrap();
        assert!(Settings::from_toml(&file).validate().is_err());

        let file = TomlConfig::from_toml_str("[model]\nn_estimators = 0\n").unwrap();
        assert!(Settings::from_toml(&file).validate().is_err());

        let file = TomlConfig::from_toml_str("[model]\nmin_samples_split = 1\n").unwrap();
        assert!(Settings::from_toml(&file).validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_flags_win_over_file() {
        use clap::Parser;
        use std::io::Write;

        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nport = 8000\nhost = \"0.0.0.0\"\n")
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from(["cost-estimator", "--config", &path, "--port", "9100"]);
        let settings = Settings::resolve(&cli).unwrap();

        assert_eq!(settings.port, 9100);
        assert_eq!(settings.host, "0.0.0.0");
    }
}
