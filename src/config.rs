use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cv::CrossValidationConfig;
use crate::error::{NnError, Result};
use crate::network::NetworkSpec;
use crate::train::{ErrorMetric, TrainConfig};

/// Everything needed to run a cross-validated training session.
///
/// Saved as JSON; every field is optional in the file and falls back to the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub hidden_layers: usize,
    pub hidden_size: usize,
    pub learning_rate: f64,
    /// Held-out error at or below which a fold's run has converged.
    pub goal_error: f64,
    /// A converged network is saved only when its validation error is below this.
    pub validation_goal: f64,
    pub max_iterations: usize,
    pub metric: ErrorMetric,
    pub seed: Option<u64>,
    pub output_dir: PathBuf,
    pub threads: Option<usize>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            hidden_layers: 1,
            hidden_size: 5,
            learning_rate: 0.1,
            goal_error: 0.05,
            validation_goal: 0.05,
            max_iterations: 10,
            metric: ErrorMetric::ErrorRate,
            seed: None,
            output_dir: PathBuf::from("trained_models"),
            threads: None,
        }
    }
}

impl ExperimentConfig {
    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = serde_json::to_vec_pretty(self)
            .map_err(|e| NnError::Configuration(format!("cannot serialize config: {e}")))?;
        std::fs::write(path, bytes)
            .map_err(|source| NnError::Io { path: path.to_path_buf(), source })
    }

    /// Deserializes an `ExperimentConfig` from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<ExperimentConfig> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| NnError::Io { path: path.to_path_buf(), source })?;
        let config: ExperimentConfig = serde_json::from_str(&text)
            .map_err(|e| NnError::Configuration(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.hidden_layers == 0 || self.hidden_size == 0 {
            return Err(NnError::Configuration(
                "hidden layers and their size must be greater than zero".into(),
            ));
        }
        if self.validation_goal.is_nan() || self.validation_goal < 0.0 {
            return Err(NnError::Configuration(format!(
                "validation goal must be non-negative, got {}",
                self.validation_goal
            )));
        }
        if self.threads == Some(0) {
            return Err(NnError::Configuration("thread count must be at least 1".into()));
        }
        self.train_config().validate()
    }

    pub fn network_spec(&self, num_inputs: usize, num_outputs: usize) -> NetworkSpec {
        NetworkSpec::new(num_inputs, self.hidden_layers, self.hidden_size, num_outputs)
    }

    pub fn train_config(&self) -> TrainConfig {
        let mut config = TrainConfig::new(self.learning_rate, self.goal_error, self.max_iterations);
        config.metric = self.metric;
        config
    }

    pub fn cross_validation_config(&self) -> CrossValidationConfig {
        CrossValidationConfig {
            num_hidden_layers: self.hidden_layers,
            hidden_size: self.hidden_size,
            train: self.train_config(),
            validation_goal: self.validation_goal,
            seed: self.seed,
            threads: self.threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let json = r#"{ "hidden_size": 8, "metric": "mean_squared" }"#;
        let config: ExperimentConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.hidden_size, 8);
        assert_eq!(config.metric, ErrorMetric::MeanSquared);
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.learning_rate, 0.1);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = ExperimentConfig::default();
        assert!(config.validate().is_ok());
        config.learning_rate = -1.0;
        assert!(config.validate().is_err());
        let config = ExperimentConfig { hidden_layers: 0, ..ExperimentConfig::default() };
        assert!(config.validate().is_err());
        let config = ExperimentConfig { max_iterations: 0, ..ExperimentConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn builds_runtime_configs() {
        let config =
            ExperimentConfig { seed: Some(9), hidden_layers: 2, ..ExperimentConfig::default() };
        assert_eq!(config.network_spec(26, 1), NetworkSpec::new(26, 2, 5, 1));
        let cv = config.cross_validation_config();
        assert_eq!(cv.seed, Some(9));
        assert_eq!(cv.train.max_iterations, 10);
        assert_eq!(cv.num_hidden_layers, 2);
    }

    #[test]
    fn json_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("crossfold-nn-config-{}.json", std::process::id()));
        let config =
            ExperimentConfig { seed: Some(3), goal_error: 0.2, ..ExperimentConfig::default() };
        config.save_json(&path).unwrap();
        assert_eq!(ExperimentConfig::load_json(&path).unwrap(), config);
        std::fs::remove_file(&path).unwrap();
    }
}
