use std::sync::mpsc;
use std::sync::{atomic::AtomicBool, Arc};

use serde::{Deserialize, Serialize};

use crate::error::{NnError, Result};
use crate::eval::Evaluation;
use crate::train::epoch_stats::EpochStats;

/// Which held-out error drives convergence.
///
/// - `ErrorRate`   — fraction of misclassified output components.
/// - `MeanSquared` — mean squared error per output component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMetric {
    #[default]
    ErrorRate,
    MeanSquared,
}

impl ErrorMetric {
    pub fn of(&self, eval: &Evaluation) -> f64 {
        match self {
            ErrorMetric::ErrorRate => eval.error_rate,
            ErrorMetric::MeanSquared => eval.mean_squared_error,
        }
    }
}

/// Configuration for a training run.
///
/// # Fields
/// - `learning_rate`  — fixed multiplier applied to every weight delta
/// - `goal_error`     — held-out error at or below which the run has converged
/// - `max_iterations` — epochs after which the run gives up
/// - `metric`         — how the held-out error is measured
/// - `progress_tx`    — optional channel sender; one `EpochStats` is sent per
///                      completed iteration.  If the receiver is dropped the
///                      run stops (clean shutdown).
/// - `stop_flag`      — optional atomic flag; when set to `true` from another
///                      thread the run stops after the current iteration.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub learning_rate: f64,
    pub goal_error: f64,
    pub max_iterations: usize,
    pub metric: ErrorMetric,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no progress channel and no stop flag.
    pub fn new(learning_rate: f64, goal_error: f64, max_iterations: usize) -> Self {
        TrainConfig {
            learning_rate,
            goal_error,
            max_iterations,
            metric: ErrorMetric::default(),
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(NnError::Configuration(format!(
                "learning rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        if self.goal_error.is_nan() || self.goal_error < 0.0 {
            return Err(NnError::Configuration(format!(
                "goal error must be non-negative, got {}",
                self.goal_error
            )));
        }
        if self.max_iterations == 0 {
            return Err(NnError::Configuration("the iteration cap must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::new(0.1, 0.05, 10)
    }
}
