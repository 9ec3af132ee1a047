use serde::{Deserialize, Serialize};

/// Per-iteration statistics emitted by `TrainingRun::run`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the run sends
/// one `EpochStats` value at the end of every completed iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// Index of the held-out fold this run is scored against.
    pub fold: usize,
    /// 1-based iteration number.
    pub iteration: usize,
    pub max_iterations: usize,
    /// Mean squared error per training example during this epoch.
    pub train_error: f64,
    /// Held-out error under the configured metric.
    pub held_out_error: f64,
    /// Wall-clock duration of this iteration in milliseconds.
    pub elapsed_ms: u64,
}
