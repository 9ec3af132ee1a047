pub mod epoch_stats;
pub mod loop_fn;
pub mod train_config;
pub mod trainer;

pub use epoch_stats::EpochStats;
pub use loop_fn::{RunOutcome, TrainingRun};
pub use train_config::{ErrorMetric, TrainConfig};
pub use trainer::{backpropagate, train_epoch};
