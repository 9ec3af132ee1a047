pub mod activation;
pub mod config;
pub mod cv;
pub mod data;
pub mod error;
pub mod eval;
pub mod layers;
pub mod loss;
pub mod network;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use activation::sigmoid::sigmoid;
pub use config::ExperimentConfig;
pub use cv::{
    cross_validate, CrossValidationConfig, CrossValidationReport, DirectoryStore, MemoryStore,
    ModelStore,
};
pub use data::{Example, LabelMode};
pub use error::{NnError, PersistenceError, Result};
pub use eval::{evaluate, Evaluation};
pub use layers::dense::Layer;
pub use layers::perceptron::Perceptron;
pub use network::{ModelMetadata, Network, NetworkSpec};
pub use loss::mse::MseLoss;
pub use optim::sgd::Sgd;
pub use train::{backpropagate, train_epoch, ErrorMetric, RunOutcome, TrainConfig, TrainingRun};
