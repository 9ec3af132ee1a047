pub mod cross_validator;
pub mod folds;
pub mod store;

pub use cross_validator::{cross_validate, CrossValidationConfig, CrossValidationReport, FoldReport};
pub use folds::{partition_folds, partition_into, training_examples, Fold, NUM_FOLDS};
pub use store::{DirectoryStore, MemoryStore, ModelStore};
