use std::path::PathBuf;

/// The result type used across the crate.
pub type Result<T> = std::result::Result<T, NnError>;

/// Errors raised by network construction, training, evaluation and ingestion.
#[derive(Debug, thiserror::Error)]
pub enum NnError {
    /// Invalid topology or hyperparameters. Raised before anything is allocated.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("dimension mismatch in {context}: expected {expected}, got {got}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("illegal state: {0}")]
    IllegalState(&'static str),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// A malformed input row. `row` is 1-based.
    #[error("row {row}: {message}")]
    DataFormat { row: usize, message: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A model that loaded fine but does not fit the data it is applied to.
    #[error(
        "model expects {expected_inputs} inputs and {expected_outputs} outputs, \
         data has {inputs} and {outputs}"
    )]
    IncompatibleModel {
        expected_inputs: usize,
        expected_outputs: usize,
        inputs: usize,
        outputs: usize,
    },
}

/// Errors raised while saving or loading a model artifact.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("i/o error on model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model artifact {} is not readable: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("model artifact {} has format {format:?} version {version}", path.display())]
    UnsupportedFormat {
        path: PathBuf,
        format: String,
        version: u32,
    },

    #[error("model artifact {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
}
