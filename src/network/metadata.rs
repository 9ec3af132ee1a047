use serde::{Deserialize, Serialize};

/// Optional annotations attached to a saved Network.
/// All fields are Option<> so models saved without them deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModelMetadata {
    pub description: Option<String>,
    /// Index of the held-out fold the network was trained against.
    pub fold: Option<usize>,
    /// Training iterations (epochs) the network went through.
    pub iterations: Option<usize>,
    /// Error on the validation set at the time the model was kept.
    pub validation_error: Option<f64>,
    pub learning_rate: Option<f64>,
}
