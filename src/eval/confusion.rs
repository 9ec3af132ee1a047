use serde::{Deserialize, Serialize};

use crate::data::Example;
use crate::error::{NnError, Result};
use crate::loss::MseLoss;
use crate::network::Network;

/// Confusion-matrix counters accumulated over every output component of
/// every example, plus the two aggregate error measures.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Evaluation {
    pub true_positive: usize,
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    /// (FP + FN) / (outputs × examples); 0 for an empty dataset.
    pub error_rate: f64,
    /// Mean over examples of the per-output mean squared error.
    pub mean_squared_error: f64,
}

impl Evaluation {
    pub fn total(&self) -> usize {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }

    pub fn accuracy(&self) -> f64 {
        if self.total() == 0 { 0.0 } else { 1.0 - self.error_rate }
    }
}

/// Scores `network` on `dataset`: each continuous output is rounded to the
/// nearest of 0 and 1 and compared with the matching label component.
pub fn evaluate(network: &Network, dataset: &[Example]) -> Result<Evaluation> {
    let mut eval = Evaluation::default();
    let mut squared = 0.0;

    for example in dataset {
        if example.num_outputs() != network.num_outputs() {
            return Err(NnError::DimensionMismatch {
                context: "example label",
                expected: network.num_outputs(),
                got: example.num_outputs(),
            });
        }
        let outputs = network.predict(example.features())?;
        squared += MseLoss::loss(&outputs, example.label());

        for (output, &expected) in outputs.iter().zip(example.label()) {
            let predicted = output.round() >= 1.0;
            match (predicted, expected == 1) {
                (true, true) => eval.true_positive += 1,
                (false, false) => eval.true_negative += 1,
                (true, false) => eval.false_positive += 1,
                (false, true) => eval.false_negative += 1,
            }
        }
    }

    if !dataset.is_empty() {
        let comparisons = (network.num_outputs() * dataset.len()) as f64;
        eval.error_rate = (eval.false_positive + eval.false_negative) as f64 / comparisons;
        eval.mean_squared_error = squared / dataset.len() as f64;
    }
    Ok(eval)
}
