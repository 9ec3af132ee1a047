use crate::error::Result;
use crate::layers::Perceptron;

/// Online gradient descent with a fixed learning rate. No momentum, no decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Weight deltas for one unit: `learning_rate * signal * input_k` for each input.
    pub fn deltas(&self, signal: f64, inputs: &[f64]) -> Vec<f64> {
        let scaled = self.learning_rate * signal;
        inputs.iter().map(|x| scaled * x).collect()
    }

    /// Applies one update to a perceptron given its error signal and the inputs it saw.
    pub fn step(&self, perceptron: &mut Perceptron, signal: f64, inputs: &[f64]) -> Result<()> {
        perceptron.update_weights(&self.deltas(signal, inputs))
    }
}
