use rand::Rng;

use crate::activation::sigmoid;
use crate::error::{NnError, Result};

/// A single sigmoid unit with no bias term.
///
/// The weighted inputs are averaged over the fan-in (not summed) before the
/// activation is applied. The weights drawn at construction are kept as a
/// frozen snapshot so `reset` can restore them exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Perceptron {
    weights: Vec<f64>,
    initial_weights: Vec<f64>,
    last_output: Option<f64>,
}

impl Perceptron {
    /// Draws `fan_in` weights uniformly from [-1, 1]. `fan_in` must be at least 1.
    pub fn new<R: Rng + ?Sized>(fan_in: usize, rng: &mut R) -> Result<Perceptron> {
        if fan_in == 0 {
            return Err(NnError::Configuration(
                "perceptron must have at least one weight".into(),
            ));
        }
        let weights: Vec<f64> = (0..fan_in).map(|_| rng.gen_range(-1.0..=1.0)).collect();
        Ok(Perceptron {
            initial_weights: weights.clone(),
            weights,
            last_output: None,
        })
    }

    /// Rebuilds a perceptron from persisted state. Both vectors must be
    /// non-empty and of equal length.
    pub fn from_parts(weights: Vec<f64>, initial_weights: Vec<f64>) -> Result<Perceptron> {
        if weights.is_empty() {
            return Err(NnError::Configuration("perceptron must have at least one weight".into()));
        }
        if weights.len() != initial_weights.len() {
            return Err(NnError::DimensionMismatch {
                context: "perceptron initial weights",
                expected: weights.len(),
                got: initial_weights.len(),
            });
        }
        Ok(Perceptron { weights, initial_weights, last_output: None })
    }

    pub fn fan_in(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn initial_weights(&self) -> &[f64] {
        &self.initial_weights
    }

    /// Computes the unit's output without recording it.
    pub fn activate(&self, inputs: &[f64]) -> Result<f64> {
        if inputs.len() != self.weights.len() {
            return Err(NnError::DimensionMismatch {
                context: "perceptron inputs",
                expected: self.weights.len(),
                got: inputs.len(),
            });
        }
        let sum: f64 = inputs.iter().zip(&self.weights).map(|(x, w)| x * w).sum();
        let mean = sum / self.weights.len() as f64;
        Ok(sigmoid(mean))
    }

    /// Fires the unit and remembers the output for backpropagation.
    pub fn forward(&mut self, inputs: &[f64]) -> Result<f64> {
        let output = self.activate(inputs)?;
        self.last_output = Some(output);
        Ok(output)
    }

    pub fn last_output(&self) -> Result<f64> {
        self.last_output.ok_or(NnError::IllegalState("perceptron has not fired yet"))
    }

    /// Adds `deltas` to the weights element-wise.
    pub fn update_weights(&mut self, deltas: &[f64]) -> Result<()> {
        if deltas.len() != self.weights.len() {
            return Err(NnError::DimensionMismatch {
                context: "perceptron weight deltas",
                expected: self.weights.len(),
                got: deltas.len(),
            });
        }
        for (w, d) in self.weights.iter_mut().zip(deltas) {
            *w += d;
        }
        Ok(())
    }

    /// Restores the construction-time weights and forgets the last output.
    pub fn reset(&mut self) {
        self.weights.copy_from_slice(&self.initial_weights);
        self.last_output = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit(weights: Vec<f64>) -> Perceptron {
        Perceptron::from_parts(weights.clone(), weights).unwrap()
    }

    #[test]
    fn random_weights_fall_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let p = Perceptron::new(500, &mut rng).unwrap();
        assert_eq!(p.fan_in(), 500);
        assert!(p.weights().iter().all(|w| (-1.0..=1.0).contains(w)));
        assert_eq!(p.weights(), p.initial_weights());
    }

    #[test]
    fn forward_averages_weighted_inputs() {
        let mut p = unit(vec![1.0, 3.0]);
        // mean of [2*1, 1*3] is 2.5
        let out = p.forward(&[2.0, 1.0]).unwrap();
        assert_eq!(out, 1.0 / (1.0 + (-2.5f64).exp()));
        assert_eq!(p.last_output().unwrap(), out);
    }

    #[test]
    fn output_is_strictly_between_zero_and_one() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let mut p = Perceptron::new(4, &mut rng).unwrap();
            let inputs: Vec<f64> = (0..4).map(|_| rng.gen_range(-100.0..100.0)).collect();
            let out = p.forward(&inputs).unwrap();
            assert!(out > 0.0 && out < 1.0);
        }
    }

    #[test]
    fn wrong_input_length_is_rejected() {
        let mut p = unit(vec![0.5, 0.5]);
        let err = p.forward(&[1.0]).unwrap_err();
        assert!(matches!(err, NnError::DimensionMismatch { expected: 2, got: 1, .. }));
        assert!(p.last_output().is_err());
    }

    #[test]
    fn unfired_perceptron_has_no_output() {
        let p = unit(vec![0.1]);
        assert!(matches!(p.last_output(), Err(NnError::IllegalState(_))));
    }

    #[test]
    fn update_with_wrong_length_changes_nothing() {
        let mut p = unit(vec![0.1, 0.2]);
        assert!(p.update_weights(&[1.0, 1.0, 1.0]).is_err());
        assert_eq!(p.weights(), &[0.1, 0.2]);
    }

    #[test]
    fn reset_restores_snapshot_bit_for_bit() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut p = Perceptron::new(3, &mut rng).unwrap();
        let snapshot: Vec<u64> = p.weights().iter().map(|w| w.to_bits()).collect();
        for i in 0..50 {
            p.update_weights(&[0.013 * i as f64, -0.7, 1e-9]).unwrap();
            p.forward(&[1.0, 2.0, 3.0]).unwrap();
        }
        assert_ne!(p.weights(), p.initial_weights());
        p.reset();
        let restored: Vec<u64> = p.weights().iter().map(|w| w.to_bits()).collect();
        assert_eq!(restored, snapshot);
        assert!(p.last_output().is_err());
    }

    #[test]
    fn zero_fan_in_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = Perceptron::new(0, &mut rng).unwrap_err();
        assert!(matches!(err, NnError::Configuration(_)));
    }

    #[test]
    fn from_parts_rejects_mismatched_snapshot() {
        assert!(Perceptron::from_parts(vec![0.1, 0.2], vec![0.1]).is_err());
        assert!(Perceptron::from_parts(vec![], vec![]).is_err());
    }
}
