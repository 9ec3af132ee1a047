use rand::Rng;

use crate::error::{NnError, Result};
use crate::layers::perceptron::Perceptron;

/// A fully-connected layer: every perceptron sees the same input vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    perceptrons: Vec<Perceptron>,
    fan_in: usize,
}

impl Layer {
    /// `size` perceptrons, each with `fan_in` random weights. Both must be at least 1.
    pub fn new<R: Rng + ?Sized>(size: usize, fan_in: usize, rng: &mut R) -> Result<Layer> {
        if size == 0 {
            return Err(NnError::Configuration(
                "layer must have at least one perceptron".into(),
            ));
        }
        let perceptrons = (0..size)
            .map(|_| Perceptron::new(fan_in, rng))
            .collect::<Result<Vec<_>>>()?;
        Ok(Layer { perceptrons, fan_in })
    }

    /// Builds a layer from existing perceptrons, which must share one fan-in.
    pub fn from_perceptrons(perceptrons: Vec<Perceptron>) -> Result<Layer> {
        let fan_in = match perceptrons.first() {
            Some(p) => p.fan_in(),
            None => {
                return Err(NnError::Configuration(
                    "layer must have at least one perceptron".into(),
                ))
            }
        };
        if let Some(p) = perceptrons.iter().find(|p| p.fan_in() != fan_in) {
            return Err(NnError::DimensionMismatch {
                context: "layer fan-in",
                expected: fan_in,
                got: p.fan_in(),
            });
        }
        Ok(Layer { perceptrons, fan_in })
    }

    /// Number of perceptrons in this layer.
    pub fn size(&self) -> usize {
        self.perceptrons.len()
    }

    pub fn fan_in(&self) -> usize {
        self.fan_in
    }

    pub fn perceptrons(&self) -> &[Perceptron] {
        &self.perceptrons
    }

    pub fn perceptrons_mut(&mut self) -> &mut [Perceptron] {
        &mut self.perceptrons
    }

    /// Fires every perceptron on `inputs`, in order, caching each output.
    pub fn forward(&mut self, inputs: &[f64]) -> Result<Vec<f64>> {
        self.check_inputs(inputs)?;
        self.perceptrons.iter_mut().map(|p| p.forward(inputs)).collect()
    }

    /// Same as `forward` but leaves the output caches untouched.
    pub fn activate(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        self.check_inputs(inputs)?;
        self.perceptrons.iter().map(|p| p.activate(inputs)).collect()
    }

    /// Outputs cached by the most recent `forward`.
    pub fn last_outputs(&self) -> Result<Vec<f64>> {
        self.perceptrons.iter().map(Perceptron::last_output).collect()
    }

    pub fn reset(&mut self) {
        for p in &mut self.perceptrons {
            p.reset();
        }
    }

    // Checked up front so a bad vector never leaves half the layer fired.
    fn check_inputs(&self, inputs: &[f64]) -> Result<()> {
        if inputs.len() != self.fan_in {
            return Err(NnError::DimensionMismatch {
                context: "layer inputs",
                expected: self.fan_in,
                got: inputs.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn forward_returns_one_output_per_perceptron_in_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut layer = Layer::new(4, 3, &mut rng).unwrap();
        let inputs = [0.2, -0.4, 0.9];
        let outputs = layer.forward(&inputs).unwrap();
        assert_eq!(outputs.len(), 4);
        for (p, out) in layer.perceptrons().iter().zip(&outputs) {
            assert_eq!(p.activate(&inputs).unwrap(), *out);
        }
        assert_eq!(layer.last_outputs().unwrap(), outputs);
    }

    #[test]
    fn activate_does_not_fire() {
        let mut rng = StdRng::seed_from_u64(2);
        let layer = Layer::new(2, 2, &mut rng).unwrap();
        layer.activate(&[1.0, 1.0]).unwrap();
        assert!(layer.last_outputs().is_err());
    }

    #[test]
    fn mismatched_input_fires_nothing() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut layer = Layer::new(2, 2, &mut rng).unwrap();
        assert!(layer.forward(&[1.0]).is_err());
        assert!(layer.last_outputs().is_err());
    }

    #[test]
    fn reset_resets_every_perceptron() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut layer = Layer::new(3, 2, &mut rng).unwrap();
        let before = layer.clone();
        for p in layer.perceptrons_mut() {
            p.update_weights(&[0.5, -0.5]).unwrap();
        }
        layer.forward(&[1.0, 0.0]).unwrap();
        layer.reset();
        assert_eq!(layer, before);
    }

    #[test]
    fn empty_shapes_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(Layer::new(0, 3, &mut rng), Err(NnError::Configuration(_))));
        assert!(matches!(Layer::new(3, 0, &mut rng), Err(NnError::Configuration(_))));
    }

    #[test]
    fn from_perceptrons_requires_shared_fan_in() {
        let a = Perceptron::from_parts(vec![0.1, 0.2], vec![0.1, 0.2]).unwrap();
        let b = Perceptron::from_parts(vec![0.3], vec![0.3]).unwrap();
        assert!(Layer::from_perceptrons(vec![a.clone(), b]).is_err());
        assert!(Layer::from_perceptrons(vec![]).is_err());
        assert_eq!(Layer::from_perceptrons(vec![a]).unwrap().fan_in(), 2);
    }
}
