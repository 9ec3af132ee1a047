use serde::{Deserialize, Serialize};

use crate::error::{NnError, Result};

/// Topology of a network: `num_hidden_layers` hidden layers of `hidden_size`
/// perceptrons each, followed by an output layer of `num_outputs` units.
///
/// Fields:
/// - `num_inputs`        — length of every feature vector fed to the network
/// - `num_hidden_layers` — at least 1
/// - `hidden_size`       — perceptrons per hidden layer
/// - `num_outputs`       — one sigmoid unit per label component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub num_inputs: usize,
    pub num_hidden_layers: usize,
    pub hidden_size: usize,
    pub num_outputs: usize,
}

impl NetworkSpec {
    pub fn new(
        num_inputs: usize,
        num_hidden_layers: usize,
        hidden_size: usize,
        num_outputs: usize,
    ) -> NetworkSpec {
        NetworkSpec { num_inputs, num_hidden_layers, hidden_size, num_outputs }
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_hidden_layers < 1 {
            return Err(NnError::Configuration(
                "the number of hidden layers must be greater than zero".into(),
            ));
        }
        if self.num_inputs == 0 {
            return Err(NnError::Configuration(
                "the number of inputs must be greater than zero".into(),
            ));
        }
        if self.hidden_size == 0 {
            return Err(NnError::Configuration(
                "hidden layers must have at least one perceptron".into(),
            ));
        }
        if self.num_outputs == 0 {
            return Err(NnError::Configuration(
                "the number of outputs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Fan-in of hidden layer `depth` (0 = input-adjacent).
    pub fn hidden_fan_in(&self, depth: usize) -> usize {
        if depth == 0 { self.num_inputs } else { self.hidden_size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_hidden_layers_is_a_configuration_error() {
        let err = NetworkSpec::new(2, 0, 3, 1).validate().unwrap_err();
        assert!(matches!(err, NnError::Configuration(_)));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(NetworkSpec::new(0, 1, 3, 1).validate().is_err());
        assert!(NetworkSpec::new(2, 1, 0, 1).validate().is_err());
        assert!(NetworkSpec::new(2, 1, 3, 0).validate().is_err());
        assert!(NetworkSpec::new(2, 2, 3, 1).validate().is_ok());
    }

    #[test]
    fn fan_in_chains_through_hidden_layers() {
        let spec = NetworkSpec::new(26, 3, 5, 1);
        assert_eq!(spec.hidden_fan_in(0), 26);
        assert_eq!(spec.hidden_fan_in(1), 5);
        assert_eq!(spec.hidden_fan_in(2), 5);
    }
}
