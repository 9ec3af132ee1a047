use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::layers::{Layer, Perceptron};
use crate::network::metadata::ModelMetadata;
use crate::network::network::Network;
use crate::network::spec::NetworkSpec;

/// Value of the `format` field in every artifact written by this crate.
pub const FORMAT_TAG: &str = "crossfold-nn";
/// Bumped whenever the artifact layout changes incompatibly.
pub const FORMAT_VERSION: u32 = 1;

/// On-disk form of a Network: a header, the topology, then every layer's
/// weights (hidden layers input-side first, output layer last).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format: String,
    pub version: u32,
    pub num_inputs: usize,
    pub num_hidden_layers: usize,
    pub hidden_size: usize,
    pub num_outputs: usize,
    pub layers: Vec<LayerRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ModelMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerRecord {
    pub perceptrons: Vec<PerceptronRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerceptronRecord {
    pub weights: Vec<f64>,
    pub initial_weights: Vec<f64>,
}

impl ModelArtifact {
    pub fn from_network(network: &Network, metadata: Option<&ModelMetadata>) -> ModelArtifact {
        let spec = network.spec();
        let layers = network
            .hidden_layers()
            .iter()
            .chain(std::iter::once(network.output_layer()))
            .map(|layer| LayerRecord {
                perceptrons: layer
                    .perceptrons()
                    .iter()
                    .map(|p| PerceptronRecord {
                        weights: p.weights().to_vec(),
                        initial_weights: p.initial_weights().to_vec(),
                    })
                    .collect(),
            })
            .collect();

        ModelArtifact {
            format: FORMAT_TAG.to_string(),
            version: FORMAT_VERSION,
            num_inputs: spec.num_inputs,
            num_hidden_layers: spec.num_hidden_layers,
            hidden_size: spec.hidden_size,
            num_outputs: spec.num_outputs,
            layers,
            metadata: metadata.cloned(),
        }
    }

    pub fn spec(&self) -> NetworkSpec {
        NetworkSpec::new(
            self.num_inputs,
            self.num_hidden_layers,
            self.hidden_size,
            self.num_outputs,
        )
    }

    /// Checks the header and every dimension, then builds the Network.
    /// Nothing is returned unless the whole artifact is consistent.
    pub fn into_network(
        self,
        path: &Path,
    ) -> Result<(Network, Option<ModelMetadata>), PersistenceError> {
        if self.format != FORMAT_TAG || self.version != FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: self.format,
                version: self.version,
            });
        }

        let corrupt = |reason: String| PersistenceError::Corrupt {
            path: path.to_path_buf(),
            reason,
        };

        let spec = self.spec();
        spec.validate().map_err(|e| corrupt(e.to_string()))?;
        if self.layers.len() != spec.num_hidden_layers + 1 {
            return Err(corrupt(format!(
                "expected {} layers, found {}",
                spec.num_hidden_layers + 1,
                self.layers.len()
            )));
        }

        let mut layers = Vec::with_capacity(self.layers.len());
        for (depth, record) in self.layers.into_iter().enumerate() {
            let is_output = depth == spec.num_hidden_layers;
            let (size, fan_in) = if is_output {
                (spec.num_outputs, spec.hidden_size)
            } else {
                (spec.hidden_size, spec.hidden_fan_in(depth))
            };
            if record.perceptrons.len() != size {
                return Err(corrupt(format!(
                    "layer {depth} has {} perceptrons, expected {size}",
                    record.perceptrons.len()
                )));
            }

            let mut perceptrons = Vec::with_capacity(size);
            for (unit, p) in record.perceptrons.into_iter().enumerate() {
                if p.weights.len() != fan_in || p.initial_weights.len() != fan_in {
                    return Err(corrupt(format!(
                        "layer {depth} unit {unit} has {}/{} weights, expected {fan_in}",
                        p.weights.len(),
                        p.initial_weights.len()
                    )));
                }
                if p.weights.iter().chain(&p.initial_weights).any(|w| !w.is_finite()) {
                    return Err(corrupt(format!(
                        "layer {depth} unit {unit} has a non-finite weight"
                    )));
                }
                let perceptron = Perceptron::from_parts(p.weights, p.initial_weights)
                    .map_err(|e| corrupt(e.to_string()))?;
                perceptrons.push(perceptron);
            }
            layers.push(Layer::from_perceptrons(perceptrons).map_err(|e| corrupt(e.to_string()))?);
        }

        let output_layer = layers.pop().ok_or_else(|| corrupt("artifact has no layers".into()))?;
        let network =
            Network::from_layers(layers, output_layer).map_err(|e| corrupt(e.to_string()))?;
        Ok((network, self.metadata))
    }
}
