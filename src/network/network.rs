use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{NnError, PersistenceError, Result};
use crate::layers::Layer;
use crate::network::artifact::ModelArtifact;
use crate::network::metadata::ModelMetadata;
use crate::network::spec::NetworkSpec;

/// One or more hidden layers followed by an output layer.
///
/// Hidden layer 0 reads the feature vector; each later hidden layer reads the
/// previous one; the output layer reads the last hidden layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    hidden_layers: Vec<Layer>,
    output_layer: Layer,
}

impl Network {
    /// Builds a network with fresh random weights drawn from `rng`.
    /// `spec` is validated before anything is allocated.
    pub fn new<R: Rng + ?Sized>(spec: &NetworkSpec, rng: &mut R) -> Result<Network> {
        spec.validate()?;
        let hidden_layers = (0..spec.num_hidden_layers)
            .map(|depth| Layer::new(spec.hidden_size, spec.hidden_fan_in(depth), rng))
            .collect::<Result<Vec<_>>>()?;
        let output_layer = Layer::new(spec.num_outputs, spec.hidden_size, rng)?;
        Ok(Network { hidden_layers, output_layer })
    }

    /// `Network::new` with a `StdRng` seeded from `seed`.
    pub fn seeded(spec: &NetworkSpec, seed: u64) -> Result<Network> {
        Network::new(spec, &mut StdRng::seed_from_u64(seed))
    }

    /// Assembles a network from existing layers, checking that every fan-in
    /// matches the size of the layer feeding it.
    pub fn from_layers(hidden_layers: Vec<Layer>, output_layer: Layer) -> Result<Network> {
        let first = hidden_layers.first().ok_or_else(|| {
            NnError::Configuration("the number of hidden layers must be greater than zero".into())
        })?;
        let hidden_size = first.size();
        for pair in hidden_layers.windows(2) {
            if pair[1].size() != hidden_size {
                return Err(NnError::Configuration(
                    "all hidden layers must have the same size".into(),
                ));
            }
            if pair[1].fan_in() != pair[0].size() {
                return Err(NnError::DimensionMismatch {
                    context: "hidden layer fan-in",
                    expected: pair[0].size(),
                    got: pair[1].fan_in(),
                });
            }
        }
        if output_layer.fan_in() != hidden_size {
            return Err(NnError::DimensionMismatch {
                context: "output layer fan-in",
                expected: hidden_size,
                got: output_layer.fan_in(),
            });
        }
        Ok(Network { hidden_layers, output_layer })
    }

    pub fn spec(&self) -> NetworkSpec {
        NetworkSpec {
            num_inputs: self.num_inputs(),
            num_hidden_layers: self.num_hidden_layers(),
            hidden_size: self.hidden_layers[0].size(),
            num_outputs: self.num_outputs(),
        }
    }

    pub fn num_inputs(&self) -> usize {
        self.hidden_layers[0].fan_in()
    }

    pub fn num_outputs(&self) -> usize {
        self.output_layer.size()
    }

    pub fn num_hidden_layers(&self) -> usize {
        self.hidden_layers.len()
    }

    pub fn hidden_layers(&self) -> &[Layer] {
        &self.hidden_layers
    }

    pub fn output_layer(&self) -> &Layer {
        &self.output_layer
    }

    /// Mutable access to both halves at once, for weight updates.
    pub fn layers_mut(&mut self) -> (&mut [Layer], &mut Layer) {
        (&mut self.hidden_layers, &mut self.output_layer)
    }

    /// Forward pass; caches every perceptron's output for backprop.
    /// Weights are never changed.
    pub fn forward(&mut self, features: &[f64]) -> Result<Vec<f64>> {
        let mut current = self.hidden_layers[0].forward(features)?;
        for layer in &mut self.hidden_layers[1..] {
            current = layer.forward(&current)?;
        }
        self.output_layer.forward(&current)
    }

    /// Inference-only forward pass that leaves the output caches alone.
    pub fn predict(&self, features: &[f64]) -> Result<Vec<f64>> {
        let mut current = self.hidden_layers[0].activate(features)?;
        for layer in &self.hidden_layers[1..] {
            current = layer.activate(&current)?;
        }
        self.output_layer.activate(&current)
    }

    /// Restores every perceptron to its construction-time weights.
    pub fn reset(&mut self) {
        for layer in &mut self.hidden_layers {
            layer.reset();
        }
        self.output_layer.reset();
    }

    /// Serializes the full network state to a pretty-printed JSON artifact.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), PersistenceError> {
        self.save_json_with_metadata(path, None)
    }

    /// Writes to `<path>.tmp` first and renames it over `path`, so a failed
    /// write never leaves a truncated artifact at `path`.
    pub fn save_json_with_metadata<P: AsRef<Path>>(
        &self,
        path: P,
        metadata: Option<&ModelMetadata>,
    ) -> std::result::Result<(), PersistenceError> {
        let path = path.as_ref();
        let io_err = |source: std::io::Error| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        };
        let artifact = ModelArtifact::from_network(self, metadata);
        let bytes = serde_json::to_vec_pretty(&artifact).map_err(|source| {
            PersistenceError::Malformed { path: path.to_path_buf(), source }
        })?;

        let tmp = temp_path(path);
        if let Err(source) = std::fs::write(&tmp, bytes) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(source));
        }
        std::fs::rename(&tmp, path).map_err(|source| {
            let _ = std::fs::remove_file(&tmp);
            io_err(source)
        })
    }

    /// Deserializes a network from an artifact previously written by `save_json`.
    pub fn load_json<P: AsRef<Path>>(path: P) -> std::result::Result<Network, PersistenceError> {
        Network::load_json_with_metadata(path).map(|(network, _)| network)
    }

    pub fn load_json_with_metadata<P: AsRef<Path>>(
        path: P,
    ) -> std::result::Result<(Network, Option<ModelMetadata>), PersistenceError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|source| PersistenceError::Io { path: path.to_path_buf(), source })?;
        let artifact: ModelArtifact = serde_json::from_slice(&bytes).map_err(|source| {
            PersistenceError::Malformed { path: path.to_path_buf(), source }
        })?;
        artifact.into_network(path)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
