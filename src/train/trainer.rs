use crate::activation::derivative_from_output;
use crate::data::Example;
use crate::error::{NnError, Result};
use crate::layers::Layer;
use crate::loss::MseLoss;
use crate::network::Network;
use crate::optim::Sgd;

/// One online backpropagation step: a forward pass on `example` followed by
/// an in-place weight update of every layer, output layer first.
///
/// Each layer's propagated error for the layer feeding it is computed from
/// its weights *before* they are updated. Returns the example's summed
/// squared error as measured by the forward pass.
pub fn backpropagate(network: &mut Network, example: &Example, optimizer: &Sgd) -> Result<f64> {
    if example.num_outputs() != network.num_outputs() {
        return Err(NnError::DimensionMismatch {
            context: "example label",
            expected: network.num_outputs(),
            got: example.num_outputs(),
        });
    }

    let predicted = network.forward(example.features())?;
    let expected = example.label();
    let (hidden, output) = network.layers_mut();

    // Output layer: err_i = p_i (1 - p_i) (e_i - p_i).
    let output_signals: Vec<f64> = predicted
        .iter()
        .zip(expected)
        .map(|(&p, &e)| derivative_from_output(p) * (f64::from(e) - p))
        .collect();
    let mut propagated = propagate(output, &output_signals);
    let last_hidden = hidden[hidden.len() - 1].last_outputs()?;
    apply(output, &output_signals, &last_hidden, optimizer)?;

    // Hidden layers, output side first. `propagated` always holds the error
    // reaching the outputs of the layer at `depth`.
    for depth in (0..hidden.len()).rev() {
        let inputs = if depth == 0 {
            example.features().to_vec()
        } else {
            hidden[depth - 1].last_outputs()?
        };
        let layer = &mut hidden[depth];
        let signals: Vec<f64> = propagated
            .iter()
            .zip(layer.last_outputs()?)
            .map(|(err, o)| err * derivative_from_output(o))
            .collect();
        if depth > 0 {
            propagated = propagate(layer, &signals);
        }
        apply(layer, &signals, &inputs, optimizer)?;
    }

    Ok(MseLoss::sum_squared(&predicted, expected))
}

/// Runs `backpropagate` over `examples` in iteration order.
/// Returns the mean summed squared error per example (0 for no examples).
pub fn train_epoch<'a, I>(network: &mut Network, examples: I, optimizer: &Sgd) -> Result<f64>
where
    I: IntoIterator<Item = &'a Example>,
{
    let mut total = 0.0;
    let mut count = 0usize;
    for example in examples {
        total += backpropagate(network, example, optimizer)?;
        count += 1;
    }
    Ok(if count == 0 { 0.0 } else { total / count as f64 })
}

/// Error reaching each input of `layer`: sum over units of signal × weight.
fn propagate(layer: &Layer, signals: &[f64]) -> Vec<f64> {
    let mut acc = vec![0.0; layer.fan_in()];
    for (unit, signal) in layer.perceptrons().iter().zip(signals) {
        for (a, w) in acc.iter_mut().zip(unit.weights()) {
            *a += signal * w;
        }
    }
    acc
}

fn apply(layer: &mut Layer, signals: &[f64], inputs: &[f64], optimizer: &Sgd) -> Result<()> {
    for (unit, &signal) in layer.perceptrons_mut().iter_mut().zip(signals) {
        optimizer.step(unit, signal, inputs)?;
    }
    Ok(())
}
