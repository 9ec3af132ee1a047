/// Pre-activation magnitude beyond which the logistic curve rounds to exactly
/// 0.0 or 1.0 in f64. Clamping here keeps every output strictly inside (0, 1).
const SATURATION: f64 = 36.0;

/// Logistic activation: 1 / (1 + e^-x).
pub fn sigmoid(x: f64) -> f64 {
    let x = x.clamp(-SATURATION, SATURATION);
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid derivative written in terms of the unit's own output:
/// σ'(z) = σ(z)·(1 − σ(z)).
pub fn derivative_from_output(output: f64) -> f64 {
    output * (1.0 - output)
}
