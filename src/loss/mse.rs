pub struct MseLoss;

impl MseLoss {
    /// Sum of squared errors: sum((expected - predicted)²)
    pub fn sum_squared(predicted: &[f64], expected: &[u8]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(p, &e)| (f64::from(e) - p).powi(2))
            .sum()
    }

    /// Scalar MSE: mean((expected - predicted)²) over the output components
    pub fn loss(predicted: &[f64], expected: &[u8]) -> f64 {
        if predicted.is_empty() {
            return 0.0;
        }
        MseLoss::sum_squared(predicted, expected) / predicted.len() as f64
    }
}
