pub mod dense;
pub mod perceptron;

pub use dense::Layer;
pub use perceptron::Perceptron;
