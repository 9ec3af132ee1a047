pub mod confusion;

pub use confusion::{evaluate, Evaluation};
