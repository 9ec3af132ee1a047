pub mod builtin;
pub mod csv;
pub mod example;
pub mod features;

pub use csv::{load_csv, load_text_csv, parse_csv, parse_text_csv, LabelMode};
pub use example::{dimensions, Example};
pub use features::char_frequencies;
