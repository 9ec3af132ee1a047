use crate::data::example::Example;
use crate::error::Result;

/// Length of the vectors produced by `char_frequencies`.
pub const ALPHABET_SIZE: usize = 26;

/// Relative frequency of each ASCII letter a–z in `text`, case-insensitive.
/// Non-letters are ignored; a text with no letters maps to all zeros.
pub fn char_frequencies(text: &str) -> Vec<f64> {
    let mut counts = [0usize; ALPHABET_SIZE];
    let mut total = 0usize;
    for c in text.chars().filter(char::is_ascii_alphabetic) {
        counts[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1;
        total += 1;
    }
    if total == 0 {
        return vec![0.0; ALPHABET_SIZE];
    }
    counts.iter().map(|&n| n as f64 / total as f64).collect()
}

pub fn text_example(text: &str, label: Vec<u8>) -> Result<Example> {
    Example::new(char_frequencies(text), label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequencies_sum_to_one_and_ignore_case() {
        let f = char_frequencies("AaB, b!");
        assert_eq!(f.len(), ALPHABET_SIZE);
        assert_eq!(f[0], 0.5);
        assert_eq!(f[1], 0.5);
        assert_eq!(f.iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn text_without_letters_is_all_zero() {
        assert_eq!(char_frequencies("1234 ?!"), vec![0.0; ALPHABET_SIZE]);
        assert_eq!(char_frequencies("é"), vec![0.0; ALPHABET_SIZE]);
    }
}
