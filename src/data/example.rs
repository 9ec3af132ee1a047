use crate::error::{NnError, Result};

/// One labelled datapoint: a feature vector and a 0/1 label per output unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    features: Vec<f64>,
    label: Vec<u8>,
}

impl Example {
    /// Both vectors must be non-empty and every label component 0 or 1.
    pub fn new(features: Vec<f64>, label: Vec<u8>) -> Result<Example> {
        if features.is_empty() {
            return Err(NnError::DataFormat { row: 0, message: "example has no features".into() });
        }
        if label.is_empty() {
            return Err(NnError::DataFormat { row: 0, message: "example has no label".into() });
        }
        if let Some(bad) = label.iter().find(|&&c| c > 1) {
            return Err(NnError::DataFormat {
                row: 0,
                message: format!("label component {bad} is not 0 or 1"),
            });
        }
        Ok(Example { features, label })
    }

    /// For rows whose shape is known to be valid at compile time.
    pub(crate) fn from_static(features: &[f64], label: &[u8]) -> Example {
        debug_assert!(!features.is_empty() && !label.is_empty() && label.iter().all(|&c| c <= 1));
        Example { features: features.to_vec(), label: label.to_vec() }
    }

    pub fn features(&self) -> &[f64] {
        &self.features
    }

    pub fn label(&self) -> &[u8] {
        &self.label
    }

    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.label.len()
    }
}

/// Feature and label widths shared by every example in `examples`.
pub fn dimensions(examples: &[Example]) -> Result<(usize, usize)> {
    let first = examples
        .first()
        .ok_or_else(|| NnError::Configuration("dataset is empty".into()))?;
    let dims = (first.num_features(), first.num_outputs());
    for (i, ex) in examples.iter().enumerate() {
        if ex.num_features() != dims.0 {
            return Err(NnError::DataFormat {
                row: i + 1,
                message: format!("{} features, expected {}", ex.num_features(), dims.0),
            });
        }
        if ex.num_outputs() != dims.1 {
            return Err(NnError::DataFormat {
                row: i + 1,
                message: format!("{} label components, expected {}", ex.num_outputs(), dims.1),
            });
        }
    }
    Ok(dims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_must_be_binary() {
        assert!(Example::new(vec![1.0], vec![2]).is_err());
        assert!(Example::new(vec![1.0], vec![]).is_err());
        assert!(Example::new(vec![], vec![1]).is_err());
        let ex = Example::new(vec![0.5, 0.25], vec![0, 1]).unwrap();
        assert_eq!(ex.num_features(), 2);
        assert_eq!(ex.num_outputs(), 2);
    }

    #[test]
    fn dimensions_detect_ragged_rows() {
        let a = Example::new(vec![1.0, 2.0], vec![1]).unwrap();
        let b = Example::new(vec![1.0], vec![1]).unwrap();
        assert_eq!(dimensions(&[a.clone(), a.clone()]).unwrap(), (2, 1));
        let err = dimensions(&[a, b]).unwrap_err();
        assert!(matches!(err, NnError::DataFormat { row: 2, .. }));
        assert!(dimensions(&[]).is_err());
    }
}
