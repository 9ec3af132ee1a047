use crate::data::Example;
use crate::error::{NnError, Result};

/// Number of folds used by cross-validation.
pub const NUM_FOLDS: usize = 10;

/// One disjoint slice of the dataset, in the dataset's original order.
#[derive(Debug, Clone, PartialEq)]
pub struct Fold {
    index: usize,
    examples: Vec<Example>,
}

impl Fold {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

/// Splits `dataset` into `NUM_FOLDS` folds round-robin.
pub fn partition_folds(dataset: &[Example]) -> Vec<Fold> {
    round_robin(dataset, NUM_FOLDS)
}

/// Round-robin split into `k` folds: fold `i` holds every example whose
/// index `j` satisfies `j % k == i`.
pub fn partition_into(dataset: &[Example], k: usize) -> Result<Vec<Fold>> {
    if k == 0 {
        return Err(NnError::Configuration("fold count must be at least 1".into()));
    }
    Ok(round_robin(dataset, k))
}

fn round_robin(dataset: &[Example], k: usize) -> Vec<Fold> {
    let mut folds: Vec<Fold> = (0..k).map(|index| Fold { index, examples: Vec::new() }).collect();
    for (j, example) in dataset.iter().enumerate() {
        folds[j % k].examples.push(example.clone());
    }
    folds
}

/// Every example outside fold `held_out`, fold by fold in index order.
pub fn training_examples(folds: &[Fold], held_out: usize) -> Vec<&Example> {
    folds
        .iter()
        .filter(|fold| fold.index != held_out)
        .flat_map(|fold| fold.examples.iter())
        .collect()
}
