use std::path::PathBuf;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::cv::folds::{partition_folds, training_examples, Fold, NUM_FOLDS};
use crate::cv::store::ModelStore;
use crate::data::{dimensions, Example};
use crate::error::{NnError, Result};
use crate::eval::{evaluate, Evaluation};
use crate::network::{ModelMetadata, Network, NetworkSpec};
use crate::train::{RunOutcome, TrainConfig, TrainingRun};

/// Settings for a full cross-validation.
///
/// # Fields
/// - `num_hidden_layers`, `hidden_size` — hidden topology; input and output
///   widths come from the data
/// - `train`           — per-fold training settings (goal, cap, learning rate)
/// - `validation_goal` — a converged network is kept only when its validation
///                       error is strictly below this
/// - `seed`            — fold `i` draws its weights from `seed + i`; `None`
///                       uses OS entropy
/// - `threads`         — size of a dedicated rayon pool; `None` uses the global pool
#[derive(Debug, Clone)]
pub struct CrossValidationConfig {
    pub num_hidden_layers: usize,
    pub hidden_size: usize,
    pub train: TrainConfig,
    pub validation_goal: f64,
    pub seed: Option<u64>,
    pub threads: Option<usize>,
}

impl Default for CrossValidationConfig {
    fn default() -> Self {
        CrossValidationConfig {
            num_hidden_layers: 1,
            hidden_size: 5,
            train: TrainConfig::default(),
            validation_goal: 0.05,
            seed: None,
            threads: None,
        }
    }
}

/// What happened to one fold.
#[derive(Debug, Clone)]
pub struct FoldReport {
    pub fold: usize,
    pub outcome: RunOutcome,
    pub iterations: usize,
    pub lowest_error: f64,
    /// Evaluation on the held-out fold after the last iteration.
    pub held_out: Evaluation,
    /// Evaluation used for the keep decision; only for converged folds.
    pub validation: Option<Evaluation>,
    /// `validation` under the configured metric.
    pub validation_error: Option<f64>,
    pub saved_to: Option<PathBuf>,
    pub network: Network,
}

impl FoldReport {
    pub fn is_saved(&self) -> bool {
        self.saved_to.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct CrossValidationReport {
    pub folds: Vec<FoldReport>,
}

impl CrossValidationReport {
    pub fn persisted(&self) -> impl Iterator<Item = &FoldReport> {
        self.folds.iter().filter(|f| f.is_saved())
    }

    /// The kept fold with the lowest validation error.
    pub fn best(&self) -> Option<&FoldReport> {
        self.persisted().min_by(|a, b| {
            let ea = a.validation_error.unwrap_or(f64::INFINITY);
            let eb = b.validation_error.unwrap_or(f64::INFINITY);
            ea.total_cmp(&eb)
        })
    }
}

/// Trains one network per fold, each against the other nine folds, and
/// keeps the converged ones that also do well on `validation`.
///
/// When `validation` is `None` the held-out fold doubles as the validation
/// set. Fold runs execute in parallel; each builds and owns its network.
pub fn cross_validate(
    dataset: &[Example],
    validation: Option<&[Example]>,
    config: &CrossValidationConfig,
    store: &dyn ModelStore,
) -> Result<CrossValidationReport> {
    let (num_inputs, num_outputs) = dimensions(dataset)?;
    if dataset.len() < NUM_FOLDS {
        return Err(NnError::Configuration(format!(
            "cross-validation needs at least {NUM_FOLDS} examples, got {}",
            dataset.len()
        )));
    }
    if let Some(validation) = validation {
        let (inputs, outputs) = dimensions(validation)?;
        if inputs != num_inputs {
            return Err(NnError::DimensionMismatch {
                context: "validation features",
                expected: num_inputs,
                got: inputs,
            });
        }
        if outputs != num_outputs {
            return Err(NnError::DimensionMismatch {
                context: "validation labels",
                expected: num_outputs,
                got: outputs,
            });
        }
    }
    if config.validation_goal.is_nan() {
        return Err(NnError::Configuration("validation goal must be a number".into()));
    }
    config.train.validate()?;
    let spec = NetworkSpec::new(
        num_inputs,
        config.num_hidden_layers,
        config.hidden_size,
        num_outputs,
    );
    spec.validate()?;

    let folds = partition_folds(dataset);
    info!(
        "cross-validating {} examples over {} folds: inputs={} hidden={}x{} outputs={}",
        dataset.len(),
        NUM_FOLDS,
        num_inputs,
        spec.num_hidden_layers,
        spec.hidden_size,
        num_outputs
    );

    let run_all = || -> Result<Vec<FoldReport>> {
        (0..NUM_FOLDS)
            .into_par_iter()
            .map(|index| run_fold(index, &folds, validation, &spec, config, store))
            .collect()
    };
    let reports = match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| NnError::Configuration(format!("cannot build thread pool: {e}")))?
            .install(run_all)?,
        None => run_all()?,
    };

    let report = CrossValidationReport { folds: reports };
    info!(
        "cross-validation finished: {} of {} folds kept",
        report.persisted().count(),
        NUM_FOLDS
    );
    Ok(report)
}

fn run_fold(
    index: usize,
    folds: &[Fold],
    validation: Option<&[Example]>,
    spec: &NetworkSpec,
    config: &CrossValidationConfig,
    store: &dyn ModelStore,
) -> Result<FoldReport> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => StdRng::from_entropy(),
    };
    let network = Network::new(spec, &mut rng)?;
    let training = training_examples(folds, index);
    let held_out = folds[index].examples();
    info!("fold={index} training on {} examples, holding out {}", training.len(), held_out.len());

    let mut run = TrainingRun::new(network, index);
    let outcome = run.run(&training, held_out, &config.train)?;
    let held_out_eval = run.last_evaluation().copied().unwrap_or_default();

    let mut validation_eval = None;
    let mut validation_error = None;
    let mut saved_to = None;
    if outcome == RunOutcome::Converged {
        let eval = evaluate(run.network(), validation.unwrap_or(held_out))?;
        let error = config.train.metric.of(&eval);
        if error < config.validation_goal {
            let metadata = ModelMetadata {
                description: Some(format!(
                    "fold {index} of {NUM_FOLDS}, {}x{} hidden",
                    spec.num_hidden_layers, spec.hidden_size
                )),
                fold: Some(index),
                iterations: Some(run.iteration_count()),
                validation_error: Some(error),
                learning_rate: Some(config.train.learning_rate),
            };
            let path = store.save(run.network(), &metadata)?;
            info!(
                "fold={index} kept with validation_error={error:.6}, saved to {}",
                path.display()
            );
            saved_to = Some(path);
        } else {
            info!("fold={index} converged but validation_error={error:.6} misses the goal");
        }
        validation_eval = Some(eval);
        validation_error = Some(error);
    }

    info!(
        "fold={index} finished: outcome={outcome:?} iterations={} lowest_error={:.6}",
        run.iteration_count(),
        run.lowest_error_seen()
    );
    Ok(FoldReport {
        fold: index,
        outcome,
        iterations: run.iteration_count(),
        lowest_error: run.lowest_error_seen(),
        held_out: held_out_eval,
        validation: validation_eval,
        validation_error,
        saved_to,
        network: run.into_network(),
    })
}
