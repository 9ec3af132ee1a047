use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crossfold_nn::data::builtin;
use crossfold_nn::{
    cross_validate, CrossValidationConfig, DirectoryStore, ErrorMetric, Example, MemoryStore,
    Network, NnError, RunOutcome,
    TrainConfig,
};

fn config(goal_error: f64, validation_goal: f64, seed: u64) -> CrossValidationConfig {
    CrossValidationConfig {
        num_hidden_layers: 1,
        hidden_size: 3,
        train: TrainConfig::new(0.5, goal_error, 20),
        validation_goal,
        seed: Some(seed),
        threads: Some(2),
    }
}

#[test]
fn every_fold_is_kept_when_all_goals_are_trivial() {
    let data = builtin::diagonal(40);
    let store = MemoryStore::new();
    let report = cross_validate(&data, None, &config(1.0, 1.5, 0), &store).unwrap();

    assert_eq!(report.folds.len(), 10);
    for (i, fold) in report.folds.iter().enumerate() {
        assert_eq!(fold.fold, i);
        assert_eq!(fold.outcome, RunOutcome::Converged);
        assert_eq!(fold.iterations, 1);
        assert_eq!(fold.held_out.total(), 4);
        assert!(fold.is_saved());
    }
    assert_eq!(report.persisted().count(), 10);
    assert!(report.best().is_some());

    let mut saved = store.into_saved();
    saved.sort_by_key(|(_, meta)| meta.fold);
    assert_eq!(saved.len(), 10);
    assert_eq!(saved[3].1.fold, Some(3));
    assert_eq!(saved[3].0, report.folds[3].network);
}

#[test]
fn nothing_is_kept_when_validation_goal_is_unreachable() {
    let data = builtin::diagonal(30);
    let store = MemoryStore::new();
    let report = cross_validate(&data, Some(&data), &config(1.0, 0.0, 5), &store).unwrap();
    assert_eq!(report.persisted().count(), 0);
    assert!(report.best().is_none());
    assert!(report
        .folds
        .iter()
        .all(|f| f.outcome == RunOutcome::Converged && f.validation.is_some()));
    assert_eq!(report.folds[0].validation.unwrap().total(), 30);
    assert!(store.into_saved().is_empty());
}

#[test]
fn unreachable_convergence_goal_hits_the_cap_everywhere() {
    let data = builtin::diagonal(20);
    // Sigmoid outputs never hit 0 or 1 exactly, so squared error never reaches zero.
    let mut cfg = config(0.0, 1.5, 1);
    cfg.train.metric = ErrorMetric::MeanSquared;
    cfg.train.max_iterations = 3;
    let report = cross_validate(&data, None, &cfg, &MemoryStore::new()).unwrap();
    assert!(report
        .folds
        .iter()
        .all(|f| f.outcome == RunOutcome::IterationCapExceeded
                && f.iterations == 3
                && !f.is_saved()));
}

#[test]
fn same_seed_gives_identical_folds() {
    let data = builtin::diagonal(50);
    let cfg = config(0.2, 0.5, 77);
    let a = cross_validate(&data, None, &cfg, &MemoryStore::new()).unwrap();
    let b = cross_validate(&data, None, &cfg, &MemoryStore::new()).unwrap();
    for (x, y) in a.folds.iter().zip(&b.folds) {
        assert_eq!(x.network, y.network);
        assert_eq!(x.iterations, y.iterations);
        assert_eq!(x.outcome, y.outcome);
    }
    assert_ne!(a.folds[0].network, a.folds[1].network);
}

#[test]
fn kept_models_are_written_to_the_directory() {
    let dir = std::env::temp_dir().join(format!("crossfold-nn-cv-{}", std::process::id()));
    let data = builtin::diagonal(20);
    let store = DirectoryStore::new(&dir);
    let report = cross_validate(&data, None, &config(1.0, 1.5, 2), &store).unwrap();

    for fold in &report.folds {
        let path = fold.saved_to.as_ref().unwrap();
        let (network, meta) = Network::load_json_with_metadata(path).unwrap();
        let meta = meta.unwrap();
        assert_eq!(meta.fold, Some(fold.fold));
        assert_eq!(
            meta.description.as_deref(),
            Some(format!("fold {} of 10, 1x3 hidden", fold.fold).as_str())
        );
        assert_eq!(meta.iterations, Some(1));
        for example in &data {
            assert_eq!(
                network.predict(example.features()).unwrap(),
                fold.network.predict(example.features()).unwrap()
            );
        }
    }
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn raised_stop_flag_stops_every_fold() {
    let data = builtin::diagonal(20);
    let mut cfg = config(1.0, 1.5, 3);
    cfg.train.stop_flag = Some(Arc::new(AtomicBool::new(true)));
    let report = cross_validate(&data, None, &cfg, &MemoryStore::new()).unwrap();
    assert!(report.folds.iter().all(|f| f.outcome == RunOutcome::Stopped && f.iterations == 0));
    assert_eq!(report.persisted().count(), 0);
}

#[test]
fn too_few_examples_is_a_configuration_error() {
    let err = cross_validate(&builtin::xor(), None, &config(1.0, 1.5, 0), &MemoryStore::new())
        .unwrap_err();
    assert!(matches!(err, NnError::Configuration(_)));
}

#[test]
fn validation_set_must_match_dataset_dimensions() {
    let data = builtin::diagonal(20);
    let validation = vec![Example::new(vec![0.1, 0.2, 0.3], vec![1]).unwrap()];
    let err = cross_validate(&data, Some(&validation), &config(1.0, 1.5, 0), &MemoryStore::new())
        .unwrap_err();
    assert!(matches!(err, NnError::DimensionMismatch { expected: 2, got: 3, .. }));
}

#[test]
fn invalid_hyperparameters_are_rejected_up_front() {
    let data = builtin::diagonal(20);
    let mut cfg = config(1.0, 1.5, 0);
    cfg.hidden_size = 0;
    assert!(matches!(
        cross_validate(&data, None, &cfg, &MemoryStore::new()),
        Err(NnError::Configuration(_))
    ));
    let mut cfg = config(1.0, 1.5, 0);
    cfg.train.learning_rate = 0.0;
    assert!(cross_validate(&data, None, &cfg, &MemoryStore::new()).is_err());
}
