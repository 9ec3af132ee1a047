pub mod commands;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use crossfold_nn::data::{dimensions, load_csv, load_text_csv};
use crossfold_nn::{
    cross_validate, evaluate, DirectoryStore, Evaluation, Example, ExperimentConfig, LabelMode,
    Network, NnError,
};

use commands::{Commands, DataArgs, TestArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "crossfold-nn",
    version,
    about = "Cross-validated perceptron networks for binary classification."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => run_train(args),
            Commands::Test(args) => run_test(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ExperimentConfig::load_json(path).context("loading experiment config")?,
        None => ExperimentConfig::default(),
    };
    args.apply_overrides(&mut config);
    config.validate()?;

    let dataset = load(&args.data.data, &args.data)?;
    let validation = args
        .validation
        .as_deref()
        .map(|path| load(path, &args.data))
        .transpose()?;
    info!(
        "loaded {} examples from {}{}",
        dataset.len(),
        args.data.data.display(),
        validation
            .as_ref()
            .map(|v| format!(", {} validation examples", v.len()))
            .unwrap_or_default()
    );

    let (num_inputs, num_outputs) = dimensions(&dataset)?;
    let spec = config.network_spec(num_inputs, num_outputs);
    spec.validate()?;
    info!(
        "topology: inputs={} hidden={}x{} outputs={}",
        spec.num_inputs, spec.num_hidden_layers, spec.hidden_size, spec.num_outputs
    );

    let store = DirectoryStore::new(&config.output_dir);
    let report = cross_validate(
        &dataset,
        validation.as_deref(),
        &config.cross_validation_config(),
        &store,
    )?;

    for fold in &report.folds {
        println!(
            "fold {:>2}: {:<22} iterations={:<6} lowest_error={:.4} {}",
            fold.fold,
            format!("{:?}", fold.outcome),
            fold.iterations,
            fold.lowest_error,
            match (&fold.saved_to, fold.validation_error) {
                (Some(path), _) => format!("saved {}", path.display()),
                (None, Some(err)) => format!("rejected (validation_error={err:.4})"),
                (None, None) => String::new(),
            }
        );
    }
    let kept = report.persisted().count();
    println!("{kept} of {} folds kept in {}", report.folds.len(), config.output_dir.display());

    if let Some(test_path) = &args.test {
        let Some(best) = report.best() else {
            bail!("no fold produced a model to test");
        };
        let test = load(test_path, &args.data)?;
        let eval = evaluate(&best.network, &test)?;
        println!("best model (fold {}) on {}:", best.fold, test_path.display());
        print_evaluation(&eval);
    }
    Ok(())
}

fn run_test(args: TestArgs) -> Result<()> {
    let network = Network::load_json(&args.model).context("loading model")?;
    let dataset = load(&args.data.data, &args.data)?;
    check_fits(&network, &dataset)?;
    let eval = evaluate(&network, &dataset)?;
    print_evaluation(&eval);
    Ok(())
}

fn load(path: &Path, data: &DataArgs) -> Result<Vec<Example>> {
    let mode: LabelMode = data.label_mode;
    let examples = if data.text { load_text_csv(path, mode) } else { load_csv(path, mode) };
    examples.with_context(|| format!("loading {}", path.display()))
}

fn check_fits(network: &Network, dataset: &[Example]) -> Result<()> {
    let Some(first) = dataset.first() else {
        return Ok(());
    };
    if first.num_features() != network.num_inputs()
        || first.num_outputs() != network.num_outputs()
    {
        return Err(NnError::IncompatibleModel {
            expected_inputs: network.num_inputs(),
            expected_outputs: network.num_outputs(),
            inputs: first.num_features(),
            outputs: first.num_outputs(),
        }
        .into());
    }
    Ok(())
}

fn print_evaluation(eval: &Evaluation) {
    println!("              predicted 1  predicted 0");
    println!("actual 1      {:>11}  {:>11}", eval.true_positive, eval.false_negative);
    println!("actual 0      {:>11}  {:>11}", eval.false_positive, eval.true_negative);
    println!(
        "accuracy={:.4} error_rate={:.4} mse={:.6}",
        eval.accuracy(),
        eval.error_rate,
        eval.mean_squared_error
    );
}
