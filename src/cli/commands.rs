use std::path::PathBuf;

use clap::{Args, Subcommand};

use crossfold_nn::{ErrorMetric, ExperimentConfig, LabelMode};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cross-validate networks on a dataset and save the ones that pass validation
    Train(TrainArgs),

    /// Score a saved model on a dataset
    Test(TestArgs),
}

/// Dataset selection shared by both subcommands.
#[derive(Args, Debug)]
pub struct DataArgs {
    /// CSV file with the examples
    #[arg(long)]
    pub data: PathBuf,

    /// binary, class:N or vector:N
    #[arg(long, default_value = "binary")]
    pub label_mode: LabelMode,

    /// Rows are text followed by the label; features are letter frequencies
    #[arg(long)]
    pub text: bool,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Separate validation CSV; the held-out fold is used when absent
    #[arg(long)]
    pub validation: Option<PathBuf>,

    /// After training, score the best kept model on this CSV
    #[arg(long)]
    pub test: Option<PathBuf>,

    /// JSON experiment config; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long)]
    pub hidden_layers: Option<usize>,

    #[arg(long)]
    pub hidden_size: Option<usize>,

    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Held-out error at which a fold stops training
    #[arg(long)]
    pub goal: Option<f64>,

    /// Validation error a converged network must beat to be saved
    #[arg(long)]
    pub validation_goal: Option<f64>,

    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Measure errors as mean squared error instead of error rate
    #[arg(long)]
    pub mean_squared: bool,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads for the fold runs
    #[arg(long)]
    pub threads: Option<usize>,
}

impl TrainArgs {
    /// Applies every flag that was given on top of `config`.
    pub fn apply_overrides(&self, config: &mut ExperimentConfig) {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(v) = self.hidden_layers {
            config.hidden_layers = v;
        }
        if let Some(v) = self.hidden_size {
            config.hidden_size = v;
        }
        if let Some(v) = self.learning_rate {
            config.learning_rate = v;
        }
        if let Some(v) = self.goal {
            config.goal_error = v;
        }
        if let Some(v) = self.validation_goal {
            config.validation_goal = v;
        }
        if let Some(v) = self.max_iterations {
            config.max_iterations = v;
        }
        if self.mean_squared {
            config.metric = ErrorMetric::MeanSquared;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }
    }
}

#[derive(Args, Debug)]
pub struct TestArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Model artifact written by `train`
    #[arg(long)]
    pub model: PathBuf,
}
