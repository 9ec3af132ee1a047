use std::sync::atomic::Ordering;
use std::time::Instant;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::data::Example;
use crate::error::Result;
use crate::eval::{evaluate, Evaluation};
use crate::network::Network;
use crate::optim::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::train_epoch;

/// How a training run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Held-out error reached the goal.
    Converged,
    /// The iteration cap was hit first.
    IterationCapExceeded,
    /// The stop flag was raised or the progress receiver went away.
    Stopped,
}

/// One network being trained against one held-out fold. The run owns its
/// network; nothing else can touch the weights while it trains.
#[derive(Debug)]
pub struct TrainingRun {
    network: Network,
    test_fold_index: usize,
    iteration_count: usize,
    lowest_error_seen: f64,
    last_evaluation: Option<Evaluation>,
}

impl TrainingRun {
    pub fn new(network: Network, test_fold_index: usize) -> TrainingRun {
        TrainingRun {
            network,
            test_fold_index,
            iteration_count: 0,
            lowest_error_seen: f64::INFINITY,
            last_evaluation: None,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    pub fn test_fold_index(&self) -> usize {
        self.test_fold_index
    }

    pub fn iteration_count(&self) -> usize {
        self.iteration_count
    }

    /// Lowest held-out error of any iteration so far (infinite before the first).
    pub fn lowest_error_seen(&self) -> f64 {
        self.lowest_error_seen
    }

    /// Held-out evaluation from the most recent iteration.
    pub fn last_evaluation(&self) -> Option<&Evaluation> {
        self.last_evaluation.as_ref()
    }

    /// Discards all progress: the network goes back to its initial weights
    /// and the counters start over.
    pub fn restart(&mut self) {
        self.network.reset();
        self.iteration_count = 0;
        self.lowest_error_seen = f64::INFINITY;
        self.last_evaluation = None;
    }

    /// Alternates one training epoch over `training` with one evaluation on
    /// `held_out` until the held-out error is at or below the goal or the
    /// iteration cap is reached.
    ///
    /// Training examples are visited strictly in slice order every epoch.
    pub fn run(
        &mut self,
        training: &[&Example],
        held_out: &[Example],
        config: &TrainConfig,
    ) -> Result<RunOutcome> {
        config.validate()?;
        let optimizer = Sgd::new(config.learning_rate);

        loop {
            if is_stopped(config) {
                return Ok(RunOutcome::Stopped);
            }
            if self.iteration_count >= config.max_iterations {
                warn!(
                    "fold={} hit the iteration cap ({}) with lowest_error={:.6}",
                    self.test_fold_index, config.max_iterations, self.lowest_error_seen
                );
                return Ok(RunOutcome::IterationCapExceeded);
            }

            let t_start = Instant::now();
            let train_error = train_epoch(&mut self.network, training.iter().copied(), &optimizer)?;
            self.iteration_count += 1;

            let eval = evaluate(&self.network, held_out)?;
            let held_out_error = config.metric.of(&eval);
            self.lowest_error_seen = self.lowest_error_seen.min(held_out_error);
            self.last_evaluation = Some(eval);

            let stats = EpochStats {
                fold: self.test_fold_index,
                iteration: self.iteration_count,
                max_iterations: config.max_iterations,
                train_error,
                held_out_error,
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            };
            debug!(
                "fold={} iteration={}/{} train_error={:.6} held_out_error={:.6}",
                stats.fold,
                stats.iteration,
                stats.max_iterations,
                stats.train_error,
                stats.held_out_error
            );
            if let Some(ref tx) = config.progress_tx {
                // If the receiver has been dropped, stop training.
                if tx.send(stats).is_err() {
                    return Ok(RunOutcome::Stopped);
                }
            }

            if held_out_error <= config.goal_error {
                return Ok(RunOutcome::Converged);
            }
        }
    }
}

fn is_stopped(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}
