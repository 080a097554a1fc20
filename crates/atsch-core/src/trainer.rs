//! Training loop for the blacklisting predictor.
//!
//! Each iteration is fully independent: sample a random batch of pivots,
//! extract and normalize the past windows, score, simulate the future
//! windows under the baseline hopping schedule, reduce the attributed
//! errors, compose the objective, and hand the score gradient back to the
//! predictor. No cross-iteration state exists beyond the predictor's
//! parameters and its optimizer moments.
//!
//! There is no retry logic: training is offline and operator-supervised,
//! so a failed iteration aborts the run carrying the iteration index and
//! pivot range needed to reproduce it.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::link::{ErrorModel, LinkSimulator};
use crate::objective::ObjectiveComposer;
use crate::predictor::TrainableScorer;
use crate::reduction::{attribute_errors, ReductionPolicy};
use crate::resample::{NormStats, Resampler};
use crate::series::Series;
use crate::window::WindowExtractor;

/// Training-loop parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Number of iterations to train for.
    pub iterations: usize,
    /// Pivots sampled per iteration.
    pub batch_size: usize,
    /// Pivot-sampling seed.
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            batch_size: 32,
            seed: 0x7_5C_11,
        }
    }
}

/// Loss terms recorded after each iteration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IterationMetrics {
    pub iteration: usize,
    pub cross_entropy: f64,
    pub penalty: f64,
    pub total: f64,
}

/// Drives the sample → predict → simulate → compose → update cycle.
pub struct Trainer<'a, L, E> {
    series: &'a Series,
    stats: &'a NormStats,
    simulator: &'a L,
    error_model: &'a E,
    extractor: WindowExtractor,
    resampler: Resampler,
    policy: ReductionPolicy,
    composer: ObjectiveComposer,
    config: TrainerConfig,
    rng: StdRng,
}

impl<'a, L: LinkSimulator, E: ErrorModel> Trainer<'a, L, E> {
    /// Assemble a trainer over an immutable recording.
    ///
    /// `stats` must have been computed once over the training prefix of
    /// `series`; the trainer never recomputes them.
    pub fn new(
        series: &'a Series,
        stats: &'a NormStats,
        pipeline: &PipelineConfig,
        policy: ReductionPolicy,
        simulator: &'a L,
        error_model: &'a E,
        config: TrainerConfig,
    ) -> Self {
        assert!(
            config.iterations > 0 && config.batch_size > 0,
            "iterations and batch size must be non-zero"
        );
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            series,
            stats,
            simulator,
            error_model,
            extractor: WindowExtractor::from_config(pipeline),
            resampler: Resampler::from_rates(pipeline.sample_rate, pipeline.target_rate),
            policy,
            composer: ObjectiveComposer::for_policy(policy),
            config,
            rng,
        }
    }

    /// The reduction policy this trainer optimizes for.
    pub fn policy(&self) -> ReductionPolicy {
        self.policy
    }

    /// Run the configured number of iterations, mutating the scorer's
    /// parameters in place. Returns the per-iteration metric history.
    pub fn train<P: TrainableScorer>(&mut self, scorer: &mut P) -> Result<Vec<IterationMetrics>> {
        let mut history = Vec::with_capacity(self.config.iterations);
        for iteration in 0..self.config.iterations {
            let metrics = self.step(iteration, scorer)?;
            info!(
                iteration = iteration + 1,
                total = self.config.iterations,
                cross_entropy = metrics.cross_entropy,
                penalty = metrics.penalty,
                loss = metrics.total,
                reducer = self.policy.label(),
                "training step"
            );
            history.push(metrics);
        }
        Ok(history)
    }

    fn step<P: TrainableScorer>(
        &mut self,
        iteration: usize,
        scorer: &mut P,
    ) -> Result<IterationMetrics> {
        let pivots = self
            .extractor
            .training_pivots(self.series, self.config.batch_size, &mut self.rng);
        let pivot_min = *pivots.iter().min().expect("non-empty batch");
        let pivot_max = *pivots.iter().max().expect("non-empty batch");
        let attach = |source: PipelineError| PipelineError::Iteration {
            iteration,
            pivot_min,
            pivot_max,
            source: Box::new(source),
        };

        let (past, future) = self.extractor.extract(self.series, &pivots);

        // Forward pass through the predictor.
        let mut downsampled = self.resampler.downsample(&past);
        self.stats.standardize(&mut downsampled);
        let scores = scorer.forward(&downsampled);

        // Forward pass through the link simulation.
        let (interference, attribution) = self.simulator.baseline(&future);
        let bit_errors = self.error_model.apply(&interference);
        let contributions = attribute_errors(&bit_errors, &attribution);
        let effective = self
            .policy
            .reduce(&contributions, &attribution)
            .map_err(attach)?;

        // Loss, backward pass, optimizer step.
        let objective = self.composer.compose(&effective, &scores);
        scorer.backward(&objective.score_grad);
        scorer.apply_update();

        Ok(IterationMetrics {
            iteration,
            cross_entropy: objective.cross_entropy,
            penalty: objective.penalty,
            total: objective.total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::AvailabilityMask;
    use crate::link::SlotMatrix;
    use crate::predictor::{LogisticScorer, ScorerConfig};
    use crate::reduction::SlotTensor;
    use crate::series::WindowBatch;

    /// Round-robin hopping over a synthetic recording; deterministic and
    /// cheap enough for unit tests.
    struct RoundRobinLink;

    impl LinkSimulator for RoundRobinLink {
        fn baseline(&self, windows: &WindowBatch) -> (SlotMatrix, SlotTensor) {
            let mut interference = SlotMatrix::zeros(windows.steps(), windows.batch());
            let mut attribution =
                SlotTensor::zeros(windows.steps(), windows.batch(), windows.channels());
            for t in 0..windows.steps() {
                let channel = t % windows.channels();
                for b in 0..windows.batch() {
                    interference.set(t, b, windows.get(t, b, channel));
                    attribution.set(t, b, channel, 1.0);
                }
            }
            (interference, attribution)
        }

        fn adaptive(&self, windows: &WindowBatch, _rate_ratio: f64) -> SlotMatrix {
            self.baseline(windows).0
        }

        fn masked(
            &self,
            windows: &WindowBatch,
            _mask: &AvailabilityMask,
        ) -> Result<SlotMatrix> {
            Ok(self.baseline(windows).0)
        }
    }

    struct LinearError;

    impl ErrorModel for LinearError {
        fn bit_error(&self, interference_mw: f64) -> f64 {
            (interference_mw / 10.0).clamp(0.0, 0.5)
        }
    }

    fn test_pipeline() -> PipelineConfig {
        PipelineConfig {
            sample_rate: 40,
            target_rate: 8,
            past_window_s: 1,
            future_window_s: 1,
            channels: 4,
            exclusion_budget: 2,
            train_split_s: 8,
        }
    }

    fn test_series(pipeline: &PipelineConfig) -> Series {
        Series::from_fn(16 * pipeline.sample_rate, 1, pipeline.channels, |t, _, c| {
            // Channel 3 is persistently noisy, the rest mostly idle.
            if c == 3 {
                4.0
            } else {
                0.01 * ((t + c) % 5) as f64
            }
        })
    }

    #[test]
    fn test_training_records_one_metric_per_iteration() {
        let pipeline = test_pipeline();
        let series = test_series(&pipeline);
        let stats = NormStats::from_training_prefix(&series, pipeline.train_cutoff());
        let simulator = RoundRobinLink;
        let error_model = LinearError;
        let mut trainer = Trainer::new(
            &series,
            &stats,
            &pipeline,
            ReductionPolicy::WeightedMean,
            &simulator,
            &error_model,
            TrainerConfig {
                iterations: 12,
                batch_size: 4,
                seed: 3,
            },
        );
        let mut scorer = LogisticScorer::new(ScorerConfig {
            input_steps: pipeline.past_len_downsampled(),
            channels: pipeline.channels,
            ..Default::default()
        });

        let history = trainer.train(&mut scorer).unwrap();
        assert_eq!(history.len(), 12);
        for (i, metrics) in history.iter().enumerate() {
            assert_eq!(metrics.iteration, i);
            assert!(metrics.total.is_finite());
            assert!(metrics.cross_entropy >= 0.0);
            assert!((0.0..=1.0).contains(&metrics.penalty));
        }
    }

    #[test]
    fn test_max_policy_trains_with_heavier_penalty() {
        let pipeline = test_pipeline();
        let series = test_series(&pipeline);
        let stats = NormStats::from_training_prefix(&series, pipeline.train_cutoff());
        let simulator = RoundRobinLink;
        let error_model = LinearError;
        let mut trainer = Trainer::new(
            &series,
            &stats,
            &pipeline,
            ReductionPolicy::Max,
            &simulator,
            &error_model,
            TrainerConfig {
                iterations: 3,
                batch_size: 4,
                seed: 3,
            },
        );
        let mut scorer = LogisticScorer::new(ScorerConfig {
            input_steps: pipeline.past_len_downsampled(),
            channels: pipeline.channels,
            ..Default::default()
        });
        let history = trainer.train(&mut scorer).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(trainer.policy().penalty_weight(), 0.55);
    }
}
