//! Whole-recording evaluation of a trained predictor.
//!
//! The evaluator runs the pipeline once, without parameter updates, over
//! the deterministic pivot grid in a single batched pass. Scores are
//! thresholded into the hard availability mask, the simulator hops over the
//! surviving channels, and the per-pivot outputs are stitched back into one
//! continuous reception series: the first `pastLen` samples — the portion
//! with no decision history — come verbatim from the unrestricted baseline
//! schedule, everything after from the masked schedule in pivot order.
//!
//! The headline metric is the mean reception probability over a trailing
//! metric window. Evaluation is idempotent: the same scorer and recording
//! always produce the identical series.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::availability::AvailabilityMask;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::link::{ErrorModel, LinkSimulator, ReceptionModel};
use crate::predictor::ChannelScorer;
use crate::resample::{NormStats, Resampler};
use crate::series::Series;
use crate::window::WindowExtractor;

/// Evaluation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// First sample of the metric window (typically the training cutoff).
    pub metric_start: usize,
    /// One-past-last sample of the metric window; clamped to the stitched
    /// series length.
    pub metric_end: usize,
}

impl EvaluatorConfig {
    /// Metric window covering `[train_cutoff, metric_window_s × rate)`.
    pub fn trailing(pipeline: &PipelineConfig, metric_window_s: usize) -> Self {
        Self {
            metric_start: pipeline.train_cutoff(),
            metric_end: metric_window_s * pipeline.sample_rate,
        }
    }
}

/// Outcome of one evaluation pass.
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    /// Stitched reception series: `pastLen` baseline samples followed by
    /// `n_pivots × futureLen` masked samples.
    pub receptions: Vec<f64>,
    /// Mean reception probability over the metric window.
    pub mean_reception: f64,
    /// Number of grid pivots evaluated.
    pub pivots: usize,
}

/// Runs the trained pipeline over the full evaluation grid.
pub struct Evaluator<'a, L, E, R> {
    series: &'a Series,
    stats: &'a NormStats,
    simulator: &'a L,
    error_model: &'a E,
    reception_model: &'a R,
    extractor: WindowExtractor,
    resampler: Resampler,
    exclusion_budget: usize,
    config: EvaluatorConfig,
}

impl<'a, L, E, R> Evaluator<'a, L, E, R>
where
    L: LinkSimulator,
    E: ErrorModel,
    R: ReceptionModel,
{
    /// Assemble an evaluator sharing the trainer's recording and statistics.
    ///
    /// # Panics
    ///
    /// Panics if the recording holds more than one sequence — the stitched
    /// series is only defined against a single recorded trace.
    pub fn new(
        series: &'a Series,
        stats: &'a NormStats,
        pipeline: &PipelineConfig,
        simulator: &'a L,
        error_model: &'a E,
        reception_model: &'a R,
        config: EvaluatorConfig,
    ) -> Self {
        assert_eq!(
            series.sequences(),
            1,
            "reception stitching requires a single-sequence recording"
        );
        Self {
            series,
            stats,
            simulator,
            error_model,
            reception_model,
            extractor: WindowExtractor::from_config(pipeline),
            resampler: Resampler::from_rates(pipeline.sample_rate, pipeline.target_rate),
            exclusion_budget: pipeline.exclusion_budget,
            config,
        }
    }

    /// Evaluate a scorer over the full grid. Reads parameters only; the
    /// scorer is never mutated.
    pub fn evaluate<S: ChannelScorer>(&self, scorer: &S) -> Result<EvaluationReport> {
        let pivots = self.extractor.evaluation_pivots(self.series);
        debug!(pivots = pivots.len(), "evaluation grid");
        let (past, future) = self.extractor.extract(self.series, &pivots);

        // Score the normalized history windows and harden the decision.
        let mut downsampled = self.resampler.downsample(&past);
        self.stats.standardize(&mut downsampled);
        let scores = scorer.score(&downsampled);
        let mask = AvailabilityMask::from_scores(&scores, self.exclusion_budget);

        // Simulate the restricted schedule over the future windows.
        let masked_interference = self.simulator.masked(&future, &mask)?;
        let masked_errors = self.error_model.apply(&masked_interference);

        // Baseline schedule over the whole recording for the pre-decision
        // prefix.
        let (baseline_interference, _) = self.simulator.baseline(&self.series.as_window_batch());
        let baseline_errors = self.error_model.apply(&baseline_interference);

        // Stitch at the bit-error level, then map to reception probability.
        let past_len = self.extractor.past_len();
        let future_len = self.extractor.future_len();
        let mut stitched = Vec::with_capacity(past_len + pivots.len() * future_len);
        for t in 0..past_len {
            stitched.push(baseline_errors.get(t, 0));
        }
        for b in 0..pivots.len() {
            for t in 0..future_len {
                stitched.push(masked_errors.get(t, b));
            }
        }
        let receptions = self.reception_model.apply_series(&stitched);

        let mean_reception = self.metric_mean(&receptions)?;
        Ok(EvaluationReport {
            pivots: pivots.len(),
            receptions,
            mean_reception,
        })
    }

    /// Mean reception probability of an arbitrary reception series over this
    /// evaluator's metric window — also used to report the non-adaptive
    /// reference schedules.
    pub fn metric_mean(&self, receptions: &[f64]) -> Result<f64> {
        let end = self.config.metric_end.min(receptions.len());
        if self.config.metric_start >= end {
            return Err(PipelineError::InvalidConfig(format!(
                "metric window [{}, {}) is empty for a series of {} samples",
                self.config.metric_start,
                end,
                receptions.len()
            )));
        }
        let window = &receptions[self.config.metric_start..end];
        Ok(window.iter().sum::<f64>() / window.len() as f64)
    }
}
