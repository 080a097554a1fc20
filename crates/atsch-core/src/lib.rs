//! # Adaptive TSCH scheduling-decision pipeline
//!
//! Core of an adaptive channel-selection policy for a slotted,
//! channel-hopping wireless link. At fixed decision points the pipeline
//! predicts which frequency channels will be unreliable over the next
//! window, restricts transmission to the remaining whitelisted channels,
//! and measures the resulting packet delivery quality.
//!
//! ## Pipeline
//!
//! ```text
//! Series ─► WindowExtractor ─► Resampler/NormStats ─► ChannelScorer
//!              │                                          │ scores
//!              ▼ future windows                           ▼
//!          LinkSimulator ─► ErrorModel ─► ReductionPolicy ─► Objective
//!                                          (training)        │ ∂loss/∂score
//!                                                            ▼
//!                                                     TrainableScorer
//! ```
//!
//! At evaluation time the continuous scores are hardened into a top-k
//! [`availability::AvailabilityMask`] instead, the simulator hops over the
//! surviving channels only, and the [`evaluator::Evaluator`] stitches the
//! per-pivot outputs into one continuous reception series.
//!
//! The physical link (hopping schedules, interference, bit-error and
//! reception models) lives behind the capability traits in [`link`]; the
//! `atsch-sim` crate provides the concrete TSCH implementations.
//!
//! ## Example
//!
//! ```rust
//! use atsch_core::prelude::*;
//!
//! let config = PipelineConfig {
//!     sample_rate: 20,
//!     target_rate: 10,
//!     past_window_s: 1,
//!     future_window_s: 1,
//!     channels: 4,
//!     exclusion_budget: 2,
//!     train_split_s: 4,
//! };
//! let series = Series::from_fn(200, 1, 4, |t, _, c| ((t + c) % 7) as f64);
//! let stats = NormStats::from_training_prefix(&series, config.train_cutoff());
//!
//! let extractor = WindowExtractor::from_config(&config);
//! let pivots = extractor.evaluation_pivots(&series);
//! assert_eq!(pivots.first(), Some(&20));
//! let (past, future) = extractor.extract(&series, &pivots);
//! assert_eq!(future.steps(), config.future_len());
//!
//! let resampler = Resampler::from_rates(config.sample_rate, config.target_rate);
//! let mut history = resampler.downsample(&past);
//! stats.standardize(&mut history);
//! assert_eq!(history.steps(), config.past_len_downsampled());
//! ```

pub mod availability;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod link;
pub mod objective;
pub mod predictor;
pub mod reduction;
pub mod resample;
pub mod series;
pub mod trainer;
pub mod window;

/// Convenient re-exports of the pipeline surface.
pub mod prelude {
    pub use crate::availability::AvailabilityMask;
    pub use crate::config::PipelineConfig;
    pub use crate::error::{PipelineError, Result};
    pub use crate::evaluator::{EvaluationReport, Evaluator, EvaluatorConfig};
    pub use crate::link::{ErrorModel, LinkSimulator, ReceptionModel, SlotMatrix};
    pub use crate::objective::{Objective, ObjectiveComposer};
    pub use crate::predictor::{ChannelScorer, LogisticScorer, ScorerConfig, TrainableScorer};
    pub use crate::reduction::{attribute_errors, ReductionPolicy, SlotTensor};
    pub use crate::resample::{NormStats, Resampler};
    pub use crate::series::{ChannelMatrix, Series, WindowBatch};
    pub use crate::trainer::{IterationMetrics, Trainer, TrainerConfig};
    pub use crate::window::WindowExtractor;
}
