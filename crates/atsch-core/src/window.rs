//! Past/future window extraction around decision pivots.
//!
//! A pivot is a time index at which a scheduling decision is made. The
//! extractor slices the recording into a past (observation) window
//! `[pivot − pastLen, pivot)` and a future (decision) window
//! `[pivot, pivot + futureLen)` per pivot, concatenating the slices along
//! the batch axis. Past and future windows sharing a pivot are temporally
//! adjacent and never overlap.
//!
//! Training pivots are drawn uniformly at random, with replacement, from a
//! bounded prefix of the recording (never past 80% of it). Evaluation pivots
//! form a deterministic stride grid covering the whole recording with no
//! gaps and no overlap.
//!
//! ## Example
//!
//! ```rust
//! use atsch_core::series::Series;
//! use atsch_core::window::WindowExtractor;
//!
//! let series = Series::from_fn(1000, 1, 4, |t, _, _| t as f64);
//! let extractor = WindowExtractor::new(50, 50);
//! let (past, future) = extractor.extract(&series, &[500]);
//! assert_eq!(past.get(0, 0, 0), 450.0);
//! assert_eq!(future.get(0, 0, 0), 500.0);
//! ```

use rand::Rng;

use crate::config::PipelineConfig;
use crate::series::{Series, WindowBatch};

/// Fraction of the recording that training pivots may be drawn from; the
/// trailing suffix is implicitly excluded from training sampling.
const TRAIN_SAMPLING_BOUND: f64 = 0.80;

/// Slices a [`Series`] into aligned past/future window batches.
#[derive(Debug, Clone, Copy)]
pub struct WindowExtractor {
    past_len: usize,
    future_len: usize,
}

impl WindowExtractor {
    /// Create an extractor with window lengths in samples.
    ///
    /// # Panics
    ///
    /// Panics if either window length is zero.
    pub fn new(past_len: usize, future_len: usize) -> Self {
        assert!(past_len > 0 && future_len > 0, "window lengths must be non-zero");
        Self { past_len, future_len }
    }

    /// Create an extractor from the pipeline configuration.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.past_len(), config.future_len())
    }

    /// Past window length in samples.
    pub fn past_len(&self) -> usize {
        self.past_len
    }

    /// Future window length in samples.
    pub fn future_len(&self) -> usize {
        self.future_len
    }

    /// Extract past and future window batches at the given pivots.
    ///
    /// The batch axis concatenates, per pivot, every sequence of the
    /// recording: batch index = `pivot_index × sequences + sequence`.
    ///
    /// # Panics
    ///
    /// Panics if any pivot violates
    /// `pastLen ≤ pivot ≤ steps − futureLen` — out-of-range pivots are a
    /// caller bug in the pivot-generation policy, not a runtime condition.
    pub fn extract(&self, series: &Series, pivots: &[usize]) -> (WindowBatch, WindowBatch) {
        assert!(!pivots.is_empty(), "at least one pivot is required");
        let steps = series.steps();
        let sequences = series.sequences();
        let channels = series.channels();
        let batch = pivots.len() * sequences;

        let mut past = WindowBatch::zeros(self.past_len, batch, channels);
        let mut future = WindowBatch::zeros(self.future_len, batch, channels);

        for (p, &pivot) in pivots.iter().enumerate() {
            assert!(
                pivot >= self.past_len && pivot + self.future_len <= steps,
                "pivot {} outside valid range [{}, {}]",
                pivot,
                self.past_len,
                steps - self.future_len
            );
            for s in 0..sequences {
                let b = p * sequences + s;
                for t in 0..self.past_len {
                    for c in 0..channels {
                        past.set(t, b, c, series.get(pivot - self.past_len + t, s, c));
                    }
                }
                for t in 0..self.future_len {
                    for c in 0..channels {
                        future.set(t, b, c, series.get(pivot + t, s, c));
                    }
                }
            }
        }
        (past, future)
    }

    /// Draw `batch_size` training pivots uniformly, with replacement, from
    /// `[pastLen, 0.8 × steps − futureLen)`.
    ///
    /// # Panics
    ///
    /// Panics if the recording is too short to leave a non-empty sampling
    /// range.
    pub fn training_pivots<R: Rng>(
        &self,
        series: &Series,
        batch_size: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        let bound = (TRAIN_SAMPLING_BOUND * series.steps() as f64) as usize;
        assert!(
            bound > self.past_len + self.future_len,
            "recording too short for training: {} samples inside the sampling bound",
            bound
        );
        let upper = bound - self.future_len;
        (0..batch_size)
            .map(|_| rng.gen_range(self.past_len..upper))
            .collect()
    }

    /// The deterministic evaluation grid: `pastLen, pastLen + futureLen, …`,
    /// every pivot satisfying `pivot + futureLen ≤ steps`. Consecutive future
    /// windows tile the recording with no gaps and no overlap.
    pub fn evaluation_pivots(&self, series: &Series) -> Vec<usize> {
        let steps = series.steps();
        let mut pivots = Vec::new();
        let mut pivot = self.past_len;
        while pivot + self.future_len <= steps {
            pivots.push(pivot);
            pivot += self.future_len;
        }
        pivots
    }
}
