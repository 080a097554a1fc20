//! Downsampling and normalization of past windows.
//!
//! The predictor consumes past windows at a much lower rate than the
//! recording (10 Hz vs. 2 kHz by default). Decimation uses linear
//! interpolation with a half-sample-centre coordinate mapping — a faithful
//! resampling rather than index skipping, so short interference bursts are
//! not aliased away.
//!
//! Standardization uses scalar statistics computed **once** over the
//! training prefix of the recording and shared by reference between the
//! trainer and evaluator. Recomputing them per batch would drift the
//! decision boundary between training and evaluation.

use serde::{Deserialize, Serialize};

use crate::series::{Series, WindowBatch};

/// Immutable scalar standardization statistics.
///
/// Computed once over the training split and passed by reference into every
/// subsequent normalization, training and evaluation alike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormStats {
    /// Mean over the training prefix.
    pub mean: f64,
    /// Standard deviation (unbiased) over the training prefix.
    pub std: f64,
}

impl NormStats {
    /// Compute statistics over the first `cutoff` time-steps of a recording.
    ///
    /// # Panics
    ///
    /// Panics if `cutoff` is zero, exceeds the recording, or the prefix has
    /// zero variance.
    pub fn from_training_prefix(series: &Series, cutoff: usize) -> Self {
        assert!(
            cutoff > 0 && cutoff <= series.steps(),
            "training cutoff {} outside recording of {} steps",
            cutoff,
            series.steps()
        );
        let prefix = &series.as_slice()[..cutoff * series.sequences() * series.channels()];
        let n = prefix.len() as f64;
        let mean = prefix.iter().sum::<f64>() / n;
        let var = prefix.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
        let std = var.sqrt();
        assert!(std > 0.0, "training prefix has zero variance");
        Self { mean, std }
    }

    /// Standardize a window batch in place: `(x − mean) / std`.
    pub fn standardize(&self, windows: &mut WindowBatch) {
        let mean = self.mean;
        let std = self.std;
        windows.map_inplace(|v| (v - mean) / std);
    }
}

/// Linear-interpolation decimator from the dataset rate to the predictor rate.
#[derive(Debug, Clone, Copy)]
pub struct Resampler {
    source_rate: usize,
    target_rate: usize,
}

impl Resampler {
    /// Create a resampler between two rates in Hz.
    ///
    /// # Panics
    ///
    /// Panics if either rate is zero or the target rate exceeds the source
    /// rate (this stage only decimates).
    pub fn from_rates(source_rate: usize, target_rate: usize) -> Self {
        assert!(source_rate > 0 && target_rate > 0, "rates must be non-zero");
        assert!(
            target_rate <= source_rate,
            "target rate {} Hz exceeds source rate {} Hz",
            target_rate,
            source_rate
        );
        Self {
            source_rate,
            target_rate,
        }
    }

    /// Decimation ratio (target / source).
    pub fn ratio(&self) -> f64 {
        self.target_rate as f64 / self.source_rate as f64
    }

    /// Downsample a window batch along the time axis.
    ///
    /// Output sample `i` is read at source coordinate
    /// `(i + 0.5) / ratio − 0.5` (half-sample centres, edges clamped) and
    /// linearly interpolated between its two neighbours.
    pub fn downsample(&self, windows: &WindowBatch) -> WindowBatch {
        let ratio = self.ratio();
        let in_steps = windows.steps();
        let out_steps = ((in_steps as f64) * ratio).floor() as usize;
        assert!(
            out_steps > 0,
            "window of {} samples too short to downsample at ratio {}",
            in_steps,
            ratio
        );

        let mut out = WindowBatch::zeros(out_steps, windows.batch(), windows.channels());
        for i in 0..out_steps {
            let src = ((i as f64 + 0.5) / ratio - 0.5).clamp(0.0, (in_steps - 1) as f64);
            let lo = src.floor() as usize;
            let hi = (lo + 1).min(in_steps - 1);
            let frac = src - lo as f64;
            for b in 0..windows.batch() {
                for c in 0..windows.channels() {
                    let v = windows.get(lo, b, c) * (1.0 - frac) + windows.get(hi, b, c) * frac;
                    out.set(i, b, c, v);
                }
            }
        }
        out
    }
}
