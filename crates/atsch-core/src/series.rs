//! Interference time-series containers.
//!
//! The dataset is a 3-D real array indexed by (time-step, sequence, channel):
//! `time-step` is a fixed-rate sample index, `sequence` indexes independent
//! recorded traces (distinct device pairs or measurement runs), and `channel`
//! indexes one of the link's frequency channels (16 for IEEE 802.15.4).
//! Values are interference power in mW.
//!
//! All containers store flat `Vec<f64>` data with explicit shape fields and
//! time-major layout, so a single time-step is one contiguous slab.
//!
//! ## Example
//!
//! ```rust
//! use atsch_core::series::Series;
//!
//! // 100 samples, 1 sequence, 4 channels, channel index as power
//! let series = Series::from_fn(100, 1, 4, |_t, _s, c| c as f64);
//! assert_eq!(series.steps(), 100);
//! assert_eq!(series.get(42, 0, 3), 3.0);
//! ```

/// Immutable interference recording: (time-step × sequence × channel).
///
/// Loaded once per run and shared read-only by the trainer and evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    data: Vec<f64>,
    steps: usize,
    sequences: usize,
    channels: usize,
}

impl Series {
    /// Wrap a flat time-major buffer.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` is not `steps × sequences × channels` or any
    /// axis is zero.
    pub fn new(data: Vec<f64>, steps: usize, sequences: usize, channels: usize) -> Self {
        assert!(
            steps > 0 && sequences > 0 && channels > 0,
            "series axes must be non-zero: {}x{}x{}",
            steps,
            sequences,
            channels
        );
        assert_eq!(
            data.len(),
            steps * sequences * channels,
            "series buffer length {} does not match shape {}x{}x{}",
            data.len(),
            steps,
            sequences,
            channels
        );
        Self {
            data,
            steps,
            sequences,
            channels,
        }
    }

    /// Build a series from a generator function over (time, sequence, channel).
    pub fn from_fn<F>(steps: usize, sequences: usize, channels: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(steps * sequences * channels);
        for t in 0..steps {
            for s in 0..sequences {
                for c in 0..channels {
                    data.push(f(t, s, c));
                }
            }
        }
        Self::new(data, steps, sequences, channels)
    }

    /// Number of time-steps.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of recorded sequences.
    pub fn sequences(&self) -> usize {
        self.sequences
    }

    /// Number of frequency channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Value at (time, sequence, channel).
    #[inline]
    pub fn get(&self, t: usize, s: usize, c: usize) -> f64 {
        debug_assert!(t < self.steps && s < self.sequences && c < self.channels);
        self.data[(t * self.sequences + s) * self.channels + c]
    }

    /// Flat time-major view of the buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// View the whole recording as a window batch (batch axis = sequences),
    /// e.g. to feed the full series through a slot simulator.
    pub fn as_window_batch(&self) -> WindowBatch {
        WindowBatch {
            data: self.data.clone(),
            steps: self.steps,
            batch: self.sequences,
            channels: self.channels,
        }
    }
}

/// A batch of contiguous time slices: (time × batch × channel).
///
/// Formed by concatenating per-pivot slices of a [`Series`] along the batch
/// axis; created per training iteration or evaluation pass and discarded
/// after one forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowBatch {
    data: Vec<f64>,
    steps: usize,
    batch: usize,
    channels: usize,
}

impl WindowBatch {
    /// Allocate a zero-filled batch.
    pub fn zeros(steps: usize, batch: usize, channels: usize) -> Self {
        assert!(steps > 0 && batch > 0 && channels > 0, "window axes must be non-zero");
        Self {
            data: vec![0.0; steps * batch * channels],
            steps,
            batch,
            channels,
        }
    }

    /// Number of time-steps per window.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Batch size (pivots × sequences).
    pub fn batch(&self) -> usize {
        self.batch
    }

    /// Number of frequency channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn get(&self, t: usize, b: usize, c: usize) -> f64 {
        debug_assert!(t < self.steps && b < self.batch && c < self.channels);
        self.data[(t * self.batch + b) * self.channels + c]
    }

    #[inline]
    pub fn set(&mut self, t: usize, b: usize, c: usize, value: f64) {
        debug_assert!(t < self.steps && b < self.batch && c < self.channels);
        self.data[(t * self.batch + b) * self.channels + c] = value;
    }

    /// Apply `f` to every element in place.
    pub fn map_inplace<F: FnMut(f64) -> f64>(&mut self, mut f: F) {
        for v in &mut self.data {
            *v = f(*v);
        }
    }

    /// Flat time-major view of the buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// A per-decision, per-channel real matrix: (batch × channel).
///
/// Used for blacklist scores in [0,1], reduced effective error values and
/// score gradients — everything that is one number per channel per decision.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMatrix {
    data: Vec<f64>,
    batch: usize,
    channels: usize,
}

impl ChannelMatrix {
    /// Allocate a zero-filled matrix.
    pub fn zeros(batch: usize, channels: usize) -> Self {
        assert!(batch > 0 && channels > 0, "matrix axes must be non-zero");
        Self {
            data: vec![0.0; batch * channels],
            batch,
            channels,
        }
    }

    /// Wrap a flat row-major buffer.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != batch × channels`.
    pub fn from_vec(data: Vec<f64>, batch: usize, channels: usize) -> Self {
        assert_eq!(
            data.len(),
            batch * channels,
            "matrix buffer length {} does not match shape {}x{}",
            data.len(),
            batch,
            channels
        );
        Self {
            data,
            batch,
            channels,
        }
    }

    /// Number of decision rows.
    pub fn batch(&self) -> usize {
        self.batch
    }

    /// Number of frequency channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn get(&self, b: usize, c: usize) -> f64 {
        debug_assert!(b < self.batch && c < self.channels);
        self.data[b * self.channels + c]
    }

    #[inline]
    pub fn set(&mut self, b: usize, c: usize, value: f64) {
        debug_assert!(b < self.batch && c < self.channels);
        self.data[b * self.channels + c] = value;
    }

    /// One decision row as a contiguous slice.
    pub fn row(&self, b: usize) -> &[f64] {
        &self.data[b * self.channels..(b + 1) * self.channels]
    }

    /// Mean over all elements.
    pub fn mean(&self) -> f64 {
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Flat row-major view of the buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_indexing_is_time_major() {
        let series = Series::from_fn(3, 2, 4, |t, s, c| (t * 100 + s * 10 + c) as f64);
        assert_eq!(series.get(0, 0, 0), 0.0);
        assert_eq!(series.get(2, 1, 3), 213.0);
        // Adjacent channels of one (t, s) cell are adjacent in memory.
        assert_eq!(series.as_slice()[0..4], [0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    #[should_panic(expected = "does not match shape")]
    fn test_series_rejects_wrong_buffer_length() {
        Series::new(vec![0.0; 7], 2, 2, 2);
    }

    #[test]
    fn test_window_batch_round_trip() {
        let mut batch = WindowBatch::zeros(5, 3, 2);
        batch.set(4, 2, 1, 7.5);
        assert_eq!(batch.get(4, 2, 1), 7.5);
        assert_eq!(batch.get(0, 0, 0), 0.0);
    }

    #[test]
    fn test_full_series_as_window_batch() {
        let series = Series::from_fn(4, 2, 3, |t, s, c| (t + s + c) as f64);
        let batch = series.as_window_batch();
        assert_eq!(batch.steps(), 4);
        assert_eq!(batch.batch(), 2);
        for t in 0..4 {
            for s in 0..2 {
                for c in 0..3 {
                    assert_eq!(batch.get(t, s, c), series.get(t, s, c));
                }
            }
        }
    }

    #[test]
    fn test_channel_matrix_rows() {
        let m = ChannelMatrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
        assert!((m.mean() - 3.5).abs() < 1e-12);
    }
}
