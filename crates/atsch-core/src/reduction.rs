//! Reduction of per-slot error contributions into one value per channel.
//!
//! A future window yields one error probability per slot, and a
//! channel-attribution weight tensor describing which channel each slot's
//! transmission used. The reducer collapses the slot axis into a single
//! effective error estimate per (decision, channel) under one of two
//! policies with different optimism assumptions about how simultaneous
//! interference composes:
//!
//! - [`ReductionPolicy::WeightedMean`] — attribution-weighted average, the
//!   expected error over the slots that actually used the channel;
//! - [`ReductionPolicy::Max`] — the dominant-contribution worst case.
//!
//! The policy is fixed per trained model instance, not switched per call,
//! and each variant carries its own blacklisting-penalty weight: the max
//! reducer's pessimistic estimate needs a larger penalty to avoid
//! over-exclusion.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::link::SlotMatrix;
use crate::series::ChannelMatrix;

/// A per-slot, per-decision, per-channel tensor: (slot × batch × channel).
///
/// Holds channel-attribution weights and attributed error contributions.
/// All values are non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotTensor {
    data: Vec<f64>,
    slots: usize,
    batch: usize,
    channels: usize,
}

impl SlotTensor {
    /// Allocate a zero-filled tensor.
    pub fn zeros(slots: usize, batch: usize, channels: usize) -> Self {
        assert!(
            slots > 0 && batch > 0 && channels > 0,
            "tensor axes must be non-zero"
        );
        Self {
            data: vec![0.0; slots * batch * channels],
            slots,
            batch,
            channels,
        }
    }

    /// Build a tensor from a generator over (slot, batch, channel).
    pub fn from_fn<F>(slots: usize, batch: usize, channels: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> f64,
    {
        let mut tensor = Self::zeros(slots, batch, channels);
        for t in 0..slots {
            for b in 0..batch {
                for c in 0..channels {
                    tensor.set(t, b, c, f(t, b, c));
                }
            }
        }
        tensor
    }

    /// Number of time slots.
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Number of decision columns.
    pub fn batch(&self) -> usize {
        self.batch
    }

    /// Number of frequency channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn get(&self, t: usize, b: usize, c: usize) -> f64 {
        debug_assert!(t < self.slots && b < self.batch && c < self.channels);
        self.data[(t * self.batch + b) * self.channels + c]
    }

    #[inline]
    pub fn set(&mut self, t: usize, b: usize, c: usize, value: f64) {
        debug_assert!(t < self.slots && b < self.batch && c < self.channels);
        self.data[(t * self.batch + b) * self.channels + c] = value;
    }
}

/// Spread a per-slot error matrix over channels using attribution weights:
/// `out[t,b,c] = errors[t,b] × attribution[t,b,c]`.
///
/// # Panics
///
/// Panics on shape mismatch.
pub fn attribute_errors(errors: &SlotMatrix, attribution: &SlotTensor) -> SlotTensor {
    assert_eq!(errors.slots(), attribution.slots(), "slot axis mismatch");
    assert_eq!(errors.batch(), attribution.batch(), "batch axis mismatch");
    SlotTensor::from_fn(
        attribution.slots(),
        attribution.batch(),
        attribution.channels(),
        |t, b, c| errors.get(t, b) * attribution.get(t, b, c),
    )
}

/// How competing per-slot error contributions collapse into one effective
/// error estimate per channel. Chosen at model construction; the two
/// variants are trained as independent models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReductionPolicy {
    /// Attribution-weighted average across the slot axis.
    WeightedMean,
    /// Elementwise maximum across the slot axis (dominant interferer).
    Max,
}

impl ReductionPolicy {
    /// Blacklisting-penalty weight paired with this policy in the training
    /// objective.
    pub fn penalty_weight(&self) -> f64 {
        match self {
            ReductionPolicy::WeightedMean => 0.05,
            ReductionPolicy::Max => 0.55,
        }
    }

    /// Short label for logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            ReductionPolicy::WeightedMean => "mean",
            ReductionPolicy::Max => "max",
        }
    }

    /// Collapse the slot axis of `values` into a (batch × channel) matrix.
    ///
    /// For [`ReductionPolicy::WeightedMean`] the result is
    /// `Σ_slot values / Σ_slot attribution`; a zero weight sum for any
    /// (decision, channel) cell is a [`PipelineError::DegenerateAttribution`]
    /// — every active channel must have at least one attributed slot, and a
    /// silent zero-error fallback would corrupt the learned policy.
    ///
    /// For [`ReductionPolicy::Max`] the result is the elementwise maximum
    /// and the attribution weights are not consulted.
    ///
    /// # Panics
    ///
    /// Panics if `values` and `attribution` shapes differ.
    pub fn reduce(&self, values: &SlotTensor, attribution: &SlotTensor) -> Result<ChannelMatrix> {
        assert!(
            values.slots() == attribution.slots()
                && values.batch() == attribution.batch()
                && values.channels() == attribution.channels(),
            "values and attribution shapes differ"
        );
        let mut out = ChannelMatrix::zeros(values.batch(), values.channels());
        for b in 0..values.batch() {
            for c in 0..values.channels() {
                let reduced = match self {
                    ReductionPolicy::WeightedMean => {
                        let mut sum = 0.0;
                        let mut weight = 0.0;
                        for t in 0..values.slots() {
                            sum += values.get(t, b, c);
                            weight += attribution.get(t, b, c);
                        }
                        if weight == 0.0 {
                            return Err(PipelineError::DegenerateAttribution { row: b, channel: c });
                        }
                        sum / weight
                    }
                    ReductionPolicy::Max => {
                        let mut max = f64::NEG_INFINITY;
                        for t in 0..values.slots() {
                            max = max.max(values.get(t, b, c));
                        }
                        max
                    }
                };
                out.set(b, c, reduced);
            }
        }
        Ok(out)
    }
}
