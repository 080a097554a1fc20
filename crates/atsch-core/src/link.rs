//! Link-level collaborator contracts.
//!
//! The scheduling core never talks to a concrete radio or propagation
//! implementation. It consumes three capabilities:
//!
//! - a [`LinkSimulator`] that walks a hopping schedule over a future window
//!   and reports the interference power met in each slot,
//! - an [`ErrorModel`] mapping interference power to bit-error probability,
//! - a [`ReceptionModel`] mapping bit-error probability to packet-reception
//!   probability.
//!
//! The error and reception models are pure functions with no state. Keeping
//! these seams as traits lets tests substitute rule-based stand-ins for the
//! real simulator, and keeps the trainer/evaluator independent of any one
//! physical-layer parameterization.

use crate::availability::AvailabilityMask;
use crate::error::Result;
use crate::reduction::SlotTensor;
use crate::series::WindowBatch;

/// A per-slot, per-decision real matrix: (slot × batch).
///
/// Carries interference power, bit-error probability or reception
/// probability along the slot axis of a simulated window.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotMatrix {
    data: Vec<f64>,
    slots: usize,
    batch: usize,
}

impl SlotMatrix {
    /// Allocate a zero-filled matrix.
    pub fn zeros(slots: usize, batch: usize) -> Self {
        assert!(slots > 0 && batch > 0, "matrix axes must be non-zero");
        Self {
            data: vec![0.0; slots * batch],
            slots,
            batch,
        }
    }

    /// Number of time slots.
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Number of decision columns.
    pub fn batch(&self) -> usize {
        self.batch
    }

    #[inline]
    pub fn get(&self, t: usize, b: usize) -> f64 {
        debug_assert!(t < self.slots && b < self.batch);
        self.data[t * self.batch + b]
    }

    #[inline]
    pub fn set(&mut self, t: usize, b: usize, value: f64) {
        debug_assert!(t < self.slots && b < self.batch);
        self.data[t * self.batch + b] = value;
    }

    /// Map every element through `f` into a new matrix.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> SlotMatrix {
        SlotMatrix {
            data: self.data.iter().map(|&v| f(v)).collect(),
            slots: self.slots,
            batch: self.batch,
        }
    }
}

/// Slot-level simulation of a channel-hopping link over a future window.
///
/// Implementations must be deterministic for a given construction: the
/// evaluator relies on two passes over the same inputs producing identical
/// output.
pub trait LinkSimulator {
    /// Hop over the full channel set. Returns the interference power met in
    /// each slot and the one-hot channel-attribution weights describing
    /// which channel each slot's transmission used.
    fn baseline(&self, windows: &WindowBatch) -> (SlotMatrix, SlotTensor);

    /// Sensing-assisted hopping (fixed policy, no attribution).
    /// `rate_ratio` is the ratio between the sensing rate and the slot rate.
    fn adaptive(&self, windows: &WindowBatch, rate_ratio: f64) -> SlotMatrix;

    /// Hop restricted to each decision row's available channels.
    ///
    /// A row with zero available channels is an error: the core offers no
    /// fallback schedule for a fully blacklisted channel set.
    fn masked(&self, windows: &WindowBatch, mask: &AvailabilityMask) -> Result<SlotMatrix>;
}

/// Pure interference-power → bit-error-probability map.
pub trait ErrorModel {
    /// Bit-error probability under the given interference power (mW).
    fn bit_error(&self, interference_mw: f64) -> f64;

    /// Apply elementwise to a slot matrix.
    fn apply(&self, interference: &SlotMatrix) -> SlotMatrix {
        interference.map(|v| self.bit_error(v))
    }
}

/// Pure bit-error-probability → packet-reception-probability map.
pub trait ReceptionModel {
    /// Packet-reception probability for the given bit-error probability.
    fn reception(&self, bit_error: f64) -> f64;

    /// Apply elementwise to a slot matrix.
    fn apply(&self, bit_error: &SlotMatrix) -> SlotMatrix {
        bit_error.map(|v| self.reception(v))
    }

    /// Apply elementwise to a stitched 1-D error series.
    fn apply_series(&self, bit_error: &[f64]) -> Vec<f64> {
        bit_error.iter().map(|&v| self.reception(v)).collect()
    }
}
