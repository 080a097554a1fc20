//! Slot-level TSCH link simulation over recorded interference.
//!
//! Three schedules walk a future window and report the interference power
//! the transmission meets in every slot:
//!
//! - **baseline** — plain TSCH hopping over the full channel set, plus the
//!   one-hot channel-attribution weights the training reduction needs;
//! - **adaptive** — sensing-assisted TSCH: probe the scheduled channel and
//!   up to a few fallback hops against an energy-detection threshold and
//!   transmit on the first idle probe (else the quietest);
//! - **masked** — hopping restricted to each decision row's whitelisted
//!   channels.
//!
//! Every schedule is deterministic for a given configuration; batch
//! columns are independent and processed in parallel.

use atsch_core::availability::AvailabilityMask;
use atsch_core::error::{PipelineError, Result};
use atsch_core::link::{LinkSimulator, SlotMatrix};
use atsch_core::reduction::SlotTensor;
use atsch_core::series::WindowBatch;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::hopping::{HopConfig, TschHopper};

/// TSCH link-simulation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TschConfig {
    /// Hopping-sequence configuration.
    pub hop: HopConfig,
    /// Energy-detection threshold in mW for the sensing-assisted schedule.
    pub sensing_threshold_mw: f64,
    /// Number of channels probed per slot by the sensing-assisted schedule,
    /// the scheduled hop included.
    pub max_probes: usize,
}

impl Default for TschConfig {
    fn default() -> Self {
        Self {
            hop: HopConfig::default(),
            sensing_threshold_mw: 1e-6,
            max_probes: 3,
        }
    }
}

/// Deterministic slot-level TSCH simulator.
pub struct TschSimulator {
    config: TschConfig,
    hopper: TschHopper,
}

impl TschSimulator {
    /// Build a simulator from its configuration.
    ///
    /// # Panics
    ///
    /// Panics if `max_probes` is zero.
    pub fn new(config: TschConfig) -> Self {
        assert!(config.max_probes > 0, "at least one probe per slot is required");
        let hopper = TschHopper::new(config.hop.clone());
        Self { config, hopper }
    }

    /// The hopping sequence driving every schedule.
    pub fn hopper(&self) -> &TschHopper {
        &self.hopper
    }

    /// Trailing average of a channel's interference as seen by a sensing
    /// window of `len` samples ending at `slot`.
    fn sensed(&self, windows: &WindowBatch, slot: usize, b: usize, channel: usize, len: usize) -> f64 {
        let start = slot.saturating_sub(len - 1);
        let mut sum = 0.0;
        for t in start..=slot {
            sum += windows.get(t, b, channel);
        }
        sum / (slot - start + 1) as f64
    }
}

impl LinkSimulator for TschSimulator {
    fn baseline(&self, windows: &WindowBatch) -> (SlotMatrix, SlotTensor) {
        let mut interference = SlotMatrix::zeros(windows.steps(), windows.batch());
        let mut attribution = SlotTensor::zeros(windows.steps(), windows.batch(), windows.channels());
        for t in 0..windows.steps() {
            let channel = self.hopper.channel_at(t) % windows.channels();
            for b in 0..windows.batch() {
                interference.set(t, b, windows.get(t, b, channel));
                attribution.set(t, b, channel, 1.0);
            }
        }
        (interference, attribution)
    }

    fn adaptive(&self, windows: &WindowBatch, rate_ratio: f64) -> SlotMatrix {
        assert!(rate_ratio > 0.0 && rate_ratio <= 1.0, "rate ratio {rate_ratio} outside (0, 1]");
        let sensing_len = (1.0 / rate_ratio).round().max(1.0) as usize;
        let channels = windows.channels();

        let columns: Vec<Vec<f64>> = (0..windows.batch())
            .into_par_iter()
            .map(|b| {
                (0..windows.steps())
                    .map(|t| {
                        let mut chosen = self.hopper.channel_at(t) % channels;
                        let mut quietest = (chosen, self.sensed(windows, t, b, chosen, sensing_len));
                        for probe in 0..self.config.max_probes {
                            let candidate = self.hopper.channel_at(t + probe) % channels;
                            let level = self.sensed(windows, t, b, candidate, sensing_len);
                            if level < quietest.1 {
                                quietest = (candidate, level);
                            }
                            if level < self.config.sensing_threshold_mw {
                                chosen = candidate;
                                break;
                            }
                            chosen = quietest.0;
                        }
                        windows.get(t, b, chosen)
                    })
                    .collect()
            })
            .collect();

        let mut interference = SlotMatrix::zeros(windows.steps(), windows.batch());
        for (b, column) in columns.iter().enumerate() {
            for (t, &value) in column.iter().enumerate() {
                interference.set(t, b, value);
            }
        }
        interference
    }

    fn masked(&self, windows: &WindowBatch, mask: &AvailabilityMask) -> Result<SlotMatrix> {
        assert_eq!(
            windows.batch(),
            mask.batch(),
            "window batch and mask rows differ"
        );
        assert_eq!(
            windows.channels(),
            mask.channels(),
            "window channels and mask channels differ"
        );
        debug!(
            rows = windows.batch(),
            slots = windows.steps(),
            "masked schedule"
        );

        let columns: Vec<Result<Vec<f64>>> = (0..windows.batch())
            .into_par_iter()
            .map(|b| {
                let available = mask.available_channels(b);
                if available.is_empty() {
                    return Err(PipelineError::EmptyAvailability { row: b });
                }
                Ok((0..windows.steps())
                    .map(|t| windows.get(t, b, self.hopper.channel_in(t, &available)))
                    .collect())
            })
            .collect();

        let mut interference = SlotMatrix::zeros(windows.steps(), windows.batch());
        for (b, column) in columns.into_iter().enumerate() {
            for (t, value) in column?.into_iter().enumerate() {
                interference.set(t, b, value);
            }
        }
        Ok(interference)
    }
}
