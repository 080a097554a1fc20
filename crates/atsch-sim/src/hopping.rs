//! TSCH channel-hopping sequence generation.
//!
//! Time-Slotted Channel Hopping maps every time slot to one of the link's
//! frequency channels through a pseudo-random hopping sequence shared by
//! both ends of the link. The hopper here generates a seeded permutation of
//! the channel set and cycles it slot by slot; a whitelist-restricted
//! lookup supports adaptive schedules that exclude blacklisted channels.
//!
//! ## Example
//!
//! ```rust
//! use atsch_sim::hopping::{HopConfig, TschHopper};
//!
//! let hopper = TschHopper::new(HopConfig::default());
//! let channel = hopper.channel_at(42);
//! assert!(channel < 16);
//! // The sequence is a permutation: 16 consecutive slots cover every channel.
//! let mut seen: Vec<usize> = (0..16).map(|slot| hopper.channel_at(slot)).collect();
//! seen.sort();
//! assert_eq!(seen, (0..16).collect::<Vec<_>>());
//! ```

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Hopping-sequence configuration.
///
/// Defaults describe the 2.4 GHz IEEE 802.15.4 band: 16 channels, 5 MHz
/// spacing, channel 11 at 2.405 GHz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HopConfig {
    /// Number of channels in the hopping set.
    pub num_channels: usize,
    /// Centre frequency of the first channel in Hz.
    pub base_freq_hz: f64,
    /// Channel spacing in Hz.
    pub channel_spacing_hz: f64,
    /// Seed of the pseudo-random hopping permutation.
    pub seed: u64,
}

impl Default for HopConfig {
    fn default() -> Self {
        Self {
            num_channels: 16,
            base_freq_hz: 2.405e9,
            channel_spacing_hz: 5e6,
            seed: 0x15_4e,
        }
    }
}

/// Slot-indexed TSCH channel hopper.
///
/// The hop sequence is a fixed permutation of the channel set generated
/// from the configured seed, so any two hoppers with equal configuration
/// produce identical schedules.
#[derive(Debug, Clone)]
pub struct TschHopper {
    config: HopConfig,
    sequence: Vec<usize>,
}

impl TschHopper {
    /// Build a hopper with a seeded permutation sequence.
    ///
    /// # Panics
    ///
    /// Panics if the channel count is zero.
    pub fn new(config: HopConfig) -> Self {
        assert!(config.num_channels > 0, "hopping set must be non-empty");
        let mut sequence: Vec<usize> = (0..config.num_channels).collect();
        let mut rng = StdRng::seed_from_u64(config.seed);
        sequence.shuffle(&mut rng);
        Self { config, sequence }
    }

    /// The configuration in use.
    pub fn config(&self) -> &HopConfig {
        &self.config
    }

    /// The underlying hop permutation.
    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    /// Channel used in the given slot under the unrestricted schedule.
    #[inline]
    pub fn channel_at(&self, slot: usize) -> usize {
        self.sequence[slot % self.sequence.len()]
    }

    /// Channel used in the given slot when hopping is restricted to
    /// `available` (ascending channel indices).
    ///
    /// The base sequence keeps driving the schedule so that two rows with
    /// the same whitelist stay slot-aligned; the hop is folded onto the
    /// whitelist by index.
    ///
    /// # Panics
    ///
    /// Panics if `available` is empty — callers must reject fully
    /// blacklisted rows before scheduling.
    #[inline]
    pub fn channel_in(&self, slot: usize, available: &[usize]) -> usize {
        assert!(!available.is_empty(), "cannot hop over an empty whitelist");
        available[self.channel_at(slot) % available.len()]
    }

    /// Centre frequency of a channel in Hz.
    pub fn frequency_of(&self, channel: usize) -> f64 {
        self.config.base_freq_hz + channel as f64 * self.config.channel_spacing_hz
    }
}
