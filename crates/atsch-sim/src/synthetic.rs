//! Synthetic interference recordings.
//!
//! Generates a deterministic, seeded [`Series`] of bursty per-channel
//! interference for tests, benchmarks and the demo: each channel is an
//! on/off interferer with geometric dwell times and lognormal-ish burst
//! power jitter. Channel occupancy ramps across the channel set so that
//! some channels are persistently better than others — the structure a
//! blacklisting predictor is supposed to discover.

use atsch_core::series::Series;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Parameters of the synthetic interference generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticConfig {
    /// Number of time-steps to generate.
    pub steps: usize,
    /// Number of recorded sequences.
    pub sequences: usize,
    /// Number of frequency channels.
    pub channels: usize,
    /// Idle-channel noise floor in mW.
    pub idle_floor_mw: f64,
    /// Mean burst power in mW.
    pub burst_power_mw: f64,
    /// Mean burst length in samples.
    pub mean_burst_len: f64,
    /// Mean idle gap of the *busiest* channel in samples; cleaner channels
    /// scale this up.
    pub mean_idle_len: f64,
    /// Generator seed.
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            steps: 20_000,
            sequences: 1,
            channels: 16,
            idle_floor_mw: 1e-9,
            burst_power_mw: 5e-3,
            mean_burst_len: 60.0,
            mean_idle_len: 40.0,
            seed: 0xD_A7A,
        }
    }
}

/// Generate a deterministic bursty-interference recording.
///
/// Channel `c` idles on average `mean_idle_len × (1 + 3c / channels)`
/// samples between bursts, so low-index channels are the most congested.
pub fn generate(config: &SyntheticConfig) -> Series {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let jitter = Normal::new(0.0_f64, 0.25_f64).expect("valid jitter distribution");

    let mut data = vec![config.idle_floor_mw; config.steps * config.sequences * config.channels];
    for s in 0..config.sequences {
        for c in 0..config.channels {
            let idle_len = config.mean_idle_len * (1.0 + 3.0 * c as f64 / config.channels as f64);
            let mut t = 0usize;
            // Start each channel somewhere inside an idle gap.
            t += rng.gen_range(0..idle_len.max(2.0) as usize);
            while t < config.steps {
                // Burst.
                let burst = sample_geometric(&mut rng, config.mean_burst_len);
                for _ in 0..burst {
                    if t >= config.steps {
                        break;
                    }
                    let power = config.burst_power_mw * (1.0 + jitter.sample(&mut rng)).max(0.05);
                    data[(t * config.sequences + s) * config.channels + c] = power;
                    t += 1;
                }
                // Gap.
                t += sample_geometric(&mut rng, idle_len);
            }
        }
    }
    Series::new(data, config.steps, config.sequences, config.channels)
}

/// Geometric dwell sampler with the given mean, at least one sample.
fn sample_geometric<R: Rng>(rng: &mut R, mean: f64) -> usize {
    let u: f64 = rng.gen_range(f64::EPSILON..1.0);
    let p = 1.0 / mean.max(1.0);
    ((u.ln() / (1.0 - p).ln()).ceil() as usize).max(1)
}
