//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Static parameters of the scheduling-decision pipeline.
///
/// Defaults match the reference deployment: a 2 kHz interference recording
/// fed to the predictor at 10 Hz, 5 s past/future windows, 16 channels with
/// an exclusion budget of 8, and the first 240 s reserved as the training
/// split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Dataset sample rate in Hz.
    pub sample_rate: usize,
    /// Sample rate of the data fed to the predictor, in Hz.
    pub target_rate: usize,
    /// Past (observation) window length in seconds.
    pub past_window_s: usize,
    /// Future (decision) window length in seconds.
    pub future_window_s: usize,
    /// Number of frequency channels.
    pub channels: usize,
    /// Number of channels excluded per decision.
    pub exclusion_budget: usize,
    /// Training split length in seconds; normalization statistics are
    /// computed over this prefix only.
    pub train_split_s: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 2000,
            target_rate: 10,
            past_window_s: 5,
            future_window_s: 5,
            channels: 16,
            exclusion_budget: 8,
            train_split_s: 240,
        }
    }
}

impl PipelineConfig {
    /// Past window length in samples.
    pub fn past_len(&self) -> usize {
        self.past_window_s * self.sample_rate
    }

    /// Future window length in samples.
    pub fn future_len(&self) -> usize {
        self.future_window_s * self.sample_rate
    }

    /// Past window length after downsampling to the target rate.
    pub fn past_len_downsampled(&self) -> usize {
        self.past_window_s * self.target_rate
    }

    /// First sample index past the training split.
    pub fn train_cutoff(&self) -> usize {
        self.train_split_s * self.sample_rate
    }

    /// Ratio between predictor and dataset sample rates.
    pub fn rate_ratio(&self) -> f64 {
        self.target_rate as f64 / self.sample_rate as f64
    }

    /// Validate internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 || self.target_rate == 0 {
            return Err(PipelineError::InvalidConfig(
                "sample rates must be non-zero".into(),
            ));
        }
        if self.target_rate > self.sample_rate {
            return Err(PipelineError::InvalidConfig(format!(
                "target rate {} Hz exceeds dataset rate {} Hz",
                self.target_rate, self.sample_rate
            )));
        }
        if self.past_window_s == 0 || self.future_window_s == 0 {
            return Err(PipelineError::InvalidConfig(
                "window lengths must be non-zero".into(),
            ));
        }
        if self.channels == 0 {
            return Err(PipelineError::InvalidConfig("channel count must be non-zero".into()));
        }
        if self.exclusion_budget >= self.channels {
            return Err(PipelineError::InvalidConfig(format!(
                "exclusion budget {} must be below the channel count {}",
                self.exclusion_budget, self.channels
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.past_len(), 10_000);
        assert_eq!(config.future_len(), 10_000);
        assert_eq!(config.past_len_downsampled(), 50);
        assert_eq!(config.train_cutoff(), 480_000);
    }

    #[test]
    fn test_budget_must_leave_channels() {
        let config = PipelineConfig {
            exclusion_budget: 16,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_target_rate_cannot_exceed_sample_rate() {
        let config = PipelineConfig {
            sample_rate: 10,
            target_rate: 100,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
