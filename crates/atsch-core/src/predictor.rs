//! Channel-quality predictor capability and a provided scorer.
//!
//! The scheduling core consumes the predictor purely as "given a normalized
//! history window, produce a score in [0,1] per channel" — higher meaning
//! less reliable. Modelling it as a trait keeps the core independent of any
//! specific learned architecture and lets tests substitute rule-based or
//! tabular policies.
//!
//! Training splits the capability in two: [`ChannelScorer`] is the pure
//! scoring view used at evaluation time, and [`TrainableScorer`] adds the
//! gradient path. The trainer never sees predictor internals; it hands back
//! `∂loss/∂score` (from [`crate::objective`]) and the predictor
//! backpropagates through whatever it is made of.
//!
//! [`LogisticScorer`] is the provided implementation: an independent
//! logistic regression per channel over the flattened normalized past
//! window, updated with RMSprop.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::series::{ChannelMatrix, WindowBatch};

/// Pure scoring capability: normalized past windows in, blacklist scores
/// in [0,1] out.
pub trait ChannelScorer {
    /// Score one batch of normalized past windows: (batch × channel).
    fn score(&self, windows: &WindowBatch) -> ChannelMatrix;
}

/// Gradient-trainable extension of [`ChannelScorer`].
///
/// One training step is `forward` → [`TrainableScorer::backward`] →
/// [`TrainableScorer::apply_update`]; the forward pass retains whatever
/// activations the implementation needs for the backward pass.
pub trait TrainableScorer: ChannelScorer {
    /// Score a batch and retain activations for a following backward pass.
    fn forward(&mut self, windows: &WindowBatch) -> ChannelMatrix;

    /// Accumulate parameter gradients from `∂loss/∂score`.
    ///
    /// # Panics
    ///
    /// Panics if no forward pass is pending — calling backward twice or
    /// before any forward is a trainer bug.
    fn backward(&mut self, score_grad: &ChannelMatrix);

    /// Apply one optimizer step and clear accumulated gradients.
    fn apply_update(&mut self);
}

/// Configuration for [`LogisticScorer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Time-steps per (downsampled) past window.
    pub input_steps: usize,
    /// Number of frequency channels.
    pub channels: usize,
    /// RMSprop learning rate.
    pub learning_rate: f64,
    /// RMSprop squared-gradient decay.
    pub decay: f64,
    /// RMSprop denominator epsilon.
    pub epsilon: f64,
    /// Weight-initialization seed.
    pub seed: u64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            input_steps: 50,
            channels: 16,
            learning_rate: 1e-4,
            decay: 0.99,
            epsilon: 1e-8,
            seed: 42,
        }
    }
}

struct ForwardCache {
    input: WindowBatch,
    scores: ChannelMatrix,
}

/// Per-channel logistic regression over the flattened past window.
///
/// Each output channel owns a weight vector across every
/// (time-step, channel) cell of the normalized input window plus a bias;
/// scores are the logistic sigmoid of the affine response. Parameters are
/// updated with hand-rolled RMSprop.
pub struct LogisticScorer {
    config: ScorerConfig,
    /// (channels × features) weight matrix, features = steps × channels.
    weights: Vec<f64>,
    bias: Vec<f64>,
    grad_weights: Vec<f64>,
    grad_bias: Vec<f64>,
    /// RMSprop running squared-gradient averages.
    sq_weights: Vec<f64>,
    sq_bias: Vec<f64>,
    cache: Option<ForwardCache>,
}

impl LogisticScorer {
    /// Create a scorer with small random initial weights.
    pub fn new(config: ScorerConfig) -> Self {
        assert!(config.input_steps > 0 && config.channels > 0, "scorer shape must be non-zero");
        assert!(config.learning_rate > 0.0, "learning rate must be positive");
        let features = config.input_steps * config.channels;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let weights = (0..config.channels * features)
            .map(|_| rng.gen_range(-0.05..0.05))
            .collect();
        Self {
            bias: vec![0.0; config.channels],
            grad_weights: vec![0.0; config.channels * features],
            grad_bias: vec![0.0; config.channels],
            sq_weights: vec![0.0; config.channels * features],
            sq_bias: vec![0.0; config.channels],
            cache: None,
            weights,
            config,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Export the parameters as flat (weights, bias) buffers.
    pub fn export_weights(&self) -> (Vec<f64>, Vec<f64>) {
        (self.weights.clone(), self.bias.clone())
    }

    /// Load previously exported parameters.
    ///
    /// # Panics
    ///
    /// Panics if the buffer lengths do not match this scorer's shape.
    pub fn load_weights(&mut self, weights: &[f64], bias: &[f64]) {
        assert_eq!(weights.len(), self.weights.len(), "weight buffer length mismatch");
        assert_eq!(bias.len(), self.bias.len(), "bias buffer length mismatch");
        self.weights.copy_from_slice(weights);
        self.bias.copy_from_slice(bias);
    }

    fn features(&self) -> usize {
        self.config.input_steps * self.config.channels
    }

    fn compute_scores(&self, windows: &WindowBatch) -> ChannelMatrix {
        assert_eq!(
            windows.steps(),
            self.config.input_steps,
            "window length does not match scorer input"
        );
        assert_eq!(
            windows.channels(),
            self.config.channels,
            "channel count does not match scorer input"
        );
        let features = self.features();
        let mut scores = ChannelMatrix::zeros(windows.batch(), self.config.channels);
        for b in 0..windows.batch() {
            for out_c in 0..self.config.channels {
                let row = &self.weights[out_c * features..(out_c + 1) * features];
                let mut z = self.bias[out_c];
                for t in 0..self.config.input_steps {
                    for in_c in 0..self.config.channels {
                        z += row[t * self.config.channels + in_c] * windows.get(t, b, in_c);
                    }
                }
                scores.set(b, out_c, sigmoid(z));
            }
        }
        scores
    }

    fn rmsprop_step(param: &mut [f64], grad: &mut [f64], sq: &mut [f64], config: &ScorerConfig) {
        for i in 0..param.len() {
            let g = grad[i];
            sq[i] = config.decay * sq[i] + (1.0 - config.decay) * g * g;
            param[i] -= config.learning_rate * g / (sq[i].sqrt() + config.epsilon);
            grad[i] = 0.0;
        }
    }
}

impl ChannelScorer for LogisticScorer {
    fn score(&self, windows: &WindowBatch) -> ChannelMatrix {
        self.compute_scores(windows)
    }
}

impl TrainableScorer for LogisticScorer {
    fn forward(&mut self, windows: &WindowBatch) -> ChannelMatrix {
        let scores = self.compute_scores(windows);
        self.cache = Some(ForwardCache {
            input: windows.clone(),
            scores: scores.clone(),
        });
        scores
    }

    fn backward(&mut self, score_grad: &ChannelMatrix) {
        let cache = self
            .cache
            .take()
            .expect("backward without a pending forward pass");
        assert!(
            score_grad.batch() == cache.scores.batch()
                && score_grad.channels() == cache.scores.channels(),
            "gradient shape does not match the forward pass"
        );
        let features = self.features();
        for b in 0..cache.input.batch() {
            for out_c in 0..self.config.channels {
                let s = cache.scores.get(b, out_c);
                let dz = score_grad.get(b, out_c) * s * (1.0 - s);
                if dz == 0.0 {
                    continue;
                }
                let grad_row = &mut self.grad_weights[out_c * features..(out_c + 1) * features];
                for t in 0..self.config.input_steps {
                    for in_c in 0..self.config.channels {
                        grad_row[t * self.config.channels + in_c] +=
                            dz * cache.input.get(t, b, in_c);
                    }
                }
                self.grad_bias[out_c] += dz;
            }
        }
    }

    fn apply_update(&mut self) {
        Self::rmsprop_step(
            &mut self.weights,
            &mut self.grad_weights,
            &mut self.sq_weights,
            &self.config,
        );
        Self::rmsprop_step(
            &mut self.bias,
            &mut self.grad_bias,
            &mut self.sq_bias,
            &self.config,
        );
        self.cache = None;
    }
}

#[inline]
fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
