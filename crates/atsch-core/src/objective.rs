//! Training objective: reliability loss plus blacklisting penalty.
//!
//! The differentiable path never thresholds. The continuous complement
//! `whitelist = 1 − score` carries gradient, the predicted failure
//! `reducedError × whitelist` is pushed toward zero by a binary
//! cross-entropy against an all-zero target, and a mean-score penalty
//! keeps the predictor from blacklisting indiscriminately:
//!
//! ```text
//! total = BCE(reducedError · (1 − score), 0) + penaltyWeight · mean(score)
//! ```
//!
//! Collapsing this soft path onto the hard top-k mask of
//! [`crate::availability`] would change the optimization target; the two
//! must stay separate.
//!
//! Because the predictor sits behind a capability trait, the composer also
//! emits the closed-form gradient of the total loss with respect to each
//! score. The trainer hands that matrix to the predictor, which
//! backpropagates it through its own internals.

use crate::reduction::ReductionPolicy;
use crate::series::ChannelMatrix;

/// Floor for `1 − predictedFailure` inside the logarithm, matching the
/// usual clamped-BCE convention.
const LOG_FLOOR: f64 = 1e-12;

/// A composed scalar loss and its gradient with respect to the scores.
#[derive(Debug, Clone)]
pub struct Objective {
    /// Binary cross-entropy of the predicted failure against zero.
    pub cross_entropy: f64,
    /// Mean blacklist score.
    pub penalty: f64,
    /// `cross_entropy + penalty_weight × penalty`.
    pub total: f64,
    /// `∂ total / ∂ score`, one entry per (decision, channel).
    pub score_grad: ChannelMatrix,
}

/// Combines reduced error and continuous scores into the training loss.
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveComposer {
    penalty_weight: f64,
}

impl ObjectiveComposer {
    /// Compose with an explicit penalty weight.
    pub fn new(penalty_weight: f64) -> Self {
        assert!(penalty_weight >= 0.0, "penalty weight must be non-negative");
        Self { penalty_weight }
    }

    /// Compose with the penalty weight paired to a reduction policy.
    pub fn for_policy(policy: ReductionPolicy) -> Self {
        Self::new(policy.penalty_weight())
    }

    /// The blacklisting-penalty weight in use.
    pub fn penalty_weight(&self) -> f64 {
        self.penalty_weight
    }

    /// Compose the loss for one batch.
    ///
    /// `effective_error` is the reduced per-channel error estimate in
    /// [0, 1]; `scores` are the predictor's continuous blacklist scores in
    /// [0, 1] (not thresholded).
    ///
    /// # Panics
    ///
    /// Panics if the two matrices disagree in shape.
    pub fn compose(&self, effective_error: &ChannelMatrix, scores: &ChannelMatrix) -> Objective {
        assert!(
            effective_error.batch() == scores.batch()
                && effective_error.channels() == scores.channels(),
            "error and score shapes differ"
        );
        let count = (scores.batch() * scores.channels()) as f64;
        let mut grad = ChannelMatrix::zeros(scores.batch(), scores.channels());
        let mut bce_sum = 0.0;
        let mut score_sum = 0.0;

        for b in 0..scores.batch() {
            for c in 0..scores.channels() {
                let e = effective_error.get(b, c);
                let s = scores.get(b, c);
                let whitelist = 1.0 - s;
                let failure = e * whitelist;
                let survivor = (1.0 - failure).max(LOG_FLOOR);

                bce_sum += -survivor.ln();
                score_sum += s;
                // d(-ln(1 - e(1-s)))/ds = -e / (1 - e(1-s)); penalty adds
                // penalty_weight per element, both scaled by the mean.
                grad.set(b, c, (self.penalty_weight - e / survivor) / count);
            }
        }

        let cross_entropy = bce_sum / count;
        let penalty = score_sum / count;
        Objective {
            cross_entropy,
            penalty,
            total: cross_entropy + self.penalty_weight * penalty,
            score_grad: grad,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(values: &[f64], batch: usize, channels: usize) -> ChannelMatrix {
        ChannelMatrix::from_vec(values.to_vec(), batch, channels)
    }

    #[test]
    fn test_zero_scores_and_zero_error_give_zero_loss() {
        let zeros = ChannelMatrix::zeros(2, 4);
        let objective = ObjectiveComposer::new(0.05).compose(&zeros, &zeros);
        assert_eq!(objective.cross_entropy, 0.0);
        assert_eq!(objective.penalty, 0.0);
        assert_eq!(objective.total, 0.0);
    }

    #[test]
    fn test_full_blacklist_hides_all_error() {
        // score = 1 everywhere: predicted failure vanishes regardless of the
        // error estimate, and the penalty saturates at 1.
        let error = matrix(&[0.5, 0.9, 0.2, 0.7], 1, 4);
        let ones = matrix(&[1.0; 4], 1, 4);
        let objective = ObjectiveComposer::new(0.55).compose(&error, &ones);
        assert!(objective.cross_entropy.abs() < 1e-12);
        assert!((objective.penalty - 1.0).abs() < 1e-12);
        assert!((objective.total - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_residual_error_on_whitelisted_channels_is_penalized() {
        let error = matrix(&[0.4], 1, 1);
        let none = matrix(&[0.0], 1, 1);
        let half = matrix(&[0.5], 1, 1);
        let composer = ObjectiveComposer::new(0.0);
        let open = composer.compose(&error, &none);
        let hedged = composer.compose(&error, &half);
        // Blacklisting a lossy channel lowers the reliability loss.
        assert!(hedged.cross_entropy < open.cross_entropy);
        assert!((open.cross_entropy - (-(0.6_f64).ln())).abs() < 1e-12);
    }

    #[test]
    fn test_gradient_matches_finite_differences() {
        let error = matrix(&[0.3, 0.6, 0.05, 0.45, 0.2, 0.5], 2, 3);
        let scores = matrix(&[0.2, 0.7, 0.4, 0.1, 0.55, 0.35], 2, 3);
        let composer = ObjectiveComposer::new(0.05);
        let objective = composer.compose(&error, &scores);

        let h = 1e-6;
        for b in 0..2 {
            for c in 0..3 {
                let mut plus = scores.clone();
                plus.set(b, c, plus.get(b, c) + h);
                let mut minus = scores.clone();
                minus.set(b, c, minus.get(b, c) - h);
                let numeric = (composer.compose(&error, &plus).total
                    - composer.compose(&error, &minus).total)
                    / (2.0 * h);
                let analytic = objective.score_grad.get(b, c);
                assert!(
                    (numeric - analytic).abs() < 1e-6,
                    "grad mismatch at ({b},{c}): numeric {numeric} vs analytic {analytic}"
                );
            }
        }
    }

    #[test]
    fn test_penalty_weight_scales_total_only() {
        let error = matrix(&[0.3, 0.1], 1, 2);
        let scores = matrix(&[0.4, 0.2], 1, 2);
        let light = ObjectiveComposer::for_policy(ReductionPolicy::WeightedMean).compose(&error, &scores);
        let heavy = ObjectiveComposer::for_policy(ReductionPolicy::Max).compose(&error, &scores);
        assert_eq!(light.cross_entropy, heavy.cross_entropy);
        assert_eq!(light.penalty, heavy.penalty);
        assert!(heavy.total > light.total);
    }
}
