//! End-to-end exercise of the blacklisting pipeline against the real
//! TSCH simulator: train both reducer variants on a synthetic recording,
//! evaluate them over the full grid, and check the structural invariants
//! of the stitched reception series.

use atsch_core::prelude::*;
use atsch_sim::error_model::BitErrorModel;
use atsch_sim::protocols::{TschConfig, TschSimulator};
use atsch_sim::reception::PacketReceptionModel;
use atsch_sim::synthetic::{self, SyntheticConfig};
use atsch_sim::EnergyModel;

fn pipeline() -> PipelineConfig {
    PipelineConfig {
        sample_rate: 100,
        target_rate: 10,
        past_window_s: 1,
        future_window_s: 1,
        channels: 16,
        exclusion_budget: 8,
        train_split_s: 8,
    }
}

fn recording() -> Series {
    synthetic::generate(&SyntheticConfig {
        steps: 2000,
        sequences: 1,
        channels: 16,
        seed: 31,
        ..Default::default()
    })
}

fn train_and_evaluate(policy: ReductionPolicy) -> (Vec<IterationMetrics>, EvaluationReport) {
    let config = pipeline();
    config.validate().unwrap();
    let series = recording();
    let stats = NormStats::from_training_prefix(&series, config.train_cutoff());
    let simulator = TschSimulator::new(TschConfig::default());
    let error_model = BitErrorModel::default();
    let reception_model = PacketReceptionModel::default();

    let mut scorer = LogisticScorer::new(ScorerConfig {
        input_steps: config.past_len_downsampled(),
        channels: config.channels,
        ..Default::default()
    });
    let mut trainer = Trainer::new(
        &series,
        &stats,
        &config,
        policy,
        &simulator,
        &error_model,
        TrainerConfig {
            iterations: 30,
            batch_size: 8,
            seed: 17,
        },
    );
    let history = trainer.train(&mut scorer).unwrap();

    let evaluator = Evaluator::new(
        &series,
        &stats,
        &config,
        &simulator,
        &error_model,
        &reception_model,
        EvaluatorConfig {
            metric_start: config.train_cutoff(),
            metric_end: series.steps(),
        },
    );
    let report = evaluator.evaluate(&scorer).unwrap();
    (history, report)
}

#[test]
fn trains_and_evaluates_the_mean_variant() {
    let (history, report) = train_and_evaluate(ReductionPolicy::WeightedMean);

    assert_eq!(history.len(), 30);
    assert!(history.iter().all(|m| m.total.is_finite()
        && m.cross_entropy >= 0.0
        && (0.0..=1.0).contains(&m.penalty)));

    // Grid: pivots 100, 200, ..., 1900.
    assert_eq!(report.pivots, 19);
    assert_eq!(report.receptions.len(), 100 + 19 * 100);
    assert!(report
        .receptions
        .iter()
        .all(|&p| (0.0..=1.0).contains(&p)));
    assert!(report.mean_reception > 0.0 && report.mean_reception <= 1.0);

    // A positive reception ratio yields a finite per-packet energy figure.
    let energy = EnergyModel::default().per_packet_uj(report.mean_reception);
    assert!(energy.is_finite() && energy > 0.0);
}

#[test]
fn trains_and_evaluates_the_max_variant() {
    let (history, report) = train_and_evaluate(ReductionPolicy::Max);
    assert_eq!(history.len(), 30);
    assert_eq!(report.receptions.len(), 2000);
    assert!(report.mean_reception > 0.0 && report.mean_reception <= 1.0);
}

#[test]
fn evaluation_is_reproducible_for_a_persisted_scorer() {
    let config = pipeline();
    let series = recording();
    let stats = NormStats::from_training_prefix(&series, config.train_cutoff());
    let simulator = TschSimulator::new(TschConfig::default());
    let error_model = BitErrorModel::default();
    let reception_model = PacketReceptionModel::default();

    let scorer = LogisticScorer::new(ScorerConfig {
        input_steps: config.past_len_downsampled(),
        channels: config.channels,
        ..Default::default()
    });

    // Persist the parameters, restore into a fresh instance, evaluate both.
    let (weights, bias) = scorer.export_weights();
    let mut restored = LogisticScorer::new(ScorerConfig {
        input_steps: config.past_len_downsampled(),
        channels: config.channels,
        seed: 999,
        ..Default::default()
    });
    restored.load_weights(&weights, &bias);

    let evaluator = Evaluator::new(
        &series,
        &stats,
        &config,
        &simulator,
        &error_model,
        &reception_model,
        EvaluatorConfig {
            metric_start: config.train_cutoff(),
            metric_end: series.steps(),
        },
    );
    let first = evaluator.evaluate(&scorer).unwrap();
    let second = evaluator.evaluate(&restored).unwrap();
    assert_eq!(first.receptions, second.receptions);
}

#[test]
fn baseline_prefix_matches_the_unrestricted_schedule() {
    let config = pipeline();
    let series = recording();
    let stats = NormStats::from_training_prefix(&series, config.train_cutoff());
    let simulator = TschSimulator::new(TschConfig::default());
    let error_model = BitErrorModel::default();
    let reception_model = PacketReceptionModel::default();

    let scorer = LogisticScorer::new(ScorerConfig {
        input_steps: config.past_len_downsampled(),
        channels: config.channels,
        ..Default::default()
    });
    let evaluator = Evaluator::new(
        &series,
        &stats,
        &config,
        &simulator,
        &error_model,
        &reception_model,
        EvaluatorConfig {
            metric_start: config.train_cutoff(),
            metric_end: series.steps(),
        },
    );
    let report = evaluator.evaluate(&scorer).unwrap();

    // Recompute the unrestricted schedule's receptions independently; the
    // pre-decision prefix must match it sample for sample.
    let (interference, _) = simulator.baseline(&series.as_window_batch());
    let baseline_receptions = reception_model.apply(&error_model.apply(&interference));
    for t in 0..config.past_len() {
        assert_eq!(report.receptions[t], baseline_receptions.get(t, 0));
    }
}
