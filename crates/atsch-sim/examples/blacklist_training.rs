//! # Adaptive TSCH Blacklisting Example
//!
//! Trains the two blacklisting predictor variants (weighted-mean and max
//! interference reduction) on a synthetic interference recording, then
//! compares packet reception and per-packet energy against the plain and
//! sensing-assisted TSCH schedules.
//!
//! Run with: cargo run --example blacklist_training

use atsch_core::prelude::*;
use atsch_sim::error_model::BitErrorModel;
use atsch_sim::protocols::{TschConfig, TschSimulator};
use atsch_sim::reception::PacketReceptionModel;
use atsch_sim::synthetic::{self, SyntheticConfig};
use atsch_sim::EnergyModel;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    println!("=== Adaptive TSCH Blacklisting Example ===\n");

    let config = PipelineConfig {
        sample_rate: 200,
        target_rate: 10,
        past_window_s: 2,
        future_window_s: 2,
        channels: 16,
        exclusion_budget: 8,
        train_split_s: 48,
    };
    config.validate().expect("valid pipeline configuration");

    // 60 s synthetic recording: low channels congested, high channels clean.
    let series = synthetic::generate(&SyntheticConfig {
        steps: 60 * config.sample_rate,
        sequences: 1,
        channels: config.channels,
        ..Default::default()
    });
    println!(
        "Recording: {} samples x {} channels at {} Hz",
        series.steps(),
        series.channels(),
        config.sample_rate
    );

    let stats = NormStats::from_training_prefix(&series, config.train_cutoff());
    let simulator = TschSimulator::new(TschConfig::default());
    let error_model = BitErrorModel::default();
    let reception_model = PacketReceptionModel::default();
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

    let mut results: Vec<(String, f64, f64)> = Vec::new();

    // Reference schedules without a predictor.
    let full = series.as_window_batch();
    let (baseline_interference, _) = simulator.baseline(&full);
    let baseline_receptions =
        reception_model.apply(&error_model.apply(&baseline_interference));
    let baseline_series: Vec<f64> = (0..series.steps())
        .map(|t| baseline_receptions.get(t, 0))
        .collect();
    let prr = evaluator.metric_mean(&baseline_series).expect("metric window");
    results.push((
        "Standard TSCH".into(),
        prr,
        EnergyModel::default().without_sensing().per_packet_uj(prr),
    ));

    let sensing_interference = simulator.adaptive(&full, config.rate_ratio());
    let sensing_receptions =
        reception_model.apply(&error_model.apply(&sensing_interference));
    let sensing_series: Vec<f64> = (0..series.steps())
        .map(|t| sensing_receptions.get(t, 0))
        .collect();
    let prr = evaluator.metric_mean(&sensing_series).expect("metric window");
    results.push((
        "Sensing TSCH".into(),
        prr,
        EnergyModel::default().per_packet_uj(prr),
    ));

    // Train and evaluate both reducer variants.
    for policy in [ReductionPolicy::WeightedMean, ReductionPolicy::Max] {
        println!("\nTraining blacklisting predictor ({})...", policy.label());
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
                iterations: 300,
                batch_size: 16,
                ..Default::default()
            },
        );
        let history = trainer.train(&mut scorer).expect("training run");
        let last = history.last().expect("non-empty history");
        println!(
            "  iterations: {}  final loss: {:.4} (bce {:.4}, penalty {:.4})",
            history.len(),
            last.total,
            last.cross_entropy,
            last.penalty
        );

        let report = evaluator.evaluate(&scorer).expect("evaluation run");
        results.push((
            format!("Blacklisting ({})", policy.label()),
            report.mean_reception,
            EnergyModel::default().per_packet_uj(report.mean_reception),
        ));
    }

    println!("\n{:<22} {:>8} {:>16}", "Schedule", "PRR", "Energy (uJ/pkt)");
    println!("{}", "-".repeat(48));
    for (name, prr, energy) in &results {
        println!("{:<22} {:>8.4} {:>16.2}", name, prr, energy);
    }
}
