//! Benchmarks for the per-iteration pipeline kernels.
//!
//! Run with: cargo bench -p atsch-core --bench pipeline_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use atsch_core::prelude::*;

fn random_scores(batch: usize, channels: usize, rng: &mut StdRng) -> ChannelMatrix {
    ChannelMatrix::from_vec(
        (0..batch * channels).map(|_| rng.gen_range(0.0..1.0)).collect(),
        batch,
        channels,
    )
}

fn bench_reduction(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduction");
    let mut rng = StdRng::seed_from_u64(1);

    for &slots in &[2_000usize, 10_000] {
        let (batch, channels) = (32, 16);
        let values = SlotTensor::from_fn(slots, batch, channels, |_, _, _| rng.gen_range(0.0..0.5));
        let ones = SlotTensor::from_fn(slots, batch, channels, |_, _, _| 1.0);

        group.throughput(Throughput::Elements((slots * batch * channels) as u64));
        group.bench_with_input(BenchmarkId::new("weighted_mean", slots), &slots, |b, _| {
            b.iter(|| ReductionPolicy::WeightedMean.reduce(black_box(&values), black_box(&ones)))
        });
        group.bench_with_input(BenchmarkId::new("max", slots), &slots, |b, _| {
            b.iter(|| ReductionPolicy::Max.reduce(black_box(&values), black_box(&ones)))
        });
    }
    group.finish();
}

fn bench_availability_mask(c: &mut Criterion) {
    let mut group = c.benchmark_group("availability_mask");
    let mut rng = StdRng::seed_from_u64(2);

    for &batch in &[32usize, 128, 512] {
        let scores = random_scores(batch, 16, &mut rng);
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(BenchmarkId::from_parameter(batch), &batch, |b, _| {
            b.iter(|| AvailabilityMask::from_scores(black_box(&scores), 8))
        });
    }
    group.finish();
}

fn bench_resampler(c: &mut Criterion) {
    let mut group = c.benchmark_group("resampler");
    let mut rng = StdRng::seed_from_u64(3);

    let mut windows = WindowBatch::zeros(10_000, 32, 16);
    for t in 0..10_000 {
        for b in 0..32 {
            for ch in 0..16 {
                windows.set(t, b, ch, rng.gen_range(0.0..1.0));
            }
        }
    }
    let resampler = Resampler::from_rates(2000, 10);
    group.throughput(Throughput::Elements((10_000 * 32 * 16) as u64));
    group.bench_function("downsample_2000_to_10", |b| {
        b.iter(|| resampler.downsample(black_box(&windows)))
    });
    group.finish();
}

fn bench_objective(c: &mut Criterion) {
    let mut group = c.benchmark_group("objective");
    let mut rng = StdRng::seed_from_u64(4);

    let scores = random_scores(32, 16, &mut rng);
    let errors = ChannelMatrix::from_vec(
        (0..32 * 16).map(|_| rng.gen_range(0.0..0.5)).collect(),
        32,
        16,
    );
    let composer = ObjectiveComposer::for_policy(ReductionPolicy::WeightedMean);
    group.bench_function("compose_32x16", |b| {
        b.iter(|| composer.compose(black_box(&errors), black_box(&scores)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_reduction,
    bench_availability_mask,
    bench_resampler,
    bench_objective
);
criterion_main!(benches);
