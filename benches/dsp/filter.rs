//! Benchmarks for the ladder, high-pass and band-pass filters.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voltbank::dsp::filter::{BandPass, LadderLowPass, OnePoleHighPass};

use crate::{BLOCK_SIZES, DT};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();
        let mut buffer = input.clone();

        let mut ladder = LadderLowPass::new();
        group.bench_with_input(BenchmarkId::new("ladder", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(input.iter()) {
                    *out = ladder.process(x, black_box(1_000.0), 1.2, DT);
                }
            })
        });

        // Cutoff moving every sample, as under envelope modulation
        let mut ladder = LadderLowPass::new();
        group.bench_with_input(BenchmarkId::new("ladder_sweep", size), &size, |b, _| {
            b.iter(|| {
                for (i, (out, &x)) in buffer.iter_mut().zip(input.iter()).enumerate() {
                    let cutoff = 200.0 + 20.0 * i as f32;
                    *out = ladder.process(x, black_box(cutoff), 1.2, DT);
                }
            })
        });

        let mut high_pass = OnePoleHighPass::new();
        group.bench_with_input(BenchmarkId::new("highpass", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(input.iter()) {
                    *out = high_pass.process(x, black_box(1_000.0), DT);
                }
            })
        });

        let mut band_pass = BandPass::new();
        group.bench_with_input(BenchmarkId::new("bandpass", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(input.iter()) {
                    *out = band_pass.process(x, black_box(1_000.0), 300.0, 1.0, DT);
                }
            })
        });
    }

    group.finish();
}
