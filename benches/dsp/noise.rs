//! Benchmarks for the noise engine.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voltbank::dsp::noise::NoiseEngine;

use crate::BLOCK_SIZES;

pub fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/noise");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, color) in [("brown", -1.0), ("pink", 0.0), ("white", 1.0), ("mixed", 0.4)] {
            let mut engine = NoiseEngine::with_seed(7);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for out in buffer.iter_mut() {
                        engine.process(black_box(color));
                        *out = engine.noise();
                    }
                })
            });
        }
    }

    group.finish();
}
