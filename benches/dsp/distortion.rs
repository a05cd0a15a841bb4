//! Benchmarks for the soft clipper and soft limiter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voltbank::dsp::distortion::{soft_clip, soft_limit_buffer};

use crate::BLOCK_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    for &size in BLOCK_SIZES {
        // Ramp from -8 V to 8 V so half the block is above the threshold
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 16.0 - 8.0)
            .collect();
        let mut buffer = input.clone();

        group.bench_with_input(BenchmarkId::new("soft_limit", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                soft_limit_buffer(black_box(&mut buffer));
            })
        });

        group.bench_with_input(BenchmarkId::new("soft_clip", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(input.iter()) {
                    *out = soft_clip(black_box(x), 2.0);
                }
            })
        });
    }

    group.finish();
}
