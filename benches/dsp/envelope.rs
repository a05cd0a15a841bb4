//! Benchmarks for the AD and ASD envelopes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voltbank::dsp::envelope::{AdEnvelope, AsdEnvelope};

use crate::{BLOCK_SIZES, DT};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up)
        let mut env = AdEnvelope::new(10.0, 10.0);
        env.retrigger();
        group.bench_with_input(BenchmarkId::new("ad_attack", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    env.process(DT, black_box(true));
                    *out = env.env();
                }
            })
        });

        // Sustain phase (holding steady)
        let mut env = AsdEnvelope::new(0.001, 0.7, 0.3);
        env.retrigger();
        for _ in 0..200 {
            env.process(DT, true);
        }
        group.bench_with_input(BenchmarkId::new("asd_sustain", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    env.process(DT, black_box(true));
                    *out = env.env();
                }
            })
        });

        // Retriggered every block, runs through all stages
        let mut env = AdEnvelope::new(0.0005, 0.002);
        group.bench_with_input(BenchmarkId::new("ad_cycle", size), &size, |b, _| {
            b.iter(|| {
                env.retrigger();
                for out in buffer.iter_mut() {
                    env.process(DT, black_box(false));
                    *out = env.env();
                }
            })
        });
    }

    group.finish();
}
