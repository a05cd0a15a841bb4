//! Benchmarks for channel strips and the stereo bus.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voltbank::dsp::mix::{Channel, StereoBus};

use crate::BLOCK_SIZES;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        let inputs: Vec<[f32; 5]> = (0..size)
            .map(|i| {
                let x = (i as f32 / size as f32) * 10.0 - 5.0;
                [x, -x, x * 0.5, 1.0, -2.0]
            })
            .collect();
        let pans = [-1.0, -0.5, 0.0, 0.5, 1.0];
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // Five channels summed to a stereo bus
        let mut channels = [Channel::new(); 5];
        let mut bus = StereoBus::new();
        group.bench_with_input(BenchmarkId::new("five_channel", size), &size, |b, _| {
            b.iter(|| {
                for ((frame, l), r) in inputs.iter().zip(left.iter_mut()).zip(right.iter_mut()) {
                    bus.clear();
                    for ((channel, &x), &pan) in channels.iter_mut().zip(frame).zip(&pans) {
                        let out = channel.process(black_box(x), 1.1);
                        bus.add(out, pan);
                    }
                    (*l, *r) = bus.finish();
                }
            })
        });
    }

    group.finish();
}
