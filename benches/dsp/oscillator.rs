//! Benchmarks for the phase oscillator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voltbank::dsp::oscillator::{FmMode, PhaseOscillator, Waveform};

use crate::{BLOCK_SIZES, DT};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, waveform) in [
            ("sine", Waveform::Sine),
            ("triangle", Waveform::Triangle),
            ("saw", Waveform::Saw),
            ("square", Waveform::Square),
        ] {
            let mut osc = PhaseOscillator::new();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for out in buffer.iter_mut() {
                        osc.process(black_box(0.0), 0.0, 0.0, 0.5, waveform, DT);
                        *out = osc.output();
                    }
                })
            });
        }

        // Hard-synced saw driven by a sine master
        let mut master = PhaseOscillator::new();
        let mut slave = PhaseOscillator::new();
        group.bench_with_input(BenchmarkId::new("hard_sync", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    master.process(-1.0, 0.0, 0.0, 0.5, Waveform::Sine, DT);
                    let sync = master.output() * 5.0;
                    slave.process(black_box(0.4), 0.0, sync, 0.5, Waveform::Saw, DT);
                    *out = slave.output();
                }
            })
        });

        // Exponential FM from a second oscillator
        let mut modulator = PhaseOscillator::new();
        let mut carrier = PhaseOscillator::new();
        group.bench_with_input(BenchmarkId::new("fm_exp", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    modulator.process(-2.0, 0.0, 0.0, 0.5, Waveform::Sine, DT);
                    carrier.process_fm(
                        black_box(0.0),
                        modulator.output() * 5.0,
                        0.5,
                        FmMode::Exponential,
                        0.0,
                        0.0,
                        0.5,
                        Waveform::Sine,
                        DT,
                    );
                    *out = carrier.output();
                }
            })
        });
    }

    group.finish();
}
