//! Benchmarks for rack modules and the demo patch.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voltbank::{
    patch::{DemoRack, RackPreset},
    rack::{
        envelope::EnvelopeModule,
        filter::{FilterModule, FilterParams},
        kaos::KaosModule,
        node::{Input, ProcessCtx, RackModule},
        sample_hold::SampleHoldModule,
        vco::{SyncMode, VcoModule, VcoParams},
    },
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn bench_module<M: RackModule>(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    name: &str,
    size: usize,
    module: &mut M,
) {
    let ctx = ProcessCtx::new(SAMPLE_RATE);
    group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
        b.iter(|| {
            for _ in 0..size {
                module.process(black_box(&ctx));
            }
        })
    });
}

pub fn bench_modules(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/modules");

    for &size in BLOCK_SIZES {
        // Both oscillators running, osc2 hard-synced and FM'd from osc1
        let mut vco = VcoModule::new(VcoParams {
            sync: SyncMode::Hard,
            fm_depth: 0.3,
            ..Default::default()
        });
        bench_module(&mut group, "vco_sync_fm", size, &mut vco);

        // All three sections chained, fed a constant
        let mut filter = FilterModule::new(FilterParams {
            link: true,
            ..Default::default()
        });
        filter.lp_in = Input::patched(2.5);
        bench_module(&mut group, "filter_linked", size, &mut filter);

        // Both pairs chained in AHDSR mode, gates held after one edge
        let mut envelope = EnvelopeModule::default();
        envelope.ad_trigger = [Input::patched(0.0); 2];
        envelope.process(&ProcessCtx::new(SAMPLE_RATE));
        envelope.ad_trigger = [Input::patched(10.0); 2];
        bench_module(&mut group, "envelope_ahdsr", size, &mut envelope);

        let mut kaos = KaosModule::with_seed(Default::default(), 1);
        kaos.pink_out.connected = true;
        kaos.brown_out.connected = true;
        bench_module(&mut group, "kaos", size, &mut kaos);

        let mut sample_hold = SampleHoldModule::with_seed(Default::default(), 1);
        bench_module(&mut group, "sample_hold", size, &mut sample_hold);
    }

    group.finish();
}

pub fn bench_demo_rack(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/demo_rack");

    for &size in BLOCK_SIZES {
        let mut rack = DemoRack::new(&RackPreset::default(), SAMPLE_RATE);
        let mut buffer = vec![0.0f32; size * 2];
        group.bench_with_input(BenchmarkId::new("stereo", size), &size, |b, _| {
            b.iter(|| {
                rack.render_interleaved(black_box(&mut buffer), 2);
            })
        });
    }

    group.finish();
}
