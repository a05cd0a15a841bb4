use crate::{
    patch::RackPreset,
    rack::{
        envelope::EnvelopeModule,
        filter::FilterModule,
        lfo::LfoModule,
        mixer::MixerModule,
        node::{ProcessCtx, RackModule},
        vca::VcaModule,
        vco::VcoModule,
    },
    CV_SCALE_BIPOLAR,
};

/*
Demo Patch
==========

    LFO 1 (pulse) ──► ENV ad trigger 1
                          │ ad env 1
                          ▼
    VCO 2 (saw, soft-synced to VCO 1) ──► FILTER lp ──► VCA 1 ──┬─► MIX 1 (hard left)
                                                                └─► MIX 2 (hard right)

Modules run in signal order and each cable is copied right after its source
runs, so no connection in this patch adds a sample of delay.
*/

/// Fixed six-module patch. Owns its modules and does the cable copying.
pub struct DemoRack {
    pub vco: VcoModule,
    pub lfo: LfoModule,
    pub envelope: EnvelopeModule,
    pub filter: FilterModule,
    pub vca: VcaModule,
    pub mixer: MixerModule,
    ctx: ProcessCtx,
}

impl DemoRack {
    pub fn new(preset: &RackPreset, sample_rate: f32) -> Self {
        tracing::debug!(preset = %preset.name, sample_rate, "building demo rack");

        Self {
            vco: VcoModule::new(preset.vco),
            lfo: LfoModule::new(preset.lfo),
            envelope: EnvelopeModule::new(preset.envelope),
            filter: FilterModule::new(preset.filter),
            vca: VcaModule::new(preset.vca),
            mixer: MixerModule::new(preset.mixer),
            ctx: ProcessCtx::new(sample_rate),
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.ctx.sample_rate
    }

    /// One stereo sample, in volts.
    #[inline]
    pub fn process(&mut self) -> (f32, f32) {
        let ctx = self.ctx;

        self.lfo.process(&ctx);
        self.envelope.ad_trigger[0].set(self.lfo.out1.voltage);
        self.envelope.process(&ctx);

        self.vco.process(&ctx);
        self.filter.lp_in.set(self.vco.out2.voltage);
        self.filter.process(&ctx);

        self.vca.inputs[0].set(self.filter.lp_out.voltage);
        self.vca.cv[0].set(self.envelope.ad_out[0].env.voltage);
        self.vca.process(&ctx);

        self.mixer.inputs[0].set(self.vca.left.voltage);
        self.mixer.inputs[1].set(self.vca.right.voltage);
        self.mixer.process(&ctx);

        (self.mixer.left.voltage, self.mixer.right.voltage)
    }

    /// Fill an interleaved buffer of `channels`-wide frames with full-scale
    /// audio (±5 V maps to ±1). Channels past the second repeat the left.
    pub fn render_interleaved(&mut self, buffer: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }
        for frame in buffer.chunks_mut(channels) {
            let (left, right) = self.process();
            let left = left / CV_SCALE_BIPOLAR;
            let right = right / CV_SCALE_BIPOLAR;
            for (i, sample) in frame.iter_mut().enumerate() {
                *sample = if i == 1 { right } else { left };
            }
        }
    }

    pub fn reset(&mut self) {
        self.vco.reset();
        self.lfo.reset();
        self.envelope.reset();
        self.filter.reset();
        self.vca.reset();
        self.mixer.reset();
    }
}
