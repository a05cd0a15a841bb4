//! Sample & hold module around [`SampleAndHold`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{
        oscillator::Waveform,
        sample_hold::{ClockSource, LagTime, SampleAndHold, SampleHoldInputs},
    },
    rack::node::{Input, Output, ProcessCtx, RackModule},
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleHoldParams {
    /// Source oscillator pitch, volts (1V/oct).
    pub pitch: f32,
    /// Internal clock rate, volts (1V/oct).
    pub rate: f32,
    pub waveform: Waveform,
    /// Glide time in seconds.
    pub lag: f32,
    /// Noise color, −1 … 1.
    pub color: f32,
}

impl Default for SampleHoldParams {
    fn default() -> Self {
        Self {
            pitch: 0.0,
            rate: -5.0,
            waveform: Waveform::Sine,
            lag: LagTime::MIN_SECONDS,
            color: 0.0,
        }
    }
}

pub struct SampleHoldModule {
    pub params: SampleHoldParams,

    pub pitch_in: Input,
    pub clock_in: Input,
    pub sample_in: Input,

    pub out: Output,
    pub clock_out: Output,
    pub noise_out: Output,

    core: SampleAndHold,
}

impl SampleHoldModule {
    pub fn new(params: SampleHoldParams) -> Self {
        Self::with_core(params, SampleAndHold::new())
    }

    pub fn with_seed(params: SampleHoldParams, seed: u64) -> Self {
        Self::with_core(params, SampleAndHold::with_seed(seed))
    }

    fn with_core(params: SampleHoldParams, core: SampleAndHold) -> Self {
        tracing::debug!(?params, "sample & hold module created");
        Self {
            params,
            pitch_in: Input::unpatched(),
            clock_in: Input::unpatched(),
            sample_in: Input::unpatched(),
            out: Output::new(),
            clock_out: Output::new(),
            noise_out: Output::new(),
            core,
        }
    }

    /// Value captured on the last clock edge.
    pub fn held(&self) -> f32 {
        self.core.held()
    }
}

impl Default for SampleHoldModule {
    fn default() -> Self {
        Self::new(SampleHoldParams::default())
    }
}

impl RackModule for SampleHoldModule {
    fn process(&mut self, ctx: &ProcessCtx) {
        let p = self.params;
        let clock = match self.clock_in.value() {
            Some(voltage) => ClockSource::External { voltage },
            None => ClockSource::Internal { rate_cv: p.rate },
        };

        let inputs = SampleHoldInputs {
            pitch_cv: p.pitch + self.pitch_in.value_or(0.0),
            clock,
            sample_in: self.sample_in.value(),
            waveform: p.waveform,
            lag: LagTime::new(p.lag),
            color: p.color,
        };
        self.core.process(&inputs, ctx.sample_time);

        self.out.set(self.core.output());
        self.clock_out.set(self.core.clock());
        self.noise_out.set(self.core.noise());
    }

    fn reset(&mut self) {
        self.core.reset();
    }
}
