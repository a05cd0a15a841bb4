use crate::{
    dsp::{
        noise::NoiseEngine,
        oscillator::{PhaseOscillator, Waveform},
        trigger::SchmittTrigger,
    },
    CV_SCALE_BIPOLAR,
};

/*
Sample & Hold
=============

    source osc ──×5V──┐
                      ├──(sample_in patched?)──► held ──lag──► out
    sample in ────────┘            ▲
                                   │ fire
    clock osc ──×5V──┐             │
                     ├──► Schmitt ─┘
    external clock ──┘

    noise engine ──────────────────────────────────────────► noise out


Clock
-----

The internal clock is a square oscillator whose ±1 output becomes ±5 V. It
runs on the same 1V/oct scale as everything else, so a rate of −5 V ticks
about eight times a second. A patched clock input replaces it outright.

Edges go through a Schmitt trigger: fire once above 1 V, re-arm only below
0.1 V. A ragged or slowly rising clock still yields one sample per cycle.


Lag
---

The held value steps. A one-pole smoother turns each step into a glide:

    tau   = lag / 4.605        (ln 100: 99% of the way after `lag` seconds)
    alpha = 1 − exp(−dt / tau)
    out  += alpha · (held − out)

Lag times below 1 ms are raised to 1 ms (see `LagTime`).
*/

/// Smoothing time of the output glide, at least 1 ms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LagTime(f32);

impl LagTime {
    pub const MIN_SECONDS: f32 = 0.001;

    /// ln(100): the glide covers 99% of a step in one lag time.
    const TIME_CONSTANTS: f32 = 4.605;

    pub fn new(seconds: f32) -> Self {
        if seconds.is_finite() {
            Self(seconds.max(Self::MIN_SECONDS))
        } else {
            Self(Self::MIN_SECONDS)
        }
    }

    pub fn seconds(self) -> f32 {
        self.0
    }

    #[inline]
    pub fn tau(self) -> f32 {
        self.0 / Self::TIME_CONSTANTS
    }
}

impl Default for LagTime {
    fn default() -> Self {
        Self(Self::MIN_SECONDS)
    }
}

/// Where sampling edges come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockSource {
    /// Internal square clock at `rate_cv` volts (1V/oct).
    Internal { rate_cv: f32 },
    /// A patched clock voltage, used as-is.
    External { voltage: f32 },
}

/// Everything the sample & hold reads for one sample.
#[derive(Debug, Clone, Copy)]
pub struct SampleHoldInputs {
    pub pitch_cv: f32,
    pub clock: ClockSource,
    /// Patched sample input. `None` samples the internal source oscillator.
    pub sample_in: Option<f32>,
    pub waveform: Waveform,
    pub lag: LagTime,
    pub color: f32,
}

impl Default for SampleHoldInputs {
    fn default() -> Self {
        Self {
            pitch_cv: 0.0,
            clock: ClockSource::Internal { rate_cv: -5.0 },
            sample_in: None,
            waveform: Waveform::Sine,
            lag: LagTime::default(),
            color: 0.0,
        }
    }
}

pub struct SampleAndHold {
    source: PhaseOscillator,
    clock: PhaseOscillator,
    noise: NoiseEngine,
    trigger: SchmittTrigger,
    held: f32,
    output: f32,
    clock_voltage: f32,
}

impl SampleAndHold {
    pub fn new() -> Self {
        Self::with_noise(NoiseEngine::new())
    }

    /// Deterministic noise stream, for tests and offline comparisons.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_noise(NoiseEngine::with_seed(seed))
    }

    fn with_noise(noise: NoiseEngine) -> Self {
        Self {
            source: PhaseOscillator::new(),
            clock: PhaseOscillator::new(),
            noise,
            trigger: SchmittTrigger::default(),
            held: 0.0,
            output: 0.0,
            clock_voltage: 0.0,
        }
    }

    /// Advance one sample. Returns true when a new value was sampled.
    pub fn process(&mut self, inputs: &SampleHoldInputs, dt: f32) -> bool {
        self.source
            .process(inputs.pitch_cv, 0.0, 0.0, 0.5, inputs.waveform, dt);

        self.clock_voltage = match inputs.clock {
            ClockSource::Internal { rate_cv } => {
                self.clock
                    .process(rate_cv, 0.0, 0.0, 0.5, Waveform::Square, dt);
                self.clock.output() * CV_SCALE_BIPOLAR
            }
            ClockSource::External { voltage } => voltage,
        };

        self.noise.process(inputs.color);

        let fired = self.trigger.process(self.clock_voltage);
        if fired {
            self.held = inputs
                .sample_in
                .unwrap_or(self.source.output() * CV_SCALE_BIPOLAR);
        }

        let alpha = 1.0 - (-dt.max(0.0) / inputs.lag.tau()).exp();
        self.output += alpha * (self.held - self.output);

        fired
    }

    /// Lagged held value in volts.
    #[inline]
    pub fn output(&self) -> f32 {
        self.output
    }

    /// Value captured on the last clock edge, before the lag.
    #[inline]
    pub fn held(&self) -> f32 {
        self.held
    }

    /// Clock waveform in volts (internal square or the external input).
    #[inline]
    pub fn clock(&self) -> f32 {
        self.clock_voltage
    }

    /// Color-crossfaded noise from the internal engine.
    #[inline]
    pub fn noise(&self) -> f32 {
        self.noise.noise()
    }

    pub fn reset(&mut self) {
        self.source.reset();
        self.clock.reset();
        self.noise.reset();
        self.trigger.reset();
        self.held = 0.0;
        self.output = 0.0;
        self.clock_voltage = 0.0;
    }
}

impl Default for SampleAndHold {
    fn default() -> Self {
        Self::new()
    }
}
