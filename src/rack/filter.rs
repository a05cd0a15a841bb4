//! Triple filter: ladder low-pass, band-pass and high-pass sections.
//!
//! ```text
//!   link off                        link on
//!
//!   lp in ─► LP ─► lp out           lp in ─► LP ─┬───────────────► lp out
//!   bp in ─► BP ─► bp out           bp in ·······▼ BP ─┬─────────► bp out
//!   hp in ─► HP ─► hp out           hp in ··············▼ HP ────► hp out
//! ```
//!
//! With the link switch on, an empty BP or HP input jack is fed from the
//! section above it and the offset knob shifts all three frequencies by the
//! same number of hertz. A patched jack always wins over the series path.
//!
//! Each section frequency is `knob · 2^cv`, plus the offset when linked. The
//! sections clamp the result into their own safe window. Audio enters and
//! leaves in volts but the filters run on `volts / 5`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::filter::{BandPass, FilterRange, LadderLowPass, OnePoleHighPass, MAX_RESONANCE},
    rack::{
        control::Controllable,
        node::{Input, Output, ProcessCtx, RackModule},
    },
    CV_SCALE_BIPOLAR,
};

const MAX_BP_RESONANCE: f32 = 4.0;
const MIN_WIDTH: f32 = 1.0;
const MAX_WIDTH: f32 = 10_000.0;
const MAX_OFFSET: f32 = 5_000.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    pub lp_cutoff: f32,
    pub lp_resonance: f32,
    pub bp_frequency: f32,
    pub bp_width: f32,
    pub bp_resonance: f32,
    pub hp_cutoff: f32,
    pub link: bool,
    /// Shared frequency shift in Hz, applied only while linked.
    pub offset: f32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            lp_cutoff: 1_000.0,
            lp_resonance: 0.5,
            bp_frequency: 1_000.0,
            bp_width: 500.0,
            bp_resonance: 1.0,
            hp_cutoff: 200.0,
            link: false,
            offset: 0.0,
        }
    }
}

impl FilterParams {
    fn clamped(self) -> Self {
        Self {
            lp_cutoff: clamp_knob(
                self.lp_cutoff,
                FilterRange::LOW_PASS.min_hz,
                FilterRange::LOW_PASS.max_hz,
            ),
            lp_resonance: clamp_knob(self.lp_resonance, 0.0, MAX_RESONANCE),
            bp_frequency: clamp_knob(
                self.bp_frequency,
                FilterRange::BAND_PASS.min_hz,
                FilterRange::BAND_PASS.max_hz,
            ),
            bp_width: clamp_knob(self.bp_width, MIN_WIDTH, MAX_WIDTH),
            bp_resonance: clamp_knob(self.bp_resonance, 0.0, MAX_BP_RESONANCE),
            hp_cutoff: clamp_knob(
                self.hp_cutoff,
                FilterRange::HIGH_PASS.min_hz,
                FilterRange::HIGH_PASS.max_hz,
            ),
            link: self.link,
            offset: clamp_knob(self.offset, -MAX_OFFSET, MAX_OFFSET),
        }
    }
}

#[inline]
fn clamp_knob(value: f32, min: f32, max: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        min
    }
}

/// Knob frequency shifted by a 1V/oct control voltage.
#[inline]
pub fn cutoff_hz(knob_hz: f32, cv: f32) -> f32 {
    knob_hz * cv.exp2()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterParam {
    LpCutoff,
    LpResonance,
    BpFrequency,
    BpWidth,
    BpResonance,
    HpCutoff,
    /// Values above 0.5 switch linking on.
    Link,
    Offset,
}

pub struct FilterModule {
    params: FilterParams,

    pub lp_in: Input,
    pub bp_in: Input,
    pub hp_in: Input,
    pub lp_cv: Input,
    pub bp_cv: Input,
    pub hp_cv: Input,

    pub lp_out: Output,
    pub bp_out: Output,
    pub hp_out: Output,

    low_pass: LadderLowPass,
    band_pass: BandPass,
    high_pass: OnePoleHighPass,
}

impl FilterModule {
    pub fn new(params: FilterParams) -> Self {
        let params = params.clamped();
        tracing::debug!(?params, "filter module created");

        Self {
            params,
            lp_in: Input::unpatched(),
            bp_in: Input::unpatched(),
            hp_in: Input::unpatched(),
            lp_cv: Input::unpatched(),
            bp_cv: Input::unpatched(),
            hp_cv: Input::unpatched(),
            lp_out: Output::new(),
            bp_out: Output::new(),
            hp_out: Output::new(),
            low_pass: LadderLowPass::new(),
            band_pass: BandPass::new(),
            high_pass: OnePoleHighPass::new(),
        }
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    #[inline]
    fn section_hz(&self, knob_hz: f32, cv: &Input) -> f32 {
        let hz = cutoff_hz(knob_hz, cv.value_or(0.0));
        if self.params.link {
            hz + self.params.offset
        } else {
            hz
        }
    }

    /// Input for a lower section: its own jack, else the section above when
    /// linked, else silence.
    #[inline]
    fn normalled(&self, jack: &Input, upstream: f32) -> f32 {
        match jack.value() {
            Some(volts) => volts / CV_SCALE_BIPOLAR,
            None if self.params.link => upstream,
            None => 0.0,
        }
    }
}

impl Default for FilterModule {
    fn default() -> Self {
        Self::new(FilterParams::default())
    }
}

impl RackModule for FilterModule {
    fn process(&mut self, ctx: &ProcessCtx) {
        let dt = ctx.sample_time;
        let p = self.params;

        let lp_hz = self.section_hz(p.lp_cutoff, &self.lp_cv);
        let bp_hz = self.section_hz(p.bp_frequency, &self.bp_cv);
        let hp_hz = self.section_hz(p.hp_cutoff, &self.hp_cv);

        let lp_input = self.lp_in.value_or(0.0) / CV_SCALE_BIPOLAR;
        let lp = self.low_pass.process(lp_input, lp_hz, p.lp_resonance, dt);

        let bp_input = self.normalled(&self.bp_in, lp);
        let bp = self
            .band_pass
            .process(bp_input, bp_hz, p.bp_width, p.bp_resonance, dt);

        let hp_input = self.normalled(&self.hp_in, bp);
        let hp = self.high_pass.process(hp_input, hp_hz, dt);

        self.lp_out.set(lp * CV_SCALE_BIPOLAR);
        self.bp_out.set(bp * CV_SCALE_BIPOLAR);
        self.hp_out.set(hp * CV_SCALE_BIPOLAR);
    }

    fn reset(&mut self) {
        self.low_pass.reset();
        self.band_pass.reset();
        self.high_pass.reset();
    }
}

impl Controllable for FilterModule {
    type Param = FilterParam;

    fn set_param(&mut self, param: FilterParam, value: f32) {
        let mut next = self.params;
        match param {
            FilterParam::LpCutoff => next.lp_cutoff = value,
            FilterParam::LpResonance => next.lp_resonance = value,
            FilterParam::BpFrequency => next.bp_frequency = value,
            FilterParam::BpWidth => next.bp_width = value,
            FilterParam::BpResonance => next.bp_resonance = value,
            FilterParam::HpCutoff => next.hp_cutoff = value,
            FilterParam::Link => next.link = value > 0.5,
            FilterParam::Offset => next.offset = value,
        }
        self.params = next.clamped();
    }
}
