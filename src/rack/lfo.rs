//! Dual LFO module.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::lfo::{Lfo, LfoShape, DEFAULT_RATE, MAX_RATE, MIN_RATE},
    rack::{
        control::Controllable,
        node::{Input, Output, ProcessCtx, RackModule},
    },
    CV_SCALE_BIPOLAR,
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LfoChannelParams {
    /// Rate knob in volts, [-6, -4.6].
    pub rate: f32,
    pub shape: LfoShape,
}

impl Default for LfoChannelParams {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            shape: LfoShape::Triangle,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LfoParams {
    pub lfo1: LfoChannelParams,
    pub lfo2: LfoChannelParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LfoParam {
    Rate1,
    Rate2,
}

pub struct LfoModule {
    pub params: LfoParams,
    /// Rate CV, added to the knob (1V/oct).
    pub cv1: Input,
    pub cv2: Input,
    pub out1: Output,
    pub out2: Output,
    lfo1: Lfo,
    lfo2: Lfo,
}

impl LfoModule {
    pub fn new(mut params: LfoParams) -> Self {
        params.lfo1.rate = params.lfo1.rate.clamp(MIN_RATE, MAX_RATE);
        params.lfo2.rate = params.lfo2.rate.clamp(MIN_RATE, MAX_RATE);
        tracing::debug!(?params, "lfo module created");

        Self {
            params,
            cv1: Input::unpatched(),
            cv2: Input::unpatched(),
            out1: Output::new(),
            out2: Output::new(),
            lfo1: Lfo::new(),
            lfo2: Lfo::new(),
        }
    }
}

impl Default for LfoModule {
    fn default() -> Self {
        Self::new(LfoParams::default())
    }
}

impl RackModule for LfoModule {
    fn process(&mut self, ctx: &ProcessCtx) {
        let dt = ctx.sample_time;
        let LfoParams { lfo1, lfo2 } = self.params;

        self.lfo1
            .process(lfo1.rate + self.cv1.value_or(0.0), Some(lfo1.shape), dt);
        self.lfo2
            .process(lfo2.rate + self.cv2.value_or(0.0), Some(lfo2.shape), dt);

        self.out1.set(self.lfo1.output() * CV_SCALE_BIPOLAR);
        self.out2.set(self.lfo2.output() * CV_SCALE_BIPOLAR);
    }

    fn reset(&mut self) {
        self.lfo1.reset();
        self.lfo2.reset();
    }
}

impl Controllable for LfoModule {
    type Param = LfoParam;

    fn set_param(&mut self, param: LfoParam, value: f32) {
        let value = value.clamp(MIN_RATE, MAX_RATE);
        match param {
            LfoParam::Rate1 => self.params.lfo1.rate = value,
            LfoParam::Rate2 => self.params.lfo2.rate = value,
        }
    }
}
