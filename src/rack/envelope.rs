//! Quad envelope: two AD / ASD pairs.
//!
//! Each pair normally runs its AD and ASD envelopes from separate trigger
//! jacks. With the ASD trigger jack empty the pair chains into a single
//! AHDSR-style contour:
//!
//! ```text
//!   AD trigger ─► AD ──┬─────────────── max ─► ASD out
//!                      │ eoa (10 V)      ▲
//!                      └──────► ASD ─────┘
//!                               ▲ held while the AD gate is high
//! ```
//!
//! The AD peaks, its end-of-attack pulse starts the ASD, and the ASD jack
//! carries whichever of the two is louder: the AD's fall meets the ASD's
//! sustain plateau, and the ASD releases once the gate drops.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::envelope::{cv_to_seconds, AdEnvelope, AsdEnvelope, GateInput},
    rack::{
        control::Controllable,
        node::{Input, Output, ProcessCtx, RackModule},
    },
    CV_SCALE_UNIPOLAR,
};

const PAIRS: usize = 2;

/// Knobs for one AD / ASD pair. Times are normalized [0, 1] positions
/// mapped through [`cv_to_seconds`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopePairParams {
    pub ad_attack: f32,
    pub ad_release: f32,
    pub asd_attack: f32,
    pub asd_sustain: f32,
    pub asd_release: f32,
}

impl Default for EnvelopePairParams {
    fn default() -> Self {
        Self {
            ad_attack: 0.1,
            ad_release: 0.1,
            asd_attack: 0.1,
            asd_sustain: 0.1,
            asd_release: 0.1,
        }
    }
}

impl EnvelopePairParams {
    fn clamped(self) -> Self {
        Self {
            ad_attack: self.ad_attack.clamp(0.0, 1.0),
            ad_release: self.ad_release.clamp(0.0, 1.0),
            asd_attack: self.asd_attack.clamp(0.0, 1.0),
            asd_sustain: self.asd_sustain.clamp(0.0, 1.0),
            asd_release: self.asd_release.clamp(0.0, 1.0),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnvelopeParams {
    pub pairs: [EnvelopePairParams; PAIRS],
}

/// Knob address. The index selects the pair (0 or 1); out-of-range indices
/// are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeParam {
    AdAttack(usize),
    AdRelease(usize),
    AsdAttack(usize),
    AsdSustain(usize),
    AsdRelease(usize),
}

/// Output jacks of one envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeOutputs {
    pub env: Output,
    pub eoa: Output,
    pub eor: Output,
}

#[derive(Debug, Clone, Default)]
struct EnvelopePair {
    ad: AdEnvelope,
    asd: AsdEnvelope,
    ad_gate: GateInput,
    asd_gate: GateInput,
}

impl EnvelopePair {
    fn apply(&mut self, params: &EnvelopePairParams) {
        self.ad.set_attack(cv_to_seconds(params.ad_attack));
        self.ad.set_release(cv_to_seconds(params.ad_release));
        self.asd.set_attack(cv_to_seconds(params.asd_attack));
        self.asd.set_sustain(params.asd_sustain);
        self.asd.set_release(cv_to_seconds(params.asd_release));
    }

    fn process(
        &mut self,
        ad_trigger: &Input,
        asd_trigger: &Input,
        dt: f32,
        ad_out: &mut EnvelopeOutputs,
        asd_out: &mut EnvelopeOutputs,
    ) {
        let (triggered, ad_held) = self.ad_gate.process(ad_trigger.value_or(0.0));
        if triggered {
            self.ad.retrigger();
        }
        self.ad.process(dt, ad_held);

        ad_out.env.set(self.ad.env() * CV_SCALE_UNIPOLAR);
        ad_out.eoa.set(self.ad.eoa() * CV_SCALE_UNIPOLAR);
        ad_out.eor.set(self.ad.eor() * CV_SCALE_UNIPOLAR);

        let chained = !asd_trigger.connected;
        let asd_gate_voltage = if chained {
            ad_out.eoa.voltage
        } else {
            asd_trigger.voltage
        };

        let (triggered, own_held) = self.asd_gate.process(asd_gate_voltage);
        let asd_held = if chained { ad_held } else { own_held };
        if triggered {
            self.asd.retrigger();
        }
        self.asd.process(dt, asd_held);

        let level = if chained {
            self.asd.env().max(self.ad.env())
        } else {
            self.asd.env()
        };
        asd_out.env.set(level * CV_SCALE_UNIPOLAR);
        asd_out.eoa.set(self.asd.eoa() * CV_SCALE_UNIPOLAR);
        asd_out.eor.set(self.asd.eor() * CV_SCALE_UNIPOLAR);
    }

    fn reset(&mut self) {
        self.ad.reset();
        self.asd.reset();
        self.ad_gate.reset();
        self.asd_gate.reset();
    }
}

pub struct EnvelopeModule {
    params: EnvelopeParams,

    pub ad_trigger: [Input; PAIRS],
    pub asd_trigger: [Input; PAIRS],

    pub ad_out: [EnvelopeOutputs; PAIRS],
    pub asd_out: [EnvelopeOutputs; PAIRS],

    pairs: [EnvelopePair; PAIRS],
}

impl EnvelopeModule {
    pub fn new(params: EnvelopeParams) -> Self {
        let params = EnvelopeParams {
            pairs: params.pairs.map(EnvelopePairParams::clamped),
        };
        tracing::debug!(?params, "envelope module created");

        let mut pairs: [EnvelopePair; PAIRS] = Default::default();
        for (pair, knobs) in pairs.iter_mut().zip(params.pairs.iter()) {
            pair.apply(knobs);
        }

        Self {
            params,
            ad_trigger: [Input::unpatched(); PAIRS],
            asd_trigger: [Input::unpatched(); PAIRS],
            ad_out: [EnvelopeOutputs::default(); PAIRS],
            asd_out: [EnvelopeOutputs::default(); PAIRS],
            pairs,
        }
    }

    pub fn params(&self) -> &EnvelopeParams {
        &self.params
    }
}

impl Default for EnvelopeModule {
    fn default() -> Self {
        Self::new(EnvelopeParams::default())
    }
}

impl RackModule for EnvelopeModule {
    fn process(&mut self, ctx: &ProcessCtx) {
        for i in 0..PAIRS {
            self.pairs[i].process(
                &self.ad_trigger[i],
                &self.asd_trigger[i],
                ctx.sample_time,
                &mut self.ad_out[i],
                &mut self.asd_out[i],
            );
        }
    }

    fn reset(&mut self) {
        for pair in self.pairs.iter_mut() {
            pair.reset();
        }
    }
}

impl Controllable for EnvelopeModule {
    type Param = EnvelopeParam;

    fn set_param(&mut self, param: EnvelopeParam, value: f32) {
        let value = value.clamp(0.0, 1.0);
        let index = match param {
            EnvelopeParam::AdAttack(i)
            | EnvelopeParam::AdRelease(i)
            | EnvelopeParam::AsdAttack(i)
            | EnvelopeParam::AsdSustain(i)
            | EnvelopeParam::AsdRelease(i) => i,
        };
        let (Some(knobs), Some(pair)) = (
            self.params.pairs.get_mut(index),
            self.pairs.get_mut(index),
        ) else {
            return;
        };

        match param {
            EnvelopeParam::AdAttack(_) => knobs.ad_attack = value,
            EnvelopeParam::AdRelease(_) => knobs.ad_release = value,
            EnvelopeParam::AsdAttack(_) => knobs.asd_attack = value,
            EnvelopeParam::AsdSustain(_) => knobs.asd_sustain = value,
            EnvelopeParam::AsdRelease(_) => knobs.asd_release = value,
        }
        pair.apply(knobs);
    }
}
