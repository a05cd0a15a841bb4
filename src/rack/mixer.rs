//! Five-channel summing mixer with attenuverters and a stereo bus.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::mix::{Channel, StereoBus},
    rack::node::{Input, Output, ProcessCtx, RackModule},
    CV_SCALE_BIPOLAR,
};

pub const MIXER_CHANNELS: usize = 5;

/// Attenuverter travel either side of zero.
pub const MAX_ATTENUVERTER: f32 = 1.2;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MixerChannelParams {
    /// −1.2 … 1.2, zero mutes the channel.
    pub attenuverter: f32,
    /// −1 hard left … 1 hard right.
    pub pan: f32,
}

impl MixerChannelParams {
    fn clamped(self) -> Self {
        Self {
            attenuverter: self.attenuverter.clamp(-MAX_ATTENUVERTER, MAX_ATTENUVERTER),
            pan: self.pan.clamp(-1.0, 1.0),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MixerParams {
    pub channels: [MixerChannelParams; MIXER_CHANNELS],
}

pub struct MixerModule {
    pub params: MixerParams,

    pub inputs: [Input; MIXER_CHANNELS],
    /// Gain CV, 5 V adds one unit to the attenuverter.
    pub cv: [Input; MIXER_CHANNELS],

    /// Direct outputs. Patching one takes its channel off the bus.
    pub outputs: [Output; MIXER_CHANNELS],
    pub left: Output,
    pub right: Output,

    channels: [Channel; MIXER_CHANNELS],
    bus: StereoBus,
}

impl MixerModule {
    pub fn new(params: MixerParams) -> Self {
        let params = MixerParams {
            channels: params.channels.map(MixerChannelParams::clamped),
        };
        tracing::debug!(?params, "mixer module created");

        Self {
            params,
            inputs: [Input::unpatched(); MIXER_CHANNELS],
            cv: [Input::unpatched(); MIXER_CHANNELS],
            outputs: [Output::new(); MIXER_CHANNELS],
            left: Output::new(),
            right: Output::new(),
            channels: [Channel::new(); MIXER_CHANNELS],
            bus: StereoBus::new(),
        }
    }
}

impl Default for MixerModule {
    fn default() -> Self {
        Self::new(MixerParams::default())
    }
}

impl RackModule for MixerModule {
    fn process(&mut self, _ctx: &ProcessCtx) {
        self.bus.clear();

        for i in 0..MIXER_CHANNELS {
            let knobs = self.params.channels[i];
            let gain = match self.cv[i].value() {
                Some(cv) => knobs.attenuverter + cv / CV_SCALE_BIPOLAR,
                None => knobs.attenuverter,
            };

            let out = self.channels[i].process(self.inputs[i].value_or(0.0), gain);
            self.outputs[i].set(out);

            if !self.outputs[i].connected {
                self.bus.add(out, knobs.pan);
            }
        }

        let (left, right) = self.bus.finish();
        self.left.set(left);
        self.right.set(right);
    }
}
