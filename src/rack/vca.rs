//! Five-channel VCA with unipolar gain CV and a stereo bus.
//!
//! Every channel CV is unipolar: 0 V closes the channel, 10 V opens it to
//! the level knob. Channels 1 and 5 carry a switch that turns their CV into
//! a pan control instead, with 5 V in the center:
//!
//! ```text
//!   cv      0 V     2.5 V    5 V     7.5 V    10 V
//!   pan    −1.0    −0.5     0.0     0.5      1.0
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::mix::{Channel, StereoBus},
    rack::node::{Input, Output, ProcessCtx, RackModule},
    CV_SCALE_BIPOLAR, CV_SCALE_UNIPOLAR,
};

pub const VCA_CHANNELS: usize = 5;

/// Channels (zero-based) whose CV can be switched to panning.
const SWITCHED_CHANNELS: [usize; 2] = [0, VCA_CHANNELS - 1];

/// What a switchable channel's CV jack controls.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CvMode {
    #[default]
    Volume,
    Pan,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VcaChannelParams {
    /// 0 … 1.
    pub level: f32,
    /// −1 … 1.
    pub pan: f32,
}

impl Default for VcaChannelParams {
    fn default() -> Self {
        Self {
            level: 1.0,
            pan: 0.0,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VcaParams {
    pub channels: [VcaChannelParams; VCA_CHANNELS],
    /// CV switches for channel 1 and channel 5.
    pub cv_modes: [CvMode; 2],
}

/// Map a 0–10 V control voltage to a pan position.
#[inline]
pub fn cv_to_pan(cv: f32) -> f32 {
    (cv / CV_SCALE_BIPOLAR - 1.0).clamp(-1.0, 1.0)
}

/// Map a 0–10 V control voltage to a gain factor.
#[inline]
pub fn cv_to_gain(cv: f32) -> f32 {
    (cv / CV_SCALE_UNIPOLAR).clamp(0.0, 1.0)
}

pub struct VcaModule {
    pub params: VcaParams,

    pub inputs: [Input; VCA_CHANNELS],
    pub cv: [Input; VCA_CHANNELS],

    pub outputs: [Output; VCA_CHANNELS],
    pub left: Output,
    pub right: Output,

    channels: [Channel; VCA_CHANNELS],
    bus: StereoBus,
}

impl VcaModule {
    pub fn new(mut params: VcaParams) -> Self {
        for knobs in params.channels.iter_mut() {
            knobs.level = knobs.level.clamp(0.0, 1.0);
            knobs.pan = knobs.pan.clamp(-1.0, 1.0);
        }
        tracing::debug!(?params, "vca module created");

        Self {
            params,
            inputs: [Input::unpatched(); VCA_CHANNELS],
            cv: [Input::unpatched(); VCA_CHANNELS],
            outputs: [Output::new(); VCA_CHANNELS],
            left: Output::new(),
            right: Output::new(),
            channels: [Channel::new(); VCA_CHANNELS],
            bus: StereoBus::new(),
        }
    }

    fn cv_mode(&self, channel: usize) -> CvMode {
        SWITCHED_CHANNELS
            .iter()
            .position(|&c| c == channel)
            .map_or(CvMode::Volume, |switch| self.params.cv_modes[switch])
    }
}

impl Default for VcaModule {
    fn default() -> Self {
        Self::new(VcaParams::default())
    }
}

impl RackModule for VcaModule {
    fn process(&mut self, _ctx: &ProcessCtx) {
        self.bus.clear();

        for i in 0..VCA_CHANNELS {
            let VcaChannelParams { mut level, mut pan } = self.params.channels[i];
            if let Some(cv) = self.cv[i].value() {
                match self.cv_mode(i) {
                    CvMode::Volume => level *= cv_to_gain(cv),
                    CvMode::Pan => pan = cv_to_pan(cv),
                }
            }

            let out = self.channels[i].process(self.inputs[i].value_or(0.0), level);
            self.outputs[i].set(out);

            if !self.outputs[i].connected {
                self.bus.add(out, pan);
            }
        }

        let (left, right) = self.bus.finish();
        self.left.set(left);
        self.right.set(right);
    }
}
