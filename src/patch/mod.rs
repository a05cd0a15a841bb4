//! Knob presets and a small fixed patch built from the rack modules.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{lfo::LfoShape, oscillator::Waveform},
    rack::{
        envelope::{EnvelopePairParams, EnvelopeParams},
        filter::FilterParams,
        lfo::{LfoChannelParams, LfoParams},
        mixer::{MixerChannelParams, MixerParams},
        vca::{VcaChannelParams, VcaParams},
        vco::{OscParams, SyncMode, VcoParams},
    },
};

mod demo;

pub use demo::DemoRack;

/// A full set of knob positions for the modules in a [`DemoRack`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RackPreset {
    pub name: String,
    pub description: Option<String>,
    pub vco: VcoParams,
    pub lfo: LfoParams,
    pub envelope: EnvelopeParams,
    pub filter: FilterParams,
    pub vca: VcaParams,
    pub mixer: MixerParams,
}

impl Default for RackPreset {
    /// Synced saw through a resonant low-pass, plucked by the first LFO.
    fn default() -> Self {
        let mut mixer = MixerParams::default();
        mixer.channels[0] = MixerChannelParams {
            attenuverter: 1.0,
            pan: -1.0,
        };
        mixer.channels[1] = MixerChannelParams {
            attenuverter: 1.0,
            pan: 1.0,
        };

        let mut vca = VcaParams::default();
        vca.channels[0] = VcaChannelParams {
            level: 0.8,
            pan: 0.0,
        };

        let pluck = EnvelopePairParams {
            ad_attack: 0.05,
            ad_release: 0.35,
            ..Default::default()
        };

        Self {
            name: "Synced Pluck".to_string(),
            description: Some("LFO-clocked AD envelope on a soft-synced saw".to_string()),
            vco: VcoParams {
                osc1: OscParams {
                    coarse: -2.0,
                    ..Default::default()
                },
                osc2: OscParams {
                    coarse: -1.0,
                    fine: 0.2,
                    waveform: Waveform::Saw,
                    ..Default::default()
                },
                sync: SyncMode::Soft,
                ..Default::default()
            },
            lfo: LfoParams {
                lfo1: LfoChannelParams {
                    rate: -5.0,
                    shape: LfoShape::Pulse,
                },
                ..Default::default()
            },
            envelope: EnvelopeParams {
                pairs: [pluck, EnvelopePairParams::default()],
            },
            filter: FilterParams {
                lp_cutoff: 1_200.0,
                lp_resonance: 1.0,
                ..Default::default()
            },
            vca,
            mixer,
        }
    }
}
