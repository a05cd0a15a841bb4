//! Dual voltage-controlled oscillator.
//!
//! Oscillator 1 runs free. Oscillator 2 can be synced to and frequency
//! modulated by oscillator 1 through normalled (internally pre-wired)
//! connections, or by patched signals.
//!
//! ```text
//!   pitch1 ─► OSC 1 ──×5V──┬──────────────────────────► out1
//!                          ├─(normal)─► sync ─┐
//!                          └─(normal)─► fm ───┤
//!   pitch2 ────────────────────────────► OSC 2 ──×5V──► out2
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::oscillator::{pitch_to_freq, FmMode, PhaseOscillator, Waveform},
    rack::{
        control::Controllable,
        node::{Input, Output, ProcessCtx, RackModule},
    },
    CV_SCALE_BIPOLAR, CV_SCALE_UNIPOLAR,
};

pub const MIN_COARSE: f32 = -4.6;
pub const MAX_COARSE: f32 = 5.2;
pub const MAX_FINE: f32 = 0.5;

const MIN_PULSE_WIDTH: f32 = 0.1;
const MAX_PULSE_WIDTH: f32 = 0.9;

/// What the sync switch routes the normalled oscillator 1 signal into.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Hard sync: phase reset on every oscillator 1 cycle.
    Hard,
    #[default]
    Off,
    /// Soft sync: continuous phase pull.
    Soft,
}

/// Knobs for one oscillator.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscParams {
    /// Volts, 1V/oct around C4.
    pub coarse: f32,
    /// Volts, ±half an octave.
    pub fine: f32,
    pub pulse_width: f32,
    pub waveform: Waveform,
}

impl Default for OscParams {
    fn default() -> Self {
        Self {
            coarse: 0.0,
            fine: 0.0,
            pulse_width: 0.5,
            waveform: Waveform::Sine,
        }
    }
}

impl OscParams {
    fn clamped(self) -> Self {
        Self {
            coarse: self.coarse.clamp(MIN_COARSE, MAX_COARSE),
            fine: self.fine.clamp(-MAX_FINE, MAX_FINE),
            pulse_width: self.pulse_width.clamp(MIN_PULSE_WIDTH, MAX_PULSE_WIDTH),
            waveform: self.waveform,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VcoParams {
    pub osc1: OscParams,
    pub osc2: OscParams,
    pub sync: SyncMode,
    /// FM depth in [0, 1].
    pub fm_depth: f32,
    pub fm_mode: FmMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcoParam {
    Coarse1,
    Fine1,
    PulseWidth1,
    Coarse2,
    Fine2,
    PulseWidth2,
    FmDepth,
}

pub struct VcoModule {
    pub params: VcoParams,

    pub pitch1: Input,
    pub pitch2: Input,
    pub pw1: Input,
    pub pw2: Input,
    pub fm: Input,
    pub weak_sync: Input,
    pub strong_sync: Input,

    pub out1: Output,
    pub out2: Output,
    /// Panel light: on for the first half of each oscillator 1 cycle.
    pub blink: f32,

    osc1: PhaseOscillator,
    osc2: PhaseOscillator,
    blink_phase: f32,
}

impl VcoModule {
    pub fn new(params: VcoParams) -> Self {
        let params = VcoParams {
            osc1: params.osc1.clamped(),
            osc2: params.osc2.clamped(),
            fm_depth: params.fm_depth.clamp(0.0, 1.0),
            ..params
        };
        tracing::debug!(?params, "vco module created");

        Self {
            params,
            pitch1: Input::unpatched(),
            pitch2: Input::unpatched(),
            pw1: Input::unpatched(),
            pw2: Input::unpatched(),
            fm: Input::unpatched(),
            weak_sync: Input::unpatched(),
            strong_sync: Input::unpatched(),
            out1: Output::new(),
            out2: Output::new(),
            blink: 0.0,
            osc1: PhaseOscillator::new(),
            osc2: PhaseOscillator::new(),
            blink_phase: 0.0,
        }
    }

    #[inline]
    fn pulse_width(knob: f32, cv: &Input) -> f32 {
        (knob + cv.value_or(0.0) / CV_SCALE_UNIPOLAR).clamp(MIN_PULSE_WIDTH, MAX_PULSE_WIDTH)
    }
}

impl Default for VcoModule {
    fn default() -> Self {
        Self::new(VcoParams::default())
    }
}

impl RackModule for VcoModule {
    fn process(&mut self, ctx: &ProcessCtx) {
        let dt = ctx.sample_time;
        let p = self.params;

        // Oscillator 1 must run first: its output feeds oscillator 2
        let pitch1 = p.osc1.coarse + p.osc1.fine + self.pitch1.value_or(0.0);
        let pw1 = Self::pulse_width(p.osc1.pulse_width, &self.pw1);
        self.osc1.process(pitch1, 0.0, 0.0, pw1, p.osc1.waveform, dt);
        let osc1_volts = self.osc1.output() * CV_SCALE_BIPOLAR;

        let soft_sync = match (self.weak_sync.value(), p.sync) {
            (Some(v), _) => v,
            (None, SyncMode::Soft) => osc1_volts,
            (None, _) => 0.0,
        };
        let hard_sync = match (self.strong_sync.value(), p.sync) {
            (Some(v), _) => v,
            (None, SyncMode::Hard) => osc1_volts,
            (None, _) => 0.0,
        };

        let pitch2 = p.osc2.coarse + p.osc2.fine + self.pitch2.value_or(0.0);
        let pw2 = Self::pulse_width(p.osc2.pulse_width, &self.pw2);
        let fm_volts = self.fm.value_or(osc1_volts);
        self.osc2.process_fm(
            pitch2,
            fm_volts,
            p.fm_depth,
            p.fm_mode,
            soft_sync,
            hard_sync,
            pw2,
            p.osc2.waveform,
            dt,
        );

        self.out1.set(osc1_volts);
        self.out2.set(self.osc2.output() * CV_SCALE_BIPOLAR);

        self.blink_phase += pitch_to_freq(pitch1) * dt;
        self.blink_phase -= self.blink_phase.floor();
        self.blink = if self.blink_phase < 0.5 { 1.0 } else { 0.0 };
    }

    fn reset(&mut self) {
        self.osc1.reset();
        self.osc2.reset();
        self.blink_phase = 0.0;
    }
}

impl Controllable for VcoModule {
    type Param = VcoParam;

    fn set_param(&mut self, param: VcoParam, value: f32) {
        let p = &mut self.params;
        match param {
            VcoParam::Coarse1 => p.osc1.coarse = value.clamp(MIN_COARSE, MAX_COARSE),
            VcoParam::Fine1 => p.osc1.fine = value.clamp(-MAX_FINE, MAX_FINE),
            VcoParam::PulseWidth1 => {
                p.osc1.pulse_width = value.clamp(MIN_PULSE_WIDTH, MAX_PULSE_WIDTH)
            }
            VcoParam::Coarse2 => p.osc2.coarse = value.clamp(MIN_COARSE, MAX_COARSE),
            VcoParam::Fine2 => p.osc2.fine = value.clamp(-MAX_FINE, MAX_FINE),
            VcoParam::PulseWidth2 => {
                p.osc2.pulse_width = value.clamp(MIN_PULSE_WIDTH, MAX_PULSE_WIDTH)
            }
            VcoParam::FmDepth => p.fm_depth = value.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::F_REF;

    fn count_rising(samples: &[f32]) -> usize {
        samples
            .windows(2)
            .filter(|w| w[0] <= 0.0 && w[1] > 0.0)
            .count()
    }

    #[test]
    fn test_outputs_are_five_volt() {
        let mut vco = VcoModule::default();
        let ctx = ProcessCtx::new(48_000.0);
        let mut peak = 0.0f32;
        for _ in 0..2_000 {
            vco.process(&ctx);
            peak = peak.max(vco.out1.voltage.abs()).max(vco.out2.voltage.abs());
        }
        assert!(peak <= 5.0 && peak > 4.9);
    }

    #[test]
    fn test_pitch_input_adds_octaves() {
        let ctx = ProcessCtx::new(48_000.0);
        let mut vco = VcoModule::new(VcoParams {
            osc1: OscParams {
                waveform: Waveform::Saw,
                ..Default::default()
            },
            ..Default::default()
        });
        vco.pitch1 = Input::patched(1.0);

        let out: Vec<f32> = (0..48_000)
            .map(|_| {
                vco.process(&ctx);
                vco.out1.voltage
            })
            .collect();
        // Saw falls through zero once per cycle; count upward wraps instead
        let wraps = out.windows(2).filter(|w| w[1] > w[0] + 5.0).count() as f32;
        assert!((wraps - 2.0 * F_REF).abs() <= 1.0, "{wraps} cycles");
    }

    #[test]
    fn test_hard_sync_locks_osc2_to_osc1() {
        let ctx = ProcessCtx::new(48_000.0);
        let mut vco = VcoModule::new(VcoParams {
            osc1: OscParams::default(),
            osc2: OscParams {
                coarse: 0.6,
                waveform: Waveform::Saw,
                ..Default::default()
            },
            sync: SyncMode::Hard,
            ..Default::default()
        });

        let mut osc1 = Vec::new();
        let mut resets = 0;
        let mut last = 0.0;
        for _ in 0..48_000 {
            vco.process(&ctx);
            osc1.push(vco.out1.voltage);
            if vco.osc2.phase() < last {
                resets += 1;
            }
            last = vco.osc2.phase();
        }

        // osc2 wraps once on its own (≈1.5 × F_REF) and once more on every
        // osc1 cycle, so twice per master cycle give or take the ends
        let master = count_rising(&osc1);
        assert!(resets >= master);
        assert!(resets <= master * 2 + 2, "{resets} resets for {master} cycles");
    }

    #[test]
    fn test_patched_sync_overrides_switch() {
        let ctx = ProcessCtx::new(48_000.0);
        let mut free = VcoModule::default();
        let mut synced = VcoModule::default();
        synced.strong_sync = Input::patched(0.0);

        for n in 0..1_000 {
            // 10 V pulse at sample 500
            synced.strong_sync.voltage = if n == 500 { 10.0 } else { 0.0 };
            free.process(&ctx);
            synced.process(&ctx);
        }
        // Reset at 500, then 500 samples of free running
        let expected = (500.0 * F_REF * ctx.sample_time).fract();
        assert!((synced.osc2.phase() - expected).abs() < 1e-3);
        assert!((free.osc2.phase() - synced.osc2.phase()).abs() > 0.1);
    }

    #[test]
    fn test_fm_is_normalled_to_osc1() {
        let ctx = ProcessCtx::new(48_000.0);
        let mut plain = VcoModule::default();
        let mut modulated = VcoModule::new(VcoParams {
            fm_depth: 0.5,
            ..Default::default()
        });

        let mut diverged = false;
        for _ in 0..1_000 {
            plain.process(&ctx);
            modulated.process(&ctx);
            diverged |= (plain.out2.voltage - modulated.out2.voltage).abs() > 1e-3;
        }
        assert!(diverged);
        // osc1 is untouched by FM
        assert_eq!(plain.out1.voltage, modulated.out1.voltage);
    }

    #[test]
    fn test_blink_follows_osc1() {
        let ctx = ProcessCtx::new(48_000.0);
        let mut vco = VcoModule::default();
        let mut on = 0;
        let n = 48_000;
        for _ in 0..n {
            vco.process(&ctx);
            if vco.blink > 0.5 {
                on += 1;
            }
        }
        let duty = on as f32 / n as f32;
        assert!((duty - 0.5).abs() < 0.01, "duty {duty}");
    }

    #[test]
    fn test_set_param_clamps() {
        let mut vco = VcoModule::default();
        vco.set_param(VcoParam::Coarse2, 40.0);
        vco.set_param(VcoParam::PulseWidth1, 0.0);
        vco.set_param(VcoParam::FmDepth, -1.0);
        assert_eq!(vco.params.osc2.coarse, MAX_COARSE);
        assert_eq!(vco.params.osc1.pulse_width, MIN_PULSE_WIDTH);
        assert_eq!(vco.params.fm_depth, 0.0);
    }
}
