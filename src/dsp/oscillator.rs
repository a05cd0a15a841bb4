use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{dsp::trigger::SchmittTrigger, CV_SCALE_BIPOLAR};

/*
Phase-Accumulating Oscillator
=============================

Vocabulary
----------

  phase         Position inside one cycle, always in [0, 1). Every sample we
                add `freq * dt` and wrap back into range.

  1V/oct        Pitch control voltage. Each volt doubles the frequency:
                    freq = F_REF * 2^pitch
                0 V is middle C (F_REF ≈ 261.63 Hz).

  hard sync     A rising edge on the sync input snaps the phase to 0. The
                slave oscillator restarts its cycle in lock-step with the
                master, producing the classic tearing sync sweep.

  soft sync     Instead of a reset, the sync voltage pulls the phase back a
                little every sample. The pull grows with phase², so it bites
                hardest near the end of the cycle where a real capacitor-reset
                circuit is most sensitive:

                    pull   = sync * 0.15 * phase²
                    phase -= pull * dt * |freq|

  FM            Frequency modulation. Exponential FM adds to the pitch voltage
                (musical, but detunes with depth). Linear FM scales the
                frequency directly and can drive it through zero.


Per-Sample Pipeline
-------------------

The order is fixed:

    1. soft sync pull       (needs the previous phase)
    2. hard sync reset      (edge-detected, per-instance trigger)
    3. accumulate and wrap
    4. waveform synthesis from the final phase

Swapping 1 and 2 changes the character: the pull is meant to act on the
phase the oscillator carried into this sample, before any reset.


Waveforms
---------

    sine      sin(2π·φ)
    triangle  4φ − 1           for φ < 0.5   (−1 → +1)
              3 − 4φ           otherwise     (+1 → −1)
    saw       1 − 2φ                         (+1 → −1, falling ramp)
    square    +1 while φ ≤ pw, −1 after      (pw clamped to [0.1, 0.9])

All four stay inside [−1, +1] by construction.
*/

/// Reference frequency for 0 V pitch (C4).
pub const F_REF: f32 = 261.625_58;

/// Soft sync has no effect below this voltage.
const SOFT_SYNC_FLOOR: f32 = 0.1;
/// Scales the soft sync voltage into a phase pull.
const SOFT_SYNC_STRENGTH: f32 = 0.15;

const MIN_PULSE_WIDTH: f32 = 0.1;
const MAX_PULSE_WIDTH: f32 = 0.9;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Triangle,
    Saw,
    Square,
}

impl Waveform {
    /// Map a switch position to a waveform. Out-of-range positions return
    /// `None`, which the oscillator renders as silence.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Waveform::Sine),
            1 => Some(Waveform::Triangle),
            2 => Some(Waveform::Saw),
            3 => Some(Waveform::Square),
            _ => None,
        }
    }

    #[inline]
    pub fn render(self, phase: f32, pulse_width: f32) -> f32 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Triangle => {
                if phase < 0.5 {
                    phase * 4.0 - 1.0
                } else {
                    3.0 - phase * 4.0
                }
            }
            Waveform::Saw => 1.0 - 2.0 * phase,
            Waveform::Square => {
                let pw = pulse_width.clamp(MIN_PULSE_WIDTH, MAX_PULSE_WIDTH);
                if phase > pw {
                    -1.0
                } else {
                    1.0
                }
            }
        }
    }
}

/// How an FM voltage modulates the oscillator.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FmMode {
    /// `freq = base * (1 + depth * fm / 5V)`; may pass through zero.
    Linear,
    /// `pitch += depth * fm`, in volts per octave.
    #[default]
    Exponential,
}

impl FmMode {
    /// Resolve the modulated frequency in Hz.
    #[inline]
    pub fn frequency(self, pitch_cv: f32, fm_voltage: f32, depth: f32) -> f32 {
        match self {
            FmMode::Exponential => pitch_to_freq(pitch_cv + depth * fm_voltage),
            FmMode::Linear => {
                pitch_to_freq(pitch_cv) * (1.0 + depth * fm_voltage / CV_SCALE_BIPOLAR)
            }
        }
    }
}

/// 1V/oct pitch voltage to Hz.
#[inline]
pub fn pitch_to_freq(pitch_cv: f32) -> f32 {
    F_REF * 2.0_f32.powf(pitch_cv)
}

#[derive(Debug, Clone, Default)]
pub struct PhaseOscillator {
    phase: f32,
    output: f32,
    sync_trigger: SchmittTrigger,
}

impl PhaseOscillator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one sample at `F_REF * 2^pitch_cv`.
    #[inline]
    pub fn process(
        &mut self,
        pitch_cv: f32,
        soft_sync: f32,
        hard_sync: f32,
        pulse_width: f32,
        waveform: Waveform,
        dt: f32,
    ) {
        let freq = pitch_to_freq(pitch_cv);
        self.process_hz(freq, soft_sync, hard_sync, pulse_width, Some(waveform), dt);
    }

    /// Same as [`process`](Self::process) with an FM voltage applied first.
    #[inline]
    #[allow(clippy::too_many_arguments)]
    pub fn process_fm(
        &mut self,
        pitch_cv: f32,
        fm_voltage: f32,
        fm_depth: f32,
        fm_mode: FmMode,
        soft_sync: f32,
        hard_sync: f32,
        pulse_width: f32,
        waveform: Waveform,
        dt: f32,
    ) {
        let freq = fm_mode.frequency(pitch_cv, fm_voltage, fm_depth);
        self.process_hz(freq, soft_sync, hard_sync, pulse_width, Some(waveform), dt);
    }

    /// Advance one sample with a switch-selected waveform. `None` keeps the
    /// phase running but outputs silence.
    #[inline]
    pub fn process_selected(
        &mut self,
        pitch_cv: f32,
        soft_sync: f32,
        hard_sync: f32,
        pulse_width: f32,
        waveform: Option<Waveform>,
        dt: f32,
    ) {
        let freq = pitch_to_freq(pitch_cv);
        self.process_hz(freq, soft_sync, hard_sync, pulse_width, waveform, dt);
    }

    /// Core per-sample update with an explicit frequency in Hz.
    pub fn process_hz(
        &mut self,
        freq: f32,
        soft_sync: f32,
        hard_sync: f32,
        pulse_width: f32,
        waveform: Option<Waveform>,
        dt: f32,
    ) {
        let freq = if freq.is_finite() { freq } else { 0.0 };
        let dt = dt.max(0.0);

        // 1. Soft sync: quadratic pull toward the cycle start
        if soft_sync > SOFT_SYNC_FLOOR {
            let pull = soft_sync * SOFT_SYNC_STRENGTH * self.phase * self.phase;
            self.phase = (self.phase - pull * dt * freq.abs()).max(0.0);
        }

        // 2. Hard sync
        if self.sync_trigger.process(hard_sync) {
            self.phase = 0.0;
        }

        // 3. Accumulate and wrap in constant time, whatever the increment
        self.phase += freq * dt;
        self.phase -= self.phase.floor();
        // A tiny negative phase rounds up to exactly 1.0; an infinite one is NaN
        if !(0.0..1.0).contains(&self.phase) {
            self.phase = 0.0;
        }

        // 4. Synthesis
        self.output = match waveform {
            Some(waveform) => waveform.render(self.phase, pulse_width),
            None => 0.0,
        };

        debug_assert!((0.0..1.0).contains(&self.phase));
    }

    /// Latest sample in [-1, 1].
    #[inline]
    pub fn output(&self) -> f32 {
        self.output
    }

    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.output = 0.0;
        self.sync_trigger.reset();
    }
}
