//! Low frequency oscillators and control-signal helpers.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::{pitch_to_freq, PhaseOscillator, Waveform};

/*
Low Frequency Oscillators
=========================

An LFO is the same phase accumulator as an audio oscillator, driven a few
octaves below hearing. Its output moves other parameters instead of being
listened to.

Vocabulary
----------

  rate        Pitch voltage on the same 1V/oct scale as the VCOs. The rate
              knob sits far below 0 V:

                  rate (V)   -6.0    -5.3    -4.6
                  Hz         4.09    6.64    10.8

              An external CV adds to the knob, so +1 V doubles the speed.

  bipolar     Swings −1 … +1 (±5 V at the jack). Symmetric modulation such as
              vibrato.

  unipolar    0 … 1. Modulation that only pushes one way (level, depth).
              unipolar = (bipolar + 1) / 2


Shapes
------

  TRIANGLE   /\/\/\    constant slope, smooth sweeps
  SAW        |\|\|\    falling ramp, rhythmic one-way sweeps
  PULSE      ▔▁▔▁▔▁    50% square, hard on/off switching

The panel switch order is triangle, saw, pulse. Any other position is silent.
*/

/// Default rate knob position in volts.
pub const DEFAULT_RATE: f32 = -5.3;
/// Lowest rate knob position in volts.
pub const MIN_RATE: f32 = -6.0;
/// Highest rate knob position in volts.
pub const MAX_RATE: f32 = -4.6;

const PULSE_WIDTH: f32 = 0.5;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LfoShape {
    #[default]
    Triangle,
    Saw,
    Pulse,
}

impl LfoShape {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(LfoShape::Triangle),
            1 => Some(LfoShape::Saw),
            2 => Some(LfoShape::Pulse),
            _ => None,
        }
    }

    fn waveform(self) -> Waveform {
        match self {
            LfoShape::Triangle => Waveform::Triangle,
            LfoShape::Saw => Waveform::Saw,
            LfoShape::Pulse => Waveform::Square,
        }
    }
}

/// Free-running control oscillator.
#[derive(Debug, Clone, Default)]
pub struct Lfo {
    osc: PhaseOscillator,
}

impl Lfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one sample at `rate` volts. `None` keeps the phase running
    /// and outputs silence.
    #[inline]
    pub fn process(&mut self, rate: f32, shape: Option<LfoShape>, dt: f32) {
        self.osc
            .process_selected(rate, 0.0, 0.0, PULSE_WIDTH, shape.map(LfoShape::waveform), dt);
    }

    /// Bipolar output in [-1, 1].
    #[inline]
    pub fn output(&self) -> f32 {
        self.osc.output()
    }

    pub fn phase(&self) -> f32 {
        self.osc.phase()
    }

    pub fn reset(&mut self) {
        self.osc.reset();
    }
}

/// Frequency in Hz for a rate voltage.
#[inline]
pub fn rate_to_hz(rate: f32) -> f32 {
    pitch_to_freq(rate)
}

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

/// Convert unipolar signal (0.0 to 1.0) to bipolar (-1.0 to +1.0).
#[inline]
pub fn unipolar_to_bipolar(unipolar: f32) -> f32 {
    (unipolar * 2.0) - 1.0
}

/// LFO period in seconds.
///
/// # Example
/// ```
/// use voltbank::dsp::lfo::period_from_frequency;
/// let period = period_from_frequency(5.0);
/// assert!((period - 0.2).abs() < 1e-6); // 5 Hz = 200ms period
/// ```
#[inline]
pub fn period_from_frequency(frequency_hz: f32) -> f32 {
    1.0 / frequency_hz
}

/// Samples per LFO period.
///
/// # Example
/// ```
/// use voltbank::dsp::lfo::samples_per_period;
/// let samples = samples_per_period(5.0, 48000.0);
/// assert_eq!(samples, 9600.0); // 5 Hz at 48kHz = 9600 samples
/// ```
#[inline]
pub fn samples_per_period(frequency_hz: f32, sample_rate: f32) -> f32 {
    sample_rate / frequency_hz
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bipolar_unipolar_conversion() {
        assert!((bipolar_to_unipolar(-1.0) - 0.0).abs() < 1e-6);
        assert!((bipolar_to_unipolar(0.0) - 0.5).abs() < 1e-6);
        assert!((unipolar_to_bipolar(1.0) - 1.0).abs() < 1e-6);
        assert!((unipolar_to_bipolar(0.5) - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_rate_range_in_hz() {
        assert!((rate_to_hz(DEFAULT_RATE) - 6.64).abs() < 0.01);
        assert!((rate_to_hz(MIN_RATE) - 4.09).abs() < 0.01);
        assert!((rate_to_hz(MAX_RATE) - 10.8).abs() < 0.05);
    }

    #[test]
    fn test_default_rate_period() {
        let sample_rate = 48_000.0;
        let expected = samples_per_period(rate_to_hz(DEFAULT_RATE), sample_rate);

        let mut lfo = Lfo::new();
        let mut wraps = Vec::new();
        let mut last = 0.0;
        for n in 0..(expected as usize * 4) {
            lfo.process(DEFAULT_RATE, Some(LfoShape::Saw), 1.0 / sample_rate);
            if lfo.phase() < last {
                wraps.push(n as f32);
            }
            last = lfo.phase();
        }

        assert!(wraps.len() >= 3);
        for pair in wraps.windows(2) {
            assert!((pair[1] - pair[0] - expected).abs() <= 1.0);
        }
    }

    #[test]
    fn test_pulse_is_square() {
        let mut lfo = Lfo::new();
        for _ in 0..10_000 {
            lfo.process(MAX_RATE, Some(LfoShape::Pulse), 1.0 / 48_000.0);
            assert!(lfo.output() == 1.0 || lfo.output() == -1.0);
        }
    }

    #[test]
    fn test_unknown_switch_position_is_silent() {
        assert_eq!(LfoShape::from_index(3), None);
        let mut lfo = Lfo::new();
        lfo.process(DEFAULT_RATE, LfoShape::from_index(3), 1.0 / 48_000.0);
        assert_eq!(lfo.output(), 0.0);
    }
}
