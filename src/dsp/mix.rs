//! Channel gain, panning and bus summation.

use crate::dsp::distortion::soft_limit;

/*
Summing Mixer
=============

Vocabulary
----------

  attenuverter  A knob spanning −1.2 … +1.2. Past zero it inverts the
                signal, and past ±1 it adds a little gain.

  gain CV       An external voltage added to the attenuverter, scaled so
                that 5 V is one unit of gain:

                    gain = attenuverter + cv / 5

  pan           Position in the stereo field, −1 (hard left) … +1 (hard
                right). Linear law:

                    left  = (1 − pan) / 2
                    right = (1 + pan) / 2

                     pan   −1.0   −0.5    0.0    0.5    1.0
                     L      1.0    0.75   0.5    0.25   0.0
                     R      0.0    0.25   0.5    0.75   1.0

  bus           The L/R sum of every channel that is not patched out
                through its own direct output.


Signal Flow
-----------

    in ──×gain──► soft_limit ──┬──► direct out
                               │
                               └─pan─► L/R bus ──Σ──► soft_limit ──► L/R out

The limiter runs once per summing point: once on each channel, once on each
bus total. The bus total is never limited per contribution.
*/

/// Linear pan law. `pan` is clamped to [-1, 1].
#[inline]
pub fn pan_gains(pan: f32) -> (f32, f32) {
    let pan = if pan.is_finite() { pan.clamp(-1.0, 1.0) } else { 0.0 };
    ((1.0 - pan) * 0.5, (1.0 + pan) * 0.5)
}

/// One mixer strip: gain followed by the soft limiter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Channel {
    output: f32,
}

impl Channel {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn process(&mut self, input: f32, gain: f32) -> f32 {
        self.output = soft_limit(input * gain);
        self.output
    }

    #[inline]
    pub fn output(&self) -> f32 {
        self.output
    }
}

/// Stereo summing bus, limited once when read out.
#[derive(Debug, Clone, Copy, Default)]
pub struct StereoBus {
    left: f32,
    right: f32,
}

impl StereoBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new sample.
    #[inline]
    pub fn clear(&mut self) {
        self.left = 0.0;
        self.right = 0.0;
    }

    /// Accumulate `sample` at `pan`.
    #[inline]
    pub fn add(&mut self, sample: f32, pan: f32) {
        let (left, right) = pan_gains(pan);
        self.left += sample * left;
        self.right += sample * right;
    }

    /// Limited (left, right) totals for this sample.
    #[inline]
    pub fn finish(&self) -> (f32, f32) {
        (soft_limit(self.left), soft_limit(self.right))
    }
}
