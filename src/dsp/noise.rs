//! Colored noise generator.

/*
Noise Colors
============

Vocabulary
----------

  white     Independent random samples. Equal energy per Hz, so the spectrum
            is flat. Sounds like hiss.

  brown     White noise run through a leaky integrator. Energy falls 6 dB per
            octave (1/f²). Sounds like surf or distant thunder. The leak term
            (0.99) keeps the integrator from wandering off into DC.

  pink      Energy falls 3 dB per octave (1/f), so every octave carries the
            same energy. No single one-pole filter has that slope; Paul
            Kellet's approximation sums five one-pole trackers with staggered
            corner frequencies whose skirts overlap into a -3 dB/oct line.

  color     A single control in [-1, 1] that sweeps brown → pink → white.


Crossfade Law
-------------

    color   -1.0      -0.5      0.0      0.5      1.0
    brown    1.0       0.5      0.0      0.0      0.0
    pink     0.0       0.5      1.0      0.5      0.0
    white    0.0       0.0      0.0      0.5      1.0

The three weights always sum to 1.0, so the overall level never jumps as
the knob crosses the pink midpoint.


Randomness
----------

Each engine owns its own PCG generator. Seed it with `with_seed` for
reproducible output (tests, offline comparisons) or use `new` for a random
seed. Samples are drawn from a standard normal and scaled by 1.5.
*/

use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rand_pcg::Pcg32;

const WHITE_GAIN: f32 = 1.5;

const BROWN_LEAK: f32 = 0.99;
const BROWN_GAIN: f32 = 0.1;

const PINK_POLES: [f32; 5] = [0.99886, 0.99332, 0.96900, 0.86650, 0.55000];
const PINK_GAINS: [f32; 5] = [0.0555179, 0.0750759, 0.1538520, 0.3104856, 0.5329522];
const PINK_DIRECT: f32 = 0.115926;
const PINK_SCALE: f32 = 0.3;

/// Per-color weights derived from the color control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMix {
    pub brown: f32,
    pub pink: f32,
    pub white: f32,
}

impl ColorMix {
    /// Crossfade weights for `color` in [-1, 1]; values outside are clamped.
    #[inline]
    pub fn from_color(color: f32) -> Self {
        let color = if color.is_finite() {
            color.clamp(-1.0, 1.0)
        } else {
            0.0
        };

        if color < 0.0 {
            Self {
                brown: color.abs(),
                pink: 1.0 + color,
                white: 0.0,
            }
        } else {
            Self {
                brown: 0.0,
                pink: 1.0 - color,
                white: color,
            }
        }
    }

    #[inline]
    pub fn sum(&self) -> f32 {
        self.brown + self.pink + self.white
    }
}

pub struct NoiseEngine {
    rng: Pcg32,
    white: f32,
    brown: f32,
    pink: f32,
    pink_state: [f32; 5],
    noise: f32,
}

impl NoiseEngine {
    /// Engine seeded from the thread-local entropy source.
    pub fn new() -> Self {
        Self::with_seed(rand::random::<u64>())
    }

    /// Deterministic engine; identical seeds produce identical streams.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            white: 0.0,
            brown: 0.0,
            pink: 0.0,
            pink_state: [0.0; 5],
            noise: 0.0,
        }
    }

    /// Draw one white sample, update the brown and pink filters, and mix by
    /// `color`.
    pub fn process(&mut self, color: f32) {
        // White must come first: brown and pink both consume it
        let white: f32 = self.rng.sample::<f32, _>(StandardNormal) * WHITE_GAIN;
        self.white = white;

        self.brown = self.brown * BROWN_LEAK + white * BROWN_GAIN;

        let mut pink = white * PINK_DIRECT;
        for ((state, &pole), &gain) in self
            .pink_state
            .iter_mut()
            .zip(PINK_POLES.iter())
            .zip(PINK_GAINS.iter())
        {
            *state = pole * *state + white * gain;
            pink += *state;
        }
        self.pink = pink * PINK_SCALE;

        let mix = ColorMix::from_color(color);
        self.noise = mix.brown * self.brown + mix.pink * self.pink + mix.white * self.white;
    }

    #[inline]
    pub fn white(&self) -> f32 {
        self.white
    }

    #[inline]
    pub fn brown(&self) -> f32 {
        self.brown
    }

    #[inline]
    pub fn pink(&self) -> f32 {
        self.pink
    }

    /// Color-crossfaded output from the last `process` call.
    #[inline]
    pub fn noise(&self) -> f32 {
        self.noise
    }

    /// Clear the filter memories. The random stream continues.
    pub fn reset(&mut self) {
        self.white = 0.0;
        self.brown = 0.0;
        self.pink = 0.0;
        self.pink_state = [0.0; 5];
        self.noise = 0.0;
    }
}

impl Default for NoiseEngine {
    fn default() -> Self {
        Self::new()
    }
}
