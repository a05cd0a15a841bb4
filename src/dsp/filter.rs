use std::f32::consts::TAU;

use crate::dsp::distortion::soft_clip;

/*
| type       | constructed by                     | passes           | rejects          |
| ---------- | ---------------------------------- | ---------------- | ---------------- |
| low-pass   | 12 one-pole stages + feedback      | below cutoff     | above cutoff     |
| high-pass  | one-pole RC differentiator         | above cutoff     | below cutoff     |
| band-pass  | HPF (lower edge) → biquad LPF      | around center    | outside the band |

All three recompute their coefficients every sample from the live cutoff,
so a modulated cutoff never reads a stale coefficient.


Ladder Low-Pass
===============

    input ──(−)──► [1] ─► [2] ─► ... ─► [12] ──┬──► out
             ▲                                  │
             └──── sat( stage12 · resonance ) ◄─┘

  coeff   = 1 − exp(−2π · fc · dt)
  stage_i += coeff · (x − stage_i)        x = previous stage (or signal)

Each stage is a one-pole smoother, so twelve of them roll off steeply. The
feedback path takes the last stage, scales it by resonance and subtracts it
from the input. Around the loop the twelve stages shift phase by 180° long
before the cutoff, so the feedback becomes positive there and the filter
rings.

A purely linear loop with the one-sample feedback delay starts to grow once
resonance passes ≈1.55. The feedback is therefore exactly linear while its
magnitude stays within ±1, and only the excess above that runs through a
soft clipper, so it never exceeds ±2:

  sat(v) = v                                     |v| ≤ 1
  sat(v) = sign(v) · (1 + softclip(|v| − 1))     |v| > 1

At moderate resonance the loop never leaves the linear region. Past ≈1.55
the oscillation grows into the knee and settles into a bounded limit cycle
for every resonance up to MAX_RESONANCE (1.666).


One-Pole High-Pass
==================

  alpha = exp(−2π · fc · dt)
  y[n]  = alpha · (y[n−1] + x[n] − x[n−1])

A DC input produces a single step that then decays by alpha every sample.


Band-Pass
=========

  input ─► HPF @ (f − bw/2) ─► biquad LPF @ f, Q = clamp(f/bw · res, 0.5, 25)

The high-pass cuts what lies below the band. The resonant low-pass peaks at
the center and rolls off above it. Narrower bands give higher Q.

RBJ low-pass coefficients, w = 2π·f·dt, alpha = sin(w) / (2Q):

  a0 = 1 + alpha
  b0 = b2 = (1 − cos w) / (2·a0)
  b1 = (1 − cos w) / a0
  a1 = −2·cos w / a0
  a2 = (1 − alpha) / a0

  y = b0·x + b1·x1 + b2·x2 − a1·y1 − a2·y2


Ranges
======

  low-pass    20 Hz – 22 kHz
  band-pass   30 Hz – 15 kHz
  high-pass   30 Hz – 10 kHz

Every cutoff is additionally capped at 0.45 · sample rate so w stays below π.

If any state value ever turns non-finite, that filter clears itself and
outputs silence for the sample.
*/

/// Highest resonance the ladder is specified for.
pub const MAX_RESONANCE: f32 = 1.666;

/// Largest feedback magnitude the ladder passes untouched.
const LINEAR_FEEDBACK: f32 = 1.0;

/// Magnitude the saturated ladder feedback approaches but never reaches.
const FEEDBACK_CEILING: f32 = 2.0;

/// Fraction of the sample rate no cutoff may exceed.
const NYQUIST_GUARD: f32 = 0.45;

const LADDER_STAGES: usize = 12;

const MIN_Q: f32 = 0.5;
const MAX_Q: f32 = 25.0;
const MIN_BANDWIDTH: f32 = 1.0;

/// Safe frequency window for one filter type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterRange {
    pub min_hz: f32,
    pub max_hz: f32,
}

impl FilterRange {
    pub const LOW_PASS: Self = Self {
        min_hz: 20.0,
        max_hz: 22_000.0,
    };
    pub const BAND_PASS: Self = Self {
        min_hz: 30.0,
        max_hz: 15_000.0,
    };
    pub const HIGH_PASS: Self = Self {
        min_hz: 30.0,
        max_hz: 10_000.0,
    };

    /// Clamp `hz` into the window, also capping at 0.45 · (1 / dt).
    #[inline]
    pub fn clamp(&self, hz: f32, dt: f32) -> f32 {
        let hi = if dt > 0.0 {
            (NYQUIST_GUARD / dt).min(self.max_hz)
        } else {
            self.max_hz
        };
        let lo = self.min_hz.min(hi);

        if hz.is_finite() {
            hz.clamp(lo, hi)
        } else {
            lo
        }
    }
}

/// Identity within ±LINEAR_FEEDBACK, soft-clipped toward ±FEEDBACK_CEILING beyond.
#[inline]
fn saturate_feedback(feedback: f32) -> f32 {
    let magnitude = feedback.abs();
    if magnitude <= LINEAR_FEEDBACK {
        return feedback;
    }
    let excess = soft_clip(magnitude - LINEAR_FEEDBACK, FEEDBACK_CEILING - LINEAR_FEEDBACK);
    (LINEAR_FEEDBACK + excess).copysign(feedback)
}

#[cold]
#[inline(never)]
fn report_reset(filter: &'static str) {
    tracing::warn!(filter, "non-finite filter state, resetting to silence");
}

/// Twelve-stage resonant low-pass.
#[derive(Debug, Clone, Default)]
pub struct LadderLowPass {
    stages: [f32; LADDER_STAGES],
}

impl LadderLowPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter one sample. `resonance` is clamped to [0, MAX_RESONANCE].
    #[inline]
    pub fn process(&mut self, input: f32, cutoff_hz: f32, resonance: f32, dt: f32) -> f32 {
        if !(dt > 0.0) {
            return self.output();
        }

        let cutoff = FilterRange::LOW_PASS.clamp(cutoff_hz, dt);
        let resonance = if resonance.is_finite() {
            resonance.clamp(0.0, MAX_RESONANCE)
        } else {
            0.0
        };
        let coeff = 1.0 - (-TAU * cutoff * dt).exp();

        let feedback = saturate_feedback(self.stages[LADDER_STAGES - 1] * resonance);
        let mut x = input - feedback;
        for stage in self.stages.iter_mut() {
            *stage += coeff * (x - *stage);
            x = *stage;
        }

        if self.stages.iter().any(|s| !s.is_finite()) {
            report_reset("ladder");
            self.reset();
            return 0.0;
        }

        x
    }

    #[inline]
    pub fn output(&self) -> f32 {
        self.stages[LADDER_STAGES - 1]
    }

    pub fn reset(&mut self) {
        self.stages = [0.0; LADDER_STAGES];
    }
}

/// One-pole RC high-pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnePoleHighPass {
    prev_input: f32,
    prev_output: f32,
}

impl OnePoleHighPass {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn process(&mut self, input: f32, cutoff_hz: f32, dt: f32) -> f32 {
        self.process_in_range(input, cutoff_hz, FilterRange::HIGH_PASS, dt)
    }

    /// Same recurrence with a caller-chosen frequency window. The band-pass
    /// uses this for its lower edge.
    #[inline]
    fn process_in_range(&mut self, input: f32, cutoff_hz: f32, range: FilterRange, dt: f32) -> f32 {
        if !(dt > 0.0) {
            return self.prev_output;
        }

        let cutoff = range.clamp(cutoff_hz, dt);
        let alpha = (-TAU * cutoff * dt).exp();
        let output = alpha * (self.prev_output + input - self.prev_input);

        if !output.is_finite() || !input.is_finite() {
            report_reset("high-pass");
            self.reset();
            return 0.0;
        }

        self.prev_input = input;
        self.prev_output = output;
        output
    }

    pub fn reset(&mut self) {
        self.prev_input = 0.0;
        self.prev_output = 0.0;
    }
}

/// Normalized RBJ biquad coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoefficients {
    /// Low-pass at `freq_hz` with quality `q`.
    #[inline]
    pub fn low_pass(freq_hz: f32, q: f32, dt: f32) -> Self {
        let w = TAU * freq_hz * dt;
        let (sin_w, cos_w) = w.sin_cos();
        let alpha = sin_w / (2.0 * q);

        let a0 = 1.0 + alpha;
        let b1 = (1.0 - cos_w) / a0;
        Self {
            b0: b1 * 0.5,
            b1,
            b2: b1 * 0.5,
            a1: -2.0 * cos_w / a0,
            a2: (1.0 - alpha) / a0,
        }
    }
}

/// Direct-form-I biquad section.
#[derive(Debug, Clone, Copy, Default)]
pub struct Biquad {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    #[inline]
    pub fn process(&mut self, input: f32, c: &BiquadCoefficients) -> f32 {
        let y = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    #[inline]
    fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.x2.is_finite() && self.y1.is_finite() && self.y2.is_finite()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// High-pass at the lower band edge feeding a resonant biquad low-pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct BandPass {
    high_pass: OnePoleHighPass,
    low_pass: Biquad,
}

impl BandPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// `bandwidth_hz` sets the lower edge and, with `resonance`, the Q.
    #[inline]
    pub fn process(
        &mut self,
        input: f32,
        center_hz: f32,
        bandwidth_hz: f32,
        resonance: f32,
        dt: f32,
    ) -> f32 {
        if !(dt > 0.0) {
            return self.low_pass.y1;
        }

        let center = FilterRange::BAND_PASS.clamp(center_hz, dt);
        let bandwidth = if bandwidth_hz.is_finite() {
            bandwidth_hz.max(MIN_BANDWIDTH)
        } else {
            MIN_BANDWIDTH
        };
        let resonance = if resonance.is_finite() { resonance.max(0.0) } else { 0.0 };

        let lower_edge = center - bandwidth * 0.5;
        let high = self
            .high_pass
            .process_in_range(input, lower_edge, FilterRange::BAND_PASS, dt);

        let q = (center / bandwidth * resonance).clamp(MIN_Q, MAX_Q);
        let coefficients = BiquadCoefficients::low_pass(center, q, dt);
        let output = self.low_pass.process(high, &coefficients);

        if !self.low_pass.is_finite() {
            report_reset("band-pass");
            self.reset();
            return 0.0;
        }

        output
    }

    pub fn reset(&mut self) {
        self.high_pass.reset();
        self.low_pass.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(buffer: &[f32]) -> f32 {
        buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn ladder_step_response_stays_bounded() {
        for &sample_rate in &[44_100.0f32, 48_000.0, 96_000.0] {
            let dt = 1.0 / sample_rate;
            for &resonance in &[0.0, 0.5, 1.0, 1.4, 1.6, MAX_RESONANCE] {
                for &cutoff in &[20.0, 440.0, 5_000.0, 22_000.0] {
                    let mut ladder = LadderLowPass::new();
                    let out: Vec<f32> = (0..20_000)
                        .map(|_| ladder.process(1.0, cutoff, resonance, dt))
                        .collect();

                    assert!(out.iter().all(|x| x.is_finite()));
                    assert!(
                        peak(&out) <= 1.0 + FEEDBACK_CEILING,
                        "sr {sample_rate} res {resonance} fc {cutoff}: peak {}",
                        peak(&out)
                    );
                    // No runaway past the limit cycle; 20 Hz is still rising at 20k samples
                    if cutoff >= 440.0 {
                        let early = peak(&out[..10_000]);
                        let late = peak(&out[10_000..]);
                        assert!(late <= early + 1e-2, "grew from {early} to {late}");
                    }
                }
            }
        }
    }

    #[test]
    fn ladder_is_linear_at_moderate_resonance() {
        let dt = 1.0 / 48_000.0;
        let resonance = 0.5;
        let coeff = 1.0 - (-TAU * 1_000.0 * dt).exp();

        let mut ladder = LadderLowPass::new();
        let mut reference = [0.0f32; LADDER_STAGES];
        let mut out = 0.0;
        for n in 0..20_000 {
            out = ladder.process(1.0, 1_000.0, resonance, dt);

            let mut x = 1.0 - reference[LADDER_STAGES - 1] * resonance;
            for stage in reference.iter_mut() {
                *stage += coeff * (x - *stage);
                x = *stage;
            }
            assert!((out - x).abs() < 1e-5, "sample {n}: {out} vs {x}");
        }

        // Closed-loop DC gain 1 / (1 + resonance)
        assert!((out - 2.0 / 3.0).abs() < 1e-4, "settled at {out}");
    }

    #[test]
    fn feedback_saturates_only_past_the_linear_region() {
        for &v in &[0.0, 0.3, -0.75, 1.0, -1.0] {
            assert_eq!(saturate_feedback(v), v);
        }
        let pushed = saturate_feedback(1.5);
        assert!(pushed > 1.0 && pushed < 1.5);
        assert_eq!(saturate_feedback(-1.5), -pushed);
        assert!(saturate_feedback(1e6) < FEEDBACK_CEILING);
        assert!(saturate_feedback(1e6) > FEEDBACK_CEILING - 1e-3);
    }

    #[test]
    fn ladder_without_resonance_settles_to_input() {
        let mut ladder = LadderLowPass::new();
        let mut out = 0.0;
        for _ in 0..5_000 {
            out = ladder.process(1.0, 1_000.0, 0.0, 1.0 / 48_000.0);
        }
        assert!((out - 1.0).abs() < 1e-3, "settled at {out}");
    }

    #[test]
    fn ladder_attenuates_above_cutoff() {
        let dt = 1.0 / 48_000.0;
        let mut ladder = LadderLowPass::new();
        let tone = 8_000.0;
        let out: Vec<f32> = (0..4_800)
            .map(|n| {
                let x = (TAU * tone * n as f32 * dt).sin();
                ladder.process(x, 500.0, 0.0, dt)
            })
            .collect();
        assert!(peak(&out[2_400..]) < 0.01);
    }

    #[test]
    fn ladder_resets_on_non_finite_input() {
        let mut ladder = LadderLowPass::new();
        ladder.process(1.0, 1_000.0, 0.5, 1.0 / 48_000.0);
        assert_eq!(ladder.process(f32::NAN, 1_000.0, 0.5, 1.0 / 48_000.0), 0.0);
        assert_eq!(ladder.output(), 0.0);

        let next = ladder.process(0.5, 1_000.0, 0.5, 1.0 / 48_000.0);
        assert!(next.is_finite());
    }

    #[test]
    fn high_pass_blocks_dc() {
        let dt = 1.0 / 48_000.0;
        let mut hp = OnePoleHighPass::new();
        let first = hp.process(1.0, 100.0, dt);
        assert!(first > 0.9);

        let mut out = first;
        for _ in 0..4_000 {
            out = hp.process(1.0, 100.0, dt);
        }
        assert!(out.abs() < 1e-6, "dc leaked: {out}");
    }

    #[test]
    fn band_pass_impulse_decays() {
        let dt = 1.0 / 48_000.0;
        let mut bp = BandPass::new();

        let mut out = Vec::with_capacity(9_600);
        out.push(bp.process(1.0, 1_000.0, 100.0, 1.0, dt));
        for _ in 1..9_600 {
            out.push(bp.process(0.0, 1_000.0, 100.0, 1.0, dt));
        }

        let head = peak(&out[..480]);
        let tail = peak(&out[9_000..]);
        assert!(head > 0.0);
        assert!(tail < head * 0.01, "tail {tail} vs head {head}");
    }

    #[test]
    fn band_pass_favors_center() {
        let dt = 1.0 / 48_000.0;
        let measure = |tone: f32| {
            let mut bp = BandPass::new();
            let out: Vec<f32> = (0..9_600)
                .map(|n| {
                    let x = (TAU * tone * n as f32 * dt).sin();
                    bp.process(x, 1_000.0, 200.0, 1.0, dt)
                })
                .collect();
            peak(&out[4_800..])
        };

        let center = measure(1_000.0);
        assert!(center > measure(100.0) * 4.0);
        assert!(center > measure(8_000.0) * 4.0);
    }

    #[test]
    fn ranges_clamp_and_respect_nyquist() {
        let dt = 1.0 / 44_100.0;
        assert_eq!(FilterRange::LOW_PASS.clamp(5.0, dt), 20.0);
        assert_eq!(FilterRange::HIGH_PASS.clamp(50_000.0, dt), 10_000.0);
        assert!((FilterRange::LOW_PASS.clamp(50_000.0, dt) - 0.45 * 44_100.0).abs() < 0.5);
        assert_eq!(FilterRange::BAND_PASS.clamp(f32::NAN, dt), 30.0);

        // Absurdly low sample rates must not panic
        let cap = FilterRange::BAND_PASS.clamp(1_000.0, 1.0 / 40.0);
        assert!(cap <= 18.0 + 1e-3);
    }

    #[test]
    fn biquad_low_pass_has_unity_dc_gain() {
        let c = BiquadCoefficients::low_pass(1_000.0, 0.707, 1.0 / 48_000.0);
        let dc = (c.b0 + c.b1 + c.b2) / (1.0 + c.a1 + c.a2);
        assert!((dc - 1.0).abs() < 1e-3);
    }
}
