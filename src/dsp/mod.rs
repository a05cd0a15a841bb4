//! Low-level DSP primitives used by the host modules in [`crate::rack`].
//!
//! Every component here advances by exactly one sample per `process` call and
//! takes the elapsed time `dt` (seconds) as an argument, so the host is free
//! to change the sample period between calls. None of them allocate, lock or
//! log on the per-sample path, which makes them safe to embed directly inside
//! module structs that run on the audio thread.

/// Rational soft clipper and the ±5.2 V soft limiter.
pub mod distortion;
/// Attack/decay and attack/sustain/decay envelope state machines.
pub mod envelope;
/// Ladder low-pass, one-pole high-pass and biquad band-pass filters.
pub mod filter;
/// Control-rate helpers for low frequency oscillators.
pub mod lfo;
/// Channel gain, panning and soft-limited bus summation.
pub mod mix;
/// White, brown and pink noise with a color crossfade.
pub mod noise;
/// Phase-accumulating oscillator with hard sync, soft sync and FM.
pub mod oscillator;
/// Clocked sample-and-hold with exponential lag.
pub mod sample_hold;
/// Schmitt trigger edge detection.
pub mod trigger;

pub use envelope::EnvelopeStage;
pub use oscillator::{PhaseOscillator, Waveform};
pub use trigger::SchmittTrigger;
