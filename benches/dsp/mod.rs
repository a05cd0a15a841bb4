//! Benchmarks for low-level DSP primitives.

mod distortion;
mod envelope;
mod filter;
mod mix;
mod noise;
mod oscillator;

pub use distortion::bench_distortion;
pub use envelope::bench_envelope;
pub use filter::bench_filter;
pub use mix::bench_mix;
pub use noise::bench_noise;
pub use oscillator::bench_oscillator;
