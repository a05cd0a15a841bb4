pub mod dsp; // Per-sample signal primitives
pub mod patch; // Knob presets for the host modules
pub mod rack; // Host-level modules with ports and wiring

pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;

/// Volts per unit for audio and bipolar control signals (±5 V).
pub const CV_SCALE_BIPOLAR: f32 = 5.0;
/// Volts per unit for envelopes, gates and unipolar control signals (0–10 V).
pub const CV_SCALE_UNIPOLAR: f32 = 10.0;
