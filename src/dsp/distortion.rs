//! Waveshaping for feedback loops and summing points.
//!
//! Two transfer functions live here:
//!
//! Soft Clip (rational):
//!   f(x) = x / (1 + |x|)
//!   - Smooth, never exceeds ±1
//!   - Linear near zero, so small signals pass almost unchanged
//!   - Used inside the ladder filter's resonance loop to bound feedback
//!     past its linear region
//!
//! Soft Limit (exponential knee):
//!   |x| ≤ 5.2  →  x
//!   |x| > 5.2  →  sign(x) · (5.2 + e · exp(-2e)),  e = |x| - 5.2
//!   - Transparent inside the ±5.2 V audio window
//!   - Past the knee the excess is folded back toward the threshold, so the
//!     output never rises more than 1/(2e) ≈ 0.184 V above it
//!   - Used at every mixer summing point
//!
//! ```text
//!   out
//!   5.38 ┤          ╭─╮
//!   5.2  ┤─ ─ ─ ─ ─╱─ ─╰──────────────  → approaches 5.2
//!        │        ╱
//!        │      ╱
//!        └────╱──────────────────────→ in
//!                 5.2    6      8
//! ```

/// Threshold of the soft limiter, in volts.
pub const SOFT_LIMIT_THRESHOLD: f32 = 5.2;

/// Rational soft clipping, scaled so the output never exceeds ±`ceiling`.
///
/// Small inputs pass with unity slope; large inputs approach the ceiling.
#[inline]
pub fn soft_clip(sample: f32, ceiling: f32) -> f32 {
    let x = sample / ceiling;
    ceiling * x / (1.0 + x.abs())
}

/// Soft limiter applied to channel outputs and bus sums.
#[inline]
pub fn soft_limit(input: f32) -> f32 {
    let magnitude = input.abs();
    if magnitude > SOFT_LIMIT_THRESHOLD {
        let excess = magnitude - SOFT_LIMIT_THRESHOLD;
        // exp(-inf) = 0 keeps infinite input at the threshold
        let knee = if excess.is_finite() {
            excess * (-excess * 2.0).exp()
        } else {
            0.0
        };
        input.signum() * (SOFT_LIMIT_THRESHOLD + knee)
    } else {
        input
    }
}

/// Apply the soft limiter to an entire buffer in place.
pub fn soft_limit_buffer(buffer: &mut [f32]) {
    for sample in buffer.iter_mut() {
        *sample = soft_limit(*sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soft_clip_is_near_linear_for_small_input() {
        let out = soft_clip(0.1, 2.0);
        // 2 * 0.05 / 1.05 ≈ 0.0952
        assert!((out - 0.0952).abs() < 1e-3);
    }

    #[test]
    fn soft_clip_never_exceeds_ceiling() {
        for &x in &[3.0, 30.0, 3_000.0, -3_000.0] {
            assert!(soft_clip(x, 2.0).abs() < 2.0);
        }
    }

    #[test]
    fn soft_limit_passes_signals_inside_window() {
        for &x in &[-5.2, -3.0, 0.0, 1.0, 5.2] {
            assert_eq!(soft_limit(x), x);
        }
    }

    #[test]
    fn soft_limit_stays_below_margin() {
        let mut x = 5.2f32;
        while x < 1_000.0 {
            let out = soft_limit(x);
            assert!(out < SOFT_LIMIT_THRESHOLD + 0.185, "limit({x}) = {out}");
            assert!(out >= SOFT_LIMIT_THRESHOLD);
            assert_eq!(soft_limit(-x), -out);
            x += 0.05;
        }
    }

    #[test]
    fn soft_limit_approaches_threshold() {
        assert!((soft_limit(50.0) - SOFT_LIMIT_THRESHOLD).abs() < 1e-6);
        assert_eq!(soft_limit(f32::INFINITY), SOFT_LIMIT_THRESHOLD);
        assert_eq!(soft_limit(f32::NEG_INFINITY), -SOFT_LIMIT_THRESHOLD);
    }

    #[test]
    fn soft_limit_buffer_matches_scalar() {
        let mut buffer = [0.5, 6.0, -9.0];
        soft_limit_buffer(&mut buffer);
        assert_eq!(buffer, [0.5, soft_limit(6.0), soft_limit(-9.0)]);
    }
}
