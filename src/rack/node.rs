/// Timing information handed to every module once per sample.
///
/// `sample_time` is the time elapsed since the previous sample. It is
/// normally `1 / sample_rate`, but hosts may vary it between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessCtx {
    pub sample_rate: f32,
    pub sample_time: f32,
}

impl ProcessCtx {
    /// Fixed-rate context.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            sample_time: 1.0 / sample_rate,
        }
    }

    /// Context for an explicit step, e.g. a host with a jittery clock.
    pub fn with_sample_time(sample_time: f32) -> Self {
        Self {
            sample_rate: 1.0 / sample_time,
            sample_time,
        }
    }
}

/// Input jack: a voltage plus whether a cable is plugged in.
///
/// Many modules change behavior when a jack is empty (normalling to an
/// internal source, chaining sections), so the flag travels with the value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Input {
    pub voltage: f32,
    pub connected: bool,
}

impl Input {
    pub const fn patched(voltage: f32) -> Self {
        Self {
            voltage,
            connected: true,
        }
    }

    pub const fn unpatched() -> Self {
        Self {
            voltage: 0.0,
            connected: false,
        }
    }

    /// The patched voltage, or `default` when nothing is plugged in.
    #[inline]
    pub fn value_or(&self, default: f32) -> f32 {
        if self.connected {
            self.voltage
        } else {
            default
        }
    }

    /// The patched voltage, or `None` when nothing is plugged in.
    #[inline]
    pub fn value(&self) -> Option<f32> {
        self.connected.then_some(self.voltage)
    }

    /// Plug in (or keep plugged) and set the voltage.
    #[inline]
    pub fn set(&mut self, voltage: f32) {
        self.voltage = voltage;
        self.connected = true;
    }

    pub fn disconnect(&mut self) {
        *self = Self::unpatched();
    }
}

/// Output jack. Modules write `voltage`; hosts set `connected` so modules
/// can skip or reroute work for empty jacks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Output {
    pub voltage: f32,
    pub connected: bool,
}

impl Output {
    pub const fn new() -> Self {
        Self {
            voltage: 0.0,
            connected: false,
        }
    }

    #[inline]
    pub fn set(&mut self, voltage: f32) {
        self.voltage = voltage;
    }
}

/// A rack module: reads its inputs and knobs, writes its outputs.
///
/// Implemented by concrete types only; hosts own their modules directly and
/// call them in a fixed order.
pub trait RackModule: Send {
    /// Compute one sample.
    fn process(&mut self, ctx: &ProcessCtx);

    /// Return internal state to power-on values. Knobs and jacks are kept.
    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctx_sample_time() {
        let ctx = ProcessCtx::new(48_000.0);
        assert!((ctx.sample_time - 1.0 / 48_000.0).abs() < 1e-12);

        let ctx = ProcessCtx::with_sample_time(0.001);
        assert!((ctx.sample_rate - 1_000.0).abs() < 1e-3);
    }

    #[test]
    fn test_input_fallbacks() {
        assert_eq!(Input::unpatched().value_or(2.5), 2.5);
        assert_eq!(Input::patched(-1.0).value_or(2.5), -1.0);
        assert_eq!(Input::unpatched().value(), None);
        assert_eq!(Input::patched(0.0).value(), Some(0.0));

        let mut input = Input::unpatched();
        input.set(3.0);
        assert!(input.connected);
        input.disconnect();
        assert_eq!(input, Input::unpatched());
    }
}
