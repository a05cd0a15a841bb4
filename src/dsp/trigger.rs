//! Schmitt trigger with hysteresis.
//!
//! Gates, clocks and sync signals coming from other modules are rarely clean:
//! a slow ramp or a noisy square hovering around a single threshold would
//! fire many edges in a row. A Schmitt trigger uses two thresholds instead:
//!
//! ```text
//!   volts
//!    high ┤- - - - - -╭──────╮- - - - - - - -   fire once here
//!         │          ╱        ╲
//!    low  ┤- - - - -╱- - - - - ╲- - - - - - -   re-arm only below here
//!         │________╱            ╲________
//! ```
//!
//! The first sample after construction or [`SchmittTrigger::reset`] only
//! initializes the state. A gate that is already high when the module is
//! created therefore does not fire a spurious edge.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchmittState {
    Low,
    High,
    Uninitialized,
}

/// Per-instance edge detector. Never share one between signal paths.
#[derive(Debug, Clone, Copy)]
pub struct SchmittTrigger {
    state: SchmittState,
    low_threshold: f32,
    high_threshold: f32,
}

impl SchmittTrigger {
    /// Default re-arm threshold in volts.
    pub const DEFAULT_LOW: f32 = 0.1;
    /// Default firing threshold in volts.
    pub const DEFAULT_HIGH: f32 = 1.0;

    pub fn new(low_threshold: f32, high_threshold: f32) -> Self {
        debug_assert!(low_threshold <= high_threshold);
        Self {
            state: SchmittState::Uninitialized,
            low_threshold,
            high_threshold,
        }
    }

    /// Feed one sample. Returns true exactly once per rising crossing.
    #[inline]
    pub fn process(&mut self, input: f32) -> bool {
        match self.state {
            SchmittState::Uninitialized => {
                self.state = if input >= self.high_threshold {
                    SchmittState::High
                } else {
                    SchmittState::Low
                };
            }
            SchmittState::High => {
                if input <= self.low_threshold {
                    self.state = SchmittState::Low;
                }
            }
            SchmittState::Low => {
                if input >= self.high_threshold {
                    self.state = SchmittState::High;
                    return true;
                }
            }
        }

        false
    }

    /// True while the input is latched high (gate held).
    #[inline]
    pub fn is_high(&self) -> bool {
        self.state == SchmittState::High
    }

    pub fn state(&self) -> SchmittState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = SchmittState::Uninitialized;
    }
}

impl Default for SchmittTrigger {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LOW, Self::DEFAULT_HIGH)
    }
}
