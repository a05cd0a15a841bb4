//! Noise source with two chaos sample-and-hold outputs.
//!
//! The noise output carries the color-crossfaded mix in raw volts (white
//! noise has a standard deviation of 1.5 V). Each chaos output samples one
//! noise color on the rising edge of its trigger input and holds it. An
//! empty trigger jack simply keeps the last held value.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{noise::NoiseEngine, trigger::SchmittTrigger},
    rack::node::{Input, Output, ProcessCtx, RackModule},
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KaosParams {
    /// −1 brown, 0 pink, +1 white.
    pub color: f32,
}

pub struct KaosModule {
    pub params: KaosParams,

    pub pink_trigger: Input,
    pub brown_trigger: Input,

    pub noise_out: Output,
    pub pink_out: Output,
    pub brown_out: Output,

    engine: NoiseEngine,
    pink_edge: SchmittTrigger,
    brown_edge: SchmittTrigger,
    pink_held: f32,
    brown_held: f32,
}

impl KaosModule {
    pub fn new(params: KaosParams) -> Self {
        Self::with_engine(params, NoiseEngine::new())
    }

    /// Deterministic noise, for tests and offline rendering.
    pub fn with_seed(params: KaosParams, seed: u64) -> Self {
        Self::with_engine(params, NoiseEngine::with_seed(seed))
    }

    fn with_engine(params: KaosParams, engine: NoiseEngine) -> Self {
        tracing::debug!(?params, "kaos module created");
        Self {
            params,
            pink_trigger: Input::unpatched(),
            brown_trigger: Input::unpatched(),
            noise_out: Output::new(),
            pink_out: Output::new(),
            brown_out: Output::new(),
            engine,
            pink_edge: SchmittTrigger::default(),
            brown_edge: SchmittTrigger::default(),
            pink_held: 0.0,
            brown_held: 0.0,
        }
    }

    pub fn pink_held(&self) -> f32 {
        self.pink_held
    }

    pub fn brown_held(&self) -> f32 {
        self.brown_held
    }
}

impl Default for KaosModule {
    fn default() -> Self {
        Self::new(KaosParams::default())
    }
}

impl RackModule for KaosModule {
    fn process(&mut self, _ctx: &ProcessCtx) {
        self.engine.process(self.params.color);
        self.noise_out.set(self.engine.noise());

        if let Some(v) = self.pink_trigger.value() {
            if self.pink_edge.process(v) {
                self.pink_held = self.engine.pink();
            }
        }
        if let Some(v) = self.brown_trigger.value() {
            if self.brown_edge.process(v) {
                self.brown_held = self.engine.brown();
            }
        }

        // Unconnected chaos outputs are left untouched
        if self.pink_out.connected {
            self.pink_out.set(self.pink_held);
        }
        if self.brown_out.connected {
            self.brown_out.set(self.brown_held);
        }
    }

    fn reset(&mut self) {
        self.engine.reset();
        self.pink_edge.reset();
        self.brown_edge.reset();
        self.pink_held = 0.0;
        self.brown_held = 0.0;
    }
}
