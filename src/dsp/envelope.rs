use crate::{dsp::trigger::SchmittTrigger, MIN_TIME};

/*
AD / ASD Envelope State Machines
================================

Two trigger-driven envelope shapes. Both ramp linearly and both expose two
logic outputs alongside the envelope itself.

Vocabulary
----------

  env         The envelope output, 0.0 to 1.0 (multiply by 10 V at the jack).

  env_state   The internal ramp accumulator. `env` is derived from it each
              sample (clamped to the stage ceiling or floor).

  trigger     A rising edge on the gate input. Always restarts the attack
              from zero, whatever stage the envelope is in.

  held        Whether the gate is still high. Comes from a Schmitt trigger,
              never from the raw voltage.

  eoa / eor   End-of-attack and end-of-release logic levels (0 or 1).
              eoa goes high once the attack peaks and stays high until the
              envelope returns to Off. eor is high while the envelope rests.


The Shapes
----------

  AD (attack / decay):

    1.0 ┤    ╱╲
        │   ╱  ╲
        │  ╱    ╲
    0.0 ┼─╱──────╲─────→ t
          │A │ R │

  ASD (attack / sustain / decay):

    S   ┤    ╱‾‾‾‾‾‾‾╲
        │   ╱         ╲
        │  ╱           ╲
    0.0 ┼─╱─────────────╲──→ t
          │A │ gate held │R│

The ASD attack climbs to the sustain level, not to 1.0, so the attack time
is the time to reach the plateau.


State Machine
-------------

    any ──trigger──→ Attack                           env=0 eoa=0 eor=1
    Attack  ── env_state ≥ ceiling ──→ Release (AD)   eoa=1 eor=0
                                   └─→ Sustain (ASD)
    Sustain ── gate released ──→ Release
    Release ── held (AD) ──→ Release                  eoa=1
    Release ── env_state ≤ 0 ──→ Off                  eoa=0 eor=1 env=0


Per-Sample Order
----------------

    1. evolve:      Attack  env_state += dt / attack
                    Release env_state -= dt / release
    2. transitions  (table above)

Evolving first means the sample on which a threshold is crossed already
reports the new stage. With attack = 0.1 s at dt = 1 ms the envelope reads
0.5 at sample 50 and enters Release at sample 100.

Thresholds are compared with a tolerance of 1e-5. Summing dt/attack in f32
otherwise lands a hair below 1.0 and delays the stage change by a sample.


Time Mapping
------------

Knobs are normalized [0, 1] and map exponentially to seconds:

    seconds = 0.003 · (10 / 0.003)^cv

    cv   0.0    0.25    0.5    0.75    1.0
    s    0.003  0.023   0.173  1.32    10.0
*/

/// Shortest time a knob can select, in seconds.
pub const MIN_KNOB_TIME: f32 = 0.003;
/// Longest time a knob can select, in seconds.
pub const MAX_KNOB_TIME: f32 = 10.0;

const STAGE_EPSILON: f32 = 1e-5;

/// Map a normalized knob position to an exponential time in seconds.
#[inline]
pub fn cv_to_seconds(cv: f32) -> f32 {
    let cv = if cv.is_finite() { cv.clamp(0.0, 1.0) } else { 0.0 };
    MIN_KNOB_TIME * (MAX_KNOB_TIME / MIN_KNOB_TIME).powf(cv)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Off,
    Attack,
    Sustain,
    Release,
}

/// Logic levels and envelope value shared by both variants.
#[derive(Debug, Clone, Copy)]
struct Levels {
    env: f32,
    eoa: f32,
    eor: f32,
}

impl Levels {
    const RESTING: Self = Self {
        env: 0.0,
        eoa: 0.0,
        eor: 1.0,
    };
}

/// Attack/decay envelope. Peaks at 1.0, then falls straight back to zero.
#[derive(Debug, Clone)]
pub struct AdEnvelope {
    stage: EnvelopeStage,
    env_state: f32,
    levels: Levels,
    attack_time: f32,
    release_time: f32,
}

impl AdEnvelope {
    pub fn new(attack_time: f32, release_time: f32) -> Self {
        Self {
            stage: EnvelopeStage::Off,
            env_state: 0.0,
            levels: Levels::RESTING,
            attack_time: attack_time.max(MIN_TIME),
            release_time: release_time.max(MIN_TIME),
        }
    }

    /// Restart the attack from zero.
    pub fn retrigger(&mut self) {
        self.stage = EnvelopeStage::Attack;
        self.env_state = 0.0;
        self.levels.env = 0.0;
        self.levels.eoa = 0.0;
        self.levels.eor = 1.0;
    }

    /// Advance one sample. `held` is the latched gate state.
    #[inline]
    pub fn process(&mut self, dt: f32, held: bool) {
        let dt = dt.max(0.0);

        match self.stage {
            EnvelopeStage::Attack => {
                self.env_state += dt / self.attack_time;
                self.levels.env = self.env_state.min(1.0);
            }
            EnvelopeStage::Release => {
                self.env_state -= dt / self.release_time;
                self.levels.env = self.env_state.max(0.0);
            }
            EnvelopeStage::Sustain => {}
            EnvelopeStage::Off => self.levels.env = 0.0,
        }

        match self.stage {
            EnvelopeStage::Attack if self.env_state >= 1.0 - STAGE_EPSILON => {
                self.stage = EnvelopeStage::Release;
                self.env_state = 1.0;
                self.levels.env = 1.0;
                self.levels.eoa = 1.0;
                self.levels.eor = 0.0;
            }
            EnvelopeStage::Release => {
                if held {
                    self.levels.eoa = 1.0;
                }
                if self.env_state <= STAGE_EPSILON {
                    self.stage = EnvelopeStage::Off;
                    self.env_state = 0.0;
                    self.levels = Levels::RESTING;
                }
            }
            _ => {}
        }

        debug_assert!((0.0..=1.0).contains(&self.levels.env));
    }

    pub fn set_attack(&mut self, seconds: f32) {
        self.attack_time = seconds.max(MIN_TIME);
    }

    pub fn set_release(&mut self, seconds: f32) {
        self.release_time = seconds.max(MIN_TIME);
    }

    #[inline]
    pub fn env(&self) -> f32 {
        self.levels.env
    }

    #[inline]
    pub fn eoa(&self) -> f32 {
        self.levels.eoa
    }

    #[inline]
    pub fn eor(&self) -> f32 {
        self.levels.eor
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Off;
        self.env_state = 0.0;
        self.levels = Levels::RESTING;
    }
}

impl Default for AdEnvelope {
    fn default() -> Self {
        Self::new(0.1, 0.1)
    }
}

/// Attack/sustain/decay envelope. Climbs to `sustain`, holds while the gate
/// is held, then falls to zero.
#[derive(Debug, Clone)]
pub struct AsdEnvelope {
    stage: EnvelopeStage,
    env_state: f32,
    levels: Levels,
    attack_time: f32,
    release_time: f32,
    sustain: f32,
}

impl AsdEnvelope {
    pub fn new(attack_time: f32, sustain: f32, release_time: f32) -> Self {
        Self {
            stage: EnvelopeStage::Off,
            env_state: 0.0,
            levels: Levels::RESTING,
            attack_time: attack_time.max(MIN_TIME),
            release_time: release_time.max(MIN_TIME),
            sustain: clamp_sustain(sustain),
        }
    }

    pub fn retrigger(&mut self) {
        self.stage = EnvelopeStage::Attack;
        self.env_state = 0.0;
        self.levels.env = 0.0;
        self.levels.eoa = 0.0;
        self.levels.eor = 1.0;
    }

    #[inline]
    pub fn process(&mut self, dt: f32, held: bool) {
        let dt = dt.max(0.0);

        match self.stage {
            EnvelopeStage::Attack => {
                self.env_state += dt / self.attack_time;
                self.levels.env = self.env_state.min(self.sustain);
            }
            EnvelopeStage::Release => {
                self.env_state -= dt / self.release_time;
                self.levels.env = self.env_state.max(0.0);
            }
            EnvelopeStage::Sustain => {}
            EnvelopeStage::Off => self.levels.env = 0.0,
        }

        match self.stage {
            EnvelopeStage::Attack if self.env_state >= self.sustain - STAGE_EPSILON => {
                self.stage = EnvelopeStage::Sustain;
                self.env_state = self.sustain;
                self.levels.env = self.sustain;
                self.levels.eoa = 1.0;
                self.levels.eor = 0.0;
            }
            EnvelopeStage::Sustain if !held => {
                self.stage = EnvelopeStage::Release;
            }
            EnvelopeStage::Release if self.env_state <= STAGE_EPSILON => {
                self.stage = EnvelopeStage::Off;
                self.env_state = 0.0;
                self.levels = Levels::RESTING;
            }
            _ => {}
        }

        debug_assert!(self.levels.env >= 0.0 && self.levels.env <= 1.0);
    }

    pub fn set_attack(&mut self, seconds: f32) {
        self.attack_time = seconds.max(MIN_TIME);
    }

    pub fn set_release(&mut self, seconds: f32) {
        self.release_time = seconds.max(MIN_TIME);
    }

    /// New plateau level, clamped to [0, 1]. A lower level takes effect
    /// immediately while sustaining.
    pub fn set_sustain(&mut self, level: f32) {
        self.sustain = clamp_sustain(level);
        if self.stage == EnvelopeStage::Sustain {
            self.env_state = self.sustain;
            self.levels.env = self.sustain;
        }
    }

    pub fn sustain(&self) -> f32 {
        self.sustain
    }

    #[inline]
    pub fn env(&self) -> f32 {
        self.levels.env
    }

    #[inline]
    pub fn eoa(&self) -> f32 {
        self.levels.eoa
    }

    #[inline]
    pub fn eor(&self) -> f32 {
        self.levels.eor
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Off;
        self.env_state = 0.0;
        self.levels = Levels::RESTING;
    }
}

impl Default for AsdEnvelope {
    fn default() -> Self {
        Self::new(0.1, 1.0, 0.1)
    }
}

#[inline]
fn clamp_sustain(level: f32) -> f32 {
    if level.is_finite() {
        level.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Gate input feeding an envelope: fires a retrigger on each rising edge
/// and reports whether the gate is still held.
#[derive(Debug, Clone, Copy, Default)]
pub struct GateInput {
    trigger: SchmittTrigger,
}

impl GateInput {
    /// Returns `(triggered, held)` for this sample's gate voltage.
    #[inline]
    pub fn process(&mut self, voltage: f32) -> (bool, bool) {
        let triggered = self.trigger.process(voltage);
        (triggered, self.trigger.is_high())
    }

    #[inline]
    pub fn is_high(&self) -> bool {
        self.trigger.is_high()
    }

    pub fn reset(&mut self) {
        self.trigger.reset();
    }
}
