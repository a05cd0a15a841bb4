//! Host-level modules: the primitives from [`crate::dsp`] behind knobs,
//! input jacks and output jacks.
//!
//! Every module is a plain struct with public `Input`/`Output` fields and a
//! `params` knob set. A host wires modules together by copying output
//! voltages into input jacks between `process` calls, in whatever order it
//! likes; a one-sample delay on each cable is the only consequence.
//!
//! ```text
//!   ┌────────┐  out1   ┌───────────┐        ┌────────┐
//!   │  LFO   ├────────►│ ENVELOPE  ├──env──►│  VCA   ├──► L / R
//!   └────────┘  trig   └───────────┘  cv    └────────┘
//!                                               ▲
//!   ┌────────┐  out2   ┌───────────┐  lp out    │
//!   │  VCO   ├────────►│  FILTER   ├────────────┘
//!   └────────┘         └───────────┘
//! ```

/// Lock-free knob changes from another thread.
pub mod control;
/// Dual AD / ASD envelope pairs with AHDSR chaining.
pub mod envelope;
/// Low-pass, band-pass and high-pass sections with link mode.
pub mod filter;
/// Noise source with chaos sample-and-hold outputs.
pub mod kaos;
/// Dual LFO.
pub mod lfo;
/// Five-channel attenuverting mixer.
pub mod mixer;
/// Jacks, timing context and the module trait.
pub mod node;
/// Clocked sample & hold.
pub mod sample_hold;
/// Five-channel VCA.
pub mod vca;
/// Dual VCO with sync and FM.
pub mod vco;

#[cfg(feature = "rtrb")]
pub use control::{control_channel, ControlHandle, ControlQueue};
pub use control::{Controllable, ParamChange};
pub use envelope::{EnvelopeModule, EnvelopeParam, EnvelopeParams};
pub use filter::{FilterModule, FilterParam, FilterParams};
pub use kaos::{KaosModule, KaosParams};
pub use lfo::{LfoModule, LfoParam, LfoParams};
pub use mixer::{MixerModule, MixerParams};
pub use node::{Input, Output, ProcessCtx, RackModule};
pub use sample_hold::{SampleHoldModule, SampleHoldParams};
pub use vca::{CvMode, VcaModule, VcaParams};
pub use vco::{SyncMode, VcoModule, VcoParam, VcoParams};
