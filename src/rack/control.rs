//! Lock-free parameter changes from a control thread.
//!
//! A UI or sequencer thread holds a [`ControlHandle`] and pushes
//! [`ParamChange`]s. The audio thread owns the matching [`ControlQueue`] and
//! drains it into the module at the top of each callback. Neither side
//! blocks: a full queue rejects the push and the caller decides whether to
//! retry.

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

/// A module whose knobs can be moved by parameter id.
pub trait Controllable {
    type Param: Copy + Send + 'static;

    /// Move one knob. Values are clamped to the knob's range.
    fn set_param(&mut self, param: Self::Param, value: f32);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamChange<P> {
    pub param: P,
    pub value: f32,
}

/// Default queue depth for one module.
pub const CONTROL_QUEUE_SIZE: usize = 64;

/// Control-thread end of a parameter queue.
#[cfg(feature = "rtrb")]
pub struct ControlHandle<P> {
    tx: Producer<ParamChange<P>>,
}

#[cfg(feature = "rtrb")]
impl<P> ControlHandle<P> {
    /// Queue a change. Returns `false` if the queue is full.
    pub fn set(&mut self, param: P, value: f32) -> bool {
        self.tx.push(ParamChange { param, value }).is_ok()
    }

    /// Free slots left in the queue.
    pub fn slots(&self) -> usize {
        self.tx.slots()
    }
}

/// Audio-thread end of a parameter queue.
#[cfg(feature = "rtrb")]
pub struct ControlQueue<P> {
    rx: Consumer<ParamChange<P>>,
}

#[cfg(feature = "rtrb")]
impl<P: Copy> ControlQueue<P> {
    /// Apply every queued change to `module`, oldest first. Returns how
    /// many were applied.
    #[inline]
    pub fn apply_pending<M>(&mut self, module: &mut M) -> usize
    where
        M: Controllable<Param = P>,
    {
        let mut applied = 0;
        while let Ok(change) = self.rx.pop() {
            module.set_param(change.param, change.value);
            applied += 1;
        }
        applied
    }
}

/// Create a connected handle/queue pair holding up to `capacity` changes.
#[cfg(feature = "rtrb")]
pub fn control_channel<P>(capacity: usize) -> (ControlHandle<P>, ControlQueue<P>) {
    let (tx, rx) = RingBuffer::<ParamChange<P>>::new(capacity);
    (ControlHandle { tx }, ControlQueue { rx })
}
