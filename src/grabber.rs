//! The grabber capability: objects that can claim input focus.
//!
//! A grabber answers two questions for its agent: does this event fall within
//! me ([`Grabber::track`]), and how do I react to it ([`Grabber::interact`]).
//! The default implementations split both by payload kind so implementers
//! only override the hooks they care about.

use crate::event::Event;
use crate::event::Payload;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Interactive object that can receive events from an agent.
pub trait Grabber {
    /// Returns true if the event falls within this grabber.
    ///
    /// Must be free of side effects: agents may call it any number of times
    /// while resolving focus.
    fn track(&self, event: &Event) -> bool {
        match event.payload() {
            Payload::Motion1 { .. } => self.track_motion1(event),
            Payload::Motion2 { .. } => self.track_motion2(event),
            Payload::Tap { .. } => self.track_tap(event),
            Payload::Key { .. } => self.track_key(event),
        }
    }

    /// Applies the event to this grabber's own state.
    ///
    /// Implementations dispatch on `event.shortcut()`; events that match no
    /// binding must leave the state untouched. Registering or removing
    /// grabbers from inside this call is not supported.
    fn interact(&mut self, event: &Event) {
        match event.payload() {
            Payload::Motion1 { .. } => self.motion1_interaction(event),
            Payload::Motion2 { .. } => self.motion2_interaction(event),
            Payload::Tap { .. } => self.tap_interaction(event),
            Payload::Key { .. } => self.key_interaction(event),
        }
    }

    fn track_motion1(&self, _event: &Event) -> bool {
        false
    }

    fn track_motion2(&self, _event: &Event) -> bool {
        false
    }

    fn track_tap(&self, _event: &Event) -> bool {
        false
    }

    fn track_key(&self, _event: &Event) -> bool {
        false
    }

    fn motion1_interaction(&mut self, _event: &Event) {}

    fn motion2_interaction(&mut self, _event: &Event) {}

    fn tap_interaction(&mut self, _event: &Event) {}

    fn key_interaction(&mut self, _event: &Event) {}
}

/// Shared handle to a grabber.
///
/// The host keeps its own clone (e.g. in a render list) while the agent's
/// registry holds another; removing a grabber from an agent only drops the
/// agent's handle.
pub type GrabberRef = Rc<RefCell<dyn Grabber>>;

/// Identity of a grabber within one agent's registry.
///
/// Ids are handed out in registration order and never reused by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GrabberId(pub(crate) u64);

impl GrabberId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GrabberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grabber#{}", self.0)
    }
}

/// Pointer identity of two grabber handles (ignores vtable metadata).
pub fn same_grabber(a: &GrabberRef, b: &GrabberRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
