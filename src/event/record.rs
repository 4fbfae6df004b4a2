//! Immutable event records produced by agents.

use super::controls::{ControlId, Key};
use super::modifiers::Modifiers;
use super::shortcut::Shortcut;
use log::warn;
use std::time::{Duration, Instant};

/// Position of an event within a gesture chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Gesture start (button press)
    Fired,
    /// Gesture continuation (move or drag)
    Active,
    /// Gesture end (button release)
    Flushed,
    /// Self-contained event outside any chain (wheel, click, key)
    Oneshot,
}

/// Event-specific data. The arity of the payload determines how many
/// coordinate axes the event carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload {
    /// One degree of freedom (e.g. scroll wheel)
    Motion1 { x: f64, dx: f64 },
    /// Two degrees of freedom (pointer position)
    Motion2 { x: f64, y: f64, dx: f64, dy: f64 },
    /// Tap/click at a position with a repeat count
    Tap { x: f64, y: f64, count: u32 },
    /// Keyboard key
    Key { key: Key },
}

/// One normalized input occurrence.
///
/// Events are value objects: lifecycle changes ([`Event::fire`],
/// [`Event::flush`]) and chaining return new events instead of mutating.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub(super) id: ControlId,
    pub(super) modifiers: Modifiers,
    pub(super) payload: Payload,
    pub(super) lifecycle: Lifecycle,
    pub(super) relative: bool,
    pub(super) timestamp: Instant,
    pub(super) distance: f64,
    pub(super) delay: Duration,
    pub(super) speed: f64,
}

impl Event {
    fn with_payload(id: ControlId, modifiers: Modifiers, payload: Payload, lifecycle: Lifecycle) -> Self {
        Self {
            id,
            modifiers,
            payload,
            lifecycle,
            relative: false,
            timestamp: Instant::now(),
            distance: 0.0,
            delay: Duration::ZERO,
            speed: 0.0,
        }
    }

    /// Two-axis motion event at `(x, y)` with zero delta.
    ///
    /// Use [`Event::chained`] to derive the delta from a previous event.
    pub fn motion2(id: ControlId, modifiers: Modifiers, x: f64, y: f64) -> Self {
        Self::with_payload(
            id,
            modifiers,
            Payload::Motion2 {
                x,
                y,
                dx: 0.0,
                dy: 0.0,
            },
            Lifecycle::Active,
        )
    }

    /// Absolute two-axis motion event whose delta is supplied by the device.
    pub fn motion2_with_delta(
        id: ControlId,
        modifiers: Modifiers,
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
    ) -> Self {
        Self::with_payload(id, modifiers, Payload::Motion2 { x, y, dx, dy }, Lifecycle::Active)
    }

    /// Absolute one-axis motion event (e.g. one wheel step).
    pub fn motion1(id: ControlId, modifiers: Modifiers, dx: f64) -> Self {
        Self::with_payload(id, modifiers, Payload::Motion1 { x: 0.0, dx }, Lifecycle::Active)
    }

    /// Tap event at `(x, y)`. Zero counts are normalized to a single click.
    pub fn tap(id: ControlId, modifiers: Modifiers, x: f64, y: f64, count: u32) -> Self {
        Self::with_payload(
            id,
            modifiers,
            Payload::Tap {
                x,
                y,
                count: count.max(1),
            },
            Lifecycle::Oneshot,
        )
    }

    pub fn key(key: Key, modifiers: Modifiers) -> Self {
        let id = match key {
            Key::Virtual(code) => code,
            Key::Char(_) => ControlId::NO_ID,
        };
        Self::with_payload(id, modifiers, Payload::Key { key }, Lifecycle::Oneshot)
    }

    /// Overrides the capture time (replayed or synthetic streams).
    pub fn with_timestamp(mut self, timestamp: Instant) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Returns a copy tagged as a gesture start.
    ///
    /// Events that were already fired or flushed are returned unchanged.
    pub fn fire(&self) -> Self {
        self.retag(Lifecycle::Fired)
    }

    /// Returns a copy tagged as a gesture end.
    ///
    /// Events that were already fired or flushed are returned unchanged.
    pub fn flush(&self) -> Self {
        self.retag(Lifecycle::Flushed)
    }

    /// Returns a copy tagged as a one-shot event.
    pub fn oneshot(&self) -> Self {
        let mut event = self.clone();
        event.lifecycle = Lifecycle::Oneshot;
        event
    }

    fn retag(&self, lifecycle: Lifecycle) -> Self {
        if self.fired() || self.flushed() {
            warn!(
                "Event already {}; ignoring {:?}",
                if self.fired() { "fired" } else { "flushed" },
                lifecycle
            );
            return self.clone();
        }
        let mut event = self.clone();
        event.lifecycle = lifecycle;
        event
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn fired(&self) -> bool {
        self.lifecycle == Lifecycle::Fired
    }

    pub fn flushed(&self) -> bool {
        self.lifecycle == Lifecycle::Flushed
    }

    pub fn is_oneshot(&self) -> bool {
        self.lifecycle == Lifecycle::Oneshot
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// The shortcut this event matches bindings against.
    pub fn shortcut(&self) -> Shortcut {
        match self.payload {
            Payload::Motion1 { .. } | Payload::Motion2 { .. } => {
                Shortcut::motion(self.id, self.modifiers)
            }
            Payload::Tap { count, .. } => Shortcut::tap(self.id, self.modifiers, count),
            Payload::Key { key } => Shortcut::key(key, self.modifiers),
        }
    }

    /// Pointer position for two-axis motion and tap events.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self.payload {
            Payload::Motion2 { x, y, .. } | Payload::Tap { x, y, .. } => Some((x, y)),
            Payload::Motion1 { .. } | Payload::Key { .. } => None,
        }
    }

    /// Delta relative to the previous event of the same chain.
    ///
    /// One-axis events report `(dx, 0)`; taps and keys report `(0, 0)`.
    pub fn delta(&self) -> (f64, f64) {
        match self.payload {
            Payload::Motion1 { dx, .. } => (dx, 0.0),
            Payload::Motion2 { dx, dy, .. } => (dx, dy),
            Payload::Tap { .. } | Payload::Key { .. } => (0.0, 0.0),
        }
    }

    pub fn dx(&self) -> f64 {
        self.delta().0
    }

    pub fn dy(&self) -> f64 {
        self.delta().1
    }

    /// Click count of tap events.
    pub fn count(&self) -> Option<u32> {
        match self.payload {
            Payload::Tap { count, .. } => Some(count),
            _ => None,
        }
    }

    pub fn key_value(&self) -> Option<Key> {
        match self.payload {
            Payload::Key { key } => Some(key),
            _ => None,
        }
    }

    pub fn is_motion(&self) -> bool {
        matches!(self.payload, Payload::Motion1 { .. } | Payload::Motion2 { .. })
    }

    /// True for motion events without any displacement.
    pub fn is_null(&self) -> bool {
        match self.payload {
            Payload::Motion1 { dx, .. } => dx == 0.0,
            Payload::Motion2 { dx, dy, .. } => dx == 0.0 && dy == 0.0,
            Payload::Tap { .. } | Payload::Key { .. } => false,
        }
    }
}
