//! Motion-specific behaviour: chaining, kinematics and sensitivity scaling.

use super::record::{Event, Payload};
use std::time::Duration;

impl Event {
    /// Returns a relative copy whose deltas are computed against `previous`.
    ///
    /// Only a previous event with the same payload arity and control id
    /// contributes; otherwise (or with `None`) the delta stays zero, which is
    /// what the first event of a chain reports.
    pub fn chained(&self, previous: Option<&Event>) -> Event {
        let mut event = self.clone();
        event.relative = true;

        let Some(previous) = previous.filter(|p| p.id == self.id) else {
            event.reset_motion();
            return event;
        };

        let delta = match (self.payload, previous.payload) {
            (Payload::Motion2 { x, y, .. }, Payload::Motion2 { x: px, y: py, .. }) => {
                Some((x - px, y - py))
            }
            (Payload::Motion1 { x, .. }, Payload::Motion1 { x: px, .. }) => Some((x - px, 0.0)),
            _ => None,
        };
        let Some((delta_x, delta_y)) = delta else {
            event.reset_motion();
            return event;
        };

        match &mut event.payload {
            Payload::Motion2 { dx, dy, .. } => {
                *dx = delta_x;
                *dy = delta_y;
            }
            Payload::Motion1 { dx, .. } => *dx = delta_x,
            Payload::Tap { .. } | Payload::Key { .. } => {}
        }
        event.distance = (delta_x * delta_x + delta_y * delta_y).sqrt();
        event.delay = event.timestamp.saturating_duration_since(previous.timestamp);
        event.speed = speed(event.distance, event.delay);
        event
    }

    fn reset_motion(&mut self) {
        match &mut self.payload {
            Payload::Motion2 { dx, dy, .. } => {
                *dx = 0.0;
                *dy = 0.0;
            }
            Payload::Motion1 { dx, .. } => *dx = 0.0,
            Payload::Tap { .. } | Payload::Key { .. } => {}
        }
        self.distance = 0.0;
        self.delay = Duration::ZERO;
        self.speed = 0.0;
    }

    /// True once the event was chained to a predecessor.
    pub fn is_relative(&self) -> bool {
        self.relative
    }

    pub fn is_absolute(&self) -> bool {
        !self.relative
    }

    /// Euclidean distance travelled since the previous event.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Time elapsed since the previous event.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Distance per millisecond; equals the distance when no time elapsed.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Scales the deltas of absolute motion events by per-axis sensitivities.
    ///
    /// Relative events already carry exact coordinate differences and are
    /// returned unchanged.
    pub fn modulate(&self, sensitivities: [f64; 2]) -> Event {
        let mut event = self.clone();
        if self.is_relative() {
            return event;
        }
        match &mut event.payload {
            Payload::Motion1 { dx, .. } => *dx *= sensitivities[0],
            Payload::Motion2 { dx, dy, .. } => {
                *dx *= sensitivities[0];
                *dy *= sensitivities[1];
            }
            Payload::Tap { .. } | Payload::Key { .. } => {}
        }
        event
    }

    /// Reduces a two-axis motion event to a single axis.
    ///
    /// `from_x` selects the horizontal axis, otherwise the vertical one. The
    /// lifecycle tag and kinematics are preserved. Returns `None` for events
    /// that are not motion events.
    pub fn to_motion1(&self, from_x: bool) -> Option<Event> {
        let payload = match self.payload {
            Payload::Motion1 { .. } => return Some(self.clone()),
            Payload::Motion2 { x, y, dx, dy } => {
                if from_x {
                    Payload::Motion1 { x, dx }
                } else {
                    Payload::Motion1 { x: y, dx: dy }
                }
            }
            Payload::Tap { .. } | Payload::Key { .. } => return None,
        };
        let mut event = self.clone();
        event.payload = payload;
        Some(event)
    }
}

fn speed(distance: f64, delay: Duration) -> f64 {
    let millis = delay.as_secs_f64() * 1000.0;
    if millis == 0.0 {
        distance
    } else {
        distance / millis
    }
}

#[cfg(test)]
mod tests {
    use crate::event::{ControlId, Lifecycle, Modifiers};
    use super::*;
    use std::time::Instant;

    #[test]
    fn chained_computes_delta_and_distance() {
        let start = Instant::now();
        let first = Event::motion2(ControlId::LEFT, Modifiers::NONE, 10.0, 10.0)
            .with_timestamp(start)
            .chained(None);
        let second = Event::motion2(ControlId::LEFT, Modifiers::NONE, 13.0, 14.0)
            .with_timestamp(start + Duration::from_millis(5))
            .chained(Some(&first));

        assert_eq!(first.delta(), (0.0, 0.0));
        assert_eq!(second.delta(), (3.0, 4.0));
        assert_eq!(second.distance(), 5.0);
        assert_eq!(second.delay(), Duration::from_millis(5));
        assert!((second.speed() - 1.0).abs() < 1e-9);
        assert!(second.is_relative());
    }

    #[test]
    fn chained_ignores_previous_with_other_control() {
        let previous = Event::motion2(ControlId::NO_ID, Modifiers::NONE, 0.0, 0.0);
        let event =
            Event::motion2(ControlId::LEFT, Modifiers::NONE, 8.0, 8.0).chained(Some(&previous));
        assert_eq!(event.delta(), (0.0, 0.0));
    }

    #[test]
    fn modulate_scales_only_absolute_events() {
        let absolute = Event::motion2_with_delta(ControlId::NO_ID, Modifiers::NONE, 0.0, 0.0, 2.0, 3.0);
        assert_eq!(absolute.modulate([2.0, 0.5]).delta(), (4.0, 1.5));

        let previous = Event::motion2(ControlId::LEFT, Modifiers::NONE, 0.0, 0.0);
        let relative =
            Event::motion2(ControlId::LEFT, Modifiers::NONE, 2.0, 2.0).chained(Some(&previous));
        assert_eq!(relative.modulate([10.0, 10.0]).delta(), (2.0, 2.0));
    }

    #[test]
    fn to_motion1_keeps_lifecycle_and_axis() {
        let previous = Event::motion2(ControlId::RIGHT, Modifiers::NONE, 1.0, 1.0);
        let event = Event::motion2(ControlId::RIGHT, Modifiers::NONE, 4.0, 9.0)
            .chained(Some(&previous))
            .flush();

        let along_y = event.to_motion1(false).unwrap();
        assert_eq!(along_y.delta(), (8.0, 0.0));
        assert_eq!(along_y.lifecycle(), Lifecycle::Flushed);

        let tap = Event::tap(ControlId::LEFT, Modifiers::NONE, 0.0, 0.0, 1);
        assert!(tap.to_motion1(true).is_none());
    }
}
