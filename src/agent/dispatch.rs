use super::registry::Agent;
use super::sample::RawSample;
use crate::config::FocusPolicy;
use crate::event::{ControlId, Event};
use log::debug;

impl Agent {
    /// Normalizes a raw sample into an event and routes it.
    ///
    /// # Behavior
    /// - Move: chains to the previous event, re-resolves focus under
    ///   poll-to-track, then delivers to the input grabber; during a gesture
    ///   the chain keeps the last press or drag
    /// - Press: starts a new chain, tags the event fired and latches the
    ///   input grabber as the gesture's receiver
    /// - Drag: chains to the previous event and always goes to the latched
    ///   receiver, even if the pointer left it
    /// - Release: chained, tagged flushed, delivered, then the chain is cleared
    /// - Wheel, Click, Key: one-shot, delivered to the input grabber without
    ///   touching the chain; under click-to-pick a click re-resolves focus first
    ///
    /// Returns whether a grabber received the event.
    pub fn process(&mut self, sample: RawSample) -> bool {
        match sample {
            RawSample::Move { x, y, modifiers } => {
                let event =
                    Event::motion2(ControlId::NO_ID, modifiers, x, y).chained(self.chain.as_ref());
                // A stray move must not break the deltas of a held gesture
                if !self.in_gesture() {
                    self.chain = Some(event.clone());
                }
                if self.policy == FocusPolicy::PollToTrack {
                    self.poll(&event);
                }
                self.handle(event)
            }
            RawSample::Press {
                button,
                x,
                y,
                modifiers,
            } => {
                let event = Event::motion2(button, modifiers, x, y).chained(None).fire();
                self.chain = Some(event.clone());
                self.grab = self.input_grabber();
                debug!(
                    "Gesture started with {} at ({x:.1}, {y:.1}), receiver: {:?}",
                    button, self.grab
                );
                self.dispatch(self.grab, event)
            }
            RawSample::Drag {
                button,
                x,
                y,
                modifiers,
            } => {
                let event = Event::motion2(button, modifiers, x, y).chained(self.chain.as_ref());
                self.chain = Some(event.clone());
                self.dispatch(self.grab, event)
            }
            RawSample::Release {
                button,
                x,
                y,
                modifiers,
            } => {
                let event = Event::motion2(button, modifiers, x, y)
                    .chained(self.chain.as_ref())
                    .flush();
                let delivered = self.dispatch(self.grab, event);
                self.chain = None;
                self.grab = None;
                debug!("Gesture with {button} ended at ({x:.1}, {y:.1})");
                delivered
            }
            RawSample::Wheel { delta, modifiers } => {
                self.handle(Event::motion1(ControlId::WHEEL, modifiers, delta).oneshot())
            }
            RawSample::Click {
                button,
                x,
                y,
                count,
                modifiers,
            } => {
                let event = Event::tap(button, modifiers, x, y, count);
                if self.policy == FocusPolicy::ClickToPick {
                    self.poll(&event);
                }
                self.handle(event)
            }
            RawSample::Key { key, modifiers } => self.handle(Event::key(key, modifiers)),
        }
    }

    /// True while a press has started a gesture that has not been released.
    pub fn in_gesture(&self) -> bool {
        self.chain.as_ref().is_some_and(|event| !event.id().is_none())
    }

    /// Receiver latched by the current gesture, if any.
    pub fn grab_target(&self) -> Option<crate::grabber::GrabberId> {
        self.grab
    }
}
