//! Pull-based event sources for devices without host callbacks.

use crate::event::Event;

/// An event pulled from a [`Feed`], tagged with what the agent should do.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// Only re-resolve the tracked grabber
    Poll(Event),
    /// Only deliver to the input grabber
    Handle(Event),
    /// Re-resolve focus, then deliver
    PollAndHandle(Event),
}

/// Source of events drained by [`Agent::tick`](super::Agent::tick).
///
/// `next_event` is called repeatedly until it returns `None`; a feed that
/// samples a device once per frame returns one event and then `None`.
pub trait Feed {
    fn next_event(&mut self) -> Option<FeedEvent>;
}

impl<F> Feed for F
where
    F: FnMut() -> Option<FeedEvent>,
{
    fn next_event(&mut self) -> Option<FeedEvent> {
        self()
    }
}
