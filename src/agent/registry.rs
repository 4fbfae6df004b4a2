//! Agent state: grabber registry, focus resolution and per-tick bookkeeping.

use super::feed::{Feed, FeedEvent};
use crate::config::{AgentConfig, FocusPolicy};
use crate::event::Event;
use crate::grabber::{GrabberId, GrabberRef, same_grabber};
use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

/// Registry misuse reported by [`Agent`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgentError {
    #[error("grabber is already registered as {0}")]
    AlreadyRegistered(GrabberId),

    #[error("{0} is not registered with this agent")]
    UnknownGrabber(GrabberId),
}

/// Counters accumulated between two [`Agent::tick`] calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    /// Events delivered to a grabber
    pub dispatched: usize,
    /// One-shot events (wheel, click, key) among them
    pub oneshots: usize,
    /// Events pulled from the installed feed during this tick
    pub fed: usize,
}

/// Input agent: owns a set of grabbers and routes events to one of them.
///
/// The agent resolves which grabber is *tracked* (see [`Agent::poll`]) and
/// delivers events to the *input grabber*: the tracked grabber or, when none
/// is tracked, the default grabber. Gesture chains (press, drag, release)
/// are driven by [`Agent::process`].
pub struct Agent {
    /// Registered grabbers in registration order
    grabbers: Vec<(GrabberId, GrabberRef)>,
    /// Next id to hand out
    next_id: u64,
    /// Grabber currently holding focus
    pub(super) tracked: Option<GrabberId>,
    /// Fallback receiver when nothing is tracked
    default_grabber: Option<GrabberId>,
    /// How focus is acquired
    pub(super) policy: FocusPolicy,
    /// Whether polling may change the tracked grabber
    tracking: bool,
    /// Per-axis scale for absolute motion events
    sensitivities: [f64; 2],
    /// Previous event of the current pointer stream
    pub(super) chain: Option<Event>,
    /// Receiver of the gesture started by the last press
    pub(super) grab: Option<GrabberId>,
    /// Optional callback source drained on every tick
    feed: Option<Box<dyn Feed>>,
    /// Bookkeeping since the last tick
    pending: TickSummary,
    /// Number of completed ticks
    ticks: u64,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent {
    /// Creates an agent with poll-to-track focus and unit sensitivities.
    pub fn new() -> Self {
        Self {
            grabbers: Vec::new(),
            next_id: 1,
            tracked: None,
            default_grabber: None,
            policy: FocusPolicy::PollToTrack,
            tracking: true,
            sensitivities: [1.0, 1.0],
            chain: None,
            grab: None,
            feed: None,
            pending: TickSummary::default(),
            ticks: 0,
        }
    }

    /// Creates an agent from the `[agent]` configuration section.
    pub fn from_config(config: &AgentConfig) -> Self {
        let mut agent = Self::new();
        agent.policy = config.focus_policy;
        agent.tracking = config.tracking;
        agent.sensitivities = config.sensitivities;
        agent
    }

    // ---------------------------------------------------------------------
    // Grabbers
    // ---------------------------------------------------------------------

    /// Registers a grabber and returns its id.
    ///
    /// # Errors
    /// Returns [`AgentError::AlreadyRegistered`] if the same handle is
    /// already registered.
    pub fn add_grabber(&mut self, grabber: GrabberRef) -> Result<GrabberId, AgentError> {
        if let Some(existing) = self.id_of(&grabber) {
            return Err(AgentError::AlreadyRegistered(existing));
        }
        let id = GrabberId(self.next_id);
        self.next_id += 1;
        self.grabbers.push((id, grabber));
        debug!("Registered {id} ({} grabbers)", self.grabbers.len());
        Ok(id)
    }

    /// Removes a grabber from the registry and returns the agent's handle.
    ///
    /// Clears tracking, the default grabber and the active grab if they
    /// referred to it.
    pub fn remove_grabber(&mut self, id: GrabberId) -> Option<GrabberRef> {
        let index = self.grabbers.iter().position(|(gid, _)| *gid == id)?;
        if self.default_grabber == Some(id) {
            self.default_grabber = None;
        }
        if self.tracked == Some(id) {
            debug!("Removed tracked {id}; clearing focus");
            self.tracked = None;
        }
        if self.grab == Some(id) {
            debug!("Removed grab target {id}; remaining chain events are dropped");
            self.grab = None;
        }
        let (_, grabber) = self.grabbers.remove(index);
        Some(grabber)
    }

    /// Removes every grabber and resets all focus state.
    pub fn remove_grabbers(&mut self) {
        self.default_grabber = None;
        self.tracked = None;
        self.grab = None;
        self.grabbers.clear();
    }

    pub fn has_grabber(&self, id: GrabberId) -> bool {
        self.grabbers.iter().any(|(gid, _)| *gid == id)
    }

    pub fn grabber(&self, id: GrabberId) -> Option<&GrabberRef> {
        self.grabbers
            .iter()
            .find(|(gid, _)| *gid == id)
            .map(|(_, grabber)| grabber)
    }

    /// Registered grabbers in registration order.
    pub fn grabbers(&self) -> impl Iterator<Item = (GrabberId, &GrabberRef)> {
        self.grabbers.iter().map(|(id, grabber)| (*id, grabber))
    }

    /// Looks up the id under which a handle is registered.
    pub fn id_of(&self, grabber: &GrabberRef) -> Option<GrabberId> {
        self.grabbers
            .iter()
            .find(|(_, registered)| same_grabber(registered, grabber))
            .map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.grabbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grabbers.is_empty()
    }

    // ---------------------------------------------------------------------
    // Focus
    // ---------------------------------------------------------------------

    /// Re-resolves the tracked grabber from `event`.
    ///
    /// The default grabber is queried first; otherwise the first registered
    /// grabber whose `track` accepts the event wins. No grabber's `interact`
    /// is called. When tracking is disabled the current value is returned
    /// unchanged.
    pub fn poll(&mut self, event: &Event) -> Option<GrabberId> {
        if !self.tracking {
            return self.tracked;
        }

        let default_hit = self
            .default_grabber
            .and_then(|id| self.grabber(id).map(|grabber| (id, grabber)))
            .filter(|(_, grabber)| grabber.borrow().track(event))
            .map(|(id, _)| id);

        let resolved = default_hit.or_else(|| {
            self.grabbers
                .iter()
                .find(|(_, grabber)| grabber.borrow().track(event))
                .map(|(id, _)| *id)
        });

        if resolved != self.tracked {
            debug!(
                "Tracked grabber changed: {} -> {}",
                describe(self.tracked),
                describe(resolved)
            );
        }
        self.tracked = resolved;
        self.tracked
    }

    /// Grabber resolved by the last poll, if any.
    pub fn tracked_grabber(&self) -> Option<GrabberId> {
        self.tracked
    }

    pub fn reset_tracked_grabber(&mut self) {
        self.tracked = None;
    }

    pub fn default_grabber(&self) -> Option<GrabberId> {
        self.default_grabber
    }

    /// Sets (or clears, with `None`) the default grabber.
    ///
    /// # Errors
    /// Returns [`AgentError::UnknownGrabber`] if the id is not registered.
    pub fn set_default_grabber(&mut self, id: Option<GrabberId>) -> Result<(), AgentError> {
        match id {
            None => {
                self.default_grabber = None;
                Ok(())
            }
            Some(id) if self.has_grabber(id) => {
                self.default_grabber = Some(id);
                Ok(())
            }
            Some(id) => {
                warn!("Default grabber must be registered with the agent first ({id})");
                Err(AgentError::UnknownGrabber(id))
            }
        }
    }

    /// Makes `first` the default grabber, or `second` if `first` already is
    /// (or cannot be set). Returns whether a default was set.
    pub fn shift_default_grabber(&mut self, first: GrabberId, second: GrabberId) -> bool {
        if self.default_grabber != Some(first) && self.set_default_grabber(Some(first)).is_ok() {
            return true;
        }
        self.set_default_grabber(Some(second)).is_ok()
    }

    /// The grabber that receives dispatched events: tracked, else default.
    pub fn input_grabber(&self) -> Option<GrabberId> {
        self.tracked.or(self.default_grabber)
    }

    pub fn is_input_grabber(&self, id: GrabberId) -> bool {
        self.input_grabber() == Some(id)
    }

    /// Handle-based variant of [`Agent::is_input_grabber`] for render loops.
    pub fn is_input_grabber_ref(&self, grabber: &GrabberRef) -> bool {
        self.id_of(grabber)
            .is_some_and(|id| self.is_input_grabber(id))
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Enables or disables polling. Disabling clears the tracked grabber.
    pub fn set_tracking(&mut self, enable: bool) {
        self.tracking = enable;
        if !enable {
            self.tracked = None;
        }
    }

    pub fn enable_tracking(&mut self) {
        self.set_tracking(true);
    }

    pub fn disable_tracking(&mut self) {
        self.set_tracking(false);
    }

    pub fn toggle_tracking(&mut self) {
        self.set_tracking(!self.tracking);
    }

    pub fn focus_policy(&self) -> FocusPolicy {
        self.policy
    }

    /// Switches the focus policy; any change clears the tracked grabber.
    ///
    /// Grabbers are not informed: each one decides which binding positions
    /// it under the new policy (see `Ellipse::set_click_to_pick`).
    pub fn set_focus_policy(&mut self, policy: FocusPolicy) {
        if policy != self.policy {
            debug!("Focus policy {:?} -> {:?}", self.policy, policy);
            self.policy = policy;
            self.tracked = None;
        }
    }

    /// Flips between poll-to-track and click-to-pick and returns the new policy.
    pub fn toggle_focus_policy(&mut self) -> FocusPolicy {
        self.set_focus_policy(self.policy.toggled());
        self.policy
    }

    pub fn sensitivities(&self) -> [f64; 2] {
        self.sensitivities
    }

    pub fn set_sensitivities(&mut self, sensitivities: [f64; 2]) {
        self.sensitivities = sensitivities;
    }

    // ---------------------------------------------------------------------
    // Delivery
    // ---------------------------------------------------------------------

    /// Delivers an event to the input grabber.
    ///
    /// Absolute motion events without displacement are dropped unless they
    /// end a gesture; absolute motion is scaled by the agent sensitivities.
    /// Returns whether a grabber received the event. With no input grabber
    /// this is a no-op.
    pub fn handle(&mut self, event: Event) -> bool {
        let target = self.input_grabber();
        self.dispatch(target, event)
    }

    pub(super) fn dispatch(&mut self, target: Option<GrabberId>, event: Event) -> bool {
        if event.is_motion() && event.is_absolute() && event.is_null() && !event.flushed() {
            return false;
        }
        let event = if event.is_motion() {
            event.modulate(self.sensitivities)
        } else {
            event
        };

        let Some(id) = target else {
            return false;
        };
        let Some(grabber) = self.grabber(id) else {
            return false;
        };

        grabber.borrow_mut().interact(&event);
        self.pending.dispatched += 1;
        if event.is_oneshot() {
            self.pending.oneshots += 1;
        }
        true
    }

    // ---------------------------------------------------------------------
    // Ticks
    // ---------------------------------------------------------------------

    /// Installs a feed drained on every [`Agent::tick`].
    pub fn set_feed(&mut self, feed: Box<dyn Feed>) {
        self.feed = Some(feed);
    }

    pub fn clear_feed(&mut self) {
        self.feed = None;
    }

    pub fn has_feed(&self) -> bool {
        self.feed.is_some()
    }

    /// Bookkeeping accumulated since the last tick.
    pub fn pending(&self) -> TickSummary {
        self.pending
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Finalizes the current tick.
    ///
    /// Drains the feed (if any) until it yields `None`, then returns and
    /// resets the per-tick counters.
    pub fn tick(&mut self) -> TickSummary {
        if let Some(mut feed) = self.feed.take() {
            while let Some(fed) = feed.next_event() {
                self.pending.fed += 1;
                match fed {
                    FeedEvent::Poll(event) => {
                        self.poll(&event);
                    }
                    FeedEvent::Handle(event) => {
                        self.handle(event);
                    }
                    FeedEvent::PollAndHandle(event) => {
                        self.poll(&event);
                        self.handle(event);
                    }
                }
            }
            self.feed = Some(feed);
        }

        self.ticks += 1;
        std::mem::take(&mut self.pending)
    }
}

fn describe(id: Option<GrabberId>) -> String {
    id.map_or_else(|| "none".to_string(), |id| id.to_string())
}
