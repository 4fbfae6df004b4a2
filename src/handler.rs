//! Explicit registry of agents driven once per frame.

use crate::agent::{AgentRef, TickSummary};
use crate::grabber::{GrabberId, GrabberRef};
use log::{debug, warn};
use std::fmt;
use std::rc::Rc;

/// Identity of an agent within one [`InputHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(u64);

impl AgentId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// Holds the registered agents and finalizes each of them once per tick.
///
/// The host constructs one handler and calls [`InputHandler::tick`] at the
/// end of every frame. Grabber helpers broadcast to every registered agent.
#[derive(Default)]
pub struct InputHandler {
    agents: Vec<(AgentId, AgentRef)>,
    next_id: u64,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an agent. Registering the same handle again returns the
    /// id it already has.
    pub fn register(&mut self, agent: AgentRef) -> AgentId {
        if let Some((id, _)) = self
            .agents
            .iter()
            .find(|(_, registered)| Rc::ptr_eq(registered, &agent))
        {
            return *id;
        }
        self.next_id += 1;
        let id = AgentId(self.next_id);
        self.agents.push((id, agent));
        debug!("Registered {id} ({} agents)", self.agents.len());
        id
    }

    pub fn unregister(&mut self, id: AgentId) -> Option<AgentRef> {
        let index = self.agents.iter().position(|(aid, _)| *aid == id)?;
        let (_, agent) = self.agents.remove(index);
        debug!("Unregistered {id}");
        Some(agent)
    }

    pub fn unregister_all(&mut self) {
        self.agents.clear();
    }

    pub fn is_registered(&self, id: AgentId) -> bool {
        self.agents.iter().any(|(aid, _)| *aid == id)
    }

    pub fn agent(&self, id: AgentId) -> Option<&AgentRef> {
        self.agents
            .iter()
            .find(|(aid, _)| *aid == id)
            .map(|(_, agent)| agent)
    }

    /// Registered agents in registration order.
    pub fn agents(&self) -> impl Iterator<Item = (AgentId, &AgentRef)> {
        self.agents.iter().map(|(id, agent)| (*id, agent))
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Finalizes the frame: ticks every agent exactly once, in registration
    /// order, and returns the combined bookkeeping.
    pub fn tick(&mut self) -> TickSummary {
        let mut total = TickSummary::default();
        for (_, agent) in &self.agents {
            let summary = agent.borrow_mut().tick();
            total.dispatched += summary.dispatched;
            total.oneshots += summary.oneshots;
            total.fed += summary.fed;
        }
        total
    }

    // ---------------------------------------------------------------------
    // Grabber broadcasts
    // ---------------------------------------------------------------------

    /// Adds the grabber to every agent and returns the id each assigned.
    ///
    /// Agents that already hold the handle report their existing id.
    pub fn add_grabber(&mut self, grabber: &GrabberRef) -> Vec<(AgentId, GrabberId)> {
        self.agents
            .iter()
            .filter_map(|(aid, agent)| {
                let mut agent = agent.borrow_mut();
                if let Some(existing) = agent.id_of(grabber) {
                    return Some((*aid, existing));
                }
                match agent.add_grabber(grabber.clone()) {
                    Ok(gid) => Some((*aid, gid)),
                    Err(err) => {
                        warn!("{aid}: {err}");
                        None
                    }
                }
            })
            .collect()
    }

    /// Removes the grabber from every agent that holds it. Returns whether
    /// any agent did.
    pub fn remove_grabber(&mut self, grabber: &GrabberRef) -> bool {
        let mut removed = false;
        for (_, agent) in &self.agents {
            let mut agent = agent.borrow_mut();
            if let Some(id) = agent.id_of(grabber) {
                removed |= agent.remove_grabber(id).is_some();
            }
        }
        removed
    }

    pub fn remove_grabbers(&mut self) {
        for (_, agent) in &self.agents {
            agent.borrow_mut().remove_grabbers();
        }
    }

    /// Makes the grabber the default grabber of every agent holding it.
    pub fn set_default_grabber(&mut self, grabber: &GrabberRef) {
        for (_, agent) in &self.agents {
            let mut agent = agent.borrow_mut();
            if let Some(id) = agent.id_of(grabber) {
                let _ = agent.set_default_grabber(Some(id));
            }
        }
    }

    /// Alternates the default grabber between `first` and `second` on every
    /// agent holding both.
    pub fn shift_default_grabber(&mut self, first: &GrabberRef, second: &GrabberRef) {
        for (_, agent) in &self.agents {
            let mut agent = agent.borrow_mut();
            if let (Some(a), Some(b)) = (agent.id_of(first), agent.id_of(second)) {
                agent.shift_default_grabber(a, b);
            }
        }
    }

    pub fn reset_tracked_grabber(&mut self) {
        for (_, agent) in &self.agents {
            agent.borrow_mut().reset_tracked_grabber();
        }
    }

    /// True if at least one agent holds the grabber.
    pub fn has_grabber(&self, grabber: &GrabberRef) -> bool {
        self.agents
            .iter()
            .any(|(_, agent)| agent.borrow().id_of(grabber).is_some())
    }

    /// True if the grabber is the input grabber of at least one agent.
    pub fn is_input_grabber(&self, grabber: &GrabberRef) -> bool {
        self.agents
            .iter()
            .any(|(_, agent)| agent.borrow().is_input_grabber_ref(grabber))
    }
}
