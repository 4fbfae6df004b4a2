//! Input agents: focus resolution and event dispatch.
//!
//! An [`Agent`] owns a registry of grabbers, decides which one currently holds
//! focus and turns raw device samples into gesture chains delivered to that
//! grabber. Several agents (one per device) are driven together by an
//! [`InputHandler`](crate::handler::InputHandler).

mod dispatch;
pub mod feed;
mod registry;
pub mod sample;

#[cfg(test)]
mod tests;

use std::cell::RefCell;
use std::rc::Rc;

// Re-export commonly used types at module level
pub use feed::{Feed, FeedEvent};
pub use registry::{Agent, AgentError, TickSummary};
pub use sample::RawSample;

/// Shared handle to an agent, held by the host and by the input handler.
pub type AgentRef = Rc<RefCell<Agent>>;
