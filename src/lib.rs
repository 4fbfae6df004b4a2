//! Device-agnostic input dispatch.
//!
//! Backends describe raw device activity as [`agent::RawSample`]s; an
//! [`Agent`] normalizes them into [`Event`]s, decides which registered
//! [`Grabber`] holds focus and delivers the event to it. Grabbers compare
//! `event.shortcut()` against their own bindings to pick a reaction. An
//! [`InputHandler`] finalizes every registered agent once per frame.
//!
//! The [`scene`] module provides an ellipse grabber and a render list used by
//! the `bias` replay binary and the integration tests.

pub mod agent;
pub mod config;
pub mod event;
pub mod grabber;
pub mod handler;
pub mod replay;
pub mod scene;
pub mod util;

pub use agent::{Agent, AgentRef};
pub use config::Config;
pub use event::{Event, Shortcut};
pub use grabber::{Grabber, GrabberId, GrabberRef};
pub use handler::{AgentId, InputHandler};
