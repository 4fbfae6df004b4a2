//! Input event model.
//!
//! Backends describe raw device activity with control ids and modifier masks;
//! agents turn that into immutable [`Event`]s whose [`Shortcut`] is what
//! grabbers compare their bindings against.

pub mod controls;
pub mod modifiers;
mod motion;
pub mod record;
pub mod shortcut;

// Re-export commonly used types at module level
pub use controls::{ControlId, Key, MouseButton};
pub use modifiers::Modifiers;
pub use record::{Event, Lifecycle, Payload};
pub use shortcut::Shortcut;
