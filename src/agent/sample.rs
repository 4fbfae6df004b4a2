//! Raw device samples delivered by the host.

use crate::event::{ControlId, Key, Modifiers};

/// One raw device sample, already reduced to control id, coordinates and
/// modifiers by the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawSample {
    /// Pointer moved with no button held
    Move { x: f64, y: f64, modifiers: Modifiers },
    /// Button pressed (gesture start)
    Press {
        button: ControlId,
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },
    /// Pointer moved with a button held
    Drag {
        button: ControlId,
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },
    /// Button released (gesture end)
    Release {
        button: ControlId,
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },
    /// Scroll step; positive values scroll down
    Wheel { delta: f64, modifiers: Modifiers },
    /// Completed click with its repeat count
    Click {
        button: ControlId,
        x: f64,
        y: f64,
        count: u32,
        modifiers: Modifiers,
    },
    /// Key press
    Key { key: Key, modifiers: Modifiers },
}

impl RawSample {
    /// Short name used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            RawSample::Move { .. } => "move",
            RawSample::Press { .. } => "press",
            RawSample::Drag { .. } => "drag",
            RawSample::Release { .. } => "release",
            RawSample::Wheel { .. } => "wheel",
            RawSample::Click { .. } => "click",
            RawSample::Key { .. } => "key",
        }
    }

    /// Reduces a scroll amount to a unit step as backends with smooth
    /// scrolling report fractional values.
    pub fn wheel_step(amount: f64, modifiers: Modifiers) -> Self {
        let delta = if amount.abs() > 0.1 { amount.signum() } else { 0.0 };
        RawSample::Wheel { delta, modifiers }
    }
}
