//! Control identifiers for cross-backend compatibility.

use std::fmt;

/// Identifies the physical control (button, wheel, virtual key) behind an event.
///
/// Backends map their native button codes to these ids. Mouse ids follow the
/// DOM `MouseEvent.buttons` numbering so browser-style hosts can pass them
/// through unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(pub u32);

impl ControlId {
    /// Sentinel meaning "no button / any button". Used by move events.
    pub const NO_ID: Self = Self(0);
    /// Left mouse button
    pub const LEFT: Self = Self(1);
    /// Right mouse button
    pub const RIGHT: Self = Self(2);
    /// Middle mouse button
    pub const MIDDLE: Self = Self(4);
    /// Scroll wheel
    pub const WHEEL: Self = Self(10);

    pub fn is_none(self) -> bool {
        self == Self::NO_ID
    }

    /// Parses a control name used in binding strings.
    ///
    /// Accepts the symbolic names (`None`, `Left`, `Right`, `Middle`, `Wheel`)
    /// or a raw numeric id.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "none" | "nobutton" | "no_button" | "move" => Some(Self::NO_ID),
            "left" => Some(Self::LEFT),
            "right" => Some(Self::RIGHT),
            "middle" | "center" => Some(Self::MIDDLE),
            "wheel" => Some(Self::WHEEL),
            other => other.parse::<u32>().ok().map(Self),
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NO_ID => f.write_str("None"),
            Self::LEFT => f.write_str("Left"),
            Self::RIGHT => f.write_str("Right"),
            Self::MIDDLE => f.write_str("Middle"),
            Self::WHEEL => f.write_str("Wheel"),
            Self(raw) => write!(f, "{raw}"),
        }
    }
}

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button (primary)
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

impl From<MouseButton> for ControlId {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => ControlId::LEFT,
            MouseButton::Right => ControlId::RIGHT,
            MouseButton::Middle => ControlId::MIDDLE,
        }
    }
}

/// Generic key representation for key events and key shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Printable character key
    Char(char),
    /// Backend-specific virtual key code
    Virtual(ControlId),
}

impl Key {
    /// Character keys compare case-insensitively.
    pub fn same_key(&self, other: &Key) -> bool {
        match (self, other) {
            (Key::Char(a), Key::Char(b)) => a.eq_ignore_ascii_case(b),
            (Key::Virtual(a), Key::Virtual(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Virtual(id) => write!(f, "#{}", id.0),
        }
    }
}
