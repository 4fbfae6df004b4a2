//! Shortcut values and binding-string parsing.
//!
//! A [`Shortcut`] identifies "which control, in which modifier state" produced
//! an event. Grabbers declare the shortcuts they respond to and compare them
//! against `event.shortcut()` inside `interact`.

use super::controls::{ControlId, Key};
use super::modifiers::Modifiers;
use std::fmt;

/// Immutable lookup key for binding resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shortcut {
    /// Motion gesture: a button (or `NO_ID`) plus modifiers.
    Motion { id: ControlId, modifiers: Modifiers },
    /// Tap/click: a button plus modifiers and a click count (always >= 1).
    Tap {
        id: ControlId,
        modifiers: Modifiers,
        count: u32,
    },
    /// Keyboard key plus modifiers.
    Key { key: Key, modifiers: Modifiers },
}

impl Shortcut {
    pub fn motion(id: ControlId, modifiers: Modifiers) -> Self {
        Shortcut::Motion { id, modifiers }
    }

    /// Builds a tap shortcut; a zero count is normalized to a single click.
    pub fn tap(id: ControlId, modifiers: Modifiers, count: u32) -> Self {
        Shortcut::Tap {
            id,
            modifiers,
            count: count.max(1),
        }
    }

    pub fn key(key: Key, modifiers: Modifiers) -> Self {
        Shortcut::Key { key, modifiers }
    }

    /// Control id of motion and tap shortcuts; `None` for key shortcuts.
    pub fn id(&self) -> Option<ControlId> {
        match self {
            Shortcut::Motion { id, .. } | Shortcut::Tap { id, .. } => Some(*id),
            Shortcut::Key { .. } => None,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            Shortcut::Motion { modifiers, .. }
            | Shortcut::Tap { modifiers, .. }
            | Shortcut::Key { modifiers, .. } => *modifiers,
        }
    }

    /// Returns whether this binding matches the `other` (event) shortcut.
    ///
    /// All discriminating fields must agree, except that a binding whose id
    /// is [`ControlId::NO_ID`] accepts any control id of the same kind.
    pub fn matches(&self, other: &Shortcut) -> bool {
        let id_matches = |bound: ControlId, actual: ControlId| bound.is_none() || bound == actual;
        match (self, other) {
            (
                Shortcut::Motion { id, modifiers },
                Shortcut::Motion {
                    id: other_id,
                    modifiers: other_modifiers,
                },
            ) => id_matches(*id, *other_id) && modifiers == other_modifiers,
            (
                Shortcut::Tap {
                    id,
                    modifiers,
                    count,
                },
                Shortcut::Tap {
                    id: other_id,
                    modifiers: other_modifiers,
                    count: other_count,
                },
            ) => id_matches(*id, *other_id) && modifiers == other_modifiers && count == other_count,
            (
                Shortcut::Key { key, modifiers },
                Shortcut::Key {
                    key: other_key,
                    modifiers: other_modifiers,
                },
            ) => key.same_key(other_key) && modifiers == other_modifiers,
            _ => false,
        }
    }

    /// Parse a binding string.
    ///
    /// Accepted forms (case-insensitive, modifiers in any order, spaces around
    /// `+` allowed):
    /// - motion: `"Left"`, `"Ctrl+Right"`, `"None"`, `"Wheel"`
    /// - tap: `"Click:Left"`, `"Click:Shift+Left*2"`
    /// - key: `"Key:c"`, `"Key:Ctrl+Shift+x"`, `"Key:Ctrl++"`, `"Key:#65"`
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty binding string".to_string());
        }

        let (kind, body) = match s.split_once(':') {
            Some((prefix, rest)) => (prefix.trim().to_lowercase(), rest.trim()),
            None => ("motion".to_string(), s),
        };

        let (modifiers, control) = split_modifiers(body)
            .ok_or_else(|| format!("No control specified in: {}", s))?;

        match kind.as_str() {
            "motion" | "drag" => {
                let id = ControlId::from_name(&control)
                    .ok_or_else(|| format!("Unknown control '{}' in: {}", control, s))?;
                Ok(Shortcut::motion(id, modifiers))
            }
            "click" | "tap" => {
                let (name, count) = match control.split_once('*') {
                    Some((name, count)) => {
                        let count = count
                            .trim()
                            .parse::<u32>()
                            .map_err(|_| format!("Invalid click count in: {}", s))?;
                        if count == 0 {
                            return Err(format!("Click count must be at least 1 in: {}", s));
                        }
                        (name.trim().to_string(), count)
                    }
                    None => (control.clone(), 1),
                };
                let id = ControlId::from_name(&name)
                    .ok_or_else(|| format!("Unknown control '{}' in: {}", name, s))?;
                Ok(Shortcut::tap(id, modifiers, count))
            }
            "key" => {
                let key = if let Some(code) = control.strip_prefix('#') {
                    let code = code
                        .parse::<u32>()
                        .map_err(|_| format!("Invalid virtual key code in: {}", s))?;
                    Key::Virtual(ControlId(code))
                } else {
                    let mut chars = control.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Key::Char(c),
                        _ => return Err(format!("Key bindings take a single character: {}", s)),
                    }
                };
                Ok(Shortcut::key(key, modifiers))
            }
            other => Err(format!("Unknown binding kind '{}' in: {}", other, s)),
        }
    }
}

/// Splits `"Ctrl+Shift+Left"` into its modifier mask and trailing control.
///
/// The `+` key itself is written as a lone `+` or after a joining `+`
/// (`"Ctrl++"`). Any other empty part, such as the dangling `+` in
/// `"Ctrl+"`, is rejected.
fn split_modifiers(body: &str) -> Option<(Modifiers, String)> {
    let normalized = body.replace(" + ", "+").replace("+ ", "+").replace(" +", "+");
    if normalized == "+" {
        return Some((Modifiers::NONE, "+".to_string()));
    }

    if let Some(prefix) = normalized.strip_suffix("++") {
        let mut modifiers = Modifiers::NONE;
        if !prefix.is_empty() {
            for part in prefix.split('+') {
                modifiers |= Modifiers::from_binding_name(part)?;
            }
        }
        return Some((modifiers, "+".to_string()));
    }

    let mut modifiers = Modifiers::NONE;
    let mut control_parts = Vec::new();
    for part in normalized.split('+') {
        if part.is_empty() {
            return None;
        }
        match Modifiers::from_binding_name(part) {
            Some(flag) if control_parts.is_empty() => modifiers |= flag,
            _ => control_parts.push(part),
        }
    }

    if control_parts.is_empty() {
        None
    } else {
        Some((modifiers, control_parts.join("+")))
    }
}

fn modifier_prefix(modifiers: Modifiers) -> String {
    let names = [
        (Modifiers::CTRL, "Ctrl"),
        (Modifiers::SHIFT, "Shift"),
        (Modifiers::ALT, "Alt"),
        (Modifiers::META, "Meta"),
        (Modifiers::ALT_GRAPH, "AltGr"),
    ];
    names
        .iter()
        .filter(|(flag, _)| modifiers.contains(*flag))
        .map(|(_, name)| format!("{name}+"))
        .collect()
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shortcut::Motion { id, modifiers } => {
                write!(f, "{}{}", modifier_prefix(*modifiers), id)
            }
            Shortcut::Tap {
                id,
                modifiers,
                count,
            } => {
                write!(f, "Click:{}{}", modifier_prefix(*modifiers), id)?;
                if *count > 1 {
                    write!(f, "*{count}")?;
                }
                Ok(())
            }
            Shortcut::Key { key, modifiers } => {
                write!(f, "Key:{}{}", modifier_prefix(*modifiers), key)
            }
        }
    }
}
