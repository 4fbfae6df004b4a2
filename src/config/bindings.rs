//! Ellipse binding configuration and parsing.
//!
//! Each ellipse action can be bound to several shortcuts. Users specify them
//! in config.toml as binding strings understood by [`Shortcut::parse`]:
//! ```toml
//! [bindings]
//! resize = ["Right"]
//! recolor = ["Click:Left", "Key:c"]
//! ```

use crate::event::Shortcut;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything an ellipse can be asked to do through its bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EllipseAction {
    /// Move the center to the pointer while dragging (poll-to-track)
    RepositionDrag,
    /// Move the center to the pointer on plain moves (click-to-pick)
    RepositionMove,
    /// Grow or shrink the radii by the drag delta
    Resize,
    /// Grow or shrink both radii by the wheel step
    WheelResize,
    /// Pick a new random fill color
    Recolor,
    /// Decrease the stroke weight
    Thin,
    /// Increase the stroke weight
    Thicken,
}

/// Configuration for all ellipse bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BindingsConfig {
    #[serde(default = "default_reposition_drag")]
    pub reposition_drag: Vec<String>,

    #[serde(default = "default_reposition_move")]
    pub reposition_move: Vec<String>,

    #[serde(default = "default_resize")]
    pub resize: Vec<String>,

    #[serde(default = "default_wheel_resize")]
    pub wheel_resize: Vec<String>,

    #[serde(default = "default_recolor")]
    pub recolor: Vec<String>,

    #[serde(default = "default_thin")]
    pub thin: Vec<String>,

    #[serde(default = "default_thicken")]
    pub thicken: Vec<String>,
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            reposition_drag: default_reposition_drag(),
            reposition_move: default_reposition_move(),
            resize: default_resize(),
            wheel_resize: default_wheel_resize(),
            recolor: default_recolor(),
            thin: default_thin(),
            thicken: default_thicken(),
        }
    }
}

/// Parsed bindings, ready to be matched against `event.shortcut()`.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipseBindings {
    bindings: Vec<(Shortcut, EllipseAction)>,
}

impl EllipseBindings {
    /// Returns the first action whose binding matches the event shortcut,
    /// restricted to `candidates` (in the order given).
    pub fn resolve(&self, shortcut: &Shortcut, candidates: &[EllipseAction]) -> Option<EllipseAction> {
        candidates.iter().copied().find(|action| {
            self.bindings
                .iter()
                .any(|(binding, bound)| bound == action && binding.matches(shortcut))
        })
    }

    /// Shortcuts bound to `action`.
    pub fn shortcuts(&self, action: EllipseAction) -> impl Iterator<Item = &Shortcut> {
        self.bindings
            .iter()
            .filter(move |(_, bound)| *bound == action)
            .map(|(shortcut, _)| shortcut)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for EllipseBindings {
    fn default() -> Self {
        BindingsConfig::default()
            .build_bindings()
            .unwrap_or(Self { bindings: Vec::new() })
    }
}

impl BindingsConfig {
    /// Build the parsed binding set.
    /// Returns an error if any binding string is invalid or if duplicates are detected.
    ///
    /// The two reposition actions are never active at the same time, so a
    /// shortcut shared between them is allowed.
    pub fn build_bindings(&self) -> Result<EllipseBindings, String> {
        let mut seen: HashMap<Shortcut, EllipseAction> = HashMap::new();
        let mut bindings = Vec::new();

        let groups = [
            (&self.reposition_drag, EllipseAction::RepositionDrag),
            (&self.reposition_move, EllipseAction::RepositionMove),
            (&self.resize, EllipseAction::Resize),
            (&self.wheel_resize, EllipseAction::WheelResize),
            (&self.recolor, EllipseAction::Recolor),
            (&self.thin, EllipseAction::Thin),
            (&self.thicken, EllipseAction::Thicken),
        ];

        for (binding_strs, action) in groups {
            for binding_str in binding_strs {
                let shortcut = Shortcut::parse(binding_str)?;
                if let Some(existing) = seen.insert(shortcut, action) {
                    let exclusive = matches!(
                        (existing, action),
                        (EllipseAction::RepositionDrag, EllipseAction::RepositionMove)
                    );
                    if existing != action && !exclusive {
                        return Err(format!(
                            "Duplicate binding '{}' assigned to both {:?} and {:?}",
                            binding_str, existing, action
                        ));
                    }
                }
                bindings.push((shortcut, action));
            }
        }

        Ok(EllipseBindings { bindings })
    }
}

// =============================================================================
// Default binding functions
// =============================================================================

fn default_reposition_drag() -> Vec<String> {
    vec!["Left".to_string()]
}

fn default_reposition_move() -> Vec<String> {
    vec!["None".to_string()]
}

fn default_resize() -> Vec<String> {
    vec!["Right".to_string()]
}

fn default_wheel_resize() -> Vec<String> {
    vec!["Wheel".to_string(), "Ctrl+Wheel".to_string()]
}

fn default_recolor() -> Vec<String> {
    vec!["Click:Left".to_string(), "Key:c".to_string()]
}

fn default_thin() -> Vec<String> {
    vec!["Click:Right".to_string(), "Key:-".to_string()]
}

fn default_thicken() -> Vec<String> {
    vec!["Click:Middle".to_string(), "Key:+".to_string()]
}
