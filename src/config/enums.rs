//! Configuration enum types.

use crate::scene::{Color, color::BLACK};
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How an agent acquires focus.
///
/// The agent enforces when polling happens; each grabber decides which of
/// its bindings positions it under the active policy.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FocusPolicy {
    /// Re-resolve the tracked grabber on every plain pointer move
    #[default]
    PollToTrack,
    /// Keep focus fixed until an explicit pick (a click) re-resolves it
    ClickToPick,
}

impl FocusPolicy {
    pub fn toggled(self) -> Self {
        match self {
            FocusPolicy::PollToTrack => FocusPolicy::ClickToPick,
            FocusPolicy::ClickToPick => FocusPolicy::PollToTrack,
        }
    }

    pub fn is_click_to_pick(self) -> bool {
        self == FocusPolicy::ClickToPick
    }
}

/// Color specification - either a named color or RGB values.
///
/// # Examples
/// ```toml
/// # Named color
/// contour_color = "black"
///
/// # Custom RGB color (0-255 per component)
/// contour_color = [255, 128, 0]  # Orange
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color: red, green, blue, white, black
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`] struct.
    ///
    /// Unknown color names default to black with a warning. RGB arrays are
    /// converted from 0-255 range to 0.0-1.0 range with full opacity.
    pub fn to_color(&self) -> Color {
        match self {
            ColorSpec::Name(name) => crate::util::name_to_color(name).unwrap_or_else(|| {
                warn!("Unknown color '{}', using black", name);
                BLACK
            }),
            ColorSpec::Rgb([r, g, b]) => Color {
                r: *r as f64 / 255.0,
                g: *g as f64 / 255.0,
                b: *b as f64 / 255.0,
                a: 1.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_policy_toggles() {
        assert_eq!(FocusPolicy::PollToTrack.toggled(), FocusPolicy::ClickToPick);
        assert_eq!(FocusPolicy::ClickToPick.toggled(), FocusPolicy::PollToTrack);
        assert!(FocusPolicy::ClickToPick.is_click_to_pick());
    }

    #[test]
    fn focus_policy_uses_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: FocusPolicy,
        }
        let parsed: Wrapper = toml::from_str(r#"policy = "click-to-pick""#).unwrap();
        assert_eq!(parsed.policy, FocusPolicy::ClickToPick);
    }

    #[test]
    fn color_spec_converts_names_and_rgb() {
        assert_eq!(ColorSpec::Name("White".into()).to_color(), crate::scene::color::WHITE);
        assert_eq!(ColorSpec::Name("mauve".into()).to_color(), BLACK);
        assert_eq!(ColorSpec::Rgb([255, 0, 0]).to_color(), crate::scene::color::RED);
    }
}
