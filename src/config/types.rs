//! Configuration type definitions.

use super::enums::{ColorSpec, FocusPolicy};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Agent behavior settings.
///
/// Controls how the pointer agent acquires focus and scales device motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AgentConfig {
    /// Focus acquisition policy ("poll-to-track" or "click-to-pick")
    #[serde(default)]
    pub focus_policy: FocusPolicy,

    /// Whether polling may change the tracked grabber at all
    #[serde(default = "default_tracking")]
    pub tracking: bool,

    /// Per-axis scale applied to absolute motion such as wheel steps
    /// (valid range per axis: 0.1 - 10.0)
    #[serde(default = "default_sensitivities")]
    pub sensitivities: [f64; 2],
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            focus_policy: FocusPolicy::default(),
            tracking: default_tracking(),
            sensitivities: default_sensitivities(),
        }
    }
}

/// Demo scene settings.
///
/// Controls how many ellipses are created and the ranges their random
/// geometry is drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SceneConfig {
    /// Number of ellipses to create (valid range: 0 - 1000)
    #[serde(default = "default_ellipses")]
    pub ellipses: usize,

    /// Canvas width in pixels (valid range: 100 - 10000)
    #[serde(default = "default_canvas_size")]
    pub width: f64,

    /// Canvas height in pixels (valid range: 100 - 10000)
    #[serde(default = "default_canvas_size")]
    pub height: f64,

    /// Smallest initial radius (valid range: 1.0 - max_radius)
    #[serde(default = "default_min_radius")]
    pub min_radius: f64,

    /// Largest initial radius; ellipses keep this far from the canvas edge
    #[serde(default = "default_max_radius")]
    pub max_radius: f64,

    /// Initial contour stroke weight (valid range: 1.0 - max_stroke_weight)
    #[serde(default = "default_stroke_weight")]
    pub stroke_weight: f64,

    /// Upper bound for the thicken binding
    #[serde(default = "default_max_stroke_weight")]
    pub max_stroke_weight: f64,

    /// Contour color - a named color (red, green, blue, white, black)
    /// or an RGB array like `[0, 0, 0]`
    #[serde(default = "default_contour_color")]
    pub contour_color: ColorSpec,

    /// Seed for positions, radii and colors; random when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ellipses: default_ellipses(),
            width: default_canvas_size(),
            height: default_canvas_size(),
            min_radius: default_min_radius(),
            max_radius: default_max_radius(),
            stroke_weight: default_stroke_weight(),
            max_stroke_weight: default_max_stroke_weight(),
            contour_color: default_contour_color(),
            seed: None,
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_tracking() -> bool {
    true
}

fn default_sensitivities() -> [f64; 2] {
    [1.0, 1.0]
}

fn default_ellipses() -> usize {
    100
}

fn default_canvas_size() -> f64 {
    800.0
}

fn default_min_radius() -> f64 {
    20.0
}

fn default_max_radius() -> f64 {
    50.0
}

fn default_stroke_weight() -> f64 {
    4.0
}

fn default_max_stroke_weight() -> f64 {
    12.0
}

fn default_contour_color() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}
