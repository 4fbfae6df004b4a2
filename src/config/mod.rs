//! Configuration file support for bias.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/bias/config.toml`. Settings include the agent focus policy,
//! the ellipse bindings and the demo scene parameters.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod bindings;
pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use bindings::{BindingsConfig, EllipseAction, EllipseBindings};
pub use enums::{ColorSpec, FocusPolicy};
pub use types::{AgentConfig, SceneConfig};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [agent]
/// focus_policy = "click-to-pick"
/// sensitivities = [1.0, 1.0]
///
/// [bindings]
/// resize = ["Right", "Shift+Left"]
/// recolor = ["Click:Left", "Key:c"]
///
/// [scene]
/// ellipses = 25
/// seed = 7
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Pointer agent behavior (focus policy, tracking, sensitivities)
    #[serde(default)]
    pub agent: AgentConfig,

    /// Ellipse binding strings
    #[serde(default)]
    pub bindings: BindingsConfig,

    /// Demo scene parameters
    #[serde(default)]
    pub scene: SceneConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is
    /// logged. Binding sets that fail to parse are replaced by the defaults.
    ///
    /// Validated ranges:
    /// - `agent.sensitivities`: 0.1 - 10.0 per axis
    /// - `scene.ellipses`: 0 - 1000
    /// - `scene.width`, `scene.height`: 100.0 - 10000.0
    /// - `scene.max_radius`: 1.0 - half the shorter canvas side
    /// - `scene.min_radius`: 1.0 - `max_radius`
    /// - `scene.max_stroke_weight`: 1.0 - 100.0
    /// - `scene.stroke_weight`: 1.0 - `max_stroke_weight`
    pub fn validate_and_clamp(&mut self) {
        // NaN and infinities parse as valid TOML floats; reset them first
        let agent_defaults = AgentConfig::default();
        for (axis, value) in self.agent.sensitivities.iter_mut().enumerate() {
            if !value.is_finite() {
                warn!("Non-finite sensitivities[{axis}], using default");
                *value = agent_defaults.sensitivities[axis];
            }
        }
        let scene_defaults = SceneConfig::default();
        for (name, value, default) in [
            ("width", &mut self.scene.width, scene_defaults.width),
            ("height", &mut self.scene.height, scene_defaults.height),
            ("min_radius", &mut self.scene.min_radius, scene_defaults.min_radius),
            ("max_radius", &mut self.scene.max_radius, scene_defaults.max_radius),
            (
                "stroke_weight",
                &mut self.scene.stroke_weight,
                scene_defaults.stroke_weight,
            ),
            (
                "max_stroke_weight",
                &mut self.scene.max_stroke_weight,
                scene_defaults.max_stroke_weight,
            ),
        ] {
            if !value.is_finite() {
                warn!("Non-finite {name}, using default {default:.1}");
                *value = default;
            }
        }

        // Sensitivities: 0.1 - 10.0
        for (axis, value) in self.agent.sensitivities.iter_mut().enumerate() {
            if !(0.1..=10.0).contains(&*value) {
                warn!(
                    "Invalid sensitivities[{}] = {:.2}, clamping to 0.1-10.0 range",
                    axis, value
                );
                *value = value.clamp(0.1, 10.0);
            }
        }

        // Ellipse count: 0 - 1000
        if self.scene.ellipses > 1000 {
            warn!(
                "Invalid ellipse count {}, clamping to 0-1000 range",
                self.scene.ellipses
            );
            self.scene.ellipses = 1000;
        }

        // Canvas: 100.0 - 10000.0
        for (name, value) in [
            ("width", &mut self.scene.width),
            ("height", &mut self.scene.height),
        ] {
            if !(100.0..=10000.0).contains(&*value) {
                warn!(
                    "Invalid canvas {} {:.1}, clamping to 100.0-10000.0 range",
                    name, value
                );
                *value = value.clamp(100.0, 10000.0);
            }
        }

        // Radii must fit on the canvas
        let radius_limit = self.scene.width.min(self.scene.height) / 2.0;
        if !(1.0..=radius_limit).contains(&self.scene.max_radius) {
            warn!(
                "Invalid max_radius {:.1}, clamping to 1.0-{:.1} range",
                self.scene.max_radius, radius_limit
            );
            self.scene.max_radius = self.scene.max_radius.clamp(1.0, radius_limit);
        }
        if !(1.0..=self.scene.max_radius).contains(&self.scene.min_radius) {
            warn!(
                "Invalid min_radius {:.1}, clamping to 1.0-{:.1} range",
                self.scene.min_radius, self.scene.max_radius
            );
            self.scene.min_radius = self.scene.min_radius.clamp(1.0, self.scene.max_radius);
        }

        // Stroke weight: 1.0 - max_stroke_weight
        if !(1.0..=100.0).contains(&self.scene.max_stroke_weight) {
            warn!(
                "Invalid max_stroke_weight {:.1}, clamping to 1.0-100.0 range",
                self.scene.max_stroke_weight
            );
            self.scene.max_stroke_weight = self.scene.max_stroke_weight.clamp(1.0, 100.0);
        }
        if !(1.0..=self.scene.max_stroke_weight).contains(&self.scene.stroke_weight) {
            warn!(
                "Invalid stroke_weight {:.1}, clamping to 1.0-{:.1} range",
                self.scene.stroke_weight, self.scene.max_stroke_weight
            );
            self.scene.stroke_weight = self
                .scene
                .stroke_weight
                .clamp(1.0, self.scene.max_stroke_weight);
        }

        // Bindings must parse
        if let Err(err) = self.bindings.build_bindings() {
            warn!("Invalid bindings ({}), falling back to defaults", err);
            self.bindings = BindingsConfig::default();
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/bias/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("bias");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit path.
    ///
    /// Unlike [`Config::load`], a missing file is an error.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        // Validate and clamp values to acceptable ranges
        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Saves the current configuration to the default location.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, the config cannot
    /// be serialized or the file cannot be written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    /// Serializes the config to TOML and writes it to `config_path`,
    /// creating the parent directory if needed.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// JSON schema of the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}
