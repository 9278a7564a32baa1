//! Simulation tunables and the control table that exposes them.
//!
//! [`SimulationConfig`] is a plain serializable snapshot. The simulation
//! reads it every tick and never writes it; a control panel edits it between
//! ticks through [`SimulationConfig::set_control`], which clamps each value
//! into the range listed in [`CONTROLS`].

use crate::error::ConfigError;
use crate::theme::ColorTheme;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Control-panel folder a control is grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFolder {
    Particles,
    Visual,
    Interaction,
    Physics,
    Flow,
    Boundary,
}

/// One live-editable numeric control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSpec {
    /// Field name, as used by [`SimulationConfig::set_control`] and in JSON.
    pub name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    pub folder: ControlFolder,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ControlSpec {
    const fn new(
        name: &'static str,
        label: &'static str,
        folder: ControlFolder,
        min: f32,
        max: f32,
        step: f32,
    ) -> Self {
        Self {
            name,
            label,
            folder,
            min,
            max,
            step,
        }
    }

    /// Clamp a value into this control's range.
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Every numeric field of [`SimulationConfig`] with its editable range.
pub const CONTROLS: &[ControlSpec] = &[
    ControlSpec::new(
        "particle_count",
        "Particle Count",
        ControlFolder::Particles,
        1.0,
        1_000_000.0,
        1000.0,
    ),
    ControlSpec::new("particle_size", "Particle Size", ControlFolder::Particles, 0.005, 0.5, 0.005),
    ControlSpec::new("brightness", "Brightness", ControlFolder::Visual, 0.1, 2.0, 0.1),
    ControlSpec::new("bloom_strength", "Bloom Strength", ControlFolder::Visual, 0.1, 3.0, 0.1),
    ControlSpec::new("bloom_radius", "Bloom Radius", ControlFolder::Visual, 0.0, 1.0, 0.05),
    ControlSpec::new("bloom_threshold", "Bloom Threshold", ControlFolder::Visual, 0.0, 1.0, 0.05),
    ControlSpec::new(
        "repulsion_strength",
        "Repulsion Strength",
        ControlFolder::Interaction,
        0.1,
        1.0,
        0.05,
    ),
    ControlSpec::new(
        "repulsion_radius",
        "Repulsion Radius",
        ControlFolder::Interaction,
        0.5,
        5.0,
        0.1,
    ),
    ControlSpec::new(
        "mouse_influence",
        "Mouse Influence",
        ControlFolder::Interaction,
        0.1,
        2.0,
        0.1,
    ),
    ControlSpec::new("damping", "Damping", ControlFolder::Physics, 0.8, 0.99, 0.01),
    ControlSpec::new(
        "random_movement",
        "Random Movement",
        ControlFolder::Physics,
        0.0001,
        0.005,
        0.0001,
    ),
    ControlSpec::new("max_speed", "Max Speed", ControlFolder::Physics, 0.01, 0.5, 0.01),
    ControlSpec::new("float_strength", "Flow Strength", ControlFolder::Flow, 0.0005, 0.005, 0.0005),
    ControlSpec::new("float_speed", "Flow Speed", ControlFolder::Flow, 0.05, 0.5, 0.05),
    ControlSpec::new("float_scale", "Flow Scale", ControlFolder::Flow, 0.1, 2.0, 0.1),
    ControlSpec::new(
        "center_repel_strength",
        "Anti-Grouping",
        ControlFolder::Flow,
        0.0001,
        0.005,
        0.0001,
    ),
    ControlSpec::new("distribution_factor", "Distribution", ControlFolder::Flow, 0.2, 1.0, 0.1),
    ControlSpec::new("boundary_radius", "Boundary Radius", ControlFolder::Boundary, 1.0, 50.0, 0.5),
    ControlSpec::new(
        "boundary_strength",
        "Boundary Strength",
        ControlFolder::Boundary,
        0.0,
        0.2,
        0.005,
    ),
    ControlSpec::new("bounce_amount", "Bounce", ControlFolder::Boundary, 0.0, 1.0, 0.05),
];

/// Look up a control by field name.
pub fn control(name: &str) -> Option<&'static ControlSpec> {
    CONTROLS.iter().find(|c| c.name == name)
}

/// What the owner of a configuration has to do after a field changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    /// Read on the next tick; nothing else to do.
    Physics,
    /// Base colors must be recomputed.
    Colors,
    /// Colors must be recomputed and the renderer must pick up the
    /// theme's background and bloom.
    Theme,
    /// Renderer-only bloom parameter.
    Bloom,
    /// The particle store must be reinitialized (count or size changed).
    Reinitialize,
}

/// Tunables read by the simulation step.
///
/// Some fields (`damping`, the `float_*` family, `center_repel_strength`,
/// `distribution_factor`, `boundary_strength`, `bounce_amount`) are exposed
/// to the control panel but the tick uses fixed constants in their place.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub particle_count: u32,
    pub particle_size: f32,

    // Pointer interaction
    pub repulsion_strength: f32,
    pub repulsion_radius: f32,
    pub mouse_influence: f32,

    // Physics
    pub damping: f32,
    pub random_movement: f32,
    pub max_speed: f32,

    // Floating behavior
    pub float_strength: f32,
    pub float_speed: f32,
    pub float_scale: f32,

    // Anti-grouping
    pub center_repel_strength: f32,
    pub distribution_factor: f32,

    // Visual
    pub color_theme: ColorTheme,
    pub brightness: f32,
    pub bloom_strength: f32,
    pub bloom_radius: f32,
    pub bloom_threshold: f32,

    // Boundary
    pub boundary_radius: f32,
    pub boundary_strength: f32,
    pub bounce_amount: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            particle_count: 100_000,
            particle_size: 0.05,
            repulsion_strength: 0.5,
            repulsion_radius: 3.0,
            mouse_influence: 0.8,
            damping: 0.99,
            random_movement: 0.002,
            max_speed: 0.1,
            float_strength: 0.002,
            float_speed: 0.15,
            float_scale: 0.8,
            center_repel_strength: 0.001,
            distribution_factor: 0.7,
            color_theme: ColorTheme::Ember,
            brightness: 1.5,
            bloom_strength: 2.0,
            bloom_radius: 0.7,
            bloom_threshold: 0.2,
            boundary_radius: 10.0,
            boundary_strength: 0.05,
            bounce_amount: 0.8,
        }
    }
}

impl SimulationConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing fields take their defaults and out-of-range values are clamped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse a configuration from a JSON string, sanitizing the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Current value of a numeric control.
    pub fn value(&self, name: &str) -> Option<f32> {
        if name == "particle_count" {
            return Some(self.particle_count as f32);
        }
        self.scalar(name).copied()
    }

    /// Clamp and write a numeric control.
    pub fn set_control(&mut self, name: &str, value: f32) -> Result<ConfigChange, ConfigError> {
        let spec = control(name).ok_or_else(|| ConfigError::UnknownControl(name.to_string()))?;
        let value = if value.is_finite() {
            spec.clamp(value)
        } else {
            warn!("Ignoring non-finite value for {}", name);
            return Ok(ConfigChange::Physics);
        };
        debug!("{} = {}", name, value);

        if name == "particle_count" {
            let count = value.round() as u32;
            let changed = count != self.particle_count;
            self.particle_count = count;
            return Ok(if changed {
                ConfigChange::Reinitialize
            } else {
                ConfigChange::Physics
            });
        }

        let mut changed = false;
        if let Some(field) = self.scalar_mut(name) {
            changed = *field != value;
            *field = value;
        }
        Ok(match name {
            "particle_size" if changed => ConfigChange::Reinitialize,
            "brightness" => ConfigChange::Colors,
            "bloom_strength" | "bloom_radius" | "bloom_threshold" => ConfigChange::Bloom,
            _ => ConfigChange::Physics,
        })
    }

    /// Select a color theme.
    pub fn set_theme(&mut self, theme: ColorTheme) -> ConfigChange {
        debug!("color_theme = {}", theme.name());
        self.color_theme = theme;
        ConfigChange::Theme
    }

    /// Select a color theme by name.
    pub fn set_theme_by_name(&mut self, name: &str) -> Result<ConfigChange, ConfigError> {
        let theme =
            ColorTheme::from_name(name).ok_or_else(|| ConfigError::UnknownTheme(name.to_string()))?;
        Ok(self.set_theme(theme))
    }

    /// Return a copy with every numeric field inside its control range.
    ///
    /// Non-finite values fall back to the default.
    pub fn sanitized(mut self) -> Self {
        let defaults = SimulationConfig::default();
        for spec in CONTROLS {
            if spec.name == "particle_count" {
                let count = (self.particle_count as f32).clamp(spec.min, spec.max) as u32;
                if count != self.particle_count {
                    warn!("particle_count {} clamped to {}", self.particle_count, count);
                    self.particle_count = count;
                }
                continue;
            }
            let fallback = defaults.scalar(spec.name).copied().unwrap_or(spec.min);
            if let Some(field) = self.scalar_mut(spec.name) {
                let original = *field;
                let value = if original.is_finite() {
                    spec.clamp(original)
                } else {
                    fallback
                };
                if value != original {
                    warn!("{} {} clamped to {}", spec.name, original, value);
                    *field = value;
                }
            }
        }
        self
    }

    fn scalar(&self, name: &str) -> Option<&f32> {
        Some(match name {
            "particle_size" => &self.particle_size,
            "repulsion_strength" => &self.repulsion_strength,
            "repulsion_radius" => &self.repulsion_radius,
            "mouse_influence" => &self.mouse_influence,
            "damping" => &self.damping,
            "random_movement" => &self.random_movement,
            "max_speed" => &self.max_speed,
            "float_strength" => &self.float_strength,
            "float_speed" => &self.float_speed,
            "float_scale" => &self.float_scale,
            "center_repel_strength" => &self.center_repel_strength,
            "distribution_factor" => &self.distribution_factor,
            "brightness" => &self.brightness,
            "bloom_strength" => &self.bloom_strength,
            "bloom_radius" => &self.bloom_radius,
            "bloom_threshold" => &self.bloom_threshold,
            "boundary_radius" => &self.boundary_radius,
            "boundary_strength" => &self.boundary_strength,
            "bounce_amount" => &self.bounce_amount,
            _ => return None,
        })
    }

    fn scalar_mut(&mut self, name: &str) -> Option<&mut f32> {
        Some(match name {
            "particle_size" => &mut self.particle_size,
            "repulsion_strength" => &mut self.repulsion_strength,
            "repulsion_radius" => &mut self.repulsion_radius,
            "mouse_influence" => &mut self.mouse_influence,
            "damping" => &mut self.damping,
            "random_movement" => &mut self.random_movement,
            "max_speed" => &mut self.max_speed,
            "float_strength" => &mut self.float_strength,
            "float_speed" => &mut self.float_speed,
            "float_scale" => &mut self.float_scale,
            "center_repel_strength" => &mut self.center_repel_strength,
            "distribution_factor" => &mut self.distribution_factor,
            "brightness" => &mut self.brightness,
            "bloom_strength" => &mut self.bloom_strength,
            "bloom_radius" => &mut self.bloom_radius,
            "bloom_threshold" => &mut self.bloom_threshold,
            "boundary_radius" => &mut self.boundary_radius,
            "boundary_strength" => &mut self.boundary_strength,
            "bounce_amount" => &mut self.bounce_amount,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_in_range() {
        let config = SimulationConfig::default();
        assert_eq!(config.clone().sanitized(), config);
    }

    #[test]
    fn test_every_control_is_addressable() {
        let config = SimulationConfig::default();
        for spec in CONTROLS {
            assert!(config.value(spec.name).is_some(), "{}", spec.name);
            assert!(spec.min < spec.max);
            assert!(spec.step > 0.0);
        }
    }

    #[test]
    fn test_set_control_clamps() {
        let mut config = SimulationConfig::default();
        let change = config.set_control("repulsion_radius", 100.0).unwrap();
        assert_eq!(change, ConfigChange::Physics);
        assert_eq!(config.repulsion_radius, 5.0);
    }

    #[test]
    fn test_set_control_reports_change_kind() {
        let mut config = SimulationConfig::default();
        assert_eq!(config.set_control("brightness", 1.0).unwrap(), ConfigChange::Colors);
        assert_eq!(config.set_control("bloom_radius", 0.5).unwrap(), ConfigChange::Bloom);
        assert_eq!(
            config.set_control("particle_count", 2000.0).unwrap(),
            ConfigChange::Reinitialize
        );
        assert_eq!(config.particle_count, 2000);
        assert_eq!(
            config.set_control("particle_count", 2000.0).unwrap(),
            ConfigChange::Physics
        );
    }

    #[test]
    fn test_particle_size_change_reinitializes() {
        let mut config = SimulationConfig::default();
        assert_eq!(
            config.set_control("particle_size", 0.2).unwrap(),
            ConfigChange::Reinitialize
        );
        assert_eq!(config.particle_size, 0.2);
        assert_eq!(config.set_control("particle_size", 0.2).unwrap(), ConfigChange::Physics);
    }

    #[test]
    fn test_set_control_unknown() {
        let mut config = SimulationConfig::default();
        assert!(matches!(
            config.set_control("gravity", 1.0),
            Err(ConfigError::UnknownControl(_))
        ));
    }

    #[test]
    fn test_set_control_ignores_nan() {
        let mut config = SimulationConfig::default();
        config.set_control("max_speed", f32::NAN).unwrap();
        assert_eq!(config.max_speed, 0.1);
    }

    #[test]
    fn test_sanitized_rejects_invalid_values() {
        let config = SimulationConfig {
            particle_count: 0,
            boundary_radius: -3.0,
            max_speed: f32::INFINITY,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.particle_count, 1);
        assert_eq!(config.boundary_radius, 1.0);
        assert_eq!(config.max_speed, 0.1);
    }

    #[test]
    fn test_theme_by_name() {
        let mut config = SimulationConfig::default();
        assert_eq!(config.set_theme_by_name("cosmic").unwrap(), ConfigChange::Theme);
        assert_eq!(config.color_theme, ColorTheme::Cosmic);
        assert!(config.set_theme_by_name("sepia").is_err());
    }

    #[test]
    fn test_json_partial_and_sanitized() {
        let json = r#"{ "color_theme": "emerald", "repulsion_strength": 7.0 }"#;
        let config = SimulationConfig::from_json(json).unwrap();
        assert_eq!(config.color_theme, ColorTheme::Emerald);
        assert_eq!(config.repulsion_strength, 1.0);
        assert_eq!(config.boundary_radius, 10.0);
    }

    #[test]
    fn test_json_roundtrip_file() {
        let file = format!("swarmfield-config-{}.json", std::process::id());
        let path = std::env::temp_dir().join(file);
        let config = SimulationConfig {
            particle_count: 4321,
            color_theme: ColorTheme::Monochrome,
            ..Default::default()
        };
        config.save(&path).unwrap();
        let loaded = SimulationConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
