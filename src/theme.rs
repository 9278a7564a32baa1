//! Color themes for particle rendering.
//!
//! A theme maps each particle's fixed color scalar (0.0-1.0) to an RGB color.
//! It also carries the background clear color and bloom settings the renderer
//! applies when the theme is selected.
//!
//! ```ignore
//! let base = ColorTheme::Ember.evaluate(0.5, 1.0); // (0.75, 0.35, 0.15)
//! renderer.set_clear_color(ColorTheme::Ember.background());
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Bloom post-process parameters associated with a theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            strength: 1.5,
            radius: 0.7,
            threshold: 0.2,
        }
    }
}

/// Built-in color themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    /// Violet to pale blue on a deep navy background.
    Cosmic,
    /// Warm reds and oranges on a dark red background.
    #[default]
    Ember,
    /// Greens with a teal tint on a dark green background.
    Emerald,
    /// Gray ramp on a near-black background.
    Monochrome,
}

impl ColorTheme {
    /// All themes, in control-panel order.
    pub const ALL: [ColorTheme; 4] = [
        ColorTheme::Cosmic,
        ColorTheme::Ember,
        ColorTheme::Emerald,
        ColorTheme::Monochrome,
    ];

    /// Display names, index-aligned with [`ColorTheme::ALL`].
    pub fn variants() -> &'static [&'static str] {
        &["cosmic", "ember", "emerald", "monochrome"]
    }

    pub fn from_index(idx: usize) -> Self {
        Self::ALL.get(idx).copied().unwrap_or_default()
    }

    pub fn to_index(&self) -> usize {
        match self {
            ColorTheme::Cosmic => 0,
            ColorTheme::Ember => 1,
            ColorTheme::Emerald => 2,
            ColorTheme::Monochrome => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        Self::variants()[self.to_index()]
    }

    /// Look a theme up by its (case-insensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|theme| theme.name().eq_ignore_ascii_case(name))
    }

    /// Map a color scalar to RGB, scaled by `brightness`.
    ///
    /// Channels are in 0.0-1.0 before scaling. The result is not clamped:
    /// brightness above 1.0 may push channels past 1.0.
    pub fn evaluate(&self, value: f32, brightness: f32) -> Vec3 {
        let v = value;
        let rgb = match self {
            ColorTheme::Cosmic => Vec3::new(0.2 + 0.4 * v, 0.2 + 0.2 * (1.0 - v), 0.5 + 0.5 * v),
            ColorTheme::Ember => Vec3::new(0.5 + 0.5 * v, 0.2 + 0.3 * v, 0.1 + 0.1 * v),
            ColorTheme::Emerald => Vec3::new(0.1 + 0.1 * v, 0.5 + 0.5 * v, 0.2 + 0.3 * (1.0 - v)),
            ColorTheme::Monochrome => Vec3::splat(0.3 + 0.7 * v),
        };
        rgb * brightness
    }

    /// Background clear color as a packed `0xRRGGBB` value.
    pub fn background_hex(&self) -> u32 {
        match self {
            ColorTheme::Cosmic => 0x000011,
            ColorTheme::Ember => 0x110000,
            ColorTheme::Emerald => 0x001100,
            ColorTheme::Monochrome => 0x050505,
        }
    }

    /// Background clear color as linear RGB in 0.0-1.0.
    pub fn background(&self) -> Vec3 {
        let hex = self.background_hex();
        Vec3::new(
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
        )
    }

    /// Bloom settings applied when this theme is selected.
    pub fn bloom(&self) -> BloomSettings {
        // Every built-in theme currently shares the same bloom.
        BloomSettings::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rgb(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).abs().max_element() < 1e-5,
            "{:?} != {:?}",
            actual,
            expected
        );
    }

    #[test]
    fn test_ember_midpoint() {
        assert_rgb(ColorTheme::Ember.evaluate(0.5, 1.0), Vec3::new(0.75, 0.35, 0.15));
    }

    #[test]
    fn test_monochrome_midpoint() {
        assert_rgb(ColorTheme::Monochrome.evaluate(0.5, 1.0), Vec3::splat(0.65));
    }

    #[test]
    fn test_cosmic_endpoints() {
        assert_rgb(ColorTheme::Cosmic.evaluate(0.0, 1.0), Vec3::new(0.2, 0.4, 0.5));
        assert_rgb(ColorTheme::Cosmic.evaluate(1.0, 1.0), Vec3::new(0.6, 0.2, 1.0));
    }

    #[test]
    fn test_brightness_is_not_clamped() {
        let c = ColorTheme::Emerald.evaluate(1.0, 2.0);
        assert!((c.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_index_roundtrip() {
        for (i, theme) in ColorTheme::ALL.iter().enumerate() {
            assert_eq!(theme.to_index(), i);
            assert_eq!(ColorTheme::from_index(i), *theme);
        }
        assert_eq!(ColorTheme::from_index(99), ColorTheme::Ember);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(ColorTheme::from_name("Monochrome"), Some(ColorTheme::Monochrome));
        assert_eq!(ColorTheme::from_name("plasma"), None);
    }

    #[test]
    fn test_background() {
        let bg = ColorTheme::Cosmic.background();
        assert_eq!(bg.x, 0.0);
        assert!((bg.z - 17.0 / 255.0).abs() < 1e-6);
    }
}
