//! Error types for swarmfield.
//!
//! The simulation itself never fails: numeric degeneracy is absorbed where it
//! occurs. Errors only exist at the configuration boundary.

use std::fmt;

/// Errors that can occur while loading, saving or editing a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the configuration file.
    Io(std::io::Error),
    /// The configuration file is not valid JSON for [`crate::SimulationConfig`].
    Json(serde_json::Error),
    /// No control with this name exists.
    UnknownControl(String),
    /// No color theme with this name exists.
    UnknownTheme(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access configuration file: {}", e),
            ConfigError::Json(e) => write!(f, "Invalid configuration JSON: {}", e),
            ConfigError::UnknownControl(name) => write!(f, "Unknown control: {}", name),
            ConfigError::UnknownTheme(name) => write!(
                f,
                "Unknown color theme: {}. Expected one of: {}",
                name,
                crate::ColorTheme::variants().join(", ")
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}
