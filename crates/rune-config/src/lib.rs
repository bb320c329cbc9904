//! Rune transition configuration
//!
//! Centralized settings for the scene transition engine, loaded from the
//! `[transition]` table of `rune.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RuneConfig {
    /// Scene transition settings
    pub transition: TransitionConfig,
}

/// Scene transition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Whole-scene animation applied to roots without explicit modifiers
    /// (auto, none, fade, push-left, pull-right, cover-up, slide-left, zoom, ...)
    pub default_animation: String,
    /// Container child ordering (auto, source-on-top, destination-on-top)
    pub ordering: String,
    /// Cover the window with a snapshot while scenes are reparented
    pub snapshot_overlay: bool,
    /// Easing used for elements that do not specify one (linear, ease, ease-in, ease-out, ease-in-out)
    pub default_easing: String,
    /// Base duration in milliseconds for elements without an explicit duration
    pub base_duration_ms: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            default_animation: "auto".to_string(),
            ordering: "auto".to_string(),
            snapshot_overlay: true,
            default_easing: "ease".to_string(),
            base_duration_ms: 208.0,
        }
    }
}

impl RuneConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from the default location (rune.toml in the current directory)
    /// or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("rune.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("RUNE_TRANSITION_DEFAULT_ANIMATION") {
            self.transition.default_animation = val;
        }
        if let Ok(val) = std::env::var("RUNE_TRANSITION_ORDERING") {
            self.transition.ordering = val;
        }
        if let Ok(val) = std::env::var("RUNE_TRANSITION_SNAPSHOT_OVERLAY") {
            self.transition.snapshot_overlay = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Ok(val) = std::env::var("RUNE_TRANSITION_DEFAULT_EASING") {
            self.transition.default_easing = val;
        }
        if let Ok(val) = std::env::var("RUNE_TRANSITION_BASE_DURATION_MS") {
            if let Ok(ms) = val.parse::<f32>() {
                self.transition.base_duration_ms = ms;
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from rune.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
