#![forbid(unsafe_code)]

//! Engine configuration as data.
//!
//! [`EngineConfig`] gathers every tunable of the drag-and-drop engine. With
//! the `config` feature it loads from TOML or JSON:
//!
//! ```toml
//! move_throttle_ms = 16
//! max_session_lifetime_ms = 30000
//!
//! [gesture]
//! drag_threshold = 4.0
//! touch_drag_threshold = 8.0
//!
//! [auto_scroll]
//! edge_fraction = 0.3
//! min_speed = 50.0
//! max_speed = 200.0
//! power = 2.0
//! ```
//!
//! # Defaults
//!
//! `EngineConfig::default()` reproduces the stock board behavior: 30% edge
//! zones scrolling between 50 and 200 px per frame on a quadratic curve, a
//! 4 px mouse threshold, no move throttling, and no session lifetime cap.

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

use taskboard_core::gesture::GestureConfig;

use crate::autoscroll::AutoScrollConfig;

/// All tunables of [`crate::engine::DragDropEngine`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct EngineConfig {
    pub gesture: GestureConfig,
    pub auto_scroll: AutoScrollConfig,
    /// Minimum spacing between processed drag moves; 0 processes every move.
    pub move_throttle_ms: u64,
    /// Force-cancel a drag that has not ended after this long.
    pub max_session_lifetime_ms: Option<u64>,
}

impl EngineConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, value) in [
            ("gesture.drag_threshold", self.gesture.drag_threshold),
            (
                "gesture.touch_drag_threshold",
                self.gesture.touch_drag_threshold,
            ),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{name} must be finite and >= 0, got {value}"));
            }
        }
        if self.gesture.accepted_buttons.is_empty() {
            errors.push("gesture.accepted_buttons must name at least one button".to_string());
        }

        errors.extend(self.auto_scroll.validate());

        if self.max_session_lifetime_ms == Some(0) {
            errors.push("max_session_lifetime_ms must be > 0 when set".to_string());
        }
        errors
    }

    /// Validate, turning any problem into [`ConfigError::Validation`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    #[must_use]
    pub fn move_throttle(&self) -> Duration {
        Duration::from_millis(self.move_throttle_ms)
    }

    #[must_use]
    pub fn max_session_lifetime(&self) -> Option<Duration> {
        self.max_session_lifetime_ms.map(Duration::from_millis)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading or validating an engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
