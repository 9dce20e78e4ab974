#![forbid(unsafe_code)]

//! Navigator configuration.
//!
//! Groups the tunable parameters of a [`SheetNavigator`](crate::SheetNavigator)
//! into a single [`NavigatorConfig`] that can be loaded from TOML or JSON at
//! startup (with the `config` feature).
//!
//! # Loading
//!
//! ```toml
//! # sheetnav.toml
//! tab_reset = "immediate"
//! gestures_enabled = true
//!
//! [animation]
//! duration_ms = 300
//! opening_easing = "ease-out"
//! closing_easing = "ease-in"
//!
//! [defaults]
//! background_color = "#101018"
//! target_opacity = 0.8
//! snap_points = ["40%", "100%"]
//! ```
//!
//! ```rust,ignore
//! let config = NavigatorConfig::from_toml_file("sheetnav.toml")?;
//! let config = NavigatorConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! `NavigatorConfig::default()` matches the built-in behavior: 250 ms
//! ease-out transitions, default [`SheetOptions`], next-frame tab resets,
//! gestures on.

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use sheetnav_core::{SheetOptions, SizeSpec};
use sheetnav_widgets::{SheetAnimationConfig, SheetEasing};

use crate::tab::TabResetTiming;

/// Longest accepted transition.
const MAX_DURATION_MS: u64 = 10_000;

// ---------------------------------------------------------------------------
// Top-level NavigatorConfig
// ---------------------------------------------------------------------------

/// Top-level configuration for a sheet navigator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct NavigatorConfig {
    /// Sheet transition timing.
    pub animation: AnimationPolicy,

    /// Options for screens registered without their own.
    pub defaults: SheetOptions,

    /// When tab re-selection resets are evaluated. Default: next frame.
    pub tab_reset: TabResetTiming,

    /// Master switch for user gestures. Default: true.
    pub gestures_enabled: bool,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            animation: AnimationPolicy::default(),
            defaults: SheetOptions::default(),
            tab_reset: TabResetTiming::default(),
            gestures_enabled: true,
        }
    }
}

impl NavigatorConfig {
    /// Parse from a TOML string and validate.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse from a JSON string and validate.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
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

        if self.animation.duration_ms > MAX_DURATION_MS {
            errors.push(format!(
                "animation.duration_ms must be <= {MAX_DURATION_MS}, got {}",
                self.animation.duration_ms
            ));
        }

        let opacity = self.defaults.target_opacity;
        if !(0.0..=1.0).contains(&opacity) {
            errors.push(format!(
                "defaults.target_opacity must be in [0, 1], got {opacity}"
            ));
        }

        if self.defaults.snap_points.is_empty() {
            errors.push("defaults.snap_points must not be empty".into());
        }
        for (i, point) in self.defaults.snap_points.iter().enumerate() {
            if is_zero(*point) {
                errors.push(format!("defaults.snap_points[{i}] must be > 0, got {point}"));
            }
        }
        if is_zero(self.defaults.height) {
            errors.push(format!(
                "defaults.height must be > 0, got {}",
                self.defaults.height
            ));
        }

        errors
    }

    /// `self` if it validates, else every validation error.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Build the widget-level animation config.
    #[must_use]
    pub fn to_animation_config(&self) -> SheetAnimationConfig {
        if !self.animation.enabled {
            return SheetAnimationConfig::none();
        }
        SheetAnimationConfig::new()
            .duration(Duration::from_millis(self.animation.duration_ms))
            .opening_easing(self.animation.opening_easing.into())
            .closing_easing(self.animation.closing_easing.into())
    }
}

fn is_zero(size: SizeSpec) -> bool {
    match size {
        SizeSpec::Cells(cells) => cells == 0,
        SizeSpec::Percent(pct) => pct <= 0.0 || pct.is_nan(),
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Sheet transition parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct AnimationPolicy {
    /// Full open or close duration (ms). Default: 250.
    pub duration_ms: u64,
    /// Default: ease-out.
    pub opening_easing: Easing,
    /// Default: ease-out.
    pub closing_easing: Easing,
    /// When false, every transition completes on the next frame. Default: true.
    pub enabled: bool,
}

impl Default for AnimationPolicy {
    fn default() -> Self {
        Self {
            duration_ms: 250,
            opening_easing: Easing::EaseOut,
            closing_easing: Easing::EaseOut,
            enabled: true,
        }
    }
}

/// Easing curve names accepted in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum Easing {
    Linear,
    #[default]
    EaseOut,
    EaseIn,
    EaseInOut,
}

impl From<Easing> for SheetEasing {
    fn from(easing: Easing) -> Self {
        match easing {
            Easing::Linear => Self::Linear,
            Easing::EaseOut => Self::EaseOut,
            Easing::EaseIn => Self::EaseIn,
            Easing::EaseInOut => Self::EaseInOut,
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a navigator configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
