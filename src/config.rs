//! Binding behavior knobs, loaded from the host as JSON.
//!
//! Every field is optional on the wire; missing fields take the defaults in
//! [`crate::consts`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{BINDING_GAP, BINDING_PROXIMITY_PX};

/// Invalid binding configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid binding config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("binding config field `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Tuning for proximity detection, endpoint placement, and highlighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// When false, dragging an endpoint never suggests a binding.
    pub binding_enabled: bool,
    /// Scene-unit gap between a shape's outline and a bound endpoint.
    pub gap: f64,
    /// Binding proximity in screen pixels. Divided by zoom at use.
    pub proximity_px: f64,
    /// `#rgb`/`#rrggbb` override for the theme's highlight color.
    pub highlight_color: Option<String>,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            binding_enabled: true,
            gap: BINDING_GAP,
            proximity_px: BINDING_PROXIMITY_PX,
            highlight_color: None,
        }
    }
}

impl BindingConfig {
    /// Parse and validate a JSON config object.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::OutOfRange`] when `gap` is negative or non-finite, or
    /// `proximity_px` is not a positive finite number.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check numeric fields.
    ///
    /// # Errors
    ///
    /// See [`BindingConfig::from_json`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(ConfigError::OutOfRange { field: "gap", value: self.gap });
        }
        if !self.proximity_px.is_finite() || self.proximity_px <= 0.0 {
            return Err(ConfigError::OutOfRange { field: "proximity_px", value: self.proximity_px });
        }
        Ok(())
    }
}
