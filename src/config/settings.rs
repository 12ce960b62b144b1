//! Pricing settings loading from gestima.toml
//!
//! Shop-wide pricing policy lives in a TOML file next to the binary: the
//! default margin applied to new parts and the subcontractor minimum-price
//! floor. A missing file falls back to defaults so a fresh checkout runs
//! without setup; a malformed file is a hard error.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Shop-wide pricing policy.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct PricingSettings {
    /// Margin applied to new parts, in percent
    pub default_margin_percent: f64,
    /// Minimum price a subcontractor bills per batch (coop floor)
    pub coop_minimum_price: f64,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            default_margin_percent: 15.0,
            coop_minimum_price: 0.0,
        }
    }
}

/// Loads pricing settings from a TOML file.
///
/// # Errors
/// Returns [`Error::Config`] when the file exists but cannot be read or
/// parsed. A missing file yields the defaults.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<PricingSettings> {
    let path = path.as_ref();
    if !path.exists() {
        info!("{} not found, using default pricing settings", path.display());
        return Ok(PricingSettings::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read settings file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })
}

/// Loads pricing settings from the default location (./gestima.toml).
pub fn load_default_settings() -> Result<PricingSettings> {
    load_settings("gestima.toml")
}
