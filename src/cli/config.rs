//! TOML configuration file support for the encode command.
//!
//! Instead of passing many CLI flags, users can keep settings in a file:
//!
//! ```toml
//! # numpress.toml
//! [encode]
//! compression = "linear"
//! linear_mass_accuracy = 0.0001
//! error_tolerance = 0.0001
//! zlib = true
//! base64 = true
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use mzpeak_numpress::numpress::NumpressCompression;

/// Root configuration structure for numpress.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Encode-specific settings.
    #[serde(default)]
    pub encode: EncodeConfig,
}

/// Configuration for the encode command.
#[derive(Debug, Default, Deserialize)]
pub struct EncodeConfig {
    /// Numpress scheme (none, linear, pic, slof).
    pub compression: Option<NumpressCompression>,

    /// Fixed point; disables estimation when set.
    pub fixed_point: Option<f64>,

    /// Maximal absolute round-trip error.
    pub error_tolerance: Option<f64>,

    /// Target absolute accuracy for linear encoding.
    pub linear_mass_accuracy: Option<f64>,

    /// zlib-compress after numpress.
    pub zlib: Option<bool>,

    /// Write Base64 text.
    pub base64: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
