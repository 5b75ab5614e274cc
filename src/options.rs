//! Decode policies and their TOML configuration.
//!
//! ```toml
//! [decode]
//! sentinel = "lenient"
//! rest = "require-empty"
//!
//! [report]
//! garbage_blocks = false
//! ```

#[cfg(feature = "serde")]
use std::path::Path;

#[cfg(feature = "serde")]
use serde::Deserialize;

#[cfg(feature = "serde")]
use crate::error::{OpusError, Result};

/// What to do when a parameter block runs out of bytes before its END record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SentinelPolicy {
    /// Fail with `MissingSentinel`.
    #[default]
    Require,
    /// Treat exhaustion as an implicit end; leftover bytes become the block's rest.
    Lenient,
}

/// What to do with bytes following the END record of a parameter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RestPolicy {
    /// Keep them as `rest` without interpretation.
    #[default]
    Keep,
    /// Fail with `NonEmptyRest` unless there are none.
    RequireEmpty,
}

/// Options for decoding an OPUS file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecodeOptions {
    pub sentinel: SentinelPolicy,
    pub rest: RestPolicy,
}

/// Options for the text report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReportOptions {
    /// Render sentinel-key parameter blocks after the curated list.
    pub garbage_blocks: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            garbage_blocks: true,
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Config {
    pub decode: DecodeOptions,
    pub report: ReportOptions,
}

#[cfg(feature = "serde")]
impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| OpusError::Config(e.to_string()))
    }

    /// Load a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}
