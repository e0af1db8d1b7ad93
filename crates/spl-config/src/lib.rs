// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host-side runtime configuration for the capability-token evaluator.
//!
//! [`SplRuntimeConfig`] carries settings a host administrator controls —
//! the default gas budget handed to callers, a hard *ceiling* no caller
//! may exceed, and a log level — loaded from an optional TOML file, with
//! `SPL_*` environment overrides layered on top. None of this bears on
//! evaluation *semantics*: the language's own `max_gas` default and depth
//! cap are fixed in `spl-core` and are never touched by this crate.
#![deny(unsafe_code)]
#![warn(missing_docs)]

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested configuration file was not found.
    #[error("config file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },

    /// The file could not be parsed as valid TOML.
    #[error("failed to parse config: {reason}")]
    ParseError {
        /// Human-readable parse error detail.
        reason: String,
    },

    /// Semantic validation failed (one or more problems).
    #[error("config validation failed: {reasons:?}")]
    ValidationError {
        /// Individual validation failure messages.
        reasons: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Advisory-level issues that do not prevent operation but deserve attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `default_max_gas` is set above the ceiling; it will be clamped.
    DefaultExceedsCeiling {
        /// The configured default.
        default_max_gas: u32,
        /// The configured ceiling.
        gas_ceiling: u32,
    },
    /// A recommended optional field is missing.
    MissingOptionalField {
        /// Name of the missing field.
        field: String,
        /// Why it matters.
        hint: String,
    },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::DefaultExceedsCeiling {
                default_max_gas,
                gas_ceiling,
            } => write!(
                f,
                "default_max_gas ({default_max_gas}) exceeds gas_ceiling ({gas_ceiling}); callers will be clamped to the ceiling"
            ),
            ConfigWarning::MissingOptionalField { field, hint } => {
                write!(f, "missing optional field '{field}': {hint}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Config type
// ---------------------------------------------------------------------------

/// Runtime configuration for a capability-token host.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct SplRuntimeConfig {
    /// Gas budget handed to `verify_token`/`verify` callers that don't
    /// supply their own `max_gas`.
    #[serde(default = "default_max_gas")]
    pub default_max_gas: u32,

    /// Hard ceiling: no caller-supplied `max_gas` may exceed this value,
    /// regardless of what the policy or host requests.
    #[serde(default = "default_gas_ceiling")]
    pub gas_ceiling: u32,

    /// Log level override (e.g. `"debug"`, `"info"`, `"warn"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

fn default_max_gas() -> u32 {
    spl_core::DEFAULT_MAX_GAS
}

fn default_gas_ceiling() -> u32 {
    1_000_000
}

impl Default for SplRuntimeConfig {
    fn default() -> Self {
        Self {
            default_max_gas: default_max_gas(),
            gas_ceiling: default_gas_ceiling(),
            log_level: Some("info".into()),
        }
    }
}

impl SplRuntimeConfig {
    /// Clamp a caller-requested `max_gas` to this config's ceiling.
    #[must_use]
    pub fn clamp_max_gas(&self, requested: u32) -> u32 {
        requested.min(self.gas_ceiling)
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Recognised log levels.
const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load an [`SplRuntimeConfig`] from an optional TOML file path.
///
/// * If `path` is `Some`, reads and parses the file.
/// * If `path` is `None`, returns [`SplRuntimeConfig::default()`].
///
/// Environment variable overrides are applied on top in both cases.
///
/// # Errors
///
/// Returns [`ConfigError::FileNotFound`] if `path` is `Some` and does not
/// exist, or [`ConfigError::ParseError`] if the file is not valid TOML.
pub fn load_config(path: Option<&Path>) -> Result<SplRuntimeConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = std::fs::read_to_string(p).map_err(|_| ConfigError::FileNotFound {
                path: p.display().to_string(),
            })?;
            parse_toml(&content)?
        }
        None => SplRuntimeConfig::default(),
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Parse a TOML string into an [`SplRuntimeConfig`].
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] if `content` is not valid TOML or
/// does not match the expected shape.
pub fn parse_toml(content: &str) -> Result<SplRuntimeConfig, ConfigError> {
    toml::from_str::<SplRuntimeConfig>(content).map_err(|e| ConfigError::ParseError {
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Env overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides.
///
/// Recognised variables:
/// - `SPL_DEFAULT_MAX_GAS`
/// - `SPL_GAS_CEILING`
/// - `SPL_LOG_LEVEL`
pub fn apply_env_overrides(config: &mut SplRuntimeConfig) {
    if let Ok(val) = std::env::var("SPL_DEFAULT_MAX_GAS") {
        if let Ok(parsed) = val.parse() {
            config.default_max_gas = parsed;
        }
    }
    if let Ok(val) = std::env::var("SPL_GAS_CEILING") {
        if let Ok(parsed) = val.parse() {
            config.gas_ceiling = parsed;
        }
    }
    if let Ok(val) = std::env::var("SPL_LOG_LEVEL") {
        config.log_level = Some(val);
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a parsed configuration, returning advisory warnings.
///
/// An invalid `log_level` or a zero `gas_ceiling` is a hard error; a
/// `default_max_gas` above the ceiling is only a warning, since
/// [`SplRuntimeConfig::clamp_max_gas`] handles it safely at call time.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] if `log_level` is not one of
/// the recognised levels, or if `gas_ceiling` is zero.
pub fn validate_config(config: &SplRuntimeConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<ConfigWarning> = Vec::new();

    if let Some(ref level) = config.log_level {
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(format!("invalid log_level '{level}'"));
        }
    }

    if config.gas_ceiling == 0 {
        errors.push("gas_ceiling must not be zero".into());
    }

    if config.default_max_gas > config.gas_ceiling {
        warnings.push(ConfigWarning::DefaultExceedsCeiling {
            default_max_gas: config.default_max_gas,
            gas_ceiling: config.gas_ceiling,
        });
    }

    if config.log_level.is_none() {
        warnings.push(ConfigWarning::MissingOptionalField {
            field: "log_level".into(),
            hint: "falling back to the process default log level".into(),
        });
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(ConfigError::ValidationError { reasons: errors })
    }
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

/// Merge two configurations. Values in `overlay` take precedence over `base`.
#[must_use]
pub fn merge_configs(base: SplRuntimeConfig, overlay: SplRuntimeConfig) -> SplRuntimeConfig {
    SplRuntimeConfig {
        default_max_gas: overlay.default_max_gas,
        gas_ceiling: overlay.gas_ceiling,
        log_level: overlay.log_level.or(base.log_level),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
