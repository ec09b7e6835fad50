//! Layered engine configuration.
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. Optional TOML file
//! 3. `LIGHTNING_` prefixed environment variables, `__` as nesting separator
//!    (e.g. `LIGHTNING_BATCH__PARALLEL_THRESHOLD=512`)
//!
//! # Example
//!
//! ```toml
//! [kernel]
//! force_scalar = false
//!
//! [batch]
//! parallel = true
//! parallel_threshold = 256
//! prefetch = true
//!
//! [logging]
//! level = "info"
//! ```

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::simd_native::Backend;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "LIGHTNING_";

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// A value was read but is out of range.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted key of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Kernel selection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Bind the scalar reference kernels even when SIMD is available.
    pub force_scalar: bool,
}

impl KernelConfig {
    /// Backend implied by these settings.
    #[must_use]
    pub fn backend(&self) -> Backend {
        if self.force_scalar {
            Backend::Scalar
        } else {
            Backend::Auto
        }
    }
}

/// Batch evaluation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Split large batches across the rayon pool.
    pub parallel: bool,
    /// Minimum candidate count for parallel evaluation.
    pub parallel_threshold: usize,
    /// Prefetch upcoming candidates in sequential evaluation.
    pub prefetch: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 256,
            prefetch: true,
        }
    }
}

/// Logging settings for binaries embedding the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` level filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Kernel selection.
    pub kernel: KernelConfig,
    /// Batch evaluation.
    pub batch: BatchConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

impl EngineConfig {
    /// Defaults overlaid with `LIGHTNING_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::figment())
    }

    /// Defaults, then the TOML file at `path`, then environment variables.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::extract(figment)
    }

    /// Parses configuration from a TOML string (no environment overlay).
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let figment =
            Figment::from(Serialized::defaults(Self::default())).merge(Toml::string(toml));
        Self::extract(figment)
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the engine cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch.parallel_threshold == 0 {
            return Err(ConfigError::InvalidValue {
                field: "batch.parallel_threshold",
                reason: "must be at least 1".to_string(),
            });
        }
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level",
                reason: format!(
                    "'{}' is not one of {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }
        Ok(())
    }
}
