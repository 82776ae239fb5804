//! Platform configuration.
//!
//! [`PlatformConfig`] collects every startup setting: where reference tables
//! and model artifacts live, which address the HTTP service binds, and the
//! default response duration used by the resource estimator. It round-trips
//! through JSON and can be overridden from the environment.
//!
//! # Example
//!
//! ```rust
//! use relief_core::config::PlatformConfig;
//!
//! let cfg = PlatformConfig::default();
//! cfg.validate().expect("default config is valid");
//!
//! assert_eq!(cfg.port, 5002);
//! assert_eq!(cfg.default_duration_days, 7);
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::PipelineConfig;

/// Environment variable overriding [`PlatformConfig::host`]
pub const ENV_HOST: &str = "ML_HOST";
/// Environment variable overriding [`PlatformConfig::port`]
pub const ENV_PORT: &str = "ML_PORT";
/// Environment variable overriding [`PlatformConfig::data_dir`]
pub const ENV_DATA_DIR: &str = "RELIEF_DATA_DIR";
/// Environment variable overriding [`PlatformConfig::model_dir`]
pub const ENV_MODEL_DIR: &str = "RELIEF_MODEL_DIR";

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field has an invalid value.
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// Name of the field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// A configuration file could not be read or written.
    #[error("Cannot access config file `{path}`: {source}")]
    FileRead {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file contains malformed JSON.
    #[error("Cannot parse config file `{path}`: {source}")]
    ParseError {
        /// Path that was being parsed.
        path: PathBuf,
        /// Underlying JSON parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A path referenced in the config does not exist.
    #[error("Path `{path}` in config does not exist")]
    PathNotFound {
        /// The missing path.
        path: PathBuf,
    },
}

impl ConfigError {
    /// Construct a [`ConfigError::InvalidValue`].
    pub fn invalid_value<S: Into<String>>(field: &'static str, reason: S) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Startup configuration for the relief platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Directory with `district_population.csv` and
    /// `disaster_impact_factors.csv`. Built-in tables are used when absent.
    pub data_dir: Option<PathBuf>,

    /// Extra city-to-district CSV merged over the active aliases.
    pub alias_file: Option<PathBuf>,

    /// Directory holding the population model artifacts. Default: **models**.
    pub model_dir: PathBuf,

    /// Bind host for the HTTP service. Default: **localhost**.
    pub host: String,

    /// Bind port for the HTTP service. Default: **5002**.
    pub port: u16,

    /// Response duration used when a request does not name one. Default: **7**.
    pub default_duration_days: u32,

    /// Fail startup when the model artifacts cannot be loaded. Default: **false**.
    ///
    /// When `false` the service starts without a model and prediction
    /// requests fail with `ModelUnavailable`.
    pub require_model: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            alias_file: None,
            model_dir: PathBuf::from("models"),
            host: "localhost".to_string(),
            port: 5002,
            default_duration_days: 7,
            require_model: false,
        }
    }
}

impl PlatformConfig {
    /// Load a [`PlatformConfig`] from a JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileRead`] if the file cannot be opened,
    /// [`ConfigError::ParseError`] if the JSON is malformed and
    /// [`ConfigError::InvalidValue`] if a field fails validation.
    pub fn from_json(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: PlatformConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Write this configuration as pretty-printed JSON, creating parent
    /// directories if necessary.
    pub fn to_json(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::FileRead {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::invalid_value("(serialization)", e.to_string()))?;
        std::fs::write(path, json).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    /// Apply `ML_HOST`, `ML_PORT`, `RELIEF_DATA_DIR` and `RELIEF_MODEL_DIR`
    /// from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup. Empty values are ignored.
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get(ENV_HOST) {
            self.host = host.trim().to_string();
        }
        if let Some(port) = get(ENV_PORT) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_value("port", format!("{ENV_PORT}={port} is not a valid port")))?;
        }
        if let Some(dir) = get(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = get(ENV_MODEL_DIR) {
            self.model_dir = PathBuf::from(dir);
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate all fields.
    ///
    /// # Validated invariants
    ///
    /// - `host` is not blank and `port` is non-zero.
    /// - `default_duration_days` is at least 1.
    /// - `data_dir` and `alias_file`, when set, exist on disk.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::invalid_value("host", "must not be empty"));
        }
        if self.port == 0 {
            return Err(ConfigError::invalid_value("port", "must be > 0"));
        }
        if self.default_duration_days == 0 {
            return Err(ConfigError::invalid_value("default_duration_days", "must be >= 1"));
        }
        for path in [&self.data_dir, &self.alias_file].into_iter().flatten() {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
        }
        Ok(())
    }

    /// `host:port` for binding the HTTP service
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pipeline settings derived from this configuration
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig::builder()
            .default_duration_days(self.default_duration_days)
            .build()
    }
}
