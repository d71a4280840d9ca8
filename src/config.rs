//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config PATH`, or `config.toml` in the platform config
//!    directory when present)
//! 3. `DUPESEARCH_*` environment variables (`DUPESEARCH_IO_THREADS=8`)
//! 4. Command-line flags
//!
//! # Example
//!
//! ```toml
//! io_threads = 8
//! chunk_size = 262144
//! refresh_interval_ms = 100
//! save_path = "/home/user/duplicates.json"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::duplicates::FinderConfig;
use crate::scanner::DEFAULT_CHUNK_SIZE;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "DUPESEARCH_";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or has the wrong types.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] Box<figment::Error>),

    /// A value parsed but is out of range.
    #[error("Invalid value for {key}: {message}")]
    Invalid {
        /// Offending key
        key: &'static str,
        /// What is wrong with it
        message: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Threads used for content hashing.
    pub io_threads: usize,
    /// Read chunk size for hashing, in bytes.
    pub chunk_size: usize,
    /// Progress display refresh interval, in milliseconds.
    pub refresh_interval_ms: u64,
    /// Default destination for saved results.
    pub save_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            io_threads: 4,
            chunk_size: DEFAULT_CHUNK_SIZE,
            refresh_interval_ms: 200,
            save_path: None,
        }
    }
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CliOverrides {
    /// `--io-threads`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub io_threads: Option<usize>,
    /// `--chunk-size`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
    /// `--save-path`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_path: Option<PathBuf>,
}

impl Config {
    /// Default platform-specific configuration file.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupesearch", "dupesearch")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Build the layered provider without extracting it.
    #[must_use]
    pub fn figment(file: Option<&Path>, overrides: &CliOverrides) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides))
    }

    /// Load configuration from every layer.
    ///
    /// `explicit` must exist when given; the default file is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit file is missing, a layer
    /// cannot be parsed, or a value is out of range.
    pub fn load(explicit: Option<&Path>, overrides: &CliOverrides) -> Result<Self, ConfigError> {
        let file = match explicit {
            Some(path) if !path.is_file() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path(),
        };

        if let Some(path) = &file {
            log::debug!("Config file: {}", path.display());
        }

        let config: Config = Self::figment(file.as_deref(), overrides)
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the finder cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.io_threads == 0 {
            return Err(ConfigError::Invalid {
                key: "io_threads",
                message: "must be at least 1".to_string(),
            });
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid {
                key: "chunk_size",
                message: "must be at least 1 byte".to_string(),
            });
        }
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "refresh_interval_ms",
                message: "must be at least 1 millisecond".to_string(),
            });
        }
        Ok(())
    }

    /// Progress refresh interval.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// Finder settings derived from this configuration.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_io_threads(self.io_threads)
            .with_chunk_size(self.chunk_size)
    }
}
