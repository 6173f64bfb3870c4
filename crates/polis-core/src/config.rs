//! Configuration loading and typed config structures.
//!
//! The service configuration lives in `polis-config.yaml` in the working
//! directory. Every section and field has a default, so a missing file or
//! a partial one is fine.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PolisConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Session coordinator settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Where personas come from.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PolisConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override file values:
    /// - `POLIS_HOST` overrides `server.host`
    /// - `POLIS_PORT` overrides `server.port`
    /// - `POLIS_POPULATION_PATH` overrides `population.path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying env overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `POLIS_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("POLIS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("POLIS_PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
        {
            self.server.port = port;
        }
        if let Ok(path) = std::env::var("POLIS_POPULATION_PATH") {
            self.population.path = PathBuf::from(path);
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Session coordinator settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Maximum personas loaded into a session.
    #[serde(default = "default_max_population")]
    pub max_population: usize,

    /// Seconds before an open ballot is force-closed. `null` disables the
    /// timer.
    #[serde(default = "default_vote_timeout_secs")]
    pub vote_timeout_secs: Option<u64>,

    /// Seconds between automatic monthly steps. `null` leaves stepping to
    /// explicit triggers.
    #[serde(default)]
    pub step_interval_secs: Option<u64>,

    /// Seed for persona assignment and proposer selection. `null` seeds
    /// from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_population: default_max_population(),
            vote_timeout_secs: default_vote_timeout_secs(),
            step_interval_secs: None,
            seed: None,
        }
    }
}

/// Where personas come from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// JSON persona list.
    #[serde(default = "default_population_path")]
    pub path: PathBuf,

    /// Personas generated when the file does not exist.
    #[serde(default = "default_generated_count")]
    pub generated_count: usize,

    /// Seed for generated populations and the engine's own randomness.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            path: default_population_path(),
            generated_count: default_generated_count(),
            seed: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Pretty,
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    5000
}

const fn default_max_population() -> usize {
    200
}

#[allow(clippy::unnecessary_wraps)]
const fn default_vote_timeout_secs() -> Option<u64> {
    Some(30)
}

fn default_population_path() -> PathBuf {
    PathBuf::from("data/population.json")
}

const fn default_generated_count() -> usize {
    200
}

fn default_log_level() -> String {
    String::from("info")
}
