//! # Configuration
//!
//! Server settings come from three layers, later layers winning:
//!
//! 1. An optional TOML file with a `[server]` table
//! 2. `TRIVIA_*` environment variables
//! 3. CLI flags (applied by the `cli` module)
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! database = "trivia.redb"
//! backend = "redb"          # or "memory"
//! cors_origins = "http://localhost:3000"
//! rate_limit = 100          # requests/second, 0 disables
//! log_format = "text"       # or "json"
//! quiz_seed = 42            # optional, reproducible quiz rounds
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

// =============================================================================
// ENUMS
// =============================================================================

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// redb database file (ACID, persistent).
    #[default]
    Redb,
    /// Volatile in-memory store.
    Memory,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redb" => Ok(Self::Redb),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::InvalidValue(format!(
                "unknown backend '{}' (expected redb or memory)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redb => write!(f, "redb"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidValue(format!(
                "unknown log format '{}' (expected text or json)",
                other
            ))),
        }
    }
}

// =============================================================================
// SERVER CONFIG
// =============================================================================

/// Settings for the server and the CLI commands that open a bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path of the redb database file.
    pub database: PathBuf,
    pub backend: BackendKind,
    /// `*`, a comma-separated origin list, or unset for localhost only.
    pub cors_origins: Option<String>,
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
    pub log_format: LogFormat,
    /// Fixed seed for the quiz RNG. Unset seeds from the OS.
    pub quiz_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: PathBuf::from("trivia.redb"),
            backend: BackendKind::Redb,
            cors_origins: None,
            rate_limit: 100,
            log_format: LogFormat::Text,
            quiz_seed: None,
        }
    }
}

/// On-disk layout of the config file.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    server: ServerConfig,
}

impl ServerConfig {
    /// Parse a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        Ok(file.server)
    }

    /// Load configuration from file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::FileReadError(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Load the file (if any), then apply the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `TRIVIA_*` overrides read through `lookup`.
    pub fn apply_env_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("TRIVIA_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("TRIVIA_PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid TRIVIA_PORT: {}", e)))?;
        }
        if let Some(database) = lookup("TRIVIA_DATABASE") {
            self.database = PathBuf::from(database);
        }
        if let Some(backend) = lookup("TRIVIA_BACKEND") {
            self.backend = backend.parse()?;
        }
        if let Some(origins) = lookup("TRIVIA_CORS_ORIGINS") {
            self.cors_origins = Some(origins);
        }
        if let Some(limit) = lookup("TRIVIA_RATE_LIMIT") {
            self.rate_limit = limit.trim().parse().map_err(|e| {
                ConfigError::InvalidValue(format!("Invalid TRIVIA_RATE_LIMIT: {}", e))
            })?;
        }
        if let Some(format) = lookup("TRIVIA_LOG_FORMAT") {
            self.log_format = format.parse()?;
        }
        if let Some(seed) = lookup("TRIVIA_QUIZ_SEED") {
            self.quiz_seed = Some(seed.trim().parse().map_err(|e| {
                ConfigError::InvalidValue(format!("Invalid TRIVIA_QUIZ_SEED: {}", e))
            })?);
        }
        Ok(())
    }

    /// `host:port` for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// TESTS
// =============================================================================
