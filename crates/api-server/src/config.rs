//! Server configuration
//!
//! Values come from built-in defaults, then an optional dotenv-style env
//! file, then the process environment. Later sources win.

use std::collections::HashMap;
use std::env::VarError;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "app.env";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not load config file {path:?}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Where tasks are stored
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Storage {
    #[default]
    Memory,
    File(PathBuf),
}

impl Storage {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File(_) => "file",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server_address: SocketAddr,
    pub request_timeout: Duration,
    pub graceful_shutdown_timeout: Duration,
    pub storage: Storage,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: SocketAddr::from(([0, 0, 0, 0], 8085)),
            request_timeout: Duration::from_secs(15),
            graceful_shutdown_timeout: Duration::from_secs(30),
            storage: Storage::Memory,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from `path` (if it exists) and the environment
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut values = if path.exists() {
            read_env_file(path)?
        } else {
            HashMap::new()
        };

        for key in KEYS {
            if let Some(value) = env_override(key, std::env::var(key))? {
                values.insert(key.to_string(), value);
            }
        }

        Self::from_values(&values)
    }

    /// Build a config from already collected key/value pairs
    pub fn from_values(values: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = values.get("SERVER_ADDRESS") {
            config.server_address = value
                .parse()
                .map_err(|_| invalid("SERVER_ADDRESS", value))?;
        }
        if let Some(value) = values.get("SERVER_REQUEST_TIMEOUT") {
            config.request_timeout =
                parse_duration(value).ok_or_else(|| invalid("SERVER_REQUEST_TIMEOUT", value))?;
        }
        if let Some(value) = values.get("GRACEFUL_SHUTDOWN_TIMEOUT") {
            config.graceful_shutdown_timeout = parse_duration(value)
                .ok_or_else(|| invalid("GRACEFUL_SHUTDOWN_TIMEOUT", value))?;
        }
        if let Some(value) = values.get("TODO_DATA_FILE") {
            let value = value.trim();
            if !value.is_empty() {
                config.storage = Storage::File(PathBuf::from(value));
            }
        }
        if let Some(value) = values.get("LOG_FORMAT") {
            config.log_format = match value.trim().to_ascii_lowercase().as_str() {
                "text" | "" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => return Err(invalid("LOG_FORMAT", value)),
            };
        }

        Ok(config)
    }
}

const KEYS: &[&str] = &[
    "SERVER_ADDRESS",
    "SERVER_REQUEST_TIMEOUT",
    "GRACEFUL_SHUTDOWN_TIMEOUT",
    "TODO_DATA_FILE",
    "LOG_FORMAT",
];

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let to_error = |source| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    };
    dotenvy::from_path_iter(path)
        .map_err(to_error)?
        .collect::<Result<HashMap<_, _>, _>>()
        .map_err(to_error)
}

/// Turn one environment lookup into an override, if the variable is set
fn env_override(
    key: &str,
    lookup: Result<String, VarError>,
) -> Result<Option<String>, ConfigError> {
    match lookup {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => Err(invalid(key, &raw.to_string_lossy())),
    }
}

/// Parse durations like `500ms`, `15s`, `2m` or `1h`
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split = raw.find(|c: char| !c.is_ascii_digit())?;
    let (number, unit) = raw.split_at(split);
    let number: u64 = number.parse().ok()?;
    match unit {
        "ms" => Some(Duration::from_millis(number)),
        "s" => Some(Duration::from_secs(number)),
        "m" => Some(Duration::from_secs(number.checked_mul(60)?)),
        "h" => Some(Duration::from_secs(number.checked_mul(3600)?)),
        _ => None,
    }
}
