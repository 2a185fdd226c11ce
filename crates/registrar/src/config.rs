/// Service configuration
use crate::report::DEFAULT_TIMESTAMP_FORMAT;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the path of the JSON config file.
pub const CONFIG_ENV_VAR: &str = "REGISTRAR_CONFIG";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub address: String,
    pub port: u16,
    /// Printed in every report header
    pub organization_name: String,
    /// strftime format for report timestamps
    pub timestamp_format: String,
    /// One of "trace", "debug", "info", "warn", "error"
    pub log_level: String,
    pub session_ttl_secs: u64,
    pub report_ttl_secs: u64,
    /// Replaces the built-in report template when set
    pub template_path: Option<PathBuf>,
    /// Shared secret the sign-in front end must send to open a session
    #[serde(skip_serializing)]
    pub session_secret: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
            organization_name: "Office of the University Registrar".to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            log_level: "info".to_string(),
            session_ttl_secs: 8 * 60 * 60,
            report_ttl_secs: 30 * 60,
            template_path: None,
            session_secret: None,
        }
    }
}

impl ServiceConfig {
    /// Loads the configuration from a JSON file. Missing keys take defaults.
    ///
    /// # Arguments
    /// * `path` - Path to the JSON config file
    ///
    /// # Returns
    /// * `Ok(ServiceConfig)` - Loaded and validated configuration
    /// * `Err(ConfigError)` - If the file can't be read, parsed or validated
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ServiceConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads from the file named by `REGISTRAR_CONFIG`, or returns defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load_from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Checks values that would otherwise fail at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Invalid {
                field: "timestamp_format",
                message: format!("{:?} is not a valid strftime format", self.timestamp_format),
            });
        }

        self.log_level()?;

        if self.session_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "session_ttl_secs",
                message: "must be greater than zero".to_string(),
            });
        }

        if matches!(&self.session_secret, Some(secret) if secret.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "session_secret",
                message: "must not be blank when set".to_string(),
            });
        }

        if self.report_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "report_ttl_secs",
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Parses `log_level` into a tracing level.
    pub fn log_level(&self) -> Result<tracing::Level, ConfigError> {
        self.log_level
            .parse::<tracing::Level>()
            .map_err(|e| ConfigError::Invalid {
                field: "log_level",
                message: e.to_string(),
            })
    }

    /// Reads the report template, falling back to the built-in one.
    pub fn load_template(&self) -> Result<String, ConfigError> {
        match &self.template_path {
            Some(path) => fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            }),
            None => Ok(crate::report::GRADE_CHANGE_TEMPLATE.to_string()),
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn report_ttl(&self) -> Duration {
        Duration::from_secs(self.report_ttl_secs)
    }

    /// `address:port` for binding the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}
