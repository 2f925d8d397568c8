//! Application configuration in `notekeep.toml`.
//!
//! ```toml
//! [storage]
//! db_path = "/home/me/.local/share/notekeep/notekeep.sqlite3"
//!
//! [logging]
//! level = "info"
//! dir = "/home/me/.local/share/notekeep/logs"
//!
//! [auth]
//! backend = "hosted"          # or "local"
//!
//! [auth.hosted]
//! base_url = "https://project.example.co"
//! api_key = "public-anon-key"
//! users_table = "users"
//! ```
//!
//! Every section is optional; a missing file is the default configuration
//! (local accounts, storage under the platform data directory).

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "notekeep";
const DB_FILE_NAME: &str = "notekeep.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config file: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file holding the storage area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Absolute directory for rolling log files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Which account backend the app talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthBackendKind {
    #[default]
    Local,
    Hosted,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub backend: AuthBackendKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosted: Option<HostedAuthConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HostedAuthConfig {
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_users_table")]
    pub users_table: String,
}

fn default_users_table() -> String {
    "users".to_string()
}

impl AppConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "notekeep.toml"
    }

    /// Default config location under the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(Self::filename()))
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Reads `path`; a missing file yields the default configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.backend == AuthBackendKind::Hosted {
            let hosted = self.auth.hosted.as_ref().ok_or_else(|| {
                ConfigError::Invalid("auth.backend = \"hosted\" requires [auth.hosted]".to_string())
            })?;
            if hosted.base_url.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "auth.hosted.base_url cannot be empty".to_string(),
                ));
            }
            if hosted.users_table.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "auth.hosted.users_table cannot be empty".to_string(),
                ));
            }
        }
        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logging.dir must be absolute, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Resolved database path.
    pub fn db_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.db_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(DB_FILE_NAME)),
        }
    }

    /// Resolved log directory.
    pub fn log_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.logging.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(data_dir()?.join("logs")),
        }
    }

    /// Configured level, or the build-mode default.
    pub fn log_level(&self) -> &str {
        self.logging
            .level
            .as_deref()
            .unwrap_or(default_log_level())
    }
}

fn data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| ConfigError::Invalid("no platform data directory available".to_string()))
}
