//! File-backed settings for the status fetcher
//!
//! Settings are stored as TOML. Every field is optional in the file and
//! falls back to the values the monit WAP client shipped with.

use std::path::Path;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::params::{
    ConnectionParams, DEFAULT_PATH, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::document::ParseOptions;
use crate::error::{ConfigError, ConfigResult};

/// Status fetcher settings (`monitview.toml`)
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSettings {
    /// Host running the monit HTTP interface
    #[serde(default = "default_host")]
    pub host: String,
    /// Port of the monit HTTP interface
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request path of the XML report
    #[serde(default = "default_path")]
    pub path: String,
    /// Basic auth user name
    #[serde(default = "default_username")]
    pub username: String,
    /// Basic auth password; empty when supplied at request time instead
    #[serde(default, skip_serializing)]
    pub password: String,
    /// Socket timeout in seconds (at least 1)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// `User-Agent` header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Number of outermost element levels omitted from tree keys
    #[serde(default = "default_starting_level")]
    pub starting_level: usize,
    /// Upper-case element and attribute names before building keys
    #[serde(default = "default_true")]
    pub case_folding: bool,
}

fn default_host() -> String {
    "localhost".to_string()
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}

fn default_username() -> String {
    "admin".to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

const fn default_starting_level() -> usize {
    1
}

const fn default_true() -> bool {
    true
}

impl Default for StatusSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            path: default_path(),
            username: default_username(),
            password: String::new(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            starting_level: default_starting_level(),
            case_folding: true,
        }
    }
}

impl std::fmt::Debug for StatusSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("path", &self.path)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("starting_level", &self.starting_level)
            .field("case_folding", &self.case_folding)
            .finish()
    }
}

impl StatusSettings {
    /// Parses settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the TOML is invalid.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Returns the timeout clamped to at least one second
    #[must_use]
    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Builds validated [`ConnectionParams`] from these settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the host, port, path, or user
    /// agent is invalid.
    pub fn to_params(&self) -> ConfigResult<ConnectionParams> {
        ConnectionParams::new(self.host.clone(), self.port)?
            .with_path(self.path.clone())?
            .with_credentials(
                self.username.clone(),
                SecretString::from(self.password.clone()),
            )
            .with_timeout(self.effective_timeout())?
            .with_user_agent(self.user_agent.clone())
    }

    /// Parse options carried by these settings
    #[must_use]
    pub const fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            starting_level: self.starting_level,
            case_folding: self.case_folding,
        }
    }
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] if the file cannot be read and
/// [`ConfigError::Parse`] if its content is invalid.
pub fn load_settings(path: &Path) -> ConfigResult<StatusSettings> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = StatusSettings::from_toml_str(&content)?;
    tracing::debug!(path = %path.display(), host = %settings.host, "Loaded status settings");
    Ok(settings)
}
