//! Connection parameters for a single status fetch

use std::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{ConfigError, ConfigResult};

/// Port the monit HTTP interface listens on by default
pub const DEFAULT_PORT: u16 = 2812;

/// Request path returning the XML status report
pub const DEFAULT_PATH: &str = "/_status?format=xml";

/// Default socket timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// `User-Agent` header sent with every request
pub const DEFAULT_USER_AGENT: &str = "MonitView";

/// Immutable parameters for one fetch-and-parse invocation
#[derive(Clone)]
pub struct ConnectionParams {
    host: String,
    port: u16,
    path: String,
    username: String,
    password: SecretString,
    timeout: Duration,
    user_agent: String,
}

impl ConnectionParams {
    /// Creates parameters for `host:port` with the default path, an
    /// `admin` user with an empty password, and the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the host is empty or contains a
    /// line break, or the port is 0.
    pub fn new(host: impl Into<String>, port: u16) -> ConfigResult<Self> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }
        reject_line_breaks("host", &host)?;
        if port == 0 {
            return Err(ConfigError::Invalid(
                "port must be in the range 1-65535".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            path: DEFAULT_PATH.to_string(),
            username: "admin".to_string(),
            password: SecretString::from(String::new()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Sets the request path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the path does not start with `/`
    /// or contains a line break.
    pub fn with_path(mut self, path: impl Into<String>) -> ConfigResult<Self> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "request path must start with '/': {path:?}"
            )));
        }
        if path.contains(['\r', '\n', ' ']) {
            return Err(ConfigError::Invalid(
                "request path must not contain whitespace".to_string(),
            ));
        }
        self.path = path;
        Ok(self)
    }

    /// Sets the HTTP Basic credentials. They are sent as-is.
    #[must_use]
    pub fn with_credentials(mut self, username: impl Into<String>, password: SecretString) -> Self {
        self.username = username.into();
        self.password = password;
        self
    }

    /// Sets the timeout applied to connect and to every read and write.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero timeout, which the socket
    /// layer would reject.
    pub fn with_timeout(mut self, timeout: Duration) -> ConfigResult<Self> {
        if timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be non-zero".to_string()));
        }
        self.timeout = timeout;
        Ok(self)
    }

    /// Overrides the `User-Agent` header.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the value contains a line break.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> ConfigResult<Self> {
        let user_agent = user_agent.into();
        reject_line_breaks("user agent", &user_agent)?;
        self.user_agent = user_agent;
        Ok(self)
    }

    /// Target host
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Target port
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Request path
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Basic auth user name
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Basic auth password
    #[must_use]
    pub const fn password(&self) -> &SecretString {
        &self.password
    }

    /// Socket timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `User-Agent` header value
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns true when a non-empty password is configured
    #[must_use]
    pub fn has_password(&self) -> bool {
        !self.password.expose_secret().is_empty()
    }
}

/// Header values are written verbatim, so CR/LF would start a new header
fn reject_line_breaks(field: &str, value: &str) -> ConfigResult<()> {
    if value.contains(['\r', '\n']) {
        return Err(ConfigError::Invalid(format!(
            "{field} must not contain line breaks"
        )));
    }
    Ok(())
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("path", &self.path)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
