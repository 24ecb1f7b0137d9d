//! Error types for the status pipeline
//!
//! Each stage has its own error enum. [`StatusError`] wraps all of them for
//! callers that run the whole fetch-and-parse cycle.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while validating or loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A connection parameter is out of range or empty
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The settings file could not be read
    #[error("Failed to read settings file '{path}': {source}")]
    Read {
        /// Path of the settings file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML or has wrong field types
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while retrieving the raw status report
#[derive(Debug, Error)]
pub enum FetchError {
    /// Host name could not be resolved
    #[error("Failed to resolve host '{host}': {reason}")]
    ResolutionFailed {
        /// The host that failed to resolve
        host: String,
        /// The reason for the failure
        reason: String,
    },

    /// No resolved address accepted the connection
    #[error("Failed to connect to {host}:{port}: {source}")]
    ConnectFailed {
        /// Target host
        host: String,
        /// Target port
        port: u16,
        /// Error from the last address tried
        #[source]
        source: std::io::Error,
    },

    /// A connect, write or read did not finish within the configured timeout
    #[error("Timed out after {secs} seconds while {stage}")]
    Timeout {
        /// Configured timeout in seconds
        secs: u64,
        /// What the fetcher was doing
        stage: &'static str,
    },

    /// Transport error after the connection was established
    #[error("I/O error while {stage}: {source}")]
    Io {
        /// What the fetcher was doing
        stage: &'static str,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The peer closed the connection before the blank line ending the headers
    #[error("Connection closed before the end of the response headers")]
    HeaderNotTerminated,

    /// The first response line is not an HTTP status line
    #[error("Malformed HTTP status line: {0:?}")]
    MalformedStatusLine(String),

    /// The daemon answered with a non-success HTTP status
    #[error("HTTP status {code} {reason}")]
    HttpStatus {
        /// Numeric status code
        code: u16,
        /// Reason phrase sent by the daemon
        reason: String,
    },
}

impl FetchError {
    /// Returns true for failures of the transport itself
    /// (resolution, connect, timeout, I/O).
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::ResolutionFailed { .. }
                | Self::ConnectFailed { .. }
                | Self::Timeout { .. }
                | Self::Io { .. }
        )
    }

    /// Returns true when the peer spoke something other than the expected
    /// HTTP exchange.
    #[must_use]
    pub const fn is_protocol_error(&self) -> bool {
        !self.is_connection_error()
    }

    /// Maps an I/O error to [`FetchError::Timeout`] or [`FetchError::Io`].
    pub(crate) fn from_io(err: std::io::Error, stage: &'static str, secs: u64) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                Self::Timeout { secs, stage }
            }
            _ => Self::Io { stage, source: err },
        }
    }
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors raised while folding the XML body into a status tree
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The tokenizer rejected the document
    #[error("XML error at byte {position}: {message}")]
    Syntax {
        /// Byte offset reported by the tokenizer
        position: u64,
        /// Tokenizer message
        message: String,
    },

    /// A closing tag arrived while no element was open
    #[error("Closing tag </{0}> without a matching opening tag")]
    UnmatchedClose(String),

    /// The stream ended while elements were still open
    #[error("Document ended with {depth} unclosed element(s), innermost <{innermost}>")]
    UnclosedElements {
        /// Remaining path depth
        depth: usize,
        /// Name of the innermost open element
        innermost: String,
    },

    /// An entity reference other than the predefined XML entities
    #[error("Unknown entity reference &{0};")]
    UnknownEntity(String),

    /// Text could not be decoded with the document encoding
    #[error("Failed to decode text: {0}")]
    Encoding(String),
}

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Top-level error for a complete fetch-and-parse cycle
#[derive(Debug, Error)]
pub enum StatusError {
    /// Invalid connection parameters
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The status report could not be retrieved
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The status report could not be parsed
    #[error("Malformed status document: {0}")]
    Document(#[from] DocumentError),
}

impl StatusError {
    /// Connection refused, timed out, or dropped
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::Fetch(e) if e.is_connection_error())
    }

    /// Header block never terminated or HTTP status rejected
    #[must_use]
    pub const fn is_protocol_error(&self) -> bool {
        matches!(self, Self::Fetch(e) if e.is_protocol_error())
    }

    /// The body was not a well-formed status document
    #[must_use]
    pub const fn is_document_error(&self) -> bool {
        matches!(self, Self::Document(_))
    }
}

/// Result type for the full pipeline
pub type StatusResult<T> = Result<T, StatusError>;
