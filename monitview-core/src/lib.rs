//! `MonitView` Core Library
//!
//! Retrieves the XML status report of a monit daemon over HTTP and folds it
//! into a nested key/value tree that a status page can render.
//!
//! # Crate Structure
//!
//! - [`config`] - Connection parameters and TOML settings
//! - [`fetch`] - HTTP/1.0 exchange with the daemon (blocking and async)
//! - [`document`] - Status tree model and streaming XML builder
//! - [`status`] - Event bitmask and monitor-state vocabulary
//! - [`report`] - Typed system and service summaries
//! - [`pipeline`] - Fetch-then-parse refresh
//! - [`tracing`] - Logging setup and span names
//!
//! # Example
//!
//! ```rust,no_run
//! use monitview_core::{ConnectionParams, ParseOptions, refresh};
//! use secrecy::SecretString;
//!
//! let params = ConnectionParams::new("localhost", 2812)?
//!     .with_credentials("admin", SecretString::from("monit".to_string()));
//! let snapshot = refresh(&params, ParseOptions::default())?;
//! for (n, service) in snapshot.document.services() {
//!     println!("{n}: {:?}", service.value(&["NAME"]));
//! }
//! # Ok::<(), monitview_core::StatusError>(())
//! ```

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod config;
pub mod document;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod report;
pub mod status;
pub mod tracing;

pub use config::{
    ConnectionParams, DEFAULT_PATH, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
    StatusSettings, load_settings,
};
pub use document::{
    ParseOptions, StatusDocument, StatusNode, StatusTree, StructureBuilder, parse_status,
    service_key,
};
pub use error::{
    ConfigError, ConfigResult, DocumentError, DocumentResult, FetchError, FetchResult,
    StatusError, StatusResult,
};
pub use fetch::{RawResponse, basic_auth_token, build_request, fetch_status, fetch_status_async};
pub use pipeline::{StatusSnapshot, refresh, refresh_async};
pub use report::{ServiceSummary, StatusReport, SystemSummary, Uptime};
pub use status::{EventFlags, MonitorState};
pub use tracing::{
    TracingConfig, TracingError, TracingLevel, TracingOutput, TracingResult, init_tracing,
    is_tracing_initialized,
};
