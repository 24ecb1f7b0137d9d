//! Configuration for the status fetcher
//!
//! [`ConnectionParams`] is the validated, immutable input of one fetch.
//! [`StatusSettings`] is its TOML-backed counterpart.

mod params;
mod settings;

pub use params::{
    ConnectionParams, DEFAULT_PATH, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
pub use settings::{StatusSettings, load_settings};
