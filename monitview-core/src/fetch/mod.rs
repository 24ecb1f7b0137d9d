//! Status fetcher
//!
//! Retrieves monit's XML status report with a minimal HTTP/1.0 exchange over
//! plain TCP: one request with Basic authentication, headers discarded, body
//! read until the daemon closes the connection. No retries; callers decide.

mod async_client;
mod client;
mod request;

pub use async_client::fetch_status_async;
pub use client::{RawResponse, fetch_status};
pub use request::{basic_auth_token, build_request, check_status_line, is_header_terminator};
