//! HTTP/1.0 request construction and response-head parsing
//!
//! Shared by the blocking and the async fetcher so both put identical bytes
//! on the wire and interpret the header block the same way.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use secrecy::ExposeSecret;

use crate::config::ConnectionParams;
use crate::error::{FetchError, FetchResult};

/// Encodes `user:password` for the HTTP Basic scheme. No escaping is applied.
#[must_use]
pub fn basic_auth_token(username: &str, password: &str) -> String {
    STANDARD.encode(format!("{username}:{password}"))
}

/// Builds the complete request, terminated by the blank line.
#[must_use]
pub fn build_request(params: &ConnectionParams) -> String {
    let token = basic_auth_token(params.username(), params.password().expose_secret());
    format!(
        "GET {path} HTTP/1.0\r\n\
         Host: {host}\r\n\
         Connection: Keep-Alive\r\n\
         User-Agent: {agent}\r\n\
         Authorization: Basic {token}\r\n\
         \r\n",
        path = params.path(),
        host = params.host(),
        agent = params.user_agent(),
    )
}

/// Returns true for the empty line that ends the header block.
#[must_use]
pub fn is_header_terminator(line: &[u8]) -> bool {
    line == b"\r\n" || line == b"\n"
}

/// Classifies one line read from the header block.
///
/// `line` is everything one `read_until(b'\n')` returned; empty means EOF.
/// Returns `true` at the blank line that ends the block.
///
/// # Errors
///
/// Returns [`FetchError::HeaderNotTerminated`] at EOF or for a final line
/// cut off without its `\n`.
pub(crate) fn ends_header_block(line: &[u8]) -> FetchResult<bool> {
    if !line.ends_with(b"\n") {
        return Err(FetchError::HeaderNotTerminated);
    }
    Ok(is_header_terminator(line))
}

/// Parses `HTTP/x.y NNN reason` and rejects non-2xx codes.
///
/// # Errors
///
/// Returns [`FetchError::MalformedStatusLine`] for anything that is not a
/// status line and [`FetchError::HttpStatus`] for a non-success code.
pub fn check_status_line(line: &[u8]) -> FetchResult<u16> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim_end_matches(['\r', '\n']);

    let mut parts = text.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    let code = parts.next().unwrap_or_default();
    let reason = parts.next().unwrap_or_default().trim();

    if !version.starts_with("HTTP/") {
        return Err(FetchError::MalformedStatusLine(text.to_string()));
    }
    let code: u16 = code
        .parse()
        .map_err(|_| FetchError::MalformedStatusLine(text.to_string()))?;

    if !(200..300).contains(&code) {
        return Err(FetchError::HttpStatus {
            code,
            reason: reason.to_string(),
        });
    }
    Ok(code)
}
