//! Blocking status fetcher over `std::net::TcpStream`

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use crate::config::ConnectionParams;
use crate::error::{FetchError, FetchResult};
use crate::tracing::field_names;

use super::request::{build_request, check_status_line, ends_header_block};

/// Body of a successful status request, headers already stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code of the response
    pub status: u16,
    /// Bytes received after the header block until the peer closed
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Body length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true if the daemon sent no body
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Resolves `host:port` into socket addresses
pub(crate) fn resolve(host: &str, port: u16) -> FetchResult<Vec<SocketAddr>> {
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|e| FetchError::ResolutionFailed {
            host: host.to_string(),
            reason: e.to_string(),
        })?
        .collect();

    if addrs.is_empty() {
        return Err(FetchError::ResolutionFailed {
            host: host.to_string(),
            reason: "No addresses found".to_string(),
        });
    }
    Ok(addrs)
}

/// Opens a connection, trying each resolved address in turn
fn connect(params: &ConnectionParams) -> FetchResult<TcpStream> {
    let addrs = resolve(params.host(), params.port())?;
    let secs = params.timeout().as_secs();

    let mut last_error = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, params.timeout()) {
            Ok(stream) => {
                tracing::debug!(%addr, "Connected to status endpoint");
                return Ok(stream);
            }
            Err(e) => {
                tracing::debug!(%addr, error = %e, "Connect attempt failed");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if e.kind() == std::io::ErrorKind::TimedOut => Err(FetchError::Timeout {
            secs,
            stage: "connecting",
        }),
        Some(source) => Err(FetchError::ConnectFailed {
            host: params.host().to_string(),
            port: params.port(),
            source,
        }),
        None => Err(FetchError::ResolutionFailed {
            host: params.host().to_string(),
            reason: "No addresses found".to_string(),
        }),
    }
}

/// Reads the status line and discards header lines up to the blank line.
///
/// Returns the HTTP status code.
pub(crate) fn read_head<R: BufRead>(reader: &mut R, secs: u64) -> FetchResult<u16> {
    let mut line = Vec::new();

    let n = reader
        .read_until(b'\n', &mut line)
        .map_err(|e| FetchError::from_io(e, "reading headers", secs))?;
    if n == 0 {
        return Err(FetchError::HeaderNotTerminated);
    }
    let status = check_status_line(&line)?;

    let mut header_lines = 0usize;
    loop {
        line.clear();
        reader
            .read_until(b'\n', &mut line)
            .map_err(|e| FetchError::from_io(e, "reading headers", secs))?;
        if ends_header_block(&line)? {
            break;
        }
        header_lines += 1;
    }

    tracing::trace!(status, header_lines, "Response headers consumed");
    Ok(status)
}

/// Fetches the raw status report described by `params`.
///
/// Sends one HTTP/1.0 request with Basic authentication, discards the
/// response headers, and reads the body until the daemon closes the
/// connection. The timeout applies to connect and to every read and write.
/// The connection is closed when this function returns, on every path.
///
/// # Errors
///
/// * [`FetchError::ResolutionFailed`] / [`FetchError::ConnectFailed`] /
///   [`FetchError::Timeout`] if the daemon cannot be reached
/// * [`FetchError::HeaderNotTerminated`] if the connection closes inside
///   the header block
/// * [`FetchError::HttpStatus`] if the daemon rejects the request
/// * [`FetchError::Timeout`] / [`FetchError::Io`] if the body read fails
pub fn fetch_status(params: &ConnectionParams) -> FetchResult<RawResponse> {
    let secs = params.timeout().as_secs();
    let stream = connect(params)?;

    stream
        .set_read_timeout(Some(params.timeout()))
        .and_then(|()| stream.set_write_timeout(Some(params.timeout())))
        .map_err(|e| FetchError::from_io(e, "configuring socket", secs))?;

    let mut writer = &stream;
    writer
        .write_all(build_request(params).as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| FetchError::from_io(e, "sending request", secs))?;

    let mut reader = BufReader::new(&stream);
    let status = read_head(&mut reader, secs)?;

    let mut body = Vec::new();
    reader
        .read_to_end(&mut body)
        .map_err(|e| FetchError::from_io(e, "reading body", secs))?;

    tracing::debug!(
        status,
        { field_names::BODY_LEN } = body.len(),
        "Status report received"
    );
    Ok(RawResponse { status, body })
}
