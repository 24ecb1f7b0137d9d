//! Async status fetcher over `tokio::net::TcpStream`
//!
//! Same request bytes and header handling as [`super::fetch_status`]; every
//! connect, write, and read is wrapped in `tokio::time::timeout`.

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::ConnectionParams;
use crate::error::{FetchError, FetchResult};
use crate::tracing::field_names;

use super::client::{RawResponse, resolve};
use super::request::{build_request, check_status_line, ends_header_block};

/// Size of a single body read
const READ_CHUNK: usize = 8 * 1024;

/// Awaits `op` with the per-step timeout, mapping both failure kinds
async fn step<T, F>(limit: Duration, stage: &'static str, op: F) -> FetchResult<T>
where
    F: Future<Output = std::io::Result<T>>,
{
    let secs = limit.as_secs();
    match timeout(limit, op).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(FetchError::from_io(e, stage, secs)),
        Err(_) => Err(FetchError::Timeout { secs, stage }),
    }
}

async fn connect(params: &ConnectionParams) -> FetchResult<TcpStream> {
    // Resolution is blocking but fast, as with the blocking fetcher
    let addrs = resolve(params.host(), params.port())?;
    let limit = params.timeout();

    let mut last_error = None;
    for addr in addrs {
        match timeout(limit, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                tracing::debug!(%addr, "Connected to status endpoint");
                return Ok(stream);
            }
            Ok(Err(e)) => {
                tracing::debug!(%addr, error = %e, "Connect attempt failed");
                last_error = Some(FetchError::ConnectFailed {
                    host: params.host().to_string(),
                    port: params.port(),
                    source: e,
                });
            }
            Err(_) => {
                tracing::debug!(%addr, "Connect attempt timed out");
                last_error = Some(FetchError::Timeout {
                    secs: limit.as_secs(),
                    stage: "connecting",
                });
            }
        }
    }

    Err(last_error.unwrap_or_else(|| FetchError::ResolutionFailed {
        host: params.host().to_string(),
        reason: "No addresses found".to_string(),
    }))
}

/// Async counterpart of [`super::fetch_status`].
///
/// # Errors
///
/// Same taxonomy as the blocking fetcher.
pub async fn fetch_status_async(params: &ConnectionParams) -> FetchResult<RawResponse> {
    let limit = params.timeout();
    let stream = connect(params).await?;

    let (reader, mut writer) = stream.into_split();
    let request = build_request(params);
    step(limit, "sending request", writer.write_all(request.as_bytes())).await?;
    step(limit, "sending request", writer.flush()).await?;

    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    let n = step(limit, "reading headers", reader.read_until(b'\n', &mut line)).await?;
    if n == 0 {
        return Err(FetchError::HeaderNotTerminated);
    }
    let status = check_status_line(&line)?;

    loop {
        line.clear();
        step(limit, "reading headers", reader.read_until(b'\n', &mut line)).await?;
        if ends_header_block(&line)? {
            break;
        }
    }

    let mut body = Vec::new();
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        let n = step(limit, "reading body", reader.read(&mut chunk)).await?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    tracing::debug!(
        status,
        { field_names::BODY_LEN } = body.len(),
        "Status report received"
    );
    Ok(RawResponse { status, body })
}
