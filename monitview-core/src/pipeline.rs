//! Fetch-then-parse orchestration
//!
//! One refresh is one HTTP exchange followed by one parse. Nothing is cached
//! between calls; a failed refresh yields no partial document.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::Instrument;
use tracing::field::display;

use crate::config::ConnectionParams;
use crate::document::{ParseOptions, StatusDocument, parse_status};
use crate::error::StatusResult;
use crate::fetch::{RawResponse, fetch_status, fetch_status_async};
use crate::report::StatusReport;
use crate::tracing::{field_names, span_names};

/// Result of a successful refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    /// Parsed status document
    pub document: StatusDocument,
    /// When the response was received
    pub fetched_at: DateTime<Utc>,
    /// Wall time of fetch plus parse
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

impl StatusSnapshot {
    /// Typed report built from the document
    #[must_use]
    pub fn report(&self) -> StatusReport {
        StatusReport::from_document(&self.document)
    }
}

/// Fetches and parses one status report.
///
/// # Errors
///
/// Returns [`crate::StatusError::Fetch`] if the daemon cannot be reached or
/// rejects the request, and [`crate::StatusError::Document`] if the body is
/// not a well-formed status document.
pub fn refresh(params: &ConnectionParams, options: ParseOptions) -> StatusResult<StatusSnapshot> {
    let span = tracing::info_span!(
        span_names::STATUS_REFRESH,
        { field_names::HOST } = params.host(),
        { field_names::PORT } = params.port()
    );
    let _guard = span.enter();

    let started = Instant::now();
    let response = tracing::info_span!(span_names::STATUS_FETCH)
        .in_scope(|| fetch_status(params))
        .inspect_err(|e| {
            tracing::warn!({ field_names::ERROR } = display(e), "Status fetch failed");
        })?;

    finish(&response, options, started)
}

/// Async counterpart of [`refresh`].
///
/// # Errors
///
/// Same as [`refresh`].
pub async fn refresh_async(
    params: &ConnectionParams,
    options: ParseOptions,
) -> StatusResult<StatusSnapshot> {
    let span = tracing::info_span!(
        span_names::STATUS_REFRESH,
        { field_names::HOST } = params.host(),
        { field_names::PORT } = params.port()
    );

    async {
        let started = Instant::now();
        let response = fetch_status_async(params)
            .instrument(tracing::info_span!(span_names::STATUS_FETCH))
            .await
            .inspect_err(|e| {
                tracing::warn!({ field_names::ERROR } = display(e), "Status fetch failed");
            })?;

        finish(&response, options, started)
    }
    .instrument(span)
    .await
}

fn finish(
    response: &RawResponse,
    options: ParseOptions,
    started: Instant,
) -> StatusResult<StatusSnapshot> {
    let fetched_at = Utc::now();

    let document = tracing::info_span!(
        span_names::STATUS_PARSE,
        { field_names::BODY_LEN } = response.len()
    )
    .in_scope(|| parse_status(&response.body, options))
    .inspect_err(|e| {
        tracing::warn!({ field_names::ERROR } = display(e), "Status document rejected");
    })?;

    let elapsed = started.elapsed();
    tracing::info!(
        { field_names::SERVICE_COUNT } = document.service_count,
        { field_names::DURATION_MS } = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        "Status refreshed"
    );

    Ok(StatusSnapshot {
        document,
        fetched_at,
        elapsed,
    })
}

mod duration_millis {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }
}
