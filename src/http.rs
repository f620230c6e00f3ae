//! Shared HTTP plumbing for the external data sources

use crate::error::{PipelineError, Result};
use crate::telemetry::{record_latency, LatencyMetric};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

/// Build a client with the given request timeout
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("btc-forecast/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Send a request once and decode a JSON body into `T`
///
/// Transport errors, non-2xx statuses and bodies that do not match the
/// schema all map to `DataUnavailable` for `source_name`.
pub async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    source_name: &'static str,
    metric: LatencyMetric,
) -> Result<T> {
    let started = Instant::now();
    let result = send_and_decode(request, source_name).await;
    record_latency(metric, started.elapsed());
    result
}

async fn send_and_decode<T: DeserializeOwned>(
    request: RequestBuilder,
    source_name: &'static str,
) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| {
            PipelineError::unavailable(source_name, format!("request failed: {}", e.without_url()))
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(source = source_name, %status, "Non-success response");
        return Err(PipelineError::unavailable(
            source_name,
            format!("HTTP {status}: {}", truncate(&body, 200)),
        ));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| {
            PipelineError::unavailable(source_name, format!("reading body: {}", e.without_url()))
        })?;

    serde_json::from_slice(&bytes)
        .map_err(|e| PipelineError::unavailable(source_name, format!("unexpected response: {e}")))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
