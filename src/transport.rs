//! Request execution.
//!
//! The [`Transport`] owns the single `reqwest::Client` of a [`Client`](crate::Client)
//! and turns a [`PreparedRequest`] into a [`RawResponse`].

use crate::{request::PreparedRequest, Error, RawResponse, Result};
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Executes prepared requests over a lazily created HTTP client.
///
/// The underlying `reqwest::Client` is built on the first call to
/// [`execute`](Transport::execute). Concurrent first calls race on a
/// single-initialization cell, so exactly one client is ever installed.
#[derive(Debug)]
pub struct Transport {
    http_client: OnceCell<reqwest::Client>,
    timeout: Duration,
}

impl Transport {
    /// Creates a transport that applies `timeout` to every request.
    pub fn new(timeout: Duration) -> Self {
        Self {
            http_client: OnceCell::new(),
            timeout,
        }
    }

    /// Returns `true` once the HTTP client has been created.
    pub fn is_initialized(&self) -> bool {
        self.http_client.initialized()
    }

    async fn http_client(&self) -> Result<&reqwest::Client> {
        self.http_client
            .get_or_try_init(|| async {
                tracing::debug!("Creating HTTP client");
                reqwest::Client::builder().build().map_err(|e| {
                    Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
                })
            })
            .await
    }

    /// Sends `request` and parses the response body as JSON.
    ///
    /// # Errors
    ///
    /// * [`Error::Timeout`] if the request takes longer than the configured timeout
    /// * [`Error::Network`] for any other failure below HTTP
    /// * [`Error::HttpError`] if the server answers with a non-2xx status
    /// * [`Error::ResponseNotJson`] if the body is not valid JSON
    pub async fn execute(&self, request: PreparedRequest) -> Result<RawResponse> {
        let http_client = self.http_client().await?;

        let PreparedRequest {
            operation,
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = http_client
            .request(method, url)
            .headers(headers)
            .timeout(self.timeout);

        if let Some(body) = body {
            builder = builder.body(body);
        }

        let start_time = Instant::now();

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, operation = %operation, "Request failed");
            Error::from(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await?;
        let latency = start_time.elapsed();
        let raw_body = String::from_utf8_lossy(&bytes).into_owned();

        tracing::info!(
            operation = %operation,
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            "Received HTTP response"
        );
        tracing::debug!(response = %raw_body, "Response body");

        if !status.is_success() {
            if status.is_client_error() {
                tracing::error!(
                    status = status.as_u16(),
                    response = %raw_body,
                    "Client error (4xx)"
                );
            } else {
                tracing::warn!(
                    status = status.as_u16(),
                    response = %raw_body,
                    "Server error"
                );
            }

            return Err(Error::HttpError {
                status,
                raw_response: raw_body,
            });
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => Ok(RawResponse::new(value, raw_body, status, latency)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    raw_response = %raw_body,
                    "Response is not JSON"
                );

                Err(Error::ResponseNotJson {
                    raw_response: raw_body,
                    serde_error: e.to_string(),
                    status,
                })
            }
        }
    }
}
