//! The untyped response handed from the transport to the response mapper.

use http::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// A successful HTTP response whose body parsed as JSON.
///
/// No schema validation has happened yet; that is the job of the
/// [`mapper`](crate::mapper) functions.
///
/// # Examples
///
/// ```
/// use brink::RawResponse;
/// use http::StatusCode;
/// use std::time::Duration;
///
/// let raw = RawResponse::new(
///     serde_json::json!({"id": 3}),
///     r#"{"id": 3}"#.to_string(),
///     StatusCode::OK,
///     Duration::from_millis(12),
/// );
///
/// assert_eq!(raw.value["id"], 3);
/// ```
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The decoded JSON body.
    pub value: Value,

    /// The body exactly as received.
    ///
    /// Kept so that decode failures can report what the server actually sent.
    pub raw_body: String,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// Time from sending the request until the body was read.
    pub latency: Duration,
}

impl RawResponse {
    /// Creates a new `RawResponse`.
    pub fn new(value: Value, raw_body: String, status: StatusCode, latency: Duration) -> Self {
        Self {
            value,
            raw_body,
            status,
            latency,
        }
    }
}
