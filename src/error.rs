//! Error types for Brink API calls.
//!
//! Every failure a call can end in is one of the variants of [`Error`]. Build
//! failures happen before any network I/O, transport failures carry the
//! underlying cause, and decode failures keep the raw response body around for
//! debugging.

use crate::endpoint::Operation;
use http::StatusCode;

/// The error type for every Brink API call.
///
/// # Examples
///
/// ```no_run
/// use brink::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder().build()?;
///
/// match client.get_flight(42).await {
///     Ok(flight) => println!("max altitude: {}", flight.max_altitude),
///     Err(Error::MissingCredentials { operation }) => {
///         eprintln!("log in before calling {operation}");
///     }
///     Err(e) if e.is_decode() => {
///         eprintln!("unexpected response shape: {e}");
///         eprintln!("raw: {:?}", e.raw_response());
///     }
///     Err(e) => eprintln!("request failed: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The operation requires an access token and none is set.
    ///
    /// Raised while building the request; no network request is issued.
    #[error("Access token is needed for {operation}")]
    MissingCredentials {
        /// The operation that was attempted
        operation: Operation,
    },

    /// The URL template could not be resolved into a valid URL.
    #[error("Error constructing URL for {template}: {reason}")]
    UrlConstruction {
        /// The URL template of the endpoint
        template: &'static str,
        /// What went wrong during substitution or parsing
        reason: String,
    },

    /// The request body could not be encoded as JSON.
    #[error("Couldn't create body data: {0}")]
    BodySerialization(String),

    /// A network-level error occurred (DNS, connection refused, TLS, etc.).
    ///
    /// This wraps the underlying `reqwest::Error` untouched.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a non-2xx status code.
    ///
    /// The body of such a response is never decoded.
    #[error("HTTP error {status}: {raw_response}")]
    HttpError {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
    },

    /// The response body is not valid JSON.
    #[error("Couldn't create json object from response (status {status}): {serde_error}")]
    ResponseNotJson {
        /// The raw response body that failed to parse
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// The response is JSON but lacks fields the result type needs, or has
    /// them with the wrong type.
    #[error("{reason}")]
    MalformedResponse {
        /// Human-readable description of the mismatch
        reason: String,
        /// The raw response body
        raw_response: String,
    },

    /// Invalid client configuration was provided.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl Error {
    /// Returns `true` for failures at the network layer or above it in HTTP.
    ///
    /// # Examples
    ///
    /// ```
    /// use brink::Error;
    ///
    /// assert!(Error::Timeout.is_transport());
    /// assert!(!Error::BodySerialization("nope".to_string()).is_transport());
    /// ```
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Timeout | Error::HttpError { .. }
        )
    }

    /// Returns `true` if a response arrived but could not be turned into the
    /// expected result.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Error::ResponseNotJson { .. } | Error::MalformedResponse { .. }
        )
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpError { status, .. } => Some(*status),
            Error::ResponseNotJson { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::HttpError { raw_response, .. } => Some(raw_response),
            Error::ResponseNotJson { raw_response, .. } => Some(raw_response),
            Error::MalformedResponse { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Error::Timeout
        } else {
            Error::Network(error)
        }
    }
}

/// A specialized `Result` type for Brink API calls.
pub type Result<T> = std::result::Result<T, Error>;
