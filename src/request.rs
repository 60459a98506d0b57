//! Request building.
//!
//! Turns an [`Operation`], its path parameters and an optional body into a
//! [`PreparedRequest`] that the transport can send as-is. Nothing here touches
//! the network.

use crate::{
    endpoint::{Endpoint, Operation},
    finite::FiniteCheck,
    Error, Result,
};
use http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderMap, HeaderValue, Method,
};
use serde::Serialize;
use url::Url;

/// Characters that would break out of the path segment a parameter is placed in.
const RESERVED_IN_SEGMENT: &[char] = &['/', '?', '#', '\\'];

/// A fully specified HTTP request, ready to be executed.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// The operation this request was built for.
    pub operation: Operation,

    /// The HTTP method.
    pub method: Method,

    /// The resolved absolute URL.
    pub url: Url,

    /// Request headers, always including `Content-Type`.
    pub headers: HeaderMap,

    /// The JSON-encoded body, if one was supplied.
    pub body: Option<Vec<u8>>,
}

/// Builds the request for `operation`.
///
/// The access token is checked first so that an unauthenticated call fails
/// before anything else is attempted.
///
/// # Errors
///
/// * [`Error::MissingCredentials`] if the endpoint needs a token and `token` is `None`
/// * [`Error::UrlConstruction`] if the template cannot be resolved with `path_params`
/// * [`Error::BodySerialization`] if `body` cannot be encoded as JSON, including
///   when it holds a NaN or infinite number
/// * [`Error::ConfigurationError`] if `token` contains characters that cannot
///   appear in an HTTP header value
pub fn build<B>(
    base_url: &Url,
    default_headers: &HeaderMap,
    token: Option<&str>,
    operation: Operation,
    body: Option<&B>,
    path_params: &[&str],
) -> Result<PreparedRequest>
where
    B: Serialize + ?Sized,
{
    let endpoint = operation.endpoint();

    let mut headers = default_headers.clone();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if endpoint.requires_token {
        let token = token.ok_or(Error::MissingCredentials { operation })?;
        headers.insert(AUTHORIZATION, authorization_value(token)?);
    }

    let url = resolve_url(base_url, &endpoint, path_params)?;

    let body = body.map(encode_body).transpose()?;

    tracing::debug!(
        operation = %operation,
        method = %endpoint.method,
        url = %url,
        headers = ?headers,
        body = %body.as_deref().map(String::from_utf8_lossy).unwrap_or_default(),
        "Built API request"
    );

    Ok(PreparedRequest {
        operation,
        method: endpoint.method,
        url,
        headers,
        body,
    })
}

/// Substitutes each `{}` in the endpoint template with the matching path
/// parameter and joins the result onto `base_url`.
pub(crate) fn resolve_url(base_url: &Url, endpoint: &Endpoint, path_params: &[&str]) -> Result<Url> {
    let url_error = |reason: String| Error::UrlConstruction {
        template: endpoint.template,
        reason,
    };

    let expected = endpoint.placeholder_count();
    if path_params.len() != expected {
        return Err(url_error(format!(
            "expected {expected} path parameters, got {}",
            path_params.len()
        )));
    }

    let mut pieces = endpoint.template.split("{}");
    let mut path = pieces.next().unwrap_or_default().to_string();

    for (param, piece) in path_params.iter().zip(pieces) {
        if param.is_empty() || param.contains(RESERVED_IN_SEGMENT) || is_dot_segment(param) {
            return Err(url_error(format!(
                "path parameter {param:?} does not fit in a path segment"
            )));
        }
        path.push_str(param);
        path.push_str(piece);
    }

    base_url.join(&path).map_err(|e| url_error(e.to_string()))
}

/// `.` and `..` are removed by URL normalization, in plain or percent-encoded form.
fn is_dot_segment(param: &str) -> bool {
    let decoded = param.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

fn encode_body<B>(body: &B) -> Result<Vec<u8>>
where
    B: Serialize + ?Sized,
{
    body.serialize(FiniteCheck)
        .map_err(|e| Error::BodySerialization(e.to_string()))?;
    serde_json::to_vec(body).map_err(|e| Error::BodySerialization(e.to_string()))
}

fn authorization_value(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::try_from(format!("JWT {token}"))
        .map_err(|e| Error::ConfigurationError(format!("Invalid access token: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn base() -> Url {
        Url::parse("http://api.example.com/v1/").unwrap()
    }

    #[test]
    fn test_resolves_templates_in_order() {
        let url = resolve_url(&base(), &Operation::GetFlightData.endpoint(), &["42"]).unwrap();
        assert_eq!(url.as_str(), "http://api.example.com/v1/flights/42/data");

        let url = resolve_url(&base(), &Operation::Login.endpoint(), &[]).unwrap();
        assert_eq!(url.as_str(), "http://api.example.com/v1/login");
    }

    #[test]
    fn test_rejects_parameter_count_mismatch() {
        let result = resolve_url(&base(), &Operation::GetUser.endpoint(), &[]);
        assert!(matches!(
            result,
            Err(Error::UrlConstruction { template: "users/{}", .. })
        ));

        let result = resolve_url(&base(), &Operation::ListFlights.endpoint(), &["1"]);
        assert!(matches!(result, Err(Error::UrlConstruction { .. })));
    }

    #[test]
    fn test_rejects_parameters_that_escape_the_segment() {
        for bad in [
            "", "1/2", "1?x=2", "1#frag", "..\\x", ".", "..", "%2e%2e", "%2E.", ".%2e", "%2e",
        ] {
            let result = resolve_url(&base(), &Operation::GetFlight.endpoint(), &[bad]);
            assert!(
                matches!(result, Err(Error::UrlConstruction { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_missing_token_fails_before_anything_else() {
        let result = build::<()>(
            &base(),
            &HeaderMap::new(),
            None,
            Operation::GetFlight,
            None,
            &["not/valid"],
        );
        assert!(matches!(
            result,
            Err(Error::MissingCredentials {
                operation: Operation::GetFlight
            })
        ));
    }

    #[test]
    fn test_headers_for_authenticated_request() {
        let request = build::<()>(
            &base(),
            &HeaderMap::new(),
            Some("T1"),
            Operation::ListFlights,
            None,
            &[],
        )
        .unwrap();

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
        assert_eq!(request.headers[AUTHORIZATION], "JWT T1");
        assert!(request.headers[AUTHORIZATION].is_sensitive());
        assert!(request.body.is_none());
    }

    #[test]
    fn test_unauthenticated_request_ignores_token() {
        let request = build(
            &base(),
            &HeaderMap::new(),
            Some("T1"),
            Operation::Login,
            Some(&json!({"username": "alice", "password": "pw"})),
            &[],
        )
        .unwrap();

        assert!(request.headers.get(AUTHORIZATION).is_none());
        let body: serde_json::Value = serde_json::from_slice(&request.body.unwrap()).unwrap();
        assert_eq!(body, json!({"username": "alice", "password": "pw"}));
    }

    #[test]
    fn test_default_headers_are_kept() {
        let mut defaults = HeaderMap::new();
        defaults.insert("user-agent", HeaderValue::from_static("brink-test"));

        let request =
            build::<()>(&base(), &defaults, None, Operation::Login, None, &[]).unwrap();
        assert_eq!(request.headers["user-agent"], "brink-test");
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_unserializable_body() {
        let mut body = HashMap::new();
        body.insert((1, 2), "tuple keys are not JSON");

        let result = build(
            &base(),
            &HeaderMap::new(),
            None,
            Operation::CreateUser,
            Some(&body),
            &[],
        );
        assert!(matches!(result, Err(Error::BodySerialization(_))));
    }

    #[test]
    fn test_dots_inside_a_parameter_are_kept() {
        let url = resolve_url(&base(), &Operation::GetFlight.endpoint(), &["1.5"]).unwrap();
        assert_eq!(url.as_str(), "http://api.example.com/v1/flights/1.5");

        let url = resolve_url(&base(), &Operation::GetFlight.endpoint(), &["..."]).unwrap();
        assert_eq!(url.as_str(), "http://api.example.com/v1/flights/...");
    }

    #[derive(Serialize)]
    struct Page {
        page: f64,
        #[serde(rename = "perPage")]
        per_page: Option<f32>,
    }

    #[test]
    fn test_non_finite_numbers_in_body() {
        let bodies = [
            Page { page: f64::NAN, per_page: None },
            Page { page: 1.0, per_page: Some(f32::INFINITY) },
            Page { page: f64::NEG_INFINITY, per_page: Some(2.0) },
        ];

        for body in bodies {
            let result = build(
                &base(),
                &HeaderMap::new(),
                Some("T1"),
                Operation::GetFlightData,
                Some(&body),
                &["1"],
            );
            assert!(
                matches!(result, Err(Error::BodySerialization(_))),
                "got {:?}",
                result
            );
        }

        let nested = json!({ "points": [[1.0, 2.0], { "altitude": 3.5 }] });
        let request = build(
            &base(),
            &HeaderMap::new(),
            Some("T1"),
            Operation::GetFlightData,
            Some(&nested),
            &["1"],
        )
        .unwrap();
        let sent: serde_json::Value = serde_json::from_slice(&request.body.unwrap()).unwrap();
        assert_eq!(sent, nested);
    }

    #[test]
    fn test_token_with_invalid_header_characters() {
        let result = build::<()>(
            &base(),
            &HeaderMap::new(),
            Some("bad\ntoken"),
            Operation::ListFlights,
            None,
            &[],
        );
        assert!(matches!(result, Err(Error::ConfigurationError(_))));
    }
}
