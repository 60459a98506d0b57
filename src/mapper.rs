//! Response mapping.
//!
//! Decoders that turn a [`RawResponse`] into a typed result. Single entities
//! are decoded all-or-nothing. Lists of telemetry are decoded leniently:
//! elements that do not decode are dropped and the rest of the page is kept.
//!
//! Transport and build errors never reach these functions; the pipeline
//! returns them to the caller before any decoding happens.

use crate::{Error, RawResponse, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Reason reported when the response body is not a JSON object.
pub const EMPTY_RESPONSE: &str = "empty response";

/// Reason reported when a required field is missing or has the wrong type.
pub const MISSING_FIELDS: &str = "some needed fields not present in the response";

/// Reason reported when a list response lacks its array.
pub const WRONG_FORMAT: &str = "response is not in the correct format";

/// Decodes a response object into `T`, requiring every field `T` needs.
///
/// Unknown fields are ignored.
///
/// # Errors
///
/// Returns [`Error::MalformedResponse`] if the body is not an object or if any
/// required field is absent or mistyped.
///
/// # Examples
///
/// ```
/// use brink::{mapper, Error, RawResponse, User};
/// use http::StatusCode;
/// use std::time::Duration;
///
/// let body = serde_json::json!({"username": "alice", "id": 7});
/// let raw = RawResponse::new(body.clone(), body.to_string(), StatusCode::OK, Duration::ZERO);
///
/// let result = mapper::entity::<User>(raw);
/// assert!(matches!(result, Err(Error::MalformedResponse { .. })));
/// ```
pub fn entity<T>(raw: RawResponse) -> Result<T>
where
    T: DeserializeOwned,
{
    let RawResponse {
        value, raw_body, ..
    } = raw;

    if !value.is_object() {
        return Err(malformed(EMPTY_RESPONSE.to_string(), raw_body));
    }

    serde_json::from_value(value)
        .map_err(|e| malformed(format!("{MISSING_FIELDS}: {e}"), raw_body))
}

/// Decodes the array stored under `field` into a list of `T`.
///
/// Elements that fail to decode are skipped.
///
/// # Errors
///
/// Returns [`Error::MalformedResponse`] if the body is not an object or if
/// `field` is not an array. A present array never fails, even when every
/// element is skipped.
pub fn lenient_list<T>(raw: RawResponse, field: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    let RawResponse {
        value, raw_body, ..
    } = raw;

    let Value::Object(mut object) = value else {
        return Err(malformed(EMPTY_RESPONSE.to_string(), raw_body));
    };

    let Some(Value::Array(items)) = object.remove(field) else {
        return Err(malformed(format!("{WRONG_FORMAT}: missing array `{field}`"), raw_body));
    };

    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::debug!(index, error = %e, "Skipping element that failed to decode");
                None
            }
        })
        .collect();

    if decoded.len() < total {
        tracing::warn!(
            total,
            kept = decoded.len(),
            "Dropped list elements that failed to decode"
        );
    }

    Ok(decoded)
}

/// Accepts any JSON response, for operations whose result carries no data.
pub fn acknowledge(_raw: RawResponse) -> Result<()> {
    Ok(())
}

fn malformed(reason: String, raw_response: String) -> Error {
    tracing::error!(reason = %reason, raw_response = %raw_response, "Malformed response");
    Error::MalformedResponse {
        reason,
        raw_response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FlightDataPoint, User};
    use http::StatusCode;
    use serde_json::json;
    use std::time::Duration;

    fn raw(value: Value) -> RawResponse {
        let body = value.to_string();
        RawResponse::new(value, body, StatusCode::OK, Duration::ZERO)
    }

    fn user_json() -> Value {
        json!({
            "email": "a@x.com",
            "username": "alice",
            "first_name": "A",
            "last_name": "L",
            "id": 7
        })
    }

    fn point_json(timestamp: f64) -> Value {
        json!({
            "timestamp": timestamp,
            "coordinateX": 1.0,
            "coordinateY": 2.0,
            "pressure": 1000.0,
            "temperature": 20.0,
            "altitude": 150.0
        })
    }

    #[test]
    fn test_entity_decodes_complete_object() {
        let user: User = entity(raw(user_json())).unwrap();
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.first_name, "A");
        assert_eq!(user.last_name, "L");
    }

    #[test]
    fn test_entity_missing_field() {
        let mut value = user_json();
        value.as_object_mut().unwrap().remove("email");

        match entity::<User>(raw(value)) {
            Err(Error::MalformedResponse {
                reason,
                raw_response,
            }) => {
                assert!(reason.starts_with(MISSING_FIELDS));
                assert!(raw_response.contains("alice"));
            }
            other => panic!("Expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_entity_wrong_type() {
        let mut value = user_json();
        value["id"] = json!("seven");

        assert!(matches!(
            entity::<User>(raw(value)),
            Err(Error::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_entity_non_object() {
        for value in [Value::Null, json!([user_json()]), json!("text")] {
            match entity::<User>(raw(value)) {
                Err(Error::MalformedResponse { reason, .. }) => {
                    assert_eq!(reason, EMPTY_RESPONSE)
                }
                other => panic!("Expected MalformedResponse, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_lenient_list_skips_bad_elements() {
        let mut broken = point_json(2.0);
        broken.as_object_mut().unwrap().remove("pressure");

        let value = json!({ "data": [point_json(1.0), broken, "junk", point_json(3.0)] });
        let points: Vec<FlightDataPoint> = lenient_list(raw(value), "data").unwrap();

        let timestamps: Vec<f64> = points.iter().map(|p| p.timestamp).collect();
        assert_eq!(timestamps, vec![1.0, 3.0]);
    }

    #[test]
    fn test_lenient_list_keeps_empty_page() {
        let points: Vec<FlightDataPoint> =
            lenient_list(raw(json!({ "data": [] })), "data").unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_lenient_list_requires_array() {
        for value in [json!({}), json!({ "data": { "timestamp": 1.0 } })] {
            match lenient_list::<FlightDataPoint>(raw(value), "data") {
                Err(Error::MalformedResponse { reason, .. }) => {
                    assert!(reason.starts_with(WRONG_FORMAT))
                }
                other => panic!("Expected MalformedResponse, got {:?}", other),
            }
        }

        assert!(matches!(
            lenient_list::<FlightDataPoint>(raw(Value::Null), "data"),
            Err(Error::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_acknowledge_accepts_anything() {
        assert!(acknowledge(raw(Value::Null)).is_ok());
        assert!(acknowledge(raw(json!({ "status": "ok" }))).is_ok());
    }
}
