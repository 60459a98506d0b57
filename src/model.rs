//! Domain records returned by the Brink API.
//!
//! These are only ever produced by the [`mapper`](crate::mapper) from a
//! decoded response, so every field is always populated.

use crate::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// A Brink account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    /// Contact email address.
    pub email: String,

    /// Login name.
    #[serde(rename = "username")]
    pub user_name: String,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Server-assigned id.
    #[serde(rename = "id")]
    pub user_id: i64,
}

/// The result of a successful account registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Registration {
    /// The access token issued for the new account.
    #[serde(rename = "jwt_token")]
    pub token: String,

    /// Id of the new account.
    pub user_id: i64,
}

/// Login response: the user plus the token issued for them.
#[derive(Debug, Deserialize)]
pub(crate) struct Session {
    #[serde(flatten)]
    pub user: User,
    pub jwt_token: String,
}

/// Summary statistics for a single flight.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    /// Flight id.
    ///
    /// Filled from the requested id when the server leaves it out.
    #[serde(default)]
    pub id: Option<i64>,

    /// Flight start time, as seconds since the Unix epoch.
    #[serde(rename = "flightTime")]
    pub time: f64,

    /// Flight duration in seconds.
    pub duration: f64,

    pub start_coordinate_x: f64,
    pub start_coordinate_y: f64,
    pub end_coordinate_x: f64,
    pub end_coordinate_y: f64,
    pub max_altitude: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FlightIds {
    pub flights: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedFlight {
    pub id: i64,
}

/// One telemetry sample recorded during a flight.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDataPoint {
    /// Sample time, as seconds since the Unix epoch.
    pub timestamp: f64,
    pub coordinate_x: f64,
    pub coordinate_y: f64,
    pub pressure: f64,
    pub temperature: f64,
    pub altitude: f64,
}

impl FlightDataPoint {
    /// Encodes the point as the JSON object the API expects on upload.
    ///
    /// Keys are emitted in sorted order, so the same point always encodes to
    /// the same bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BodySerialization`] if any field is NaN or infinite.
    ///
    /// # Examples
    ///
    /// ```
    /// use brink::FlightDataPoint;
    ///
    /// let point = FlightDataPoint {
    ///     timestamp: 1_506_000_000.0,
    ///     coordinate_x: 51.5,
    ///     coordinate_y: -0.12,
    ///     pressure: 1013.2,
    ///     temperature: 18.5,
    ///     altitude: 120.0,
    /// };
    ///
    /// let map = point.to_json_map().unwrap();
    /// assert_eq!(map["coordinateY"], -0.12);
    ///
    /// let broken = FlightDataPoint { altitude: f64::NAN, ..point };
    /// assert!(broken.to_json_map().is_err());
    /// ```
    pub fn to_json_map(&self) -> Result<Map<String, Value>> {
        let fields = [
            ("altitude", self.altitude),
            ("coordinateX", self.coordinate_x),
            ("coordinateY", self.coordinate_y),
            ("pressure", self.pressure),
            ("temperature", self.temperature),
            ("timestamp", self.timestamp),
        ];

        fields
            .into_iter()
            .map(|(key, value)| {
                let number = Number::from_f64(value).ok_or_else(|| {
                    Error::BodySerialization(format!("{key} is not a finite number: {value}"))
                })?;
                Ok((key.to_string(), Value::Number(number)))
            })
            .collect()
    }
}
