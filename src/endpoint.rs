//! The endpoint registry.
//!
//! Every remote operation the client knows about is an [`Operation`]. Each one
//! resolves to a static [`Endpoint`] describing where and how to call it.

use http::Method;
use std::fmt;

/// The closed set of operations exposed by the Brink API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Register a new account.
    CreateUser,
    /// Fetch a user by id.
    GetUser,
    /// Exchange credentials for an access token.
    Login,
    /// List the ids of every flight visible to the caller.
    ListFlights,
    /// Fetch a single flight summary.
    GetFlight,
    /// Start a new flight.
    CreateFlight,
    /// Fetch one page of telemetry for a flight.
    GetFlightData,
    /// Append one telemetry point to a flight.
    CreateFlightDataRecord,
}

/// Static description of how an [`Operation`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Path template relative to the versioned base URL. Each `{}` is replaced,
    /// in order, by one path parameter.
    pub template: &'static str,

    /// The HTTP method.
    pub method: Method,

    /// Whether an `Authorization` header must accompany the request.
    pub requires_token: bool,
}

impl Endpoint {
    /// Returns the number of path parameters the template expects.
    pub fn placeholder_count(&self) -> usize {
        self.template.matches("{}").count()
    }
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Operation; 8] = [
        Operation::CreateUser,
        Operation::GetUser,
        Operation::Login,
        Operation::ListFlights,
        Operation::GetFlight,
        Operation::CreateFlight,
        Operation::GetFlightData,
        Operation::CreateFlightDataRecord,
    ];

    /// Looks up the endpoint for this operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use brink::Operation;
    /// use http::Method;
    ///
    /// let endpoint = Operation::GetFlightData.endpoint();
    /// assert_eq!(endpoint.template, "flights/{}/data");
    /// assert_eq!(endpoint.method, Method::POST);
    /// assert!(endpoint.requires_token);
    /// ```
    pub fn endpoint(self) -> Endpoint {
        let (template, method) = match self {
            Operation::CreateUser => ("users", Method::PUT),
            Operation::GetUser => ("users/{}", Method::GET),
            Operation::Login => ("login", Method::POST),
            Operation::ListFlights => ("flights", Method::GET),
            Operation::GetFlight => ("flights/{}", Method::GET),
            Operation::CreateFlight => ("flights", Method::PUT),
            Operation::GetFlightData => ("flights/{}/data", Method::POST),
            Operation::CreateFlightDataRecord => ("flights/{}/data", Method::PUT),
        };

        Endpoint {
            template,
            method,
            requires_token: !matches!(self, Operation::CreateUser | Operation::Login),
        }
    }

    /// Returns the kebab-case name used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Operation::CreateUser => "create-user",
            Operation::GetUser => "get-user",
            Operation::Login => "login",
            Operation::ListFlights => "list-flights",
            Operation::GetFlight => "get-flight",
            Operation::CreateFlight => "create-flight",
            Operation::GetFlightData => "get-flight-data",
            Operation::CreateFlightDataRecord => "create-flight-data-record",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
