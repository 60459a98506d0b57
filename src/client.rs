//! The Brink API client.
//!
//! The [`Client`] type is the main entry point. Use [`ClientBuilder`] to
//! configure and create one.

use crate::{
    endpoint::Operation,
    mapper,
    model::{CreatedFlight, Flight, FlightDataPoint, FlightIds, Registration, Session, User},
    request,
    transport::{Transport, DEFAULT_TIMEOUT},
    Error, RawResponse, Result,
};
use http::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::json;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use url::Url;

/// Base URL of the production API, including the version prefix.
pub const DEFAULT_BASE_URL: &str = "http://api.joinbrink.com/v1/";

/// An asynchronous client for the Brink API.
///
/// A client is cheap to clone; clones share the access token and the
/// underlying HTTP client. Any number of calls may be in flight at once.
///
/// # Access token
///
/// Operations other than [`create_user`](Client::create_user) and
/// [`login`](Client::login) need an access token. Both of those store the
/// token they receive, and every request built afterwards uses it. Requests
/// built while a login is still in flight see whatever token was set when
/// they were built.
///
/// # Examples
///
/// ```no_run
/// use brink::Client;
///
/// # async fn example() -> Result<(), brink::Error> {
/// let client = Client::builder().build()?;
///
/// let user = client.login("alice", "secret").await?;
/// println!("Logged in as {} {}", user.first_name, user.last_name);
///
/// for flight_id in client.list_flights().await? {
///     let flight = client.get_flight(flight_id).await?;
///     println!("Flight {flight_id}: max altitude {}", flight.max_altitude);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Transport,
    base_url: Url,
    default_headers: HeaderMap,
    access_token: RwLock<Option<String>>,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Returns the access token currently in use, if any.
    pub fn access_token(&self) -> Option<String> {
        self.inner
            .access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_access_token(&self, token: String) {
        *self
            .inner
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Returns the base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Returns `true` once the first request has created the HTTP client.
    pub fn is_connected(&self) -> bool {
        self.inner.transport.is_initialized()
    }

    /// Runs one operation through the request pipeline.
    ///
    /// The request is built from the operation's endpoint, `body` and
    /// `path_params`, executed once, and the JSON response is handed to
    /// `decode`. Build and transport errors are returned unchanged and
    /// `decode` is not called for them.
    ///
    /// # Errors
    ///
    /// Any [`Error`] from building, sending or decoding.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use brink::{mapper, Client, Operation};
    ///
    /// # async fn example() -> Result<(), brink::Error> {
    /// let client = Client::builder().access_token("saved-token").build()?;
    ///
    /// let raw_flight = client
    ///     .execute::<(), _, _>(Operation::GetFlight, None, &["42"], |raw| Ok(raw.value))
    ///     .await?;
    /// println!("{raw_flight}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute<B, T, F>(
        &self,
        operation: Operation,
        body: Option<&B>,
        path_params: &[&str],
        decode: F,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        F: FnOnce(RawResponse) -> Result<T>,
    {
        let token = self.access_token();
        let prepared = request::build(
            &self.inner.base_url,
            &self.inner.default_headers,
            token.as_deref(),
            operation,
            body,
            path_params,
        )?;

        let raw = self.inner.transport.execute(prepared).await?;
        decode(raw)
    }

    /// Registers a new account and stores the issued access token.
    pub async fn create_user(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<Registration> {
        let body = json!({
            "first_name": first_name,
            "last_name": last_name,
            "email": email,
            "username": username,
            "password": password,
        });

        let registration: Registration = self
            .execute(Operation::CreateUser, Some(&body), &[], mapper::entity)
            .await?;

        self.set_access_token(registration.token.clone());
        tracing::info!(user_id = registration.user_id, "Registered new user");

        Ok(registration)
    }

    /// Fetches a user by id.
    pub async fn get_user(&self, user_id: i64) -> Result<User> {
        let user_id = user_id.to_string();
        self.execute::<(), _, _>(Operation::GetUser, None, &[user_id.as_str()], mapper::entity)
            .await
    }

    /// Logs in and stores the issued access token.
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let body = json!({
            "username": username,
            "password": password,
        });

        let session: Session = self
            .execute(Operation::Login, Some(&body), &[], mapper::entity)
            .await?;

        self.set_access_token(session.jwt_token);
        tracing::info!(user_id = session.user.user_id, "Logged in");

        Ok(session.user)
    }

    /// Lists the ids of all flights.
    pub async fn list_flights(&self) -> Result<Vec<i64>> {
        let ids: FlightIds = self
            .execute::<(), _, _>(Operation::ListFlights, None, &[], mapper::entity)
            .await?;
        Ok(ids.flights)
    }

    /// Fetches the summary of one flight.
    pub async fn get_flight(&self, flight_id: i64) -> Result<Flight> {
        let path_param = flight_id.to_string();
        let mut flight: Flight = self
            .execute::<(), _, _>(Operation::GetFlight, None, &[path_param.as_str()], mapper::entity)
            .await?;

        flight.id = flight.id.or(Some(flight_id));
        Ok(flight)
    }

    /// Creates a new flight and returns its id.
    pub async fn create_flight(&self) -> Result<i64> {
        let created: CreatedFlight = self
            .execute::<(), _, _>(Operation::CreateFlight, None, &[], mapper::entity)
            .await?;
        Ok(created.id)
    }

    /// Fetches one page of telemetry for a flight.
    ///
    /// Points the server returns in an unexpected shape are skipped, so a page
    /// may hold fewer than `per_page` points even when more exist.
    pub async fn get_flight_data(
        &self,
        flight_id: i64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<FlightDataPoint>> {
        let flight_id = flight_id.to_string();
        let body = json!({ "page": page, "perPage": per_page });

        self.execute(
            Operation::GetFlightData,
            Some(&body),
            &[flight_id.as_str()],
            |raw| mapper::lenient_list(raw, "data"),
        )
        .await
    }

    /// Uploads one telemetry point for a flight.
    pub async fn create_flight_data_record(
        &self,
        flight_id: i64,
        point: &FlightDataPoint,
    ) -> Result<()> {
        let flight_id = flight_id.to_string();
        let body = point.to_json_map()?;

        self.execute(
            Operation::CreateFlightDataRecord,
            Some(&body),
            &[flight_id.as_str()],
            mapper::acknowledge,
        )
        .await
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use brink::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), brink::Error> {
/// let client = ClientBuilder::new()
///     .base_url("https://staging.joinbrink.com/v1")?
///     .timeout(Duration::from_secs(10))
///     .default_header("User-Agent", "flight-logger/1.0")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    default_headers: HeaderMap,
    timeout: Duration,
    access_token: Option<String>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            default_headers: HeaderMap::new(),
            timeout: DEFAULT_TIMEOUT,
            access_token: None,
        }
    }

    /// Sets the versioned base URL all endpoint paths are resolved against.
    ///
    /// A trailing `/` is added if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or cannot have a path.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(parse_base_url(url.as_ref())?);
        Ok(self)
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the per-request timeout. Defaults to 5 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Starts the client with a previously issued access token.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Builds the configured `Client`.
    ///
    /// No network I/O happens here; the HTTP client is created on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the default base URL cannot be parsed.
    pub fn build(self) -> Result<Client> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => parse_base_url(DEFAULT_BASE_URL)?,
        };

        Ok(Client {
            inner: Arc::new(ClientInner {
                transport: Transport::new(self.timeout),
                base_url,
                default_headers: self.default_headers,
                access_token: RwLock::new(self.access_token),
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_base_url(url: &str) -> Result<Url> {
    let mut parsed = Url::parse(url)
        .map_err(|e| Error::ConfigurationError(format!("Invalid base URL {url:?}: {e}")))?;

    if parsed.cannot_be_a_base() {
        return Err(Error::ConfigurationError(format!(
            "Base URL {url:?} cannot have a path"
        )));
    }

    if !parsed.path().ends_with('/') {
        let path = format!("{}/", parsed.path());
        parsed.set_path(&path);
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let client = Client::builder().build().unwrap();
        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
        assert!(client.access_token().is_none());
        assert!(!client.is_connected());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = Client::builder()
            .base_url("http://localhost:8080/v1")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/v1/");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            Client::builder().base_url("not a url"),
            Err(Error::ConfigurationError(_))
        ));
        assert!(matches!(
            Client::builder().base_url("mailto:pilot@example.com"),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_initial_token_is_shared_by_clones() {
        let client = Client::builder().access_token("saved").build().unwrap();
        let clone = client.clone();

        clone.set_access_token("fresh".to_string());
        assert_eq!(client.access_token().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_invalid_default_header() {
        assert!(matches!(
            Client::builder().default_header("bad header", "x"),
            Err(Error::ConfigurationError(_))
        ));
    }
}
