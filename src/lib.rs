//! # Brink - an async client for the Brink flight telemetry API
//!
//! The Brink service exposes user accounts, flights, and per-flight
//! telemetry over JSON/HTTP. This crate wraps it in a typed, `async` client
//! built on `reqwest`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use brink::{Client, FlightDataPoint};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), brink::Error> {
//!     let client = Client::builder().build()?;
//!
//!     // Logging in stores the access token for later calls
//!     let user = client.login("alice", "secret").await?;
//!     println!("Hello, {}", user.first_name);
//!
//!     let flight_id = client.create_flight().await?;
//!     client
//!         .create_flight_data_record(
//!             flight_id,
//!             &FlightDataPoint {
//!                 timestamp: 1_506_000_000.0,
//!                 coordinate_x: 51.5,
//!                 coordinate_y: -0.12,
//!                 pressure: 1013.2,
//!                 temperature: 18.5,
//!                 altitude: 120.0,
//!             },
//!         )
//!         .await?;
//!
//!     let points = client.get_flight_data(flight_id, 1, 100).await?;
//!     println!("Flight {flight_id} has {} points on page 1", points.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## How a call runs
//!
//! Every operation goes through the same pipeline, once, with no retries:
//!
//! 1. The [`Operation`] is looked up in the endpoint registry.
//! 2. [`request::build`] resolves the URL, adds `Content-Type` and, when
//!    needed, `Authorization: JWT <token>`, and serializes the body. A missing
//!    token fails here, before any network I/O.
//! 3. The [`transport::Transport`] sends the request with a per-request
//!    timeout and parses the body as JSON.
//! 4. A [`mapper`] function decodes the JSON into the typed result.
//!
//! ## Error Handling
//!
//! ```no_run
//! use brink::{Client, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::builder().build()?;
//! match client.get_user(7).await {
//!     Ok(user) => println!("{}", user.email),
//!     Err(Error::MissingCredentials { .. }) => eprintln!("log in first"),
//!     Err(Error::MalformedResponse { reason, raw_response }) => {
//!         eprintln!("{reason}");
//!         eprintln!("  Raw response: {raw_response}");
//!     }
//!     Err(e) if e.is_transport() => eprintln!("network trouble: {e}"),
//!     Err(e) => eprintln!("Other error: {e}"),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
pub mod endpoint;
mod error;
mod finite;
pub mod mapper;
mod model;
pub mod request;
mod response;
pub mod transport;

pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL};
pub use endpoint::{Endpoint, Operation};
pub use error::{Error, Result};
pub use model::{Flight, FlightDataPoint, Registration, User};
pub use response::RawResponse;
