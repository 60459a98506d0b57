//! Logs in, records a short synthetic flight, and reads its telemetry back.
//!
//! Run with:
//! `BRINK_USERNAME=alice BRINK_PASSWORD=secret cargo run --example flight_log`
//!
//! Set `BRINK_BASE_URL` to point at a non-production deployment.

use brink::{Client, Error, FlightDataPoint};
use std::time::{SystemTime, UNIX_EPOCH};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("brink=debug,flight_log=info")
        .init();

    let username = std::env::var("BRINK_USERNAME")?;
    let password = std::env::var("BRINK_PASSWORD")?;

    let mut builder = Client::builder();
    if let Ok(base_url) = std::env::var("BRINK_BASE_URL") {
        builder = builder.base_url(base_url)?;
    }
    let client = builder.build()?;

    println!("=== Login ===");
    let user = client.login(&username, &password).await?;
    println!("Logged in as {} (id {})", user.user_name, user.user_id);
    println!();

    println!("=== Record a flight ===");
    let flight_id = client.create_flight().await?;
    let start = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs_f64();

    for step in 0..5u32 {
        let step = f64::from(step);
        let point = FlightDataPoint {
            timestamp: start + step,
            coordinate_x: 51.5 + step * 0.001,
            coordinate_y: -0.12 + step * 0.001,
            pressure: 1013.2 - step * 1.2,
            temperature: 18.5 - step * 0.1,
            altitude: 100.0 + step * 10.0,
        };
        client.create_flight_data_record(flight_id, &point).await?;
    }
    println!("Uploaded 5 points to flight {flight_id}");
    println!();

    println!("=== Read it back ===");
    match client.get_flight(flight_id).await {
        Ok(flight) => println!(
            "Flight {flight_id}: duration {}s, max altitude {}",
            flight.duration, flight.max_altitude
        ),
        Err(Error::MalformedResponse { reason, raw_response }) => {
            println!("Summary not ready: {reason}");
            println!("  Raw response: {raw_response}");
        }
        Err(e) => return Err(e.into()),
    }

    let points = client.get_flight_data(flight_id, 1, 100).await?;
    for point in &points {
        println!(
            "  t={:.0} alt={} temp={}",
            point.timestamp, point.altitude, point.temperature
        );
    }

    Ok(())
}
