//! # Waypoint
//!
//! `waypoint` tracks the latest reported position and status of every driver and serves it back
//! on request. See the repository README for the HTTP interface and configuration.
use std::net::TcpListener;
use waypoint::{config, startup, telemetry};

/// Entrypoint for the application.
#[tokio::main]
async fn main() -> hyper::Result<()> {
    let subscriber = telemetry::get_subscriber("waypoint".into(), "info".into(), std::io::stdout);
    telemetry::init_subscriber(subscriber);

    let configuration = config::get_configuration().expect("Failed to read configuration.");
    let store = startup::build_store(&configuration.database)
        .await
        .expect("Failed to configure location store.");

    let address = configuration.application.address();
    tracing::info!(%address, "Location update handler listening");
    let listener = TcpListener::bind(address).expect("Unable to bind to port");
    startup::run(listener, store)?.await
}
