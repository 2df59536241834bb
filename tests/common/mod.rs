#![allow(dead_code)]

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::{net::TcpListener, sync::Arc};
use waypoint::{
    domain::{DriverLocationRecord, LocationUpdate},
    store::{LocationStore, MemoryStore, StoreError, UpdateSummary},
    telemetry::{get_subscriber, init_subscriber},
};

// Ensure that the `tracing` stack is only initialized once.
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    // We only print logs to the console if the `TEST_LOG` environment variable is set.
    // We cannot assign the output of `get_subscriber` to a variable based on the value `TEST_LOG`
    // because the sink is part of the type returned by `get_subscriber`, therefore they are not the
    // same type.
    if std::env::var("TEST_LOG").is_ok() {
        // To see prettified test logs, install bunyan with `cargo install bunyan` then run tests
        // with `TEST_LOG=true cargo test | bunyan`
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    store: Option<Arc<MemoryStore>>,
}

impl TestApp {
    /// Number of driver records held by the app's in-memory store.
    pub fn stored_drivers(&self) -> usize {
        self.store.as_ref().map(|store| store.len()).expect("app has no in-memory store")
    }

    pub async fn update_location(
        &self,
        userid: &str,
        lat: &str,
        lon: &str,
        status: &str,
    ) -> reqwest::Response {
        self.client
            .put(&format!("{}/updateDriverLoc", self.address))
            .query(&[("userid", userid), ("lat", lat), ("lon", lon), ("status", status)])
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_location(&self, userid: &str) -> reqwest::Response {
        self.client
            .get(&format!("{}/getDriverLoc", self.address))
            .query(&[("userid", userid)])
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn update_status(&self, userid: &str, status: &str) -> reqwest::Response {
        self.client
            .put(&format!("{}/updateDriverStatus", self.address))
            .query(&[("userid", userid), ("status", status)])
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// Store whose every operation fails, standing in for an unreachable database.
pub struct FailingStore;

#[async_trait]
impl LocationStore for FailingStore {
    async fn upsert_location(&self, _: &LocationUpdate) -> Result<UpdateSummary, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn update_status(&self, _: &str, _: &str) -> Result<UpdateSummary, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn find_location(&self, _: &str) -> Result<Option<DriverLocationRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

// Launch our application in the background.
// We are running tests, so it is not worth it to propagate errors: if we fail to perform the
// required setup we can just panic and crash all the things.
fn spawn_with_store(store: Arc<dyn LocationStore>) -> String {
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");

    // We retrieve the port assigned to us by the OS.
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{port}");

    // `tokio::spawn` returns a handle to the spawned future, but we have no use for it here, hence
    // the non-binding `let`.
    let server = waypoint::startup::run(listener, store).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    address
}

pub async fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let address = spawn_with_store(store.clone());
    TestApp { address, client: reqwest::Client::new(), store: Some(store) }
}

pub async fn spawn_app_with_failing_store() -> TestApp {
    let address = spawn_with_store(Arc::new(FailingStore));
    TestApp { address, client: reqwest::Client::new(), store: None }
}
