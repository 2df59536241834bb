use crate::domain::{DriverLocationRecord, LocationUpdate};
use async_trait::async_trait;

/// In-process store for local runs and tests.
pub mod memory;

/// Store backed by a MongoDB collection.
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Errors raised by a location store. These are never shown to clients verbatim.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("mongodb: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("{0}")]
    Unavailable(String),
}

/// Outcome of a single update operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateSummary {
    /// Documents matched by the filter.
    pub matched: u64,
    /// Documents whose contents changed.
    pub modified: u64,
    /// Whether a new document was inserted.
    pub upserted: bool,
}

/// Persistence for driver locations. Each method runs exactly one store operation.
#[async_trait]
pub trait LocationStore: Send + Sync + 'static {
    /// Creates the driver's record or overwrites its status and coordinates.
    async fn upsert_location(&self, update: &LocationUpdate) -> Result<UpdateSummary, StoreError>;

    /// Sets the status of an existing driver. An unknown driver matches nothing and is not an
    /// error.
    async fn update_status(&self, driver_id: &str, status: &str)
        -> Result<UpdateSummary, StoreError>;

    async fn find_location(
        &self,
        driver_id: &str,
    ) -> Result<Option<DriverLocationRecord>, StoreError>;

    /// Checks that the backing store answers requests.
    async fn ping(&self) -> Result<(), StoreError>;
}
