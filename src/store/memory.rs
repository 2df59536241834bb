use super::{LocationStore, StoreError, UpdateSummary};
use crate::domain::{DriverLocationRecord, GeoPoint, LocationUpdate};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

/// Driver locations kept in a map keyed by driver id. Mirrors the upsert and update semantics of
/// [`super::MongoStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, DriverLocationRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored driver records.
    pub fn len(&self) -> usize {
        self.records().map(|records| records.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn records(&self) -> Result<MutexGuard<'_, HashMap<String, DriverLocationRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn upsert_location(&self, update: &LocationUpdate) -> Result<UpdateSummary, StoreError> {
        let mut records = self.records()?;
        let status = update.status.code().to_string();
        let coordinates = GeoPoint::new(update.coordinates).coordinates;

        match records.get_mut(&update.driver_id) {
            Some(record) => {
                let changed = record.status != status || record.location.coordinates != coordinates;
                record.status = status;
                record.location.coordinates = coordinates;
                Ok(UpdateSummary { matched: 1, modified: u64::from(changed), upserted: false })
            }
            None => {
                records.insert(
                    update.driver_id.clone(),
                    DriverLocationRecord {
                        driver_id: update.driver_id.clone(),
                        status,
                        location: GeoPoint::new(update.coordinates),
                    },
                );
                Ok(UpdateSummary { matched: 0, modified: 0, upserted: true })
            }
        }
    }

    async fn update_status(
        &self,
        driver_id: &str,
        status: &str,
    ) -> Result<UpdateSummary, StoreError> {
        let mut records = self.records()?;
        let Some(record) = records.get_mut(driver_id) else {
            return Ok(UpdateSummary::default())
        };
        let changed = record.status != status;
        record.status = status.to_string();
        Ok(UpdateSummary { matched: 1, modified: u64::from(changed), upserted: false })
    }

    async fn find_location(
        &self,
        driver_id: &str,
    ) -> Result<Option<DriverLocationRecord>, StoreError> {
        Ok(self.records()?.get(driver_id).cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.records().map(|_| ())
    }
}
