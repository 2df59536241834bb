use super::{LocationStore, StoreError, UpdateSummary};
use crate::{
    config::DatabaseSettings,
    domain::{DriverLocationRecord, LocationUpdate},
    query::{self, UpdateQuery},
};
use async_trait::async_trait;
use mongodb::{
    bson::{doc, Bson},
    options::ClientOptions,
    Client, Collection,
};

const APP_NAME: &str = "waypoint";

/// Driver locations kept in a MongoDB collection.
///
/// The client owns a connection pool bounded by the configured sizes and is shared by every
/// request; cloning the store clones a handle to the same pool.
#[derive(Clone, Debug)]
pub struct MongoStore {
    client: Client,
    collection: Collection<DriverLocationRecord>,
}

impl MongoStore {
    /// Builds the pooled client. No connection is opened until the first operation.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(&settings.uri).await?;
        options.app_name = Some(APP_NAME.to_string());
        options.min_pool_size = Some(settings.min_pool_size);
        options.max_pool_size = Some(settings.max_pool_size);

        let client = Client::with_options(options)?;
        let collection = client.database(&settings.name).collection(&settings.collection);
        tracing::info!(
            database = %settings.name,
            collection = %settings.collection,
            min_pool_size = settings.min_pool_size,
            max_pool_size = settings.max_pool_size,
            "Configured MongoDB location store"
        );
        Ok(Self { client, collection })
    }

    async fn update_one(&self, query: UpdateQuery) -> Result<UpdateSummary, StoreError> {
        let result = self.collection.update_one(query.filter, query.update, query.options).await?;
        Ok(summarize(result.matched_count, result.modified_count, result.upserted_id.as_ref()))
    }
}

fn summarize(matched: u64, modified: u64, upserted_id: Option<&Bson>) -> UpdateSummary {
    UpdateSummary { matched, modified, upserted: upserted_id.is_some() }
}

#[async_trait]
impl LocationStore for MongoStore {
    async fn upsert_location(&self, update: &LocationUpdate) -> Result<UpdateSummary, StoreError> {
        self.update_one(query::driver_location_update(update)).await
    }

    async fn update_status(
        &self,
        driver_id: &str,
        status: &str,
    ) -> Result<UpdateSummary, StoreError> {
        self.update_one(query::driver_status_update(driver_id, status)).await
    }

    async fn find_location(
        &self,
        driver_id: &str,
    ) -> Result<Option<DriverLocationRecord>, StoreError> {
        Ok(self.collection.find_one(query::driver_lookup(driver_id), None).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client.database("admin").run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;
    use mongodb::bson::{from_document, oid::ObjectId};

    #[test]
    fn summary_reports_upserts() {
        let id = Bson::ObjectId(ObjectId::new());

        assert_eq!(
            summarize(0, 0, Some(&id)),
            UpdateSummary { matched: 0, modified: 0, upserted: true }
        );
        assert_eq!(
            summarize(1, 1, None),
            UpdateSummary { matched: 1, modified: 1, upserted: false }
        );
        assert_eq!(summarize(0, 0, None), UpdateSummary::default());
    }

    #[test]
    fn stored_document_decodes_into_record() {
        // Whole-degree coordinates come back from the server as integers.
        let stored = doc! {
            "_id": ObjectId::new(),
            "userID": "driver-9",
            "status": "F",
            "location": { "type": "Point", "coordinates": [77, 12] },
        };

        let record: DriverLocationRecord = from_document(stored).unwrap();

        assert_eq!(record.driver_id, "driver-9");
        assert_eq!(record.status, "F");
        assert_eq!(record.location.kind.as_deref(), Some("Point"));
        assert_eq!(
            record.location.coordinates(),
            Some(Coordinates { latitude: 12.0, longitude: 77.0 })
        );
    }

    #[test]
    fn stored_document_with_mixed_number_types_decodes() {
        let stored = doc! {
            "_id": ObjectId::new(),
            "userID": "driver-9",
            "status": "B",
            "location": { "coordinates": [-0.1276_f64, 51_i64] },
        };

        let record: DriverLocationRecord = from_document(stored).unwrap();

        assert_eq!(record.location.kind, None);
        assert_eq!(
            record.location.coordinates(),
            Some(Coordinates { latitude: 51.0, longitude: -0.1276 })
        );
    }
}
