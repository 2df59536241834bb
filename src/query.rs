use crate::domain::{LocationUpdate, POINT};
use mongodb::{
    bson::{doc, Document},
    options::UpdateOptions,
};

/// Document field holding the driver id. One document exists per value.
pub const DRIVER_ID_FIELD: &str = "userID";

/// The filter, update and options passed to a single `update_one` call.
#[derive(Debug, Clone)]
pub struct UpdateQuery {
    pub filter: Document,
    pub update: Document,
    pub options: Option<UpdateOptions>,
}

/// Filter matching the document of one driver.
pub fn driver_lookup(driver_id: &str) -> Document {
    doc! { DRIVER_ID_FIELD: driver_id }
}

/// Upserts the driver's document. The geometry type is only written when the document is
/// created; later updates replace the status and coordinates.
pub fn driver_location_update(update: &LocationUpdate) -> UpdateQuery {
    let coordinates = update.coordinates;
    UpdateQuery {
        filter: driver_lookup(&update.driver_id),
        update: doc! {
            "$set": {
                "status": update.status.code(),
                "location.coordinates": [coordinates.longitude, coordinates.latitude],
            },
            "$setOnInsert": {
                "location.type": POINT,
            },
        },
        options: Some(UpdateOptions::builder().upsert(true).build()),
    }
}

/// Replaces the status of an existing driver. Matches nothing when the driver is unknown.
pub fn driver_status_update(driver_id: &str, status: &str) -> UpdateQuery {
    UpdateQuery {
        filter: driver_lookup(driver_id),
        update: doc! { "$set": { "status": status } },
        options: None,
    }
}
