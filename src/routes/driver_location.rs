use crate::{
    domain::{Coordinates, LocationUpdate, ValidationError},
    error::{ApiError, Error, Message},
    startup::AppState,
};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

const UPDATE_DONE: &str = "Update Done";
const WRONG_FIELDS: &str = "Wrong fields, Update Failed";
const UPDATE_FAILED: &str = "Update Failed";
const NOT_FOUND: &str = "Driver couldn't be found";

/// Query of `PUT /updateDriverLoc`. Absent parameters are read as empty strings so that they
/// fail validation. A query string that cannot be decoded at all (e.g. a repeated parameter) is
/// refused like any other invalid update.
#[derive(Deserialize, Debug)]
pub struct UpdateLocationQuery {
    #[serde(default)]
    userid: String,
    #[serde(default)]
    lat: String,
    #[serde(default)]
    lon: String,
    #[serde(default)]
    status: String,
}

#[derive(Deserialize, Debug)]
pub struct DriverQuery {
    #[serde(default)]
    userid: String,
}

pub async fn update_driver_loc(
    State(state): State<AppState>,
    query: Result<Query<UpdateLocationQuery>, QueryRejection>,
) -> Result<Json<Message>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        Error::from(ValidationError::MalformedQuery(rejection.body_text()))
            .with_message(WRONG_FIELDS)
    })?;
    upsert_driver_location(&state, query).await
}

#[tracing::instrument(
    name = "Updating driver location",
    skip(state, query),
    fields(driver_id = %query.userid, status = %query.status)
)]
async fn upsert_driver_location(
    state: &AppState,
    query: UpdateLocationQuery,
) -> Result<Json<Message>, ApiError> {
    let update = LocationUpdate::parse(&query.userid, &query.lat, &query.lon, &query.status)
        .map_err(|e| Error::from(e).with_message(WRONG_FIELDS))?;

    let summary = state
        .store
        .upsert_location(&update)
        .await
        .map_err(|e| Error::from(e).with_message(UPDATE_FAILED))?;
    tracing::info!(
        matched = summary.matched,
        modified = summary.modified,
        upserted = summary.upserted,
        "Driver location updated"
    );

    Ok(Json(Message::new(UPDATE_DONE)))
}

pub async fn get_driver_loc(
    State(state): State<AppState>,
    query: Result<Query<DriverQuery>, QueryRejection>,
) -> Result<Json<Coordinates>, ApiError> {
    let Query(query) = query.map_err(|rejection| Error::from(rejection).with_message(NOT_FOUND))?;
    find_driver_location(&state, query).await
}

#[tracing::instrument(
    name = "Fetching driver location",
    skip(state, query),
    fields(driver_id = %query.userid)
)]
async fn find_driver_location(
    state: &AppState,
    query: DriverQuery,
) -> Result<Json<Coordinates>, ApiError> {
    let record = state
        .store
        .find_location(&query.userid)
        .await
        .map_err(|e| Error::from(e).with_message(NOT_FOUND))?
        .ok_or_else(|| Error::DriverNotFound(query.userid.clone()).with_message(NOT_FOUND))?;

    let coordinates = record
        .location
        .coordinates()
        .ok_or_else(|| Error::MalformedRecord(query.userid.clone()).with_message(NOT_FOUND))?;

    Ok(Json(coordinates))
}
