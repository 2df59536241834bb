use crate::{
    error::{ApiError, Error, Message},
    startup::AppState,
};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

const UPDATE_DONE: &str = "Update Done";
const UPDATE_FAILED: &str = "Driver couldn't be updated";

#[derive(Deserialize, Debug)]
pub struct UpdateStatusQuery {
    #[serde(default)]
    userid: String,
    #[serde(default)]
    status: String,
}

/// The status is stored as sent; only location updates restrict it to the known codes.
pub async fn update_driver_status(
    State(state): State<AppState>,
    query: Result<Query<UpdateStatusQuery>, QueryRejection>,
) -> Result<Json<Message>, ApiError> {
    let Query(query) =
        query.map_err(|rejection| Error::from(rejection).with_message(UPDATE_FAILED))?;
    set_driver_status(&state, query).await
}

#[tracing::instrument(
    name = "Updating driver status",
    skip(state, query),
    fields(driver_id = %query.userid, status = %query.status)
)]
async fn set_driver_status(
    state: &AppState,
    query: UpdateStatusQuery,
) -> Result<Json<Message>, ApiError> {
    let summary = state
        .store
        .update_status(&query.userid, &query.status)
        .await
        .map_err(|e| Error::from(e).with_message(UPDATE_FAILED))?;
    tracing::info!(matched = summary.matched, modified = summary.modified, "Driver status updated");

    Ok(Json(Message::new(UPDATE_DONE)))
}
