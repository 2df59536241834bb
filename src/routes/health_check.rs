use crate::startup::AppState;
use axum::{extract::State, http};
use uuid::Uuid;

#[tracing::instrument(
    name = "Health check",
    skip(state),
    fields(request_id = %Uuid::new_v4())
)]
pub async fn health_check(State(state): State<AppState>) -> http::StatusCode {
    match state.store.ping().await {
        Ok(()) => http::StatusCode::OK,
        Err(error) => {
            tracing::error!(%error, "Location store did not answer ping");
            http::StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
