use crate::{domain::ValidationError, store::StoreError};
use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Everything that can stop a driver location request from succeeding.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid fields: {0}")]
    Validation(#[from] ValidationError),

    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("query string is malformed: {0}")]
    MalformedQuery(#[from] QueryRejection),

    #[error("driver `{0}` does not exist")]
    DriverNotFound(String),

    #[error("stored location of driver `{0}` has no coordinate pair")]
    MalformedRecord(String),
}

impl Error {
    /// Bad input is the client's fault; every other failure is reported as a server error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Store(_)
            | Error::MalformedQuery(_)
            | Error::DriverNotFound(_)
            | Error::MalformedRecord(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Pairs the error with the message the endpoint shows to clients.
    pub fn with_message(self, message: &'static str) -> ApiError {
        ApiError { error: self, message }
    }
}

/// JSON body of every non-location response: `{"message": "..."}`.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// An [`Error`] on its way out of a handler. The client sees only `message`; the cause is logged.
#[derive(Debug)]
pub struct ApiError {
    error: Error,
    message: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        if status.is_client_error() {
            tracing::warn!(error = %self.error, "Rejected request");
        } else {
            tracing::error!(error = %self.error, "Request failed");
        }
        (status, Json(Message::new(self.message))).into_response()
    }
}
