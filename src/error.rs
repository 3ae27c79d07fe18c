use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

/// Rejected request input. The message names the offending field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("mood required")]
    MissingMood,
    #[error("invalid mood")]
    InvalidMood,
    #[error("invalid hungerLevel")]
    InvalidHungerLevel,
    #[error("invalid preference")]
    InvalidPreference,
    #[error("invalid mealTime")]
    InvalidMealTime,
    #[error("invalid limit")]
    InvalidLimit,
}

/// Catalog access failure. Never retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("malformed catalog record {id}: {reason}")]
    Malformed { id: Uuid, reason: String },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(e) => {
                warn!(error = %e, "rejected request");
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::Store(e) => {
                error!(error = %e, "catalog store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
