use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::tracker::TrackerError;

pub enum ApiError {
    Tracker(TrackerError),
    Validation(String),
}

impl From<TrackerError> for ApiError {
    fn from(e: TrackerError) -> Self {
        ApiError::Tracker(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_message("validation_failed", &msg),
            ),
            ApiError::Tracker(e) => {
                let message = e.to_string();
                let (status, error) = match e {
                    TrackerError::EmptyDataset => (StatusCode::SERVICE_UNAVAILABLE, "dataset_empty"),
                    TrackerError::NotFound(_) => (StatusCode::NOT_FOUND, "epoch_not_found"),
                    TrackerError::Fetch(_) => (StatusCode::BAD_GATEWAY, "feed_unavailable"),
                    TrackerError::Parse(_) => (StatusCode::BAD_GATEWAY, "feed_invalid"),
                    TrackerError::GeolocationUnavailable(_) => {
                        (StatusCode::SERVICE_UNAVAILABLE, "geolocation_unavailable")
                    }
                };
                (status, ErrorResponse::with_message(error, &message))
            }
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
