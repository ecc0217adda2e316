use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::feed::{OemHeader, OemMetadata};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    pub state_vectors: usize,
}

#[utoipa::path(
    get,
    path = "/header",
    responses(
        (status = 200, description = "Message header", body = OemHeader),
        (status = 503, description = "No dataset loaded", body = ErrorResponse)
    ),
    tag = "dataset"
)]
pub async fn header(State(state): State<AppState>) -> ApiResult<Json<OemHeader>> {
    Ok(Json(state.tracker.header()?))
}

#[utoipa::path(
    get,
    path = "/metadata",
    responses(
        (status = 200, description = "Segment metadata", body = OemMetadata),
        (status = 503, description = "No dataset loaded", body = ErrorResponse)
    ),
    tag = "dataset"
)]
pub async fn metadata(State(state): State<AppState>) -> ApiResult<Json<OemMetadata>> {
    Ok(Json(state.tracker.metadata()?))
}

#[utoipa::path(
    get,
    path = "/comment",
    responses(
        (status = 200, description = "Free-text comments of the data block", body = Vec<String>),
        (status = 503, description = "No dataset loaded", body = ErrorResponse)
    ),
    tag = "dataset"
)]
pub async fn comments(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.tracker.comments()?))
}

#[utoipa::path(
    post,
    path = "/refresh",
    responses(
        (status = 200, description = "New dataset published", body = RefreshResponse),
        (status = 502, description = "Feed unreachable or malformed; previous dataset kept", body = ErrorResponse)
    ),
    tag = "dataset"
)]
pub async fn refresh(State(state): State<AppState>) -> ApiResult<Json<RefreshResponse>> {
    let state_vectors = state.tracker.refresh().await?;
    Ok(Json(RefreshResponse { state_vectors }))
}

#[utoipa::path(
    delete,
    path = "/data",
    responses(
        (status = 204, description = "Dataset cleared")
    ),
    tag = "dataset"
)]
pub async fn clear(State(state): State<AppState>) -> StatusCode {
    state.tracker.clear();
    StatusCode::NO_CONTENT
}
