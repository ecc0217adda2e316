use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::feed::{format_epoch, StateVector};
use crate::tracker::{EpochQuery, LocationReport, NowReport, SpeedReport};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EpochsQuery {
    /// Number of epochs to skip.
    #[serde(default)]
    pub offset: Option<usize>,
    /// Maximum number of epochs to return.
    #[serde(default)]
    pub limit: Option<usize>,
}

fn parse_query(epoch: &str) -> ApiResult<EpochQuery> {
    epoch.parse().map_err(ApiError::Validation)
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Every state vector in the dataset", body = Vec<StateVector>),
        (status = 503, description = "No dataset loaded", body = ErrorResponse)
    ),
    tag = "epochs"
)]
pub async fn list_state_vectors(State(state): State<AppState>) -> ApiResult<Json<Vec<StateVector>>> {
    Ok(Json(state.tracker.state_vectors()?))
}

#[utoipa::path(
    get,
    path = "/epochs",
    params(EpochsQuery),
    responses(
        (status = 200, description = "Epochs in ascending order", body = Vec<String>),
        (status = 400, description = "Invalid offset or limit"),
        (status = 503, description = "No dataset loaded", body = ErrorResponse)
    ),
    tag = "epochs"
)]
pub async fn list_epochs(
    State(state): State<AppState>,
    Query(query): Query<EpochsQuery>,
) -> ApiResult<Json<Vec<String>>> {
    let epochs = match (query.offset, query.limit) {
        (None, None) => state.tracker.list_epochs()?,
        (offset, limit) => state.tracker.list_epochs_page(offset.unwrap_or(0), limit)?,
    };
    Ok(Json(epochs.iter().map(format_epoch).collect()))
}

#[utoipa::path(
    get,
    path = "/epochs/{epoch}",
    params(("epoch" = String, Path, description = "Epoch (e.g. 2023-058T12:00:00.000Z) or `now`")),
    responses(
        (status = 200, description = "State vector", body = StateVector),
        (status = 400, description = "Malformed epoch", body = ErrorResponse),
        (status = 404, description = "No state vector at this epoch", body = ErrorResponse),
        (status = 503, description = "No dataset loaded", body = ErrorResponse)
    ),
    tag = "epochs"
)]
pub async fn get_state_vector(
    State(state): State<AppState>,
    Path(epoch): Path<String>,
) -> ApiResult<Json<StateVector>> {
    let query = parse_query(&epoch)?;
    Ok(Json(state.tracker.state_vector(query)?))
}

#[utoipa::path(
    get,
    path = "/epochs/{epoch}/speed",
    params(("epoch" = String, Path, description = "Epoch (e.g. 2023-058T12:00:00.000Z) or `now`")),
    responses(
        (status = 200, description = "Instantaneous speed", body = SpeedReport),
        (status = 400, description = "Malformed epoch", body = ErrorResponse),
        (status = 404, description = "No state vector at this epoch", body = ErrorResponse),
        (status = 503, description = "No dataset loaded", body = ErrorResponse)
    ),
    tag = "epochs"
)]
pub async fn get_speed(
    State(state): State<AppState>,
    Path(epoch): Path<String>,
) -> ApiResult<Json<SpeedReport>> {
    let query = parse_query(&epoch)?;
    Ok(Json(state.tracker.speed(query)?))
}

#[utoipa::path(
    get,
    path = "/epochs/{epoch}/location",
    params(("epoch" = String, Path, description = "Epoch (e.g. 2023-058T12:00:00.000Z) or `now`")),
    responses(
        (status = 200, description = "Sub-point and nearest place", body = LocationReport),
        (status = 400, description = "Malformed epoch", body = ErrorResponse),
        (status = 404, description = "No state vector at this epoch", body = ErrorResponse),
        (status = 503, description = "No dataset loaded or geocoder unavailable", body = ErrorResponse)
    ),
    tag = "epochs"
)]
pub async fn get_location(
    State(state): State<AppState>,
    Path(epoch): Path<String>,
) -> ApiResult<Json<LocationReport>> {
    let query = parse_query(&epoch)?;
    Ok(Json(state.tracker.location(query).await?))
}

#[utoipa::path(
    get,
    path = "/now",
    responses(
        (status = 200, description = "Closest sample to the current time", body = NowReport),
        (status = 503, description = "No dataset loaded or geocoder unavailable", body = ErrorResponse)
    ),
    tag = "epochs"
)]
pub async fn now(State(state): State<AppState>) -> ApiResult<Json<NowReport>> {
    Ok(Json(state.tracker.now().await?))
}
