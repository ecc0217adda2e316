use axum::{routing::delete, routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::feed::HttpFeedSource;
use crate::geolocation::NominatimGeocoder;
use crate::tracker::{Tracker, TrackerError};

use super::api::dataset as dataset_handlers;
use super::api::epochs as epoch_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;
use super::state::AppState;

pub fn build_tracker(config: &Config) -> Result<Arc<Tracker>, TrackerError> {
    let source = HttpFeedSource::new(config.feed.url.clone(), config.feed.timeout)?;
    log::debug!("trajectory feed: {}", source.url());
    let geocoder = NominatimGeocoder::new(
        config.geocoder.url.clone(),
        &config.geocoder.user_agent,
        config.geocoder.timeout,
        config.geocoder.zoom,
        config.geocoder.language.clone(),
    )?;

    Ok(Arc::new(Tracker::new(
        Arc::new(source),
        Arc::new(geocoder),
        config.feed.timeout,
        config.geocoder.timeout,
    )))
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(epoch_handlers::list_state_vectors))
        .route("/epochs", get(epoch_handlers::list_epochs))
        .route("/epochs/{epoch}", get(epoch_handlers::get_state_vector))
        .route("/epochs/{epoch}/speed", get(epoch_handlers::get_speed))
        .route("/epochs/{epoch}/location", get(epoch_handlers::get_location))
        .route("/now", get(epoch_handlers::now))
        .route("/header", get(dataset_handlers::header))
        .route("/metadata", get(dataset_handlers::metadata))
        .route("/comment", get(dataset_handlers::comments))
        .route("/refresh", post(dataset_handlers::refresh))
        .route("/data", delete(dataset_handlers::clear))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config, tracker: Arc<Tracker>) -> std::io::Result<()> {
    // Serve even without data; queries answer `dataset_empty` until a refresh works.
    match tracker.refresh().await {
        Ok(count) => log::info!("initial dataset loaded ({} state vectors)", count),
        Err(e) => log::warn!("initial refresh failed: {}", e),
    }

    if let Some(every) = config.feed.refresh_interval {
        log::info!("refreshing trajectory every {}", humantime::format_duration(every));
        tracker.clone().spawn_periodic_refresh(every);
    }

    let app = router(AppState { tracker });

    log::info!("Starting server on {}", config.web.bind);

    let listener = tokio::net::TcpListener::bind(&config.web.bind).await?;
    axum::serve(listener, app).await
}
