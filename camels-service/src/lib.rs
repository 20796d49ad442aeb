//! CAMELS Service Library
//!
//! HTTP handlers and router for the CAMELS-DE data-access service.
//! This library is used by both the camels-service binary and integration tests.

pub mod handlers;

use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use camels::CamelsService;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation for the CAMELS service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CAMELS-DE API",
        version = "0.1.0",
        description = "Read-only REST API for the CAMELS-DE hydrometeorological dataset.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        handlers::get_station,
        handlers::get_all_stations_gauge_locations,
        handlers::health_check,
    ),
    components(
        schemas(
            camels::StationResponse,
            handlers::ErrorResponse,
            handlers::HealthResponse,
        )
    ),
    tags(
        (name = "stations", description = "Station data endpoints"),
        (name = "system", description = "System and health endpoints")
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers.
pub struct AppState {
    /// Dataset reader for station lookups.
    pub camels_service: CamelsService,
}

/// Build the API router, including the Swagger UI at `/docs`.
///
/// `cors_origin` is the only browser origin allowed to call the API. An
/// origin that is not a valid header value disables cross-origin access.
pub fn router(state: Arc<AppState>, cors_origin: &str) -> Router {
    let cors = match HeaderValue::from_str(cors_origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!(
                origin = cors_origin,
                "Invalid CORS origin, cross-origin requests disabled"
            );
            CorsLayer::new()
        }
    };

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/stations/:station_id", get(handlers::get_station))
        .route(
            "/all_stations/gauge_locations",
            get(handlers::get_all_stations_gauge_locations),
        )
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{ErrorResponse, HealthResponse, GAUGE_LOCATIONS_NOT_FOUND};
