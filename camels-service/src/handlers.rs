//! HTTP request handlers for the CAMELS-DE service.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use camels::CamelsError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::AppState;

/// Detail returned when the gauge location GeoPackage is missing.
pub const GAUGE_LOCATIONS_NOT_FOUND: &str =
    "GeoJSON data for all stations not found (CAMELS_DE_gauging_stations.gpkg)";

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable description naming the missing resource.
    pub detail: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Get the combined record of one station.
///
/// # Returns
///
/// - `200 OK` with the time series, catchment attributes, catchment geometry
///   and gauge location
/// - `404 Not Found` naming the first missing piece and the station id
/// - `500 Internal Server Error` if a source file cannot be read
#[utoipa::path(
    get,
    path = "/stations/{station_id}",
    tag = "stations",
    params(
        ("station_id" = String, Path, description = "CAMELS-DE station id, e.g. DE110000"),
    ),
    responses(
        (status = OK, description = "Station record", body = camels::StationResponse),
        (status = NOT_FOUND, description = "Station or one of its parts not found", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Dataset could not be read", body = ErrorResponse)
    )
)]
pub async fn get_station(
    State(state): State<Arc<AppState>>,
    Path(station_id): Path<String>,
) -> impl IntoResponse {
    tracing::debug!(station_id = %station_id, "Station query");

    let lookup_state = Arc::clone(&state);
    let lookup_id = station_id.clone();
    let result = tokio::task::spawn_blocking(move || {
        lookup_state.camels_service.station_response(&lookup_id)
    })
    .await;

    match result {
        Ok(Ok(response)) => {
            tracing::info!(
                station_id = %station_id,
                timeseries_rows = response.timeseries.data.len(),
                "Station found"
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(Err(e)) => error_response(&station_id, e),
        Err(e) => join_error_response(e),
    }
}

/// Get every gauge location as a GeoJSON FeatureCollection in EPSG:4326.
///
/// # Returns
///
/// - `200 OK` with the FeatureCollection
/// - `404 Not Found` if the gauge location file is missing
/// - `500 Internal Server Error` if it cannot be read
#[utoipa::path(
    get,
    path = "/all_stations/gauge_locations",
    tag = "stations",
    responses(
        (status = OK, description = "GeoJSON FeatureCollection of gauge points", body = Object),
        (status = NOT_FOUND, description = "Gauge location file not found", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Gauge location file could not be read", body = ErrorResponse)
    )
)]
pub async fn get_all_stations_gauge_locations(
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::debug!("Gauge locations query");

    let lookup_state = Arc::clone(&state);
    let result =
        tokio::task::spawn_blocking(move || lookup_state.camels_service.gauge_locations()).await;

    match result {
        Ok(Ok(collection)) => {
            tracing::info!(features = collection.features.len(), "Gauge locations read");
            (StatusCode::OK, Json(collection)).into_response()
        }
        Ok(Err(CamelsError::SourceUnavailable { path })) => {
            tracing::warn!(path = %path.display(), "Gauge location file missing");
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    detail: GAUGE_LOCATIONS_NOT_FOUND.to_string(),
                }),
            )
                .into_response()
        }
        Ok(Err(e)) => error_response("all", e),
        Err(e) => join_error_response(e),
    }
}

/// Create an error response for a failed station lookup.
fn error_response(station_id: &str, e: CamelsError) -> axum::response::Response {
    let status = if e.is_lookup_failure() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    if status == StatusCode::NOT_FOUND {
        tracing::warn!(station_id = station_id, error = %e, "Station lookup failed");
    } else {
        tracing::error!(station_id = station_id, error = %e, "Dataset read failed");
    }

    (
        status,
        Json(ErrorResponse {
            detail: e.to_string(),
        }),
    )
        .into_response()
}

fn join_error_response(e: tokio::task::JoinError) -> axum::response::Response {
    tracing::error!(error = %e, "Lookup task failed");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            detail: "Internal server error".to_string(),
        }),
    )
        .into_response()
}

/// Health check endpoint.
///
/// Returns service status and version.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = OK, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
