//! CAMELS Service - HTTP microservice for the CAMELS-DE dataset.
//!
//! A read-only REST API serving per-station records and gauge locations.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `CAMELS_DATA_DIR` | Root of the CAMELS-DE dataset | Current directory |
//! | `CAMELS_PORT` | HTTP server port | 8000 |
//! | `CAMELS_CORS_ORIGIN` | Browser origin allowed to call the API | `http://localhost:3000` |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `GET /stations/{station_id}` - Combined record of one station
//! - `GET /all_stations/gauge_locations` - All gauge locations as GeoJSON
//! - `GET /health` - Health check
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use camels::CamelsServiceBuilder;
use camels_service::{router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "camels_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = std::env::var("CAMELS_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let cors_origin =
        std::env::var("CAMELS_CORS_ORIGIN").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());

    let camels_service = match CamelsServiceBuilder::from_env() {
        Ok(builder) => builder.build()?,
        Err(_) => {
            // Fallback: CAMELS_DATA_DIR not set, use current directory
            tracing::warn!("CAMELS_DATA_DIR not set, using current directory");
            CamelsServiceBuilder::new(".").build()?
        }
    };

    tracing::info!(
        data_dir = %camels_service.data_dir().display(),
        stations = camels_service.station_ids().len(),
        cors_origin = %cors_origin,
        port = port,
        "Starting CAMELS service"
    );

    let state = Arc::new(AppState { camels_service });

    let app = router(state, &cors_origin);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
