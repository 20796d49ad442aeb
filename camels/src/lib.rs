//! # CAMELS - CAMELS-DE Dataset Library
//!
//! Read-only access to the CAMELS-DE hydrometeorological dataset: per-station
//! time series, static catchment attributes, catchment boundaries and gauge
//! locations, assembled into GeoJSON-ready records.
//!
//! ## Features
//!
//! - **Stateless**: Every lookup reads the files it needs and nothing is cached
//! - **Self-contained**: GeoPackages are decoded and reprojected in-process
//! - **Deterministic**: Values pass through exactly as stored, in file order
//!
//! ## Quick Start
//!
//! ```ignore
//! use camels::CamelsService;
//!
//! let service = CamelsService::new("/data/camels_de");
//!
//! let station = service.station("DE110000")?;
//! println!("{:?}", station.metadata.station_name);
//!
//! let json = serde_json::to_string(&service.station_response("DE110000")?)?;
//! ```
//!
//! ## Dataset Layout
//!
//! ```text
//! <data_dir>/
//! ├── timeseries/CAMELS_DE_hydromet_timeseries_<ID>.csv
//! ├── CAMELS_DE_<category>_attributes.csv
//! ├── CAMELS_DE_simulation_benchmark.csv
//! ├── CAMELS_DE_catchment_boundaries/catchments/CAMELS_DE_catchments.gpkg
//! └── CAMELS_DE_catchment_boundaries/gauging_stations/CAMELS_DE_gauging_stations.gpkg
//! ```
//!
//! Geometries are stored in ETRS89-LAEA (EPSG:3035) and returned as WGS84
//! longitude/latitude (EPSG:4326).

pub mod attributes;
pub mod crs;
pub mod error;
pub mod geojson;
pub mod gpkg;
pub mod layout;
pub mod response;
pub mod service;
pub mod station;
pub mod table;
pub mod wkb;

#[cfg(test)]
mod test_support;

// Re-export main types at crate root for convenience
pub use attributes::{AttributeCategory, CatchmentAttributes};
pub use crs::Crs;
pub use error::{CamelsError, Resource, Result};
pub use response::{StationResponse, StationTimeseries};
pub use service::{CamelsService, CamelsServiceBuilder};
pub use station::{Location, Station, StationMetadata};
pub use table::Row;
