//! Error types for the CAMELS library.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::attributes::AttributeCategory;

/// A per-station piece of the dataset that a lookup can fail to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Hydrometeorological time series.
    Timeseries,
    /// One attribute table.
    Attributes(AttributeCategory),
    /// Catchment boundary polygon.
    Catchment,
    /// Gauge location point.
    Location,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Timeseries => f.write_str("Timeseries data"),
            Resource::Attributes(category) => write!(f, "{} data", category.label()),
            Resource::Catchment => f.write_str("Catchment geometry"),
            Resource::Location => f.write_str("Location geometry"),
        }
    }
}

/// Errors that can occur when reading the CAMELS-DE dataset.
#[derive(Error, Debug)]
pub enum CamelsError {
    /// IO error when reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV input.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// SQLite failure while reading a GeoPackage.
    #[error("GeoPackage error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// No row or feature matched the station.
    #[error("{resource} for Station with id {station_id} not found")]
    NotFound {
        resource: Resource,
        station_id: String,
    },

    /// More than one row or feature matched where exactly one was expected.
    #[error("{resource} for Station with id {station_id} is ambiguous ({count} records found)")]
    AmbiguousData {
        resource: Resource,
        station_id: String,
        count: usize,
    },

    /// The backing file does not exist.
    #[error("Source file not found: {path}")]
    SourceUnavailable { path: PathBuf },

    /// A table lacks the column used to look up stations.
    #[error("Column '{column}' not found in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// The GeoPackage has no usable feature table.
    #[error("No feature table found in {path}")]
    NoFeatureTable { path: PathBuf },

    /// A geometry blob could not be decoded.
    #[error("Invalid geometry: {message}")]
    InvalidGeometry { message: String },

    /// The source coordinate reference system cannot be reprojected.
    #[error("Unsupported coordinate reference system: EPSG:{code}")]
    UnsupportedCrs { code: i32 },
}

impl CamelsError {
    /// Whether the error means a lookup came back empty or ambiguous rather
    /// than a broken source.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            CamelsError::NotFound { .. }
                | CamelsError::AmbiguousData { .. }
                | CamelsError::SourceUnavailable { .. }
        )
    }
}

/// Result type alias using [`CamelsError`].
pub type Result<T> = std::result::Result<T, CamelsError>;
