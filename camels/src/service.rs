//! Station lookups over a CAMELS-DE data directory.
//!
//! [`CamelsService`] is the single entry point: it reads the raw sources for a
//! station id and assembles them into a [`Station`]. It holds nothing but the
//! data directory, so one instance can be shared by any number of concurrent
//! requests; every lookup opens the files it needs and closes them again.
//!
//! ```ignore
//! use camels::CamelsService;
//!
//! let service = CamelsService::new("/data/camels_de");
//!
//! let station = service.station("DE110000")?;
//! println!("{} rows", station.timeseries.len());
//!
//! let gauges = service.gauge_locations()?;
//! println!("{} gauges", gauges.features.len());
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use geojson::FeatureCollection;

use crate::attributes::{AttributeCategory, CatchmentAttributes};
use crate::error::{CamelsError, Resource, Result};
use crate::gpkg::{read_features, FeatureFilter};
use crate::layout;
use crate::response::{single_feature, single_row, StationResponse};
use crate::station::{Station, StationMetadata};
use crate::table::{read_rows, read_rows_matching, Row};

/// Read-only access to one CAMELS-DE dataset.
#[derive(Debug, Clone)]
pub struct CamelsService {
    /// Root of the dataset.
    data_dir: PathBuf,
}

impl CamelsService {
    /// Create a service over `data_dir` without checking that it exists.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Create a builder for more configuration options.
    pub fn builder<P: AsRef<Path>>(data_dir: P) -> CamelsServiceBuilder {
        CamelsServiceBuilder::new(data_dir)
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Read a station's time series.
    ///
    /// Returns an empty table if the station has no time series file.
    pub fn timeseries(&self, station_id: &str) -> Result<Vec<Row>> {
        read_rows(&layout::timeseries_path(&self.data_dir, station_id))
    }

    /// Read a station's rows from one attribute table.
    ///
    /// Returns an empty table if the table file is absent or has no row for
    /// the station.
    pub fn attributes(&self, station_id: &str, category: AttributeCategory) -> Result<Vec<Row>> {
        read_rows_matching(
            &layout::attributes_path(&self.data_dir, category),
            layout::GAUGE_ID_COLUMN,
            station_id,
        )
    }

    /// Read a station's catchment boundary features, in WGS84.
    ///
    /// Returns an empty collection if the GeoPackage is absent or has no
    /// feature for the station.
    pub fn catchment(&self, station_id: &str) -> Result<FeatureCollection> {
        self.station_features(
            &layout::catchments_path(&self.data_dir),
            layout::CATCHMENT_ID_COLUMN,
            station_id,
            &layout::CATCHMENT_DROPPED_COLUMNS,
        )
    }

    /// Read a station's gauge location features, in WGS84.
    ///
    /// Returns an empty collection if the GeoPackage is absent or has no
    /// feature for the station.
    pub fn location(&self, station_id: &str) -> Result<FeatureCollection> {
        self.station_features(
            &layout::gauging_stations_path(&self.data_dir),
            layout::GAUGE_ID_COLUMN,
            station_id,
            &[],
        )
    }

    /// Read every gauge location, in WGS84.
    ///
    /// # Errors
    ///
    /// Returns [`CamelsError::SourceUnavailable`] if the gauge location
    /// GeoPackage does not exist.
    pub fn gauge_locations(&self) -> Result<FeatureCollection> {
        read_features(&layout::gauging_stations_path(&self.data_dir), None, &[])
    }

    fn station_features(
        &self,
        path: &Path,
        column: &str,
        station_id: &str,
        dropped_columns: &[&str],
    ) -> Result<FeatureCollection> {
        let filter = FeatureFilter { column, station_id };

        match read_features(path, Some(filter), dropped_columns) {
            Err(CamelsError::SourceUnavailable { path }) => {
                tracing::debug!(path = %path.display(), "GeoPackage not found, treating as empty");
                Ok(FeatureCollection {
                    bbox: None,
                    features: Vec::new(),
                    foreign_members: None,
                })
            }
            other => other,
        }
    }

    /// Assemble everything known about a station.
    ///
    /// Sources are checked in a fixed order and the first one that is missing
    /// or empty is reported: time series, then the attribute categories in
    /// [`AttributeCategory::ALL`] order, then the catchment, then the gauge
    /// location. Nothing is returned for a partially available station.
    ///
    /// # Errors
    ///
    /// - [`CamelsError::NotFound`] naming the first missing resource
    /// - [`CamelsError::AmbiguousData`] if an attribute table, the catchments
    ///   or the gauge locations hold more than one record for the station
    pub fn station(&self, station_id: &str) -> Result<Station> {
        let timeseries = self.timeseries(station_id)?;
        if timeseries.is_empty() {
            return Err(CamelsError::NotFound {
                resource: Resource::Timeseries,
                station_id: station_id.to_string(),
            });
        }

        let mut attributes = CatchmentAttributes::default();
        for category in AttributeCategory::ALL {
            let rows = self.attributes(station_id, category)?;
            let row = single_row(rows, Resource::Attributes(category), station_id)?;
            attributes.set(category, row);
        }

        let catchment = single_feature(self.catchment(station_id)?, Resource::Catchment, station_id)?;
        let location = single_feature(self.location(station_id)?, Resource::Location, station_id)?;

        let metadata = StationMetadata::from_topographic(
            station_id,
            attributes.get(AttributeCategory::Topographic),
        );

        let station = Station {
            metadata,
            timeseries,
            attributes,
            catchment,
            location,
        };

        tracing::debug!(
            station_id = station.id(),
            timeseries_rows = station.timeseries.len(),
            "Station assembled"
        );

        Ok(station)
    }

    /// Assemble a station and shape it as the wire response.
    pub fn station_response(&self, station_id: &str) -> Result<StationResponse> {
        self.station(station_id).map(StationResponse::from)
    }

    /// List the ids of all stations with a time series file.
    ///
    /// Returns a sorted, deduplicated list; empty if the time series directory
    /// does not exist.
    pub fn station_ids(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(layout::timeseries_dir(&self.data_dir)) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let ids: BTreeSet<String> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                layout::station_id_from_filename(&name).map(str::to_string)
            })
            .collect();

        ids.into_iter().collect()
    }
}

/// Builder for creating [`CamelsService`] with custom configuration.
///
/// # Example
///
/// ```ignore
/// use camels::CamelsServiceBuilder;
///
/// let service = CamelsServiceBuilder::from_env()?.build()?;
/// ```
#[derive(Debug, Clone)]
pub struct CamelsServiceBuilder {
    data_dir: PathBuf,
}

impl CamelsServiceBuilder {
    /// Create a new builder with the specified data directory.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `CAMELS_DATA_DIR` | Root of the CAMELS-DE dataset | Required |
    ///
    /// # Errors
    ///
    /// Returns an error if `CAMELS_DATA_DIR` is not set.
    pub fn from_env() -> Result<Self> {
        let data_dir = std::env::var("CAMELS_DATA_DIR").map_err(|_| {
            CamelsError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "CAMELS_DATA_DIR environment variable not set",
            ))
        })?;

        Ok(Self::new(data_dir))
    }

    /// Set the data directory.
    ///
    /// Overrides the directory set in the constructor or from environment.
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = path.as_ref().to_path_buf();
        self
    }

    /// Build the [`CamelsService`].
    ///
    /// # Errors
    ///
    /// Returns [`CamelsError::SourceUnavailable`] if the data directory does
    /// not exist.
    pub fn build(self) -> Result<CamelsService> {
        if !self.data_dir.is_dir() {
            return Err(CamelsError::SourceUnavailable {
                path: self.data_dir,
            });
        }

        Ok(CamelsService {
            data_dir: self.data_dir,
        })
    }
}
