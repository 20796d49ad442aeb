//! CAMELS-DE file layout.
//!
//! The dataset is a directory tree with a fixed naming convention:
//!
//! ```text
//! {data_dir}/
//!   CAMELS_DE_{category}_attributes.csv
//!   CAMELS_DE_simulation_benchmark.csv
//!   timeseries/CAMELS_DE_hydromet_timeseries_{station_id}.csv
//!   CAMELS_DE_catchment_boundaries/catchments/CAMELS_DE_catchments.gpkg
//!   CAMELS_DE_catchment_boundaries/gauging_stations/CAMELS_DE_gauging_stations.gpkg
//! ```

use std::path::{Path, PathBuf};

use crate::attributes::AttributeCategory;

const TIMESERIES_DIR: &str = "timeseries";
const TIMESERIES_PREFIX: &str = "CAMELS_DE_hydromet_timeseries_";
const TIMESERIES_SUFFIX: &str = ".csv";

/// File name of the catchment boundary GeoPackage.
pub const CATCHMENTS_FILE: &str = "CAMELS_DE_catchments.gpkg";

/// File name of the gauge location GeoPackage.
pub const GAUGING_STATIONS_FILE: &str = "CAMELS_DE_gauging_stations.gpkg";

/// Station id column in attribute tables and the gauge locations.
pub const GAUGE_ID_COLUMN: &str = "gauge_id";

/// Station id column in the catchment boundaries.
pub const CATCHMENT_ID_COLUMN: &str = "id";

/// Catchment columns that are not passed through as feature properties.
pub const CATCHMENT_DROPPED_COLUMNS: [&str; 5] =
    ["id", "name", "result", "area_calc", "area_reported"];

/// Path of a station's time series file.
///
/// # Examples
///
/// ```
/// use camels::layout::timeseries_path;
/// use std::path::Path;
///
/// let path = timeseries_path(Path::new("/data"), "DE110000");
/// assert_eq!(
///     path,
///     Path::new("/data/timeseries/CAMELS_DE_hydromet_timeseries_DE110000.csv")
/// );
/// ```
pub fn timeseries_path(data_dir: &Path, station_id: &str) -> PathBuf {
    data_dir
        .join(TIMESERIES_DIR)
        .join(format!("{TIMESERIES_PREFIX}{station_id}{TIMESERIES_SUFFIX}"))
}

/// Path of an attribute table.
pub fn attributes_path(data_dir: &Path, category: AttributeCategory) -> PathBuf {
    data_dir.join(category.file_name())
}

/// Path of the catchment boundary GeoPackage.
pub fn catchments_path(data_dir: &Path) -> PathBuf {
    data_dir
        .join("CAMELS_DE_catchment_boundaries")
        .join("catchments")
        .join(CATCHMENTS_FILE)
}

/// Path of the gauge location GeoPackage.
pub fn gauging_stations_path(data_dir: &Path) -> PathBuf {
    data_dir
        .join("CAMELS_DE_catchment_boundaries")
        .join("gauging_stations")
        .join(GAUGING_STATIONS_FILE)
}

/// Directory holding the per-station time series.
pub fn timeseries_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(TIMESERIES_DIR)
}

/// Extract the station id from a time series file name.
///
/// Returns `None` if the name does not follow the convention.
///
/// # Examples
///
/// ```
/// use camels::layout::station_id_from_filename;
///
/// assert_eq!(
///     station_id_from_filename("CAMELS_DE_hydromet_timeseries_DE110000.csv"),
///     Some("DE110000")
/// );
/// assert_eq!(station_id_from_filename("notes.txt"), None);
/// ```
pub fn station_id_from_filename(filename: &str) -> Option<&str> {
    let id = filename
        .strip_prefix(TIMESERIES_PREFIX)?
        .strip_suffix(TIMESERIES_SUFFIX)?;

    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}
