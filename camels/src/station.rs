//! The assembled per-station record.

use geojson::Feature;
use serde::Serialize;
use serde_json::Value;

use crate::attributes::CatchmentAttributes;
use crate::table::Row;

/// Gauge position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

/// Descriptive station fields, renamed from the topographic attribute table.
///
/// | Field | Source column |
/// |-------|---------------|
/// | `station_name` | `gauge_name` |
/// | `water_body_name` | `water_body_name` |
/// | `provider_id` | `provider_id` |
/// | `federal_state` | `federal_state` |
/// | `location` | `gauge_lat`, `gauge_lon` |
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StationMetadata {
    pub station_id: String,
    pub station_name: Option<String>,
    pub water_body_name: Option<String>,
    pub provider_id: Option<String>,
    pub federal_state: Option<String>,
    pub location: Option<Location>,
}

impl StationMetadata {
    /// Build metadata from a station's topographic attribute row.
    ///
    /// Missing or null columns become `None`. Numeric identifiers are kept as
    /// their decimal text.
    pub fn from_topographic(station_id: &str, row: &Row) -> Self {
        let location = match (number(row, "gauge_lat"), number(row, "gauge_lon")) {
            (Some(lat), Some(lon)) => Some(Location { lat, lon }),
            _ => None,
        };

        Self {
            station_id: station_id.to_string(),
            station_name: text(row, "gauge_name"),
            water_body_name: text(row, "water_body_name"),
            provider_id: text(row, "provider_id"),
            federal_state: text(row, "federal_state"),
            location,
        }
    }
}

fn text(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn number(row: &Row, column: &str) -> Option<f64> {
    row.get(column)?.as_f64()
}

/// Everything the dataset holds about one station.
///
/// Built fresh for each lookup and never cached.
#[derive(Debug, Clone)]
pub struct Station {
    pub metadata: StationMetadata,
    /// Date-indexed measurement rows, in file order. Never empty.
    pub timeseries: Vec<Row>,
    pub attributes: CatchmentAttributes,
    /// Catchment boundary, in WGS84.
    pub catchment: Feature,
    /// Gauge location, in WGS84.
    pub location: Feature,
}

impl Station {
    /// The station identifier.
    pub fn id(&self) -> &str {
        &self.metadata.station_id
    }
}
