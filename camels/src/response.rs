//! Wire-format response shapes.
//!
//! The station response is a fixed structure: the metadata, the time series
//! under `timeseries.data`, one object per attribute category under
//! `catchment_attributes`, and the catchment and gauge geometries as single
//! GeoJSON Features. Values are passed through exactly as read.

use geojson::{Feature, FeatureCollection};
use serde::Serialize;

use crate::attributes::CatchmentAttributes;
use crate::error::{CamelsError, Resource, Result};
use crate::station::{Station, StationMetadata};
use crate::table::Row;

/// Time series rows of one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StationTimeseries {
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
    pub data: Vec<Row>,
}

/// Full record returned for `GET /stations/{station_id}`.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StationResponse {
    pub metadata: StationMetadata,
    pub timeseries: StationTimeseries,
    pub catchment_attributes: CatchmentAttributes,
    /// GeoJSON Feature with the catchment polygon.
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub catchment_geometry: Feature,
    /// GeoJSON Feature with the gauge point.
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub location_geometry: Feature,
}

impl From<Station> for StationResponse {
    fn from(station: Station) -> Self {
        Self {
            metadata: station.metadata,
            timeseries: StationTimeseries {
                data: station.timeseries,
            },
            catchment_attributes: station.attributes,
            catchment_geometry: station.catchment,
            location_geometry: station.location,
        }
    }
}

/// Unwrap the only feature of a collection.
///
/// # Errors
///
/// - [`CamelsError::NotFound`] if the collection is empty
/// - [`CamelsError::AmbiguousData`] if it holds more than one feature
///
/// # Example
///
/// ```
/// use camels::error::Resource;
/// use camels::response::single_feature;
/// use geojson::FeatureCollection;
///
/// let empty = FeatureCollection {
///     bbox: None,
///     features: vec![],
///     foreign_members: None,
/// };
/// assert!(single_feature(empty, Resource::Catchment, "DE110000").is_err());
/// ```
pub fn single_feature(
    collection: FeatureCollection,
    resource: Resource,
    station_id: &str,
) -> Result<Feature> {
    exactly_one(collection.features, resource, station_id)
}

/// Unwrap the only row of a table lookup.
///
/// Same contract as [`single_feature`].
pub fn single_row(rows: Vec<Row>, resource: Resource, station_id: &str) -> Result<Row> {
    exactly_one(rows, resource, station_id)
}

fn exactly_one<T>(items: Vec<T>, resource: Resource, station_id: &str) -> Result<T> {
    let count = items.len();
    let mut items = items.into_iter();

    match (items.next(), count) {
        (Some(item), 1) => Ok(item),
        (None, _) => Err(CamelsError::NotFound {
            resource,
            station_id: station_id.to_string(),
        }),
        _ => Err(CamelsError::AmbiguousData {
            resource,
            station_id: station_id.to_string(),
            count,
        }),
    }
}
