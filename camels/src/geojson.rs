//! GeoJSON reprojection.
//!
//! Geometries are read in whatever CRS the GeoPackage stores them in and must
//! leave the library as longitude/latitude. These functions walk every position
//! of a geometry and transform its first two ordinates; any Z value is kept.
//!
//! # Example
//!
//! ```
//! use camels::crs::Crs;
//! use camels::geojson::reproject_geometry;
//! use geojson::{Geometry, Value};
//!
//! let point = Geometry::new(Value::Point(vec![4_321_000.0, 3_210_000.0]));
//! let wgs84 = reproject_geometry(point, &Crs::EtrsLaea).unwrap();
//!
//! if let Value::Point(position) = wgs84.value {
//!     assert!((position[0] - 10.0).abs() < 1e-9);
//!     assert!((position[1] - 52.0).abs() < 1e-9);
//! }
//! ```

use geojson::{Feature, Geometry, Value as GeoJsonValue};

use crate::crs::Crs;
use crate::error::{CamelsError, Result};

/// Reproject a geometry from `crs` to WGS84 longitude/latitude.
///
/// Supported geometry types:
/// - Point
/// - MultiPoint
/// - LineString
/// - MultiLineString
/// - Polygon
/// - MultiPolygon
/// - GeometryCollection
///
/// # Errors
///
/// Returns [`CamelsError::InvalidGeometry`] if a position has fewer than two
/// ordinates.
pub fn reproject_geometry(geometry: Geometry, crs: &Crs) -> Result<Geometry> {
    transform_geometry(geometry, &|x, y| crs.to_wgs84(x, y))
}

/// Project a WGS84 geometry into `crs`.
///
/// The inverse of [`reproject_geometry`].
pub fn project_geometry(geometry: Geometry, crs: &Crs) -> Result<Geometry> {
    transform_geometry(geometry, &|lon, lat| crs.from_wgs84(lon, lat))
}

/// Reproject a single feature's geometry to WGS84.
///
/// Features already in a geographic CRS are returned untouched. Otherwise the
/// bbox is cleared, since it was computed in projected units.
pub fn reproject_feature(mut feature: Feature, crs: &Crs) -> Result<Feature> {
    if crs.is_geographic() {
        return Ok(feature);
    }

    feature.geometry = feature
        .geometry
        .map(|geometry| reproject_geometry(geometry, crs))
        .transpose()?;
    // A projected bbox is meaningless once coordinates are lon/lat
    feature.bbox = None;
    Ok(feature)
}

fn transform_geometry<F>(geometry: Geometry, f: &F) -> Result<Geometry>
where
    F: Fn(f64, f64) -> (f64, f64),
{
    let new_value = match geometry.value {
        GeoJsonValue::Point(coord) => GeoJsonValue::Point(transform_position(&coord, f)?),
        GeoJsonValue::MultiPoint(coords) => {
            GeoJsonValue::MultiPoint(transform_positions(&coords, f)?)
        }
        GeoJsonValue::LineString(coords) => {
            GeoJsonValue::LineString(transform_positions(&coords, f)?)
        }
        GeoJsonValue::MultiLineString(lines) => {
            let transformed: Result<Vec<_>> = lines
                .iter()
                .map(|line| transform_positions(line, f))
                .collect();
            GeoJsonValue::MultiLineString(transformed?)
        }
        GeoJsonValue::Polygon(rings) => {
            let transformed: Result<Vec<_>> = rings
                .iter()
                .map(|ring| transform_positions(ring, f))
                .collect();
            GeoJsonValue::Polygon(transformed?)
        }
        GeoJsonValue::MultiPolygon(polygons) => {
            let transformed: Result<Vec<_>> = polygons
                .iter()
                .map(|polygon| {
                    polygon
                        .iter()
                        .map(|ring| transform_positions(ring, f))
                        .collect::<Result<Vec<_>>>()
                })
                .collect();
            GeoJsonValue::MultiPolygon(transformed?)
        }
        GeoJsonValue::GeometryCollection(geometries) => {
            let transformed: Result<Vec<_>> = geometries
                .into_iter()
                .map(|g| transform_geometry(g, f))
                .collect();
            GeoJsonValue::GeometryCollection(transformed?)
        }
    };

    Ok(Geometry::new(new_value))
}

fn transform_position<F>(coord: &[f64], f: &F) -> Result<Vec<f64>>
where
    F: Fn(f64, f64) -> (f64, f64),
{
    if coord.len() < 2 {
        return Err(CamelsError::InvalidGeometry {
            message: "Coordinate must have at least 2 elements".to_string(),
        });
    }

    let (x, y) = f(coord[0], coord[1]);
    let mut out = Vec::with_capacity(coord.len());
    out.push(x);
    out.push(y);
    out.extend_from_slice(&coord[2..]);
    Ok(out)
}

fn transform_positions<F>(coords: &[Vec<f64>], f: &F) -> Result<Vec<Vec<f64>>>
where
    F: Fn(f64, f64) -> (f64, f64),
{
    coords
        .iter()
        .map(|coord| transform_position(coord, f))
        .collect()
}
