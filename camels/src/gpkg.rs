//! GeoPackage feature reading.
//!
//! A GeoPackage is an SQLite database. The reader looks up the first feature
//! table registered in `gpkg_contents`, its geometry column in
//! `gpkg_geometry_columns` and the EPSG code of its SRS in
//! `gpkg_spatial_ref_sys`, then turns each row into a GeoJSON [`Feature`]
//! whose geometry has been reprojected to WGS84.
//!
//! Files are opened read-only for the duration of one call; no handle is kept.

use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use serde_json::{Number, Value};

use crate::crs::Crs;
use crate::error::{CamelsError, Result};
use crate::geojson::reproject_feature;
use crate::wkb::decode_gpkg_blob;

/// Restrict a read to the features of one station.
#[derive(Debug, Clone, Copy)]
pub struct FeatureFilter<'a> {
    /// Column holding the station id.
    pub column: &'a str,
    /// Station id to match.
    pub station_id: &'a str,
}

/// Description of a GeoPackage feature table.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Feature table name.
    pub table: String,
    /// Geometry column name.
    pub geometry_column: String,
    /// EPSG code of the stored geometries.
    pub epsg: i32,
    /// Attribute columns, excluding the primary key and geometry.
    pub columns: Vec<String>,
}

impl Layer {
    /// Inspect the first feature table of an open GeoPackage.
    pub fn describe(conn: &Connection, path: &Path) -> Result<Self> {
        let table: String = conn
            .query_row(
                "SELECT table_name FROM gpkg_contents \
                 WHERE data_type = 'features' ORDER BY table_name LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| CamelsError::NoFeatureTable {
                path: path.to_path_buf(),
            })?;

        let (geometry_column, srs_id): (String, i32) = conn.query_row(
            "SELECT column_name, srs_id FROM gpkg_geometry_columns WHERE table_name = ?1",
            [&table],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let epsg = conn
            .query_row(
                "SELECT organization, organization_coordsys_id \
                 FROM gpkg_spatial_ref_sys WHERE srs_id = ?1",
                [srs_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i32>(1)?)),
            )
            .optional()?
            .filter(|(organization, _)| organization.eq_ignore_ascii_case("epsg"))
            .map_or(srs_id, |(_, code)| code);

        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(&table)))?;
        let columns = stmt
            .query_map([], |row| {
                let name: String = row.get(1)?;
                let pk: i64 = row.get(5)?;
                Ok((name, pk))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .filter(|(name, pk)| *pk == 0 && *name != geometry_column)
            .map(|(name, _)| name)
            .collect();

        Ok(Self {
            table,
            geometry_column,
            epsg,
            columns,
        })
    }
}

/// Read the features of a GeoPackage as a WGS84 feature collection.
///
/// With a `filter`, only features whose id column equals the station id are
/// returned; the collection may then be empty or hold several features, and it
/// is up to the caller to decide whether that is acceptable. Columns listed in
/// `dropped_columns` are left out of the feature properties.
///
/// # Errors
///
/// - [`CamelsError::SourceUnavailable`] if the file does not exist
/// - [`CamelsError::MissingColumn`] if the filter column is not in the table
/// - [`CamelsError::UnsupportedCrs`] if the stored SRS cannot be reprojected
/// - [`CamelsError::InvalidGeometry`] for undecodable geometry blobs
pub fn read_features(
    path: &Path,
    filter: Option<FeatureFilter<'_>>,
    dropped_columns: &[&str],
) -> Result<FeatureCollection> {
    if !path.is_file() {
        return Err(CamelsError::SourceUnavailable {
            path: path.to_path_buf(),
        });
    }

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    let layer = Layer::describe(&conn, path)?;
    let crs = Crs::from_epsg(layer.epsg)?;

    if let Some(filter) = filter {
        if !layer.columns.iter().any(|c| c == filter.column) {
            return Err(CamelsError::MissingColumn {
                path: path.to_path_buf(),
                column: filter.column.to_string(),
            });
        }
    }

    let properties: Vec<&String> = layer
        .columns
        .iter()
        .filter(|c| !dropped_columns.contains(&c.as_str()))
        .collect();

    let mut select = quote_ident(&layer.geometry_column);
    for column in &properties {
        select.push_str(", ");
        select.push_str(&quote_ident(column));
    }

    let mut sql = format!("SELECT {} FROM {}", select, quote_ident(&layer.table));
    if let Some(filter) = filter {
        sql.push_str(&format!(" WHERE {} = ?1", quote_ident(filter.column)));
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = match filter {
        Some(filter) => stmt.query([filter.station_id])?,
        None => stmt.query([])?,
    };

    let mut features = Vec::new();
    while let Some(row) = rows.next()? {
        let geometry = match row.get_ref(0)? {
            ValueRef::Blob(blob) => decode_gpkg_blob(blob)?.value.map(Geometry::new),
            _ => None,
        };

        let mut props = JsonObject::new();
        for (i, name) in properties.iter().enumerate() {
            if let Some(value) = sql_to_json(row.get_ref(i + 1)?) {
                props.insert(name.to_string(), value);
            }
        }

        let feature = Feature {
            bbox: None,
            geometry,
            id: None,
            properties: Some(props),
            foreign_members: None,
        };
        features.push(reproject_feature(feature, &crs)?);
    }

    tracing::debug!(
        path = %path.display(),
        table = %layer.table,
        epsg = layer.epsg,
        features = features.len(),
        "Read GeoPackage features"
    );

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Convert an SQLite value to JSON. Blobs have no JSON form and are skipped.
fn sql_to_json(value: ValueRef<'_>) -> Option<Value> {
    match value {
        ValueRef::Null => Some(Value::Null),
        ValueRef::Integer(i) => Some(Value::from(i)),
        ValueRef::Real(f) => Some(Number::from_f64(f).map_or(Value::Null, Value::Number)),
        ValueRef::Text(t) => Some(Value::String(String::from_utf8_lossy(t).into_owned())),
        ValueRef::Blob(_) => None,
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
