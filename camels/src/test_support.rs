//! Fixtures for building small CAMELS-DE datasets in temporary directories.

use std::fs;
use std::path::Path;

use geojson::Value as GeoJsonValue;
use rusqlite::{params_from_iter, Connection};
use serde_json::{json, Value};

use crate::attributes::AttributeCategory;
use crate::layout;
use crate::wkb::encode_gpkg_blob;

/// One row of a fixture feature table.
pub(crate) struct FixtureFeature {
    pub geometry: GeoJsonValue,
    pub values: Vec<Value>,
}

impl FixtureFeature {
    pub fn new(geometry: GeoJsonValue, values: &[Value]) -> Self {
        Self {
            geometry,
            values: values.to_vec(),
        }
    }
}

fn to_sql(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Number(n) => match n.as_i64() {
            Some(i) => rusqlite::types::Value::Integer(i),
            None => rusqlite::types::Value::Real(n.as_f64().unwrap()),
        },
        Value::String(s) => rusqlite::types::Value::Text(s.clone()),
        other => rusqlite::types::Value::Text(other.to_string()),
    }
}

/// Write a minimal GeoPackage holding one feature table.
pub(crate) fn create_geopackage(
    path: &Path,
    table: &str,
    epsg: i32,
    columns: &[&str],
    features: &[FixtureFeature],
) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }

    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE gpkg_spatial_ref_sys (
            srs_name TEXT NOT NULL,
            srs_id INTEGER PRIMARY KEY,
            organization TEXT NOT NULL,
            organization_coordsys_id INTEGER NOT NULL,
            definition TEXT NOT NULL,
            description TEXT
        );
        CREATE TABLE gpkg_contents (
            table_name TEXT PRIMARY KEY,
            data_type TEXT NOT NULL,
            identifier TEXT,
            srs_id INTEGER
        );
        CREATE TABLE gpkg_geometry_columns (
            table_name TEXT NOT NULL,
            column_name TEXT NOT NULL,
            geometry_type_name TEXT NOT NULL,
            srs_id INTEGER NOT NULL,
            z TINYINT NOT NULL,
            m TINYINT NOT NULL
        );",
    )
    .unwrap();

    conn.execute(
        "INSERT INTO gpkg_spatial_ref_sys VALUES (?1, ?2, 'EPSG', ?2, 'undefined', NULL)",
        rusqlite::params![format!("EPSG:{epsg}"), epsg],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO gpkg_contents VALUES (?1, 'features', ?1, ?2)",
        rusqlite::params![table, epsg],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO gpkg_geometry_columns VALUES (?1, 'geom', 'GEOMETRY', ?2, 0, 0)",
        rusqlite::params![table, epsg],
    )
    .unwrap();

    let column_defs: Vec<String> = columns.iter().map(|c| format!("\"{c}\"")).collect();
    conn.execute_batch(&format!(
        "CREATE TABLE \"{table}\" (fid INTEGER PRIMARY KEY AUTOINCREMENT, geom BLOB, {});",
        column_defs.join(", ")
    ))
    .unwrap();

    let placeholders: Vec<String> = (0..=columns.len()).map(|i| format!("?{}", i + 1)).collect();
    let insert = format!(
        "INSERT INTO \"{table}\" (geom, {}) VALUES ({})",
        column_defs.join(", "),
        placeholders.join(", ")
    );

    for feature in features {
        let mut values = vec![rusqlite::types::Value::Blob(encode_gpkg_blob(
            &feature.geometry,
            epsg,
        ))];
        values.extend(feature.values.iter().map(to_sql));
        conn.execute(&insert, params_from_iter(values)).unwrap();
    }
}

/// Which parts of the dataset a fixture station appears in.
pub(crate) struct FixtureStation {
    pub id: &'static str,
    pub timeseries: bool,
    pub categories: Vec<AttributeCategory>,
    pub catchments: usize,
    pub locations: usize,
}

impl FixtureStation {
    /// A station present exactly once in every source.
    pub fn complete(id: &'static str) -> Self {
        Self {
            id,
            timeseries: true,
            categories: AttributeCategory::ALL.to_vec(),
            catchments: 1,
            locations: 1,
        }
    }
}

/// LAEA position of the n-th fixture station, somewhere in Germany.
pub(crate) fn fixture_position(index: usize) -> (f64, f64) {
    (
        4_200_000.0 + index as f64 * 20_000.0,
        2_900_000.0 + index as f64 * 20_000.0,
    )
}

/// Write a complete CAMELS-DE directory tree for the given stations.
pub(crate) fn create_dataset(dir: &Path, stations: &[FixtureStation]) {
    fs::create_dir_all(layout::timeseries_dir(dir)).unwrap();

    for station in stations.iter().filter(|s| s.timeseries) {
        fs::write(
            layout::timeseries_path(dir, station.id),
            "date,discharge_vol_obs,precipitation_mean,temperature_mean\n\
             1951-01-01,1.25,0.0,-2.5\n\
             1951-01-02,1.5,3.2,\n\
             1951-01-03,1.75,0.4,1.0\n",
        )
        .unwrap();
    }

    for category in AttributeCategory::ALL {
        let mut csv = match category {
            AttributeCategory::Topographic => String::from(
                "gauge_id,provider_id,gauge_name,water_body_name,federal_state,\
                 gauge_lat,gauge_lon,area\n",
            ),
            _ => format!("gauge_id,{}_value\n", category.key()),
        };

        for (i, station) in stations.iter().enumerate() {
            if !station.categories.contains(&category) {
                continue;
            }
            match category {
                AttributeCategory::Topographic => csv.push_str(&format!(
                    "{},{},Gauge {},River {},BW,{},{},{}\n",
                    station.id,
                    100 + i,
                    i,
                    i,
                    47.9 + i as f64,
                    8.1 + i as f64,
                    15.5
                )),
                _ => csv.push_str(&format!("{},{}\n", station.id, i)),
            }
        }

        fs::write(layout::attributes_path(dir, category), csv).unwrap();
    }

    let mut catchments = Vec::new();
    let mut locations = Vec::new();
    for (i, station) in stations.iter().enumerate() {
        let (x, y) = fixture_position(i);
        for _ in 0..station.catchments {
            catchments.push(FixtureFeature::new(
                GeoJsonValue::Polygon(vec![vec![
                    vec![x - 5_000.0, y - 5_000.0],
                    vec![x + 5_000.0, y - 5_000.0],
                    vec![x + 5_000.0, y + 5_000.0],
                    vec![x - 5_000.0, y - 5_000.0],
                ]]),
                &[
                    json!(station.id),
                    json!(format!("Gauge {i}")),
                    json!("ok"),
                    json!(100.0),
                    json!(101.0),
                    json!("BW"),
                ],
            ));
        }
        for _ in 0..station.locations {
            locations.push(FixtureFeature::new(
                GeoJsonValue::Point(vec![x, y]),
                &[json!(station.id), json!(format!("Gauge {i}"))],
            ));
        }
    }

    create_geopackage(
        &layout::catchments_path(dir),
        "CAMELS_DE_catchments",
        3035,
        &["id", "name", "result", "area_calc", "area_reported", "federal_state"],
        &catchments,
    );
    create_geopackage(
        &layout::gauging_stations_path(dir),
        "CAMELS_DE_gauging_stations",
        3035,
        &["gauge_id", "gauge_name"],
        &locations,
    );
}
