//! Fixture dataset for integration tests.

use std::fs;
use std::path::Path;

use camels::attributes::AttributeCategory;
use camels::layout;
use camels::wkb::encode_gpkg_blob;
use geojson::Value as GeoJsonValue;
use rusqlite::{params, Connection};

/// LAEA position of the n-th station.
fn position(index: usize) -> (f64, f64) {
    (
        4_200_000.0 + index as f64 * 25_000.0,
        2_900_000.0 + index as f64 * 25_000.0,
    )
}

/// Create an empty GeoPackage with one feature table in EPSG:3035.
fn create_geopackage(path: &Path, table: &str, columns: &str) -> Connection {
    fs::create_dir_all(path.parent().unwrap()).unwrap();

    let conn = Connection::open(path).unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE gpkg_spatial_ref_sys (
            srs_name TEXT NOT NULL,
            srs_id INTEGER PRIMARY KEY,
            organization TEXT NOT NULL,
            organization_coordsys_id INTEGER NOT NULL,
            definition TEXT NOT NULL
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
        );
        INSERT INTO gpkg_spatial_ref_sys
            VALUES ('ETRS89-extended / LAEA Europe', 3035, 'EPSG', 3035, 'undefined');
        INSERT INTO gpkg_contents VALUES ('{table}', 'features', '{table}', 3035);
        INSERT INTO gpkg_geometry_columns VALUES ('{table}', 'geom', 'GEOMETRY', 3035, 0, 0);
        CREATE TABLE \"{table}\" (fid INTEGER PRIMARY KEY AUTOINCREMENT, geom BLOB, {columns});"
    ))
    .unwrap();

    conn
}

/// Write a dataset in which every listed station is complete.
///
/// Stations listed in `without_catchment` get every source except a catchment
/// boundary.
pub fn create_dataset(dir: &Path, stations: &[&str], without_catchment: &[&str]) {
    fs::create_dir_all(layout::timeseries_dir(dir)).unwrap();

    for id in stations {
        fs::write(
            layout::timeseries_path(dir, id),
            "date,discharge_vol_obs,precipitation_mean\n\
             2020-01-01,1.5,0.2\n\
             2020-01-02,,3.4\n",
        )
        .unwrap();
    }

    for category in AttributeCategory::ALL {
        let mut csv = match category {
            AttributeCategory::Topographic => {
                String::from("gauge_id,gauge_name,water_body_name,gauge_lat,gauge_lon\n")
            }
            _ => format!("gauge_id,{}_index\n", category.key()),
        };
        for (i, id) in stations.iter().enumerate() {
            match category {
                AttributeCategory::Topographic => csv.push_str(&format!(
                    "{id},Gauge {i},River {i},{},{}\n",
                    48.0 + i as f64,
                    9.0 + i as f64
                )),
                _ => csv.push_str(&format!("{id},{i}\n")),
            }
        }
        fs::write(layout::attributes_path(dir, category), csv).unwrap();
    }

    let catchments = create_geopackage(
        &layout::catchments_path(dir),
        "CAMELS_DE_catchments",
        "id TEXT, name TEXT, area_calc REAL, area_reported REAL, federal_state TEXT",
    );
    let gauges = create_geopackage(
        &layout::gauging_stations_path(dir),
        "CAMELS_DE_gauging_stations",
        "gauge_id TEXT, gauge_name TEXT",
    );

    for (i, id) in stations.iter().enumerate() {
        let (x, y) = position(i);

        if !without_catchment.contains(id) {
            let ring = vec![
                vec![x - 4_000.0, y - 4_000.0],
                vec![x + 4_000.0, y - 4_000.0],
                vec![x, y + 4_000.0],
                vec![x - 4_000.0, y - 4_000.0],
            ];
            let blob = encode_gpkg_blob(&GeoJsonValue::Polygon(vec![ring]), 3035);
            catchments
                .execute(
                    "INSERT INTO CAMELS_DE_catchments (geom, id, name, area_calc, area_reported, federal_state)
                     VALUES (?1, ?2, ?3, 42.0, 41.5, 'NI')",
                    params![blob, id, format!("Gauge {i}")],
                )
                .unwrap();
        }

        let blob = encode_gpkg_blob(&GeoJsonValue::Point(vec![x, y]), 3035);
        gauges
            .execute(
                "INSERT INTO CAMELS_DE_gauging_stations (geom, gauge_id, gauge_name) VALUES (?1, ?2, ?3)",
                params![blob, id, format!("Gauge {i}")],
            )
            .unwrap();
    }
}

/// Insert a second catchment boundary for a station that already has one.
pub fn duplicate_catchment(dir: &Path, station_id: &str) {
    let conn = Connection::open(layout::catchments_path(dir)).unwrap();
    let inserted = conn
        .execute(
            "INSERT INTO CAMELS_DE_catchments (geom, id, name, area_calc, area_reported, federal_state)
             SELECT geom, id, name, area_calc, area_reported, federal_state
             FROM CAMELS_DE_catchments WHERE id = ?1",
            params![station_id],
        )
        .unwrap();
    assert_eq!(inserted, 1);
}
