pub mod list;
pub mod locations;
pub mod station;

use anyhow::{Context, Result};
use camels::{CamelsService, CamelsServiceBuilder};
use serde::Serialize;
use std::path::PathBuf;

/// Open the dataset from `--data-dir`, falling back to `CAMELS_DATA_DIR`.
pub fn open_service(data_dir: Option<PathBuf>) -> Result<CamelsService> {
    let builder = match data_dir {
        Some(dir) => CamelsServiceBuilder::new(dir),
        None => CamelsServiceBuilder::from_env().context(
            "CAMELS_DATA_DIR environment variable not set. Use --data-dir or set CAMELS_DATA_DIR",
        )?,
    };

    builder.build().context("Failed to open CAMELS-DE data directory")
}

/// Print a value as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
