use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{open_service, print_json};

pub fn run(data_dir: Option<PathBuf>, station_id: String, pretty: bool) -> Result<()> {
    let service = open_service(data_dir)?;

    let response = service
        .station_response(&station_id)
        .with_context(|| format!("Failed to read station {}", station_id))?;

    print_json(&response, pretty)
}
