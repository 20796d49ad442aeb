use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{open_service, print_json};

pub fn run(data_dir: Option<PathBuf>, pretty: bool) -> Result<()> {
    let service = open_service(data_dir)?;

    let collection = service
        .gauge_locations()
        .context("Failed to read gauge locations")?;

    print_json(&collection, pretty)
}
