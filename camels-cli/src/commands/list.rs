use anyhow::Result;
use std::path::PathBuf;

use super::open_service;

pub fn run(data_dir: Option<PathBuf>) -> Result<()> {
    let service = open_service(data_dir)?;
    let ids = service.station_ids();

    if ids.is_empty() {
        println!(
            "No time series files found in: {}",
            camels::layout::timeseries_dir(service.data_dir()).display()
        );
        return Ok(());
    }

    for id in &ids {
        println!("{}", id);
    }

    // Summary on stderr so stdout stays a plain id list
    eprintln!();
    eprintln!("Summary:");
    eprintln!("  Total stations: {}", ids.len());
    eprintln!("  Data directory: {}", service.data_dir().display());

    Ok(())
}
