use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

/// CAMELS-DE dataset CLI tool
#[derive(Parser)]
#[command(name = "camels")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Root of the CAMELS-DE dataset
    #[arg(short, long, env = "CAMELS_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the combined record of one station as JSON
    Station {
        /// Station id (e.g., DE110000)
        station_id: String,
    },

    /// Print all gauge locations as a GeoJSON FeatureCollection
    Locations,

    /// List the ids of all stations with a time series
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Station { station_id } => {
            commands::station::run(cli.data_dir, station_id, cli.pretty)
        }
        Commands::Locations => commands::locations::run(cli.data_dir, cli.pretty),
        Commands::List => commands::list::run(cli.data_dir),
    }
}
