use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_DATA_PATH: &str = "integrated_water_related_data.csv";

/// Wastewater Health Impact Dashboard
#[derive(Debug, Clone, Parser)]
#[command(name = "wastewater-dashboard", version, about)]
pub struct Config {
    /// Dataset to load at startup (.csv, .tsv, .json, .parquet)
    #[arg(long, env = "WASTEWATER_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Entity selected on first render; defaults to the first one in the file
    #[arg(long)]
    pub entity: Option<String>,

    /// Initial window width in points
    #[arg(long, default_value_t = 1280.0)]
    pub width: f32,

    /// Initial window height in points
    #[arg(long, default_value_t = 900.0)]
    pub height: f32,
}
