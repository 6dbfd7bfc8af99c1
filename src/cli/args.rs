use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "s5p-downloader")]
#[command(about = "Sentinel-5P TROPOMI product downloader and L3 grid inspector")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download products for a date range and bounding box
    Download {
        #[arg(long, default_value = "sentinel-5p")]
        mission: String,

        #[arg(short, long, help = "Processing level (L2 or L3)")]
        level: String,

        #[arg(short, long, help = "Chemical species, e.g. NO2")]
        parameter: String,

        #[arg(short, long, help = "First day, YYYY-MM-DD")]
        start: String,

        #[arg(short, long, help = "Last day (inclusive), YYYY-MM-DD")]
        end: String,

        #[arg(
            long,
            num_args = 4,
            value_names = ["LON_MIN", "LON_MAX", "LAT_MIN", "LAT_MAX"],
            allow_negative_numbers = true,
            default_values_t = [-180.0, 180.0, -90.0, 90.0]
        )]
        bbox: Vec<f64>,

        #[arg(short, long, default_value = "query", help = "Search type (manual or query)")]
        input_type: String,

        #[arg(long, help = "Hub file identifier (manual mode)")]
        file_id: Option<String>,

        #[arg(long, help = "Local product file name (manual mode)")]
        product_name: Option<String>,

        #[arg(long, help = "Product index to take for every day instead of prompting")]
        select: Option<usize>,

        #[arg(short, long, help = "Output root directory [default: from settings]")]
        output_root: Option<PathBuf>,

        #[arg(short, long, help = "Suppress progress output")]
        quiet: bool,
    },

    /// Show the period units a date range expands to
    Plan {
        #[arg(short, long)]
        level: String,

        #[arg(short, long)]
        start: String,

        #[arg(short, long)]
        end: String,
    },

    /// Decode an L3 grid file and print a summary
    Inspect {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, help = "Month of the grid, YYYY-MM [default: from file name]")]
        month: Option<String>,

        #[arg(long, help = "Print the value at LAT LON", num_args = 2, allow_negative_numbers = true)]
        at: Option<Vec<f64>>,
    },
}
