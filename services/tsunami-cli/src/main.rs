//! Command-line front end for tsunami source rasters and snapshot files.
//!
//! Derives simulation grids from bathymetry, writes the initial snapshot of
//! a tsunami event and summarises existing snapshot files.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "tsunami-cli")]
#[command(about = "Prepare and inspect tsunami simulation snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show a bathymetry raster's extent and the grid derived from it
    Grid {
        /// Bathymetry raster (x, y, z)
        #[arg(short, long)]
        bathymetry: PathBuf,

        /// Number of simulation cells in x
        #[arg(long, default_value = "100")]
        nx: usize,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Sample the tsunami event and write the initial snapshot
    Init {
        /// YAML configuration file (TSUNAMI_* variables override it)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the number of cells in x
        #[arg(long)]
        nx: Option<usize>,

        /// Override the output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarise a snapshot file
    Inspect {
        /// Snapshot file written by `init` or a solver
        snapshot: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs)?;
    nc_store::silence_hdf5_errors();

    info!(command = ?cli.command, "Starting tsunami-cli");

    match cli.command {
        Commands::Grid {
            bathymetry,
            nx,
            json,
        } => commands::grid(&bathymetry, nx, json),
        Commands::Init { config, nx, output } => {
            commands::init(config.as_deref(), nx, output)
        }
        Commands::Inspect { snapshot, json } => commands::inspect(&snapshot, json),
    }
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    if json {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .with_writer(std::io::stderr)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}
