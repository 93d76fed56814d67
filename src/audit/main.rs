//! Outlier audit.
//!
//! Lists every table row whose coordinate falls outside all region
//! boundaries so the source extract can be corrected by hand.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use atlas::config::Config;
use atlas::outliers::audit;
use atlas::pip::{load_boundaries, RegionLocator};
use atlas::table::open_table;

#[derive(Parser, Debug)]
#[command(name = "audit")]
#[command(about = "Report outlets that fall outside every region")]
struct Args {
    /// Config file (defaults to ./atlas.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Outlet table (CSV)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Region boundaries (GeoJSON FeatureCollection)
    #[arg(long)]
    boundaries: Option<PathBuf>,

    /// Markdown report destination
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::discover(args.config.as_deref())?;
    let table_path = args.file.unwrap_or(config.paths.outlets);
    let boundaries_path = args.boundaries.unwrap_or(config.paths.boundaries);
    let output = args.output.unwrap_or(config.paths.outliers_report);

    let features = load_boundaries(&boundaries_path).context("Failed to load region boundaries")?;
    let locator = RegionLocator::new(features);

    let rows = open_table(&table_path).context("Failed to read outlet table")?;
    let report = audit(&rows, &locator, &config.rules);

    println!("Found {} outliers.", report.len());
    info!(
        "Examined {} rows, {} had no usable coordinate",
        report.examined, report.unusable
    );

    fs::write(&output, report.to_markdown()).context("Failed to write outlier report")?;
    println!("Report written to {}", output.display());

    Ok(())
}
