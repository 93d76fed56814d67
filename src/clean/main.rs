//! Coordinate cleaning pass over the outlet table.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use atlas::cleaning::clean_file;
use atlas::config::Config;

#[derive(Parser, Debug)]
#[command(name = "clean")]
#[command(about = "Repair coordinate columns and drop unusable rows")]
struct Args {
    /// Config file (defaults to ./atlas.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Outlet table (CSV)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Write here instead of rewriting the table in place
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
    let input = args.file.unwrap_or(config.paths.outlets);
    let output = args.output.unwrap_or_else(|| input.clone());

    let report = clean_file(&input, &output, &config.rules)
        .with_context(|| format!("Failed to clean {}", input.display()))?;

    println!("Cleanup complete. Processed {} rows.", report.rows);
    println!("Kept: {}", report.kept);
    println!("Dropped/Invalid: {}", report.dropped);
    if report.passed_through > 0 {
        println!("Malformed (left unchanged): {}", report.passed_through);
    }

    Ok(())
}
