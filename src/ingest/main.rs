//! Outlet ingest pipeline.
//!
//! Parses the outlet table, repairs coordinates, performs PIP lookups against
//! the region boundaries and populates the record store once. Afterwards the
//! store is read back into the region tree.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use atlas::config::Config;
use atlas::hierarchy;
use atlas::pip::{load_boundaries, RegionLocator};
use atlas::pipeline::ingest;
use atlas::store::{OutletStore, SledStore};
use atlas::table::open_table;

#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Ingest the outlet table into the record store")]
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

    /// Record store directory
    #[arg(long)]
    store: Option<PathBuf>,

    /// Write the region tree as JSON
    #[arg(long)]
    tree_out: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Atlas Ingest Pipeline");

    let config = Config::discover(args.config.as_deref())?;
    let table_path = args.file.unwrap_or(config.paths.outlets);
    let boundaries_path = args.boundaries.unwrap_or(config.paths.boundaries);
    let store_path = args.store.unwrap_or(config.paths.store);

    // The locator cannot operate without boundaries
    let features = load_boundaries(&boundaries_path).context("Failed to load region boundaries")?;
    let locator = RegionLocator::new(features);
    info!("PIP locator ready with {} regions", locator.len());

    let mut store = SledStore::open(&store_path).context("Failed to open record store")?;

    let rows = open_table(&table_path).context("Failed to read outlet table")?;

    let pb = ProgressBar::new(rows.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )?
            .progress_chars("#>-"),
    );

    let report = ingest(&rows, &locator, &config.rules, &mut store, &pb)
        .context("Ingestion failed")?;
    pb.finish_and_clear();

    if report.already_populated {
        info!("Store already populated, nothing ingested");
    } else {
        info!(
            "Ingested {} of {} rows ({} unresolved)",
            report.inserted, report.rows, report.unresolved
        );
        info!(
            "Skipped: {} malformed, {} unrecognized district, {} invalid coordinate, {} null coordinate",
            report.skipped.malformed,
            report.skipped.unrecognized_district,
            report.skipped.invalid_coordinate,
            report.skipped.unrecoverable_coordinate
        );
    }

    // Read back and build the tree
    let outlets = store.scan_all().context("Failed to scan record store")?;
    let total = outlets.len();
    let unresolved = outlets.iter().filter(|o| !o.is_resolved()).count();
    let tree = hierarchy::build(outlets);

    info!("Store holds {} outlets", total);
    for district in &tree.districts {
        info!("{} ({} outlets)", district.name, district.outlet_count());
        for region in &district.regions {
            info!("  {}: {}", region.name, region.outlets.len());
        }
    }

    if unresolved > 0 {
        warn!(
            "{} outlets are outside every region and left out of the tree; run `audit` to list them",
            unresolved
        );
    }

    if let Some(path) = args.tree_out {
        let file = File::create(&path).context("Failed to create tree output file")?;
        serde_json::to_writer_pretty(BufWriter::new(file), &tree)
            .context("Failed to write region tree")?;
        info!("Region tree written to {}", path.display());
    }

    Ok(())
}
