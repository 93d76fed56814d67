//! Ingestion pipeline: table rows -> repaired, region-tagged outlets -> store.
//!
//! Ingestion runs at most once per store. If the store already holds any
//! outlet the run is skipped without writing. Callers must not run two
//! ingestions against the same store concurrently: both could observe an
//! empty store and insert twice.

use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use std::collections::HashMap;
use tracing::{debug, info};
use xxhash_rust::xxh64::xxh64;

use crate::coords::{resolve_coordinate, CoordinateRules};
use crate::error::{Result, RowError};
use crate::models::{District, Outlet, UNKNOWN_ADDRESS, UNKNOWN_REGION};
use crate::pip::RegionLocator;
use crate::store::OutletStore;
use crate::table::{RawRecord, TableRow};

/// Per-reason counts of rows left out of the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipCounts {
    /// Wrong column count or cells that do not decode
    pub malformed: usize,
    pub unrecognized_district: usize,
    pub invalid_coordinate: usize,
    pub unrecoverable_coordinate: usize,
}

impl SkipCounts {
    fn record(&mut self, error: &RowError) {
        match error {
            RowError::MalformedRow { .. } | RowError::UndecodableRow(_) => {
                self.malformed += 1
            }
            RowError::UnrecognizedDistrictTag(_) => self.unrecognized_district += 1,
            RowError::InvalidCoordinateToken(_) => self.invalid_coordinate += 1,
            RowError::CoordinateOutOfRecoverableBounds { .. } => {
                self.unrecoverable_coordinate += 1
            }
        }
    }

    pub fn total(&self) -> usize {
        self.malformed
            + self.unrecognized_district
            + self.invalid_coordinate
            + self.unrecoverable_coordinate
    }
}

/// Outcome of an ingestion run
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// The store already held a previous run; nothing was read or written
    pub already_populated: bool,
    pub rows: usize,
    pub inserted: usize,
    /// Inserted outlets tagged with [`UNKNOWN_REGION`]
    pub unresolved: usize,
    pub skipped: SkipCounts,
}

/// Deterministic outlet ids.
///
/// An id is the xxh64 of (name, address, district). The n-th repeat of the
/// same triple within one run gets a `-n` suffix, so re-ingesting the same
/// table reproduces the same ids.
#[derive(Debug, Default)]
pub struct OutletIds {
    seen: HashMap<u64, usize>,
}

impl OutletIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, name: &str, address: &str, district: District) -> String {
        let key = format!("{}\u{1f}{}\u{1f}{}", name, address, district);
        let hash = xxh64(key.as_bytes(), 0);

        let repeats = self.seen.entry(hash).or_insert(0);
        let id = if *repeats == 0 {
            format!("outlet-{:016x}", hash)
        } else {
            format!("outlet-{:016x}-{}", hash, repeats)
        };
        *repeats += 1;
        id
    }
}

/// Populate an empty store from the table rows.
///
/// Rows with an unrecognized district tag or unusable coordinates are
/// skipped. Outlets outside every region are kept with [`UNKNOWN_REGION`].
/// All accepted outlets are written in a single bulk insert; a failure of
/// that write aborts the run.
pub fn ingest<S: OutletStore + ?Sized>(
    rows: &[TableRow],
    locator: &RegionLocator,
    rules: &CoordinateRules,
    store: &mut S,
    progress: &ProgressBar,
) -> Result<IngestReport> {
    let existing = store.count()?;
    if existing > 0 {
        info!("Store already populated with {} outlets, skipping ingestion", existing);
        return Ok(IngestReport {
            already_populated: true,
            ..IngestReport::default()
        });
    }

    info!("Store empty, ingesting {} rows", rows.len());

    let ingested_at = Utc::now();
    let mut ids = OutletIds::new();
    let mut report = IngestReport {
        rows: rows.len(),
        ..IngestReport::default()
    };
    let mut outlets = Vec::with_capacity(rows.len());

    for row in rows {
        progress.inc(1);

        let built = row
            .record
            .as_ref()
            .map_err(|e| e.clone())
            .and_then(|record| build_outlet(record, locator, rules, &mut ids, ingested_at));

        match built {
            Ok(outlet) => {
                if !outlet.is_resolved() {
                    report.unresolved += 1;
                }
                outlets.push(outlet);
            }
            Err(e) => {
                debug!("Skipping row {}: {}", row.row_number, e);
                report.skipped.record(&e);
            }
        }
    }

    if !outlets.is_empty() {
        store.bulk_insert(&outlets)?;
    }
    report.inserted = outlets.len();

    info!(
        "Added {} outlets ({} unresolved, {} rows skipped)",
        report.inserted,
        report.unresolved,
        report.skipped.total()
    );

    Ok(report)
}

/// Turn one raw record into an outlet, or say why it cannot be kept
pub fn build_outlet(
    record: &RawRecord,
    locator: &RegionLocator,
    rules: &CoordinateRules,
    ids: &mut OutletIds,
    ingested_at: DateTime<Utc>,
) -> Result<Outlet, RowError> {
    let district = District::from_tag(&record.district)
        .ok_or_else(|| RowError::UnrecognizedDistrictTag(record.district.clone()))?;

    let coordinate = resolve_coordinate(
        record.latitude.as_deref(),
        record.longitude.as_deref(),
        rules,
    )?;

    let admin_region = locator.locate(coordinate).unwrap_or(UNKNOWN_REGION).to_string();

    let address = record
        .address
        .as_deref()
        .filter(|a| !a.is_empty())
        .unwrap_or(UNKNOWN_ADDRESS)
        .to_string();

    Ok(Outlet {
        id: ids.assign(&record.name, &address, district),
        name: record.name.clone(),
        address,
        phone: record.phone.clone().filter(|p| !p.is_empty()),
        outlet_type: record.outlet_type.clone(),
        coordinate,
        district,
        admin_region,
        ingested_at,
        products: Vec::new(),
    })
}
