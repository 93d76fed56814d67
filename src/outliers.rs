//! Outlier audit: rows whose coordinates fall outside every region.
//!
//! Runs straight off the table, independently of the record store, so the
//! source extract can be corrected by hand.

use tracing::debug;

use crate::coords::{resolve_coordinate, CoordinateRules};
use crate::models::UNKNOWN_REGION;
use crate::pip::RegionLocator;
use crate::table::TableRow;

/// A row that could not be placed in any region
#[derive(Debug, Clone, PartialEq)]
pub struct Outlier {
    /// 1-based row number counting the header
    pub row_number: usize,
    pub name: String,
    pub address: String,
    /// Raw latitude cell
    pub latitude: String,
    /// Raw longitude cell
    pub longitude: String,
    /// Raw district tag
    pub district: String,
}

#[derive(Debug, Clone, Default)]
pub struct OutlierReport {
    /// Rows that produced a usable coordinate and were run through the locator
    pub examined: usize,
    /// Rows skipped before lookup (malformed, or rejected coordinates)
    pub unusable: usize,
    pub outliers: Vec<Outlier>,
}

/// Collect every row whose repaired coordinate matches no region.
///
/// Only coordinate repair is applied; unlike ingestion, the district tag is
/// not checked.
pub fn audit(rows: &[TableRow], locator: &RegionLocator, rules: &CoordinateRules) -> OutlierReport {
    let mut report = OutlierReport::default();

    for row in rows {
        let record = match &row.record {
            Ok(r) => r,
            Err(e) => {
                debug!("Row {} not audited: {}", row.row_number, e);
                report.unusable += 1;
                continue;
            }
        };

        let coordinate = match resolve_coordinate(
            record.latitude.as_deref(),
            record.longitude.as_deref(),
            rules,
        ) {
            Ok(c) => c,
            Err(e) => {
                debug!("Row {} not audited: {}", row.row_number, e);
                report.unusable += 1;
                continue;
            }
        };

        report.examined += 1;

        // Unnamed features resolve to the sentinel, which ingestion treats as unresolved
        if matches!(locator.locate(coordinate), None | Some(UNKNOWN_REGION)) {
            report.outliers.push(Outlier {
                row_number: row.row_number,
                name: record.name.clone(),
                address: record.address.clone().unwrap_or_default(),
                latitude: record.latitude.clone().unwrap_or_default(),
                longitude: record.longitude.clone().unwrap_or_default(),
                district: record.district.clone(),
            });
        }
    }

    report
}

impl OutlierReport {
    pub fn len(&self) -> usize {
        self.outliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outliers.is_empty()
    }

    /// Render as a markdown table
    pub fn to_markdown(&self) -> String {
        let mut markdown = String::from("| Row | Name | Address | Latitude | Longitude | District |\n");
        markdown.push_str("|---|---|---|---|---|---|\n");

        for o in &self.outliers {
            markdown.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                o.row_number,
                cell(&o.name),
                cell(&o.address),
                cell(&o.latitude),
                cell(&o.longitude),
                cell(&o.district)
            ));
        }

        markdown
    }
}

fn cell(value: &str) -> String {
    value.replace('|', "\\|")
}
