//! Cleaning pass over the outlet table.
//!
//! Rewrites the longitude/latitude columns with repaired values and drops rows
//! whose coordinates cannot be repaired. All other cells are copied through.

use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::coords::{resolve_coordinate, CoordinateRules};
use crate::error::{Error, Result};
use crate::table::{LATITUDE_COLUMN, LONGITUDE_COLUMN};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Data rows read
    pub rows: usize,
    /// Data rows written
    pub kept: usize,
    /// Rows whose coordinates could not be repaired or that could not be read
    pub dropped: usize,
    /// Rows with fewer columns than the header, written unchanged
    pub passed_through: usize,
}

/// Clean a table from `reader` into `writer`.
///
/// Cells are handled as raw bytes, so a row in another encoding is only
/// decoded where its coordinates are read and is otherwise copied verbatim.
pub fn clean_table<R: Read, W: Write>(
    reader: R,
    writer: W,
    rules: &CoordinateRules,
) -> Result<CleanReport> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let mut csv_writer = WriterBuilder::new().flexible(true).from_writer(writer);

    let headers = csv_reader.byte_headers()?.clone();
    let lng_idx = column(&headers, LONGITUDE_COLUMN)?;
    let lat_idx = column(&headers, LATITUDE_COLUMN)?;

    csv_writer.write_byte_record(&headers)?;

    let mut report = CleanReport::default();

    for (index, result) in csv_reader.byte_records().enumerate() {
        let row_number = index + 2;
        report.rows += 1;

        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                debug!("Dropping unreadable row {}: {}", row_number, e);
                report.dropped += 1;
                continue;
            }
        };

        // Short rows are copied as is; extra trailing cells do not matter
        if record.len() < headers.len() {
            csv_writer.write_byte_record(&record)?;
            report.passed_through += 1;
            report.kept += 1;
            continue;
        }

        let lat_token = String::from_utf8_lossy(&record[lat_idx]);
        let lng_token = String::from_utf8_lossy(&record[lng_idx]);

        match resolve_coordinate(Some(lat_token.trim()), Some(lng_token.trim()), rules) {
            Ok(coordinate) => {
                let lng = coordinate.lng.to_string();
                let lat = coordinate.lat.to_string();
                let cleaned: ByteRecord = record
                    .iter()
                    .enumerate()
                    .map(|(i, field)| {
                        if i == lng_idx {
                            lng.as_bytes()
                        } else if i == lat_idx {
                            lat.as_bytes()
                        } else {
                            field
                        }
                    })
                    .collect();
                csv_writer.write_byte_record(&cleaned)?;
                report.kept += 1;
            }
            Err(e) => {
                debug!("Dropping row {}: {}", row_number, e);
                report.dropped += 1;
            }
        }
    }

    csv_writer.flush()?;
    Ok(report)
}

/// Clean `input` into `output`. The two may be the same file: the result is
/// written to a temporary file next to `output` and moved into place.
pub fn clean_file(input: &Path, output: &Path, rules: &CoordinateRules) -> Result<CleanReport> {
    info!("Cleaning {} into {}", input.display(), output.display());

    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let source = File::open(input)?;
    let mut staged = NamedTempFile::new_in(dir)?;
    let report = clean_table(source, staged.as_file_mut(), rules)?;
    staged.persist(output).map_err(|e| e.error)?;

    info!(
        "Cleanup complete: kept {}, dropped {}",
        report.kept, report.dropped
    );
    Ok(report)
}

fn column(headers: &ByteRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| String::from_utf8_lossy(h).trim() == name)
        .ok_or_else(|| Error::MissingColumn(name.to_string()))
}
