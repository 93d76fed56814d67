//! Outlet table parsing.
//!
//! The source extract is a CSV with a header row:
//!
//! ```text
//! CUST_Type,CUST_Name,phoneNumber,address,district,longitude,latitude
//! Mainstream,"LOME SPOT(A3)",244470385,"Somanya","South",0.09270,6.23685
//! ```

use csv::{ByteRecord, ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Error, Result, RowError};

/// Header names of the coordinate columns
pub const LONGITUDE_COLUMN: &str = "longitude";
pub const LATITUDE_COLUMN: &str = "latitude";

/// Columns every table must carry (source header names)
const REQUIRED_COLUMNS: &[(&str, &str)] = &[
    ("CUST_Type", "outlet_type"),
    ("CUST_Name", "name"),
    ("address", "address"),
    ("district", "district"),
    (LONGITUDE_COLUMN, LONGITUDE_COLUMN),
    (LATITUDE_COLUMN, LATITUDE_COLUMN),
];

/// One data row as it appears in the source. Never persisted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "CUST_Type", alias = "outlet_type", default)]
    pub outlet_type: String,

    #[serde(rename = "CUST_Name", alias = "name", default)]
    pub name: String,

    #[serde(rename = "phoneNumber", alias = "phone", default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    /// Coarse district tag, validated later
    #[serde(default)]
    pub district: String,

    #[serde(default)]
    pub longitude: Option<String>,

    #[serde(default)]
    pub latitude: Option<String>,
}

/// A parsed data row with its position in the source file
#[derive(Debug, Clone)]
pub struct TableRow {
    /// 1-based, counting the header (first data row is 2)
    pub row_number: usize,
    pub record: Result<RawRecord, RowError>,
}

/// Open an outlet table. `.gz` files are decompressed.
pub fn open_table(path: &Path) -> Result<Vec<TableRow>> {
    info!("Loading outlet table from {}", path.display());

    let file = File::open(path)?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let rows = read_table(reader)?;
    info!("Loaded {} table rows", rows.len());
    Ok(rows)
}

/// Parse a table. Rows with the wrong column count or cells that do not
/// decode are returned as [`RowError`]s rather than failing the whole read;
/// only I/O errors abort.
pub fn read_table<R: Read>(reader: R) -> Result<Vec<TableRow>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    check_columns(&headers)?;
    let byte_headers = headers.as_byte_record().clone();

    let mut rows = Vec::new();

    for (index, result) in csv_reader.byte_records().enumerate() {
        let row_number = index + 2;

        let parsed = match result {
            Ok(record) => parse_row(&record, &byte_headers, row_number),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                debug!("Row {} could not be read: {}", row_number, e);
                Err(RowError::UndecodableRow(e.to_string()))
            }
        };

        rows.push(TableRow {
            row_number,
            record: parsed,
        });
    }

    Ok(rows)
}

fn parse_row(
    record: &ByteRecord,
    headers: &ByteRecord,
    row_number: usize,
) -> Result<RawRecord, RowError> {
    if record.len() != headers.len() {
        debug!(
            "Row {} has {} columns, expected {}",
            row_number,
            record.len(),
            headers.len()
        );
        return Err(RowError::MalformedRow {
            expected: headers.len(),
            found: record.len(),
        });
    }

    // Cells are decoded per row so a stray Latin-1 byte only costs its own row
    record.deserialize::<RawRecord>(Some(headers)).map_err(|e| {
        debug!("Row {} could not be decoded: {}", row_number, e);
        RowError::UndecodableRow(e.to_string())
    })
}

fn check_columns(headers: &StringRecord) -> Result<()> {
    for (column, alias) in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column || h == *alias) {
            return Err(Error::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
CUST_Type,CUST_Name,phoneNumber,address,district,longitude,latitude
Mainstream,\"LOME SPOT(A3)\",244470385,\"Somanya\",\"South\",0.09270,6.23685
Mainstream,SUMMERSPING RESTAURANT(C3,244893525,Somanya,South,0.10095,6.09427
Premium,Broken Row,123,Accra
Mainstream,No Coords,,,North,,
";

    #[test]
    fn test_read_rows() {
        let rows = read_table(TABLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 4);

        let first = rows[0].record.as_ref().unwrap();
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(first.name, "LOME SPOT(A3)");
        assert_eq!(first.phone.as_deref(), Some("244470385"));
        assert_eq!(first.district, "South");
        assert_eq!(first.longitude.as_deref(), Some("0.09270"));
        assert_eq!(first.latitude.as_deref(), Some("6.23685"));

        assert_eq!(rows[1].record.as_ref().unwrap().name, "SUMMERSPING RESTAURANT(C3");
    }

    #[test]
    fn test_malformed_row_kept_as_error() {
        let rows = read_table(TABLE.as_bytes()).unwrap();
        assert_eq!(rows[2].row_number, 4);
        assert_eq!(
            rows[2].record,
            Err(RowError::MalformedRow {
                expected: 7,
                found: 4
            })
        );
    }

    #[test]
    fn test_empty_cells_are_none() {
        let rows = read_table(TABLE.as_bytes()).unwrap();
        let record = rows[3].record.as_ref().unwrap();
        assert_eq!(record.phone, None);
        assert_eq!(record.address, None);
        assert_eq!(record.longitude, None);
        assert_eq!(record.latitude, None);
    }

    #[test]
    fn test_undecodable_row_skipped_alone() {
        let mut table = b"CUST_Type,CUST_Name,phoneNumber,address,district,longitude,latitude\n\
Mainstream,Before,1,Somanya,South,0.1,6.2\n"
            .to_vec();
        table.extend_from_slice(b"Mainstream,Caf\xE9 Central,2,Ho,South,0.4,6.6\n");
        table.extend_from_slice(b"Mainstream,After,3,Ho,North,-0.85,9.4\n");

        let rows = read_table(&table[..]).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].record.as_ref().unwrap().name, "Before");
        assert_eq!(rows[1].row_number, 3);
        assert!(matches!(rows[1].record, Err(RowError::UndecodableRow(_))));
        assert_eq!(rows[2].row_number, 4);
        assert_eq!(rows[2].record.as_ref().unwrap().name, "After");
    }

    #[test]
    fn test_friendly_headers() {
        let table = "outlet_type,name,phone,address,district,longitude,latitude\n\
                     Mainstream,Sample Bar,000000000,Main St,South,0,6.5\n";
        let rows = read_table(table.as_bytes()).unwrap();
        let record = rows[0].record.as_ref().unwrap();
        assert_eq!(record.name, "Sample Bar");
        assert_eq!(record.outlet_type, "Mainstream");
        assert_eq!(record.phone.as_deref(), Some("000000000"));
    }

    #[test]
    fn test_missing_column() {
        let table = "CUST_Name,address,district,longitude\nA,B,North,0.1\n";
        let err = read_table(table.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(c) if c == "CUST_Type"));
    }
}
