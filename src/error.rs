//! Error types for the ingestion pipeline.
//!
//! [`Error`] covers infrastructure failures that abort a run (store, boundary
//! dataset, unreadable table). [`RowError`] covers per-row problems, which are
//! counted and skipped but never abort a batch.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load boundary dataset {path}: {reason}")]
    BoundaryDatasetLoad { path: PathBuf, reason: String },

    #[error("Failed to open record store at {path}: {source}")]
    StoreOpen {
        path: PathBuf,
        #[source]
        source: sled::Error,
    },

    // Fatal for an ingestion run, no partial-state recovery is attempted
    #[error("Record store write failed: {0}")]
    StoreWrite(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Record store read failed: {0}")]
    StoreRead(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Stored outlet {id} could not be decoded: {source}")]
    CorruptRecord {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Outlet table is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Failed to read outlet table: {0}")]
    Table(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reasons a single table row is skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("Expected {expected} columns, found {found}")]
    MalformedRow { expected: usize, found: usize },

    #[error("Row could not be decoded: {0}")]
    UndecodableRow(String),

    #[error("Unrecognized district tag {0:?}")]
    UnrecognizedDistrictTag(String),

    #[error("Invalid coordinate token {0:?}")]
    InvalidCoordinateToken(String),

    #[error("Coordinate (lat {lat}, lng {lng}) is a placeholder near the origin")]
    CoordinateOutOfRecoverableBounds { lat: f64, lng: f64 },
}
