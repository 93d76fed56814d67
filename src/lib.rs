//! Atlas - outlet ingestion and administrative region resolution
//!
//! This library provides the pipeline shared by the ingest, audit and clean
//! binaries: coordinate repair, point-in-polygon region lookup, idempotent
//! ingestion into a record store and the derived region tree.

pub mod cleaning;
pub mod config;
pub mod coords;
pub mod error;
pub mod hierarchy;
pub mod models;
pub mod outliers;
pub mod pip;
pub mod pipeline;
pub mod store;
pub mod table;

pub use error::{Error, Result, RowError};
pub use models::{Coordinate, District, Outlet, RegionTree, UNKNOWN_REGION};
