//! Record store holding the ingested outlets.
//!
//! The store is the single ingestion checkpoint: either it is empty and gets
//! fully populated, or it holds a previous complete run.

mod sled_store;

pub use sled_store::{SledStore, SCHEMA_VERSION};

use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::Outlet;

/// Keyed outlet collection. Only the ingestion pipeline writes to it.
pub trait OutletStore {
    fn count(&self) -> Result<usize>;

    /// Persist all records in one write. Records are keyed by id.
    fn bulk_insert(&mut self, outlets: &[Outlet]) -> Result<()>;

    fn clear(&mut self) -> Result<()>;

    fn scan_all(&self) -> Result<Vec<Outlet>>;
}

/// In-process store, used by tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    outlets: BTreeMap<String, Outlet>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of write operations (bulk inserts and clears) applied
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl OutletStore for MemoryStore {
    fn count(&self) -> Result<usize> {
        Ok(self.outlets.len())
    }

    fn bulk_insert(&mut self, outlets: &[Outlet]) -> Result<()> {
        self.writes += 1;
        for outlet in outlets {
            self.outlets.insert(outlet.id.clone(), outlet.clone());
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.writes += 1;
        self.outlets.clear();
        Ok(())
    }

    fn scan_all(&self) -> Result<Vec<Outlet>> {
        Ok(self.outlets.values().cloned().collect())
    }
}
