//! Outlet store on top of sled.

use sled::{Batch, Db, Tree};
use std::path::Path;
use tracing::{debug, info};

use super::OutletStore;
use crate::error::{Error, Result};
use crate::models::Outlet;

/// Bump when the persisted outlet layout changes. Opening a store written
/// under another version clears it so the next ingestion repopulates it.
pub const SCHEMA_VERSION: u32 = 3;

const OUTLETS_TREE: &str = "outlets";
const SCHEMA_KEY: &[u8] = b"schema_version";

/// Outlets are stored as JSON documents keyed by outlet id
pub struct SledStore {
    db: Db,
    outlets: Tree,
}

impl SledStore {
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_version(path, SCHEMA_VERSION)
    }

    pub fn open_with_version(path: &Path, version: u32) -> Result<Self> {
        let open_error = |source| Error::StoreOpen {
            path: path.to_path_buf(),
            source,
        };

        let db = sled::open(path).map_err(open_error)?;
        let outlets = db.open_tree(OUTLETS_TREE).map_err(open_error)?;

        let store = Self { db, outlets };
        store.migrate(version)?;

        debug!(
            "Opened record store at {} ({} outlets)",
            path.display(),
            store.outlets.len()
        );
        Ok(store)
    }

    /// Schema version recorded in the store
    pub fn schema_version(&self) -> Result<Option<u32>> {
        let stored = self.db.get(SCHEMA_KEY).map_err(read_error)?;
        Ok(stored
            .and_then(|bytes| <[u8; 4]>::try_from(&bytes[..]).ok())
            .map(u32::from_be_bytes))
    }

    /// Clear-and-reingest is the only migration path
    fn migrate(&self, version: u32) -> Result<()> {
        let stored = self.schema_version()?;
        if stored == Some(version) {
            return Ok(());
        }

        if !self.outlets.is_empty() {
            info!(
                "Store schema version {:?} differs from {}, clearing {} outlets",
                stored,
                version,
                self.outlets.len()
            );
            self.outlets.clear().map_err(write_error)?;
        }

        self.db
            .insert(SCHEMA_KEY, &version.to_be_bytes()[..])
            .map_err(write_error)?;
        self.db.flush().map_err(write_error)?;
        Ok(())
    }
}

impl OutletStore for SledStore {
    fn count(&self) -> Result<usize> {
        Ok(self.outlets.len())
    }

    fn bulk_insert(&mut self, outlets: &[Outlet]) -> Result<()> {
        let mut batch = Batch::default();
        for outlet in outlets {
            let value = serde_json::to_vec(outlet).map_err(write_error)?;
            batch.insert(outlet.id.as_bytes(), value);
        }

        // Batches are applied atomically
        self.outlets.apply_batch(batch).map_err(write_error)?;
        self.db.flush().map_err(write_error)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.outlets.clear().map_err(write_error)?;
        self.db.flush().map_err(write_error)?;
        Ok(())
    }

    fn scan_all(&self) -> Result<Vec<Outlet>> {
        let mut outlets = Vec::with_capacity(self.outlets.len());

        for entry in self.outlets.iter() {
            let (key, value) = entry.map_err(read_error)?;
            let outlet: Outlet = serde_json::from_slice(&value).map_err(|source| Error::CorruptRecord {
                id: String::from_utf8_lossy(&key).into_owned(),
                source,
            })?;
            outlets.push(outlet);
        }

        Ok(outlets)
    }
}

fn write_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
    Error::StoreWrite(Box::new(e))
}

fn read_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
    Error::StoreRead(Box::new(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, District, UNKNOWN_REGION};
    use chrono::Utc;

    fn outlet(id: &str, region: &str) -> Outlet {
        Outlet {
            id: id.to_string(),
            name: format!("Outlet {}", id),
            address: "Somanya".to_string(),
            phone: Some("244470385".to_string()),
            outlet_type: "Mainstream".to_string(),
            coordinate: Coordinate::new(6.23685, 0.0927),
            district: District::South,
            admin_region: region.to_string(),
            ingested_at: Utc::now(),
            products: Vec::new(),
        }
    }

    #[test]
    fn test_bulk_insert_and_scan() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SledStore::open(&dir.path().join("store")).unwrap();
        assert_eq!(store.count().unwrap(), 0);

        let outlets = vec![outlet("a", "Eastern"), outlet("b", UNKNOWN_REGION)];
        store.bulk_insert(&outlets).unwrap();

        assert_eq!(store.count().unwrap(), 2);
        let scanned = store.scan_all().unwrap();
        assert_eq!(scanned, outlets);
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SledStore::open(&dir.path().join("store")).unwrap();
        store.bulk_insert(&[outlet("a", "Eastern")]).unwrap();
        store.clear().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_reopen_same_version_keeps_outlets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store");
        {
            let mut store = SledStore::open(&path).unwrap();
            store.bulk_insert(&[outlet("a", "Eastern")]).unwrap();
            assert_eq!(store.schema_version().unwrap(), Some(SCHEMA_VERSION));
        }
        let store = SledStore::open(&path).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_version_bump_clears_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store");
        {
            let mut store = SledStore::open_with_version(&path, 2).unwrap();
            store.bulk_insert(&[outlet("a", "Eastern")]).unwrap();
        }
        let store = SledStore::open_with_version(&path, 3).unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert_eq!(store.schema_version().unwrap(), Some(3));
    }
}
