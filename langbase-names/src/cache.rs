//! Lazily built, explicitly shared name tables.
//!
//! A [`NameTableCache`] is handed to whoever needs names. The first `get`
//! builds the table while holding the cache lock, so concurrent callers wait
//! for that single build and never observe a partial table. `evict` drops
//! the cached table; the next `get` rebuilds it from the same source.

use crate::error::NameTableError;
use crate::table::NameTable;
use parking_lot::Mutex;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// The name resource shipped with this crate.
pub static EMBEDDED_RESOURCE: &[u8] = include_bytes!("../data/unicode-names.dat");

/// Where a cache loads its compressed resource from.
#[derive(Debug, Clone)]
pub enum NameSource {
    /// [`EMBEDDED_RESOURCE`].
    Embedded,
    /// A compressed resource file on disk.
    File(PathBuf),
    /// Compressed resource bytes already in memory.
    Bytes(Arc<[u8]>),
}

impl NameSource {
    fn load(&self) -> Result<NameTable, NameTableError> {
        match self {
            NameSource::Embedded => NameTable::from_compressed(EMBEDDED_RESOURCE),
            NameSource::File(path) => {
                let bytes = std::fs::read(path).map_err(|source| NameTableError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                NameTable::from_compressed(&bytes)
            }
            NameSource::Bytes(bytes) => NameTable::from_compressed(bytes),
        }
    }
}

impl fmt::Display for NameSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameSource::Embedded => write!(f, "embedded resource"),
            NameSource::File(path) => write!(f, "{}", path.display()),
            NameSource::Bytes(bytes) => write!(f, "{} in-memory bytes", bytes.len()),
        }
    }
}

/// Build-once, share-many holder for a [`NameTable`].
#[derive(Debug)]
pub struct NameTableCache {
    source: NameSource,
    table: Mutex<Option<Arc<NameTable>>>,
}

impl NameTableCache {
    pub fn new(source: NameSource) -> Self {
        Self {
            source,
            table: Mutex::new(None),
        }
    }

    /// Cache over [`EMBEDDED_RESOURCE`].
    pub fn embedded() -> Self {
        Self::new(NameSource::Embedded)
    }

    pub fn source(&self) -> &NameSource {
        &self.source
    }

    /// The cached table, building it on first use or after an eviction.
    ///
    /// # Errors
    /// A build failure is returned to every caller that triggers a build;
    /// nothing is cached, so a later call tries again.
    pub fn get(&self) -> Result<Arc<NameTable>, NameTableError> {
        let mut slot = self.table.lock();
        if let Some(table) = slot.as_ref() {
            return Ok(Arc::clone(table));
        }

        let started = Instant::now();
        let table = match self.source.load() {
            Ok(table) => Arc::new(table),
            Err(e) => {
                log::error!("Failed to build name table from {}: {}", self.source, e);
                return Err(e);
            }
        };
        log::debug!(
            "Built name table with {} names from {} in {:?}",
            table.len(),
            self.source,
            started.elapsed()
        );

        *slot = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Drop the cached table. Returns whether one was cached.
    ///
    /// Handles already given out stay valid; they just stop being shared
    /// with future callers.
    pub fn evict(&self) -> bool {
        let evicted = self.table.lock().take().is_some();
        if evicted {
            log::debug!("Evicted cached name table ({})", self.source);
        }
        evicted
    }

    pub fn is_loaded(&self) -> bool {
        self.table.lock().is_some()
    }
}
