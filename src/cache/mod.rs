//! Panel cache keyed by input identity.
//!
//! Each source path maps to the panel built from it plus a blake3 checksum of
//! the bytes it was built from. A lookup re-reads the source and rebuilds only
//! when the checksum changed. Entries are never evicted; the number of
//! distinct inputs a session touches is small.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app::pipeline::{LoadedPanel, load_panel};
use crate::error::{PanelError, PanelResult};

/// Content checksum of a raw source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum([u8; 32]);

impl Checksum {
    pub fn of(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

struct CacheEntry {
    checksum: Checksum,
    loaded: Arc<LoadedPanel>,
}

/// Path + checksum addressed cache of built panels.
#[derive(Default)]
pub struct PanelCache {
    entries: HashMap<PathBuf, CacheEntry>,
    builds: usize,
}

impl PanelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the panel for `path`, rebuilding it if the file content changed.
    pub fn get_or_load(&mut self, path: &Path) -> PanelResult<Arc<LoadedPanel>> {
        let bytes = fs::read(path).map_err(|source| PanelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.get_or_build(path, &bytes)
    }

    /// Same as [`PanelCache::get_or_load`] for bytes already in memory
    /// (e.g. an upload); `key` names the source.
    pub fn get_or_build(&mut self, key: &Path, bytes: &[u8]) -> PanelResult<Arc<LoadedPanel>> {
        let checksum = Checksum::of(bytes);

        if let Some(entry) = self.entries.get(key) {
            if entry.checksum == checksum {
                tracing::debug!(source = %key.display(), "panel cache hit");
                return Ok(Arc::clone(&entry.loaded));
            }
            tracing::info!(source = %key.display(), "source changed; rebuilding panel");
        } else {
            tracing::debug!(source = %key.display(), "panel cache miss");
        }

        let loaded = Arc::new(load_panel(bytes)?);
        self.builds += 1;
        self.entries.insert(
            key.to_path_buf(),
            CacheEntry {
                checksum,
                loaded: Arc::clone(&loaded),
            },
        );
        Ok(loaded)
    }

    /// Checksum the cached panel for `key` was built from.
    pub fn checksum(&self, key: &Path) -> Option<Checksum> {
        self.entries.get(key).map(|e| e.checksum)
    }

    /// Forget `key`; returns whether it was cached.
    pub fn invalidate(&mut self, key: &Path) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many times a panel was actually built (misses + rebuilds).
    pub fn builds(&self) -> usize {
        self.builds
    }
}
