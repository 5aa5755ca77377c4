//! Memoized sheet loading
//!
//! Parsing a workbook is the slow part of every render, so parsed sheets are
//! kept per [`LoadOptions`] until explicitly invalidated.

use super::normalizer::{normalize, NormalizationReport};
use crate::error::{PimError, PimResult};
use crate::excel::SheetReader;
use crate::types::{LoadOptions, NormalizedTable, RawTable};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// One parse of one sheet, with its normalized form
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSheet {
    pub raw: RawTable,
    pub table: NormalizedTable,
    pub report: NormalizationReport,
}

impl LoadedSheet {
    /// Read and normalize without caching
    pub fn load(options: &LoadOptions) -> PimResult<Self> {
        let raw = SheetReader::new(options.clone()).read()?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawTable) -> PimResult<Self> {
        let (table, report) = normalize(&raw)?;
        Ok(Self { raw, table, report })
    }
}

/// Read-through cache of loaded sheets keyed by their load parameters
#[derive(Debug, Default)]
pub struct SheetCache {
    entries: Mutex<HashMap<LoadOptions, Arc<LoadedSheet>>>,
}

impl SheetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached sheet for `options`, loading it on a miss.
    ///
    /// The file's existence is checked on every call so a removed file fails
    /// even when a parse of it is still cached. Failures are not cached.
    pub fn load(&self, options: &LoadOptions) -> PimResult<Arc<LoadedSheet>> {
        if !options.path.exists() {
            return Err(PimError::MissingFile(options.path.clone()));
        }

        if let Some(hit) = self.entries().get(options) {
            debug!(path = %options.path.display(), sheet = %options.sheet, "sheet cache hit");
            return Ok(Arc::clone(hit));
        }

        let loaded = Arc::new(LoadedSheet::load(options)?);
        info!(
            path = %options.path.display(),
            sheet = %options.sheet,
            columns = %options.columns,
            header_row = options.header_row,
            "loaded sheet"
        );
        self.entries()
            .insert(options.clone(), Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Forget one entry; returns whether it was cached
    pub fn invalidate(&self, options: &LoadOptions) -> bool {
        let removed = self.entries().remove(options).is_some();
        if removed {
            debug!(path = %options.path.display(), sheet = %options.sheet, "sheet cache invalidated");
        }
        removed
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn contains(&self, options: &LoadOptions) -> bool {
        self.entries().contains_key(options)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<LoadOptions, Arc<LoadedSheet>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_not_cached() {
        let cache = SheetCache::new();
        let options = LoadOptions::new("/nonexistent/pim.xlsx", "PIM");

        match cache.load(&options) {
            Err(PimError::MissingFile(path)) => assert_eq!(path, options.path),
            other => panic!("expected MissingFile, got {:?}", other),
        }
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_unknown_entry() {
        let cache = SheetCache::new();
        assert!(!cache.invalidate(&LoadOptions::default()));
        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
