// crates/pulse-core/src/cache.rs - Timestamp-gated catalog cache
//
// A host calls the cache on every snippet request. The catalog file is only
// parsed again when its modification time moved past the one the cached
// catalog was loaded from.
//
// FAILURE POLICY:
// A failed reload is returned to the caller and leaves both the cached
// catalog and its fingerprint untouched. The next request therefore tries
// the load again, and a stale catalog is never handed out in place of a
// newer file that does not validate.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;
use tracing::{debug, info};

use crate::loader::{LoadError, LoadResult, load_catalog};
use crate::schema::Catalog;
use crate::transform::TransformRegistry;

#[derive(Debug, Default)]
struct CacheState {
    catalog: Option<Arc<Catalog>>,
    fingerprint: Option<SystemTime>,
}

/// Shared, lazily reloaded catalog
#[derive(Debug, Default)]
pub struct CatalogCache {
    state: Mutex<CacheState>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached catalog, reloading when `current` is newer
    ///
    /// The whole check-and-reload runs under one lock, so concurrent callers
    /// never observe a half-replaced catalog and never load twice for the
    /// same fingerprint.
    pub fn get_or_reload<F>(&self, current: SystemTime, load: F) -> LoadResult<Arc<Catalog>>
    where
        F: FnOnce() -> LoadResult<Catalog>,
    {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if let (Some(catalog), Some(fingerprint)) = (&state.catalog, state.fingerprint) {
            if current <= fingerprint {
                debug!("catalog cache hit");
                return Ok(Arc::clone(catalog));
            }
        }

        let catalog = Arc::new(load()?);
        info!(snippets = catalog.len(), "catalog reloaded");
        state.catalog = Some(Arc::clone(&catalog));
        state.fingerprint = Some(current);
        Ok(catalog)
    }

    /// Stat `path` and reload it through the cache when it changed
    pub fn load_file(&self, path: &Path, registry: &TransformRegistry) -> LoadResult<Arc<Catalog>> {
        let modified = std::fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(|source| LoadError::Io {
                path: path.display().to_string(),
                source,
            })?;

        self.get_or_reload(modified, || load_catalog(path, registry))
    }

    /// Fingerprint of the cached catalog
    pub fn fingerprint(&self) -> Option<SystemTime> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).fingerprint
    }

    /// Cached catalog without touching the file
    pub fn cached(&self) -> Option<Arc<Catalog>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).catalog.clone()
    }

    /// Forget the cached catalog; the next request loads unconditionally
    pub fn invalidate(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.catalog = None;
        state.fingerprint = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{SourceFormat, catalog_from_str};
    use crate::validate::SchemaErrors;
    use std::cell::Cell;
    use std::time::Duration;

    fn catalog(names: &[&str]) -> Catalog {
        let source = names
            .iter()
            .map(|name| format!("- {{ name: {name}, transform: {{ builtin: lines }} }}\n"))
            .collect::<String>();
        catalog_from_str(&source, SourceFormat::Yaml, "test.yaml", &TransformRegistry::with_builtins()).unwrap()
    }

    fn at(seconds: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(seconds)
    }

    #[test]
    fn test_loads_once_per_fingerprint() {
        let cache = CatalogCache::new();
        let loads = Cell::new(0);
        let load = || {
            loads.set(loads.get() + 1);
            Ok(catalog(&["a"]))
        };

        cache.get_or_reload(at(10), load).unwrap();
        cache.get_or_reload(at(10), load).unwrap();
        cache.get_or_reload(at(5), load).unwrap();

        assert_eq!(loads.get(), 1);
        assert_eq!(cache.fingerprint(), Some(at(10)));
    }

    #[test]
    fn test_newer_fingerprint_reloads() {
        let cache = CatalogCache::new();
        cache.get_or_reload(at(10), || Ok(catalog(&["a"]))).unwrap();
        let fresh = cache.get_or_reload(at(11), || Ok(catalog(&["a", "b"]))).unwrap();

        assert_eq!(fresh.len(), 2);
        assert_eq!(cache.fingerprint(), Some(at(11)));
    }

    #[test]
    fn test_failed_reload_keeps_previous_state() {
        let cache = CatalogCache::new();
        cache.get_or_reload(at(10), || Ok(catalog(&["a"]))).unwrap();

        let error = cache
            .get_or_reload(at(20), || Err(LoadError::Schema(SchemaErrors(Vec::new()))))
            .unwrap_err();
        assert!(matches!(error, LoadError::Schema(_)));
        assert_eq!(cache.fingerprint(), Some(at(10)));
        assert_eq!(cache.cached().map(|c| c.len()), Some(1));

        // Same fingerprint is retried, not served from the stale entry
        let retried = cache.get_or_reload(at(20), || Ok(catalog(&["a", "b", "c"]))).unwrap();
        assert_eq!(retried.len(), 3);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let cache = CatalogCache::new();
        cache.get_or_reload(at(10), || Ok(catalog(&["a"]))).unwrap();
        cache.invalidate();
        assert!(cache.cached().is_none());

        let reloaded = cache.get_or_reload(at(10), || Ok(catalog(&["a", "b"]))).unwrap();
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_load_file_reads_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("snippets.yaml");
        std::fs::write(&path, "snippets:\n  - { name: a, transform: { builtin: lines } }\n").unwrap();

        let cache = CatalogCache::new();
        let registry = TransformRegistry::with_builtins();
        let first = cache.load_file(&path, &registry).unwrap();
        let second = cache.load_file(&path, &registry).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.fingerprint().is_some());
    }

    #[test]
    fn test_load_file_missing() {
        let cache = CatalogCache::new();
        let error = cache
            .load_file(Path::new("/nonexistent/snippets.yaml"), &TransformRegistry::with_builtins())
            .unwrap_err();
        assert!(matches!(error, LoadError::Io { .. }));
    }
}
