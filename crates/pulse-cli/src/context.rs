// crates/pulse-cli/src/context.rs - Application context
use anyhow::{Context as _, Result, anyhow};
use pulse_core::{Catalog, CatalogCache, ConfigManager, PulseConfig, TransformRegistry};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Application context that gets passed to command handlers
///
/// This is the "dependency injection container" of the CLI: the merged
/// configuration, the resolved catalog location, the transform registry
/// and the catalog cache.
pub struct Context {
    config: PulseConfig,
    catalog_path: PathBuf,
    registry: TransformRegistry,
    cache: CatalogCache,
}

impl Context {
    /// Build the context; `catalog` is the --catalog flag and wins over config
    pub fn new(catalog: Option<PathBuf>) -> Result<Self> {
        let config = ConfigManager::load_config().context("Failed to load configuration")?;

        let catalog_path = catalog
            .or_else(|| config.catalog_path())
            .ok_or_else(|| anyhow!("No catalog configured.\n\nTips:\n- Pass --catalog <file>\n- Set PULSE_CATALOG\n- Run `pulse init`"))?;

        Ok(Self {
            config,
            catalog_path,
            registry: TransformRegistry::with_builtins(),
            cache: CatalogCache::new(),
        })
    }

    pub fn config(&self) -> &PulseConfig {
        &self.config
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    /// Load the catalog through the cache
    ///
    /// The error is returned untouched so `check` can list schema errors.
    pub fn load_catalog(&self) -> pulse_core::LoadResult<Arc<Catalog>> {
        self.cache.load_file(&self.catalog_path, &self.registry)
    }
}
