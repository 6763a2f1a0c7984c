// crates/pulse-cli/src/commands/init.rs - Config and catalog bootstrap
//
// Init runs before a Context exists: the context needs a loadable config
// and a catalog location, and creating those is exactly what init does.

use anyhow::{Context as _, Result, anyhow};
use pulse_core::ConfigManager;
use pulse_core::loader::empty_catalog_source;
use std::fs;
use std::path::{Path, PathBuf};

/// Write the default config file and an empty catalog
///
/// Existing files are left alone, except that `force` rewrites the config.
/// The catalog is never overwritten since it holds the user's snippets.
///
/// EXAMPLES:
/// ```bash
/// pulse init                              # ~/.config/pulse/{config.toml,snippets.yaml}
/// pulse --catalog ./snippets.yaml init    # Project-local catalog
/// ```
pub fn handle(catalog: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = ConfigManager::config_path().ok_or_else(|| anyhow!("No configuration directory available"))?;

    if config_path.exists() && !force {
        println!("💡 Config already exists: {}", config_path.display());
    } else {
        write_file(&config_path, &ConfigManager::generate_default_config())?;
        println!("✅ Wrote config: {}", config_path.display());
    }

    let config = ConfigManager::load_config().context("Failed to load configuration")?;
    let catalog_path = catalog
        .or_else(|| config.catalog_path())
        .ok_or_else(|| anyhow!("No catalog location available; pass --catalog"))?;

    if catalog_path.exists() {
        println!("💡 Catalog already exists: {}", catalog_path.display());
    } else {
        write_file(&catalog_path, empty_catalog_source())?;
        println!("✅ Created empty catalog: {}", catalog_path.display());
    }

    println!();
    println!("💡 Next steps:");
    println!("   pulse edit");
    println!("   pulse check --watch");
    println!("   pulse insert --file <path>");

    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
