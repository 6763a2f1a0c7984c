// crates/pulse-cli/src/commands/check.rs - Catalog validation
use anyhow::{Result, bail};
use pulse_core::LoadError;

use crate::context::Context;

/// Validate the catalog, listing every schema error
///
/// With `watch`, the first result is printed and the command keeps
/// revalidating on each change of the file until interrupted.
pub fn handle(ctx: &Context, watch: bool) -> Result<()> {
    if watch {
        return watch_catalog(ctx);
    }

    if !report(ctx)? {
        bail!("Catalog {} is invalid", ctx.catalog_path().display());
    }
    Ok(())
}

/// Print the validation result; `Ok(false)` means schema errors were listed
fn report(ctx: &Context) -> Result<bool> {
    let path = ctx.catalog_path().display();

    match ctx.load_catalog() {
        Ok(catalog) => {
            println!("✅ {path}: {} snippet(s), all valid", catalog.len());
            Ok(true)
        }
        Err(LoadError::Schema(errors)) => {
            eprintln!("❌ {path}: {} schema error(s)", errors.len());
            for error in errors.iter() {
                eprintln!("   {error}");
            }
            Ok(false)
        }
        Err(other) => Err(other.into()),
    }
}

#[cfg(feature = "watch")]
fn watch_catalog(ctx: &Context) -> Result<()> {
    use std::fs;
    use std::time::SystemTime;

    let path = ctx.catalog_path();
    let modified = || -> Option<SystemTime> { fs::metadata(path).and_then(|meta| meta.modified()).ok() };

    let run = || {
        if let Err(error) = report(ctx) {
            eprintln!("❌ {error:#}");
        }
    };

    run();
    let mut last_seen = modified();
    eprintln!("👀 Watching {} (Ctrl-C to stop)", path.display());

    crate::services::watch::watch_file(path, || {
        // One save usually fires several events
        let current = modified();
        if current.is_some() && current == last_seen {
            return;
        }
        last_seen = current;
        run();
    })
}

#[cfg(not(feature = "watch"))]
fn watch_catalog(_ctx: &Context) -> Result<()> {
    bail!("pulse was built without the `watch` feature")
}
