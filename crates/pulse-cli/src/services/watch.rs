// crates/pulse-cli/src/services/watch.rs - Catalog file watcher
//
// Watches the catalog's directory rather than the file itself: many editors
// save by writing a new file and renaming it over the old one, which would
// silently end a watch on the original inode.

use anyhow::{Context as _, Result, anyhow};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use tracing::{debug, warn};

/// Call `on_change` for every change to `path`; runs until the watcher dies
pub fn watch_file<F>(path: &Path, mut on_change: F) -> Result<()>
where
    F: FnMut(),
{
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("{} is not a file path", path.display()))?
        .to_os_string();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir()?,
    };

    let (tx, rx) = crossbeam_channel::unbounded::<notify::Result<Event>>();
    let mut watcher: RecommendedWatcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let _ = tx.send(res);
    })
    .context("Failed to create file watcher")?;

    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", dir.display()))?;

    for res in rx {
        match res {
            Ok(event) => {
                let touches_catalog = event
                    .paths
                    .iter()
                    .any(|changed| changed.file_name() == Some(file_name.as_os_str()));
                let relevant = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_));

                if touches_catalog && relevant {
                    debug!(kind = ?event.kind, "catalog changed");
                    on_change();
                }
            }
            Err(error) => warn!(%error, "file watcher error"),
        }
    }

    Ok(())
}
