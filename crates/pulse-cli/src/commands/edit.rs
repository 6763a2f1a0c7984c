// crates/pulse-cli/src/commands/edit.rs - Open the catalog
use anyhow::Result;

use crate::context::Context;
use crate::services::EditorService;

/// Open the catalog file in the configured editor
pub fn handle(ctx: &Context) -> Result<()> {
    let path = ctx.catalog_path();
    if !path.exists() {
        eprintln!("💡 {} does not exist yet; run `pulse init` first", path.display());
    }

    EditorService::open_file(&ctx.config().editor, path)?;
    println!("💡 Run `pulse check` to validate your changes");
    Ok(())
}
