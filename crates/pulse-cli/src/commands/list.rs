// crates/pulse-cli/src/commands/list.rs - Applicable snippets
use anyhow::{Context as _, Result};
use pulse_core::SnippetDefinition;
use pulse_core::select;
use serde_json::json;

use crate::context::Context;

/// List the snippets that apply to `file`, in catalog order
///
/// - Human-readable: one name per line, with its pattern when it has one
/// - Machine-readable: JSON array with names, patterns and argument types
pub fn handle(ctx: &Context, file: Option<&str>, all: bool, json: bool) -> Result<()> {
    let catalog = ctx
        .load_catalog()
        .with_context(|| format!("Failed to load catalog {}", ctx.catalog_path().display()))?;

    let snippets: Vec<&SnippetDefinition> = if all {
        catalog.iter().collect()
    } else {
        select::applicable(&catalog, file.unwrap_or(""))
    };

    if json || ctx.config().wants_json() {
        let entries: Vec<_> = snippets.iter().map(|snippet| describe(snippet)).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if snippets.is_empty() {
        eprintln!("💡 No snippet applies here");
    }

    for snippet in snippets {
        let mut line = snippet.name.clone();
        if let Some(regex) = &snippet.regex {
            line.push_str(&format!("  /{}/", regex.as_str()));
        }
        if !snippet.active {
            line.push_str("  (inactive)");
        }
        println!("{line}");
    }

    Ok(())
}

fn describe(snippet: &SnippetDefinition) -> serde_json::Value {
    json!({
        "name": snippet.name,
        "regex": snippet.regex.as_ref().map(|regex| regex.as_str()),
        "active": snippet.active,
        "args": snippet
            .args
            .iter()
            .map(|arg| json!({ "name": arg.name, "type": arg.type_name() }))
            .collect::<Vec<_>>(),
    })
}
