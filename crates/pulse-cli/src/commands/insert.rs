// crates/pulse-cli/src/commands/insert.rs - Fill in a snippet
//
// FLOW:
// 1. Load the catalog (cached) and keep the snippets applicable to --file
// 2. Pick one: by QUERY (exact name, else fuzzy), or by asking the user
// 3. Resolve its arguments through a prompt provider
// 4. Print the transform's lines, or the resolved arguments with --json
//
// Only the result goes to stdout. Cancelling anywhere prints nothing there
// and still exits successfully, unless an answers file fell out of step
// with the prompts.

use anyhow::{Context as _, Result, anyhow, bail};
use pulse_core::{Choice, PromptProvider, Resolver, ScriptedPrompter, SnippetDefinition, select};
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use tracing::debug;

use crate::context::Context;
use crate::services::TerminalPrompter;

/// Title of the snippet picker prompt
const PICK_TITLE: &str = "pulse";

pub fn handle(ctx: &Context, query: Option<&str>, file: Option<&str>, answers: Option<&Path>, json: bool) -> Result<()> {
    let catalog = ctx
        .load_catalog()
        .with_context(|| format!("Failed to load catalog {}", ctx.catalog_path().display()))?;

    let snippets = select::applicable(&catalog, file.unwrap_or(""));
    if snippets.is_empty() {
        bail!("No snippet applies to '{}'", file.unwrap_or(""));
    }

    let mut prompter = prompter(answers)?;

    let snippet = match query {
        Some(query) => select::find(&snippets, query).ok_or_else(|| anyhow!("No snippet matches '{query}'"))?,
        None => match pick(prompter.as_mut(), &snippets) {
            Some(snippet) => snippet,
            None => return cancelled(prompter.as_ref()),
        },
    };
    debug!(snippet = %snippet.name, "snippet selected");

    let resolved = Resolver::new(prompter.as_mut())
        .with_confirm_placeholder(ctx.config().prompt.group_confirm_placeholder.clone())
        .resolve_snippet(snippet);

    let Some(resolved) = resolved else {
        return cancelled(prompter.as_ref());
    };

    let mut stdout = io::stdout().lock();

    if json || ctx.config().wants_json() {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&resolved.to_json())?)?;
        return Ok(());
    }

    let lines = snippet
        .transform
        .apply(&resolved)
        .with_context(|| format!("Transform of '{}' failed", snippet.name))?;

    write!(stdout, "{}", lines.join("\n"))?;
    if ctx.config().output.trailing_newline && !lines.is_empty() {
        writeln!(stdout)?;
    }
    Ok(())
}

/// Scripted answers when given, the terminal otherwise
fn prompter(answers: Option<&Path>) -> Result<Box<dyn PromptProvider>> {
    if let Some(path) = answers {
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read answers {}", path.display()))?;
        let scripted =
            ScriptedPrompter::parse(&content).with_context(|| format!("Invalid answers file {}", path.display()))?;
        return Ok(Box::new(scripted));
    }

    if !io::stdin().is_terminal() {
        bail!("No terminal to prompt on.\n\nTips:\n- Run pulse from a terminal\n- Pass --answers <file> with pre-recorded answers");
    }

    Ok(Box::new(TerminalPrompter::new()))
}

/// Ask the user which applicable snippet to use
fn pick<'c>(prompter: &mut dyn PromptProvider, snippets: &[&'c SnippetDefinition]) -> Option<&'c SnippetDefinition> {
    let labels: Vec<&str> = snippets.iter().map(|snippet| snippet.name.as_str()).collect();

    match prompter.ask_choice(PICK_TITLE, Some("Pick a snippet"), &labels, false)? {
        Choice::One(name) => snippets.iter().find(|snippet| snippet.name == name).copied(),
        Choice::Many(_) => None,
    }
}

/// A user cancelling is fine; an answers file out of step with the prompts is not
fn cancelled(prompter: &dyn PromptProvider) -> Result<()> {
    if prompter.aborted() {
        bail!("Answers do not match the prompts; nothing inserted (see warnings above)");
    }

    eprintln!("💡 Cancelled, nothing inserted");
    Ok(())
}
