// crates/pulse-cli/src/commands/completions.rs - Shell completions
use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io;

use crate::cli::Cli;

/// Print the completion script for `shell` to stdout
///
/// ```bash
/// pulse completions fish > ~/.config/fish/completions/pulse.fish
/// ```
pub fn handle(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "pulse", &mut io::stdout());
    Ok(())
}
