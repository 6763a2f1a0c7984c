// crates/pulse-cli/src/cli.rs - Command-line definitions
//
// Pure data: what commands and flags exist. Behaviour lives in commands/.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "pulse")]
#[command(about = "Fill in schema-driven snippets from the terminal")]
#[command(version)]
pub struct Cli {
    /// Catalog file (overrides PULSE_CATALOG and the config file)
    #[arg(short, long, global = true)]
    pub catalog: Option<PathBuf>,

    /// More logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand)]
pub enum Commands {
    /// Write the default config and an empty catalog
    Init {
        /// Overwrite an existing config file (the catalog is never overwritten)
        #[arg(long)]
        force: bool,
    },

    /// Validate the catalog and list every schema error
    Check {
        /// Keep running and revalidate whenever the catalog changes
        #[arg(long)]
        watch: bool,
    },

    /// List the snippets that apply to a file
    List {
        /// Path of the file being edited
        #[arg(long)]
        file: Option<String>,

        /// Ignore `active` and `regex`, list every snippet
        #[arg(long)]
        all: bool,

        /// Output as JSON for machine processing
        #[arg(long)]
        json: bool,
    },

    /// Pick a snippet, answer its prompts and print the result
    Insert {
        /// Snippet name (fuzzy); asked interactively when omitted
        query: Option<String>,

        /// Path of the file being edited
        #[arg(long)]
        file: Option<String>,

        /// Answer prompts from a YAML/JSON list instead of the terminal
        #[arg(long)]
        answers: Option<PathBuf>,

        /// Print the resolved arguments instead of the rendered lines
        #[arg(long)]
        json: bool,
    },

    /// Open the catalog in your editor
    Edit,

    /// Print shell completions
    #[cfg(feature = "completions")]
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}
