// crates/pulse-cli/src/main.rs - CLI Application Entry Point
//
// ARCHITECTURE OVERVIEW:
// ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────────┐
// │   User Input    │───▶│   CLI Parser     │───▶│  Command Handlers   │
// │ (clap commands) │    │ (main function)  │    │ (commands/*.rs)     │
// └─────────────────┘    └──────────────────┘    └─────────────────────┘
//                                 │                        │
//                                 ▼                        ▼
//                        ┌──────────────────┐    ┌─────────────────────┐
//                        │     Context      │    │     Services        │
//                        │ (config + cache) │    │ (editor, terminal)  │
//                        └──────────────────┘    └─────────────────────┘
//
// `pulse insert` writes only the rendered snippet to stdout. Prompts, logs
// and notes use stderr, so `pulse insert ... >> file` works.
//
// EXAMPLE USAGE:
// ```bash
// pulse init                                    # Config + empty catalog
// pulse check --watch                           # Revalidate while editing
// pulse list --file src/data.json               # What applies here?
// pulse insert data --file src/data.json        # Prompt and print
// pulse insert data --answers answers.yaml      # Non-interactive
// ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod context;
mod services;

use cli::{Cli, Commands};
use context::Context;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Init creates the config that Context would otherwise fail to load
    if let Commands::Init { force } = &cli.command {
        return commands::init::handle(cli.catalog.clone(), *force);
    }

    #[cfg(feature = "completions")]
    if let Commands::Completions { shell } = &cli.command {
        return commands::completions::handle(*shell);
    }

    let ctx = Context::new(cli.catalog)?;

    match cli.command {
        Commands::Check { watch } => commands::check::handle(&ctx, watch),
        Commands::List { file, all, json } => commands::list::handle(&ctx, file.as_deref(), all, json),
        Commands::Insert {
            query,
            file,
            answers,
            json,
        } => commands::insert::handle(&ctx, query.as_deref(), file.as_deref(), answers.as_deref(), json),
        Commands::Edit => commands::edit::handle(&ctx),
        Commands::Init { .. } => unreachable!(), // Already handled above
        #[cfg(feature = "completions")]
        Commands::Completions { .. } => unreachable!(),
    }
}

/// Log to stderr; PULSE_LOG (an env-filter directive) wins over -v
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env("PULSE_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
