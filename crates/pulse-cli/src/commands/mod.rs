// crates/pulse-cli/src/commands/mod.rs - Command Handler Modules
//
// MODULE ORGANIZATION:
// - init: Config and catalog bootstrap (special case, no context needed)
// - check: Catalog validation, optionally watching the file
// - list: Snippets applicable to a file
// - insert: Prompt for a snippet's arguments and print the result
// - edit: Open the catalog in the editor
// - completions: Shell completion scripts

pub mod check;
#[cfg(feature = "completions")]
pub mod completions;
pub mod edit;
pub mod init;
pub mod insert;
pub mod list;
