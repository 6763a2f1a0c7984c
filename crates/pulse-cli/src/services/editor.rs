// crates/pulse-cli/src/services/editor.rs - Editor Integration Service
//
// Launches an external editor on the catalog file. The command may carry
// its own arguments ("code --wait"), and `editor.args` from the config may
// place the file with a `{file}` placeholder.

use anyhow::{Result, anyhow};
use pulse_core::config::EditorConfig;
use std::env;
use std::path::Path;
use std::process::Command;

/// Handles text editor operations
///
/// EDITOR SELECTION HIERARCHY:
/// 1. editor.command from the config (PULSE_EDITOR already folded in)
/// 2. VISUAL, then EDITOR environment variables
/// 3. Platform default (vim on Unix, notepad on Windows)
pub struct EditorService;

impl EditorService {
    pub fn get_editor_command(config: &EditorConfig) -> String {
        config
            .command
            .clone()
            .or_else(|| env::var("VISUAL").ok())
            .or_else(|| env::var("EDITOR").ok())
            .filter(|command| !command.trim().is_empty())
            .unwrap_or_else(|| {
                if cfg!(windows) {
                    "notepad".to_string()
                } else {
                    "vim".to_string()
                }
            })
    }

    /// Program and argument list for opening `path`
    ///
    /// The file goes wherever an argument says `{file}`, or last.
    pub fn invocation(command: &str, extra_args: &[String], path: &Path) -> Option<(String, Vec<String>)> {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words.next()?;
        let file = path.display().to_string();

        let mut args: Vec<String> = words.chain(extra_args.iter().cloned()).collect();
        let mut placed = false;
        for arg in &mut args {
            if arg.contains("{file}") {
                *arg = arg.replace("{file}", &file);
                placed = true;
            }
        }
        if !placed {
            args.push(file);
        }

        Some((program, args))
    }

    /// Open a file in the configured editor and wait for it to exit
    pub fn open_file(config: &EditorConfig, path: &Path) -> Result<()> {
        let editor = Self::get_editor_command(config);
        let (program, args) =
            Self::invocation(&editor, &config.args, path).ok_or_else(|| anyhow!("Editor command is empty"))?;

        let status = Command::new(&program)
            .args(&args)
            .status()
            .map_err(|e| anyhow!(
                "Failed to launch editor '{}': {}\n\nTips:\n- Check that '{}' is installed and in PATH\n- Set PULSE_EDITOR, VISUAL or EDITOR",
                program, e, program
            ))?;

        if !status.success() {
            eprintln!("⚠️ Editor '{}' exited with error code: {:?}", program, status.code());
        }

        Ok(())
    }
}
