// crates/pulse-cli/src/services/mod.rs - Service layer modules
pub mod editor;
pub mod terminal;
#[cfg(feature = "watch")]
pub mod watch;

pub use editor::EditorService;
pub use terminal::TerminalPrompter;
