// crates/pulse-core/src/config.rs - Configuration System
//
// Everything about pulse that reasonably varies between users lives here:
// where the catalog is, how group repetition is phrased, which editor opens
// the catalog and how results are printed.
//
// CONFIGURATION HIERARCHY (highest to lowest priority):
// 1. Command-line arguments (--catalog)
// 2. Environment variables (PULSE_CATALOG, PULSE_EDITOR, PULSE_OUTPUT)
// 3. Config file (PULSE_CONFIG, or <config dir>/pulse/config.toml)
// 4. Built-in defaults
//
// Command-line arguments are applied by the CLI after `load_config`.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::resolve::DEFAULT_CONFIRM_PLACEHOLDER;

/// Errors that can occur during configuration loading and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid TOML syntax in {file}: {error}")]
    ParseError { file: String, error: String },

    #[error("Invalid configuration value: {0}")]
    ValidationError(String),

    #[error("No configuration directory available on this platform")]
    NoConfigDir,

    #[error("I/O error reading config: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Output formats understood by `list` and `insert`
pub const OUTPUT_FORMATS: &[&str] = &["human", "json"];

/// Complete configuration schema for pulse
///
/// Every section has serde defaults, so a partial file (or none at all) is
/// fine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PulseConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub prompt: PromptConfig,

    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the snippet catalog lives
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog file; `<config dir>/pulse/snippets.yaml` when unset
    pub path: Option<PathBuf>,
}

/// Prompt wording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Placeholder of the "repeat this group?" question
    #[serde(default = "default_confirm_placeholder")]
    pub group_confirm_placeholder: String,
}

/// Editor integration settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Editor command (overrides EDITOR/VISUAL)
    pub command: Option<String>,

    /// Extra arguments; `{file}` is replaced by the catalog path
    #[serde(default)]
    pub args: Vec<String>,
}

/// Output formatting options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// "human" or "json"
    #[serde(default = "default_output_format")]
    pub default_format: String,

    /// Print a newline after the last rendered line
    #[serde(default = "default_true")]
    pub trailing_newline: bool,
}

impl PulseConfig {
    /// Catalog path after defaults; `None` only without a config directory
    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.catalog.path.clone().or_else(ConfigManager::default_catalog_path)
    }

    pub fn wants_json(&self) -> bool {
        self.output.default_format == "json"
    }
}

/// Configuration loading and management
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from the config file and environment
    ///
    /// A missing config file is not an error. Invalid TOML and invalid
    /// values are.
    pub fn load_config() -> ConfigResult<PulseConfig> {
        let mut config = match Self::config_path() {
            Some(path) => Self::try_load_file(&path)?.unwrap_or_default(),
            None => PulseConfig::default(),
        };

        Self::apply_env_overrides(&mut config);
        Self::validate_config(&config)?;

        Ok(config)
    }

    /// Config file location
    ///
    /// `PULSE_CONFIG` wins; otherwise the platform config directory:
    /// - Linux: ~/.config/pulse/config.toml
    /// - macOS: ~/Library/Application Support/pulse/config.toml
    /// - Windows: %APPDATA%\pulse\config.toml
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = env::var_os("PULSE_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("pulse").join("config.toml"))
    }

    /// Catalog location when none is configured
    ///
    /// Sits next to the config file.
    pub fn default_catalog_path() -> Option<PathBuf> {
        Self::config_path().and_then(|path| path.parent().map(|dir| dir.join("snippets.yaml")))
    }

    /// Read one TOML config file, `None` if it does not exist
    pub fn try_load_file(path: &Path) -> ConfigResult<Option<PulseConfig>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, &path.display().to_string()).map(Some)
    }

    pub fn parse(content: &str, file: &str) -> ConfigResult<PulseConfig> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            file: file.to_string(),
            error: e.to_string(),
        })
    }

    /// Generate a default configuration file with comments
    pub fn generate_default_config() -> String {
        format!(
            r#"# Snippet Pulse Configuration File
#
# Lines starting with # are comments and are ignored.

[catalog]
# Snippet catalog (YAML or JSON), overridden by PULSE_CATALOG and --catalog.
# Defaults to snippets.yaml next to this file.
# path = "~/.config/pulse/snippets.yaml"

[prompt]
# Question asked after each repetition of a group argument
group_confirm_placeholder = "{DEFAULT_CONFIRM_PLACEHOLDER}"

[editor]
# Editor used by `pulse edit` (overrides PULSE_EDITOR, VISUAL and EDITOR)
# command = "hx"

# Extra arguments; {{file}} is replaced by the catalog path
# args = []

[output]
# Default output format: "human" or "json"
default_format = "human"

# Print a newline after the last rendered line
trailing_newline = true
"#
        )
    }

    /// Apply environment variable overrides
    ///
    /// - PULSE_CATALOG -> catalog.path
    /// - PULSE_EDITOR -> editor.command
    /// - PULSE_OUTPUT -> output.default_format
    fn apply_env_overrides(config: &mut PulseConfig) {
        if let Some(catalog) = env::var_os("PULSE_CATALOG") {
            config.catalog.path = Some(PathBuf::from(catalog));
        }

        if let Ok(editor) = env::var("PULSE_EDITOR") {
            config.editor.command = Some(editor);
        }

        if let Ok(format) = env::var("PULSE_OUTPUT") {
            config.output.default_format = format;
        }
    }

    /// Catch values that would only fail later at runtime
    pub fn validate_config(config: &PulseConfig) -> ConfigResult<()> {
        if !OUTPUT_FORMATS.contains(&config.output.default_format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid output format '{}'. Must be one of: {}",
                config.output.default_format,
                OUTPUT_FORMATS.join(", ")
            )));
        }

        if config.prompt.group_confirm_placeholder.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "prompt.group_confirm_placeholder cannot be empty".to_string(),
            ));
        }

        if let Some(command) = &config.editor.command {
            if command.trim().is_empty() {
                return Err(ConfigError::ValidationError("editor.command cannot be empty".to_string()));
            }
        }

        Ok(())
    }
}

/// Default value implementations for serde

fn default_true() -> bool {
    true
}

fn default_confirm_placeholder() -> String {
    DEFAULT_CONFIRM_PLACEHOLDER.to_string()
}

fn default_output_format() -> String {
    "human".to_string()
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            group_confirm_placeholder: default_confirm_placeholder(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: default_output_format(),
            trailing_newline: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PulseConfig::default();
        assert!(ConfigManager::validate_config(&config).is_ok());
        assert_eq!(config.prompt.group_confirm_placeholder, "Add another?");
        assert!(!config.wants_json());
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config = ConfigManager::parse(&ConfigManager::generate_default_config(), "config.toml").unwrap();
        assert_eq!(config, PulseConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = ConfigManager::parse("[output]\ndefault_format = \"json\"\n", "config.toml").unwrap();
        assert!(config.wants_json());
        assert!(config.output.trailing_newline);
        assert_eq!(config.prompt.group_confirm_placeholder, "Add another?");
    }

    #[test]
    fn test_invalid_toml_names_the_file() {
        let error = ConfigManager::parse("[output\n", "broken.toml").unwrap_err();
        assert!(error.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_invalid_output_format_validation() {
        let mut config = PulseConfig::default();
        config.output.default_format = "csv".to_string();
        assert!(ConfigManager::validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_confirm_placeholder_validation() {
        let mut config = PulseConfig::default();
        config.prompt.group_confirm_placeholder = "  ".to_string();
        assert!(ConfigManager::validate_config(&config).is_err());
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let loaded = ConfigManager::try_load_file(&dir.path().join("config.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_configured_catalog_path_wins() {
        let mut config = PulseConfig::default();
        config.catalog.path = Some(PathBuf::from("/tmp/mine.yaml"));
        assert_eq!(config.catalog_path(), Some(PathBuf::from("/tmp/mine.yaml")));
    }
}
