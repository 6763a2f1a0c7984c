// crates/pulse-core/src/loader.rs - Reading catalog files
//
// A catalog file is YAML or JSON. Both are parsed into an untyped
// `serde_json::Value` first and handed to the validator, so the exact same
// rules (and error paths) apply whichever syntax the user writes.
//
// ACCEPTED LAYOUTS:
// ```yaml
// snippets:          # top-level key
//   - name: ...
// ```
// or a bare top-level list of definitions.

use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::schema::Catalog;
use crate::transform::TransformRegistry;
use crate::validate::{SchemaErrors, validate_catalog};

/// Errors that can occur while loading a catalog
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported catalog format for {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),

    #[error("Invalid {format} syntax in {file}: {error}")]
    Parse {
        file: String,
        format: SourceFormat,
        error: String,
    },

    #[error("Invalid catalog: {0}")]
    Schema(#[from] SchemaErrors),
}

/// Result type for catalog loading
pub type LoadResult<T> = Result<T, LoadError>;

/// Syntax of a catalog source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Yaml,
    Json,
}

impl SourceFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Some(Self::Yaml),
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yaml => write!(f, "YAML"),
            Self::Json => write!(f, "JSON"),
        }
    }
}

/// Parse a catalog document into its untyped snippet list
///
/// Returns `Value::Null` when the document defines no snippets at all, which
/// the validator reports as `snippets is missing`.
pub fn parse_source(content: &str, format: SourceFormat, file: &str) -> LoadResult<Value> {
    let document: Value = match format {
        SourceFormat::Yaml => serde_yaml::from_str(content).map_err(|e| LoadError::Parse {
            file: file.to_string(),
            format,
            error: e.to_string(),
        })?,
        SourceFormat::Json => serde_json::from_str(content).map_err(|e| LoadError::Parse {
            file: file.to_string(),
            format,
            error: e.to_string(),
        })?,
    };

    Ok(match document {
        Value::Object(mut map) => map.remove("snippets").unwrap_or(Value::Null),
        other => other,
    })
}

/// Parse and validate catalog source text
pub fn catalog_from_str(
    content: &str,
    format: SourceFormat,
    file: &str,
    registry: &TransformRegistry,
) -> LoadResult<Catalog> {
    let snippets = parse_source(content, format, file)?;
    Ok(validate_catalog(&snippets, registry)?)
}

/// Read, parse and validate a catalog file
pub fn load_catalog(path: &Path, registry: &TransformRegistry) -> LoadResult<Catalog> {
    let file = path.display().to_string();
    let format = SourceFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat(file.clone()))?;

    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: file.clone(),
        source,
    })?;

    let catalog = catalog_from_str(&content, format, &file, registry)?;
    info!(file = %file, snippets = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// Empty catalog written by `pulse init`
pub fn empty_catalog_source() -> &'static str {
    "# Snippet Pulse catalog\n#\n# Each entry needs a name and a transform; see `pulse --help`.\nsnippets: []\n"
}
