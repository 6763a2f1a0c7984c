// crates/pulse-core/src/lib.rs - Snippet Pulse core library
//
// The core owns everything between "a catalog file on disk" and "a list of
// rendered lines": schema validation, the argument interpreter that walks a
// schema against a prompt provider, the resolved value model, transforms,
// snippet selection and the timestamp-gated catalog cache.
//
// The host (CLI, editor plugin) supplies the prompt primitives and decides
// what to do with the rendered lines.
//
// DATA FLOW:
// ┌──────────┐   ┌───────────┐   ┌──────────┐   ┌──────────┐   ┌───────────┐
// │  loader  │──▶│ validate  │──▶│  select  │──▶│ resolve  │──▶│ transform │
// │ (yaml)   │   │ (Catalog) │   │ (filter) │   │ (prompts)│   │  (lines)  │
// └──────────┘   └───────────┘   └──────────┘   └──────────┘   └───────────┘

pub mod cache;
pub mod config;
pub mod loader;
pub mod prompt;
pub mod resolve;
pub mod schema;
pub mod select;
pub mod transform;
pub mod validate;
pub mod value;

pub use cache::CatalogCache;
pub use config::{ConfigError, ConfigManager, PulseConfig};
pub use loader::{LoadError, LoadResult, SourceFormat};
pub use prompt::{Choice, PromptProvider, ScriptedAnswer, ScriptedPrompter};
pub use resolve::{Resolver, resolve, resolve_snippet};
pub use schema::{ArgumentKind, ArgumentSpec, Catalog, SelectionOption, SnippetDefinition};
pub use transform::{Transform, TransformError, TransformRegistry, TransformResult};
pub use validate::{SchemaError, SchemaErrors, validate_catalog};
pub use value::{ResolvedArgs, ResolvedValue};
