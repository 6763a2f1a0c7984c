// crates/pulse-core/src/transform.rs - Rendering resolved arguments to text
//
// A catalog file cannot carry executable functions, so a snippet's
// transform is a reference to one of two renderers:
//
// - template: a Handlebars template rendered with the resolved arguments as
//   context (no HTML escaping), split into lines
// - builtin:  a Rust function registered in a `TransformRegistry` by name
//
// TEMPLATE EXAMPLE:
// ```handlebars
// <record id="{{model}}_view" model="ir.ui.view">
// {{#each fields}}<field name="{{name}}"/>{{/each}}
// </record>
// ```
//
// Transforms are pure: same resolved arguments, same lines.

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};
use thiserror::Error;

use crate::value::{ResolvedArgs, ResolvedValue};

/// Errors raised while rendering a snippet
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Template error: {0}")]
    Template(String),

    #[error("Missing argument '{0}'")]
    MissingArgument(String),

    #[error("Argument '{name}' has the wrong shape: expected {expected}")]
    WrongShape { name: String, expected: String },

    #[error("Template transforms require the `templates` feature")]
    TemplatesDisabled,
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;

/// Signature of a builtin transform
pub type TransformFn = Arc<dyn Fn(&ResolvedArgs) -> TransformResult<Vec<String>> + Send + Sync>;

/// How a snippet turns its resolved arguments into lines
#[derive(Clone)]
pub enum Transform {
    Template { source: String },
    Builtin { name: String, func: TransformFn },
}

impl Transform {
    pub fn template(source: impl Into<String>) -> Self {
        Self::Template {
            source: source.into(),
        }
    }

    pub fn builtin(name: impl Into<String>, func: TransformFn) -> Self {
        Self::Builtin {
            name: name.into(),
            func,
        }
    }

    /// Render the resolved arguments into output lines
    pub fn apply(&self, args: &ResolvedArgs) -> TransformResult<Vec<String>> {
        match self {
            Self::Template { source } => render_template(source, args),
            Self::Builtin { func, .. } => func(args),
        }
    }

    /// Check that a template source parses
    pub fn compile_template(source: &str) -> TransformResult<()> {
        compile_template(source)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template { source } => f.debug_struct("Template").field("source", source).finish(),
            Self::Builtin { name, .. } => f.debug_struct("Builtin").field("name", name).finish(),
        }
    }
}

#[cfg(feature = "templates")]
fn compile_template(source: &str) -> TransformResult<()> {
    handlebars::Template::compile(source)
        .map(|_| ())
        .map_err(|e| TransformError::Template(e.to_string()))
}

#[cfg(not(feature = "templates"))]
fn compile_template(_source: &str) -> TransformResult<()> {
    Err(TransformError::TemplatesDisabled)
}

#[cfg(feature = "templates")]
fn render_template(source: &str, args: &ResolvedArgs) -> TransformResult<Vec<String>> {
    let mut registry = handlebars::Handlebars::new();
    registry.register_escape_fn(handlebars::no_escape);

    let rendered = registry
        .render_template(source, args)
        .map_err(|e| TransformError::Template(e.to_string()))?;

    Ok(rendered.lines().map(str::to_string).collect())
}

#[cfg(not(feature = "templates"))]
fn render_template(_source: &str, _args: &ResolvedArgs) -> TransformResult<Vec<String>> {
    Err(TransformError::TemplatesDisabled)
}

/// Named builtin transforms available to catalogs
///
/// The validator resolves `transform: { builtin: name }` against this
/// registry, so a catalog can only reference functions the host registered.
#[derive(Clone)]
pub struct TransformRegistry {
    builtins: BTreeMap<String, TransformFn>,
}

impl TransformRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            builtins: BTreeMap::new(),
        }
    }

    /// A registry preloaded with the stock transforms
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("lines", lines);
        registry.register("replace-separators", replace_separators);
        registry.register("json-object", json_object);
        registry
    }

    pub fn register<F>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(&ResolvedArgs) -> TransformResult<Vec<String>> + Send + Sync + 'static,
    {
        self.builtins.insert(name.into(), Arc::new(func));
    }

    pub fn get(&self, name: &str) -> Option<TransformFn> {
        self.builtins.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.builtins.keys().map(String::as_str)
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.builtins.keys()).finish()
    }
}

/// One line per scalar answer, depth-first in declaration order
fn lines(args: &ResolvedArgs) -> TransformResult<Vec<String>> {
    let mut out = Vec::new();
    collect_lines(args, &mut out);
    Ok(out)
}

fn collect_lines(args: &ResolvedArgs, out: &mut Vec<String>) {
    for (_, value) in args.iter() {
        match value {
            ResolvedValue::Text(text) => out.push(text.clone()),
            ResolvedValue::Single(value) => out.push(scalar_to_string(value)),
            ResolvedValue::Multiple(values) => out.extend(values.iter().map(scalar_to_string)),
            ResolvedValue::Group(entries) => {
                for entry in entries {
                    collect_lines(entry, out);
                }
            }
        }
    }
}

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\\. _-]").unwrap());

/// Replace every `\ . _ -` and space in `text` with the picked `separator`
fn replace_separators(args: &ResolvedArgs) -> TransformResult<Vec<String>> {
    let text = required(args, "text")?
        .as_text()
        .ok_or_else(|| wrong_shape("text", "text input"))?;
    let separator = required(args, "separator")?
        .as_single()
        .and_then(Value::as_str)
        .ok_or_else(|| wrong_shape("separator", "single string selection"))?;

    Ok(vec![SEPARATORS.replace_all(text, separator).into_owned()])
}

/// A JSON object skeleton with one empty string member per picked field
fn json_object(args: &ResolvedArgs) -> TransformResult<Vec<String>> {
    let fields = required(args, "fields")?
        .as_multiple()
        .ok_or_else(|| wrong_shape("fields", "multi-pick selection"))?;

    let mut body = vec!["{".to_string()];
    for (index, field) in fields.iter().enumerate() {
        let comma = if index + 1 < fields.len() { "," } else { "" };
        body.push(format!("    \"{}\": \"\"{}", scalar_to_string(field), comma));
    }
    body.push("}".to_string());
    Ok(body)
}

fn required<'a>(args: &'a ResolvedArgs, name: &str) -> TransformResult<&'a ResolvedValue> {
    args.get(name)
        .ok_or_else(|| TransformError::MissingArgument(name.to_string()))
}

fn wrong_shape(name: &str, expected: &str) -> TransformError {
    TransformError::WrongShape {
        name: name.to_string(),
        expected: expected.to_string(),
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(pairs: Vec<(&str, ResolvedValue)>) -> ResolvedArgs {
        pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    #[test]
    fn test_template_renders_without_escaping() {
        let transform = Transform::template("<a href=\"{{url}}\">{{label}}</a>");
        let resolved = args(vec![
            ("url", ResolvedValue::Text("a&b".to_string())),
            ("label", ResolvedValue::Text("<x>".to_string())),
        ]);
        assert_eq!(
            transform.apply(&resolved).unwrap(),
            vec!["<a href=\"a&b\"><x></a>".to_string()]
        );
    }

    #[test]
    fn test_template_splits_lines_and_iterates_groups() {
        let mut first = ResolvedArgs::new();
        first.insert("x", ResolvedValue::Text("one".to_string()));
        let mut second = ResolvedArgs::new();
        second.insert("x", ResolvedValue::Text("two".to_string()));
        let resolved = args(vec![(
            "g",
            ResolvedValue::Group(vec![first, second]),
        )]);

        let transform = Transform::template("start\n{{#each g}}[{{x}}]{{/each}}\nend\n");
        assert_eq!(
            transform.apply(&resolved).unwrap(),
            vec!["start", "[one][two]", "end"]
        );
    }

    #[test]
    fn test_template_compile_rejects_unclosed_block() {
        assert!(Transform::compile_template("{{#each g}}").is_err());
        assert!(Transform::compile_template("{{name}}").is_ok());
    }

    #[test]
    fn test_builtin_lines_flattens_in_order() {
        let mut entry = ResolvedArgs::new();
        entry.insert("x", ResolvedValue::Text("nested".to_string()));
        let resolved = args(vec![
            ("a", ResolvedValue::Text("hi".to_string())),
            ("b", ResolvedValue::Multiple(vec![json!(1), json!("two")])),
            ("g", ResolvedValue::Group(vec![entry])),
        ]);

        let registry = TransformRegistry::with_builtins();
        let func = registry.get("lines").unwrap();
        assert_eq!(func(&resolved).unwrap(), vec!["hi", "1", "two", "nested"]);
    }

    #[test]
    fn test_builtin_replace_separators() {
        let resolved = args(vec![
            ("text", ResolvedValue::Text("word1 word2-word3.word4_word5".to_string())),
            ("separator", ResolvedValue::Single(json!("-"))),
        ]);
        let output = replace_separators(&resolved).unwrap();
        assert_eq!(output, vec!["word1-word2-word3-word4-word5"]);
    }

    #[test]
    fn test_builtin_replace_separators_reuses_pattern() {
        for separator in ["/", "::"] {
            let resolved = args(vec![
                ("text", ResolvedValue::Text(r"a\b.c".to_string())),
                ("separator", ResolvedValue::Single(json!(separator))),
            ]);
            assert_eq!(replace_separators(&resolved).unwrap(), vec![format!("a{separator}b{separator}c")]);
        }
    }

    #[test]
    fn test_builtin_replace_separators_reports_missing_argument() {
        let resolved = args(vec![("text", ResolvedValue::Text("a b".to_string()))]);
        assert_eq!(
            replace_separators(&resolved),
            Err(TransformError::MissingArgument("separator".to_string()))
        );
    }

    #[test]
    fn test_builtin_json_object() {
        let resolved = args(vec![(
            "fields",
            ResolvedValue::Multiple(vec![json!("name"), json!("age")]),
        )]);
        assert_eq!(
            json_object(&resolved).unwrap(),
            vec!["{", "    \"name\": \"\",", "    \"age\": \"\"", "}"]
        );
    }

    #[test]
    fn test_builtin_json_object_rejects_single_pick() {
        let resolved = args(vec![("fields", ResolvedValue::Single(json!("name")))]);
        assert!(matches!(
            json_object(&resolved),
            Err(TransformError::WrongShape { .. })
        ));
    }

    #[test]
    fn test_registry_registration() {
        let mut registry = TransformRegistry::new();
        assert!(!registry.contains("shout"));
        registry.register("shout", |args: &ResolvedArgs| {
            Ok(args
                .iter()
                .filter_map(|(_, value)| value.as_text())
                .map(str::to_uppercase)
                .collect())
        });
        assert!(registry.contains("shout"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["shout"]);

        let resolved = args(vec![("a", ResolvedValue::Text("hey".to_string()))]);
        let transform = Transform::builtin("shout", registry.get("shout").unwrap());
        assert_eq!(transform.apply(&resolved).unwrap(), vec!["HEY"]);
    }
}
