// crates/pulse-core/src/validate.rs - Catalog schema validation
//
// Turns an untyped document tree (parsed from YAML or JSON) into a typed
// `Catalog`, or explains precisely why it can't. This is the only producer
// of `SnippetDefinition` values, so everything downstream can rely on the
// schema invariants without re-checking them.
//
// ERROR POLICY:
// Validation walks the whole tree and collects every error instead of
// stopping at the first one. Each error carries an addressable path:
//
//   snippets[2].args['root'].selection.options[1][0]
//   └─ snippet by index  └─ argument by name (index until the name is valid)
//
// Validation is pure: no I/O, no prompting, no global state.

use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::schema::{ArgumentKind, ArgumentSpec, Catalog, SelectionOption, SnippetDefinition};
use crate::transform::{Transform, TransformRegistry};

/// Argument type tags accepted in catalog files
pub const ARGUMENT_TYPES: [&str; 3] = ["input", "selection", "group"];

/// Legacy spelling of `group`
const LEGACY_GROUP_TYPE: &str = "infinite";

/// A single schema violation, located by path
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{path} {reason}")]
pub struct SchemaError {
    /// Dotted/indexed path to the offending node
    pub path: String,
    /// What is wrong with it
    pub reason: String,
}

impl SchemaError {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Every violation found in one catalog, in document order
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", summarize(.0))]
pub struct SchemaErrors(pub Vec<SchemaError>);

impl SchemaErrors {
    pub fn first(&self) -> Option<&SchemaError> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn summarize(errors: &[SchemaError]) -> String {
    match errors {
        [single] => single.to_string(),
        _ => {
            let mut message = format!("{} schema errors:", errors.len());
            for error in errors {
                message.push_str(&format!("\n  - {error}"));
            }
            message
        }
    }
}

/// Validate a snippet list and build the typed catalog
///
/// `value` is the list itself (the content of the `snippets` key), or
/// `Value::Null` when the document did not define one.
pub fn validate_catalog(value: &Value, registry: &TransformRegistry) -> Result<Catalog, SchemaErrors> {
    let mut validator = Validator::new(registry);
    let snippets = validator.catalog(value);

    if validator.errors.is_empty() {
        Ok(Catalog::new(snippets))
    } else {
        Err(SchemaErrors(validator.errors))
    }
}

/// Accumulates errors while walking the document
///
/// Every check method returns `None` when the node it looked at is unusable;
/// the reason has already been pushed onto `errors` by then.
struct Validator<'r> {
    registry: &'r TransformRegistry,
    errors: Vec<SchemaError>,
}

impl<'r> Validator<'r> {
    fn new(registry: &'r TransformRegistry) -> Self {
        Self {
            registry,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, path: impl fmt::Display, reason: impl Into<String>) {
        self.errors.push(SchemaError::new(path.to_string(), reason));
    }

    fn catalog(&mut self, value: &Value) -> Vec<SnippetDefinition> {
        let path = "snippets";

        let items = match value {
            Value::Null => {
                self.fail(path, "is missing");
                return Vec::new();
            }
            Value::Array(items) => items,
            _ => {
                self.fail(path, "must be a list");
                return Vec::new();
            }
        };

        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut snippets = Vec::new();

        for (index, item) in items.iter().enumerate() {
            let item_path = format!("{path}[{index}]");

            // Duplicate detection only needs the name, which may be valid even
            // when the rest of the definition isn't.
            if let Some(name) = item.get("name").and_then(Value::as_str) {
                if !name.trim().is_empty() {
                    if let Some(first) = seen.get(name) {
                        self.fail(
                            format!("{item_path}.name"),
                            format!("'{name}' duplicates snippets[{first}].name"),
                        );
                    } else {
                        seen.insert(name.to_string(), index);
                    }
                }
            }

            if let Some(snippet) = self.snippet(item, &item_path) {
                snippets.push(snippet);
            }
        }

        snippets
    }

    fn snippet(&mut self, value: &Value, path: &str) -> Option<SnippetDefinition> {
        let Some(record) = value.as_object() else {
            self.fail(path, "must be a record");
            return None;
        };

        let name = self.name(record, path);
        let transform = self.transform(record.get("transform"), &format!("{path}.transform"));
        let regex = self.regex(record.get("regex"), &format!("{path}.regex"));
        let active = self.optional_bool(record.get("active"), &format!("{path}.active"));

        let args = match present(record.get("args")) {
            Some(args) => self.argument_list(args, &format!("{path}.args"), false),
            None => Some(Vec::new()),
        };

        Some(SnippetDefinition {
            name: name?,
            transform: transform?,
            regex: regex?,
            active: active?.unwrap_or(true),
            args: args?,
        })
    }

    fn name(&mut self, record: &Map<String, Value>, path: &str) -> Option<String> {
        let path = format!("{path}.name");
        match present(record.get("name")) {
            None => {
                self.fail(path, "is missing");
                None
            }
            Some(Value::String(name)) if name.trim().is_empty() => {
                self.fail(path, "cannot be blank");
                None
            }
            Some(Value::String(name)) => Some(name.clone()),
            Some(_) => {
                self.fail(path, "must be a string");
                None
            }
        }
    }

    fn transform(&mut self, value: Option<&Value>, path: &str) -> Option<Transform> {
        let Some(value) = present(value) else {
            self.fail(path, "is missing");
            return None;
        };

        let Some(record) = value.as_object() else {
            self.fail(path, "must be a record with a 'template' or 'builtin' key");
            return None;
        };

        match (present(record.get("template")), present(record.get("builtin"))) {
            (Some(_), Some(_)) => {
                self.fail(path, "must not define both 'template' and 'builtin'");
                None
            }
            (None, None) => {
                self.fail(path, "must define a 'template' or 'builtin' key");
                None
            }
            (Some(template), None) => {
                let path = format!("{path}.template");
                let Some(source) = template.as_str() else {
                    self.fail(path, "must be a string");
                    return None;
                };
                match Transform::compile_template(source) {
                    Ok(()) => Some(Transform::template(source)),
                    Err(e) => {
                        self.fail(path, format!("is not a valid template: {e}"));
                        None
                    }
                }
            }
            (None, Some(builtin)) => {
                let path = format!("{path}.builtin");
                let Some(name) = builtin.as_str() else {
                    self.fail(path, "must be a string");
                    return None;
                };
                let registry = self.registry;
                match registry.get(name) {
                    Some(func) => Some(Transform::builtin(name, func)),
                    None => {
                        let known: Vec<&str> = registry.names().collect();
                        self.fail(
                            path,
                            format!("refers to unknown builtin '{name}' (known: {})", known.join(", ")),
                        );
                        None
                    }
                }
            }
        }
    }

    /// `Some(None)` when absent, `None` when invalid
    fn regex(&mut self, value: Option<&Value>, path: &str) -> Option<Option<Regex>> {
        match present(value) {
            None => Some(None),
            Some(Value::String(pattern)) => match Regex::new(pattern) {
                Ok(regex) => Some(Some(regex)),
                Err(e) => {
                    self.fail(path, format!("is not a valid pattern: {e}"));
                    None
                }
            },
            Some(_) => {
                self.fail(path, "must be a string pattern");
                None
            }
        }
    }

    fn optional_bool(&mut self, value: Option<&Value>, path: &str) -> Option<Option<bool>> {
        match present(value) {
            None => Some(None),
            Some(Value::Bool(flag)) => Some(Some(*flag)),
            Some(_) => {
                self.fail(path, "must be a boolean");
                None
            }
        }
    }

    fn optional_string(&mut self, value: Option<&Value>, path: &str) -> Option<Option<String>> {
        match present(value) {
            None => Some(None),
            Some(Value::String(text)) => Some(Some(text.clone())),
            Some(_) => {
                self.fail(path, "must be a string");
                None
            }
        }
    }

    fn argument_list(&mut self, value: &Value, path: &str, require_non_empty: bool) -> Option<Vec<ArgumentSpec>> {
        let Some(items) = value.as_array() else {
            self.fail(path, "must be a list");
            return None;
        };

        if require_non_empty && items.is_empty() {
            self.fail(path, "must not be empty");
            return None;
        }

        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut specs = Vec::with_capacity(items.len());
        let mut valid = true;

        for (index, item) in items.iter().enumerate() {
            let arg_path = match item.get("name").and_then(Value::as_str) {
                Some(name) if !name.trim().is_empty() => {
                    if let Some(first) = seen.get(name) {
                        self.fail(
                            format!("{path}[{index}].name"),
                            format!("'{name}' duplicates {path}[{first}].name"),
                        );
                        valid = false;
                        // The quoted path already belongs to the first occurrence
                        format!("{path}[{index}]")
                    } else {
                        seen.insert(name.to_string(), index);
                        format!("{path}['{name}']")
                    }
                }
                _ => format!("{path}[{index}]"),
            };

            match self.argument(item, &arg_path) {
                Some(spec) => specs.push(spec),
                None => valid = false,
            }
        }

        valid.then_some(specs)
    }

    fn argument(&mut self, value: &Value, path: &str) -> Option<ArgumentSpec> {
        let Some(record) = value.as_object() else {
            self.fail(path, "must be a record");
            return None;
        };

        let name = self.name(record, path);
        let placeholder = self.optional_string(record.get("placeholder"), &format!("{path}.placeholder"));
        let prompt = self.optional_string(record.get("prompt"), &format!("{path}.prompt"));
        let kind = self.argument_kind(record, path);

        Some(ArgumentSpec {
            name: name?,
            placeholder: placeholder?,
            prompt: prompt?,
            kind: kind?,
        })
    }

    fn argument_kind(&mut self, record: &Map<String, Value>, path: &str) -> Option<ArgumentKind> {
        let type_path = format!("{path}.type");
        let tag = match present(record.get("type")) {
            None => {
                self.fail(type_path, "is missing");
                return None;
            }
            Some(Value::String(tag)) => tag.as_str(),
            Some(_) => {
                self.fail(type_path, format!("must be one of {}", quoted_types()));
                return None;
            }
        };

        match tag {
            "input" => Some(ArgumentKind::Input),
            "selection" => self.selection(record.get("selection"), &format!("{path}.selection")),
            "group" | LEGACY_GROUP_TYPE => {
                let subargs_path = format!("{path}.subargs");
                let Some(subargs) = present(record.get("subargs")) else {
                    self.fail(subargs_path, "is missing");
                    return None;
                };
                let subargs = self.argument_list(subargs, &subargs_path, true)?;
                Some(ArgumentKind::Group { subargs })
            }
            other => {
                self.fail(
                    type_path,
                    format!("must be one of {} (found '{other}')", quoted_types()),
                );
                None
            }
        }
    }

    fn selection(&mut self, value: Option<&Value>, path: &str) -> Option<ArgumentKind> {
        let Some(value) = present(value) else {
            self.fail(path, "is missing");
            return None;
        };

        let Some(record) = value.as_object() else {
            self.fail(path, "must be a record");
            return None;
        };

        let allow_multiple = self.optional_bool(record.get("canPickMany"), &format!("{path}.canPickMany"));
        let options = self.options(record.get("options"), &format!("{path}.options"));

        Some(ArgumentKind::Selection {
            options: options?,
            allow_multiple: allow_multiple?.unwrap_or(false),
        })
    }

    fn options(&mut self, value: Option<&Value>, path: &str) -> Option<Vec<SelectionOption>> {
        let Some(value) = present(value) else {
            self.fail(path, "is missing");
            return None;
        };

        let Some(items) = value.as_array() else {
            self.fail(path, "must be a list");
            return None;
        };

        if items.is_empty() {
            self.fail(path, "must not be empty");
            return None;
        }

        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut options = Vec::with_capacity(items.len());
        let mut valid = true;

        for (index, item) in items.iter().enumerate() {
            let option_path = format!("{path}[{index}]");

            let pair = match item.as_array() {
                Some(pair) if pair.len() == 2 => pair,
                _ => {
                    self.fail(option_path, "must be a [label, value] pair");
                    valid = false;
                    continue;
                }
            };

            let label_path = format!("{option_path}[0]");
            match &pair[0] {
                Value::String(label) if label.trim().is_empty() => {
                    self.fail(label_path, "label cannot be blank");
                    valid = false;
                }
                Value::String(label) => {
                    if let Some(first) = seen.get(label.as_str()) {
                        self.fail(
                            label_path,
                            format!("label '{label}' duplicates {path}[{first}][0]"),
                        );
                        valid = false;
                    } else {
                        seen.insert(label.as_str(), index);
                        options.push(SelectionOption::new(label.clone(), pair[1].clone()));
                    }
                }
                _ => {
                    self.fail(label_path, "label must be a string");
                    valid = false;
                }
            }
        }

        valid.then_some(options)
    }
}

/// Treat an explicit `null` the same as an absent key
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}

fn quoted_types() -> String {
    let quoted: Vec<String> = ARGUMENT_TYPES.iter().map(|tag| format!("'{tag}'")).collect();
    format!("[{}]", quoted.join(", "))
}
