// crates/pulse-core/src/schema.rs - Validated snippet schema types
//
// These types only ever come out of `validate::validate_catalog`. Once a
// value of these types exists, every invariant the validator checks holds:
// names are non-blank and unique per list, selections have at least one
// option with distinct non-blank labels, groups have at least one subarg.
//
// SHAPE:
// Catalog
// └── SnippetDefinition { name, transform, regex?, active, args }
//     └── ArgumentSpec { name, placeholder?, prompt?, kind }
//         ├── Input
//         ├── Selection { options: [(label, value)], allow_multiple }
//         └── Group { subargs: [ArgumentSpec] }   (repeating construct)

use regex::Regex;
use serde_json::Value;

use crate::transform::Transform;

/// One `[label, value]` pair of a selection argument
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOption {
    /// Text shown to the user
    pub label: String,
    /// Opaque data handed to the transform when this label is picked
    pub value: Value,
}

impl SelectionOption {
    pub fn new(label: impl Into<String>, value: Value) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// The three argument kinds of the schema language
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentKind {
    /// Free text, resolved to a string
    Input,

    /// Pick one or many labels, resolved to the declared value(s)
    Selection {
        options: Vec<SelectionOption>,
        allow_multiple: bool,
    },

    /// Repeat `subargs` until the user declines, resolved to a list of mappings
    Group { subargs: Vec<ArgumentSpec> },
}

/// One node of the argument schema
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    pub name: String,
    pub placeholder: Option<String>,
    pub prompt: Option<String>,
    pub kind: ArgumentKind,
}

impl ArgumentSpec {
    pub fn input(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            placeholder: None,
            prompt: None,
            kind: ArgumentKind::Input,
        }
    }

    pub fn selection(
        name: impl Into<String>,
        options: Vec<SelectionOption>,
        allow_multiple: bool,
    ) -> Self {
        Self {
            name: name.into(),
            placeholder: None,
            prompt: None,
            kind: ArgumentKind::Selection {
                options,
                allow_multiple,
            },
        }
    }

    pub fn group(name: impl Into<String>, subargs: Vec<ArgumentSpec>) -> Self {
        Self {
            name: name.into(),
            placeholder: None,
            prompt: None,
            kind: ArgumentKind::Group { subargs },
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Schema tag as written in catalog files
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ArgumentKind::Input => "input",
            ArgumentKind::Selection { .. } => "selection",
            ArgumentKind::Group { .. } => "group",
        }
    }
}

/// A named snippet: when it applies, what to ask, how to render
#[derive(Debug, Clone)]
pub struct SnippetDefinition {
    pub name: String,
    pub transform: Transform,
    /// Pattern over file paths; `None` means the snippet applies everywhere
    pub regex: Option<Regex>,
    pub active: bool,
    pub args: Vec<ArgumentSpec>,
}

impl SnippetDefinition {
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            regex: None,
            active: true,
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<ArgumentSpec>) -> Self {
        self.args = args;
        self
    }

    pub fn with_regex(mut self, regex: Regex) -> Self {
        self.regex = Some(regex);
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Whether the snippet is offered for the given file path
    pub fn applies_to(&self, file_path: &str) -> bool {
        if !self.active {
            return false;
        }

        match &self.regex {
            Some(regex) => regex.is_match(file_path),
            None => true,
        }
    }
}

/// A validated, ordered list of snippet definitions
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    snippets: Vec<SnippetDefinition>,
}

impl Catalog {
    pub(crate) fn new(snippets: Vec<SnippetDefinition>) -> Self {
        Self { snippets }
    }

    pub fn get(&self, name: &str) -> Option<&SnippetDefinition> {
        self.snippets.iter().find(|snippet| snippet.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SnippetDefinition> {
        self.snippets.iter()
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}
