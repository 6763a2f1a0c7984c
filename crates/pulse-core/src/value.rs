// crates/pulse-core/src/value.rs - Resolved argument values
//
// The structured data produced by walking a schema against live answers.
// Shapes follow the schema exactly:
//
//   Input                          -> Text("...")
//   Selection, allow_multiple=false -> Single(value)
//   Selection, allow_multiple=true  -> Multiple([value, ...])   (declared order)
//   Group                          -> Group([{...}, {...}])     (one per repetition)
//
// Transforms depend on the Single/Multiple distinction, so it is never
// collapsed, not even for a one-element multi-pick.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Value of a single resolved argument
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    Text(String),
    Single(Value),
    Multiple(Vec<Value>),
    Group(Vec<ResolvedArgs>),
}

impl ResolvedValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_single(&self) -> Option<&Value> {
        match self {
            Self::Single(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_multiple(&self) -> Option<&[Value]> {
        match self {
            Self::Multiple(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&[ResolvedArgs]> {
        match self {
            Self::Group(entries) => Some(entries),
            _ => None,
        }
    }

    /// Plain JSON rendering of the value
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Single(value) => value.clone(),
            Self::Multiple(values) => Value::Array(values.clone()),
            Self::Group(entries) => Value::Array(entries.iter().map(ResolvedArgs::to_json).collect()),
        }
    }
}

impl Serialize for ResolvedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Single(value) => value.serialize(serializer),
            Self::Multiple(values) => values.serialize(serializer),
            Self::Group(entries) => entries.serialize(serializer),
        }
    }
}

/// Mapping from argument name to resolved value, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedArgs(IndexMap<String, ResolvedValue>);

impl ResolvedArgs {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ResolvedValue) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, ResolvedValue)> for ResolvedArgs {
    fn from_iter<I: IntoIterator<Item = (String, ResolvedValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
