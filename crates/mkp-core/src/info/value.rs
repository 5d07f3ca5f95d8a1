//! Metadata record types.

use crate::collect::FileLists;
use crate::error::{MkpError, Result};
use indexmap::IndexMap;
use std::fmt;

/// Key holding the category -> file list mapping.
pub const FILES_KEY: &str = "files";
/// Key holding the total number of bundled files.
pub const NUM_FILES_KEY: &str = "num_files";
/// Key identifying the tool that packed the artifact.
pub const VERSION_PACKAGED_KEY: &str = "version.packaged";

/// A single metadata value.
///
/// Mirrors the literal subset the `info` entry is written in: `None`,
/// booleans, integers, floats, strings, sequences and string-keyed mappings.
/// Tuples read from legacy files become `List`. Mappings keep insertion
/// order.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<InfoValue>),
    Dict(IndexMap<String, InfoValue>),
}

impl InfoValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[InfoValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&IndexMap<String, InfoValue>> {
        match self {
            Self::Dict(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Plain-text rendering for identity fields such as name and version.
    ///
    /// Only strings and numbers have one.
    pub fn to_plain_string(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) if f.is_finite() => Some(format!("{f:?}")),
            _ => None,
        }
    }
}

impl From<&str> for InfoValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for InfoValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for InfoValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for InfoValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<usize> for InfoValue {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or(Self::Float(value as f64), Self::Int)
    }
}

impl From<f64> for InfoValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<InfoValue>> From<Option<T>> for InfoValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

impl<T: Into<InfoValue>> From<Vec<T>> for InfoValue {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for InfoValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::None,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                // u64 beyond i64 range and real floats both land here.
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::Str(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Dict(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&InfoValue> for serde_json::Value {
    fn from(value: &InfoValue) -> Self {
        use serde_json::Value;
        match value {
            InfoValue::None => Value::Null,
            InfoValue::Bool(b) => Value::Bool(*b),
            InfoValue::Int(i) => Value::from(*i),
            // JSON has no representation for inf/nan.
            InfoValue::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
            InfoValue::Str(s) => Value::String(s.clone()),
            InfoValue::List(items) => Value::Array(items.iter().map(Value::from).collect()),
            InfoValue::Dict(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// The package metadata record.
///
/// An open mapping from string keys to [`InfoValue`]s. Keys iterate in
/// insertion order; the JSON encoding keeps it, the literal encoding sorts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info(IndexMap<String, InfoValue>);

impl Info {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&InfoValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<InfoValue>) -> Option<InfoValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<InfoValue> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &InfoValue)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &IndexMap<String, InfoValue> {
        &self.0
    }

    pub fn into_map(self) -> IndexMap<String, InfoValue> {
        self.0
    }

    /// String field lookup; `None` when absent or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(InfoValue::as_str)
    }

    /// Package name, if present as a string or number.
    pub fn name(&self) -> Option<String> {
        self.get("name").and_then(InfoValue::to_plain_string)
    }

    /// Package version, if present as a string or number.
    pub fn version(&self) -> Option<String> {
        self.get("version").and_then(InfoValue::to_plain_string)
    }

    /// Decode the `files` mapping.
    ///
    /// A missing or `None` entry means no files. Anything other than a
    /// mapping of category -> list of strings is a format error.
    pub fn files(&self) -> Result<FileLists> {
        let mut out = FileLists::new();
        let map = match self.get(FILES_KEY) {
            None | Some(InfoValue::None) => return Ok(out),
            Some(InfoValue::Dict(map)) => map,
            Some(_) => return Err(MkpError::format("'files' is not a mapping")),
        };
        for (category, value) in map {
            let items = value.as_list().ok_or_else(|| {
                MkpError::format(format!("file list for '{category}' is not a sequence"))
            })?;
            let mut files = Vec::with_capacity(items.len());
            for item in items {
                let path = item.as_str().ok_or_else(|| {
                    MkpError::format(format!("file list for '{category}' contains a non-string"))
                })?;
                files.push(path.to_string());
            }
            out.insert(category.clone(), files);
        }
        Ok(out)
    }

    /// Store `files` and the matching `num_files` count.
    pub fn set_files(&mut self, files: &FileLists) {
        let dict = files
            .iter()
            .map(|(category, list)| (category.clone(), InfoValue::from(list.clone())))
            .collect();
        self.insert(FILES_KEY, InfoValue::Dict(dict));
        self.insert(NUM_FILES_KEY, crate::collect::count_files(files));
    }

    pub fn num_files(&self) -> Option<i64> {
        self.get(NUM_FILES_KEY).and_then(InfoValue::as_i64)
    }

    /// JSON view of the record.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                .collect(),
        )
    }

    /// Build a record from a JSON value; the value must be an object.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(map) => Some(Self(
                map.into_iter()
                    .map(|(k, v)| (k, InfoValue::from(v)))
                    .collect(),
            )),
            _ => None,
        }
    }
}

impl From<IndexMap<String, InfoValue>> for Info {
    fn from(map: IndexMap<String, InfoValue>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<InfoValue>> FromIterator<(K, V)> for Info {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match super::literal::format_info(self) {
            Ok(text) => f.write_str(&text),
            Err(_) => Err(fmt::Error),
        }
    }
}
