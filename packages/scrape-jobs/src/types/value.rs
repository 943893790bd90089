//! Recursively typed extracted values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Extracted data keyed by field name, in selector order.
pub type ScrapedData = IndexMap<String, ScrapedValue>;

/// A single extracted value.
///
/// Serializes as plain JSON (`"text"`, `1.5`, `true`, `null`, `{..}`, `[..]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum ScrapedValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<ScrapedValue>),
    Map(IndexMap<String, ScrapedValue>),
}

impl ScrapedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ScrapedValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScrapedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScrapedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScrapedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ScrapedValue]> {
        match self {
            ScrapedValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, ScrapedValue>> {
        match self {
            ScrapedValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for ScrapedValue {
    fn from(value: &str) -> Self {
        ScrapedValue::String(value.to_string())
    }
}

impl From<String> for ScrapedValue {
    fn from(value: String) -> Self {
        ScrapedValue::String(value)
    }
}

impl From<f64> for ScrapedValue {
    fn from(value: f64) -> Self {
        ScrapedValue::Number(value)
    }
}

impl From<bool> for ScrapedValue {
    fn from(value: bool) -> Self {
        ScrapedValue::Bool(value)
    }
}

impl<T: Into<ScrapedValue>> From<Option<T>> for ScrapedValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ScrapedValue::Null)
    }
}

impl From<Vec<ScrapedValue>> for ScrapedValue {
    fn from(value: Vec<ScrapedValue>) -> Self {
        ScrapedValue::List(value)
    }
}

impl From<IndexMap<String, ScrapedValue>> for ScrapedValue {
    fn from(value: IndexMap<String, ScrapedValue>) -> Self {
        ScrapedValue::Map(value)
    }
}
