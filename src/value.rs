use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use serde::Serialize;
use serde_yaml::{Mapping, Value as YamlValue};

/// Top level invoice or config mapping.
pub type Document = BTreeMap<String, Value>;

/// A dynamically typed field or table cell as read from YAML.
#[derive(Serialize, Debug, PartialEq, Clone)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Seq(Vec<Value>),
    Map(Document),
}

impl Value {
    /// Numeric reading of a cell. Strings are parsed as floats, anything
    /// that isn't a number counts as zero.
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
            Value::String(s) => s.parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<YamlValue> for Value {
    fn from(value: YamlValue) -> Self {
        match value {
            YamlValue::Null => Value::Null,
            YamlValue::Bool(b) => Value::Bool(b),
            YamlValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or_default()),
            },
            YamlValue::String(s) => Value::String(s),
            YamlValue::Sequence(items) => {
                Value::Seq(items.into_iter().map(Value::from).collect())
            }
            YamlValue::Mapping(mapping) => Value::Map(to_document(mapping)),
            YamlValue::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

/// Converts a YAML mapping, dropping any key that isn't a string.
pub fn to_document(mapping: Mapping) -> Document {
    mapping
        .into_iter()
        .filter_map(|(key, value)| match key {
            YamlValue::String(key) => Some((key, Value::from(value))),
            other => {
                warn!("Ignoring non-string key: {:?}", other);
                None
            }
        })
        .collect()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => f.write_str(s),
            Value::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, item)?;
                }
                f.write_str("}")
            }
        }
    }
}
