use std::fs;
use std::path::Path;

use log::debug;
use serde_yaml::Value as YamlValue;

use crate::error::LoadError;
use crate::value::{to_document, Document, Value};

pub fn parse(source: &str) -> Result<Document, LoadError> {
    let root: YamlValue = serde_yaml::from_str(source)?;
    match root {
        YamlValue::Mapping(mapping) => Ok(to_document(mapping)),
        _ => Err(LoadError::BadInvoiceRoot),
    }
}

pub fn load(path: &Path) -> Result<Document, LoadError> {
    let source = fs::read_to_string(path)?;
    parse(&source)
}

/// Loads a document that is allowed to be missing or broken, in which case
/// it contributes nothing.
pub fn load_optional(path: &Path) -> Document {
    load(path).unwrap_or_else(|error| {
        debug!("Skipping config {:?}: {}", path, error);
        Document::new()
    })
}

/// Fills keys that are missing or null in `invoice` from `defaults`.
pub fn merge(invoice: &mut Document, defaults: Document) {
    for (key, value) in defaults {
        let entry = invoice.entry(key).or_insert(Value::Null);
        if entry.is_null() {
            *entry = value;
        }
    }
}

/// Marks every line break in top level string fields with `<br>`.
pub fn expand_line_breaks(invoice: &mut Document) {
    for value in invoice.values_mut() {
        if let Value::String(s) = value {
            if s.contains('\n') {
                *s = s.split('\n').collect::<Vec<_>>().join("<br>\n");
            }
        }
    }
}
