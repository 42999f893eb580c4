use std::collections::BTreeMap;

use serde::Deserialize;

use crate::value::Value;

/// A node of the record tree
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Record {
    pub key: String,
    #[serde(default)]
    pub disabled: bool,
    /// Detail text shown under the row while it is expanded
    #[serde(default)]
    pub expand: Option<String>,
    #[serde(default)]
    pub children: Option<Vec<Record>>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

static NULL: Value = Value::Null;

impl Record {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Record>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Field value by data index; a missing field reads as `Null`
    pub fn get(&self, data_index: &str) -> &Value {
        self.fields.get(data_index).unwrap_or(&NULL)
    }

    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }
}
