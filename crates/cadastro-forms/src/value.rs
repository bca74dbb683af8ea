// File: src/value.rs
// Purpose: Field value types held by a form session

use cadastro_validation::format_number;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Handle to a file picked by the user (name, type and size only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub name: String,
    pub mime_type: String,
    #[serde(default)]
    pub size: u64,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: 0,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }
}

/// Supported value types in a form field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    /// Raw file-input selection
    Files(Vec<FileHandle>),
    /// Single file, produced by normalizing a selection
    File(FileHandle),
    Null,
}

impl FieldValue {
    /// Text shown back to the user in an input
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Files(files) => files
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            FieldValue::File(file) => file.name.clone(),
            FieldValue::Null => String::new(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// JSON form used in submitted payloads.
    ///
    /// Integral numbers become JSON integers so they deserialize into
    /// integer and float targets alike.
    pub fn to_json(&self) -> JsonValue {
        match self {
            FieldValue::Text(s) => JsonValue::String(s.clone()),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    JsonValue::from(*n as i64)
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(JsonValue::Number)
                        .unwrap_or(JsonValue::Null)
                }
            }
            FieldValue::Files(files) => {
                serde_json::to_value(files).unwrap_or(JsonValue::Null)
            }
            FieldValue::File(file) => serde_json::to_value(file).unwrap_or(JsonValue::Null),
            FieldValue::Null => JsonValue::Null,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<FileHandle> for FieldValue {
    fn from(file: FileHandle) -> Self {
        FieldValue::Files(vec![file])
    }
}

impl From<Vec<FileHandle>> for FieldValue {
    fn from(files: Vec<FileHandle>) -> Self {
        FieldValue::Files(files)
    }
}
