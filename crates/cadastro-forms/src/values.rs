// File: src/values.rs
// Purpose: Current field values of a form and the normalized payload produced on submit

use crate::error::PathError;
use crate::path::FieldPath;
use crate::schema::{FormSchema, GroupSchema};
use crate::value::FieldValue;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One entry of a repeating group.
///
/// `key` stays with the entry across removals, so renderers can key rows by it.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupEntry {
    key: Uuid,
    values: BTreeMap<String, FieldValue>,
}

impl GroupEntry {
    fn from_schema(schema: &GroupSchema) -> Self {
        Self {
            key: Uuid::new_v4(),
            values: schema
                .fields()
                .map(|(name, field)| (name.to_string(), field.initial_value().clone()))
                .collect(),
        }
    }

    pub fn key(&self) -> Uuid {
        self.key
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }
}

/// Mapping from field name to current value, created from schema defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    fields: BTreeMap<String, FieldValue>,
    groups: BTreeMap<String, Vec<GroupEntry>>,
}

impl FormValues {
    pub fn from_schema(schema: &FormSchema) -> Self {
        Self {
            fields: schema
                .fields()
                .map(|(name, field)| (name.to_string(), field.initial_value().clone()))
                .collect(),
            groups: schema
                .groups()
                .iter()
                .map(|group| (group.name().to_string(), Vec::new()))
                .collect(),
        }
    }

    pub fn get(&self, path: &FieldPath) -> Option<&FieldValue> {
        match path {
            FieldPath::Field(name) => self.fields.get(name),
            FieldPath::Entry {
                group,
                index,
                field,
            } => self.groups.get(group)?.get(*index)?.get(field),
        }
    }

    /// Overwrite an existing field. Unknown fields and entries are rejected.
    pub fn set(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), PathError> {
        let slot = match path {
            FieldPath::Field(name) => self
                .fields
                .get_mut(name)
                .ok_or_else(|| PathError::UnknownField(name.clone()))?,
            FieldPath::Entry {
                group,
                index,
                field,
            } => {
                let entries = self
                    .groups
                    .get_mut(group)
                    .ok_or_else(|| PathError::UnknownGroup(group.clone()))?;
                let entry = entries.get_mut(*index).ok_or_else(|| PathError::MissingEntry {
                    group: group.clone(),
                    index: *index,
                })?;
                entry
                    .values
                    .get_mut(field)
                    .ok_or_else(|| PathError::UnknownField(path.to_string()))?
            }
        };
        *slot = value;
        Ok(())
    }

    /// Append a defaulted entry and return its index
    pub fn push_entry(&mut self, schema: &GroupSchema) -> usize {
        let entries = self.groups.entry(schema.name().to_string()).or_default();
        entries.push(GroupEntry::from_schema(schema));
        entries.len() - 1
    }

    pub fn remove_entry(&mut self, group: &str, index: usize) -> Result<GroupEntry, PathError> {
        let entries = self
            .groups
            .get_mut(group)
            .ok_or_else(|| PathError::UnknownGroup(group.to_string()))?;
        if index >= entries.len() {
            return Err(PathError::MissingEntry {
                group: group.to_string(),
                index,
            });
        }
        Ok(entries.remove(index))
    }

    pub fn entries(&self, group: &str) -> &[GroupEntry] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn group_len(&self, group: &str) -> usize {
        self.entries(group).len()
    }
}

/// Submitted form values after every rule passed and every transform ran.
///
/// Dotted field names expand into nested objects and repeating groups into arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedValues {
    json: JsonValue,
}

impl NormalizedValues {
    pub(crate) fn build(
        fields: Vec<(String, FieldValue)>,
        groups: Vec<(String, Vec<Vec<(String, FieldValue)>>)>,
    ) -> Self {
        let mut root = Map::new();

        for (name, value) in fields {
            insert_dotted(&mut root, &name, value.to_json());
        }

        for (group, entries) in groups {
            let items = entries
                .into_iter()
                .map(|entry| {
                    let mut obj = Map::new();
                    for (name, value) in entry {
                        insert_dotted(&mut obj, &name, value.to_json());
                    }
                    JsonValue::Object(obj)
                })
                .collect();
            insert_dotted(&mut root, &group, JsonValue::Array(items));
        }

        Self {
            json: JsonValue::Object(root),
        }
    }

    /// Look up a value by dotted path, e.g. `especialidades.0.anoConclusao`
    pub fn get(&self, path: &str) -> Option<&JsonValue> {
        path.split('.').try_fold(&self.json, |node, segment| match node {
            JsonValue::Array(items) => items.get(segment.parse::<usize>().ok()?),
            JsonValue::Object(map) => map.get(segment),
            _ => None,
        })
    }

    pub fn as_json(&self) -> &JsonValue {
        &self.json
    }

    pub fn into_json(self) -> JsonValue {
        self.json
    }

    /// Top-level keys of the payload
    pub fn keys(&self) -> Vec<&str> {
        match &self.json {
            JsonValue::Object(map) => map.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.json.clone())
    }
}

fn insert_dotted(root: &mut Map<String, JsonValue>, name: &str, value: JsonValue) {
    let mut segments = name.split('.').peekable();
    let mut node = root;

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            node.insert(segment.to_string(), value);
            return;
        }
        let child = node
            .entry(segment.to_string())
            .or_insert_with(|| JsonValue::Object(Map::new()));
        if !child.is_object() {
            *child = JsonValue::Object(Map::new());
        }
        node = match child {
            JsonValue::Object(map) => map,
            _ => return,
        };
    }
}
