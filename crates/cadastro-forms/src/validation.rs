// File: src/validation.rs
// Purpose: Per-field validation outcomes and the error map of a form

use crate::path::FieldPath;
use crate::value::FieldValue;
use std::collections::BTreeMap;

/// Outcome of validating a single field
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// Field passed; carries the normalized value used downstream
    Valid(FieldValue),
    /// Field failed; messages in rule order, the first one is displayed
    Invalid(Vec<String>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid(_) => None,
            ValidationResult::Invalid(messages) => messages.first().map(String::as_str),
        }
    }

    pub fn ok(self) -> Option<FieldValue> {
        match self {
            ValidationResult::Valid(value) => Some(value),
            ValidationResult::Invalid(_) => None,
        }
    }

    pub fn messages(&self) -> &[String] {
        match self {
            ValidationResult::Valid(_) => &[],
            ValidationResult::Invalid(messages) => messages,
        }
    }
}

/// Field paths to error messages
///
/// Each field can have multiple validation errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    errors: BTreeMap<FieldPath, Vec<String>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the messages of a field; an empty list clears it
    pub fn set(&mut self, path: FieldPath, messages: Vec<String>) {
        if messages.is_empty() {
            self.errors.remove(&path);
        } else {
            self.errors.insert(path, messages);
        }
    }

    pub fn push(&mut self, path: FieldPath, message: impl Into<String>) {
        self.errors.entry(path).or_default().push(message.into());
    }

    pub fn clear(&mut self, path: &FieldPath) {
        self.errors.remove(path);
    }

    pub fn has_error(&self, path: &FieldPath) -> bool {
        self.errors.contains_key(path)
    }

    /// Get first error for a specific field
    pub fn first(&self, path: &FieldPath) -> Option<&str> {
        self.errors
            .get(path)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Get all errors for a specific field
    pub fn get(&self, path: &FieldPath) -> Option<&[String]> {
        self.errors.get(path).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &Vec<String>)> {
        self.errors.iter()
    }

    /// Drop the errors of one group entry and shift later entries down by one
    pub fn remove_entry(&mut self, group: &str, removed: usize) {
        let errors = std::mem::take(&mut self.errors);
        self.errors = errors
            .into_iter()
            .filter_map(|(path, messages)| {
                shift_entry_path(path, group, removed).map(|path| (path, messages))
            })
            .collect();
    }

    /// First message per field, keyed by dotted path
    pub fn to_flat_map(&self) -> BTreeMap<String, String> {
        self.errors
            .iter()
            .filter_map(|(path, messages)| {
                messages.first().map(|m| (path.to_string(), m.clone()))
            })
            .collect()
    }
}

/// Re-index a path after entry `removed` of `group` is deleted.
///
/// Returns `None` for paths inside the removed entry.
pub(crate) fn shift_entry_path(path: FieldPath, group: &str, removed: usize) -> Option<FieldPath> {
    match path {
        FieldPath::Entry {
            group: g,
            index,
            field,
        } if g == group => {
            if index == removed {
                None
            } else if index > removed {
                Some(FieldPath::Entry {
                    group: g,
                    index: index - 1,
                    field,
                })
            } else {
                Some(FieldPath::Entry { group: g, index, field })
            }
        }
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_and_clear() {
        let mut errors = FormErrors::new();
        let crm = FieldPath::field("crm");
        errors.set(crm.clone(), vec!["O campo CRM é obrigatório".to_string()]);
        assert!(errors.has_error(&crm));
        assert_eq!(errors.first(&crm), Some("O campo CRM é obrigatório"));

        errors.set(crm.clone(), Vec::new());
        assert!(!errors.has_error(&crm));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_remove_entry_reindexes() {
        let mut errors = FormErrors::new();
        errors.push(FieldPath::entry("especialidades", 0, "instituicao"), "a");
        errors.push(FieldPath::entry("especialidades", 1, "instituicao"), "b");
        errors.push(FieldPath::entry("especialidades", 2, "anoConclusao"), "c");
        errors.push(FieldPath::field("crm"), "d");

        errors.remove_entry("especialidades", 1);

        let flat = errors.to_flat_map();
        let expected: BTreeMap<String, String> = [
            ("crm", "d"),
            ("especialidades.0.instituicao", "a"),
            ("especialidades.1.anoConclusao", "c"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(flat, expected);
    }

    #[test]
    fn test_validation_result_accessors() {
        let ok = ValidationResult::Valid(FieldValue::Number(1.0));
        assert!(ok.is_valid());
        assert_eq!(ok.message(), None);

        let bad = ValidationResult::Invalid(vec!["first".into(), "second".into()]);
        assert_eq!(bad.message(), Some("first"));
        assert_eq!(bad.messages().len(), 2);
        assert_eq!(bad.ok(), None);
    }
}
