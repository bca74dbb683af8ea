// File: src/schema.rs
// Purpose: Declarative field rules and per-step form schemas

use crate::path::FieldPath;
use crate::refine::CrossFieldRule;
use crate::validation::ValidationResult;
use crate::value::FieldValue;
use cadastro_validation::{
    apply_mask, coerce_number, format_number, is_valid_email, lowercase, title_case, trim,
    uppercase, validate_max, validate_max_length, validate_min, validate_min_length,
    validate_pattern, Coerced,
};
use regex::Regex;

const NOT_A_NUMBER: &str = "Expected number, received nan";
const NOT_TEXT: &str = "Expected text";
const NOT_A_FILE_LIST: &str = "Expected a file selection";

/// Normalization applied once a field passes all of its checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    TitleCase,
    Lowercase,
    Uppercase,
    Trim,
    /// Keep only the first file of a selection
    FirstFile,
}

impl Transform {
    fn apply(self, value: FieldValue) -> FieldValue {
        match (self, value) {
            (Transform::TitleCase, FieldValue::Text(s)) => FieldValue::Text(title_case(&s)),
            (Transform::Lowercase, FieldValue::Text(s)) => FieldValue::Text(lowercase(&s)),
            (Transform::Uppercase, FieldValue::Text(s)) => FieldValue::Text(uppercase(&s)),
            (Transform::Trim, FieldValue::Text(s)) => FieldValue::Text(trim(&s)),
            (Transform::FirstFile, FieldValue::Files(files)) => files
                .into_iter()
                .next()
                .map(FieldValue::File)
                .unwrap_or(FieldValue::Null),
            (_, other) => other,
        }
    }
}

/// A single declarative rule. Rules that do not apply to the field kind are ignored.
#[derive(Debug, Clone)]
pub enum Check {
    MinLength { min: usize, message: String },
    MaxLength { max: usize, message: String },
    Pattern { regex: Regex, message: String },
    Email { message: String },
    Min { min: f64, message: String },
    Max { max: f64, message: String },
}

impl Check {
    fn check_text(&self, value: &str) -> Option<Result<(), String>> {
        let result = match self {
            Check::MinLength { min, message } => {
                validate_min_length(value, *min).map_err(|_| message.clone())
            }
            Check::MaxLength { max, message } => {
                validate_max_length(value, *max).map_err(|_| message.clone())
            }
            Check::Pattern { regex, message } => {
                validate_pattern(value, regex).map_err(|_| message.clone())
            }
            Check::Email { message } => {
                if is_valid_email(value) {
                    Ok(())
                } else {
                    Err(message.clone())
                }
            }
            Check::Min { .. } | Check::Max { .. } => return None,
        };
        Some(result)
    }

    fn check_number(&self, value: f64) -> Option<Result<(), String>> {
        let result = match self {
            Check::Min { min, message } => validate_min(value, *min).map_err(|_| message.clone()),
            Check::Max { max, message } => validate_max(value, *max).map_err(|_| message.clone()),
            _ => return None,
        };
        Some(result)
    }
}

/// How raw input is interpreted before checks run
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    /// Coerces text to a number; `not_a_number` is reported for unparsable input
    Number { not_a_number: String },
    FileList,
}

/// Rules for one field: kind, default, checks, optional transform and input mask
#[derive(Debug, Clone)]
pub struct FieldSchema {
    kind: FieldKind,
    default: FieldValue,
    checks: Vec<Check>,
    transform: Option<Transform>,
    mask: Option<String>,
}

impl FieldSchema {
    pub fn text() -> Self {
        Self {
            kind: FieldKind::Text,
            default: FieldValue::Text(String::new()),
            checks: Vec::new(),
            transform: None,
            mask: None,
        }
    }

    pub fn number() -> Self {
        Self {
            kind: FieldKind::Number {
                not_a_number: NOT_A_NUMBER.to_string(),
            },
            default: FieldValue::Number(0.0),
            checks: Vec::new(),
            transform: None,
            mask: None,
        }
    }

    pub fn file_list() -> Self {
        Self {
            kind: FieldKind::FileList,
            default: FieldValue::Files(Vec::new()),
            checks: Vec::new(),
            transform: None,
            mask: None,
        }
    }

    /// Message reported when a number field receives non-numeric text
    pub fn not_a_number(mut self, message: impl Into<String>) -> Self {
        if let FieldKind::Number { not_a_number } = &mut self.kind {
            *not_a_number = message.into();
        }
        self
    }

    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = value.into();
        self
    }

    pub fn min_length(mut self, min: usize, message: impl Into<String>) -> Self {
        self.checks.push(Check::MinLength {
            min,
            message: message.into(),
        });
        self
    }

    pub fn max_length(mut self, max: usize, message: impl Into<String>) -> Self {
        self.checks.push(Check::MaxLength {
            max,
            message: message.into(),
        });
        self
    }

    pub fn pattern(mut self, regex: Regex, message: impl Into<String>) -> Self {
        self.checks.push(Check::Pattern {
            regex,
            message: message.into(),
        });
        self
    }

    pub fn email(mut self, message: impl Into<String>) -> Self {
        self.checks.push(Check::Email {
            message: message.into(),
        });
        self
    }

    pub fn min(mut self, min: f64, message: impl Into<String>) -> Self {
        self.checks.push(Check::Min {
            min,
            message: message.into(),
        });
        self
    }

    pub fn max(mut self, max: f64, message: impl Into<String>) -> Self {
        self.checks.push(Check::Max {
            max,
            message: message.into(),
        });
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Input mask (`9` = digit slot) applied to raw text before it is stored
    pub fn mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = Some(mask.into());
        self
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Value a fresh session or a new group entry starts with
    pub fn initial_value(&self) -> &FieldValue {
        &self.default
    }

    pub fn input_mask(&self) -> Option<&str> {
        self.mask.as_deref()
    }

    /// Shape raw user input before storing it
    pub fn prepare_input(&self, raw: FieldValue) -> FieldValue {
        match (&self.mask, raw) {
            (Some(mask), FieldValue::Text(s)) => FieldValue::Text(apply_mask(&s, mask)),
            (_, raw) => raw,
        }
    }

    /// Run every check against `raw` and normalize on success
    pub fn validate(&self, raw: &FieldValue) -> ValidationResult {
        match &self.kind {
            FieldKind::Text => self.validate_text(raw),
            FieldKind::Number { not_a_number } => self.validate_number(raw, not_a_number),
            FieldKind::FileList => self.validate_files(raw),
        }
    }

    fn validate_text(&self, raw: &FieldValue) -> ValidationResult {
        let text = match raw {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Null => String::new(),
            FieldValue::Files(_) | FieldValue::File(_) => {
                return ValidationResult::Invalid(vec![NOT_TEXT.to_string()])
            }
        };

        let messages: Vec<String> = self
            .checks
            .iter()
            .filter_map(|check| check.check_text(&text))
            .filter_map(Result::err)
            .collect();

        self.finish(FieldValue::Text(text), messages)
    }

    fn validate_number(&self, raw: &FieldValue, not_a_number: &str) -> ValidationResult {
        let coerced = match raw {
            FieldValue::Number(n) if n.is_finite() => Coerced::Number(*n),
            FieldValue::Number(_) => Coerced::NotANumber,
            FieldValue::Text(s) => coerce_number(s),
            FieldValue::Null => Coerced::Number(0.0),
            FieldValue::Files(_) | FieldValue::File(_) => Coerced::NotANumber,
        };

        let Coerced::Number(n) = coerced else {
            return ValidationResult::Invalid(vec![not_a_number.to_string()]);
        };

        let messages: Vec<String> = self
            .checks
            .iter()
            .filter_map(|check| check.check_number(n))
            .filter_map(Result::err)
            .collect();

        self.finish(FieldValue::Number(n), messages)
    }

    fn validate_files(&self, raw: &FieldValue) -> ValidationResult {
        let files = match raw {
            FieldValue::Files(files) => files.clone(),
            FieldValue::File(file) => vec![file.clone()],
            _ => return ValidationResult::Invalid(vec![NOT_A_FILE_LIST.to_string()]),
        };
        self.finish(FieldValue::Files(files), Vec::new())
    }

    fn finish(&self, value: FieldValue, messages: Vec<String>) -> ValidationResult {
        if !messages.is_empty() {
            return ValidationResult::Invalid(messages);
        }
        match self.transform {
            Some(transform) => ValidationResult::Valid(transform.apply(value)),
            None => ValidationResult::Valid(value),
        }
    }
}

/// A variable-length list of structurally identical sub-forms
#[derive(Debug, Clone)]
pub struct GroupSchema {
    name: String,
    fields: Vec<(String, FieldSchema)>,
    min_entries: Option<(usize, String)>,
}

impl GroupSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            min_entries: None,
        }
    }

    pub fn field(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        self.fields.push((name.into(), schema));
        self
    }

    /// Require at least `min` entries at submit time
    pub fn min_entries(mut self, min: usize, message: impl Into<String>) -> Self {
        self.min_entries = Some((min, message.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.fields.iter().map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn field_schema(&self, name: &str) -> Option<&FieldSchema> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, schema)| schema)
    }

    pub fn required_entries(&self) -> Option<(usize, &str)> {
        self.min_entries
            .as_ref()
            .map(|(min, message)| (*min, message.as_str()))
    }
}

/// Complete rule set of one registration step
#[derive(Debug, Clone)]
pub struct FormSchema {
    name: String,
    fields: Vec<(String, FieldSchema)>,
    groups: Vec<GroupSchema>,
    rules: Vec<CrossFieldRule>,
}

impl FormSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            groups: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        self.fields.push((name.into(), schema));
        self
    }

    pub fn group(mut self, group: GroupSchema) -> Self {
        self.groups.push(group);
        self
    }

    pub fn rule(mut self, rule: CrossFieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.fields.iter().map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn groups(&self) -> &[GroupSchema] {
        &self.groups
    }

    pub fn rules(&self) -> &[CrossFieldRule] {
        &self.rules
    }

    pub fn group_schema(&self, name: &str) -> Option<&GroupSchema> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Schema of the field a path points at
    pub fn field_schema(&self, path: &FieldPath) -> Option<&FieldSchema> {
        match path {
            FieldPath::Field(name) => self
                .fields
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, schema)| schema),
            FieldPath::Entry { group, field, .. } => {
                self.group_schema(group)?.field_schema(field)
            }
        }
    }
}
