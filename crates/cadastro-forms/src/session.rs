// File: src/session.rs
// Purpose: Form session holding values, visible errors and submit for one registration step

use crate::error::{PathError, SubmitError};
use crate::path::FieldPath;
use crate::refine::{CrossFieldRule, RuleOutcome};
use crate::schema::FormSchema;
use crate::submit::{Submission, SubmitHandler};
use crate::validation::{shift_entry_path, FormErrors, ValidationResult};
use crate::value::FieldValue;
use crate::values::{FormValues, NormalizedValues};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// When field changes are validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    OnChange,
    OnBlur,
    /// Nothing is validated before the first submit; changes re-validate afterwards
    OnSubmit,
    /// Validate on change and on blur
    #[default]
    All,
}

/// One active form: current values, touched fields, visible errors.
///
/// Sessions are independent; nothing is shared between steps.
#[derive(Debug, Clone)]
pub struct FormSession {
    schema: Arc<FormSchema>,
    values: FormValues,
    errors: FormErrors,
    touched: BTreeSet<FieldPath>,
    mode: ValidationMode,
    submit_count: u32,
    revision: u64,
}

impl FormSession {
    pub fn new(schema: Arc<FormSchema>) -> Self {
        Self::with_mode(schema, ValidationMode::default())
    }

    pub fn with_mode(schema: Arc<FormSchema>, mode: ValidationMode) -> Self {
        let values = FormValues::from_schema(&schema);
        Self {
            schema,
            values,
            errors: FormErrors::new(),
            touched: BTreeSet::new(),
            mode,
            submit_count: 0,
            revision: 0,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Store a new value for `path` and re-run the rules it takes part in
    pub fn set_field(&mut self, path: &str, value: impl Into<FieldValue>) -> Result<(), PathError> {
        let path = FieldPath::parse(path)?;
        self.set_field_at(&path, value.into())
    }

    pub fn set_field_at(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), PathError> {
        let prepared = {
            let field = self
                .schema
                .field_schema(path)
                .ok_or_else(|| self.unknown(path))?;
            field.prepare_input(value)
        };

        self.values.set(path, prepared)?;
        self.revision += 1;
        self.touched.insert(path.clone());
        debug!(form = %self.schema.name(), field = %path, "field changed");

        if self.validates_on_change() {
            self.revalidate(path);
        }
        Ok(())
    }

    /// Mark a field as left by the user
    pub fn blur_field(&mut self, path: &str) -> Result<(), PathError> {
        let path = FieldPath::parse(path)?;
        if self.values.get(&path).is_none() {
            return Err(self.unknown(&path));
        }
        self.touched.insert(path.clone());

        let validate = match self.mode {
            ValidationMode::OnBlur | ValidationMode::All => true,
            ValidationMode::OnChange | ValidationMode::OnSubmit => self.submit_count > 0,
        };
        if validate {
            self.revalidate(&path);
        }
        Ok(())
    }

    /// Validate every field and rule. Values are never modified.
    pub fn submit(&mut self) -> Submission {
        self.submit_count += 1;

        match self.collect() {
            Ok(values) => {
                self.errors = FormErrors::new();
                info!(form = %self.schema.name(), "form passed validation");
                Submission::Valid(values)
            }
            Err(errors) => {
                debug!(
                    form = %self.schema.name(),
                    invalid = errors.len(),
                    "form rejected on submit"
                );
                self.errors = errors.clone();
                Submission::Invalid(errors)
            }
        }
    }

    /// Submit and hand the values to `handler` when they pass
    pub fn submit_with(&mut self, handler: &dyn SubmitHandler) -> Submission {
        let submission = self.submit();
        if let Submission::Valid(values) = &submission {
            handler.on_submit(self.schema.name(), values);
        }
        submission
    }

    /// Submit and deserialize the normalized values into `T`
    pub fn submit_as<T: DeserializeOwned>(&mut self) -> Result<T, SubmitError> {
        match self.submit() {
            Submission::Valid(values) => Ok(values.deserialize()?),
            Submission::Invalid(errors) => Err(SubmitError::Invalid(errors)),
        }
    }

    /// Append an entry with every sub-field defaulted; returns its index
    pub fn add_group_entry(&mut self, group: &str) -> Result<usize, PathError> {
        let schema = Arc::clone(&self.schema);
        let group_schema = schema
            .group_schema(group)
            .ok_or_else(|| PathError::UnknownGroup(group.to_string()))?;

        let index = self.values.push_entry(group_schema);
        self.revision += 1;
        debug!(form = %schema.name(), group = %group, index, "group entry added");
        Ok(index)
    }

    /// Remove an entry; errors and touched state of later entries move down one index
    pub fn remove_group_entry(&mut self, group: &str, index: usize) -> Result<(), PathError> {
        self.values.remove_entry(group, index)?;
        self.errors.remove_entry(group, index);
        self.touched = std::mem::take(&mut self.touched)
            .into_iter()
            .filter_map(|path| shift_entry_path(path, group, index))
            .collect();
        self.revision += 1;
        debug!(form = %self.schema.name(), group = %group, index, "group entry removed");
        Ok(())
    }

    pub fn value(&self, path: &str) -> Option<&FieldValue> {
        FieldPath::parse(path).ok().and_then(|p| self.values.get(&p))
    }

    pub fn value_at(&self, path: &FieldPath) -> Option<&FieldValue> {
        self.values.get(path)
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// First visible error of a field
    pub fn error(&self, path: &str) -> Option<&str> {
        FieldPath::parse(path).ok().and_then(|p| self.errors.first(&p))
    }

    pub fn error_at(&self, path: &FieldPath) -> Option<&str> {
        self.errors.first(path)
    }

    /// Errors currently shown to the user
    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Run a field's own rules without touching session state
    pub fn validate_field(&self, path: &str) -> Result<ValidationResult, PathError> {
        let path = FieldPath::parse(path)?;
        if self.values.get(&path).is_none() {
            return Err(self.unknown(&path));
        }
        Ok(self.check(&path))
    }

    /// Aggregate validity over every field and rule
    pub fn is_valid(&self) -> bool {
        self.collect().is_ok()
    }

    pub fn is_touched(&self, path: &str) -> bool {
        FieldPath::parse(path)
            .map(|p| self.touched.contains(&p))
            .unwrap_or(false)
    }

    pub fn group_len(&self, group: &str) -> usize {
        self.values.group_len(group)
    }

    /// Stable keys of a group's entries, in order
    pub fn group_keys(&self, group: &str) -> Vec<Uuid> {
        self.values.entries(group).iter().map(|e| e.key()).collect()
    }

    /// Number of value writes since the session opened
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn submit_count(&self) -> u32 {
        self.submit_count
    }

    fn validates_on_change(&self) -> bool {
        match self.mode {
            ValidationMode::OnChange | ValidationMode::All => true,
            ValidationMode::OnBlur | ValidationMode::OnSubmit => self.submit_count > 0,
        }
    }

    fn unknown(&self, path: &FieldPath) -> PathError {
        match path {
            FieldPath::Entry { group, index, .. } if self.schema.group_schema(group).is_some() => {
                if *index >= self.values.group_len(group) {
                    PathError::MissingEntry {
                        group: group.clone(),
                        index: *index,
                    }
                } else {
                    PathError::UnknownField(path.to_string())
                }
            }
            FieldPath::Entry { group, .. } => PathError::UnknownGroup(group.clone()),
            FieldPath::Field(name) => PathError::UnknownField(name.clone()),
        }
    }

    /// Refresh visible errors of the changed field and of every rule target it feeds.
    ///
    /// A rule target the user has not reached yet stays quiet until submit.
    fn revalidate(&mut self, changed: &FieldPath) {
        let mut affected = vec![changed.clone()];
        for rule in self.schema.rules() {
            let target = rule.target();
            if !rule.depends_on(changed) || affected.contains(target) {
                continue;
            }
            if self.touched.contains(target) || self.submit_count > 0 {
                affected.push(target.clone());
            }
        }

        for path in affected {
            let messages = self.outcome(&path).err().unwrap_or_default();
            self.errors.set(path, messages);
        }
    }

    fn check(&self, path: &FieldPath) -> ValidationResult {
        match (self.schema.field_schema(path), self.values.get(path)) {
            (Some(field), Some(value)) => field.validate(value),
            _ => ValidationResult::Invalid(vec![format!("unknown field: {}", path)]),
        }
    }

    /// Field rules first; cross-field rules targeting the field only once those pass
    fn outcome(&self, path: &FieldPath) -> Result<FieldValue, Vec<String>> {
        let value = match self.check(path) {
            ValidationResult::Valid(value) => value,
            ValidationResult::Invalid(messages) => return Err(messages),
        };

        let failed: Vec<String> = self
            .schema
            .rules()
            .iter()
            .filter(|rule| rule.target() == path)
            .filter(|rule| self.evaluate(rule) == RuleOutcome::Failed)
            .map(|rule| rule.message().to_string())
            .collect();

        if failed.is_empty() {
            Ok(value)
        } else {
            Err(failed)
        }
    }

    fn evaluate(&self, rule: &CrossFieldRule) -> RuleOutcome {
        let valid: BTreeMap<FieldPath, FieldValue> = rule
            .dependencies()
            .into_iter()
            .filter_map(|dep| self.check(dep).ok().map(|value| (dep.clone(), value)))
            .collect();
        rule.evaluate(&valid)
    }

    fn collect(&self) -> Result<NormalizedValues, FormErrors> {
        let mut errors = FormErrors::new();
        let mut fields = Vec::new();
        let mut groups = Vec::new();

        for (name, _) in self.schema.fields() {
            let path = FieldPath::field(name);
            match self.outcome(&path) {
                Ok(value) => fields.push((name.to_string(), value)),
                Err(messages) => errors.set(path, messages),
            }
        }

        for group in self.schema.groups() {
            let len = self.values.group_len(group.name());
            if let Some((min, message)) = group.required_entries() {
                if cadastro_validation::validate_min_items(len, min).is_err() {
                    errors.push(FieldPath::field(group.name()), message);
                }
            }

            let mut entries = Vec::with_capacity(len);
            for index in 0..len {
                let mut entry = Vec::new();
                for (name, _) in group.fields() {
                    let path = FieldPath::entry(group.name(), index, name);
                    match self.outcome(&path) {
                        Ok(value) => entry.push((name.to_string(), value)),
                        Err(messages) => errors.set(path, messages),
                    }
                }
                entries.push(entry);
            }
            groups.push((group.name().to_string(), entries));
        }

        if errors.is_empty() {
            Ok(NormalizedValues::build(fields, groups))
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSchema, GroupSchema, Transform};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn credentials() -> Arc<FormSchema> {
        Arc::new(
            FormSchema::new("credenciais")
                .field(
                    "nome",
                    FieldSchema::text()
                        .min_length(5, "O campo nome é obrigatório")
                        .transform(Transform::TitleCase),
                )
                .field("senha", FieldSchema::text().min_length(6, "curta"))
                .field("senhaVerificada", FieldSchema::text().min_length(1, "vazia"))
                .rule(CrossFieldRule::fields_equal(
                    "senha",
                    "senhaVerificada",
                    "As senhas devem ser iguais",
                )),
        )
    }

    fn courses() -> Arc<FormSchema> {
        Arc::new(
            FormSchema::new("cursos").group(
                GroupSchema::new("cursos")
                    .field("nome", FieldSchema::text().min_length(1, "obrigatório"))
                    .min_entries(1, "Adicione pelo menos um curso"),
            ),
        )
    }

    #[test]
    fn test_change_validates_only_that_field() {
        let mut session = FormSession::new(credentials());
        session.set_field("nome", "ana").unwrap();

        assert_eq!(session.error("nome"), Some("O campo nome é obrigatório"));
        assert_eq!(session.error("senha"), None);
        assert!(session.is_touched("nome"));
        assert!(!session.is_touched("senha"));
    }

    #[test]
    fn test_mismatch_attaches_to_confirmation() {
        let mut session = FormSession::new(credentials());
        session.set_field("senhaVerificada", "segredo1").unwrap();
        session.set_field("senha", "segredo2").unwrap();

        assert_eq!(session.error("senha"), None);
        assert_eq!(session.error("senhaVerificada"), Some("As senhas devem ser iguais"));

        // fixing the password clears the confirmation error
        session.set_field("senha", "segredo1").unwrap();
        assert_eq!(session.error("senhaVerificada"), None);
    }

    #[test]
    fn test_untouched_confirmation_stays_quiet() {
        let mut session = FormSession::new(credentials());
        session.set_field("senha", "segredo").unwrap();
        assert_eq!(session.error("senhaVerificada"), None);
    }

    #[test]
    fn test_submit_does_not_mutate_values() {
        let mut session = FormSession::new(credentials());
        session.set_field("nome", "maria DA silva").unwrap();
        let before = session.values().clone();

        let submission = session.submit();
        assert!(submission.is_invalid());
        assert_eq!(session.values(), &before);
        assert_eq!(session.error("senha"), Some("curta"));
        assert_eq!(session.value("nome"), Some(&FieldValue::from("maria DA silva")));
    }

    #[test]
    fn test_submit_normalizes() {
        let mut session = FormSession::new(credentials());
        session.set_field("nome", "maria DA silva").unwrap();
        session.set_field("senha", "segredo").unwrap();
        session.set_field("senhaVerificada", "segredo").unwrap();

        let values = session.submit().ok().expect("valid form");
        assert_eq!(values.get("nome"), Some(&json!("Maria Da Silva")));
        assert!(session.errors().is_empty());
        assert_eq!(session.submit_count(), 1);
    }

    #[test]
    fn test_on_submit_mode_waits_for_first_submit() {
        let mut session = FormSession::with_mode(credentials(), ValidationMode::OnSubmit);
        session.set_field("nome", "ana").unwrap();
        assert_eq!(session.error("nome"), None);

        session.submit();
        assert_eq!(session.error("nome"), Some("O campo nome é obrigatório"));

        session.set_field("nome", "Ana Paula").unwrap();
        assert_eq!(session.error("nome"), None);
    }

    #[test]
    fn test_blur_validates_in_all_mode() {
        let mut session = FormSession::new(credentials());
        session.blur_field("senha").unwrap();
        assert_eq!(session.error("senha"), Some("curta"));
        assert!(session.blur_field("apelido").is_err());
    }

    #[test]
    fn test_unknown_paths() {
        let mut session = FormSession::new(credentials());
        assert_eq!(
            session.set_field("apelido", "x"),
            Err(PathError::UnknownField("apelido".into()))
        );
        assert_eq!(
            session.set_field("cursos.0.nome", "x"),
            Err(PathError::UnknownGroup("cursos".into()))
        );
        assert!(matches!(session.set_field("", "x"), Err(PathError::Malformed(_))));
        assert_eq!(session.revision(), 0);
    }

    #[test]
    fn test_group_minimum_entries() {
        let mut session = FormSession::new(courses());
        let errors = session.submit().err().expect("no entries yet");
        assert_eq!(
            errors.first(&FieldPath::field("cursos")),
            Some("Adicione pelo menos um curso")
        );

        session.add_group_entry("cursos").unwrap();
        assert_eq!(
            session.set_field("cursos.1.nome", "x"),
            Err(PathError::MissingEntry {
                group: "cursos".into(),
                index: 1
            })
        );
        session.set_field("cursos.0.nome", "Cardiologia").unwrap();
        assert!(session.is_valid());
    }

    #[test]
    fn test_revision_counts_writes() {
        let mut session = FormSession::new(courses());
        session.add_group_entry("cursos").unwrap();
        session.set_field("cursos.0.nome", "a").unwrap();
        session.remove_group_entry("cursos", 0).unwrap();
        assert_eq!(session.revision(), 3);
        assert!(session.remove_group_entry("cursos", 0).is_err());
    }
}
