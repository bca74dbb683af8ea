// File: src/steps/mod.rs
// Purpose: The three registration steps, each an independent rule set plus its view layout

pub mod address;
pub mod personal;
pub mod technical;

use crate::components::InputType;
use crate::config::ValidationConfig;
use crate::schema::FormSchema;
use crate::session::FormSession;
use std::sync::Arc;

pub use address::{AddressData, Endereco};
pub use personal::PersonalData;
pub use technical::{Especialidade, TechnicalData};

/// Display metadata of one input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldView {
    /// Field path; for group fields, the name inside an entry
    pub path: &'static str,
    pub id: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub input: InputType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    pub group: &'static str,
    pub fields: Vec<FieldView>,
    pub add_label: &'static str,
}

/// Layout of a step: title, plain fields, repeating groups and submit label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    pub title: &'static str,
    pub fields: Vec<FieldView>,
    pub groups: Vec<GroupView>,
    pub submit_label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationStep {
    Personal,
    Address,
    Technical,
}

impl RegistrationStep {
    pub fn all() -> [RegistrationStep; 3] {
        [
            RegistrationStep::Personal,
            RegistrationStep::Address,
            RegistrationStep::Technical,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            RegistrationStep::Personal => personal::FORM_NAME,
            RegistrationStep::Address => address::FORM_NAME,
            RegistrationStep::Technical => technical::FORM_NAME,
        }
    }

    pub fn schema(self) -> Arc<FormSchema> {
        match self {
            RegistrationStep::Personal => personal::schema(),
            RegistrationStep::Address => address::schema(),
            RegistrationStep::Technical => technical::schema(),
        }
    }

    pub fn view(self) -> StepView {
        match self {
            RegistrationStep::Personal => personal::view(),
            RegistrationStep::Address => address::view(),
            RegistrationStep::Technical => technical::view(),
        }
    }

    /// Fresh, isolated session for this step
    pub fn open_session(self, config: &ValidationConfig) -> FormSession {
        FormSession::with_mode(self.schema(), config.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_views_match_schemas() {
        for step in RegistrationStep::all() {
            let schema = step.schema();
            let view = step.view();
            assert_eq!(schema.name(), step.name());

            for field in &view.fields {
                let path = crate::path::FieldPath::parse(field.path).unwrap();
                assert!(
                    schema.field_schema(&path).is_some(),
                    "{} has no field {}",
                    step.name(),
                    field.path
                );
            }
            for group in &view.groups {
                let group_schema = schema.group_schema(group.group).expect("group exists");
                for field in &group.fields {
                    assert!(group_schema.field_schema(field.path).is_some());
                }
            }
        }
    }

    #[test]
    fn test_sessions_are_isolated() {
        let config = ValidationConfig::default();
        let mut first = RegistrationStep::Personal.open_session(&config);
        let second = RegistrationStep::Personal.open_session(&config);

        first.set_field("nome", "Maria").unwrap();
        assert_eq!(second.value("nome").map(|v| v.display()), Some(String::new()));
    }
}
