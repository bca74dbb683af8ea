// File: src/refine.rs
// Purpose: Whole-object rules spanning more than one field

use crate::path::FieldPath;
use crate::value::FieldValue;
use std::collections::BTreeMap;
use std::fmt;

/// Result of evaluating a cross-field rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    Passed,
    Failed,
    /// A field the rule depends on has not passed its own checks yet
    Skipped,
}

/// Predicate over the normalized values of `depends_on`, in declaration order
pub type Predicate = fn(&[&FieldValue]) -> bool;

/// A validation predicate spanning more than one field.
///
/// Failures always attach to `target`, never to whichever field changed.
#[derive(Clone)]
pub enum CrossFieldRule {
    /// `confirmation` must equal `field`; the message lands on `confirmation`
    FieldsEqual {
        field: FieldPath,
        confirmation: FieldPath,
        message: String,
    },
    Custom {
        depends_on: Vec<FieldPath>,
        target: FieldPath,
        message: String,
        predicate: Predicate,
    },
}

impl fmt::Debug for CrossFieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossFieldRule::FieldsEqual {
                field,
                confirmation,
                message,
            } => f
                .debug_struct("FieldsEqual")
                .field("field", field)
                .field("confirmation", confirmation)
                .field("message", message)
                .finish(),
            CrossFieldRule::Custom {
                depends_on,
                target,
                message,
                ..
            } => f
                .debug_struct("Custom")
                .field("depends_on", depends_on)
                .field("target", target)
                .field("message", message)
                .finish_non_exhaustive(),
        }
    }
}

impl CrossFieldRule {
    pub fn fields_equal(
        field: impl Into<String>,
        confirmation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        CrossFieldRule::FieldsEqual {
            field: FieldPath::field(field),
            confirmation: FieldPath::field(confirmation),
            message: message.into(),
        }
    }

    pub fn custom(
        depends_on: Vec<FieldPath>,
        target: FieldPath,
        message: impl Into<String>,
        predicate: Predicate,
    ) -> Self {
        CrossFieldRule::Custom {
            depends_on,
            target,
            message: message.into(),
            predicate,
        }
    }

    /// Field that receives the failure message
    pub fn target(&self) -> &FieldPath {
        match self {
            CrossFieldRule::FieldsEqual { confirmation, .. } => confirmation,
            CrossFieldRule::Custom { target, .. } => target,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CrossFieldRule::FieldsEqual { message, .. } => message,
            CrossFieldRule::Custom { message, .. } => message,
        }
    }

    /// Every field whose change re-runs this rule
    pub fn dependencies(&self) -> Vec<&FieldPath> {
        match self {
            CrossFieldRule::FieldsEqual {
                field,
                confirmation,
                ..
            } => vec![field, confirmation],
            CrossFieldRule::Custom {
                depends_on, target, ..
            } => {
                let mut deps: Vec<&FieldPath> = depends_on.iter().collect();
                if !deps.contains(&target) {
                    deps.push(target);
                }
                deps
            }
        }
    }

    pub fn depends_on(&self, path: &FieldPath) -> bool {
        self.dependencies().contains(&path)
    }

    /// Evaluate against the normalized values of fields that passed their own checks
    pub fn evaluate(&self, valid: &BTreeMap<FieldPath, FieldValue>) -> RuleOutcome {
        match self {
            CrossFieldRule::FieldsEqual {
                field,
                confirmation,
                ..
            } => match (valid.get(field), valid.get(confirmation)) {
                (Some(a), Some(b)) if a == b => RuleOutcome::Passed,
                (Some(_), Some(_)) => RuleOutcome::Failed,
                _ => RuleOutcome::Skipped,
            },
            CrossFieldRule::Custom {
                depends_on,
                target,
                predicate,
                ..
            } => {
                if !valid.contains_key(target) {
                    return RuleOutcome::Skipped;
                }
                let values: Option<Vec<&FieldValue>> =
                    depends_on.iter().map(|path| valid.get(path)).collect();
                match values {
                    Some(values) if predicate(&values) => RuleOutcome::Passed,
                    Some(_) => RuleOutcome::Failed,
                    None => RuleOutcome::Skipped,
                }
            }
        }
    }
}
