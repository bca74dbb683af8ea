// File: src/submit.rs
// Purpose: Submit outcomes and the side-effect hook run on a valid submission

use crate::validation::FormErrors;
use crate::values::NormalizedValues;
use tracing::info;

/// Result of submitting a form
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Every field and cross-field rule passed
    Valid(NormalizedValues),
    /// Validation failed; contains the complete error set
    Invalid(FormErrors),
}

impl Submission {
    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        matches!(self, Submission::Valid(_))
    }

    /// Check if validation failed
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Extract the normalized values if validation passed
    pub fn ok(self) -> Option<NormalizedValues> {
        match self {
            Submission::Valid(values) => Some(values),
            Submission::Invalid(_) => None,
        }
    }

    /// Extract the errors if validation failed
    pub fn err(self) -> Option<FormErrors> {
        match self {
            Submission::Valid(_) => None,
            Submission::Invalid(errors) => Some(errors),
        }
    }
}

/// Called with the normalized values once a submission passes
pub trait SubmitHandler {
    fn on_submit(&self, form: &str, values: &NormalizedValues);
}

/// Default handler: records the submission in the log and does nothing else.
///
/// Only field names are logged at info level; the payload may carry passwords.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSubmitHandler;

impl SubmitHandler for LoggingSubmitHandler {
    fn on_submit(&self, form: &str, values: &NormalizedValues) {
        info!(form = %form, fields = ?values.keys(), "form submitted");
    }
}
