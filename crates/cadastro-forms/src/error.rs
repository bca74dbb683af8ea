// File: src/error.rs
// Purpose: Error types for paths, postal-code lookups and typed submission

use crate::validation::FormErrors;
use thiserror::Error;

/// A field path that does not resolve against the form schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("malformed field path: {0:?}")]
    Malformed(String),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("unknown repeating group: {0}")]
    UnknownGroup(String),

    #[error("group {group} has no entry at index {index}")]
    MissingEntry { group: String, index: usize },
}

/// Failure talking to the postal-code service
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("postal code request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("postal code service answered with status {0}")]
    Status(u16),

    #[error("postal code service returned an unreadable body: {0}")]
    Decode(String),
}

/// Failure producing a typed value from a submitted form
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(FormErrors),

    #[error("submitted values do not fit the target type: {0}")]
    Deserialize(#[from] serde_json::Error),
}
