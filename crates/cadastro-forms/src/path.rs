// File: src/path.rs
// Purpose: Dotted field paths, e.g. "endereco.cep" or "especialidades.0.instituicao"

use crate::error::PathError;
use std::fmt;
use std::str::FromStr;

/// Address of a single field inside a form.
///
/// The first purely numeric segment splits a path into a repeating-group
/// name, an entry index and the field inside that entry. Paths with no
/// numeric segment name a plain field, dots included.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldPath {
    Field(String),
    Entry {
        group: String,
        index: usize,
        field: String,
    },
}

impl FieldPath {
    pub fn field(name: impl Into<String>) -> Self {
        FieldPath::Field(name.into())
    }

    pub fn entry(group: impl Into<String>, index: usize, field: impl Into<String>) -> Self {
        FieldPath::Entry {
            group: group.into(),
            index,
            field: field.into(),
        }
    }

    pub fn parse(path: &str) -> Result<Self, PathError> {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(PathError::Malformed(path.to_string()));
        }

        let Some(pos) = segments.iter().position(|s| s.parse::<usize>().is_ok()) else {
            return Ok(FieldPath::Field(path.to_string()));
        };

        if pos == 0 || pos + 1 == segments.len() {
            return Err(PathError::Malformed(path.to_string()));
        }

        let index = segments[pos]
            .parse::<usize>()
            .map_err(|_| PathError::Malformed(path.to_string()))?;

        Ok(FieldPath::Entry {
            group: segments[..pos].join("."),
            index,
            field: segments[pos + 1..].join("."),
        })
    }

    /// Group name for entry paths
    pub fn group(&self) -> Option<&str> {
        match self {
            FieldPath::Field(_) => None,
            FieldPath::Entry { group, .. } => Some(group),
        }
    }

    /// Last component name: the field itself, without group or index
    pub fn leaf(&self) -> &str {
        match self {
            FieldPath::Field(name) => name,
            FieldPath::Entry { field, .. } => field,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Field(name) => write!(f, "{}", name),
            FieldPath::Entry {
                group,
                index,
                field,
            } => write!(f, "{}.{}.{}", group, index, field),
        }
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::parse(s)
    }
}
