//! Error types for schema conversion

use std::fmt;

use thiserror::Error;

/// Result type for schema conversion operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Why a scalar field could not be given a schema type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationFault {
    /// No `type` annotation and the declared type does not describe itself
    Missing,
    /// The `type` annotation (or native type name) is not in the scalar table
    UnknownHint(String),
    /// The declared shape cannot be represented (list of lists, maps)
    UnsupportedShape(String),
}

impl fmt::Display for AnnotationFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationFault::Missing => write!(f, "missing type annotation"),
            AnnotationFault::UnknownHint(hint) => write!(f, "unknown type hint `{}`", hint),
            AnnotationFault::UnsupportedShape(shape) => write!(f, "unsupported shape {}", shape),
        }
    }
}

/// Schema conversion errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Tag is missing: {key}")]
    TagMissing { key: String },

    #[error("Field {field} does not have a valid type annotation: {fault}")]
    MissingOrInvalidTypeAnnotation { field: String, fault: AnnotationFault },

    #[error("Cyclic record type: {}", path.join(" -> "))]
    CyclicRecord { path: Vec<String> },

    #[error("Recursion limit of {limit} exceeded at {}", path.join(" -> "))]
    RecursionLimit { limit: usize, path: Vec<String> },

    #[error("Record type {name} could not be resolved")]
    UnresolvedRecord { name: String },

    #[error("Invalid name `{name}`: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid manifest: {0}")]
    Manifest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl SchemaError {
    /// The field this error was raised for, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            SchemaError::MissingOrInvalidTypeAnnotation { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_error_names_field() {
        let err = SchemaError::MissingOrInvalidTypeAnnotation {
            field: "FirstName".to_string(),
            fault: AnnotationFault::Missing,
        };
        assert_eq!(err.field(), Some("FirstName"));
        assert_eq!(
            err.to_string(),
            "Field FirstName does not have a valid type annotation: missing type annotation"
        );
    }

    #[test]
    fn test_cycle_path_display() {
        let err = SchemaError::CyclicRecord {
            path: vec!["Node".to_string(), "Edge".to_string(), "Node".to_string()],
        };
        assert_eq!(err.to_string(), "Cyclic record type: Node -> Edge -> Node");
        assert_eq!(err.field(), None);
    }
}
