//! Scalar kinds and the type hint table

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five scalar kinds a schema field can resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    String,
    Boolean,
    Float,
    Int,
    DateTime,
}

impl ScalarKind {
    /// GraphQL name of the scalar
    pub fn graphql_name(&self) -> &'static str {
        match self {
            ScalarKind::String => "String",
            ScalarKind::Boolean => "Boolean",
            ScalarKind::Float => "Float",
            ScalarKind::Int => "Int",
            ScalarKind::DateTime => "DateTime",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.graphql_name())
    }
}

/// Type hints accepted in `type=...` annotations.
///
/// Native numeric names collapse onto `Float`/`Int`. Rust primitive names are
/// accepted alongside the width-suffixed spellings.
pub const SCALAR_HINTS: &[(&str, ScalarKind)] = &[
    ("string", ScalarKind::String),
    ("bool", ScalarKind::Boolean),
    ("float", ScalarKind::Float),
    ("int", ScalarKind::Int),
    ("time", ScalarKind::DateTime),
    ("float32", ScalarKind::Float),
    ("float64", ScalarKind::Float),
    ("int8", ScalarKind::Int),
    ("int16", ScalarKind::Int),
    ("int32", ScalarKind::Int),
    ("int64", ScalarKind::Int),
    ("uint", ScalarKind::Int),
    ("uint8", ScalarKind::Int),
    ("uint16", ScalarKind::Int),
    ("uint32", ScalarKind::Int),
    ("uint64", ScalarKind::Int),
    ("String", ScalarKind::String),
    ("str", ScalarKind::String),
    ("char", ScalarKind::String),
    ("f32", ScalarKind::Float),
    ("f64", ScalarKind::Float),
    ("i8", ScalarKind::Int),
    ("i16", ScalarKind::Int),
    ("i32", ScalarKind::Int),
    ("i64", ScalarKind::Int),
    ("i128", ScalarKind::Int),
    ("isize", ScalarKind::Int),
    ("u8", ScalarKind::Int),
    ("u16", ScalarKind::Int),
    ("u32", ScalarKind::Int),
    ("u64", ScalarKind::Int),
    ("u128", ScalarKind::Int),
    ("usize", ScalarKind::Int),
];

/// Native type names that describe a date/time on their own.
///
/// Fields declared with one of these need no `type` annotation.
pub const SELF_DESCRIBING: &[&str] = &[
    "time.Time",
    "chrono::DateTime",
    "chrono::NaiveDateTime",
    "chrono::NaiveDate",
    "std::time::SystemTime",
];

/// Resolve a type hint through the hint table
pub fn lookup(hint: &str) -> Option<ScalarKind> {
    SCALAR_HINTS
        .iter()
        .find(|(name, _)| *name == hint)
        .map(|(_, kind)| *kind)
}

/// Scalar kind of a native type name that needs no annotation, if any
pub fn self_describing(type_name: &str) -> Option<ScalarKind> {
    SELF_DESCRIBING
        .contains(&type_name)
        .then_some(ScalarKind::DateTime)
}
