//! GraphQL Name Linting
//!
//! Checks object and field output names against the GraphQL name grammar.
//!
//! ## Lints
//! 1. **Name Pattern**: names must match `[_A-Za-z][_0-9A-Za-z]*`
//! 2. **Reserved Prefix**: names must not start with `__` (introspection only)
//! 3. **Shadowed Scalar**: object names equal to a built-in scalar (warning)

use regex::Regex;
use std::collections::HashSet;

use crate::error::{Result, SchemaError};

/// Result of linting a set of names
#[derive(Debug, Default)]
pub struct LintResult {
    pub errors: Vec<LintError>,
    pub warnings: Vec<LintWarning>,
}

impl LintResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// First error as a conversion error
    pub fn into_result(self) -> Result<()> {
        match self.errors.into_iter().next() {
            Some(err) => Err(SchemaError::InvalidName {
                name: err.name,
                reason: err.message,
            }),
            None => Ok(()),
        }
    }
}

#[derive(Debug)]
pub struct LintError {
    pub code: &'static str,
    pub message: String,
    pub name: String,
}

#[derive(Debug)]
pub struct LintWarning {
    pub code: &'static str,
    pub message: String,
    pub name: String,
}

/// The GraphQL name linter
pub struct NameLinter {
    name_pattern: Regex,
    builtin_scalars: HashSet<&'static str>,
}

impl NameLinter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            name_pattern: Regex::new(r"^[_A-Za-z][_0-9A-Za-z]*$")?,
            builtin_scalars: ["String", "Boolean", "Float", "Int", "ID", "DateTime"]
                .into_iter()
                .collect(),
        })
    }

    /// Lint an object type name
    pub fn lint_object_name(&self, name: &str) -> LintResult {
        let mut result = self.lint_name(name);
        if self.builtin_scalars.contains(name) {
            result.warnings.push(LintWarning {
                code: "W001",
                message: "object name shadows a built-in scalar".to_string(),
                name: name.to_string(),
            });
        }
        result
    }

    /// Lint a field name
    pub fn lint_field_name(&self, name: &str) -> LintResult {
        self.lint_name(name)
    }

    fn lint_name(&self, name: &str) -> LintResult {
        let mut result = LintResult::default();

        if !self.name_pattern.is_match(name) {
            result.errors.push(LintError {
                code: "E001",
                message: "must match [_A-Za-z][_0-9A-Za-z]*".to_string(),
                name: name.to_string(),
            });
        } else if name.starts_with("__") {
            result.errors.push(LintError {
                code: "E002",
                message: "names starting with `__` are reserved".to_string(),
                name: name.to_string(),
            });
        }

        result
    }
}
