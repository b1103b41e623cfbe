//! Field annotation parsing
//!
//! Annotations are attached per field as a comma separated list of
//! `key=value` clauses, e.g. `type=string,name=Action`. Only the `type` and
//! `name` keys mean anything to the converter; every other key is kept but
//! ignored. Clauses without an `=` are skipped rather than rejected.

use crate::error::{Result, SchemaError};

/// Key holding the explicit scalar type hint
pub const TYPE_KEY: &str = "type";

/// Key holding the output field name override
pub const NAME_KEY: &str = "name";

/// Look up the value of `key` in a raw annotation string.
///
/// The first clause whose key equals `key` wins. Fails with
/// [`SchemaError::TagMissing`] when no clause matches or `raw` is empty.
pub fn parse<'a>(raw: &'a str, key: &str) -> Result<&'a str> {
    clauses(raw)
        .find(|(k, _)| *k == key)
        .map(|(_, value)| value)
        .ok_or_else(|| SchemaError::TagMissing { key: key.to_string() })
}

/// Split an annotation into its well-formed `(key, value)` clauses
fn clauses(raw: &str) -> impl Iterator<Item = (&str, &str)> {
    raw.split(',')
        .filter_map(|clause| clause.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
}

/// All options of one field annotation, in the order they were written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationOptions {
    options: Vec<(String, String)>,
}

impl AnnotationOptions {
    /// Parse a raw annotation. Repeated keys keep their first value.
    pub fn parse(raw: &str) -> Self {
        let mut options: Vec<(String, String)> = Vec::new();
        for (key, value) in clauses(raw) {
            if options.iter().any(|(k, _)| k == key) {
                continue;
            }
            options.push((key.to_string(), value.to_string()));
        }
        Self { options }
    }

    /// Parse an optional annotation; an absent annotation has no options
    pub fn from_annotation(raw: Option<&str>) -> Self {
        raw.map(Self::parse).unwrap_or_default()
    }

    /// Value of an option, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Explicit scalar type hint (`type=...`); empty values count as absent
    pub fn type_hint(&self) -> Option<&str> {
        self.get(TYPE_KEY).filter(|v| !v.is_empty())
    }

    /// Output name override (`name=...`); empty values count as absent
    pub fn name(&self) -> Option<&str> {
        self.get(NAME_KEY).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
