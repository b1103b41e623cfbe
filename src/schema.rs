//! Schema object graph
//!
//! The output of a conversion: one [`SchemaObject`] per record type, whose
//! fields point at scalars, nested objects, or lists of either.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::scalar::ScalarKind;

/// Type of a schema field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum SchemaType {
    /// One of the fixed scalar kinds
    Scalar(ScalarKind),
    /// A nested object
    Object(SchemaObject),
    /// A list wrapping a scalar or object
    List(Box<SchemaType>),
}

impl SchemaType {
    pub fn list(inner: SchemaType) -> Self {
        SchemaType::List(Box::new(inner))
    }

    /// Type reference as written in SDL, e.g. `[Todo]`
    pub fn type_ref(&self) -> String {
        match self {
            SchemaType::Scalar(kind) => kind.graphql_name().to_string(),
            SchemaType::Object(object) => object.name.clone(),
            SchemaType::List(inner) => format!("[{}]", inner.type_ref()),
        }
    }

    /// The nested object this type points at, looking through lists
    pub fn as_object(&self) -> Option<&SchemaObject> {
        match self {
            SchemaType::Object(object) => Some(object),
            SchemaType::List(inner) => inner.as_object(),
            SchemaType::Scalar(_) => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, SchemaType::List(_))
    }
}

/// A single field of a schema object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Output field name
    pub name: String,
    /// Resolved field type
    #[serde(rename = "type")]
    pub ty: SchemaType,
}

impl SchemaField {
    pub fn new(name: impl Into<String>, ty: SchemaType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A named object type with uniquely named fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaObject {
    /// Object type name
    pub name: String,
    /// Fields in insertion order, unique by name
    fields: Vec<SchemaField>,
}

impl SchemaObject {
    /// Create an empty object
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Insert a field. A field with the same name is overwritten in place and
    /// returned.
    pub fn insert(&mut self, field: SchemaField) -> Option<SchemaField> {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => Some(std::mem::replace(existing, field)),
            None => {
                self.fields.push(field);
                None
            }
        }
    }

    /// Get a field by output name
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// This object followed by every object nested below it, depth-first.
    ///
    /// Objects are listed once per name; the first occurrence wins.
    pub fn nested_objects(&self) -> Vec<&SchemaObject> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        collect_objects(self, &mut seen, &mut out);
        out
    }

    /// Render GraphQL SDL type definitions for this object and its nested objects
    pub fn to_sdl(&self) -> String {
        let mut output = String::new();
        let mut uses_datetime = false;

        for object in self.nested_objects() {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(&format!("type {} {{\n", object.name));
            for field in &object.fields {
                uses_datetime |= mentions_datetime(&field.ty);
                output.push_str(&format!("  {}: {}\n", field.name, field.ty.type_ref()));
            }
            output.push_str("}\n");
        }

        if uses_datetime {
            output.insert_str(0, "scalar DateTime\n\n");
        }
        output
    }
}

impl fmt::Display for SchemaObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sdl())
    }
}

fn collect_objects<'a>(
    object: &'a SchemaObject,
    seen: &mut HashSet<&'a str>,
    out: &mut Vec<&'a SchemaObject>,
) {
    if !seen.insert(object.name.as_str()) {
        return;
    }
    out.push(object);
    for field in &object.fields {
        if let Some(nested) = field.ty.as_object() {
            collect_objects(nested, seen, out);
        }
    }
}

fn mentions_datetime(ty: &SchemaType) -> bool {
    match ty {
        SchemaType::Scalar(kind) => *kind == ScalarKind::DateTime,
        SchemaType::List(inner) => mentions_datetime(inner),
        SchemaType::Object(_) => false,
    }
}
