//! Descriptor Manifests
//!
//! Record descriptions loaded at runtime from JSON, for records that are
//! not backed by Rust types:
//!
//! ```json
//! {
//!   "root": "Simple",
//!   "records": [
//!     { "name": "Simple", "fields": [
//!       { "name": "Tags", "type": "[String]", "annotation": "type=string" },
//!       { "name": "Todos", "type": "[Todo]" }
//!     ]},
//!     { "name": "Todo", "fields": [
//!       { "name": "Task", "type": "String", "annotation": "type=string" }
//!     ]}
//!   ]
//! }
//! ```
//!
//! Type expressions: `[T]` is a list, `{K:V}` a map, a name listed under
//! `records` a record, anything else a native scalar type name. Records may
//! reference each other (and themselves); references resolve lazily.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::descriptor::{
    FieldDescriptor, RecordDescriptor, RecordOrigin, RecordRef, RecordResolver, TypeRef,
};
use crate::error::{Result, SchemaError};

/// Raw manifest document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Name of the record to convert
    pub root: String,
    /// All record definitions
    #[serde(default)]
    pub records: Vec<RecordDef>,
}

/// One record definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDef {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// One field definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    /// Type expression
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl Manifest {
    /// Parse a manifest from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a manifest file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Validate the manifest and index its records
    pub fn load(self) -> Result<LoadedManifest> {
        let names: HashSet<&str> = self.records.iter().map(|r| r.name.as_str()).collect();
        if names.len() != self.records.len() {
            let mut seen = HashSet::new();
            let duplicate = self
                .records
                .iter()
                .find(|r| !seen.insert(r.name.as_str()))
                .map(|r| r.name.clone())
                .unwrap_or_default();
            return Err(SchemaError::Manifest(format!("duplicate record {}", duplicate)));
        }
        if !names.contains(self.root.as_str()) {
            return Err(SchemaError::Manifest(format!("root record {} is not defined", self.root)));
        }

        let mut records = HashMap::with_capacity(self.records.len());
        let mut order = Vec::with_capacity(self.records.len());

        for record in &self.records {
            let mut fields = Vec::with_capacity(record.fields.len());
            for field in &record.fields {
                let ty = parse_type_expr(&field.ty, &names).map_err(|e| {
                    SchemaError::Manifest(format!("{}.{}: {}", record.name, field.name, e))
                })?;
                fields.push(IndexedField {
                    name: field.name.clone(),
                    ty,
                    annotation: field.annotation.clone(),
                });
            }
            order.push(record.name.clone());
            records.insert(record.name.clone(), fields);
        }

        debug!(root = %self.root, records = order.len(), "loaded manifest");

        Ok(LoadedManifest {
            root: self.root,
            order,
            resolver: ManifestResolver {
                index: Arc::new(ManifestIndex { records }),
            },
        })
    }
}

/// A validated manifest
pub struct LoadedManifest {
    root: String,
    order: Vec<String>,
    resolver: ManifestResolver,
}

impl LoadedManifest {
    pub fn root_name(&self) -> &str {
        &self.root
    }

    /// Description of the root record
    pub fn root(&self) -> Result<RecordDescriptor> {
        self.record(&self.root)
    }

    /// Description of any record in the manifest
    pub fn record(&self, name: &str) -> Result<RecordDescriptor> {
        self.resolver
            .describe(name)
            .ok_or_else(|| SchemaError::UnresolvedRecord { name: name.to_string() })
    }

    /// Record names in manifest order
    pub fn record_names(&self) -> &[String] {
        &self.order
    }
}

// =============================================================================
// Resolution
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TypeExpr {
    Scalar(String),
    Record(String),
    List(Box<TypeExpr>),
    Map(Box<TypeExpr>, Box<TypeExpr>),
}

struct IndexedField {
    name: String,
    ty: TypeExpr,
    annotation: Option<String>,
}

struct ManifestIndex {
    records: HashMap<String, Vec<IndexedField>>,
}

#[derive(Clone)]
struct ManifestResolver {
    index: Arc<ManifestIndex>,
}

impl ManifestResolver {
    fn describe(&self, name: &str) -> Option<RecordDescriptor> {
        let fields = self.index.records.get(name)?;
        // Record names are unique within one manifest
        let mut record = RecordDescriptor::new(name).with_origin(RecordOrigin::Named {
            scope: Arc::as_ptr(&self.index) as usize,
            name: name.to_string(),
        });
        for field in fields {
            record.push(FieldDescriptor {
                name: field.name.clone(),
                declared_type: self.type_ref(&field.ty),
                annotation: field.annotation.clone(),
            });
        }
        Some(record)
    }

    fn type_ref(&self, expr: &TypeExpr) -> TypeRef {
        match expr {
            TypeExpr::Scalar(name) => TypeRef::scalar(name.as_str()),
            TypeExpr::Record(name) => {
                TypeRef::Record(RecordRef::resolved_by(name.as_str(), Arc::new(self.clone())))
            }
            TypeExpr::List(element) => TypeRef::list(self.type_ref(element)),
            TypeExpr::Map(key, value) => TypeRef::map(self.type_ref(key), self.type_ref(value)),
        }
    }
}

impl RecordResolver for ManifestResolver {
    fn resolve(&self, type_name: &str) -> Option<RecordDescriptor> {
        self.describe(type_name)
    }
}

// =============================================================================
// Type Expressions
// =============================================================================

fn parse_type_expr(expr: &str, records: &HashSet<&str>) -> std::result::Result<TypeExpr, String> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err("empty type expression".to_string());
    }

    if let Some(inner) = expr.strip_prefix('[') {
        let inner = inner
            .strip_suffix(']')
            .ok_or_else(|| format!("unbalanced list type `{}`", expr))?;
        return Ok(TypeExpr::List(Box::new(parse_type_expr(inner, records)?)));
    }

    if let Some(inner) = expr.strip_prefix('{') {
        let inner = inner
            .strip_suffix('}')
            .ok_or_else(|| format!("unbalanced map type `{}`", expr))?;
        let split = map_separator(inner).ok_or_else(|| format!("map type `{}` needs `{{K:V}}`", expr))?;
        let key = parse_type_expr(&inner[..split], records)?;
        let value = parse_type_expr(&inner[split + 1..], records)?;
        return Ok(TypeExpr::Map(Box::new(key), Box::new(value)));
    }

    if expr.contains(['[', ']', '{', '}']) {
        return Err(format!("malformed type expression `{}`", expr));
    }

    if records.contains(expr) {
        Ok(TypeExpr::Record(expr.to_string()))
    } else {
        Ok(TypeExpr::Scalar(expr.to_string()))
    }
}

/// Position of the top-level `:` in a map body, skipping `::` path separators
fn map_separator(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'[' | b'{' => depth += 1,
            b']' | b'}' => depth = depth.saturating_sub(1),
            b':' if depth == 0 => {
                let prev = i > 0 && bytes[i - 1] == b':';
                let next = bytes.get(i + 1) == Some(&b':');
                if !prev && !next {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
