//! Record → Schema Object Conversion
//!
//! Walks a [`RecordDescriptor`] field by field and resolves each field to a
//! schema type:
//! - record fields convert recursively into nested objects,
//! - lists wrap the converted element (record or scalar),
//! - scalars resolve through the `type` annotation, falling back to
//!   self-describing native types.
//!
//! The first failing field aborts the whole conversion; no partial object is
//! ever returned.

use std::collections::HashMap;

use tracing::{debug, debug_span, warn};

use crate::annotation::AnnotationOptions;
use crate::config::{ConverterConfig, InferenceMode};
use crate::descriptor::{
    FieldDescriptor, RecordDescriptor, RecordOrigin, RecordRef, TypeDescription, TypeRef,
};
use crate::error::{AnnotationFault, Result, SchemaError};
use crate::lint::{LintResult, NameLinter};
use crate::scalar::{self, ScalarKind};
use crate::schema::{SchemaField, SchemaObject, SchemaType};

/// Convert a record description with the default configuration
pub fn convert(record: &RecordDescriptor) -> Result<SchemaObject> {
    Converter::new(ConverterConfig::default())?.convert(record)
}

/// Convert a record type with the default configuration
pub fn convert_type<T: TypeDescription + 'static>() -> Result<SchemaObject> {
    Converter::new(ConverterConfig::default())?.convert_type::<T>()
}

// Records currently being converted, outermost first
type Path = Vec<(RecordOrigin, String)>;

/// Record to schema object converter.
///
/// Holds no state between calls; one converter can serve many threads.
pub struct Converter {
    config: ConverterConfig,
    linter: Option<NameLinter>,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Result<Self> {
        let linter = if config.validate_names {
            Some(NameLinter::new()?)
        } else {
            None
        };
        Ok(Self { config, linter })
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert a record description into a named schema object
    pub fn convert(&self, record: &RecordDescriptor) -> Result<SchemaObject> {
        let mut path = Vec::new();
        self.convert_record(record, &mut path)
    }

    /// Convert a record type into a named schema object
    pub fn convert_type<T: TypeDescription + 'static>(&self) -> Result<SchemaObject> {
        self.convert(&T::describe().or_origin(RecordOrigin::of::<T>()))
    }

    fn convert_record(&self, record: &RecordDescriptor, path: &mut Path) -> Result<SchemaObject> {
        // Descriptors without an origin can only be the root or a one-off value
        let origin = record
            .origin()
            .cloned()
            .unwrap_or(RecordOrigin::Instance(record as *const RecordDescriptor as usize));

        if self.config.detect_cycles && path.iter().any(|(seen, _)| *seen == origin) {
            return Err(SchemaError::CyclicRecord {
                path: path_names(path, &record.type_name),
            });
        }
        if path.len() > self.config.max_depth {
            return Err(SchemaError::RecursionLimit {
                limit: self.config.max_depth,
                path: path_names(path, &record.type_name),
            });
        }

        path.push((origin, record.type_name.clone()));
        let result = self.convert_fields(record, path);
        path.pop();
        result
    }

    fn convert_fields(&self, record: &RecordDescriptor, path: &mut Path) -> Result<SchemaObject> {
        let span = debug_span!("record", name = %record.type_name, depth = path.len());
        let _enter = span.enter();

        if let Some(linter) = &self.linter {
            check_names(linter.lint_object_name(&record.type_name))?;
        }

        let mut object = SchemaObject::new(record.type_name.as_str());
        // output name -> native field name
        let mut sources: HashMap<String, &str> = HashMap::new();

        for field in record.describe_fields() {
            let options = field.options();
            let ty = self.resolve_type(field, &options, path)?;
            let name = options.name().unwrap_or(&field.name).to_string();

            if let Some(linter) = &self.linter {
                check_names(linter.lint_field_name(&name))?;
            }

            debug!(field = %field.name, output = %name, ty = %ty.type_ref(), "converted field");

            let overwritten = sources.insert(name.clone(), field.name.as_str());
            if object.insert(SchemaField::new(name.as_str(), ty)).is_some() {
                warn!(
                    object = %record.type_name,
                    output = %name,
                    overwritten = overwritten.unwrap_or_default(),
                    field = %field.name,
                    "output name collision, later field overwrites earlier one"
                );
            }
        }

        Ok(object)
    }

    fn resolve_type(
        &self,
        field: &FieldDescriptor,
        options: &AnnotationOptions,
        path: &mut Path,
    ) -> Result<SchemaType> {
        match &field.declared_type {
            TypeRef::Record(record) => Ok(SchemaType::Object(self.convert_ref(record, path)?)),
            TypeRef::List(element) => match element.as_ref() {
                TypeRef::Record(record) => Ok(SchemaType::list(SchemaType::Object(
                    self.convert_ref(record, path)?,
                ))),
                TypeRef::Scalar(native) => Ok(SchemaType::list(SchemaType::Scalar(
                    self.resolve_scalar(field, options, native)?,
                ))),
                TypeRef::List(_) | TypeRef::Map(..) => Err(unsupported(field)),
            },
            TypeRef::Scalar(native) => Ok(SchemaType::Scalar(self.resolve_scalar(field, options, native)?)),
            TypeRef::Map(..) => Err(unsupported(field)),
        }
    }

    fn convert_ref(&self, record: &RecordRef, path: &mut Path) -> Result<SchemaObject> {
        let descriptor = record.resolve().ok_or_else(|| SchemaError::UnresolvedRecord {
            name: record.type_name().to_string(),
        })?;
        self.convert_record(&descriptor, path)
    }

    fn resolve_scalar(
        &self,
        field: &FieldDescriptor,
        options: &AnnotationOptions,
        native: &str,
    ) -> Result<ScalarKind> {
        if let Some(hint) = options.type_hint() {
            return scalar::lookup(hint).ok_or_else(|| SchemaError::MissingOrInvalidTypeAnnotation {
                field: field.name.clone(),
                fault: AnnotationFault::UnknownHint(hint.to_string()),
            });
        }

        let inferred = match self.config.inference {
            InferenceMode::Strict => scalar::self_describing(native),
            InferenceMode::Native => scalar::self_describing(native).or_else(|| scalar::lookup(native)),
        };

        inferred.ok_or_else(|| SchemaError::MissingOrInvalidTypeAnnotation {
            field: field.name.clone(),
            fault: AnnotationFault::Missing,
        })
    }
}

fn path_names(path: &Path, next: &str) -> Vec<String> {
    path.iter()
        .map(|(_, name)| name.clone())
        .chain(std::iter::once(next.to_string()))
        .collect()
}

/// Log lint warnings, fail on the first lint error
fn check_names(result: LintResult) -> Result<()> {
    for warning in &result.warnings {
        warn!(code = warning.code, name = %warning.name, "{}", warning.message);
    }
    result.into_result()
}

fn unsupported(field: &FieldDescriptor) -> SchemaError {
    SchemaError::MissingOrInvalidTypeAnnotation {
        field: field.name.clone(),
        fault: AnnotationFault::UnsupportedShape(field.declared_type.shape_name()),
    }
}
