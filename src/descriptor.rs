//! Record type descriptions
//!
//! A [`RecordDescriptor`] is the structural view of one record type: its
//! name and its fields in declaration order, each with a declared shape
//! ([`TypeRef`]) and the raw annotation text attached to it. Nothing here
//! interprets annotations or picks schema types; that is the converter's job.
//!
//! Rust has no runtime reflection, so record types describe themselves
//! through [`TypeDescription`] (usually generated by [`describe_record!`]),
//! and every field type reports its shape through [`DescribeType`].
//!
//! [`describe_record!`]: crate::describe_record

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::annotation::AnnotationOptions;

// =============================================================================
// Traits
// =============================================================================

/// A record type that can enumerate its own fields
pub trait TypeDescription {
    /// The record's own type name (unqualified)
    fn type_name() -> &'static str;

    /// Structural description of the record's fields
    fn describe() -> RecordDescriptor;
}

/// Any type that can appear as a field type
pub trait DescribeType {
    fn type_ref() -> TypeRef;
}

/// Enumerate the fields of a record type in declaration order
pub fn describe_fields<T: TypeDescription>() -> Vec<FieldDescriptor> {
    T::describe().fields
}

/// Resolves record names to descriptions on demand
///
/// Used for descriptions that are not backed by Rust types, e.g. a loaded
/// manifest, so that records may reference each other by name.
pub trait RecordResolver: Send + Sync {
    fn resolve(&self, type_name: &str) -> Option<RecordDescriptor>;
}

// =============================================================================
// Type References
// =============================================================================

/// Shape of a field's declared type
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    /// A primitive value, carrying its native type name
    Scalar(String),
    /// A nested record type
    Record(RecordRef),
    /// A collection of elements
    List(Box<TypeRef>),
    /// A key/value collection; never representable in a schema
    Map(Box<TypeRef>, Box<TypeRef>),
}

impl TypeRef {
    pub fn scalar(type_name: impl Into<String>) -> Self {
        TypeRef::Scalar(type_name.into())
    }

    pub fn list(element: TypeRef) -> Self {
        TypeRef::List(Box::new(element))
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::Map(Box::new(key), Box::new(value))
    }

    /// Reference to a record type implementing [`TypeDescription`]
    pub fn record<T: TypeDescription + 'static>() -> Self {
        TypeRef::Record(RecordRef::of::<T>())
    }

    /// Short display form of the shape, e.g. `[[String]]` or `{String:i64}`
    pub fn shape_name(&self) -> String {
        match self {
            TypeRef::Scalar(name) => name.clone(),
            TypeRef::Record(record) => record.type_name().to_string(),
            TypeRef::List(element) => format!("[{}]", element.shape_name()),
            TypeRef::Map(key, value) => format!("{{{}:{}}}", key.shape_name(), value.shape_name()),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.shape_name())
    }
}

/// Lazy reference to a record description.
///
/// The description is only produced when the converter walks into it, which
/// lets self-referencing types be described at all.
#[derive(Clone)]
pub struct RecordRef {
    type_name: String,
    source: RecordSource,
}

#[derive(Clone)]
enum RecordSource {
    Static(TypeId, fn() -> RecordDescriptor),
    Inline(Arc<RecordDescriptor>),
    Resolver(Arc<dyn RecordResolver>),
}

impl RecordRef {
    pub fn of<T: TypeDescription + 'static>() -> Self {
        Self {
            type_name: T::type_name().to_string(),
            source: RecordSource::Static(TypeId::of::<T>(), T::describe),
        }
    }

    pub fn inline(descriptor: RecordDescriptor) -> Self {
        Self {
            type_name: descriptor.type_name.clone(),
            source: RecordSource::Inline(Arc::new(descriptor)),
        }
    }

    pub fn resolved_by(type_name: impl Into<String>, resolver: Arc<dyn RecordResolver>) -> Self {
        Self {
            type_name: type_name.into(),
            source: RecordSource::Resolver(resolver),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Produce the referenced description, stamped with its origin
    pub fn resolve(&self) -> Option<RecordDescriptor> {
        match &self.source {
            RecordSource::Static(type_id, describe) => {
                Some(describe().or_origin(RecordOrigin::Type(*type_id)))
            }
            RecordSource::Inline(descriptor) => {
                let origin = RecordOrigin::Instance(Arc::as_ptr(descriptor) as usize);
                Some(descriptor.as_ref().clone().or_origin(origin))
            }
            RecordSource::Resolver(resolver) => {
                let scope = Arc::as_ptr(resolver) as *const () as usize;
                let origin = RecordOrigin::Named {
                    scope,
                    name: self.type_name.clone(),
                };
                resolver
                    .resolve(&self.type_name)
                    .map(|record| record.or_origin(origin))
            }
        }
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordRef").field(&self.type_name).finish()
    }
}

impl PartialEq for RecordRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
    }
}

// =============================================================================
// Descriptors
// =============================================================================

/// One field of a record type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Native field name
    pub name: String,
    /// Declared type shape
    pub declared_type: TypeRef,
    /// Raw annotation text, if any
    pub annotation: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, declared_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            declared_type,
            annotation: None,
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    /// Parsed annotation options (empty when there is no annotation)
    pub fn options(&self) -> AnnotationOptions {
        AnnotationOptions::from_annotation(self.annotation.as_deref())
    }
}

/// Where a record description came from.
///
/// Two descriptions with the same type name are the same record only when
/// their origins are equal; the converter walks origins, not names, when it
/// looks for cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOrigin {
    /// A Rust record type
    Type(TypeId),
    /// One particular descriptor value, keyed by address
    Instance(usize),
    /// A name within one resolver's namespace
    Named { scope: usize, name: String },
}

impl RecordOrigin {
    pub fn of<T: 'static>() -> Self {
        RecordOrigin::Type(TypeId::of::<T>())
    }
}

/// Structural description of a record type
#[derive(Debug, Clone)]
pub struct RecordDescriptor {
    /// The record's own type name
    pub type_name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor>,
    origin: Option<RecordOrigin>,
}

impl RecordDescriptor {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: RecordOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub(crate) fn or_origin(mut self, origin: RecordOrigin) -> Self {
        self.origin.get_or_insert(origin);
        self
    }

    pub fn origin(&self) -> Option<&RecordOrigin> {
        self.origin.as_ref()
    }

    /// Append a field without annotation
    pub fn field(mut self, name: impl Into<String>, declared_type: TypeRef) -> Self {
        self.fields.push(FieldDescriptor::new(name, declared_type));
        self
    }

    /// Append an annotated field
    pub fn annotated(
        mut self,
        name: impl Into<String>,
        declared_type: TypeRef,
        annotation: impl Into<String>,
    ) -> Self {
        self.fields
            .push(FieldDescriptor::new(name, declared_type).with_annotation(annotation));
        self
    }

    /// Append a prepared field descriptor
    pub fn push(&mut self, field: FieldDescriptor) {
        self.fields.push(field);
    }

    pub fn describe_fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

// Origins identify records during conversion; they are not part of the shape
impl PartialEq for RecordDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.fields == other.fields
    }
}

// =============================================================================
// Field Type Shapes
// =============================================================================

macro_rules! scalar_types {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl DescribeType for $ty {
                fn type_ref() -> TypeRef {
                    TypeRef::scalar($name)
                }
            }
        )*
    };
}

scalar_types! {
    String => "String",
    &'static str => "str",
    char => "char",
    bool => "bool",
    f32 => "f32",
    f64 => "f64",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
    chrono::NaiveDateTime => "chrono::NaiveDateTime",
    chrono::NaiveDate => "chrono::NaiveDate",
    std::time::SystemTime => "std::time::SystemTime",
}

impl<Tz: chrono::TimeZone> DescribeType for chrono::DateTime<Tz> {
    fn type_ref() -> TypeRef {
        TypeRef::scalar("chrono::DateTime")
    }
}

impl<T: DescribeType> DescribeType for Vec<T> {
    fn type_ref() -> TypeRef {
        TypeRef::list(T::type_ref())
    }
}

impl<T: DescribeType, const N: usize> DescribeType for [T; N] {
    fn type_ref() -> TypeRef {
        TypeRef::list(T::type_ref())
    }
}

// Nullability is the schema default, so optional fields keep their inner shape
impl<T: DescribeType> DescribeType for Option<T> {
    fn type_ref() -> TypeRef {
        T::type_ref()
    }
}

impl<T: DescribeType> DescribeType for Box<T> {
    fn type_ref() -> TypeRef {
        T::type_ref()
    }
}

impl<K: DescribeType, V: DescribeType, S> DescribeType for HashMap<K, V, S> {
    fn type_ref() -> TypeRef {
        TypeRef::map(K::type_ref(), V::type_ref())
    }
}

impl<K: DescribeType, V: DescribeType> DescribeType for BTreeMap<K, V> {
    fn type_ref() -> TypeRef {
        TypeRef::map(K::type_ref(), V::type_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf;

    impl TypeDescription for Leaf {
        fn type_name() -> &'static str {
            "Leaf"
        }

        fn describe() -> RecordDescriptor {
            RecordDescriptor::new("Leaf").annotated("value", i64::type_ref(), "type=int")
        }
    }

    impl DescribeType for Leaf {
        fn type_ref() -> TypeRef {
            TypeRef::record::<Leaf>()
        }
    }

    #[test]
    fn test_scalar_shapes() {
        assert_eq!(String::type_ref(), TypeRef::scalar("String"));
        assert_eq!(u16::type_ref(), TypeRef::scalar("u16"));
        assert_eq!(
            chrono::DateTime::<chrono::Utc>::type_ref(),
            TypeRef::scalar("chrono::DateTime")
        );
    }

    #[test]
    fn test_wrapper_shapes() {
        assert_eq!(Vec::<String>::type_ref().shape_name(), "[String]");
        assert_eq!(Option::<bool>::type_ref(), TypeRef::scalar("bool"));
        assert_eq!(Vec::<Vec<u8>>::type_ref().shape_name(), "[[u8]]");
        assert_eq!(<[f32; 3]>::type_ref().shape_name(), "[f32]");
        assert_eq!(HashMap::<String, i64>::type_ref().shape_name(), "{String:i64}");
    }

    #[test]
    fn test_record_reference_is_lazy() {
        let shape = Vec::<Leaf>::type_ref();
        let TypeRef::List(element) = shape else {
            panic!("expected list");
        };
        let TypeRef::Record(record) = *element else {
            panic!("expected record");
        };
        assert_eq!(record.type_name(), "Leaf");
        let resolved = record.resolve().unwrap();
        assert_eq!(resolved.fields.len(), 1);
        assert_eq!(resolved.fields[0].annotation.as_deref(), Some("type=int"));
        assert_eq!(resolved.origin(), Some(&RecordOrigin::of::<Leaf>()));
    }

    #[test]
    fn test_inline_origins_are_distinct() {
        let first = RecordRef::inline(RecordDescriptor::new("Item"));
        let second = RecordRef::inline(RecordDescriptor::new("Item"));

        let a = first.resolve().unwrap();
        let b = second.resolve().unwrap();
        assert_eq!(a, b);
        assert_ne!(a.origin(), b.origin());
        assert_eq!(first.resolve().unwrap().origin(), a.origin());
    }

    #[test]
    fn test_explicit_origin_is_kept() {
        let record = RecordDescriptor::new("Leaf").with_origin(RecordOrigin::of::<bool>());
        let resolved = RecordRef::inline(record).resolve().unwrap();
        assert_eq!(resolved.origin(), Some(&RecordOrigin::of::<bool>()));
    }

    #[test]
    fn test_describe_fields_keeps_order() {
        let record = RecordDescriptor::new("Simple")
            .field("b", bool::type_ref())
            .field("a", String::type_ref())
            .annotated("c", f64::type_ref(), "type=float");
        let names: Vec<_> = record.describe_fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(describe_fields::<Leaf>()[0].name, "value");
    }

    #[test]
    fn test_field_options() {
        let field = FieldDescriptor::new("task", String::type_ref())
            .with_annotation("type=string,name=Action");
        assert_eq!(field.options().name(), Some("Action"));
        assert!(FieldDescriptor::new("x", bool::type_ref()).options().is_empty());
    }
}
