//! Conversion Tests
//!
//! Record descriptions in, schema objects out: name overrides, scalar hints,
//! list wrapping, nesting and failure propagation.

use std::collections::HashMap;

use graphql_schema_builder::{
    convert, convert_type, describe_record, AnnotationFault, Converter, ConverterConfig,
    DescribeType, RecordDescriptor, RecordRef, ScalarKind, SchemaError, SchemaType, TypeRef,
};

describe_record! {
    #[allow(dead_code)]
    #[derive(Debug, Clone)]
    pub struct Todo {
        pub task: String => "type=string",
        pub done: bool => "type=bool",
        pub end: chrono::DateTime<chrono::Utc> => "type=time",
    }
}

describe_record! {
    #[allow(dead_code)]
    #[derive(Debug, Clone)]
    pub struct Board {
        pub title: String => "type=string,name=Title",
        pub tags: Vec<String> => "type=string",
        pub scores: Vec<u32> => "type=int",
        pub todos: Vec<Todo>,
        pub pinned: Option<Todo>,
        pub created: chrono::NaiveDateTime,
    }
}

describe_record! {
    #[allow(dead_code)]
    pub struct Lookup {
        pub index: HashMap<String, i64> => "type=int",
    }
}

describe_record! {
    #[allow(dead_code)]
    pub struct Grid {
        pub cells: Vec<Vec<f64>> => "type=float",
    }
}

fn scalar(kind: ScalarKind) -> SchemaType {
    SchemaType::Scalar(kind)
}

// =============================================================================
// Scalars and Names
// =============================================================================

#[test]
fn test_missing_annotation_fails_naming_field() {
    let record = RecordDescriptor::new("Simple").field("FirstName", String::type_ref());
    let err = convert(&record).unwrap_err();

    match err {
        SchemaError::MissingOrInvalidTypeAnnotation { field, fault } => {
            assert_eq!(field, "FirstName");
            assert_eq!(fault, AnnotationFault::Missing);
        }
        other => panic!("Expected MissingOrInvalidTypeAnnotation, got {:?}", other),
    }
}

#[test]
fn test_name_override_and_bool() {
    let record = RecordDescriptor::new("Todo")
        .annotated("Task", String::type_ref(), "type=string,name=Action")
        .annotated("Done", bool::type_ref(), "type=bool");

    let object = convert(&record).unwrap();
    assert_eq!(object.name, "Todo");
    assert_eq!(object.len(), 2);
    assert_eq!(object.field("Action").unwrap().ty, scalar(ScalarKind::String));
    assert_eq!(object.field("Done").unwrap().ty, scalar(ScalarKind::Boolean));
    assert!(object.field("Task").is_none());
}

#[test]
fn test_every_scalar_hint() {
    let cases = [
        ("string", ScalarKind::String),
        ("bool", ScalarKind::Boolean),
        ("float", ScalarKind::Float),
        ("int", ScalarKind::Int),
        ("time", ScalarKind::DateTime),
    ];

    for (hint, kind) in cases {
        let record = RecordDescriptor::new("Single").annotated(
            "value",
            String::type_ref(),
            format!("type={}", hint),
        );
        let object = convert(&record).unwrap();
        assert_eq!(object.len(), 1, "hint {}", hint);
        assert_eq!(object.field("value").unwrap().ty, scalar(kind), "hint {}", hint);
    }
}

#[test]
fn test_unknown_annotation_keys_are_ignored() {
    let record = RecordDescriptor::new("Item").annotated(
        "price",
        f64::type_ref(),
        "deprecated=yes,type=float,broken,name=Price",
    );
    let object = convert(&record).unwrap();
    assert_eq!(object.field_names(), vec!["Price"]);
}

#[test]
fn test_name_collision_last_write_wins() {
    let record = RecordDescriptor::new("Clash")
        .annotated("a", String::type_ref(), "type=string,name=Value")
        .annotated("b", i64::type_ref(), "type=int,name=Value");

    let object = convert(&record).unwrap();
    assert_eq!(object.len(), 1);
    assert_eq!(object.field("Value").unwrap().ty, scalar(ScalarKind::Int));
}

// =============================================================================
// Lists and Nesting
// =============================================================================

#[test]
fn test_list_of_scalars() {
    let record = RecordDescriptor::new("Simple").annotated(
        "Tags",
        Vec::<String>::type_ref(),
        "type=string",
    );
    let object = convert(&record).unwrap();
    assert_eq!(
        object.field("Tags").unwrap().ty,
        SchemaType::list(scalar(ScalarKind::String))
    );
}

#[test]
fn test_list_of_records() {
    let record = RecordDescriptor::new("Simple").field("Todos", Vec::<Todo>::type_ref());
    let object = convert(&record).unwrap();
    let todos = &object.field("Todos").unwrap().ty;

    assert!(todos.is_list());
    let nested = todos.as_object().unwrap();
    assert_eq!(nested.name, "Todo");
    assert_eq!(nested.field_names(), vec!["task", "done", "end"]);
    assert_eq!(nested.field("end").unwrap().ty, scalar(ScalarKind::DateTime));
}

#[test]
fn test_nested_record_needs_no_annotation() {
    let object = convert_type::<Board>().unwrap();

    assert_eq!(object.name, "Board");
    assert_eq!(
        object.field_names(),
        vec!["Title", "tags", "scores", "todos", "pinned", "created"]
    );

    let pinned = &object.field("pinned").unwrap().ty;
    assert!(matches!(pinned, SchemaType::Object(o) if o.name == "Todo"));
    assert_eq!(object.field("scores").unwrap().ty, SchemaType::list(scalar(ScalarKind::Int)));
    assert_eq!(object.field("created").unwrap().ty, scalar(ScalarKind::DateTime));
}

#[test]
fn test_nested_failure_propagates() {
    let broken = RecordDescriptor::new("Inner").field("secret", String::type_ref());
    let record = RecordDescriptor::new("Outer")
        .annotated("ok", bool::type_ref(), "type=bool")
        .field("inner", TypeRef::Record(RecordRef::inline(broken)));

    let err = convert(&record).unwrap_err();
    assert_eq!(err.field(), Some("secret"));
}

#[test]
fn test_unsupported_shapes() {
    let err = convert_type::<Lookup>().unwrap_err();
    assert!(matches!(
        err,
        SchemaError::MissingOrInvalidTypeAnnotation {
            ref field,
            fault: AnnotationFault::UnsupportedShape(ref shape),
        } if field == "index" && shape == "{String:i64}"
    ));

    let err = convert_type::<Grid>().unwrap_err();
    assert!(matches!(
        err,
        SchemaError::MissingOrInvalidTypeAnnotation {
            fault: AnnotationFault::UnsupportedShape(_),
            ..
        }
    ));
}

// =============================================================================
// Converter Behaviour
// =============================================================================

#[test]
fn test_conversion_is_deterministic() {
    let first = convert_type::<Board>().unwrap();
    let second = convert_type::<Board>().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_sdl(), second.to_sdl());
}

#[test]
fn test_converter_shared_across_threads() {
    let converter = Converter::new(ConverterConfig::default()).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| converter.convert_type::<Board>()))
            .collect();
        for handle in handles {
            let object = handle.join().unwrap().unwrap();
            assert_eq!(object.len(), 6);
        }
    });
}

#[test]
fn test_sdl_output() {
    let sdl = convert_type::<Board>().unwrap().to_sdl();
    assert!(sdl.starts_with("scalar DateTime\n"));
    assert!(sdl.contains("type Board {\n  Title: String\n  tags: [String]\n"));
    assert!(sdl.contains("  todos: [Todo]\n  pinned: Todo\n"));
    assert_eq!(sdl.matches("type Todo {").count(), 1);
}

mod archive {
    graphql_schema_builder::describe_record! {
        #[allow(dead_code)]
        pub struct Todo {
            pub note: String => "type=string",
        }
    }
}

describe_record! {
    #[allow(dead_code)]
    pub struct Backlog {
        pub current: Todo,
        pub archived: Vec<archive::Todo>,
    }
}

#[test]
fn test_distinct_types_sharing_a_name() {
    let object = convert_type::<Backlog>().unwrap();

    let current = object.field("current").unwrap().ty.as_object().unwrap();
    let archived = object.field("archived").unwrap().ty.as_object().unwrap();
    assert_eq!(current.name, "Todo");
    assert_eq!(archived.name, "Todo");
    assert_eq!(archived.field_names(), vec!["note"]);
}
