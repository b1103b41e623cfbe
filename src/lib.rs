//! GraphQL Schema Builder
//!
//! Derives GraphQL object types from Rust record types instead of writing
//! schema definitions by hand.
//!
//! ## Features
//!
//! - **Record Descriptions**: records describe their fields through
//!   [`TypeDescription`], usually via [`describe_record!`]
//! - **Field Annotations**: `type=...` scalar hints and `name=...` output names
//! - **Recursive Conversion**: nested records and lists of records become their
//!   own named objects
//! - **Runtime Manifests**: JSON record descriptions for the CLI
//!
//! ## Example
//!
//! ```ignore
//! use graphql_schema_builder::{convert_type, describe_record};
//!
//! describe_record! {
//!     pub struct Todo {
//!         pub task: String => "type=string,name=Action",
//!         pub done: bool => "type=bool",
//!     }
//! }
//!
//! let object = convert_type::<Todo>()?;
//! assert_eq!(object.field_names(), vec!["Action", "done"]);
//! ```

pub mod annotation;
pub mod config;
pub mod converter;
pub mod descriptor;
pub mod error;
pub mod lint;
pub mod macros;
pub mod manifest;
pub mod scalar;
pub mod schema;

pub use annotation::AnnotationOptions;
pub use config::{BuilderConfig, ConverterConfig, InferenceMode, OutputFormat};
pub use converter::{convert, convert_type, Converter};
pub use descriptor::{
    describe_fields, DescribeType, FieldDescriptor, RecordDescriptor, RecordOrigin, RecordRef,
    RecordResolver, TypeDescription, TypeRef,
};
pub use error::{AnnotationFault, Result, SchemaError};
pub use manifest::{LoadedManifest, Manifest};
pub use scalar::ScalarKind;
pub use schema::{SchemaField, SchemaObject, SchemaType};
