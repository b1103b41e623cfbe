//! Declarative record descriptions

/// Declare a struct and implement [`TypeDescription`] and [`DescribeType`] for it.
///
/// Field annotations follow the field type after `=>`:
///
/// ```ignore
/// describe_record! {
///     #[derive(Debug, Clone)]
///     pub struct Todo {
///         pub task: String => "type=string,name=Action",
///         pub done: bool => "type=bool",
///         pub end: chrono::DateTime<chrono::Utc>,
///     }
/// }
/// ```
///
/// [`TypeDescription`]: crate::TypeDescription
/// [`DescribeType`]: crate::DescribeType
#[macro_export]
macro_rules! describe_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(=> $annotation:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::TypeDescription for $name {
            fn type_name() -> &'static str {
                stringify!($name)
            }

            #[allow(unused_mut)]
            fn describe() -> $crate::RecordDescriptor {
                let mut record = $crate::RecordDescriptor::new(stringify!($name))
                    .with_origin($crate::RecordOrigin::of::<$name>());
                $(
                    let field = $crate::FieldDescriptor::new(
                        stringify!($field),
                        <$ty as $crate::DescribeType>::type_ref(),
                    );
                    $( let field = field.with_annotation($annotation); )?
                    record.push(field);
                )*
                record
            }
        }

        impl $crate::DescribeType for $name {
            fn type_ref() -> $crate::TypeRef {
                $crate::TypeRef::record::<$name>()
            }
        }
    };
}
