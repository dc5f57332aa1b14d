//! Macro for declaring validation schemas next to request types

/// Implement [`Validate`](crate::core::validation::Validate) for a request type
///
/// Each entry names a struct field, an optional wire name (defaults to the
/// field name) and an ordered rule list. Rules are the lowercase
/// constructors on [`Rule`](crate::core::validation::Rule).
///
/// The wire name must match the name serde uses for the field.
///
/// # Example
///
/// ```
/// use restkit::impl_validate;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// #[serde(default)]
/// struct AccountStoreRequest {
///     #[serde(rename = "username")]
///     user_name: String,
///     password: String,
/// }
///
/// impl_validate!(AccountStoreRequest {
///     user_name as "username" => [required(), min(3), max(16)],
///     password => [required(), min(8), max(32), password()],
/// });
/// ```
#[macro_export]
macro_rules! impl_validate {
    (@wire $field:ident $wire:literal) => {
        $wire
    };
    (@wire $field:ident) => {
        stringify!($field)
    };
    ($type:ident {
        $(
            $field:ident $(as $wire:literal)? => [$($rule:ident($($arg:expr),*)),* $(,)?]
        ),* $(,)?
    }) => {
        impl $crate::core::validation::Validate for $type {
            fn schema() -> $crate::core::validation::Schema {
                $crate::core::validation::Schema::new()
                $(
                    .field($crate::core::validation::FieldSpec::new(
                        stringify!($field),
                        $crate::impl_validate!(@wire $field $($wire)?),
                        ::std::vec![$($crate::core::validation::Rule::$rule($($arg),*)),*],
                    ))
                )*
            }
        }
    };
}
