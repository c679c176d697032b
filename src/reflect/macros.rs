//! Declarative registration for plain structs.

/// Implement [`Reflect`](crate::reflect::Reflect) for a struct by listing its
/// fields in declaration order.
///
/// ```ignore
/// reflect_struct! {
///     Person {
///         name as "Name": String,
///         #[read_only]
///         age as "Age": u32,
///         address as "Address": Address,
///     }
/// }
/// ```
///
/// `as "..."` renames the property; without it the field name is used.
/// Attributes are forwarded as [`PropertyBuilder`](crate::reflect::PropertyBuilder)
/// modifiers (`read_only`, `write_only`, `private`, `static_member`).
#[macro_export]
macro_rules! reflect_struct {
    (
        $owner:ident {
            $(
                $(#[$modifier:ident])*
                $field:ident $(as $rename:literal)? : $ty:ty
            ),* $(,)?
        }
    ) => {
        impl $crate::reflect::Reflect for $owner {
            fn shape() -> $crate::reflect::TypeShape {
                $crate::reflect::TypeShape::composite::<$owner>(stringify!($owner))
                    $(
                        .property(
                            $crate::reflect::PropertyBuilder::<$owner>::field::<$ty>(
                                $crate::__property_name!(stringify!($field) $(, $rename)?),
                                |owner| &owner.$field,
                                |owner| &mut owner.$field,
                            )
                            $(.$modifier())*
                        )
                    )*
                    .build()
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __property_name {
    ($default:expr) => {
        $default
    };
    ($default:expr, $rename:literal) => {
        $rename
    };
}
