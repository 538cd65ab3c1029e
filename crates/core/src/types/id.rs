//! Type-safe entity ids.
//!
//! `define_id!` stamps out an i32 newtype per entity so an order id can
//! never be handed to something expecting a product id. The wrapper is
//! serde-transparent (a bare number on the wire) and, behind the
//! `postgres` feature, delegates its sqlx representation to `i32`.

/// Define an i32-backed id newtype.
///
/// The generated type is `Copy`, hashable, printable, serde-transparent,
/// and convertible to and from `i32`. With the `postgres` feature it also
/// derives a transparent `sqlx::Type`, so it binds and decodes as a plain
/// `INTEGER` column.
///
/// ```
/// # use jabuticaba_core::define_id;
/// define_id!(CustomerId);
///
/// let id = CustomerId::new(7);
/// assert_eq!(id.as_i32(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(transparent)]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type))]
        #[cfg_attr(feature = "postgres", sqlx(transparent))]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i32(self) -> i32 {
                self.0
            }
        }

        impl ::core::convert::From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl ::core::convert::From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

define_id!(ProductId);
define_id!(OrderId);
define_id!(OrderLineId);
