//! Helper macro generating port error enums with snake-case constructors.
//!
//! Each variant `Foo { a: String, b: u64 }` gets `fn foo(a: impl Into<String>,
//! b: impl Into<u64>) -> Self`, so call sites read
//! `DocumentStoreError::query("timeout")` instead of a struct literal.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[must_use]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            #[must_use]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor generation for port error enums.
    define_port_error! {
        pub enum LedgerPortError {
            Missing { message: String } => "missing: {message}",
            Stale { version: u64 } => "stale at version {version}",
            Clash { field: String, version: u64 } => "clash on {field} at {version}",
            Offline => "ledger offline",
        }
    }

    #[test]
    fn string_fields_accept_str_slices() {
        let err = LedgerPortError::missing("bookings");
        assert_eq!(err.to_string(), "missing: bookings");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        let err = LedgerPortError::stale(7_u64);
        assert_eq!(err, LedgerPortError::Stale { version: 7 });
    }

    #[test]
    fn mixed_fields_are_passed_in_declaration_order() {
        let err = LedgerPortError::clash("email", 3_u64);
        assert_eq!(err.to_string(), "clash on email at 3");
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(LedgerPortError::offline().to_string(), "ledger offline");
    }
}
