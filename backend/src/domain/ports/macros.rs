//! `define_port_error!`: error enums for driven ports.
//!
//! Each variant gets a `thiserror` message and a snake_case constructor whose
//! field parameters accept `impl Into<T>`, so adapters can write
//! `AccountRepositoryError::query(err.to_string())` or pass a `&str`.

macro_rules! define_port_error {
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
                define_port_error!(@constructor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };

    (@constructor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident { $($field:ident : $ty:ty),* }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };
}

pub(crate) use define_port_error;
