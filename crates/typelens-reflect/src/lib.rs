//! Property reflection over a typelens type universe.
//!
//! [`ReflectorFactory`] hands out one immutable [`TypeMetadata`] per type:
//! the readable and writable properties discovered through getters, setters
//! and fields, their resolved types, and the default constructor. Records are
//! built on first request and cached for the lifetime of the factory.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use typelens_reflect::ReflectorFactory;
//! use typelens_types::{ClassDef, UniverseBuilder};
//!
//! let universe = UniverseBuilder::new()
//!     .add(ClassDef::class("Container").type_param("E").getter("getItem", "E"))
//!     .add(ClassDef::class("StringContainer").extends("Container<String>"))
//!     .build()
//!     .unwrap();
//! let strings = universe.lookup("StringContainer").unwrap();
//!
//! let factory = ReflectorFactory::new(Arc::new(universe));
//! let metadata = factory.metadata(strings).unwrap();
//! let ty = metadata.read_type("item").unwrap();
//! assert_eq!(factory.universe().display_raw(ty).to_string(), "String");
//! ```

use std::fmt;

use typelens_types::TypeHandle;

mod factory;
mod invoker;
mod metadata;
pub mod property;
mod reflector;

pub use factory::ReflectorFactory;
pub use invoker::{DefaultConstructor, InvokeError, Invoker};
pub use metadata::TypeMetadata;
pub use reflector::{MethodSignature, Reflector, ReflectorConfig, pick_getter, pick_setter};

/// Direction of a property lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Read => f.write_str("readable"),
            Access::Write => f.write_str("writable"),
        }
    }
}

/// Errors that can occur while reflecting a type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("ambiguous accessors for property `{property}` in `{type_name}`: {detail}")]
    AmbiguousAccessor {
        type_name: String,
        property: String,
        detail: String,
    },

    #[error("there is no {access} property named `{property}` in `{type_name}`")]
    NoSuchProperty {
        type_name: String,
        property: String,
        access: Access,
    },

    #[error("`{type_name}` has no accessible default constructor")]
    NoDefaultConstructor { type_name: String },

    #[error(transparent)]
    Invoke(#[from] InvokeError),

    #[error("type handle {0} does not belong to this universe")]
    UnknownType(TypeHandle),
}

/// Result type for reflection operations.
pub type Result<T> = std::result::Result<T, Error>;
