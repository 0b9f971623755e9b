//! # typelens
//!
//! Runtime property reflection over a described type universe. Types are
//! described as class definitions (by hand, from JSON, or with
//! `#[derive(Describe)]`); typelens then discovers each type's readable and
//! writable properties through getters, setters and fields, resolves generic
//! property types against the concrete type being inspected, and caches the
//! result per type.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use typelens::{ClassDef, ReflectorFactory, UniverseBuilder};
//!
//! let universe = UniverseBuilder::new()
//!     .add(
//!         ClassDef::class("Container")
//!             .type_param("E")
//!             .getter("getItem", "E")
//!             .setter("setItem", "E"),
//!     )
//!     .add(ClassDef::class("StringContainer").extends("Container<String>"))
//!     .build()
//!     .unwrap();
//! let strings = universe.lookup("StringContainer").unwrap();
//!
//! let factory = ReflectorFactory::new(Arc::new(universe));
//! let meta = factory.metadata(strings).unwrap();
//! assert_eq!(meta.readable_properties().collect::<Vec<_>>(), ["item"]);
//! assert_eq!(meta.find_property_name("ITEM"), Some("item"));
//! ```
//!
//! ## Architecture
//!
//! - **[`typelens_types`]**: type expressions, class definitions and the
//!   frozen [`TypeUniverse`]
//! - **[`typelens_resolver`]**: resolution of type variables inherited from
//!   generic supertypes
//! - **[`typelens_reflect`]**: the reflector, its metadata records and the
//!   caching [`ReflectorFactory`]
//! - **[`typelens_macros`]**: `#[derive(Describe)]`
//! - **`typelens-inspect`**: command-line inspector for JSON type tables

// Re-export the reflection API
pub use typelens_reflect::{
    Access, DefaultConstructor, Error, InvokeError, Invoker, MethodSignature, Reflector,
    ReflectorConfig, ReflectorFactory, Result, TypeMetadata, pick_getter, pick_setter, property,
};

// Re-export the resolver
pub use typelens_resolver::GenericResolver;

// Re-export the derive macro
pub use typelens_macros::Describe;

// Re-export the type model
pub use typelens_types::{
    ClassDef, ClassKind, ConstructorDef, Describe, FieldDef, MethodDef, RawType, TypeExpr,
    TypeHandle, TypeParamDef, TypeTable, TypeUniverse, TypeVar, UniverseBuilder, UniverseError,
    Value, Visibility,
};
