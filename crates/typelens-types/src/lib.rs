//! Shared types for typelens.
//!
//! This crate defines the host type system the rest of the workspace
//! introspects: handles and type expressions ([`TypeExpr`]), the serializable
//! definition form ([`ClassDef`], [`TypeTable`]) and the frozen
//! [`TypeUniverse`] that answers supertype, bound and assignability queries.

mod def;
mod expr;
mod parse;
mod universe;

pub use def::{
    BoxError, ClassDef, ClassKind, ConstructorBody, ConstructorDef, Describe, FieldBody, FieldDef,
    GetterBody, MethodBody, MethodDef, SetterBody, TypeParamDef, TypeTable, Value, Visibility,
};
pub use expr::{RawType, TypeExpr, TypeHandle, TypeVar};
pub use parse::ParseError;
pub use universe::{
    BOOLEAN, ClassDescriptor, ConstructorDescriptor, DisplayRaw, DisplayType, FieldDescriptor,
    Member, MethodDescriptor, OBJECT, TypeParam, TypeUniverse, UniverseBuilder, UniverseError,
};
