use std::collections::HashMap;

use indexmap::IndexMap;
use typelens_types::{RawType, TypeExpr, TypeHandle};

use crate::invoker::{DefaultConstructor, Invoker};
use crate::{Access, Error, Result};

/// One direction of one property.
#[derive(Debug, Clone)]
pub(crate) struct Property {
    pub invoker: Invoker,
    pub generic: TypeExpr,
    pub raw: RawType,
}

/// Everything reflection knows about one type. Immutable once built.
#[derive(Debug)]
pub struct TypeMetadata {
    handle: TypeHandle,
    type_name: String,
    readable: IndexMap<String, Property>,
    writable: IndexMap<String, Property>,
    case_insensitive: HashMap<String, String>,
    default_constructor: Option<DefaultConstructor>,
}

impl TypeMetadata {
    pub(crate) fn new(
        handle: TypeHandle,
        type_name: String,
        readable: IndexMap<String, Property>,
        writable: IndexMap<String, Property>,
        default_constructor: Option<DefaultConstructor>,
    ) -> Self {
        let case_insensitive = readable
            .keys()
            .chain(writable.keys())
            .map(|name| (name.to_uppercase(), name.clone()))
            .collect();
        Self {
            handle,
            type_name,
            readable,
            writable,
            case_insensitive,
            default_constructor,
        }
    }

    pub fn type_handle(&self) -> TypeHandle {
        self.handle
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Readable property names in discovery order.
    pub fn readable_properties(&self) -> impl ExactSizeIterator<Item = &str> {
        self.readable.keys().map(String::as_str)
    }

    /// Writable property names in discovery order.
    pub fn writable_properties(&self) -> impl ExactSizeIterator<Item = &str> {
        self.writable.keys().map(String::as_str)
    }

    pub fn has_getter(&self, name: &str) -> bool {
        self.readable.contains_key(name)
    }

    pub fn has_setter(&self, name: &str) -> bool {
        self.writable.contains_key(name)
    }

    pub fn read_invoker(&self, name: &str) -> Result<&Invoker> {
        self.property(name, Access::Read).map(|p| &p.invoker)
    }

    pub fn write_invoker(&self, name: &str) -> Result<&Invoker> {
        self.property(name, Access::Write).map(|p| &p.invoker)
    }

    /// Erased type a read of `name` produces.
    pub fn read_type(&self, name: &str) -> Result<&RawType> {
        self.property(name, Access::Read).map(|p| &p.raw)
    }

    /// Erased type a write of `name` accepts.
    pub fn write_type(&self, name: &str) -> Result<&RawType> {
        self.property(name, Access::Write).map(|p| &p.raw)
    }

    /// Resolved generic type a read of `name` produces.
    pub fn read_generic_type(&self, name: &str) -> Result<&TypeExpr> {
        self.property(name, Access::Read).map(|p| &p.generic)
    }

    /// Resolved generic type a write of `name` accepts.
    pub fn write_generic_type(&self, name: &str) -> Result<&TypeExpr> {
        self.property(name, Access::Write).map(|p| &p.generic)
    }

    /// Canonical spelling of a property name, ignoring case.
    pub fn find_property_name(&self, name: &str) -> Option<&str> {
        self.case_insensitive
            .get(&name.to_uppercase())
            .map(String::as_str)
    }

    pub fn has_default_constructor(&self) -> bool {
        self.default_constructor.is_some()
    }

    pub fn default_constructor(&self) -> Result<&DefaultConstructor> {
        self.default_constructor
            .as_ref()
            .ok_or_else(|| Error::NoDefaultConstructor {
                type_name: self.type_name.clone(),
            })
    }

    fn property(&self, name: &str, access: Access) -> Result<&Property> {
        let map = match access {
            Access::Read => &self.readable,
            Access::Write => &self.writable,
        };
        map.get(name).ok_or_else(|| Error::NoSuchProperty {
            type_name: self.type_name.clone(),
            property: name.to_string(),
            access,
        })
    }
}
