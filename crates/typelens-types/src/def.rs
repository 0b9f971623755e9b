//! Class definitions: the input form of the host type table.
//!
//! A [`ClassDef`] names its types with strings (see [`crate::parse`]) so it
//! can be written by hand, deserialized from JSON, or generated by
//! `#[derive(Describe)]`. [`UniverseBuilder`](crate::UniverseBuilder) turns a
//! set of definitions into a [`TypeUniverse`](crate::TypeUniverse).
//!
//! Behaviour cannot be serialized, so bodies (the closures that actually read
//! or write a value) are attached with the `bind_*` methods and skipped by
//! serde.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A dynamically typed value moved in and out of accessors.
pub type Value = Box<dyn Any + Send>;

/// Error type returned by bound bodies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ============================================================================
// Bodies
// ============================================================================

/// Reads a value out of a target object.
#[derive(Clone)]
pub struct GetterBody(Arc<dyn Fn(&dyn Any) -> Result<Value, BoxError> + Send + Sync>);

impl GetterBody {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn Any) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, target: &dyn Any) -> Result<Value, BoxError> {
        (self.0)(target)
    }
}

/// Writes a value into a target object.
#[derive(Clone)]
pub struct SetterBody(Arc<dyn Fn(&mut dyn Any, Value) -> Result<(), BoxError> + Send + Sync>);

impl SetterBody {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut dyn Any, Value) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, target: &mut dyn Any, value: Value) -> Result<(), BoxError> {
        (self.0)(target, value)
    }
}

/// Creates a fresh instance with no arguments.
#[derive(Clone)]
pub struct ConstructorBody(Arc<dyn Fn() -> Result<Value, BoxError> + Send + Sync>);

impl ConstructorBody {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self) -> Result<Value, BoxError> {
        (self.0)()
    }
}

/// The behaviour of an accessor-shaped method.
#[derive(Clone)]
pub enum MethodBody {
    Getter(GetterBody),
    Setter(SetterBody),
}

/// The behaviour of a field. Final fields may still be written by reflection,
/// but a body without `set` makes the field read-only at call time.
#[derive(Clone)]
pub struct FieldBody {
    pub get: GetterBody,
    pub set: Option<SetterBody>,
}

macro_rules! opaque_debug {
    ($($ty:ty),*) => {
        $(impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!(stringify!($ty), "(..)"))
            }
        })*
    };
}

opaque_debug!(GetterBody, SetterBody, ConstructorBody, MethodBody, FieldBody);

// ============================================================================
// Definitions
// ============================================================================

/// Whether a definition is a class, an interface or a primitive.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Primitive,
}

/// Visibility of a member.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }
}

/// A type parameter with its upper bounds, e.g. `T extends Number`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeParamDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bounds: Vec<String>,
}

/// A method declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    /// `None` for methods returning nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    /// Compiler-generated members (bridges) that reflection must ignore.
    #[serde(default)]
    pub synthetic: bool,
    #[serde(skip)]
    pub body: Option<MethodBody>,
}

impl MethodDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: None,
            visibility: Visibility::Public,
            synthetic: false,
            body: None,
        }
    }

    pub fn param(mut self, ty: impl Into<String>) -> Self {
        self.params.push(ty.into());
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.returns = Some(ty.into());
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }
}

/// A field declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_final: bool,
    #[serde(skip)]
    pub body: Option<FieldBody>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            visibility: Visibility::Public,
            is_static: false,
            is_final: false,
            body: None,
        }
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn set_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn set_final(mut self) -> Self {
        self.is_final = true;
        self
    }
}

/// A constructor declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstructorDef {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(skip)]
    pub body: Option<ConstructorBody>,
}

/// A class, interface or primitive definition.
///
/// Interfaces list their super-interfaces in `implements`; `extends` is only
/// meaningful for classes. A class without `extends` derives from the top
/// type `Object`.
///
/// # Example
///
/// ```
/// use typelens_types::ClassDef;
///
/// let def = ClassDef::class("Container")
///     .type_param("E")
///     .getter("getItem", "E")
///     .setter("setItem", "E")
///     .default_constructor();
/// assert_eq!(def.methods.len(), 2);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParamDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,
    #[serde(default)]
    pub methods: Vec<MethodDef>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub constructors: Vec<ConstructorDef>,
    /// Bindings that named a member this definition does not declare.
    #[serde(skip)]
    pub(crate) dangling: Vec<String>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Interface)
    }

    pub fn primitive(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Primitive)
    }

    pub fn type_param(self, name: impl Into<String>) -> Self {
        self.bounded_type_param(name, &[])
    }

    pub fn bounded_type_param(mut self, name: impl Into<String>, bounds: &[&str]) -> Self {
        self.type_params.push(TypeParamDef {
            name: name.into(),
            bounds: bounds.iter().map(|b| b.to_string()).collect(),
        });
        self
    }

    pub fn extends(mut self, ty: impl Into<String>) -> Self {
        self.extends = Some(ty.into());
        self
    }

    pub fn implements(mut self, ty: impl Into<String>) -> Self {
        self.implements.push(ty.into());
        self
    }

    pub fn method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    /// Declare a public zero-argument method returning `ty`.
    pub fn getter(self, name: &str, ty: &str) -> Self {
        self.method(MethodDef::new(name).returns(ty))
    }

    /// Declare a public one-argument method returning nothing.
    pub fn setter(self, name: &str, ty: &str) -> Self {
        self.method(MethodDef::new(name).param(ty))
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare a `static final` field.
    pub fn constant(self, name: &str, ty: &str) -> Self {
        self.field(FieldDef::new(name, ty).set_static().set_final())
    }

    pub fn constructor(mut self, constructor: ConstructorDef) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Declare a public zero-argument constructor.
    pub fn default_constructor(self) -> Self {
        self.constructor(ConstructorDef::default())
    }

    /// Declare a public zero-argument constructor backed by `f`.
    pub fn default_constructor_with<F>(self, f: F) -> Self
    where
        F: Fn() -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.constructor(ConstructorDef {
            params: Vec::new(),
            visibility: Visibility::Public,
            body: Some(ConstructorBody::new(f)),
        })
    }

    /// Attach a body to the zero-argument method called `name`.
    pub fn bind_getter<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&dyn Any) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        match self
            .methods
            .iter_mut()
            .find(|m| m.name == name && m.params.is_empty())
        {
            Some(method) => method.body = Some(MethodBody::Getter(GetterBody::new(f))),
            None => self.dangling.push(format!("getter `{}`", name)),
        }
        self
    }

    /// Attach a body to the one-argument method called `name`. With
    /// overloads, `param` picks the one whose parameter type is spelled
    /// identically.
    pub fn bind_setter<F>(mut self, name: &str, param: Option<&str>, f: F) -> Self
    where
        F: Fn(&mut dyn Any, Value) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        match self.methods.iter_mut().find(|m| {
            m.name == name
                && m.params.len() == 1
                && param.is_none_or(|p| normalize(&m.params[0]) == normalize(p))
        }) {
            Some(method) => method.body = Some(MethodBody::Setter(SetterBody::new(f))),
            None => self.dangling.push(format!("setter `{}`", name)),
        }
        self
    }

    /// Attach read and optional write bodies to the field called `name`.
    pub fn bind_field<G>(mut self, name: &str, get: G, set: Option<SetterBody>) -> Self
    where
        G: Fn(&dyn Any) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.body = Some(FieldBody {
                    get: GetterBody::new(get),
                    set,
                })
            }
            None => self.dangling.push(format!("field `{}`", name)),
        }
        self
    }

    /// Attach a body to the zero-argument constructor.
    pub fn bind_constructor<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        match self.constructors.iter_mut().find(|c| c.params.is_empty()) {
            Some(constructor) => constructor.body = Some(ConstructorBody::new(f)),
            None => self.dangling.push("default constructor".to_string()),
        }
        self
    }
}

fn normalize(ty: &str) -> String {
    ty.chars().filter(|c| !c.is_whitespace()).collect()
}

/// A serialized set of class definitions, the on-disk table format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeTable {
    pub types: Vec<ClassDef>,
}

/// Types that can describe themselves as a [`ClassDef`].
///
/// Usually implemented with `#[derive(Describe)]`.
pub trait Describe: Any {
    fn describe() -> ClassDef;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_deserialization_defaults() {
        let json = r#"{
            "types": [
                {
                    "name": "Container",
                    "type_params": [{ "name": "E" }],
                    "methods": [{ "name": "getItem", "returns": "E" }],
                    "fields": [{ "name": "item", "ty": "E", "visibility": "private" }]
                }
            ]
        }"#;
        let table: TypeTable = serde_json::from_str(json).unwrap();
        let def = &table.types[0];

        assert_eq!(def.kind, ClassKind::Class);
        assert_eq!(def.methods[0].visibility, Visibility::Public);
        assert!(!def.methods[0].synthetic);
        assert_eq!(def.fields[0].visibility, Visibility::Private);
        assert!(def.constructors.is_empty());
    }

    #[test]
    fn test_bind_setter_picks_overload_by_param() {
        let def = ClassDef::class("Holder")
            .setter("setValue", "String")
            .setter("setValue", "i32")
            .bind_setter("setValue", Some("i32"), |_, _| Ok(()));

        assert!(def.methods[0].body.is_none());
        assert!(def.methods[1].body.is_some());
        assert!(def.dangling.is_empty());
    }

    #[test]
    fn test_bind_unknown_member_is_recorded() {
        let def = ClassDef::class("Holder").bind_getter("getMissing", |_| Ok(Box::new(())));
        assert_eq!(def.dangling, vec!["getter `getMissing`".to_string()]);
    }
}
