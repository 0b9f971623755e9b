//! The host type system: a table of class descriptors and the graph queries
//! the resolver and reflector issue against it.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::def::{
    ClassDef, ClassKind, ConstructorBody, FieldBody, MethodBody, TypeTable, Visibility,
};
use crate::expr::{RawType, TypeExpr, TypeHandle, TypeVar};
use crate::parse::{self, ParseError, Scope};
use crate::Describe;

/// Name of the universal top type.
pub const OBJECT: &str = "Object";

/// Name of the boolean primitive.
pub const BOOLEAN: &str = "bool";

const PRIMITIVES: &[&str] = &[
    BOOLEAN, "char", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64",
    "u128", "usize", "f32", "f64",
];

/// Errors raised while building a [`TypeUniverse`].
#[derive(Debug, thiserror::Error)]
pub enum UniverseError {
    #[error("type `{0}` is defined more than once")]
    DuplicateType(String),

    #[error("invalid type expression in `{owner}`: {source}")]
    Parse {
        owner: String,
        #[source]
        source: ParseError,
    },

    #[error("`{owner}` cannot use `{supertype}` as {role}")]
    InvalidSupertype {
        owner: String,
        supertype: String,
        role: &'static str,
    },

    #[error("inheritance cycle through `{0}`")]
    CyclicInheritance(String),

    #[error("type parameter `{param}` of `{owner}` is bounded by itself")]
    CyclicBound { owner: String, param: String },

    #[error("`{owner}` binds a body to {member}, which it does not declare")]
    DanglingBinding { owner: String, member: String },
}

// ============================================================================
// Descriptors
// ============================================================================

/// A declared type parameter with its resolved upper bounds.
#[derive(Debug, Clone)]
pub struct TypeParam {
    pub name: String,
    pub bounds: Vec<TypeExpr>,
}

/// A method as declared on its class.
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    pub name: String,
    pub params: Vec<TypeExpr>,
    pub returns: Option<TypeExpr>,
    pub visibility: Visibility,
    pub synthetic: bool,
    pub body: Option<MethodBody>,
}

/// A field as declared on its class.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeExpr,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
    pub body: Option<FieldBody>,
}

/// A constructor as declared on its class.
#[derive(Debug, Clone)]
pub struct ConstructorDescriptor {
    pub params: Vec<TypeExpr>,
    pub visibility: Visibility,
    pub body: Option<ConstructorBody>,
}

/// Everything the universe knows about one type.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    pub handle: TypeHandle,
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeParam>,
    /// Generic superclass, `None` for `Object`, interfaces and primitives.
    pub superclass: Option<TypeExpr>,
    /// Generic interfaces (super-interfaces when this is an interface).
    pub interfaces: Vec<TypeExpr>,
    pub methods: Vec<MethodDescriptor>,
    pub fields: Vec<FieldDescriptor>,
    pub constructors: Vec<ConstructorDescriptor>,
}

/// A member descriptor paired with the class that declares it.
#[derive(Debug)]
pub struct Member<'u, D> {
    pub declaring: TypeHandle,
    pub descriptor: &'u D,
}

impl<D> Clone for Member<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Member<'_, D> {}

impl<D> std::ops::Deref for Member<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        self.descriptor
    }
}

// ============================================================================
// Universe
// ============================================================================

/// A frozen, immutable type table.
///
/// Cheap to share behind an `Arc`; every query is a read.
#[derive(Debug)]
pub struct TypeUniverse {
    classes: Vec<ClassDescriptor>,
    by_name: HashMap<String, TypeHandle>,
    object: TypeHandle,
    boolean: TypeHandle,
}

impl TypeUniverse {
    /// The universal top type.
    pub fn object(&self) -> TypeHandle {
        self.object
    }

    /// The boolean primitive.
    pub fn boolean(&self) -> TypeHandle {
        self.boolean
    }

    pub fn lookup(&self, name: &str) -> Option<TypeHandle> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, handle: TypeHandle) -> bool {
        handle.index() < self.classes.len()
    }

    /// The descriptor for `handle`, if it belongs to this universe.
    pub fn class(&self, handle: TypeHandle) -> Option<&ClassDescriptor> {
        self.classes.get(handle.index())
    }

    /// All descriptors in registration order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.classes.iter()
    }

    pub fn declared_methods(
        &self,
        handle: TypeHandle,
    ) -> impl Iterator<Item = Member<'_, MethodDescriptor>> {
        self.class(handle)
            .into_iter()
            .flat_map(|c| c.methods.iter())
            .map(move |descriptor| Member {
                declaring: handle,
                descriptor,
            })
    }

    pub fn declared_fields(
        &self,
        handle: TypeHandle,
    ) -> impl Iterator<Item = Member<'_, FieldDescriptor>> {
        self.class(handle)
            .into_iter()
            .flat_map(|c| c.fields.iter())
            .map(move |descriptor| Member {
                declaring: handle,
                descriptor,
            })
    }

    pub fn declared_constructors(
        &self,
        handle: TypeHandle,
    ) -> impl Iterator<Item = Member<'_, ConstructorDescriptor>> {
        self.class(handle)
            .into_iter()
            .flat_map(|c| c.constructors.iter())
            .map(move |descriptor| Member {
                declaring: handle,
                descriptor,
            })
    }

    pub fn name(&self, handle: TypeHandle) -> &str {
        self.class(handle).map(|c| c.name.as_str()).unwrap_or("<unknown>")
    }

    pub fn kind(&self, handle: TypeHandle) -> Option<ClassKind> {
        self.class(handle).map(|c| c.kind)
    }

    pub fn is_primitive(&self, handle: TypeHandle) -> bool {
        self.kind(handle) == Some(ClassKind::Primitive)
    }

    pub fn type_params(&self, handle: TypeHandle) -> &[TypeParam] {
        self.class(handle)
            .map(|c| c.type_params.as_slice())
            .unwrap_or(&[])
    }

    /// Declared upper bounds of a type variable.
    pub fn bounds(&self, var: TypeVar) -> &[TypeExpr] {
        self.type_params(var.owner)
            .get(var.index)
            .map(|p| p.bounds.as_slice())
            .unwrap_or(&[])
    }

    pub fn generic_superclass(&self, handle: TypeHandle) -> Option<&TypeExpr> {
        self.class(handle).and_then(|c| c.superclass.as_ref())
    }

    pub fn generic_interfaces(&self, handle: TypeHandle) -> &[TypeExpr] {
        self.class(handle)
            .map(|c| c.interfaces.as_slice())
            .unwrap_or(&[])
    }

    /// Raw superclass handle.
    pub fn superclass(&self, handle: TypeHandle) -> Option<TypeHandle> {
        self.generic_superclass(handle).and_then(TypeExpr::raw_class)
    }

    /// Raw interface handles in declaration order.
    pub fn interfaces(&self, handle: TypeHandle) -> impl Iterator<Item = TypeHandle> + '_ {
        self.generic_interfaces(handle)
            .iter()
            .filter_map(TypeExpr::raw_class)
    }

    /// True if `sub` is `sup` or reaches it through superclass or interface
    /// edges.
    pub fn is_subclass_of(&self, sub: TypeHandle, sup: TypeHandle) -> bool {
        if sub == sup {
            return true;
        }
        self.superclass(sub)
            .into_iter()
            .chain(self.interfaces(sub))
            .any(|parent| self.is_subclass_of(parent, sup))
    }

    /// True if a value of type `from` can be stored in a slot of type `to`.
    pub fn is_assignable_from(&self, to: &RawType, from: &RawType) -> bool {
        match (to, from) {
            (RawType::Class(to), RawType::Class(from)) => {
                if to == from {
                    return true;
                }
                if self.is_primitive(*to) || self.is_primitive(*from) {
                    return false;
                }
                *to == self.object || self.is_subclass_of(*from, *to)
            }
            (RawType::Class(to), RawType::Array(_)) => *to == self.object,
            (RawType::Array(to), RawType::Array(from)) => {
                let primitive_component = from.class().is_some_and(|c| self.is_primitive(c));
                if primitive_component {
                    to == from
                } else {
                    self.is_assignable_from(to, from)
                }
            }
            (RawType::Array(_), RawType::Class(_)) => false,
        }
    }

    /// Erase a type expression to the raw type the host would use at
    /// runtime.
    pub fn erasure(&self, ty: &TypeExpr) -> RawType {
        match ty {
            TypeExpr::Concrete(raw) => raw.clone(),
            TypeExpr::Parameterized { raw, .. } => RawType::Class(*raw),
            TypeExpr::Array(component) => RawType::array_of(self.erasure(component)),
            TypeExpr::Variable(var) => self.first_bound_erasure(self.bounds(*var)),
            TypeExpr::Wildcard { upper, .. } => self.first_bound_erasure(upper),
        }
    }

    fn first_bound_erasure(&self, bounds: &[TypeExpr]) -> RawType {
        match bounds.first() {
            // A bound that is itself a variable is followed; `T extends U`.
            Some(bound) => self.erasure(bound),
            None => RawType::Class(self.object),
        }
    }

    /// Parse a type expression against this universe. With `scope`, the type
    /// parameters of that declaration are in scope.
    pub fn parse_type(
        &self,
        input: &str,
        scope: Option<TypeHandle>,
    ) -> Result<TypeExpr, ParseError> {
        let arities: Vec<usize> = self.classes.iter().map(|c| c.type_params.len()).collect();
        let params: Vec<String> = scope
            .map(|h| self.type_params(h).iter().map(|p| p.name.clone()).collect())
            .unwrap_or_default();
        let scope = Scope {
            names: &self.by_name,
            arities: &arities,
            owner: scope.map(|h| (h, params.as_slice())),
            object: self.object,
        };
        parse::parse(input, &scope)
    }

    /// Render a type expression with this universe's names.
    pub fn display<'a>(&'a self, ty: &'a TypeExpr) -> DisplayType<'a> {
        DisplayType { universe: self, ty }
    }

    /// Render a raw type with this universe's names.
    pub fn display_raw<'a>(&'a self, raw: &'a RawType) -> DisplayRaw<'a> {
        DisplayRaw { universe: self, raw }
    }
}

/// [`fmt::Display`] adapter returned by [`TypeUniverse::display`].
pub struct DisplayType<'a> {
    universe: &'a TypeUniverse,
    ty: &'a TypeExpr,
}

impl fmt::Display for DisplayType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let u = self.universe;
        match self.ty {
            TypeExpr::Concrete(raw) => write!(f, "{}", u.display_raw(raw)),
            TypeExpr::Variable(var) => {
                let name = u
                    .type_params(var.owner)
                    .get(var.index)
                    .map(|p| p.name.as_str())
                    .unwrap_or("?");
                f.write_str(name)
            }
            TypeExpr::Parameterized { raw, args } => {
                write!(f, "{}<", u.name(*raw))?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", u.display(arg))?;
                }
                f.write_str(">")
            }
            TypeExpr::Array(component) => write!(f, "{}[]", u.display(component)),
            TypeExpr::Wildcard { lower, upper } => {
                f.write_str("?")?;
                if let Some(bound) = lower.first() {
                    write!(f, " super {}", u.display(bound))
                } else if let Some(bound) = upper
                    .first()
                    .filter(|b| **b != TypeExpr::class(u.object))
                {
                    write!(f, " extends {}", u.display(bound))
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// [`fmt::Display`] adapter returned by [`TypeUniverse::display_raw`].
pub struct DisplayRaw<'a> {
    universe: &'a TypeUniverse,
    raw: &'a RawType,
}

impl fmt::Display for DisplayRaw<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.raw {
            RawType::Class(handle) => f.write_str(self.universe.name(*handle)),
            RawType::Array(component) => {
                write!(f, "{}[]", self.universe.display_raw(component))
            }
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Collects [`ClassDef`]s and freezes them into a [`TypeUniverse`].
///
/// The builder starts with a prelude: `Object`, the primitives, `String`,
/// `Vec<T>`, `Option<T>` and `HashMap<K, V>`.
///
/// # Example
///
/// ```
/// use typelens_types::{ClassDef, UniverseBuilder};
///
/// let universe = UniverseBuilder::new()
///     .add(ClassDef::class("Container").type_param("E").getter("get", "E"))
///     .add(ClassDef::class("StringContainer").extends("Container<String>"))
///     .build()
///     .unwrap();
///
/// let container = universe.lookup("Container").unwrap();
/// let strings = universe.lookup("StringContainer").unwrap();
/// assert!(universe.is_subclass_of(strings, container));
/// ```
#[derive(Debug)]
pub struct UniverseBuilder {
    defs: Vec<ClassDef>,
}

impl Default for UniverseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl UniverseBuilder {
    pub fn new() -> Self {
        let mut defs = vec![ClassDef::class(OBJECT)];
        defs.extend(PRIMITIVES.iter().map(|p| ClassDef::primitive(*p)));
        defs.push(ClassDef::class("String"));
        defs.push(ClassDef::class("Vec").type_param("T"));
        defs.push(ClassDef::class("Option").type_param("T"));
        defs.push(ClassDef::class("HashMap").type_param("K").type_param("V"));
        Self { defs }
    }

    pub fn add(mut self, def: ClassDef) -> Self {
        self.defs.push(def);
        self
    }

    /// Add the definition produced by a [`Describe`] implementation.
    pub fn describe<T: Describe>(self) -> Self {
        self.add(T::describe())
    }

    pub fn table(mut self, table: TypeTable) -> Self {
        self.defs.extend(table.types);
        self
    }

    pub fn build(self) -> Result<TypeUniverse, UniverseError> {
        let mut by_name = HashMap::with_capacity(self.defs.len());
        for (i, def) in self.defs.iter().enumerate() {
            if by_name
                .insert(def.name.clone(), TypeHandle(i as u32))
                .is_some()
            {
                return Err(UniverseError::DuplicateType(def.name.clone()));
            }
            if let Some(member) = def.dangling.first() {
                return Err(UniverseError::DanglingBinding {
                    owner: def.name.clone(),
                    member: member.clone(),
                });
            }
        }

        let arities: Vec<usize> = self.defs.iter().map(|d| d.type_params.len()).collect();
        let object = by_name[OBJECT];
        let boolean = by_name[BOOLEAN];

        let classes = self
            .defs
            .into_iter()
            .enumerate()
            .map(|(i, def)| {
                let handle = TypeHandle(i as u32);
                let params: Vec<String> = def.type_params.iter().map(|p| p.name.clone()).collect();
                let scope = Scope {
                    names: &by_name,
                    arities: &arities,
                    owner: Some((handle, params.as_slice())),
                    object,
                };
                lower_class(handle, def, &scope)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let universe = TypeUniverse {
            classes,
            by_name,
            object,
            boolean,
        };
        validate_supertypes(&universe)?;
        Ok(universe)
    }
}

fn lower_class(
    handle: TypeHandle,
    def: ClassDef,
    scope: &Scope<'_>,
) -> Result<ClassDescriptor, UniverseError> {
    let owner = def.name;
    let parse_one = |input: &str| {
        parse::parse(input, scope).map_err(|source| UniverseError::Parse {
            owner: owner.clone(),
            source,
        })
    };
    let parse_all = |inputs: &[String]| {
        inputs
            .iter()
            .map(|i| parse_one(i.as_str()))
            .collect::<Result<Vec<_>, _>>()
    };

    let mut type_params = Vec::with_capacity(def.type_params.len());
    for param in &def.type_params {
        type_params.push(TypeParam {
            name: param.name.clone(),
            bounds: parse_all(&param.bounds)?,
        });
    }

    let superclass = match (&def.extends, def.kind) {
        (Some(ty), _) => Some(parse_one(ty.as_str())?),
        (None, ClassKind::Class) if handle != scope.object => Some(TypeExpr::class(scope.object)),
        (None, _) => None,
    };

    let interfaces = parse_all(&def.implements)?;

    let mut methods = Vec::with_capacity(def.methods.len());
    for m in def.methods {
        methods.push(MethodDescriptor {
            params: parse_all(&m.params)?,
            returns: m.returns.as_deref().map(parse_one).transpose()?,
            name: m.name,
            visibility: m.visibility,
            synthetic: m.synthetic,
            body: m.body,
        });
    }

    let mut fields = Vec::with_capacity(def.fields.len());
    for f in def.fields {
        fields.push(FieldDescriptor {
            ty: parse_one(f.ty.as_str())?,
            name: f.name,
            visibility: f.visibility,
            is_static: f.is_static,
            is_final: f.is_final,
            body: f.body,
        });
    }

    let mut constructors = Vec::with_capacity(def.constructors.len());
    for c in def.constructors {
        constructors.push(ConstructorDescriptor {
            params: parse_all(&c.params)?,
            visibility: c.visibility,
            body: c.body,
        });
    }

    Ok(ClassDescriptor {
        handle,
        name: owner.clone(),
        kind: def.kind,
        type_params,
        superclass,
        interfaces,
        methods,
        fields,
        constructors,
    })
}

/// Superclasses must be classes, interfaces must be interfaces, and neither
/// the inheritance graph nor the chains of first bounds may be cyclic.
fn validate_supertypes(universe: &TypeUniverse) -> Result<(), UniverseError> {
    for class in universe.classes() {
        check_bounds(universe, class)?;

        let invalid = |supertype: &TypeExpr, role: &'static str| UniverseError::InvalidSupertype {
            owner: class.name.clone(),
            supertype: universe.display(supertype).to_string(),
            role,
        };

        if let Some(superclass) = &class.superclass {
            let ok = class.kind == ClassKind::Class
                && superclass
                    .raw_class()
                    .is_some_and(|h| universe.kind(h) == Some(ClassKind::Class));
            if !ok {
                return Err(invalid(superclass, "a superclass"));
            }
        }
        for interface in &class.interfaces {
            let ok = class.kind != ClassKind::Primitive
                && interface
                    .raw_class()
                    .is_some_and(|h| universe.kind(h) == Some(ClassKind::Interface));
            if !ok {
                return Err(invalid(interface, "an interface"));
            }
        }
    }

    let mut done = HashSet::new();
    for class in universe.classes() {
        check_acyclic(universe, class.handle, &mut Vec::new(), &mut done)?;
    }
    Ok(())
}

/// Erasure follows a variable's first bound through array components, so
/// that chain has to end at something other than a variable it has already
/// passed (`T extends T`, `A extends B, B extends A[]`).
fn check_bounds(universe: &TypeUniverse, class: &ClassDescriptor) -> Result<(), UniverseError> {
    for index in 0..class.type_params.len() {
        let mut current = TypeVar {
            owner: class.handle,
            index,
        };
        let mut chain = Vec::new();
        loop {
            if chain.contains(&current) {
                return Err(UniverseError::CyclicBound {
                    owner: class.name.clone(),
                    param: class.type_params[index].name.clone(),
                });
            }
            chain.push(current);

            let Some(mut bound) = universe.bounds(current).first() else {
                break;
            };
            while let TypeExpr::Array(component) = bound {
                bound = &**component;
            }
            match bound {
                TypeExpr::Variable(next) => current = *next,
                _ => break,
            }
        }
    }
    Ok(())
}

fn check_acyclic(
    universe: &TypeUniverse,
    handle: TypeHandle,
    path: &mut Vec<TypeHandle>,
    done: &mut HashSet<TypeHandle>,
) -> Result<(), UniverseError> {
    if done.contains(&handle) {
        return Ok(());
    }
    if path.contains(&handle) {
        return Err(UniverseError::CyclicInheritance(
            universe.name(handle).to_string(),
        ));
    }
    path.push(handle);
    let parents: Vec<TypeHandle> = universe
        .superclass(handle)
        .into_iter()
        .chain(universe.interfaces(handle))
        .collect();
    for parent in parents {
        check_acyclic(universe, parent, path, done)?;
    }
    path.pop();
    done.insert(handle);
    Ok(())
}
