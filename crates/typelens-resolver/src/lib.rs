//! Generic type resolution for typelens.
//!
//! A member inherited from a generic supertype is declared in terms of that
//! supertype's type variables. [`GenericResolver`] computes what such a
//! declaration means when viewed from a concrete subtype, walking the
//! inheritance graph and substituting type arguments hop by hop.
//!
//! # Example
//!
//! ```
//! use typelens_resolver::GenericResolver;
//! use typelens_types::{ClassDef, TypeExpr, UniverseBuilder};
//!
//! let universe = UniverseBuilder::new()
//!     .add(ClassDef::class("Container").type_param("E").getter("get", "E"))
//!     .add(ClassDef::class("StringContainer").extends("Container<String>"))
//!     .build()
//!     .unwrap();
//!
//! let container = universe.lookup("Container").unwrap();
//! let strings = universe.lookup("StringContainer").unwrap();
//! let get = universe.declared_methods(container).next().unwrap();
//!
//! let resolver = GenericResolver::new(&universe);
//! let ty = resolver.resolve_return_type(get, &TypeExpr::class(strings));
//! assert_eq!(ty, Some(TypeExpr::class(universe.lookup("String").unwrap())));
//! ```

use typelens_types::{
    FieldDescriptor, Member, MethodDescriptor, TypeExpr, TypeHandle, TypeUniverse, TypeVar,
};

/// Stateless resolver over one [`TypeUniverse`].
#[derive(Debug, Clone, Copy)]
pub struct GenericResolver<'u> {
    universe: &'u TypeUniverse,
}

impl<'u> GenericResolver<'u> {
    pub fn new(universe: &'u TypeUniverse) -> Self {
        Self { universe }
    }

    pub fn universe(&self) -> &'u TypeUniverse {
        self.universe
    }

    // ========================================================================
    // Member entry points
    // ========================================================================

    /// Type of `field` as seen from `src`.
    pub fn resolve_field_type(&self, field: Member<'_, FieldDescriptor>, src: &TypeExpr) -> TypeExpr {
        self.resolve(&field.ty, src, field.declaring)
    }

    /// Return type of `method` as seen from `src`, `None` if it returns nothing.
    pub fn resolve_return_type(
        &self,
        method: Member<'_, MethodDescriptor>,
        src: &TypeExpr,
    ) -> Option<TypeExpr> {
        method
            .returns
            .as_ref()
            .map(|ty| self.resolve(ty, src, method.declaring))
    }

    /// Parameter types of `method` as seen from `src`.
    pub fn resolve_param_types(
        &self,
        method: Member<'_, MethodDescriptor>,
        src: &TypeExpr,
    ) -> Vec<TypeExpr> {
        method
            .params
            .iter()
            .map(|ty| self.resolve(ty, src, method.declaring))
            .collect()
    }

    // ========================================================================
    // Core algorithm
    // ========================================================================

    /// Resolve `ty`, declared on `declaring`, in the context of `src`.
    ///
    /// `src` is a class or a parameterized type that is `declaring` or one of
    /// its subtypes. Variables that cannot be bound to an argument degrade to
    /// their first bound, or to `Object` when unbounded.
    pub fn resolve(&self, ty: &TypeExpr, src: &TypeExpr, declaring: TypeHandle) -> TypeExpr {
        match ty {
            TypeExpr::Concrete(_) => ty.clone(),
            TypeExpr::Variable(var) => self.resolve_type_var(*var, src, declaring),
            TypeExpr::Parameterized { raw, args } => TypeExpr::Parameterized {
                raw: *raw,
                args: self.resolve_all(args, src, declaring),
            },
            TypeExpr::Array(component) => {
                TypeExpr::array_of(self.resolve(component, src, declaring))
            }
            TypeExpr::Wildcard { lower, upper } => TypeExpr::Wildcard {
                lower: self.resolve_all(lower, src, declaring),
                upper: self.resolve_all(upper, src, declaring),
            },
        }
    }

    fn resolve_all(&self, types: &[TypeExpr], src: &TypeExpr, declaring: TypeHandle) -> Vec<TypeExpr> {
        types
            .iter()
            .map(|ty| self.resolve(ty, src, declaring))
            .collect()
    }

    fn resolve_type_var(&self, var: TypeVar, src: &TypeExpr, declaring: TypeHandle) -> TypeExpr {
        let Some(class) = src.raw_class() else {
            return self.unresolved(var);
        };

        if class == declaring {
            return match src {
                TypeExpr::Parameterized { args, .. } => args
                    .get(var.index)
                    .cloned()
                    .unwrap_or_else(|| self.unresolved(var)),
                _ => self.unresolved(var),
            };
        }

        let u = self.universe;
        u.generic_superclass(class)
            .into_iter()
            .chain(u.generic_interfaces(class))
            .find_map(|sup| self.scan_super(var, src, declaring, class, sup))
            .unwrap_or_else(|| self.unresolved(var))
    }

    /// Follow one supertype edge of `class` if it leads to `declaring`.
    fn scan_super(
        &self,
        var: TypeVar,
        src: &TypeExpr,
        declaring: TypeHandle,
        class: TypeHandle,
        sup: &TypeExpr,
    ) -> Option<TypeExpr> {
        let parent = sup.raw_class()?;
        if !self.universe.is_subclass_of(parent, declaring) {
            return None;
        }

        // The supertype's arguments are written in terms of `class`'s own
        // parameters, which `src` binds.
        let frame = match sup {
            TypeExpr::Parameterized { .. } => self.resolve(sup, src, class),
            _ => sup.clone(),
        };
        log::trace!(
            "resolving {} via {} -> {}",
            self.universe.display(&TypeExpr::Variable(var)),
            self.universe.display(src),
            self.universe.display(&frame)
        );
        Some(self.resolve_type_var(var, &frame, declaring))
    }

    fn unresolved(&self, var: TypeVar) -> TypeExpr {
        self.universe
            .bounds(var)
            .first()
            .cloned()
            .unwrap_or_else(|| TypeExpr::class(self.universe.object()))
    }
}
