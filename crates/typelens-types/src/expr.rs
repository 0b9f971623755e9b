//! Type handles and type expressions.
//!
//! A [`TypeExpr`] is the declared type of a member as the host type system
//! sees it: possibly generic, possibly mentioning type variables of some
//! enclosing declaration. A [`RawType`] is what remains after erasure and is
//! what assignability is decided on.

use std::fmt;

// ============================================================================
// Handles
// ============================================================================

/// Opaque identity of a type registered in a [`TypeUniverse`].
///
/// Handles are only minted by [`UniverseBuilder::build`] and are meaningful
/// only for the universe that produced them.
///
/// [`TypeUniverse`]: crate::TypeUniverse
/// [`UniverseBuilder::build`]: crate::UniverseBuilder::build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHandle(pub(crate) u32);

impl TypeHandle {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Raw (erased) types
// ============================================================================

/// An erased, fully concrete type: a class or an array of a raw type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawType {
    Class(TypeHandle),
    Array(Box<RawType>),
}

impl RawType {
    /// The class handle, if this is not an array.
    pub fn class(&self) -> Option<TypeHandle> {
        match self {
            RawType::Class(handle) => Some(*handle),
            RawType::Array(_) => None,
        }
    }

    pub fn array_of(component: RawType) -> Self {
        RawType::Array(Box::new(component))
    }
}

// ============================================================================
// Type expressions
// ============================================================================

/// A type variable, identified by the generic declaration that owns it and
/// its position in that declaration's parameter list.
///
/// Bounds are not stored inline: they live in the universe so that bounds
/// referring back to the variable (`T extends Comparable<T>`) stay finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeVar {
    pub owner: TypeHandle,
    pub index: usize,
}

/// A declared type, possibly generic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    /// A class or a concrete array type.
    Concrete(RawType),
    /// A type variable of some generic declaration.
    Variable(TypeVar),
    /// A generic class applied to type arguments.
    Parameterized {
        raw: TypeHandle,
        args: Vec<TypeExpr>,
    },
    /// An array whose component is not concrete (`T[]`, `List<T>[]`).
    Array(Box<TypeExpr>),
    /// A bounded wildcard (`?`, `? extends X`, `? super X`).
    Wildcard {
        lower: Vec<TypeExpr>,
        upper: Vec<TypeExpr>,
    },
}

impl TypeExpr {
    pub fn class(handle: TypeHandle) -> Self {
        TypeExpr::Concrete(RawType::Class(handle))
    }

    /// Build an array type, collapsing to a concrete array when the component
    /// is concrete.
    pub fn array_of(component: TypeExpr) -> Self {
        match component {
            TypeExpr::Concrete(raw) => TypeExpr::Concrete(RawType::array_of(raw)),
            other => TypeExpr::Array(Box::new(other)),
        }
    }

    pub fn is_concrete(&self) -> bool {
        matches!(self, TypeExpr::Concrete(_))
    }

    /// The raw class this expression is rooted at, for classes and
    /// parameterized types.
    pub fn raw_class(&self) -> Option<TypeHandle> {
        match self {
            TypeExpr::Concrete(RawType::Class(handle)) => Some(*handle),
            TypeExpr::Parameterized { raw, .. } => Some(*raw),
            _ => None,
        }
    }

    /// True if no type variable occurs anywhere in this expression.
    pub fn is_closed(&self) -> bool {
        match self {
            TypeExpr::Concrete(_) => true,
            TypeExpr::Variable(_) => false,
            TypeExpr::Parameterized { args, .. } => args.iter().all(TypeExpr::is_closed),
            TypeExpr::Array(component) => component.is_closed(),
            TypeExpr::Wildcard { lower, upper } => {
                lower.iter().all(TypeExpr::is_closed) && upper.iter().all(TypeExpr::is_closed)
            }
        }
    }
}

impl From<RawType> for TypeExpr {
    fn from(raw: RawType) -> Self {
        TypeExpr::Concrete(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_of_concrete_collapses() {
        let string = TypeExpr::class(TypeHandle(3));
        assert_eq!(
            TypeExpr::array_of(string),
            TypeExpr::Concrete(RawType::Array(Box::new(RawType::Class(TypeHandle(3)))))
        );
    }

    #[test]
    fn test_array_of_variable_stays_generic() {
        let var = TypeExpr::Variable(TypeVar {
            owner: TypeHandle(7),
            index: 0,
        });
        let array = TypeExpr::array_of(var.clone());
        assert_eq!(array, TypeExpr::Array(Box::new(var)));
        assert!(!array.is_closed());
    }

    #[test]
    fn test_is_closed_through_wildcards() {
        let closed = TypeExpr::Parameterized {
            raw: TypeHandle(1),
            args: vec![TypeExpr::Wildcard {
                lower: vec![],
                upper: vec![TypeExpr::class(TypeHandle(2))],
            }],
        };
        assert!(closed.is_closed());
        assert_eq!(closed.raw_class(), Some(TypeHandle(1)));
    }
}
