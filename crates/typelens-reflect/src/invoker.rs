//! Uniform read/write access to methods and fields.

use std::any::Any;

use typelens_types::{
    BoxError, ConstructorBody, FieldBody, FieldDescriptor, MethodBody, MethodDescriptor, Value,
};

/// Errors raised when an accessor is called.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("`{member}` failed: {source}")]
    Invocation {
        member: String,
        #[source]
        source: BoxError,
    },

    #[error("`{member}` is not accessible")]
    IllegalAccess { member: String },

    #[error("`{member}` has no bound body")]
    Unbound { member: String },

    #[error("`{member}` cannot be used to {operation}")]
    Unsupported {
        member: String,
        operation: &'static str,
    },
}

#[derive(Debug, Clone)]
enum Target {
    Method(Option<MethodBody>),
    FieldRead(Option<FieldBody>),
    FieldWrite(Option<FieldBody>),
}

/// Reads or writes one property of a target object.
///
/// An invoker is built once per property when a type is reflected and then
/// shared by every caller of the cached metadata.
#[derive(Debug, Clone)]
pub struct Invoker {
    member: String,
    accessible: bool,
    target: Target,
}

impl Invoker {
    pub(crate) fn method(owner: &str, method: &MethodDescriptor, accessible: bool) -> Self {
        Self {
            member: format!("{}.{}", owner, method.name),
            accessible,
            target: Target::Method(method.body.clone()),
        }
    }

    pub(crate) fn field_reader(owner: &str, field: &FieldDescriptor) -> Self {
        Self {
            member: format!("{}.{}", owner, field.name),
            accessible: true,
            target: Target::FieldRead(field.body.clone()),
        }
    }

    pub(crate) fn field_writer(owner: &str, field: &FieldDescriptor) -> Self {
        Self {
            member: format!("{}.{}", owner, field.name),
            accessible: true,
            target: Target::FieldWrite(field.body.clone()),
        }
    }

    /// `Type.member` this invoker delegates to.
    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    /// True if this invoker goes through a field rather than a method.
    pub fn is_field(&self) -> bool {
        !matches!(self.target, Target::Method(_))
    }

    /// Read the property from `target`.
    pub fn invoke_get(&self, target: &dyn Any) -> Result<Value, InvokeError> {
        self.check_access()?;
        let body = match &self.target {
            Target::Method(Some(MethodBody::Getter(body))) => body,
            Target::FieldRead(Some(field)) => &field.get,
            Target::Method(None) | Target::FieldRead(None) => return Err(self.unbound()),
            Target::Method(Some(MethodBody::Setter(_))) | Target::FieldWrite(_) => {
                return Err(self.unsupported("read"));
            }
        };
        body.call(target).map_err(|source| self.failed(source))
    }

    /// Write `value` into the property of `target`.
    pub fn invoke_set(&self, target: &mut dyn Any, value: Value) -> Result<(), InvokeError> {
        self.check_access()?;
        let body = match &self.target {
            Target::Method(Some(MethodBody::Setter(body))) => body,
            Target::FieldWrite(Some(FieldBody { set: Some(body), .. })) => body,
            Target::Method(None) | Target::FieldWrite(None) => return Err(self.unbound()),
            Target::FieldWrite(Some(FieldBody { set: None, .. })) => {
                return Err(self.unsupported("write"));
            }
            Target::Method(Some(MethodBody::Getter(_))) | Target::FieldRead(_) => {
                return Err(self.unsupported("write"));
            }
        };
        body.call(target, value).map_err(|source| self.failed(source))
    }

    fn check_access(&self) -> Result<(), InvokeError> {
        if self.accessible {
            Ok(())
        } else {
            Err(InvokeError::IllegalAccess {
                member: self.member.clone(),
            })
        }
    }

    fn unbound(&self) -> InvokeError {
        InvokeError::Unbound {
            member: self.member.clone(),
        }
    }

    fn unsupported(&self, operation: &'static str) -> InvokeError {
        InvokeError::Unsupported {
            member: self.member.clone(),
            operation,
        }
    }

    fn failed(&self, source: BoxError) -> InvokeError {
        InvokeError::Invocation {
            member: self.member.clone(),
            source,
        }
    }
}

/// The zero-argument constructor of a reflected type.
#[derive(Debug, Clone)]
pub struct DefaultConstructor {
    member: String,
    body: Option<ConstructorBody>,
}

impl DefaultConstructor {
    pub(crate) fn new(owner: &str, body: Option<ConstructorBody>) -> Self {
        Self {
            member: format!("{}::new", owner),
            body,
        }
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    /// Create a fresh instance.
    pub fn new_instance(&self) -> Result<Value, InvokeError> {
        let body = self.body.as_ref().ok_or_else(|| InvokeError::Unbound {
            member: self.member.clone(),
        })?;
        body.call().map_err(|source| InvokeError::Invocation {
            member: self.member.clone(),
            source,
        })
    }
}
