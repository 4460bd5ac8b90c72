//! Registered custom types.
//!
//! A host type becomes marshallable by implementing [`MarshObject`] and
//! being registered under a type name. The engine never inspects the type
//! structurally: it reads and writes properties only through the accessor
//! names a registry descriptor lists.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use thiserror::Error;

use crate::Value;

/// Why an object refused a property access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The object has no field, getter, or setter by that name.
    #[error("no member named `{0}`")]
    UnknownMember(String),

    /// The member exists but rejected the value.
    #[error("`{member}` rejected the value: {reason}")]
    Rejected {
        /// The field or setter name.
        member: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl AccessError {
    /// Creates a rejection for a value of the wrong kind.
    #[must_use]
    pub fn expected(member: &str, expected: &str, actual: &Value) -> Self {
        Self::Rejected {
            member: member.to_string(),
            reason: format!("expected {expected}, got {}", actual.kind_name()),
        }
    }
}

/// Capability trait for host types that a registry can describe.
///
/// Direct fields and accessor methods are addressed by name. A type only
/// needs to answer for the names its registered descriptor uses.
pub trait MarshObject: Any + fmt::Debug + Send + Sync {
    /// Returns `self` as `Any` for downcasting and runtime type lookup.
    fn as_any(&self) -> &dyn Any;

    /// Reads a direct field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field does not exist.
    fn read_field(&self, field: &str) -> Result<Value, AccessError>;

    /// Writes a direct field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field does not exist or rejects the value.
    fn write_field(&mut self, field: &str, value: Value) -> Result<(), AccessError>;

    /// Invokes a getter method.
    ///
    /// # Errors
    ///
    /// Returns an error if the getter does not exist.
    fn call_getter(&self, getter: &str) -> Result<Value, AccessError> {
        Err(AccessError::UnknownMember(getter.to_string()))
    }

    /// Invokes a setter method.
    ///
    /// # Errors
    ///
    /// Returns an error if the setter does not exist or rejects the value.
    fn call_setter(&mut self, setter: &str, value: Value) -> Result<(), AccessError> {
        let _ = value;
        Err(AccessError::UnknownMember(setter.to_string()))
    }

    /// Compares with another object, which may be of a different type.
    fn eq_object(&self, other: &dyn MarshObject) -> bool;
}

/// A shared, immutable handle to a registered object.
#[derive(Clone)]
pub struct Instance(Arc<dyn MarshObject>);

impl Instance {
    /// Wraps a concrete object.
    #[must_use]
    pub fn new<T: MarshObject>(object: T) -> Self {
        Self(Arc::new(object))
    }

    /// Wraps an object produced by a descriptor's constructor.
    #[must_use]
    pub fn from_boxed(object: Box<dyn MarshObject>) -> Self {
        Self(Arc::from(object))
    }

    /// Returns the object.
    #[must_use]
    pub fn object(&self) -> &dyn MarshObject {
        &*self.0
    }

    /// Returns the concrete runtime type of the object.
    #[must_use]
    pub fn runtime_type(&self) -> TypeId {
        self.0.as_any().type_id()
    }

    /// Downcasts to a concrete type.
    #[must_use]
    pub fn downcast_ref<T: MarshObject>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.eq_object(other.object())
    }
}

impl Eq for Instance {}

impl Hash for Instance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Equal objects share a runtime type; field hashing is left to eq.
        self.runtime_type().hash(state);
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}
