//! Descriptors for registered custom types.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use tagmarsh_foundation::MarshObject;

/// Builds a bare instance of a registered type.
pub type Constructor = Arc<dyn Fn() -> Box<dyn MarshObject> + Send + Sync>;

// =============================================================================
// PropertyDescriptor
// =============================================================================

/// One marshalled property of a registered type.
///
/// A property is read through its getter if it has one, otherwise as a
/// direct field; it is written through its setter if it has one, otherwise
/// as a direct field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyDescriptor {
    name: String,
    getter: Option<String>,
    setter: Option<String>,
}

impl PropertyDescriptor {
    /// Creates a property accessed as a direct field.
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            getter: None,
            setter: None,
        }
    }

    /// Creates a property accessed through a getter and a setter.
    #[must_use]
    pub fn accessor(
        name: impl Into<String>,
        getter: impl Into<String>,
        setter: impl Into<String>,
    ) -> Self {
        Self::field(name).with_getter(getter).with_setter(setter)
    }

    /// Sets the getter name.
    #[must_use]
    pub fn with_getter(mut self, getter: impl Into<String>) -> Self {
        self.getter = Some(getter.into());
        self
    }

    /// Sets the setter name.
    #[must_use]
    pub fn with_setter(mut self, setter: impl Into<String>) -> Self {
        self.setter = Some(setter.into());
        self
    }

    /// Returns the property name, which is also its envelope field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if reads go through a getter.
    #[must_use]
    pub const fn has_getter(&self) -> bool {
        self.getter.is_some()
    }

    /// Returns true if writes go through a setter.
    #[must_use]
    pub const fn has_setter(&self) -> bool {
        self.setter.is_some()
    }

    /// Returns the getter name.
    #[must_use]
    pub fn getter_name(&self) -> Option<&str> {
        self.getter.as_deref()
    }

    /// Returns the setter name.
    #[must_use]
    pub fn setter_name(&self) -> Option<&str> {
        self.setter.as_deref()
    }
}

// =============================================================================
// MarshDescriptor
// =============================================================================

/// Describes how to flatten and hydrate one registered type.
#[derive(Clone)]
pub struct MarshDescriptor {
    type_name: String,
    runtime_type: TypeId,
    constructor: Constructor,
    properties: Vec<PropertyDescriptor>,
}

impl MarshDescriptor {
    /// Creates a descriptor for `T`.
    #[must_use]
    pub fn new<T, F>(
        type_name: impl Into<String>,
        constructor: F,
        properties: impl IntoIterator<Item = PropertyDescriptor>,
    ) -> Self
    where
        T: MarshObject,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            type_name: type_name.into(),
            runtime_type: TypeId::of::<T>(),
            constructor: Arc::new(move || Box::new(constructor()) as Box<dyn MarshObject>),
            properties: properties.into_iter().collect(),
        }
    }

    /// Returns the registered type name, used as the envelope tag.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the Rust type this descriptor was registered for.
    #[must_use]
    pub const fn runtime_type(&self) -> TypeId {
        self.runtime_type
    }

    /// Returns the properties in marshalling order.
    #[must_use]
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Builds a bare instance.
    #[must_use]
    pub fn construct(&self) -> Box<dyn MarshObject> {
        (self.constructor)()
    }
}

impl fmt::Debug for MarshDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarshDescriptor")
            .field("type_name", &self.type_name)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}
