//! The registry lookup contract and its in-memory implementation.
//!
//! The marshaller only ever reads a registry. Populate a [`TypeRegistry`]
//! before handing it to a marshaller; several registries can coexist.

use std::any::TypeId;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use tagmarsh_foundation::{Error, MarshObject, Result, Tag};
use tracing::debug;

use crate::descriptor::{MarshDescriptor, PropertyDescriptor};

// =============================================================================
// MarshRegistry
// =============================================================================

/// Read-only lookup of type descriptors.
pub trait MarshRegistry {
    /// Finds the descriptor for an object's runtime type.
    fn lookup_by_runtime_type(&self, object: &dyn MarshObject) -> Option<&MarshDescriptor>;

    /// Finds the descriptor registered under a type name.
    fn lookup_by_name(&self, type_name: &str) -> Option<&MarshDescriptor>;
}

impl<R: MarshRegistry + ?Sized> MarshRegistry for &R {
    fn lookup_by_runtime_type(&self, object: &dyn MarshObject) -> Option<&MarshDescriptor> {
        (**self).lookup_by_runtime_type(object)
    }

    fn lookup_by_name(&self, type_name: &str) -> Option<&MarshDescriptor> {
        (**self).lookup_by_name(type_name)
    }
}

impl<R: MarshRegistry + ?Sized> MarshRegistry for Arc<R> {
    fn lookup_by_runtime_type(&self, object: &dyn MarshObject) -> Option<&MarshDescriptor> {
        (**self).lookup_by_runtime_type(object)
    }

    fn lookup_by_name(&self, type_name: &str) -> Option<&MarshDescriptor> {
        (**self).lookup_by_name(type_name)
    }
}

impl<R: MarshRegistry + ?Sized> MarshRegistry for Rc<R> {
    fn lookup_by_runtime_type(&self, object: &dyn MarshObject) -> Option<&MarshDescriptor> {
        (**self).lookup_by_runtime_type(object)
    }

    fn lookup_by_name(&self, type_name: &str) -> Option<&MarshDescriptor> {
        (**self).lookup_by_name(type_name)
    }
}

// =============================================================================
// TypeRegistry
// =============================================================================

/// In-memory registry of custom types.
///
/// Each type name and each Rust type may be registered once.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    /// Descriptors in registration order.
    descriptors: Vec<MarshDescriptor>,
    /// Map from type name to descriptor index.
    by_name: HashMap<String, usize>,
    /// Map from Rust type to descriptor index.
    by_type: HashMap<TypeId, usize>,
}

impl TypeRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under `type_name`.
    ///
    /// `constructor` builds the bare instance that hydration fills in;
    /// `properties` lists what is marshalled, in order.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRegistration` if the name is taken, is a built-in
    /// kind name, or `T` is already registered.
    pub fn register<T, F>(
        &mut self,
        type_name: impl Into<String>,
        constructor: F,
        properties: impl IntoIterator<Item = PropertyDescriptor>,
    ) -> Result<()>
    where
        T: MarshObject,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.insert(MarshDescriptor::new(type_name, constructor, properties))
    }

    /// Registers a prebuilt descriptor.
    ///
    /// # Errors
    ///
    /// Same as [`TypeRegistry::register`].
    pub fn insert(&mut self, descriptor: MarshDescriptor) -> Result<()> {
        let type_name = descriptor.type_name();
        if Tag::is_reserved(type_name) {
            return Err(Error::duplicate_registration(format!(
                "`{type_name}` is a built-in kind name"
            )));
        }
        if self.by_name.contains_key(type_name) {
            return Err(Error::duplicate_registration(type_name));
        }
        if let Some(&existing) = self.by_type.get(&descriptor.runtime_type()) {
            return Err(Error::duplicate_registration(format!(
                "`{type_name}` names a type already registered as `{}`",
                self.descriptors[existing].type_name()
            )));
        }

        debug!(
            type_name,
            properties = descriptor.properties().len(),
            "registered marsh type"
        );
        let index = self.descriptors.len();
        self.by_name.insert(type_name.to_string(), index);
        self.by_type.insert(descriptor.runtime_type(), index);
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Returns true if `type_name` is registered.
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.by_name.contains_key(type_name)
    }

    /// Returns registered type names in registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(MarshDescriptor::type_name)
    }
}

impl MarshRegistry for TypeRegistry {
    fn lookup_by_runtime_type(&self, object: &dyn MarshObject) -> Option<&MarshDescriptor> {
        let index = *self.by_type.get(&object.as_any().type_id())?;
        self.descriptors.get(index)
    }

    fn lookup_by_name(&self, type_name: &str) -> Option<&MarshDescriptor> {
        let index = *self.by_name.get(type_name)?;
        self.descriptors.get(index)
    }
}
