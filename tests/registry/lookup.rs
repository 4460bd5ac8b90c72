//! Integration tests for registry lookup
//!
//! Tests TypeRegistry registration rules and the MarshRegistry contract.

use std::any::Any;
use std::rc::Rc;
use std::sync::Arc;

use tagmarsh_foundation::{AccessError, ErrorKind, Instance, MarshObject, Tag, Value};
use tagmarsh_registry::{MarshDescriptor, MarshRegistry, PropertyDescriptor, TypeRegistry};

#[derive(Debug, Default, PartialEq)]
struct Celsius(i64);

impl MarshObject for Celsius {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn read_field(&self, field: &str) -> Result<Value, AccessError> {
        match field {
            "degrees" => Ok(Value::Int(self.0)),
            _ => Err(AccessError::UnknownMember(field.to_string())),
        }
    }

    fn write_field(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
        match (field, value.as_int()) {
            ("degrees", Some(n)) => {
                self.0 = n;
                Ok(())
            }
            ("degrees", None) => Err(AccessError::expected(field, "int", &value)),
            _ => Err(AccessError::UnknownMember(field.to_string())),
        }
    }

    fn eq_object(&self, other: &dyn MarshObject) -> bool {
        other.as_any().downcast_ref::<Self>() == Some(self)
    }
}

#[derive(Debug, Default, PartialEq)]
struct Fahrenheit(i64);

impl MarshObject for Fahrenheit {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn read_field(&self, field: &str) -> Result<Value, AccessError> {
        Err(AccessError::UnknownMember(field.to_string()))
    }

    fn write_field(&mut self, field: &str, _value: Value) -> Result<(), AccessError> {
        Err(AccessError::UnknownMember(field.to_string()))
    }

    fn eq_object(&self, other: &dyn MarshObject) -> bool {
        other.as_any().downcast_ref::<Self>() == Some(self)
    }
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register("Celsius", Celsius::default, [PropertyDescriptor::field("degrees")])
        .unwrap();
    registry
}

// =============================================================================
// Lookup
// =============================================================================

#[test]
fn lookup_by_instance() {
    let registry = registry();
    let instance = Instance::new(Celsius(21));
    let descriptor = registry.lookup_by_runtime_type(instance.object()).unwrap();
    assert_eq!(descriptor.type_name(), "Celsius");
}

#[test]
fn lookup_misses_unregistered() {
    let registry = registry();
    assert!(registry.lookup_by_runtime_type(&Fahrenheit(70)).is_none());
    assert!(registry.lookup_by_name("Fahrenheit").is_none());
}

#[test]
fn lookup_through_pointer_types() {
    fn name_of(registry: &impl MarshRegistry) -> Option<&str> {
        registry.lookup_by_name("Celsius").map(MarshDescriptor::type_name)
    }

    let local = registry();
    assert_eq!(name_of(&&local), Some("Celsius"));
    assert_eq!(name_of(&Arc::new(registry())), Some("Celsius"));
    assert_eq!(name_of(&Rc::new(registry())), Some("Celsius"));
}

#[test]
fn type_names_in_registration_order() {
    let mut registry = registry();
    registry.register("Fahrenheit", Fahrenheit::default, []).unwrap();
    assert_eq!(registry.type_names().collect::<Vec<_>>(), vec!["Celsius", "Fahrenheit"]);
    assert_eq!(registry.len(), 2);
}

// =============================================================================
// Registration Rules
// =============================================================================

#[test]
fn every_reserved_name_is_refused() {
    for name in Tag::RESERVED {
        let mut registry = TypeRegistry::new();
        let err = registry.register(*name, Fahrenheit::default, []).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::DuplicateRegistration(_)), "{name}");
    }
}

#[test]
fn duplicate_name_leaves_registry_unchanged() {
    let mut registry = registry();
    assert!(registry.register("Celsius", Fahrenheit::default, []).is_err());
    assert!(registry.lookup_by_runtime_type(&Fahrenheit(0)).is_none());
    assert_eq!(registry.len(), 1);
}

#[test]
fn same_type_twice_is_refused() {
    let mut registry = registry();
    let err = registry.register("Centigrade", Celsius::default, []).unwrap_err();
    assert!(err.to_string().contains("Celsius"));
}

#[test]
fn insert_prebuilt_descriptor() {
    let mut registry = TypeRegistry::new();
    registry
        .insert(MarshDescriptor::new("Fahrenheit", Fahrenheit::default, []))
        .unwrap();
    assert!(registry.contains("Fahrenheit"));
}
