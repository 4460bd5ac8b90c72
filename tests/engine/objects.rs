//! Registered types used across the engine tests.

use std::any::Any;

use tagmarsh_foundation::{AccessError, MarshObject, Value};
use tagmarsh_registry::{PropertyDescriptor, TypeRegistry};

/// A gauge whose reading is only reachable through accessors, and whose
/// setter refuses negative readings.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Gauge {
    reading: i64,
    pub label: String,
}

impl Gauge {
    pub fn new(reading: i64, label: &str) -> Self {
        Self {
            reading,
            label: label.to_string(),
        }
    }

    pub fn reading(&self) -> i64 {
        self.reading
    }
}

impl MarshObject for Gauge {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn read_field(&self, field: &str) -> Result<Value, AccessError> {
        match field {
            "label" => Ok(Value::from(self.label.as_str())),
            _ => Err(AccessError::UnknownMember(field.to_string())),
        }
    }

    fn write_field(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
        match (field, value.as_str()) {
            ("label", Some(label)) => {
                self.label = label.to_string();
                Ok(())
            }
            ("label", None) => Err(AccessError::expected(field, "string", &value)),
            _ => Err(AccessError::UnknownMember(field.to_string())),
        }
    }

    fn call_getter(&self, getter: &str) -> Result<Value, AccessError> {
        match getter {
            "getReading" => Ok(Value::Int(self.reading)),
            _ => Err(AccessError::UnknownMember(getter.to_string())),
        }
    }

    fn call_setter(&mut self, setter: &str, value: Value) -> Result<(), AccessError> {
        match (setter, value.as_int()) {
            ("setReading", Some(n)) if n >= 0 => {
                self.reading = n;
                Ok(())
            }
            ("setReading", Some(n)) => Err(AccessError::Rejected {
                member: setter.to_string(),
                reason: format!("negative reading {n}"),
            }),
            ("setReading", None) => Err(AccessError::expected(setter, "int", &value)),
            _ => Err(AccessError::UnknownMember(setter.to_string())),
        }
    }

    fn eq_object(&self, other: &dyn MarshObject) -> bool {
        other.as_any().downcast_ref::<Self>() == Some(self)
    }
}

/// A type whose descriptor names a getter it does not implement.
#[derive(Debug, Default, PartialEq)]
pub struct Sealed;

impl MarshObject for Sealed {
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
        other.as_any().is::<Self>()
    }
}

pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register(
            "Gauge",
            Gauge::default,
            [
                PropertyDescriptor::accessor("reading", "getReading", "setReading"),
                PropertyDescriptor::field("label"),
            ],
        )
        .unwrap();
    registry
        .register(
            "Sealed",
            || Sealed,
            [PropertyDescriptor::field("secret").with_getter("getSecret")],
        )
        .unwrap();
    registry
}
