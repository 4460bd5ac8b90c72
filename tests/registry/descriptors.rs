//! Integration tests for descriptors
//!
//! Tests property descriptors and descriptor construction.

use std::any::{Any, TypeId};

use tagmarsh_foundation::{AccessError, MarshObject, Value};
use tagmarsh_registry::{MarshDescriptor, PropertyDescriptor};

#[derive(Debug, Default, PartialEq)]
struct Label {
    text: String,
}

impl MarshObject for Label {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn read_field(&self, field: &str) -> Result<Value, AccessError> {
        match field {
            "text" => Ok(Value::from(self.text.as_str())),
            _ => Err(AccessError::UnknownMember(field.to_string())),
        }
    }

    fn write_field(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
        match (field, value.as_str()) {
            ("text", Some(text)) => {
                self.text = text.to_string();
                Ok(())
            }
            ("text", None) => Err(AccessError::expected(field, "string", &value)),
            _ => Err(AccessError::UnknownMember(field.to_string())),
        }
    }

    fn eq_object(&self, other: &dyn MarshObject) -> bool {
        other.as_any().downcast_ref::<Self>() == Some(self)
    }
}

#[test]
fn descriptor_records_runtime_type() {
    let descriptor = MarshDescriptor::new("Label", Label::default, [PropertyDescriptor::field("text")]);
    assert_eq!(descriptor.type_name(), "Label");
    assert_eq!(descriptor.runtime_type(), TypeId::of::<Label>());
    assert_eq!(descriptor.properties().len(), 1);
}

#[test]
fn construct_builds_bare_instance() {
    let descriptor = MarshDescriptor::new("Label", Label::default, [PropertyDescriptor::field("text")]);
    let mut object = descriptor.construct();
    object.write_field("text", Value::from("hello")).unwrap();
    assert_eq!(object.read_field("text").unwrap(), Value::from("hello"));
    assert!(object.as_any().is::<Label>());
}

#[test]
fn property_order_is_kept() {
    let descriptor = MarshDescriptor::new(
        "Label",
        Label::default,
        [
            PropertyDescriptor::field("b"),
            PropertyDescriptor::field("a"),
            PropertyDescriptor::accessor("c", "getC", "setC"),
        ],
    );
    let names: Vec<_> = descriptor.properties().iter().map(PropertyDescriptor::name).collect();
    assert_eq!(names, vec!["b", "a", "c"]);
}

#[test]
fn debug_shows_type_name() {
    let descriptor = MarshDescriptor::new("Label", Label::default, []);
    assert!(format!("{descriptor:?}").contains("Label"));
}

#[test]
fn write_field_rejects_wrong_kind() {
    let mut label = Label::default();
    let err = label.write_field("text", Value::Int(3)).unwrap_err();
    assert_eq!(
        err,
        AccessError::Rejected {
            member: "text".to_string(),
            reason: "expected string, got int".to_string(),
        }
    );
}
