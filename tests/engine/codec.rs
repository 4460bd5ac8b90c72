//! Integration tests for the text codec
//!
//! Tests JsonCodec through the marshaller and custom codecs.

use std::cell::Cell;

use tagmarsh_engine::{Envelope, JsonCodec, MAX_NESTING, MarshalConfig, Marshaller, TextCodec};
use tagmarsh_foundation::{Error, ErrorKind, Result, TmVec, Value};
use tagmarsh_registry::TypeRegistry;

/// Wraps JSON text in a fixed prefix, to show codecs are pluggable.
struct PrefixedJson {
    encoded: Cell<usize>,
}

impl TextCodec for PrefixedJson {
    fn encode(&self, envelope: &Envelope) -> Result<String> {
        self.encoded.set(self.encoded.get() + 1);
        Ok(format!("TM1:{}", JsonCodec::new().encode(envelope)?))
    }

    fn decode(&self, text: &str) -> Result<Envelope> {
        let body = text
            .strip_prefix("TM1:")
            .ok_or_else(|| Error::codec("missing TM1 prefix"))?;
        JsonCodec::new().decode(body)
    }
}

#[test]
fn custom_codec_round_trip() {
    let marshaller = Marshaller::new(TypeRegistry::new()).with_codec(PrefixedJson {
        encoded: Cell::new(0),
    });
    let value = Value::List([1, 2, 3].into_iter().map(Value::Int).collect());

    let text = marshaller.marshal(&value).unwrap();
    assert!(text.starts_with("TM1:{"));
    assert_eq!(marshaller.unmarshal(&text).unwrap(), value);
    assert_eq!(marshaller.codec().encoded.get(), 1);

    let err = marshaller.unmarshal("[1,2,3]").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Codec(_)));
}

#[test]
fn too_deep_for_json_is_a_codec_error() {
    let mut value = Value::Int(0);
    for _ in 0..=MAX_NESTING {
        value = Value::Array(TmVec::new().push_back(value));
    }
    let marshaller = Marshaller::new(TypeRegistry::new())
        .with_config(MarshalConfig::new().with_max_depth(1_000));

    assert!(marshaller.flatten(&value).is_ok());
    let err = marshaller.marshal(&value).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Codec(_)));
}

#[test]
fn non_envelope_json_still_decodes() {
    // Any JSON is an envelope; shape errors surface in hydrate.
    let err = Marshaller::new(TypeRegistry::new()).unmarshal("null").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedEnvelope(_)));
}

#[test]
fn integers_and_floats_survive_text() {
    let marshaller = Marshaller::new(TypeRegistry::new());
    let value = Value::from(vec![Value::Int(1), Value::Float(1.0), Value::Int(i64::MIN)]);
    let text = marshaller.marshal(&value).unwrap();
    assert_eq!(text, "[1,1.0,-9223372036854775808]");
    assert_eq!(marshaller.unmarshal(&text).unwrap(), value);
}
