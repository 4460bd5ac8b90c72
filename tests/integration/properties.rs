//! Property-based round-trip tests
//!
//! Generates value graphs from every supported kind and checks that they
//! survive flatten/hydrate and the full text path unchanged.

use proptest::prelude::*;

use tagmarsh_engine::Marshaller;
use tagmarsh_foundation::{Instance, Moment, Pair, Throwable, ThrowableKind, TmMap, Value};

use crate::fixtures::{Point, point_registry};

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(Value::Undefined),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1_000_000i64..1_000_000).prop_map(|n| Value::Float(n as f64 / 4.0)),
        "[ -~]{0,12}".prop_map(Value::from),
        (0i64..4_000_000_000)
            .prop_map(|secs| Value::Moment(Moment::from_timestamp_millis(secs * 1000).unwrap())),
        (any::<i32>(), any::<i32>())
            .prop_map(|(x, y)| Value::Object(Instance::new(Point::new(x.into(), y.into())))),
    ]
}

fn throwable(inner: BoxedStrategy<Value>) -> impl Strategy<Value = Value> {
    (
        prop_oneof![
            Just(ThrowableKind::Error),
            Just(ThrowableKind::Exception),
            Just(ThrowableKind::Bug),
            Just(ThrowableKind::Mapped),
        ],
        "[A-Z][a-zA-Z]{0,8}",
        "[ -~]{0,16}",
        "[ -~\n]{0,24}",
        inner.clone(),
        prop::collection::vec(inner.clone(), 0..3),
        prop::collection::vec((inner.clone(), inner), 0..3),
    )
        .prop_map(|(kind, type_name, message, stack, data, causes, map)| {
            let base = if kind == ThrowableKind::Mapped {
                Throwable::mapped(type_name, map.into_iter().collect())
            } else {
                Throwable::new(kind, type_name, "")
            };
            Value::from(
                base.with_message(message)
                    .with_stack(stack)
                    .with_data(data)
                    .with_causes(causes),
            )
        })
}

fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::from),
            prop::collection::vec(inner.clone(), 0..6)
                .prop_map(|v| Value::List(v.into_iter().collect())),
            prop::collection::vec(inner.clone(), 0..6)
                .prop_map(|v| Value::Set(v.into_iter().collect())),
            prop::collection::vec(inner.clone(), 0..6)
                .prop_map(|v| Value::Collection(v.into_iter().collect())),
            prop::collection::vec((inner.clone(), inner.clone()), 0..4)
                .prop_map(|entries| Value::Map(entries.into_iter().collect())),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Value::Pair(Pair::new(a, b))),
            prop::collection::vec(("f_[a-z]{0,6}", inner.clone()), 0..5)
                .prop_map(|fields| Value::Record(fields.into_iter().collect())),
            throwable(inner),
        ]
    })
}

/// Equality that also requires maps, sets, and records to iterate in the
/// same order.
fn same_in_order(a: &Value, b: &Value) -> bool {
    fn all_in_order<'v>(
        a: impl ExactSizeIterator<Item = &'v Value>,
        b: impl ExactSizeIterator<Item = &'v Value>,
    ) -> bool {
        a.len() == b.len() && a.zip(b).all(|(x, y)| same_in_order(x, y))
    }

    if a != b {
        return false;
    }
    match (a, b) {
        (Value::Map(x), Value::Map(y)) => {
            let xs: Vec<_> = x.iter().flat_map(|(k, v)| [k, v]).collect();
            let ys: Vec<_> = y.iter().flat_map(|(k, v)| [k, v]).collect();
            all_in_order(xs.into_iter(), ys.into_iter())
        }
        (Value::Set(x), Value::Set(y)) => {
            all_in_order(x.iter().collect::<Vec<_>>().into_iter(), y.iter().collect::<Vec<_>>().into_iter())
        }
        (Value::List(x), Value::List(y)) | (Value::Array(x), Value::Array(y)) => {
            all_in_order(x.iter().collect::<Vec<_>>().into_iter(), y.iter().collect::<Vec<_>>().into_iter())
        }
        (Value::Record(x), Value::Record(y)) => all_in_order(
            x.iter().map(|(_, v)| v).collect::<Vec<_>>().into_iter(),
            y.iter().map(|(_, v)| v).collect::<Vec<_>>().into_iter(),
        ),
        (Value::Pair(x), Value::Pair(y)) => {
            same_in_order(x.a(), y.a()) && same_in_order(x.b(), y.b())
        }
        (Value::Throwable(x), Value::Throwable(y)) => {
            same_in_order(x.data(), y.data())
                && all_in_order(x.causes().iter(), y.causes().iter())
                && match (x.cause_map(), y.cause_map()) {
                    (Some(xm), Some(ym)) => {
                        same_in_order(&Value::Map(xm.clone()), &Value::Map(ym.clone()))
                    }
                    (None, None) => true,
                    _ => false,
                }
        }
        _ => true,
    }
}

#[test]
fn same_in_order_detects_reordered_maps() {
    let forward: TmMap<Value, Value> =
        [(Value::Int(1), Value::Null), (Value::Int(2), Value::Null)].into_iter().collect();
    let backward: TmMap<Value, Value> =
        [(Value::Int(2), Value::Null), (Value::Int(1), Value::Null)].into_iter().collect();
    let (forward, backward) = (Value::Map(forward), Value::Map(backward));

    assert_eq!(forward, backward);
    assert!(same_in_order(&forward, &forward.clone()));
    assert!(!same_in_order(&forward, &backward));
}

proptest! {
    #[test]
    fn flatten_then_hydrate_is_identity(v in value()) {
        let m = Marshaller::new(point_registry());
        let envelope = m.flatten(&v).unwrap();
        let back = m.hydrate(&envelope).unwrap();
        prop_assert!(same_in_order(&back, &v), "{:?} != {:?}", back, v);
    }

    #[test]
    fn marshal_then_unmarshal_is_identity(v in value()) {
        let m = Marshaller::new(point_registry());
        let text = m.marshal(&v).unwrap();
        let back = m.unmarshal(&text).unwrap();
        prop_assert!(same_in_order(&back, &v), "{:?} != {:?}", back, v);
    }

    #[test]
    fn marshal_is_deterministic(v in value()) {
        let m = Marshaller::new(point_registry());
        prop_assert_eq!(m.marshal(&v).unwrap(), m.marshal(&v).unwrap());
    }

    #[test]
    fn primitives_flatten_untagged(n in any::<i64>(), s in "\\PC{0,16}", b in any::<bool>()) {
        let m = Marshaller::new(point_registry());
        for v in [Value::Int(n), Value::from(s.as_str()), Value::Bool(b)] {
            prop_assert!(!m.flatten(&v).unwrap().is_tagged());
        }
    }
}
