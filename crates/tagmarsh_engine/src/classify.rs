//! Classification of values into the shapes flatten knows how to encode.

use tagmarsh_foundation::{
    Instance, Moment, Pair, Record, Throwable, TmCollection, TmMap, TmSet, TmVec, Value,
};
use tagmarsh_registry::{MarshDescriptor, MarshRegistry};

/// The shape of a value, borrowed from the value and the registry.
///
/// Variants are listed in dispatch priority: a registered type always wins
/// over any structural reading of the value.
#[derive(Debug)]
pub enum Shape<'v, 'r> {
    /// An object whose runtime type has a descriptor.
    Registered(&'v Instance, &'r MarshDescriptor),
    /// Unique members.
    Set(&'v TmSet<Value>),
    /// Two values.
    Pair(&'v Pair),
    /// Ordered members, tagged.
    List(&'v TmVec<Value>),
    /// Keys and values of any kind.
    Map(&'v TmMap<Value, Value>),
    /// Unordered members.
    Collection(&'v TmCollection<Value>),
    /// Any of the four throwable kinds.
    Throwable(&'v Throwable),
    /// Bare string-keyed record.
    Record(&'v Record),
    /// Bare ordered sequence.
    Array(&'v TmVec<Value>),
    /// Date/time instant.
    Moment(&'v Moment),
    /// Bool, finite number, or string.
    Primitive(&'v Value),
    /// Explicit null.
    Null,
    /// Explicit undefined.
    Undefined,
    /// Nothing flatten can encode: functions, unregistered objects, and
    /// non-finite floats.
    Unrecognized(&'v Value),
}

/// Classifies `value`, consulting `registry` before any structural match.
pub fn classify<'v, 'r, R>(value: &'v Value, registry: &'r R) -> Shape<'v, 'r>
where
    R: MarshRegistry + ?Sized,
{
    if let Value::Object(instance) = value {
        return registry
            .lookup_by_runtime_type(instance.object())
            .map_or(Shape::Unrecognized(value), |descriptor| {
                Shape::Registered(instance, descriptor)
            });
    }

    match value {
        Value::Set(members) => Shape::Set(members),
        Value::Pair(pair) => Shape::Pair(pair),
        Value::List(members) => Shape::List(members),
        Value::Map(map) => Shape::Map(map),
        Value::Collection(members) => Shape::Collection(members),
        Value::Throwable(throwable) => Shape::Throwable(throwable),
        Value::Record(record) => Shape::Record(record),
        Value::Array(items) => Shape::Array(items),
        Value::Moment(moment) => Shape::Moment(moment),
        Value::Float(n) if !n.is_finite() => Shape::Unrecognized(value),
        Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_) => {
            Shape::Primitive(value)
        }
        Value::Null => Shape::Null,
        Value::Undefined => Shape::Undefined,
        Value::Object(_) | Value::Fn(_) => Shape::Unrecognized(value),
    }
}

impl Shape<'_, '_> {
    /// Returns a short name for the shape, for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Registered(..) => "registered",
            Self::Set(_) => "set",
            Self::Pair(_) => "pair",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Collection(_) => "collection",
            Self::Throwable(_) => "throwable",
            Self::Record(_) => "record",
            Self::Array(_) => "array",
            Self::Moment(_) => "moment",
            Self::Primitive(_) => "primitive",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Unrecognized(_) => "unrecognized",
        }
    }
}
