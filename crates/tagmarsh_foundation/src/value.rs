//! Core value type for all marshallable data.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::collections::{TmCollection, TmMap, TmRecord, TmSet, TmVec};
use crate::moment::Moment;
use crate::object::Instance;
use crate::throwable::Throwable;

/// String-keyed record of values.
pub type Record = TmRecord<Value>;

/// Core value type for the graphs that get marshalled.
///
/// Values are immutable and cheaply cloneable (O(1) for most variants).
/// Large composite values use structural sharing via persistent data
/// structures, so a value graph cannot refer back to itself.
#[derive(Clone)]
pub enum Value {
    /// Explicit null.
    Null,
    /// Explicit "no value", distinct from null.
    Undefined,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(Arc<str>),
    /// Date/time instant.
    Moment(Moment),
    /// Plain ordered sequence (encodes as a bare array).
    Array(TmVec<Value>),
    /// Plain string-keyed record (encodes as a bare record).
    Record(Record),
    /// Unordered collection allowing duplicates.
    Collection(TmCollection<Value>),
    /// Ordered list (encodes tagged, unlike [`Value::Array`]).
    List(TmVec<Value>),
    /// Map whose keys may be any value, in insertion order.
    Map(TmMap<Value, Value>),
    /// Two values.
    Pair(Pair),
    /// Set of unique values, in insertion order.
    Set(TmSet<Value>),
    /// Error-like value with causes.
    Throwable(Arc<Throwable>),
    /// Instance of a registered custom type.
    Object(Instance),
    /// Function reference. Never marshallable.
    Fn(NativeFn),
}

/// An ordered pair of values.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Pair(Arc<(Value, Value)>);

impl Pair {
    /// Creates a pair.
    #[must_use]
    pub fn new(a: impl Into<Value>, b: impl Into<Value>) -> Self {
        Self(Arc::new((a.into(), b.into())))
    }

    /// Returns the first value.
    #[must_use]
    pub fn a(&self) -> &Value {
        &self.0.0
    }

    /// Returns the second value.
    #[must_use]
    pub fn b(&self) -> &Value {
        &self.0.1
    }
}

impl fmt::Debug for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pair({:?}, {:?})", self.a(), self.b())
    }
}

/// Native function value.
///
/// Present so that host graphs holding callbacks can be represented; the
/// marshaller rejects them.
#[derive(Clone)]
pub struct NativeFn {
    /// Function name for debugging.
    pub name: &'static str,
    /// Function pointer.
    pub func: fn(&[Value]) -> crate::Result<Value>,
}

impl PartialEq for NativeFn {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::fn_addr_eq(self.func, other.func)
    }
}

impl Eq for NativeFn {}

impl Hash for NativeFn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.func as usize).hash(state);
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

impl Value {
    /// Returns a short name for the value's kind, for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Moment(_) => "moment",
            Self::Array(_) => "array",
            Self::Record(_) => "record",
            Self::Collection(_) => "collection",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Pair(_) => "pair",
            Self::Set(_) => "set",
            Self::Throwable(_) => "throwable",
            Self::Object(_) => "object",
            Self::Fn(_) => "function",
        }
    }

    /// Returns true if this value is null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true if this value is undefined.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns true for bool, number, and string values.
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Bool(_) | Self::Int(_) | Self::Float(_) | Self::String(_)
        )
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a float value.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a moment.
    #[must_use]
    pub const fn as_moment(&self) -> Option<&Moment> {
        match self {
            Self::Moment(m) => Some(m),
            _ => None,
        }
    }

    /// Attempts to extract a bare array.
    #[must_use]
    pub const fn as_array(&self) -> Option<&TmVec<Value>> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Attempts to extract a record.
    #[must_use]
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Attempts to extract a collection.
    #[must_use]
    pub const fn as_collection(&self) -> Option<&TmCollection<Value>> {
        match self {
            Self::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// Attempts to extract a list.
    #[must_use]
    pub const fn as_list(&self) -> Option<&TmVec<Value>> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// Attempts to extract a map.
    #[must_use]
    pub const fn as_map(&self) -> Option<&TmMap<Value, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Attempts to extract a pair.
    #[must_use]
    pub const fn as_pair(&self) -> Option<&Pair> {
        match self {
            Self::Pair(p) => Some(p),
            _ => None,
        }
    }

    /// Attempts to extract a set.
    #[must_use]
    pub const fn as_set(&self) -> Option<&TmSet<Value>> {
        match self {
            Self::Set(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a throwable.
    #[must_use]
    pub fn as_throwable(&self) -> Option<&Throwable> {
        match self {
            Self::Throwable(t) => Some(t),
            _ => None,
        }
    }

    /// Attempts to extract a registered object.
    #[must_use]
    pub const fn as_object(&self) -> Option<&Instance> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }
}

// Implement PartialEq manually to handle float comparison
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) | (Self::Undefined, Self::Undefined) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Moment(a), Self::Moment(b)) => a == b,
            (Self::Array(a), Self::Array(b)) | (Self::List(a), Self::List(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Collection(a), Self::Collection(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Pair(a), Self::Pair(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => a == b,
            (Self::Throwable(a), Self::Throwable(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Fn(a), Self::Fn(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null | Self::Undefined => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(n) => n.hash(state),
            Self::Float(n) => n.to_bits().hash(state),
            Self::String(s) => s.hash(state),
            Self::Moment(m) => m.hash(state),
            Self::Array(v) | Self::List(v) => v.hash(state),
            Self::Record(r) => r.hash(state),
            Self::Collection(c) => c.hash(state),
            Self::Map(m) => m.hash(state),
            Self::Pair(p) => p.hash(state),
            Self::Set(s) => s.hash(state),
            Self::Throwable(t) => t.hash(state),
            Self::Object(o) => o.hash(state),
            Self::Fn(f) => f.hash(state),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Undefined => write!(f, "undefined"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Moment(m) => write!(f, "{m:?}"),
            Self::Array(v) => write!(f, "{v:?}"),
            Self::Record(r) => write!(f, "{r:?}"),
            Self::Collection(c) => write!(f, "Collection{c:?}"),
            Self::List(l) => write!(f, "List{l:?}"),
            Self::Map(m) => write!(f, "Map{m:?}"),
            Self::Pair(p) => write!(f, "{p:?}"),
            Self::Set(s) => write!(f, "Set{s:?}"),
            Self::Throwable(t) => write!(f, "{t:?}"),
            Self::Object(o) => write!(f, "{o:?}"),
            Self::Fn(func) => write!(f, "{func:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Moment(m) => write!(f, "{m}"),
            Self::Throwable(t) => write!(f, "{t}"),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

// Convenience From implementations

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Self::String(s)
    }
}

impl From<Moment> for Value {
    fn from(m: Moment) -> Self {
        Self::Moment(m)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Self::Record(r)
    }
}

impl From<Pair> for Value {
    fn from(p: Pair) -> Self {
        Self::Pair(p)
    }
}

impl From<TmMap<Value, Value>> for Value {
    fn from(m: TmMap<Value, Value>) -> Self {
        Self::Map(m)
    }
}

impl From<TmSet<Value>> for Value {
    fn from(s: TmSet<Value>) -> Self {
        Self::Set(s)
    }
}

impl From<TmCollection<Value>> for Value {
    fn from(c: TmCollection<Value>) -> Self {
        Self::Collection(c)
    }
}

impl From<Throwable> for Value {
    fn from(t: Throwable) -> Self {
        Self::Throwable(Arc::new(t))
    }
}

impl From<Instance> for Value {
    fn from(o: Instance) -> Self {
        Self::Object(o)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
