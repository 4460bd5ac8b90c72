//! The flat, transport-safe form of a value graph.
//!
//! An envelope holds nothing but primitives, arrays and string-keyed
//! records, so any text codec can carry it. Kinds that a bare encoding
//! would lose are written as *tagged* records:
//!
//! ```text
//! {"marker": true, "type": "<kind>", "value": <payload>}
//! {"marker": true, "type": "Map", "keys": [...], "values": [...]}
//! {"marker": true, "type": "null"}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field that distinguishes a tagged envelope from a bare record.
pub const MARKER_FIELD: &str = "marker";
/// Field holding a tagged envelope's kind name.
pub const TYPE_FIELD: &str = "type";
/// Field holding a tagged envelope's payload.
pub const VALUE_FIELD: &str = "value";
/// Field holding a map envelope's keys.
pub const KEYS_FIELD: &str = "keys";
/// Field holding a map envelope's values.
pub const VALUES_FIELD: &str = "values";

/// A node of the flat envelope tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    /// JSON null. Never produced by flatten; `null` is always tagged.
    Null,
    /// Boolean primitive.
    Bool(bool),
    /// Integer primitive.
    Int(i64),
    /// Floating-point primitive (always finite).
    Float(f64),
    /// String primitive.
    String(String),
    /// Array of envelopes.
    Array(Vec<Envelope>),
    /// Record of envelopes, tagged or bare.
    Record(BTreeMap<String, Envelope>),
}

impl Envelope {
    /// Builds a tagged record from `type` and the kind-specific fields.
    #[must_use]
    pub fn tagged<I>(tag: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Envelope)>,
    {
        let mut record: BTreeMap<String, Envelope> = fields
            .into_iter()
            .map(|(name, envelope)| (name.to_string(), envelope))
            .collect();
        record.insert(MARKER_FIELD.to_string(), Self::Bool(true));
        record.insert(TYPE_FIELD.to_string(), Self::String(tag.to_string()));
        Self::Record(record)
    }

    /// Builds a tagged record with a single `value` payload.
    #[must_use]
    pub fn tagged_value(tag: &str, value: Envelope) -> Self {
        Self::tagged(tag, [(VALUE_FIELD, value)])
    }

    /// Returns true if this is a record whose marker field is `true`.
    #[must_use]
    pub fn is_tagged(&self) -> bool {
        self.field(MARKER_FIELD) == Some(&Self::Bool(true))
    }

    /// Returns a record field, or `None` for non-records.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Envelope> {
        match self {
            Self::Record(record) => record.get(name),
            _ => None,
        }
    }

    /// Returns the string, if this is a string envelope.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements, if this is an array envelope.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Envelope]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the fields, if this is a record envelope.
    #[must_use]
    pub const fn as_record(&self) -> Option<&BTreeMap<String, Envelope>> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Returns a short name for the envelope's shape, for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Record(_) => "record",
        }
    }

    /// Returns the number of nested arrays and records on the deepest path.
    ///
    /// Scalars have depth 0. Computed without recursion.
    #[must_use]
    pub fn nesting_depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0usize)];
        while let Some((envelope, depth)) = pending.pop() {
            let children: Box<dyn Iterator<Item = &Envelope>> = match envelope {
                Self::Array(items) => Box::new(items.iter()),
                Self::Record(record) => Box::new(record.values()),
                _ => {
                    deepest = deepest.max(depth);
                    continue;
                }
            };
            deepest = deepest.max(depth + 1);
            pending.extend(children.map(|child| (child, depth + 1)));
        }
        deepest
    }
}

impl From<&str> for Envelope {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Envelope {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Envelope>> for Envelope {
    fn from(items: Vec<Envelope>) -> Self {
        Self::Array(items)
    }
}
