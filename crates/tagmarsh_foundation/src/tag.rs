//! Kind names carried in the `type` field of tagged envelopes.

use std::fmt;

use crate::ThrowableKind;

/// The kind named by a tagged envelope.
///
/// Built-in names always win over registered ones, so a registry must not
/// accept a type name for which [`Tag::is_reserved`] is true.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag<'a> {
    /// `date`: a moment carried as display text.
    Date,
    /// `null`.
    Null,
    /// `undefined`.
    Undefined,
    /// `Error`, `Exception`, `Bug` or `MappedThrowable`.
    Throwable(ThrowableKind),
    /// `Collection`: unordered members.
    Collection,
    /// `List`: ordered members.
    List,
    /// `Set`: unique members.
    Set,
    /// `Map`: parallel `keys` and `values` arrays.
    Map,
    /// `Pair`: a two-field `{a, b}` payload.
    Pair,
    /// Any other name, resolved through a registry.
    Registered(&'a str),
}

impl<'a> Tag<'a> {
    /// Every built-in kind name.
    pub const RESERVED: &'static [&'static str] = &[
        "date",
        "null",
        "undefined",
        "Error",
        "Exception",
        "Bug",
        "MappedThrowable",
        "Collection",
        "List",
        "Set",
        "Map",
        "Pair",
    ];

    /// Resolves a kind name. Unknown names become [`Tag::Registered`].
    #[must_use]
    pub fn parse(name: &'a str) -> Self {
        match name {
            "date" => Self::Date,
            "null" => Self::Null,
            "undefined" => Self::Undefined,
            "Collection" => Self::Collection,
            "List" => Self::List,
            "Set" => Self::Set,
            "Map" => Self::Map,
            "Pair" => Self::Pair,
            other => ThrowableKind::from_tag(other).map_or(Self::Registered(other), Self::Throwable),
        }
    }

    /// Returns the kind name written on the wire.
    #[must_use]
    pub fn name(&self) -> &'a str {
        match self {
            Self::Date => "date",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Throwable(kind) => kind.tag(),
            Self::Collection => "Collection",
            Self::List => "List",
            Self::Set => "Set",
            Self::Map => "Map",
            Self::Pair => "Pair",
            Self::Registered(name) => *name,
        }
    }

    /// Returns true if `name` is a built-in kind.
    #[must_use]
    pub fn is_reserved(name: &str) -> bool {
        Self::RESERVED.iter().any(|reserved| *reserved == name)
    }
}

impl fmt::Display for Tag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
