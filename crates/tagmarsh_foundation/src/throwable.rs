//! Error-like values with causal chains and stack text.

use std::fmt;

use crate::{TmMap, Value};

/// The four throwable kinds, distinguished on the wire by their tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThrowableKind {
    /// A plain host error; its type name is the error's name.
    Error,
    /// An expected, recoverable failure.
    Exception,
    /// A programming defect.
    Bug,
    /// A throwable that keys its causes in a map.
    Mapped,
}

impl ThrowableKind {
    /// Returns the envelope tag for this kind.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Exception => "Exception",
            Self::Bug => "Bug",
            Self::Mapped => "MappedThrowable",
        }
    }

    /// Resolves an envelope tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Error" => Some(Self::Error),
            "Exception" => Some(Self::Exception),
            "Bug" => Some(Self::Bug),
            "MappedThrowable" => Some(Self::Mapped),
            _ => None,
        }
    }
}

/// An error-like value: a typed message with payload, causes, and stack.
///
/// Causes are ordinary values, usually other throwables. The stack text is
/// opaque and copied verbatim. Only [`ThrowableKind::Mapped`] carries a
/// cause map.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Throwable {
    kind: ThrowableKind,
    type_name: String,
    data: Value,
    message: String,
    stack: String,
    causes: Vec<Value>,
    cause_map: Option<TmMap<Value, Value>>,
}

impl Throwable {
    /// Creates a throwable with no payload, causes, or stack.
    ///
    /// A [`ThrowableKind::Mapped`] throwable starts with an empty cause map.
    #[must_use]
    pub fn new(kind: ThrowableKind, type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            type_name: type_name.into(),
            data: Value::Undefined,
            message: message.into(),
            stack: String::new(),
            causes: Vec::new(),
            cause_map: (kind == ThrowableKind::Mapped).then(TmMap::new),
        }
    }

    /// Creates a plain error named `name`.
    #[must_use]
    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ThrowableKind::Error, name, message)
    }

    /// Creates an exception.
    #[must_use]
    pub fn exception(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ThrowableKind::Exception, type_name, message)
    }

    /// Creates a bug.
    #[must_use]
    pub fn bug(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ThrowableKind::Bug, type_name, message)
    }

    /// Creates a mapped throwable with the given cause map.
    #[must_use]
    pub fn mapped(type_name: impl Into<String>, cause_map: TmMap<Value, Value>) -> Self {
        Self {
            cause_map: Some(cause_map),
            ..Self::new(ThrowableKind::Mapped, type_name, "")
        }
    }

    /// Sets the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the payload.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = data.into();
        self
    }

    /// Sets the stack text.
    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = stack.into();
        self
    }

    /// Appends a cause.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<Value>) -> Self {
        self.causes.push(cause.into());
        self
    }

    /// Replaces the causes.
    #[must_use]
    pub fn with_causes(mut self, causes: impl IntoIterator<Item = Value>) -> Self {
        self.causes = causes.into_iter().collect();
        self
    }

    /// Returns the kind.
    #[must_use]
    pub const fn kind(&self) -> ThrowableKind {
        self.kind
    }

    /// Returns the type name (the error name for [`ThrowableKind::Error`]).
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the payload.
    #[must_use]
    pub const fn data(&self) -> &Value {
        &self.data
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the stack text.
    #[must_use]
    pub fn stack(&self) -> &str {
        &self.stack
    }

    /// Returns the causes in order.
    #[must_use]
    pub fn causes(&self) -> &[Value] {
        &self.causes
    }

    /// Returns the cause map of a mapped throwable.
    #[must_use]
    pub const fn cause_map(&self) -> Option<&TmMap<Value, Value>> {
        self.cause_map.as_ref()
    }
}

impl fmt::Display for Throwable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.type_name)
        } else {
            write!(f, "{}: {}", self.type_name, self.message)
        }
    }
}

impl std::error::Error for Throwable {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.causes.iter().find_map(|cause| match cause {
            Value::Throwable(t) => Some(&**t as &(dyn std::error::Error + 'static)),
            _ => None,
        })
    }
}
