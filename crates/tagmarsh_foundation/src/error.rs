//! Error types for marshalling and unmarshalling.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Every failure is fatal for the value or message being processed; the
//! engine never returns partial results.

use std::fmt;

use thiserror::Error;

/// The main error type for tagmarsh operations.
#[derive(Debug, Error)]
#[error("{kind}{}", .context.as_ref().map(|c| format!(" ({c})")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an unsupported value error.
    #[must_use]
    pub fn unsupported_value(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedValue(reason.into()))
    }

    /// Creates an unregistered type error.
    #[must_use]
    pub fn unregistered_type(type_name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnregisteredType(type_name.into()))
    }

    /// Creates a malformed envelope error.
    #[must_use]
    pub fn malformed_envelope(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedEnvelope(reason.into()))
    }

    /// Creates a stack depth exceeded error.
    #[must_use]
    pub fn stack_depth_exceeded(limit: usize) -> Self {
        Self::new(ErrorKind::StackDepthExceeded { limit })
    }

    /// Creates a duplicate registration error.
    #[must_use]
    pub fn duplicate_registration(type_name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateRegistration(type_name.into()))
    }

    /// Creates an accessor failure error.
    #[must_use]
    pub fn accessor_failed(
        type_name: impl Into<String>,
        accessor: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::AccessorFailed {
            type_name: type_name.into(),
            accessor: accessor.into(),
            reason: reason.into(),
        })
    }

    /// Creates a text codec error.
    #[must_use]
    pub fn codec(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Codec(reason.into()))
    }

    /// Creates an invalid moment error.
    #[must_use]
    pub fn invalid_moment(text: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidMoment(text.into()))
    }

    /// Returns true if this is an unregistered type error for `type_name`.
    #[must_use]
    pub fn is_unregistered(&self, type_name: &str) -> bool {
        matches!(&self.kind, ErrorKind::UnregisteredType(name) if name == type_name)
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Flatten saw a value of no recognized kind (e.g. a function).
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    /// Hydrate saw a tag name absent from the registry.
    #[error("unregistered type: {0}")]
    UnregisteredType(String),

    /// Hydrate saw an envelope shape it cannot decode.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The value graph is nested deeper than the configured bound.
    #[error("stack depth exceeded (limit {limit})")]
    StackDepthExceeded {
        /// The configured depth limit.
        limit: usize,
    },

    /// A type name or runtime type was registered twice.
    #[error("duplicate registration: {0}")]
    DuplicateRegistration(String),

    /// A registered object refused a getter, setter, or field access.
    #[error("accessor `{accessor}` failed on {type_name}: {reason}")]
    AccessorFailed {
        /// The registered type name.
        type_name: String,
        /// The getter, setter, or field name.
        accessor: String,
        /// Why the object refused the access.
        reason: String,
    },

    /// The text codec could not encode or decode.
    #[error("codec error: {0}")]
    Codec(String),

    /// A date envelope carried text that is not a recognized instant.
    #[error("invalid moment: {0:?}")]
    InvalidMoment(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Which direction of the engine was running when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Native value to envelope.
    Flatten,
    /// Envelope to native value.
    Hydrate,
    /// Envelope to or from text.
    Codec,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flatten => write!(f, "flatten"),
            Self::Hydrate => write!(f, "hydrate"),
            Self::Codec => write!(f, "codec"),
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The engine direction that failed.
    pub phase: Option<Phase>,
    /// Envelope path of the failing node, e.g. `$.value.causes[0]`.
    pub path: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the phase.
    #[must_use]
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Sets the envelope path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.phase, &self.path) {
            (Some(phase), Some(path)) => write!(f, "during {phase} at {path}"),
            (Some(phase), None) => write!(f, "during {phase}"),
            (None, Some(path)) => write!(f, "at {path}"),
            (None, None) => Ok(()),
        }
    }
}
