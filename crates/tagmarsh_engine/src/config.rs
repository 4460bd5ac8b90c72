//! Configuration for the marshalling engine.

use serde::{Deserialize, Serialize};
use tagmarsh_foundation::{Error, MomentFormat, Result};

use crate::codec::MAX_NESTING;

/// Default bound on value nesting.
///
/// One value level costs at most three envelope levels (a throwable's
/// `value` record and `causes` array) and a childless container at the
/// bound costs two, so any graph within this bound encodes within
/// [`MAX_NESTING`].
pub const DEFAULT_MAX_DEPTH: usize = (MAX_NESTING - 2) / 3;

/// Configuration for a [`Marshaller`](crate::Marshaller).
///
/// Can be built in code or loaded from JSON; missing fields take their
/// defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarshalConfig {
    /// Deepest value nesting flatten and hydrate will walk.
    pub max_depth: usize,

    /// Textual form written into date envelopes.
    pub moment_format: MomentFormat,

    /// Accept date envelopes in any supported form, not only `moment_format`.
    pub lenient_moments: bool,
}

impl Default for MarshalConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            moment_format: MomentFormat::Display,
            lenient_moments: true,
        }
    }
}

impl MarshalConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that only accepts dates in `moment_format`.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            lenient_moments: false,
            ..Self::default()
        }
    }

    /// Loads a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns a `Codec` error if the text is not a valid configuration.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| Error::codec(format!("invalid marshal config: {e}")))
    }

    /// Builder method to set the depth bound.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builder method to set the date format.
    #[must_use]
    pub fn with_moment_format(mut self, moment_format: MomentFormat) -> Self {
        self.moment_format = moment_format;
        self
    }

    /// Builder method to set date leniency.
    #[must_use]
    pub fn with_lenient_moments(mut self, lenient: bool) -> Self {
        self.lenient_moments = lenient;
        self
    }
}
