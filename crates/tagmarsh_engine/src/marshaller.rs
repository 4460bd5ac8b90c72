//! The marshaller: flatten, hydrate, and their text-level wrappers.

use tagmarsh_foundation::{Result, Value};
use tagmarsh_registry::MarshRegistry;
use tracing::{debug, warn};

use crate::codec::{JsonCodec, TextCodec};
use crate::config::MarshalConfig;
use crate::envelope::Envelope;
use crate::flatten::Flattener;
use crate::hydrate::Hydrator;

/// Converts value graphs to text and back.
///
/// The registry is injected rather than global, so independent marshallers
/// can carry independent sets of registered types. A marshaller holds no
/// per-call state and is `Send + Sync` whenever its registry and codec are.
#[derive(Debug, Clone)]
pub struct Marshaller<R, C = JsonCodec> {
    registry: R,
    codec: C,
    config: MarshalConfig,
}

impl<R: MarshRegistry> Marshaller<R> {
    /// Creates a marshaller with the JSON codec and default configuration.
    #[must_use]
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            codec: JsonCodec::new(),
            config: MarshalConfig::default(),
        }
    }
}

impl<R: MarshRegistry, C: TextCodec> Marshaller<R, C> {
    /// Replaces the text codec.
    #[must_use]
    pub fn with_codec<C2: TextCodec>(self, codec: C2) -> Marshaller<R, C2> {
        Marshaller {
            registry: self.registry,
            codec,
            config: self.config,
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: MarshalConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Returns the text codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MarshalConfig {
        &self.config
    }

    /// Converts a value graph into an envelope tree.
    ///
    /// # Errors
    ///
    /// - `UnsupportedValue` for functions, unregistered objects, non-finite
    ///   floats, and records whose `marker` field is `true`
    /// - `AccessorFailed` if a registered object refuses a property read
    /// - `StackDepthExceeded` if the graph is nested beyond the configured bound
    pub fn flatten(&self, value: &Value) -> Result<Envelope> {
        Flattener::new(&self.registry, &self.config).run(value)
    }

    /// Reconstructs a value graph from an envelope tree.
    ///
    /// # Errors
    ///
    /// - `UnregisteredType` for a tag the registry does not know
    /// - `MalformedEnvelope` for shapes no decode routine accepts
    /// - `InvalidMoment` for unparseable date text
    /// - `AccessorFailed` if a registered object refuses a property write
    /// - `StackDepthExceeded` if the tree is nested beyond the configured bound
    pub fn hydrate(&self, envelope: &Envelope) -> Result<Value> {
        Hydrator::new(&self.registry, &self.config).run(envelope)
    }

    /// Flattens a value and encodes it as text. Never mutates the value.
    ///
    /// # Errors
    ///
    /// Returns any [`flatten`](Self::flatten) error, or a `Codec` error.
    pub fn marshal(&self, value: &Value) -> Result<String> {
        debug!(kind = value.kind_name(), "marshalling value");
        let text = self
            .flatten(value)
            .and_then(|envelope| self.codec.encode(&envelope))
            .inspect_err(|e| warn!(error = %e, "marshal failed"))?;
        debug!(bytes = text.len(), "marshalled value");
        Ok(text)
    }

    /// Decodes text and hydrates the resulting envelope.
    ///
    /// # Errors
    ///
    /// Returns a `Codec` error, or any [`hydrate`](Self::hydrate) error.
    pub fn unmarshal(&self, text: &str) -> Result<Value> {
        debug!(bytes = text.len(), "unmarshalling text");
        let value = self
            .codec
            .decode(text)
            .and_then(|envelope| self.hydrate(&envelope))
            .inspect_err(|e| warn!(error = %e, "unmarshal failed"))?;
        debug!(kind = value.kind_name(), "unmarshalled value");
        Ok(value)
    }
}
