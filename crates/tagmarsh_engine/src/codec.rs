//! Text codecs for envelope trees.

use tagmarsh_foundation::{Error, ErrorContext, Phase, Result};

use crate::envelope::Envelope;

/// Deepest container nesting [`JsonCodec`] will encode.
///
/// `serde_json` refuses to parse more than 127 nested arrays and objects,
/// so anything deeper could be written but never read back.
pub const MAX_NESTING: usize = 127;

// =============================================================================
// Text Codec Trait
// =============================================================================

/// Reversible conversion between an envelope tree and text.
pub trait TextCodec {
    /// Encodes an envelope as text.
    ///
    /// # Errors
    ///
    /// Returns a `Codec` error if the envelope cannot be represented.
    fn encode(&self, envelope: &Envelope) -> Result<String>;

    /// Decodes text into an envelope.
    ///
    /// # Errors
    ///
    /// Returns a `Codec` error if the text is not a valid envelope.
    fn decode(&self, text: &str) -> Result<Envelope>;
}

// =============================================================================
// JSON Codec
// =============================================================================

/// Encodes envelopes as JSON.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec {
    /// Whether to pretty-print.
    pub pretty: bool,
}

impl JsonCodec {
    /// Creates a compact JSON codec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pretty-printing JSON codec.
    #[must_use]
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl TextCodec for JsonCodec {
    fn encode(&self, envelope: &Envelope) -> Result<String> {
        let depth = envelope.nesting_depth();
        if depth > MAX_NESTING {
            return Err(codec_error(format!(
                "envelope nests {depth} levels deep; JSON allows {MAX_NESTING}"
            )));
        }
        let encoded = if self.pretty {
            serde_json::to_string_pretty(envelope)
        } else {
            serde_json::to_string(envelope)
        };
        encoded.map_err(|e| codec_error(format!("failed to encode envelope: {e}")))
    }

    fn decode(&self, text: &str) -> Result<Envelope> {
        serde_json::from_str(text).map_err(|e| codec_error(format!("failed to decode envelope: {e}")))
    }
}

fn codec_error(reason: String) -> Error {
    Error::codec(reason).with_context(ErrorContext::new().with_phase(Phase::Codec))
}
