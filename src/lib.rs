//! Tagmarsh - Tagged-envelope marshalling for rich value graphs
//!
//! This crate re-exports all layers of the tagmarsh system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: tagmarsh_engine     - Envelopes, classifier, flatten/hydrate, text codec
//! Layer 1: tagmarsh_registry   - Type descriptors, registry lookup contract
//! Layer 0: tagmarsh_foundation - Core types (Value, Throwable, Moment, Error)
//! ```

pub use tagmarsh_engine as engine;
pub use tagmarsh_foundation as foundation;
pub use tagmarsh_registry as registry;
