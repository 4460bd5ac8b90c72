//! Flatten/hydrate engine for tagmarsh.
//!
//! This crate provides:
//! - [`Envelope`] - The flat, text-safe form of a value graph
//! - [`Marshaller`] - Flatten, hydrate, marshal and unmarshal
//! - [`Shape`] - The closed classification that drives flattening
//! - [`TextCodec`] and [`JsonCodec`] - Envelope to text and back
//! - [`MarshalConfig`] - Depth bound and date handling
//!
//! # Example
//!
//! ```
//! use tagmarsh_engine::Marshaller;
//! use tagmarsh_foundation::{Pair, TmMap, Value};
//! use tagmarsh_registry::TypeRegistry;
//!
//! let marshaller = Marshaller::new(TypeRegistry::new());
//! let map: TmMap<Value, Value> = [(Value::Pair(Pair::new(1, 2)), Value::from("x"))]
//!     .into_iter()
//!     .collect();
//!
//! let text = marshaller.marshal(&Value::Map(map.clone())).unwrap();
//! assert_eq!(marshaller.unmarshal(&text).unwrap(), Value::Map(map));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod classify;
pub mod codec;
pub mod config;
pub mod envelope;
mod flatten;
mod hydrate;
pub mod marshaller;
mod path;

pub use classify::{Shape, classify};
pub use codec::{JsonCodec, MAX_NESTING, TextCodec};
pub use config::{DEFAULT_MAX_DEPTH, MarshalConfig};
pub use envelope::Envelope;
pub use marshaller::Marshaller;
