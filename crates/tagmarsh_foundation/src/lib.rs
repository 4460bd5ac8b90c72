//! Core values, persistent collections, throwables, and errors for tagmarsh.
//!
//! This crate provides:
//! - [`Value`] - The in-process value graph that gets marshalled
//! - [`Throwable`] - Error-like values with causal chains and stack text
//! - [`Moment`] - Date/time instants and their textual formats
//! - [`MarshObject`] - The capability trait for registered custom types
//! - [`Tag`] - The kind names a tagged envelope may carry
//! - [`Error`] - Rich error types with context
//! - Persistent collections ([`TmVec`], [`TmSet`], [`TmMap`], [`TmCollection`], [`TmRecord`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod moment;
pub mod object;
pub mod tag;
pub mod throwable;
pub mod value;

pub use collections::{TmCollection, TmMap, TmRecord, TmSet, TmVec};
pub use error::{Error, ErrorContext, ErrorKind, Phase};
pub use moment::{Moment, MomentFormat};
pub use object::{AccessError, Instance, MarshObject};
pub use tag::Tag;
pub use throwable::{Throwable, ThrowableKind};
pub use value::{NativeFn, Pair, Record, Value};

/// Result type alias using the tagmarsh Error type.
pub type Result<T> = std::result::Result<T, Error>;
