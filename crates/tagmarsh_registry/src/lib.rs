//! Type descriptors and the registry lookup contract for tagmarsh.
//!
//! This crate provides:
//! - [`MarshDescriptor`] and [`PropertyDescriptor`] - How one custom type is read and rebuilt
//! - [`MarshRegistry`] - The read-only lookup interface the marshaller consumes
//! - [`TypeRegistry`] - An in-memory registry populated before first use

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod descriptor;
pub mod registry;

pub use descriptor::{Constructor, MarshDescriptor, PropertyDescriptor};
pub use registry::{MarshRegistry, TypeRegistry};
