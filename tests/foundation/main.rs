//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, persistent collections, Throwable, Moment, and Error.

mod collections;
mod errors;
mod moments;
