//! Integration tests for Layer 2: Engine
//!
//! Tests for flatten, hydrate, depth bounds, and the text codec.

mod codec;
mod objects;
