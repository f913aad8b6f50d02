//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Span and Error.

mod errors;
mod spans;
