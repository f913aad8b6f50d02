//! Integration tests for Layer 1: grammar runtime and bindings
//!
//! Tests grammar loading, parsing, and syntax error reports.

mod diagnostics;
mod smoke;
