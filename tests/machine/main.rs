//! Integration tests for Layer 2: state machines and their outputs
//!
//! Tests Graphviz, JSON and C# output for machines compiled from source.

mod csharp;
mod render;
