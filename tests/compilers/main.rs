//! Integration tests for Layer 3: the diagram and SCL compilers
//!
//! Tests whole programs from source text to state machine.

mod ad;
mod scl;
