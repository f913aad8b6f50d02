//! Statecraft - PlantUML activity diagram and SCL to state machine compiler
//!
//! This crate re-exports all layers of the Statecraft toolchain for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: statecraft_cli          CLI binary, configuration, logging
//! Layer 3: statecraft_ad           Activity diagram → AST → CFG → FSM
//!          statecraft_scl          SCL → AST → checks → FSM
//! Layer 2: statecraft_machine      CFG, FSM, DOT/JSON output, C# codegen
//!          statecraft_grammar_ad   ActivityDiagram grammar binding
//!          statecraft_grammar_scl  SCL grammar binding
//! Layer 1: statecraft_grammar      Grammar runtime: Language, Parser, Tree
//! Layer 0: statecraft_foundation   Core types (Span, Error)
//! ```

pub use statecraft_ad as ad;
pub use statecraft_cli as cli;
pub use statecraft_foundation as foundation;
pub use statecraft_grammar as grammar;
pub use statecraft_grammar_ad as grammar_ad;
pub use statecraft_grammar_scl as grammar_scl;
pub use statecraft_machine as machine;
pub use statecraft_scl as scl;
