//! PlantUML activity diagram compiler.
//!
//! The pipeline runs in three stages:
//! - [`AdParser`] parses the diagram with the activity diagram grammar and
//!   walks the syntax tree into an AST ([`ast`])
//! - [`lower()`] turns the AST into a control flow graph
//! - [`statecraft_machine::cfg_to_fsm`] collapses the graph into a state
//!   machine whose states are the diagram's actions
//!
//! ```
//! let fsm = statecraft_ad::build_fsm_from_plantuml(
//!     "@startuml\nstart\n:Receive order;\nif (in stock?) then (yes)\n:Ship;\nelse (no)\n:Backorder;\nendif\nstop\n@enduml\n",
//! )
//! .expect("valid diagram");
//! assert_eq!(fsm.state_count(), 5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
mod fuzz_tests;
mod lower;
mod parser;

pub use ast::{Ast, AstKind, CondBody, Condition, Diagram, IfElseBlock, Loop};
pub use lower::lower;
pub use parser::AdParser;

use statecraft_foundation::Result;
use statecraft_machine::{CfGraph, FsMachine, cfg_to_fsm};
use tracing::info;

/// Parses and lowers a diagram into its control flow graph.
///
/// # Errors
/// Returns grammar load, syntax and lowering errors.
pub fn build_cfg_from_plantuml(text: &str) -> Result<CfGraph> {
    let diagram = AdParser::new()?.parse(text)?;
    lower(&diagram)
}

/// Compiles a diagram into a finite state machine.
///
/// # Errors
/// Returns grammar load, syntax and lowering errors.
pub fn build_fsm_from_plantuml(text: &str) -> Result<FsMachine> {
    let fsm = cfg_to_fsm(&build_cfg_from_plantuml(text)?);
    info!(
        states = fsm.state_count(),
        transitions = fsm.transitions().len(),
        "compiled activity diagram"
    );
    Ok(fsm)
}
