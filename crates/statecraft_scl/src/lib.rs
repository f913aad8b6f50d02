//! SCL compiler.
//!
//! An SCL program declares types, contexts (data sources) and states. Each
//! state lists the data statements it runs and a `next` block choosing its
//! successor; the compiler keeps the states and their `next` cases and drops
//! the data statements:
//! - [`SclParser`] parses the program into an AST ([`ast`])
//! - [`check()`] resolves names
//! - [`lower()`] builds the state machine
//!
//! ```
//! let fsm = statecraft_scl::build_fsm_from_scl(
//!     "context Db { }\n\
//!      state Open uses Db { next { when paid => Closed\n otherwise => Open } }\n\
//!      state Closed uses Db { next { otherwise => Closed } }\n",
//! )
//! .expect("valid program");
//! assert_eq!(fsm.state_count(), 2);
//! assert_eq!(fsm.transitions()[0].condition(), Some("paid"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
mod check;
mod lower;
mod parser;

pub use ast::{
    Assignment, BinaryOp, CompareOp, Condition, ContextDecl, Expr, Field, Literal, Name,
    NextBlock, NextCase, PrimitiveType, Program, QualifiedName, QuantifierKind, StateDecl, Stmt,
    Type, TypeDecl, UnaryOp, UseStmt,
};
pub use check::check;
pub use lower::lower;
pub use parser::SclParser;

use statecraft_foundation::Result;
use statecraft_machine::FsMachine;
use tracing::info;

/// Parses and checks a program.
///
/// # Errors
/// Returns grammar load, syntax and name resolution errors.
pub fn parse_scl(text: &str) -> Result<Program> {
    let program = SclParser::new()?.parse(text)?;
    check(&program)?;
    Ok(program)
}

/// Compiles a program into a finite state machine.
///
/// # Errors
/// Returns grammar load, syntax and name resolution errors.
pub fn build_fsm_from_scl(text: &str) -> Result<FsMachine> {
    let fsm = lower(&parse_scl(text)?)?;
    info!(
        states = fsm.state_count(),
        transitions = fsm.transitions().len(),
        "compiled SCL program"
    );
    Ok(fsm)
}
