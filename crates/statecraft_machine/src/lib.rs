//! State machine layer for Statecraft.
//!
//! This crate provides:
//! - [`cfg`] - control flow graphs and their incremental builder
//! - [`fsm`] - finite state machines and the CFG to FSM conversion
//! - [`dot`] - Graphviz rendering
//! - [`codegen`] - C# code generation
//!
//! With the `serde` feature, graphs and machines derive `Serialize` and
//! `Deserialize`, and [`fsm::fsm_to_json`] is available.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cfg;
pub mod codegen;
pub mod dot;
pub mod fsm;

pub use cfg::{CfGraph, CfgBuilder, CfgCond, CfgEdge, CfgNodeKind, NodeId};
pub use codegen::csharp::{CsharpOptions, GeneratedFile, generate_csharp_fsm, render_csharp};
pub use dot::fsm_to_dot;
#[cfg(feature = "serde")]
pub use fsm::fsm_to_json;
pub use fsm::{END_STATE, FsMachine, START_STATE, StateId, Transition, cfg_to_fsm};
