//! Core types for Statecraft.
//!
//! This crate provides:
//! - [`Span`] - Source location tracking shared by both grammars
//! - [`Error`] - Rich error types with context
//! - [`Result`] - Convenience alias used across the workspace

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod span;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use span::Span;
