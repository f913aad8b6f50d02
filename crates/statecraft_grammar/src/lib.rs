//! Host parsing runtime for Statecraft grammars.
//!
//! Grammar bindings (`statecraft_grammar_ad`, `statecraft_grammar_scl`)
//! export a [`LanguageFn`] loader. The runtime turns it into a [`Language`]
//! handle, checks it in [`Parser::set_language`], and parses source text into
//! a concrete syntax [`Tree`].
//!
//! ```
//! use statecraft_grammar::{LanguageError, Parser};
//!
//! let parser = Parser::new();
//! assert!(matches!(parser.parse("anything"), Err(LanguageError::NoLanguage)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod diagnostic;
pub mod language;
pub mod parser;
pub mod sexp;
pub mod tree;

pub use diagnostic::{DiagnosticKind, SyntaxDiagnostic};
pub use language::{
    ERROR_KIND, LANGUAGE_VERSION, Language, LanguageError, LanguageFn, LanguageInfo,
    MIN_COMPATIBLE_LANGUAGE_VERSION, NodeKind, ParseFn,
};
pub use parser::Parser;
pub use sexp::{SexpOptions, node_to_sexp_with_text};
pub use tree::{Children, Node, NodeId, Point, Tree, TreeBuilder};
