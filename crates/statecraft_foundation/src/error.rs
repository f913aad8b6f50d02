//! Error types for the Statecraft toolchain.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// The main error type for Statecraft operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a parse error at the given 1-based position.
    #[must_use]
    pub fn parse(message: impl Into<String>, line: u32, column: u32, context: String) -> Self {
        Self::new(ErrorKind::ParseError {
            message: message.into(),
            line,
            column,
            context,
        })
    }

    /// Creates a grammar load error.
    #[must_use]
    pub fn language_load(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::LanguageLoad(message.into()))
    }

    /// Creates an undefined label error.
    #[must_use]
    pub fn undefined_label(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UndefinedLabel(name.into()))
    }

    /// Creates a duplicate definition error.
    #[must_use]
    pub fn duplicate(what: &'static str, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::Duplicate {
            what,
            name: name.into(),
        })
    }

    /// Creates an undefined name error.
    #[must_use]
    pub fn undefined(what: &'static str, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::Undefined {
            what,
            name: name.into(),
        })
    }

    /// Creates an error for a malformed declaration or name.
    #[must_use]
    pub fn invalid(what: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Invalid {
            what,
            message: message.into(),
        })
    }

    /// Creates an I/O error with a message.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io(message.into()))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns true if this is a syntax error from one of the grammars.
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self.kind, ErrorKind::ParseError { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Syntax error reported by a grammar.
    #[error("parse error at {line}:{column}: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
        /// Diagnostic report for the failing region.
        context: String,
    },

    /// A grammar binding could not be loaded by the runtime.
    #[error("grammar load failed: {0}")]
    LanguageLoad(String),

    /// `goto` to a label that was never defined.
    #[error("undefined label: {0}")]
    UndefinedLabel(String),

    /// `break` used outside of any loop.
    #[error("break outside loop at line {line}")]
    BreakOutsideLoop {
        /// Line of the offending statement (1-indexed).
        line: u32,
    },

    /// A name was declared more than once.
    #[error("duplicate {what}: {name}")]
    Duplicate {
        /// What kind of item was duplicated (state, type, ...).
        what: &'static str,
        /// The duplicated name.
        name: String,
    },

    /// A name was referenced but never declared.
    #[error("undefined {what}: {name}")]
    Undefined {
        /// What kind of item was expected.
        what: &'static str,
        /// The unresolved name.
        name: String,
    },

    /// A declaration or name that violates a structural rule.
    #[error("invalid {what}: {message}")]
    Invalid {
        /// What kind of item is invalid (name, type, ...).
        what: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// A state's `next` block is malformed.
    #[error("invalid next block in state {state}: {message}")]
    InvalidNextBlock {
        /// The state whose next block is invalid.
        state: String,
        /// What is wrong with it.
        message: String,
    },

    /// Code generation failed.
    #[error("code generation failed: {0}")]
    Codegen(String),

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for Results with Statecraft errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source file being processed.
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<usize>,
    /// Column number in source.
    pub column: Option<usize>,
    /// Free-form notes, outermost last.
    pub notes: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source file.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Adds a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.source, self.line, self.column) {
            (Some(source), Some(line), Some(col)) => write!(f, "at {source}:{line}:{col}")?,
            (Some(source), _, _) => write!(f, "at {source}")?,
            (None, Some(line), Some(col)) => write!(f, "at line {line}, column {col}")?,
            _ => {}
        }
        if !self.notes.is_empty() {
            writeln!(f)?;
            for note in &self.notes {
                writeln!(f, "  note: {note}")?;
            }
        }
        Ok(())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}
