//! Abstract syntax of activity diagrams.
//!
//! Only the parts that shape control flow survive: styling, notes, titles and
//! group boundaries are dropped by the parser.

use std::fmt;

use statecraft_foundation::Span;

/// A branch or loop condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Free text, as written between the parentheses.
    Text(String),
    /// `activity Name`: the outcome of another activity.
    Activity(String),
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Activity(name) => write!(f, "activity {name}"),
        }
    }
}

/// A condition guarding a body, with the label written on its edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CondBody {
    /// Guard of the body.
    pub cond: Condition,
    /// `(label)` after the condition.
    pub label: Option<String>,
    /// Statements run when the guard holds.
    pub body: Vec<Ast>,
}

impl CondBody {
    /// Creates a guarded body.
    #[must_use]
    pub fn new(cond: Condition, label: Option<String>, body: Vec<Ast>) -> Self {
        Self { cond, label, body }
    }
}

/// `if` / `elseif` branches and the optional `else`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfElseBlock {
    /// The `if` branch followed by every `elseif`, in source order.
    pub branches: Vec<CondBody>,
    /// `else` branch: its label and body.
    pub else_branch: Option<(Option<String>, Vec<Ast>)>,
}

/// The loop form shared by `while` and `repeat`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loop {
    /// Condition; `repeat` may omit it.
    pub cond: Option<Condition>,
    /// Label on the edge taken while the condition holds.
    pub label: Option<String>,
    /// Label on the edge leaving the loop.
    pub exit_label: Option<String>,
    /// Loop body.
    pub body: Vec<Ast>,
}

/// Statement kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstKind {
    /// `:text;`
    Action(String),
    /// An action whose text names another activity (`:activity Name;`).
    ActivityRef(String),
    /// `while (cond) ... endwhile`; the condition is tested first.
    While(Loop),
    /// `repeat ... repeat while (cond)`; the body runs at least once.
    Repeat(Loop),
    /// `switch (expr)` with its `case` clauses.
    Case {
        /// Switched expression.
        expr: Condition,
        /// One guarded body per `case`.
        cases: Vec<CondBody>,
    },
    /// `if ... endif`.
    IfElse(IfElseBlock),
    /// `label Name`.
    Label(String),
    /// `goto Name`.
    Goto(String),
    /// `break`.
    Break,
    /// `stop` or `end`.
    Stop,
    /// An arrow; its label goes on the next edge.
    Arrow(Option<String>),
}

/// A statement with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast {
    /// What the statement is.
    pub kind: AstKind,
    /// Where it was written.
    pub span: Span,
}

impl Ast {
    /// Creates a statement.
    #[must_use]
    pub fn new(kind: AstKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// A parsed diagram: its statements in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagram {
    /// `@startuml` title, if any.
    pub title: Option<String>,
    /// Top-level statements, groups flattened.
    pub body: Vec<Ast>,
}
