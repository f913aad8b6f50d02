//! Syntax error reports.
//!
//! Grammars never fail outright: unparseable input ends up in `ERROR` nodes
//! and absent tokens become `MISSING` nodes. This module turns those nodes
//! into reports that point at the offending source.

use std::fmt;

use crate::sexp::{SexpOptions, escape_string, node_to_sexp_with_text};
use crate::tree::{Node, Tree};

/// What kind of problem a diagnostic describes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Input that could not be parsed.
    Unexpected,
    /// An expected token or rule that is absent.
    Missing(&'static str),
}

/// A single syntax problem with enough context to print a report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxDiagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// 1-based start line.
    pub line_start: usize,
    /// 1-based start column.
    pub column_start: usize,
    /// 1-based end line.
    pub line_end: usize,
    /// 1-based end column.
    pub column_end: usize,
    /// Source text covered by the node.
    pub excerpt: String,
    /// Text of each direct child of the node.
    pub tokens: Vec<String>,
    /// Kind of the enclosing node (`root` at the top).
    pub parent_kind: &'static str,
    /// Annotated s-expression of the node.
    pub sexp: String,
}

impl SyntaxDiagnostic {
    /// Builds a diagnostic for an `ERROR` or `MISSING` node.
    #[must_use]
    pub fn from_node(node: &Node<'_>) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        let kind = if node.is_missing() {
            DiagnosticKind::Missing(node.kind())
        } else {
            DiagnosticKind::Unexpected
        };
        Self {
            kind,
            line_start: start.row + 1,
            column_start: start.column + 1,
            line_end: end.row + 1,
            column_end: end.column + 1,
            excerpt: node.text().to_string(),
            tokens: node.children().map(|c| c.text().to_string()).collect(),
            parent_kind: node.parent().map_or("root", |p| p.kind()),
            sexp: node_to_sexp_with_text(node, &SexpOptions::compact()),
        }
    }

    /// Collects diagnostics for every problem in the tree.
    #[must_use]
    pub fn collect(tree: &Tree) -> Vec<Self> {
        tree.errors().iter().map(Self::from_node).collect()
    }

    /// One-line summary of the problem.
    #[must_use]
    pub fn message(&self) -> String {
        match self.kind {
            DiagnosticKind::Missing(kind) => format!("missing {kind} in {}", self.parent_kind),
            DiagnosticKind::Unexpected => {
                let first_line = self.excerpt.lines().next().unwrap_or("").trim();
                format!(
                    "unexpected \"{}\" in {}",
                    escape_string(first_line),
                    self.parent_kind
                )
            }
        }
    }

    /// 1-based line as reported to users.
    #[must_use]
    pub fn line(&self) -> u32 {
        u32::try_from(self.line_start).unwrap_or(u32::MAX)
    }

    /// 1-based column as reported to users.
    #[must_use]
    pub fn column(&self) -> u32 {
        u32::try_from(self.column_start).unwrap_or(u32::MAX)
    }
}

impl fmt::Display for SyntaxDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "position: [{},{}; {},{}]",
            self.line_start, self.column_start, self.line_end, self.column_end
        )?;
        writeln!(f, "text: [{}]", escape_string(&self.excerpt))?;
        writeln!(f, "child tokens: [{}]", self.tokens.join(", "))?;
        writeln!(f, "parent kind: [{}]", self.parent_kind)?;
        write!(f, "s-expr: [{}]", self.sexp)
    }
}
