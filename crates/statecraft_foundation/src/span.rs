//! Source location tracking.
//!
//! A [`Span`] marks the region of a `.puml` or `.scl` file that a syntax node
//! or AST item came from, so later stages can point back at the source.

/// A span of source text.
///
/// Byte offsets are half-open; `line` and `column` locate `start` and are
/// 1-based so they can be printed as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset where this span starts.
    pub start: usize,
    /// Byte offset where this span ends (exclusive).
    pub end: usize,
    /// 1-based line number where this span starts.
    pub line: u32,
    /// 1-based column number (in bytes) where this span starts.
    pub column: u32,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Creates an empty span at the start of input.
    #[must_use]
    pub const fn at_start() -> Self {
        Self::new(0, 0, 1, 1)
    }

    /// Creates an empty span located at the start of `self`.
    #[must_use]
    pub const fn collapsed(self) -> Self {
        Self::new(self.start, self.start, self.line, self.column)
    }

    /// Creates a span covering the range from this span to another.
    ///
    /// The position of the result is the position of `self`.
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        Self {
            start: self.start,
            end: other.end.max(self.end),
            line: self.line,
            column: self.column,
        }
    }

    /// Returns the length of this span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if this span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if the byte offset falls inside this span.
    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns the text this span covers in the given source.
    ///
    /// Out-of-range spans yield an empty string instead of panicking.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }
}
