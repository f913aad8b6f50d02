//! Annotated s-expression rendering.
//!
//! [`Node::to_sexp`] prints only the shape of a tree. The renderer here also
//! prints every token and can annotate nodes with their text, byte range and
//! position, which is what syntax error reports and `statecraft parse` use.

use crate::tree::Node;

/// What to include for each node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SexpOptions {
    /// Show the source text of each node.
    pub show_text: bool,
    /// Show `bytes=start..end`.
    pub show_byte_range: bool,
    /// Show `pos=(row,col)-(row,col)`.
    pub show_position: bool,
    /// Truncate node text to this many characters.
    pub max_text_length: Option<usize>,
}

impl Default for SexpOptions {
    fn default() -> Self {
        Self {
            show_text: true,
            show_byte_range: false,
            show_position: false,
            max_text_length: Some(100),
        }
    }
}

impl SexpOptions {
    /// Options used inside syntax error reports.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            max_text_length: Some(20),
            ..Self::default()
        }
    }

    /// Builder method to toggle node text.
    #[must_use]
    pub fn with_text(mut self, show: bool) -> Self {
        self.show_text = show;
        self
    }

    /// Builder method to toggle byte ranges.
    #[must_use]
    pub fn with_byte_range(mut self, show: bool) -> Self {
        self.show_byte_range = show;
        self
    }

    /// Builder method to toggle positions.
    #[must_use]
    pub fn with_position(mut self, show: bool) -> Self {
        self.show_position = show;
        self
    }

    /// Builder method to set the text truncation length.
    #[must_use]
    pub fn with_max_text_length(mut self, max: Option<usize>) -> Self {
        self.max_text_length = max;
        self
    }
}

/// Renders `node` and its subtree with the requested annotations.
#[must_use]
pub fn node_to_sexp_with_text(node: &Node<'_>, options: &SexpOptions) -> String {
    render(node, options, 0)
}

fn render(node: &Node<'_>, options: &SexpOptions, depth: usize) -> String {
    let mut head = String::new();

    let mut metadata = Vec::new();
    if options.show_text {
        let text = truncate(node.text(), options.max_text_length);
        if !text.is_empty() {
            metadata.push(format!("text=\"{}\"", escape_string(&text)));
        }
    }
    if options.show_byte_range {
        metadata.push(format!("bytes={}..{}", node.start_byte(), node.end_byte()));
    }
    if options.show_position {
        let start = node.start_position();
        let end = node.end_position();
        metadata.push(format!(
            "pos=({},{})-({},{})",
            start.row, start.column, end.row, end.column
        ));
    }
    if !metadata.is_empty() {
        head.push('[');
        head.push_str(&metadata.join(" "));
        head.push_str("]:");
    }
    if node.is_missing() {
        head.push_str("MISSING ");
    }
    head.push_str(node.kind());

    let children: Vec<String> = node
        .children()
        .map(|child| render(&child, options, depth + 1))
        .collect();

    match children.as_slice() {
        [] => format!("({head})"),
        [only] => format!("({head} {only})"),
        many => {
            let indent = "  ".repeat(depth + 1);
            format!("({head}\n{indent}{})", many.join(&format!("\n{indent}")))
        }
    }
}

fn truncate(text: &str, max: Option<usize>) -> String {
    match max {
        Some(max) => match text.char_indices().nth(max) {
            Some((cut, _)) => format!("{}...", &text[..cut]),
            None => text.to_string(),
        },
        None => text.to_string(),
    }
}

/// Escapes a string for display inside double quotes.
#[must_use]
pub fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => result.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => result.push(c),
        }
    }
    result
}
