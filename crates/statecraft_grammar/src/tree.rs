//! Concrete syntax trees.
//!
//! Trees are stored as an arena of nodes. [`Node`] is a cheap `Copy` view
//! into a [`Tree`]; it carries the kind, position, field name and children of
//! one node. Bindings build trees bottom-up with [`TreeBuilder`].

use std::fmt;

use statecraft_foundation::Span;

use crate::language::{ERROR_KIND, Language};

/// A 0-based row/column position (column counted in bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Point {
    /// 0-based line.
    pub row: usize,
    /// 0-based byte column.
    pub column: usize,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Index of a node inside its tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
struct NodeData {
    kind: &'static str,
    named: bool,
    missing: bool,
    span: Span,
    field: Option<&'static str>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    has_error: bool,
}

/// Byte offsets of line starts, used to turn offsets into positions.
#[derive(Clone, Debug)]
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { starts }
    }

    fn point(&self, offset: usize) -> Point {
        let row = match self.starts.binary_search(&offset) {
            Ok(row) => row,
            Err(next) => next - 1,
        };
        Point::new(row, offset - self.starts[row])
    }
}

/// A parsed concrete syntax tree.
#[derive(Clone)]
pub struct Tree {
    language: Language,
    source: String,
    lines: LineIndex,
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Tree {
    /// Returns the root node.
    #[must_use]
    pub fn root_node(&self) -> Node<'_> {
        Node {
            tree: self,
            id: self.root,
        }
    }

    /// Returns the language that produced this tree.
    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Returns the parsed source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the total number of nodes, anonymous tokens included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the outermost `ERROR` nodes and all `MISSING` nodes in
    /// document order.
    #[must_use]
    pub fn errors(&self) -> Vec<Node<'_>> {
        let mut out = Vec::new();
        let mut stack = vec![self.root_node()];
        while let Some(node) = stack.pop() {
            if node.is_error() || node.is_missing() {
                out.push(node);
                continue;
            }
            if node.has_error() {
                let children: Vec<_> = node.children().collect();
                stack.extend(children.into_iter().rev());
            }
        }
        out
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Tree {:?} {}}}", self.language.name(), self.root_node().to_sexp())
    }
}

/// A view of a single node in a [`Tree`].
#[derive(Clone, Copy)]
pub struct Node<'tree> {
    tree: &'tree Tree,
    id: NodeId,
}

impl<'tree> Node<'tree> {
    fn data(&self) -> &'tree NodeData {
        self.tree.data(self.id)
    }

    fn at(&self, id: NodeId) -> Self {
        Self {
            tree: self.tree,
            id,
        }
    }

    /// Arena id of this node.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Kind name (`if_statement`, `"endif"`, `ERROR`, ...).
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.data().kind
    }

    /// Kind id in the language's node kind table.
    #[must_use]
    pub fn kind_id(&self) -> Option<u16> {
        let data = self.data();
        self.tree.language.id_for_node_kind(data.kind, data.named)
    }

    /// Whether this node is a named rule rather than an anonymous token.
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.data().named
    }

    /// Whether this node covers input the grammar could not parse.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.data().kind == ERROR_KIND
    }

    /// Whether this node was inserted to stand for expected but absent input.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.data().missing
    }

    /// Whether this node or any descendant is an error or missing node.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.data().has_error
    }

    /// Source span of this node.
    #[must_use]
    pub fn span(&self) -> Span {
        self.data().span
    }

    /// Byte offset where this node starts.
    #[must_use]
    pub fn start_byte(&self) -> usize {
        self.data().span.start
    }

    /// Byte offset where this node ends (exclusive).
    #[must_use]
    pub fn end_byte(&self) -> usize {
        self.data().span.end
    }

    /// 0-based start position.
    #[must_use]
    pub fn start_position(&self) -> Point {
        self.tree.lines.point(self.start_byte())
    }

    /// 0-based end position.
    #[must_use]
    pub fn end_position(&self) -> Point {
        self.tree.lines.point(self.end_byte())
    }

    /// Source text covered by this node.
    #[must_use]
    pub fn text(&self) -> &'tree str {
        self.data().span.text(&self.tree.source)
    }

    /// Source text covered by this node, read from an external buffer.
    ///
    /// # Errors
    /// Returns an error if the bytes are not valid UTF-8.
    pub fn utf8_text<'a>(&self, source: &'a [u8]) -> Result<&'a str, std::str::Utf8Error> {
        let span = self.data().span;
        let end = span.end.min(source.len());
        let start = span.start.min(end);
        std::str::from_utf8(&source[start..end])
    }

    /// Field name under which this node hangs off its parent.
    #[must_use]
    pub fn field_name(&self) -> Option<&'static str> {
        self.data().field
    }

    /// Parent node, if any.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.data().parent.map(|id| self.at(id))
    }

    /// Number of children, anonymous tokens included.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    /// Child at the given index.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<Self> {
        self.data().children.get(index).map(|&id| self.at(id))
    }

    /// All children in order.
    pub fn children(&self) -> impl Iterator<Item = Node<'tree>> + use<'tree> {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&id| Node { tree, id })
    }

    /// Named children in order.
    pub fn named_children(&self) -> impl Iterator<Item = Node<'tree>> + use<'tree> {
        self.children().filter(Node::is_named)
    }

    /// First child attached under `field`.
    #[must_use]
    pub fn child_by_field_name(&self, field: &str) -> Option<Self> {
        self.children().find(|c| c.field_name() == Some(field))
    }

    /// All children attached under `field`.
    pub fn children_by_field_name<'f>(
        &self,
        field: &'f str,
    ) -> impl Iterator<Item = Node<'tree>> + use<'tree, 'f> {
        self.children()
            .filter(move |c| c.field_name() == Some(field))
    }

    /// First named child of the given kind.
    #[must_use]
    pub fn child_of_kind(&self, kind: &str) -> Option<Self> {
        self.named_children().find(|c| c.kind() == kind)
    }

    /// This node and all its descendants in document order.
    #[must_use]
    pub fn descendants(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut stack = vec![*self];
        while let Some(node) = stack.pop() {
            out.push(node);
            let children: Vec<_> = node.children().collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Renders the named structure of this subtree as an s-expression.
    ///
    /// Anonymous tokens are left out; fields are shown as `field: (kind)`.
    #[must_use]
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        if self.is_missing() {
            out.push_str("(MISSING ");
            if self.is_named() {
                out.push_str(self.kind());
            } else {
                out.push('"');
                out.push_str(self.kind());
                out.push('"');
            }
            out.push(')');
            return;
        }
        out.push('(');
        out.push_str(self.kind());
        for child in self.children() {
            if !child.is_named() && !child.is_missing() {
                continue;
            }
            out.push(' ');
            if let Some(field) = child.field_name() {
                out.push_str(field);
                out.push_str(": ");
            }
            child.write_sexp(out);
        }
        out.push(')');
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{Node {} {} - {}}}",
            self.kind(),
            self.start_position(),
            self.end_position()
        )
    }
}

/// Ordered children of a node under construction, optionally with fields.
#[derive(Clone, Debug, Default)]
pub struct Children {
    items: Vec<(Option<&'static str>, NodeId)>,
}

impl Children {
    /// Creates an empty child list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a child without a field name.
    pub fn push(&mut self, id: NodeId) {
        self.items.push((None, id));
    }

    /// Appends a child when present.
    pub fn push_opt(&mut self, id: Option<NodeId>) {
        if let Some(id) = id {
            self.push(id);
        }
    }

    /// Appends a child under a field name.
    pub fn field(&mut self, name: &'static str, id: NodeId) {
        self.items.push((Some(name), id));
    }

    /// Appends all children of another list.
    pub fn extend(&mut self, other: Self) {
        self.items.extend(other.items);
    }

    /// Returns true if no child was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of children added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Bottom-up tree construction used by grammar bindings.
pub struct TreeBuilder<'src> {
    source: &'src str,
    lines: LineIndex,
    nodes: Vec<NodeData>,
}

impl<'src> TreeBuilder<'src> {
    /// Creates a builder for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            lines: LineIndex::new(source),
            nodes: Vec::new(),
        }
    }

    /// Returns the source being parsed.
    #[must_use]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Returns the span of a node already built.
    #[must_use]
    pub fn span_of(&self, id: NodeId) -> Span {
        self.nodes[id.0].span
    }

    /// Builds a span for a byte range of the source.
    #[must_use]
    pub fn span(&self, start: usize, end: usize) -> Span {
        let point = self.lines.point(start);
        Span::new(
            start,
            end,
            u32::try_from(point.row + 1).unwrap_or(u32::MAX),
            u32::try_from(point.column + 1).unwrap_or(u32::MAX),
        )
    }

    /// Adds an anonymous token node.
    pub fn token(&mut self, kind: &'static str, start: usize, end: usize) -> NodeId {
        self.push_leaf(kind, false, false, start, end)
    }

    /// Adds a named leaf node (`identifier`, `text_word`, ...).
    pub fn leaf(&mut self, kind: &'static str, start: usize, end: usize) -> NodeId {
        self.push_leaf(kind, true, false, start, end)
    }

    /// Adds a zero-width node standing for expected but absent input.
    pub fn missing(&mut self, kind: &'static str, named: bool, at: usize) -> NodeId {
        self.push_leaf(kind, named, true, at, at)
    }

    /// Adds an `ERROR` node covering `start..end` with the given children.
    pub fn error(&mut self, children: Children, start: usize, end: usize) -> NodeId {
        let id = self.push_node(ERROR_KIND, children, start, end);
        self.nodes[id.0].has_error = true;
        id
    }

    /// Adds a named node spanning its children, or an empty node at `at`.
    pub fn node(&mut self, kind: &'static str, children: Children, at: usize) -> NodeId {
        let (start, end) = match (children.items.first(), children.items.last()) {
            (Some(&(_, first)), Some(&(_, last))) => {
                (self.nodes[first.0].span.start, self.nodes[last.0].span.end)
            }
            _ => (at, at),
        };
        self.push_node(kind, children, start, end)
    }

    /// Finishes the tree with the given root.
    #[must_use]
    pub fn finish(self, language: Language, root: NodeId) -> Tree {
        Tree {
            language,
            source: self.source.to_string(),
            lines: self.lines,
            nodes: self.nodes,
            root,
        }
    }

    fn push_leaf(
        &mut self,
        kind: &'static str,
        named: bool,
        missing: bool,
        start: usize,
        end: usize,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            named,
            missing,
            span: self.span(start, end),
            field: None,
            parent: None,
            children: Vec::new(),
            has_error: missing,
        });
        id
    }

    fn push_node(
        &mut self,
        kind: &'static str,
        children: Children,
        start: usize,
        end: usize,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut has_error = false;
        let mut child_ids = Vec::with_capacity(children.items.len());
        for (field, child) in children.items {
            let data = &mut self.nodes[child.0];
            data.field = field;
            data.parent = Some(id);
            has_error |= data.has_error;
            child_ids.push(child);
        }
        self.nodes.push(NodeData {
            kind,
            named: true,
            missing: false,
            span: self.span(start, end),
            field: None,
            parent: None,
            children: child_ids,
            has_error,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{LANGUAGE_VERSION, LanguageFn, LanguageInfo, NodeKind};

    const KINDS: &[NodeKind] = &[
        NodeKind::named("pair"),
        NodeKind::named("word"),
        NodeKind::anonymous(":"),
    ];

    /// `word : word` with an optional missing right-hand side.
    fn parse_pair(language: Language, source: &str) -> Tree {
        let mut b = TreeBuilder::new(source);
        let colon = source.find(':').unwrap_or(source.len());
        let mut kids = Children::new();
        let key = b.leaf("word", 0, colon.min(source.trim_end().len()));
        kids.field("key", key);
        if colon < source.len() {
            kids.push(b.token(":", colon, colon + 1));
            let rest = source[colon + 1..].trim();
            if rest.is_empty() {
                kids.field("value", b.missing("word", true, source.len()));
            } else {
                let start = source.len() - source[colon + 1..].trim_start().len();
                kids.field("value", b.leaf("word", start, start + rest.len()));
            }
        }
        let root = b.node("pair", kids, 0);
        b.finish(language, root)
    }

    static PAIR: LanguageInfo = LanguageInfo {
        name: "pair",
        abi_version: LANGUAGE_VERSION,
        node_kinds: KINDS,
        field_names: &["key", "value"],
        parse: parse_pair,
    };

    fn pair_info() -> &'static LanguageInfo {
        &PAIR
    }

    fn parse(source: &str) -> Tree {
        parse_pair(Language::new(LanguageFn::from_raw(pair_info)), source)
    }

    #[test]
    fn fields_and_text() {
        let tree = parse("state: idle");
        let root = tree.root_node();
        assert_eq!(root.kind(), "pair");
        assert_eq!(root.child_count(), 3);
        assert_eq!(root.child_by_field_name("key").map(|n| n.text()), Some("state"));
        assert_eq!(root.child_by_field_name("value").map(|n| n.text()), Some("idle"));
        assert!(!root.has_error());
    }

    #[test]
    fn parents_are_linked() {
        let tree = parse("a: b");
        let root = tree.root_node();
        let value = root.child_by_field_name("value").expect("value field");
        assert_eq!(value.parent(), Some(root));
        assert_eq!(root.parent(), None);
    }

    #[test]
    fn sexp_skips_anonymous_tokens() {
        let tree = parse("a: b");
        assert_eq!(tree.root_node().to_sexp(), "(pair key: (word) value: (word))");
    }

    #[test]
    fn missing_nodes_mark_errors() {
        let tree = parse("a:");
        let root = tree.root_node();
        assert!(root.has_error());
        let errors = tree.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_missing());
        assert_eq!(root.to_sexp(), "(pair key: (word) value: (MISSING word))");
    }

    #[test]
    fn positions_are_zero_based() {
        let tree = parse("a:\n  b");
        let value = tree
            .root_node()
            .child_by_field_name("value")
            .expect("value field");
        assert_eq!(value.start_position(), Point::new(1, 2));
        assert_eq!(value.end_position(), Point::new(1, 3));
        assert_eq!(value.span().line, 2);
        assert_eq!(value.span().column, 3);
    }

    #[test]
    fn kind_ids_resolve_through_language() {
        let tree = parse("a: b");
        let root = tree.root_node();
        assert_eq!(root.kind_id(), Some(0));
        assert_eq!(root.child(1).and_then(|n| n.kind_id()), Some(2));
    }

    #[test]
    fn descendants_in_document_order() {
        let tree = parse("a: b");
        let kinds: Vec<_> = tree.root_node().descendants().iter().map(Node::kind).collect();
        assert_eq!(kinds, vec!["pair", "word", ":", "word"]);
    }

    #[test]
    fn utf8_text_reads_external_buffer() {
        let tree = parse("key: value");
        let key = tree.root_node().child_by_field_name("key").expect("key");
        assert_eq!(key.utf8_text(b"key: value"), Ok("key"));
    }

    #[test]
    fn error_nodes_wrap_skipped_input() {
        let source = "?? x";
        let mut b = TreeBuilder::new(source);
        let err = b.error(Children::new(), 0, 2);
        let mut kids = Children::new();
        kids.push(err);
        kids.field("key", b.leaf("word", 3, 4));
        let root = b.node("pair", kids, 0);
        let tree = b.finish(Language::new(LanguageFn::from_raw(pair_info)), root);
        let root = tree.root_node();
        assert!(root.has_error());
        assert_eq!(tree.errors()[0].text(), "??");
        assert_eq!(root.to_sexp(), "(pair (ERROR) key: (word))");
    }
}
