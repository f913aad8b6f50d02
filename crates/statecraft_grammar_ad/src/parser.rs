//! Recursive-descent parser for PlantUML activity diagrams.
//!
//! Statements are recognized by their leading keyword. Unknown lines become
//! `ERROR` nodes and absent closers become `MISSING` nodes, so every input
//! yields a tree.

use statecraft_grammar::{Children, Language, NodeId, Tree, TreeBuilder};

use crate::scanner::{Scanner, is_identifier_char, is_identifier_start};
use crate::{field, kind};

const GROUP_TYPES: [&str; 5] = ["group", "partition", "package", "rectangle", "card"];
const NOTE_POSITIONS: [&str; 4] = ["left", "right", "top", "bottom"];
const ARROW_FLAGS: [&str; 3] = ["bold", "dashed", "dotted"];

/// Deepest block nesting parsed; anything below becomes one `ERROR` node.
const MAX_NESTING: usize = 256;

/// Keywords that end the statement list of a block.
const BLOCK_CLOSERS: [&str; 8] = [
    "else",
    "elseif",
    "endif",
    "endwhile",
    "endswitch",
    "case",
    "repeatwhile",
    "end",
];

/// How far a run of words extends.
#[derive(Clone, Copy, PartialEq, Eq)]
enum TextMode {
    /// Rest of the line, up to `;`, a brace or a parenthesis.
    Line,
    /// Inside parentheses; nested pairs are kept in the words.
    Paren,
    /// Up to the `;` that closes an action, across lines.
    Action,
    /// Up to `end note` or `endnote` at the start of a line.
    Note,
    /// Rest of the line, whatever it contains.
    Raw,
}

impl TextMode {
    fn stops_at(self, c: char) -> bool {
        match self {
            Self::Line => matches!(c, ';' | '{' | '}' | '(' | ')'),
            Self::Action => c == ';',
            Self::Paren | Self::Note | Self::Raw => false,
        }
    }

    fn multiline(self) -> bool {
        matches!(self, Self::Action | Self::Note)
    }
}

/// Parse entry point registered in the language tables.
pub(crate) fn parse(language: Language, source: &str) -> Tree {
    let mut parser = AdParser {
        s: Scanner::new(source),
        b: TreeBuilder::new(source),
        depth: 0,
    };
    let root = parser.document();
    parser.b.finish(language, root)
}

struct AdParser<'src> {
    s: Scanner<'src>,
    b: TreeBuilder<'src>,
    depth: usize,
}

impl<'src> AdParser<'src> {
    // =========================================================================
    // Document
    // =========================================================================

    fn document(&mut self) -> NodeId {
        let mut kids = Children::new();
        self.s.skip_trivia();
        if self.s.peek_str("@startuml") {
            kids.push(self.startuml());
        }
        loop {
            self.statements(&mut kids, true);
            if self.s.at_end() {
                break;
            }
            if self.s.peek_keyword("start") {
                kids.push(self.keyword("start"));
            } else if self.at_bare("end") {
                kids.push(self.keyword("end"));
            } else if self.s.peek_str("@enduml") {
                let start = self.s.pos();
                self.s.advance("@enduml".len());
                kids.push(self.b.leaf(kind::ENDUML_DIRECTIVE, start, self.s.pos()));
                self.s.skip_trivia();
                if !self.s.at_end() {
                    kids.push(self.error_rest());
                }
                break;
            } else {
                kids.push(self.error_line());
            }
        }
        self.b.node(kind::DOCUMENT, kids, 0)
    }

    fn startuml(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.keyword("@startuml"));
        kids.push_opt(self.text_content(TextMode::Raw, |_| false));
        self.b.node(kind::STARTUML_DIRECTIVE, kids, self.s.pos())
    }

    // =========================================================================
    // Statement lists
    // =========================================================================

    fn statements(&mut self, kids: &mut Children, top: bool) {
        loop {
            self.s.skip_trivia();
            if self.s.at_end()
                || self.at_block_end()
                || (top && (self.s.peek_keyword("start") || self.s.peek_str("@enduml")))
            {
                break;
            }
            let stmt = match self.statement() {
                Some(stmt) => stmt,
                None => self.error_line(),
            };
            kids.push(stmt);
        }
    }

    fn block(&mut self) -> NodeId {
        let at = self.s.pos();
        let mut kids = Children::new();
        if self.depth < MAX_NESTING {
            self.depth += 1;
            self.statements(&mut kids, false);
            self.depth -= 1;
        } else {
            kids.push(self.error_rest());
        }
        self.b.node(kind::BLOCK_STATEMENT_LIST, kids, at)
    }

    fn at_block_end(&self) -> bool {
        BLOCK_CLOSERS.iter().any(|w| self.s.peek_keyword(w))
            || self.s.peek_keyword_pair("repeat", "while")
            || self.s.peek_str("}")
    }

    fn statement(&mut self) -> Option<NodeId> {
        let stmt = if self.s.peek_keyword("if") {
            self.if_statement()
        } else if self.s.peek_keyword("switch") {
            self.switch_statement()
        } else if self.s.peek_keyword("while") {
            self.while_statement()
        } else if self.s.peek_keyword("repeat") {
            self.repeat_statement()
        } else if let Some(ty) = self.group_type_ahead() {
            self.group_statement(ty)
        } else if let Some(def) = self.define_statement() {
            def
        } else {
            self.terminal_statement()?
        };
        Some(stmt)
    }

    /// Consumes the rest of the line as an `ERROR` node.
    fn error_line(&mut self) -> NodeId {
        let start = self.s.pos();
        self.s.skip_to_line_end();
        if self.s.pos() == start {
            self.s.bump();
        }
        let end = start + self.b.source()[start..self.s.pos()].trim_end().len();
        let mut words = Children::new();
        let mut offset = start;
        for word in self.b.source()[start..end].split_whitespace() {
            let at = offset + self.b.source()[offset..end].find(word).unwrap_or(0);
            words.push(self.b.leaf(kind::TEXT_WORD, at, at + word.len()));
            offset = at + word.len();
        }
        let end = if end == start { self.s.pos() } else { end };
        self.b.error(words, start, end)
    }

    /// Consumes the rest of the input as one `ERROR` node.
    fn error_rest(&mut self) -> NodeId {
        self.s.skip_whitespace();
        let start = self.s.pos();
        let rest = self.s.rest();
        let end = start + rest.trim_end().len();
        self.s.advance(rest.len());
        self.b.error(Children::new(), start, end)
    }

    // =========================================================================
    // Conditionals
    // =========================================================================

    fn if_statement(&mut self) -> NodeId {
        let at = self.s.pos();
        let mut kids = Children::new();
        kids.push(self.conditional_branch(kind::IF_CONDITION, "if"));
        self.s.skip_trivia();
        while self.s.peek_keyword("elseif") {
            kids.push(self.conditional_branch(kind::ELSEIF_CONDITION, "elseif"));
            self.s.skip_trivia();
        }
        if self.s.peek_keyword("else") {
            let mut branch = Children::new();
            branch.push(self.keyword("else"));
            self.branch_label(&mut branch, field::LABEL);
            branch.field(field::BLOCK_STATEMENT_LIST, self.block());
            kids.push(self.b.node(kind::ELSE_CONDITION, branch, self.s.pos()));
        }
        kids.push(self.closer("endif", "if", kind::ENDIF_DIRECTIVE));
        self.b.node(kind::IF_STATEMENT, kids, at)
    }

    fn conditional_branch(&mut self, node_kind: &'static str, keyword: &'static str) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.keyword(keyword));
        self.condition_head(&mut kids, &["then"]);
        kids.push_opt(self.eat("then"));
        self.branch_label(&mut kids, field::LABEL);
        kids.field(field::BLOCK_STATEMENT_LIST, self.block());
        self.b.node(node_kind, kids, self.s.pos())
    }

    fn switch_statement(&mut self) -> NodeId {
        let at = self.s.pos();
        let mut kids = Children::new();
        kids.push(self.keyword("switch"));
        self.condition_head(&mut kids, &[]);
        kids.push_opt(self.eat(";"));
        self.s.skip_trivia();
        while self.s.peek_keyword("case") {
            let mut clause = Children::new();
            clause.push(self.keyword("case"));
            self.condition_head(&mut clause, &[]);
            clause.field(field::BLOCK_STATEMENT_LIST, self.block());
            kids.push(self.b.node(kind::CASE_CLAUSE, clause, self.s.pos()));
            self.s.skip_trivia();
        }
        kids.push(self.closer("endswitch", "switch", kind::ENDSWITCH_DIRECTIVE));
        self.b.node(kind::SWITCH_STATEMENT, kids, at)
    }

    /// `( expression )` or a bare expression up to one of `stop_words`.
    fn condition_head(&mut self, kids: &mut Children, stop_words: &[&str]) {
        self.s.skip_inline_ws();
        if self.s.peek_str("(") {
            kids.push(self.keyword("("));
            kids.field(field::EXPRESSION, self.expression(TextMode::Paren, &[]));
            kids.push(self.expect(")"));
        } else {
            kids.field(field::EXPRESSION, self.expression(TextMode::Line, stop_words));
        }
    }

    fn expression(&mut self, mode: TextMode, stop_words: &[&str]) -> NodeId {
        self.s.skip_inline_ws();
        let at = self.s.pos();
        let mut kids = Children::new();
        if self.s.peek_keyword("activity") {
            kids.push(self.keyword("activity"));
            kids.field(field::ACTIVITY_IDENTIFIER, self.identifier());
        } else {
            let stop = |s: &Scanner<'src>| stop_words.iter().any(|w| s.peek_keyword(w));
            match self.text_content(mode, stop) {
                Some(text) => kids.field(field::EXPRESSION_CONTENT, text),
                None => return self.b.missing(kind::EXPRESSION, true, at),
            }
        }
        self.b.node(kind::EXPRESSION, kids, at)
    }

    /// Optional `(text)` on the current line, attached under `name`.
    fn branch_label(&mut self, kids: &mut Children, name: &'static str) {
        self.s.skip_inline_ws();
        if !self.s.peek_str("(") {
            return;
        }
        kids.push(self.keyword("("));
        let text = self.text_or_missing(TextMode::Paren);
        kids.field(name, text);
        kids.push(self.expect(")"));
    }

    // =========================================================================
    // Loops
    // =========================================================================

    fn while_statement(&mut self) -> NodeId {
        let at = self.s.pos();
        let mut kids = Children::new();
        kids.push(self.keyword("while"));
        self.condition_head(&mut kids, &["is"]);
        kids.push_opt(self.eat("is"));
        self.branch_label(&mut kids, field::LABEL);
        kids.field(field::BLOCK_STATEMENT_LIST, self.block());
        kids.push(self.closer("endwhile", "while", kind::ENDWHILE_DIRECTIVE));
        self.branch_label(&mut kids, field::EXIT_LABEL);
        self.b.node(kind::WHILE_STATEMENT, kids, at)
    }

    fn repeat_statement(&mut self) -> NodeId {
        let at = self.s.pos();
        let mut kids = Children::new();
        kids.push(self.keyword("repeat"));
        kids.field(field::BLOCK_STATEMENT_LIST, self.block());
        kids.push(self.repeat_end());
        self.b.node(kind::REPEAT_STATEMENT, kids, at)
    }

    fn repeat_end(&mut self) -> NodeId {
        self.s.skip_trivia();
        let at = self.s.pos();
        let mut kids = Children::new();
        if self.s.peek_keyword("repeatwhile") {
            kids.push(self.keyword("repeatwhile"));
        } else if self.s.peek_keyword_pair("repeat", "while") {
            kids.push(self.keyword("repeat"));
            self.s.skip_inline_ws();
            kids.push(self.keyword("while"));
        } else {
            kids.push(self.b.missing("repeatwhile", false, at));
            return self.b.node(kind::REPEAT_STATEMENT_END, kids, at);
        }
        if !self.s.at_line_end() {
            self.condition_head(&mut kids, &["is", "not"]);
        }
        if let Some(is) = self.eat("is") {
            kids.push(is);
            self.branch_label(&mut kids, field::LABEL);
        }
        if let Some(not) = self.eat("not") {
            kids.push(not);
            self.branch_label(&mut kids, field::EXIT_LABEL);
        }
        self.b.node(kind::REPEAT_STATEMENT_END, kids, at)
    }

    /// `single`, or `end` followed by `second`, wrapped in `node_kind`.
    fn closer(&mut self, single: &'static str, second: &'static str, node_kind: &'static str) -> NodeId {
        self.s.skip_trivia();
        let at = self.s.pos();
        let mut kids = Children::new();
        if self.s.peek_keyword(single) {
            kids.push(self.keyword(single));
        } else if self.s.peek_keyword_pair("end", second) {
            kids.push(self.keyword("end"));
            self.s.skip_inline_ws();
            kids.push(self.keyword(second));
        } else {
            kids.push(self.b.missing(single, false, at));
        }
        self.b.node(node_kind, kids, at)
    }

    // =========================================================================
    // Groups
    // =========================================================================

    fn group_type_ahead(&self) -> Option<&'static str> {
        GROUP_TYPES.iter().copied().find(|t| self.s.peek_keyword(t))
    }

    fn group_type(&mut self, ty: &'static str) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.keyword(ty));
        self.b.node(kind::GROUP_TYPE, kids, self.s.pos())
    }

    fn group_statement(&mut self, ty: &'static str) -> NodeId {
        let at = self.s.pos();
        let mut kids = Children::new();
        kids.field(field::TYPE, self.group_type(ty));
        if let Some(name) = self.text_content(TextMode::Line, |s| s.peek() == Some('#')) {
            kids.field(field::NAME, name);
        }
        self.s.skip_inline_ws();
        if self.s.peek() == Some('#') {
            kids.field(field::COLOR, self.color_value());
        }
        self.s.skip_inline_ws();
        if self.s.peek_str("{") {
            kids.push(self.keyword("{"));
            kids.field(field::BLOCK_STATEMENT_LIST, self.block());
            kids.push(self.expect("}"));
        } else {
            kids.field(field::BLOCK_STATEMENT_LIST, self.block());
            let closing = GROUP_TYPES
                .iter()
                .copied()
                .find(|t| self.s.peek_keyword_pair("end", t));
            match closing {
                Some(end_ty) => {
                    kids.push(self.keyword("end"));
                    self.s.skip_inline_ws();
                    kids.field(field::TYPE, self.group_type(end_ty));
                }
                None => kids.push(self.b.missing("end", false, self.s.pos())),
            }
        }
        self.b.node(kind::GROUP_STATEMENT, kids, at)
    }

    // =========================================================================
    // Terminal statements
    // =========================================================================

    fn terminal_statement(&mut self) -> Option<NodeId> {
        let inner = if self.s.peek_keyword("stop") {
            let mut kids = Children::new();
            kids.push(self.keyword("stop"));
            kids.push_opt(self.eat(";"));
            self.b.node(kind::STOP, kids, self.s.pos())
        } else if self.s.peek_keyword("break") {
            let start = self.s.pos();
            self.s.advance("break".len());
            self.b.leaf(kind::BREAK_STATEMENT, start, self.s.pos())
        } else if self.s.peek_keyword("label") || self.s.peek_keyword("goto") {
            self.goto_statement()
        } else if self.s.peek_keyword("note") || self.s.peek_keyword("floating") {
            self.note_statement()
        } else if self.s.peek_str("->") || self.s.peek_str("-->") || self.s.peek_str("-[") {
            self.arrow()
        } else if self.s.peek_str(":") {
            self.action_statement()
        } else {
            return None;
        };
        let mut kids = Children::new();
        kids.push(inner);
        Some(self.b.node(kind::TERMINAL_STATEMENT, kids, self.s.pos()))
    }

    fn goto_statement(&mut self) -> NodeId {
        let mut kids = Children::new();
        let keyword = if self.s.peek_keyword("label") { "label" } else { "goto" };
        kids.push(self.keyword(keyword));
        kids.field(field::NAME, self.identifier());
        kids.push_opt(self.eat(";"));
        self.b.node(kind::GOTO_STATEMENT, kids, self.s.pos())
    }

    fn note_statement(&mut self) -> NodeId {
        let mut kids = Children::new();
        if self.s.peek_keyword("floating") {
            kids.push(self.keyword("floating"));
        }
        kids.push(self.expect("note"));
        self.s.skip_inline_ws();
        if let Some(pos) = NOTE_POSITIONS.iter().copied().find(|p| self.s.peek_keyword(p)) {
            kids.field(field::POSITION, self.keyword(pos));
        }
        if let Some(colon) = self.eat(":") {
            kids.push(colon);
            let content = self.text_or_missing(TextMode::Raw);
            kids.field(field::CONTENT, content);
        } else {
            let content = self.text_or_missing(TextMode::Note);
            kids.field(field::CONTENT, content);
            self.s.skip_whitespace();
            if self.s.peek_keyword("endnote") {
                kids.push(self.keyword("endnote"));
            } else if self.s.peek_keyword_pair("end", "note") {
                kids.push(self.keyword("end"));
                self.s.skip_inline_ws();
                kids.push(self.keyword("note"));
            } else {
                kids.push(self.b.missing("endnote", false, self.s.pos()));
            }
        }
        self.b.node(kind::NOTE_STATEMENT, kids, self.s.pos())
    }

    fn arrow(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.field(field::ARROW, self.arrow_style());
        self.s.skip_inline_ws();
        if self.s.peek_str(":") {
            kids.push(self.action_statement());
        } else if !self.s.at_line_end() {
            let label = self.text_or_missing(TextMode::Action);
            kids.field(field::LABEL, label);
            kids.push(self.expect(";"));
        }
        self.b.node(kind::ARROW, kids, self.s.pos())
    }

    fn arrow_style(&mut self) -> NodeId {
        let mut kids = Children::new();
        if self.s.peek_str("-->") {
            kids.push(self.keyword("-->"));
        } else if self.s.peek_str("->") {
            kids.push(self.keyword("->"));
        } else {
            kids.push(self.keyword("-"));
            kids.push(self.expect("["));
            self.s.skip_inline_ws();
            if self.s.peek_keyword("hidden") {
                kids.push(self.keyword("hidden"));
            } else {
                kids.push(self.arrow_properties());
            }
            kids.push(self.expect("]"));
            match self.eat("-->") {
                Some(head) => kids.push(head),
                None => kids.push(self.expect("->")),
            }
        }
        self.b.node(kind::ARROW_STYLE, kids, self.s.pos())
    }

    fn arrow_properties(&mut self) -> NodeId {
        let at = self.s.pos();
        let mut kids = Children::new();
        loop {
            kids.push(self.arrow_property_element());
            match self.eat(",") {
                Some(comma) => kids.push(comma),
                None => break,
            }
            self.s.skip_inline_ws();
            if self.s.peek_str("]") {
                break;
            }
        }
        self.b.node(kind::ARROW_PROPERTIES, kids, at)
    }

    fn arrow_property_element(&mut self) -> NodeId {
        self.s.skip_inline_ws();
        let at = self.s.pos();
        let mut kids = Children::new();
        if let Some(flag) = ARROW_FLAGS.iter().copied().find(|f| self.s.peek_keyword(f)) {
            kids.push(self.keyword(flag));
        } else if self
            .s
            .peek()
            .is_some_and(|c| c == '#' || c.is_ascii_alphabetic())
        {
            kids.push(self.color_value());
        } else {
            return self.b.missing(kind::ARROW_PROPERTY_ELEMENT, true, at);
        }
        self.b.node(kind::ARROW_PROPERTY_ELEMENT, kids, at)
    }

    fn action_statement(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.keyword(":"));
        let action = self.text_or_missing(TextMode::Action);
        kids.field(field::ACTION, action);
        kids.push(self.expect(";"));
        self.b.node(kind::ACTION_STATEMENT, kids, self.s.pos())
    }

    // =========================================================================
    // Styling and metadata
    // =========================================================================

    fn define_statement(&mut self) -> Option<NodeId> {
        let inner = if self.s.peek_keyword("title") {
            let mut kids = Children::new();
            kids.push(self.keyword("title"));
            let text = self.text_or_missing(TextMode::Raw);
            kids.field(field::TEXT, text);
            self.b.node(kind::TITLE_STATEMENT, kids, self.s.pos())
        } else if self.s.peek_keyword("skinparam") {
            self.skinparam()
        } else if self.s.peek_str("<style>") {
            self.style_block()
        } else if self.s.peek_str("!pragma") {
            self.pragma()
        } else {
            return None;
        };
        let mut kids = Children::new();
        kids.push(inner);
        Some(self.b.node(kind::DEFINE_STATEMENT, kids, self.s.pos()))
    }

    fn skinparam(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.keyword("skinparam"));
        kids.field(field::ELEMENT, self.identifier());
        self.s.skip_inline_ws();
        let save = self.s.pos();
        if self.s.peek().is_some_and(is_identifier_start) {
            let (start, end) = self.s.eat_while(is_identifier_char);
            self.s.skip_inline_ws();
            if self.s.at_line_end() || self.s.peek_str(";") {
                self.s.rewind(save);
            } else {
                kids.field(field::PROPERTY, self.b.leaf(kind::IDENTIFIER, start, end));
            }
        }
        kids.field(field::VALUE, self.skinparam_value());
        kids.push_opt(self.eat(";"));
        self.b.node(kind::SKINPARAM, kids, self.s.pos())
    }

    fn skinparam_value(&mut self) -> NodeId {
        self.s.skip_inline_ws();
        let at = self.s.pos();
        let value = if self.s.peek() == Some('#') {
            Some(self.color_value())
        } else {
            self.text_content(TextMode::Line, |_| false)
        };
        match value {
            Some(value) => {
                let mut kids = Children::new();
                kids.push(value);
                self.b.node(kind::SKINPARAM_VALUE, kids, at)
            }
            None => self.b.missing(kind::SKINPARAM_VALUE, true, at),
        }
    }

    fn style_block(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.keyword("<style>"));
        loop {
            self.s.skip_trivia();
            if self.s.at_end() || self.s.peek_str("</style>") {
                break;
            }
            if self.s.peek().is_some_and(is_identifier_start) {
                kids.push(self.style_rule());
            } else {
                kids.push(self.error_line());
            }
        }
        kids.push(self.expect("</style>"));
        self.b.node(kind::STYLE_BLOCK, kids, self.s.pos())
    }

    fn style_rule(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.field(field::SELECTOR, self.identifier());
        self.s.skip_whitespace();
        kids.push(self.expect("{"));
        loop {
            self.s.skip_trivia();
            if self.s.at_end() || self.s.peek_str("}") {
                break;
            }
            if !self.s.peek().is_some_and(is_identifier_start) {
                kids.push(self.error_line());
                continue;
            }
            let save = self.s.pos();
            self.s.eat_while(is_identifier_char);
            self.s.skip_whitespace();
            let nested = self.s.peek_str("{");
            self.s.rewind(save);
            if nested && self.depth >= MAX_NESTING {
                kids.push(self.error_rest());
            } else if nested {
                self.depth += 1;
                kids.push(self.style_rule());
                self.depth -= 1;
            } else {
                kids.push(self.style_property());
            }
        }
        kids.push(self.expect("}"));
        self.b.node(kind::STYLE_RULE, kids, self.s.pos())
    }

    fn style_property(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.field(field::PROPERTY, self.identifier());
        kids.push_opt(self.eat(":"));
        let value = self.text_or_missing(TextMode::Line);
        kids.field(field::VALUE, value);
        kids.push_opt(self.eat(";"));
        self.b.node(kind::STYLE_PROPERTY, kids, self.s.pos())
    }

    fn pragma(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.keyword("!pragma"));
        kids.field(field::NAME, self.identifier());
        self.s.skip_inline_ws();
        if let Some(op) = ["=", "on", "off"].into_iter().find(|op| self.at(op)) {
            kids.field(field::OPERATOR, self.keyword(op));
        }
        if let Some(value) = self.text_content(TextMode::Raw, |_| false) {
            kids.field(field::VALUE, value);
        }
        self.b.node(kind::PRAGMA, kids, self.s.pos())
    }

    // =========================================================================
    // Lexical pieces
    // =========================================================================

    /// Words up to where `mode` ends or `stop` holds; `None` if there are none.
    fn text_content(
        &mut self,
        mode: TextMode,
        stop: impl Fn(&Scanner<'src>) -> bool,
    ) -> Option<NodeId> {
        let mut words = Children::new();
        let mut depth = 0usize;
        loop {
            if mode.multiline() {
                self.s.skip_whitespace();
            } else {
                self.s.skip_inline_ws();
            }
            let Some(c) = self.s.peek() else { break };
            if c == '\n' || mode.stops_at(c) || (mode == TextMode::Paren && c == ')' && depth == 0) {
                break;
            }
            if stop(&self.s) || (mode == TextMode::Note && self.at_note_end()) {
                break;
            }
            let start = self.s.pos();
            while let Some(c) = self.s.peek() {
                if c.is_whitespace() || mode.stops_at(c) {
                    break;
                }
                if mode == TextMode::Paren {
                    if c == '(' {
                        depth += 1;
                    } else if c == ')' {
                        if depth == 0 {
                            break;
                        }
                        depth -= 1;
                    }
                }
                self.s.bump();
            }
            words.push(self.b.leaf(kind::TEXT_WORD, start, self.s.pos()));
        }
        if words.is_empty() {
            None
        } else {
            Some(self.b.node(kind::TEXT_CONTENT, words, self.s.pos()))
        }
    }

    fn text_or_missing(&mut self, mode: TextMode) -> NodeId {
        match self.text_content(mode, |_| false) {
            Some(text) => text,
            None => self.b.missing(kind::TEXT_CONTENT, true, self.s.pos()),
        }
    }

    fn at_note_end(&self) -> bool {
        self.s.at_line_start()
            && (self.s.peek_keyword("endnote") || self.s.peek_keyword_pair("end", "note"))
    }

    fn identifier(&mut self) -> NodeId {
        self.s.skip_inline_ws();
        if self.s.peek().is_some_and(is_identifier_start) {
            let (start, end) = self.s.eat_while(is_identifier_char);
            self.b.leaf(kind::IDENTIFIER, start, end)
        } else {
            self.b.missing(kind::IDENTIFIER, true, self.s.pos())
        }
    }

    fn color_value(&mut self) -> NodeId {
        let at = self.s.pos();
        let mut kids = Children::new();
        kids.push(self.color_item());
        for sep in ["/", "\\"] {
            if self.s.peek_str(sep) {
                kids.push(self.keyword(sep));
                kids.push(self.color_item());
                break;
            }
        }
        self.b.node(kind::COLOR_VALUE, kids, at)
    }

    fn color_item(&mut self) -> NodeId {
        let start = self.s.pos();
        if self.s.peek() == Some('#') {
            self.s.bump();
            self.s.eat_while(|c| c.is_ascii_alphanumeric());
        } else {
            self.s.eat_while(|c| c.is_ascii_alphabetic());
        }
        if self.s.pos() == start {
            self.b.missing(kind::COLOR_VALUE_ITEM, true, start)
        } else {
            self.b.leaf(kind::COLOR_VALUE_ITEM, start, self.s.pos())
        }
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    fn at(&self, word: &str) -> bool {
        if word.starts_with(|c: char| c.is_ascii_alphabetic()) {
            self.s.peek_keyword(word)
        } else {
            self.s.peek_str(word)
        }
    }

    /// True if `word` is the only thing left on the line.
    fn at_bare(&self, word: &str) -> bool {
        if !self.s.peek_keyword(word) {
            return false;
        }
        let mut ahead = self.s;
        ahead.advance(word.len());
        ahead.at_line_end()
    }

    /// Consumes `word`, which the caller has already matched.
    fn keyword(&mut self, word: &'static str) -> NodeId {
        let start = self.s.pos();
        self.s.advance(word.len());
        self.b.token(word, start, self.s.pos())
    }

    fn eat(&mut self, word: &'static str) -> Option<NodeId> {
        self.s.skip_inline_ws();
        if self.at(word) {
            Some(self.keyword(word))
        } else {
            None
        }
    }

    fn expect(&mut self, word: &'static str) -> NodeId {
        match self.eat(word) {
            Some(id) => id,
            None => self.b.missing(word, false, self.s.pos()),
        }
    }
}
