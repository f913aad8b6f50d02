//! Recursive-descent parser for SCL.
//!
//! Declarations and statements are chosen by their leading keyword;
//! conditions and expressions use precedence climbing. Unexpected tokens are
//! wrapped in `ERROR` nodes up to a point where parsing can resume, and
//! absent tokens become `MISSING` nodes.

use statecraft_grammar::{Children, Language, NodeId, Tree, TreeBuilder};

use crate::lexer::{Tok, Token, tokenize};
use crate::{field, kind};

/// Words with a fixed meaning; error recovery keeps them as tokens.
const KEYWORDS: [&str; 35] = [
    "type",
    "context",
    "state",
    "uses",
    "use",
    "precondition",
    "pre",
    "let",
    "select",
    "from",
    "foreach",
    "in",
    "update",
    "set",
    "insert",
    "into",
    "values",
    "delete",
    "where",
    "limit",
    "assert",
    "commit",
    "next",
    "when",
    "otherwise",
    "export",
    "Relation",
    "by",
    "true",
    "false",
    "null",
    "int",
    "bool",
    "string",
    "float",
];

const STATEMENT_KEYWORDS: [&str; 8] = [
    "let", "select", "foreach", "update", "insert", "delete", "assert", "commit",
];

const PRIMITIVE_TYPES: [&str; 4] = ["int", "bool", "string", "float"];

/// Deepest nesting of blocks and expressions parsed; anything below becomes
/// one `ERROR` node.
const MAX_NESTING: usize = 256;

const PREC_IMPLIES: u8 = 1;
const PREC_OR: u8 = 2;
const PREC_AND: u8 = 3;
const PREC_EQ: u8 = 4;
const PREC_REL: u8 = 5;
const PREC_ADD: u8 = 6;
const PREC_MUL: u8 = 7;

/// Parse entry point registered in the language tables.
pub(crate) fn parse(language: Language, source: &str) -> Tree {
    let mut parser = SclParser {
        src: source,
        tokens: tokenize(source),
        pos: 0,
        b: TreeBuilder::new(source),
        depth: 0,
    };
    let root = parser.program();
    parser.b.finish(language, root)
}

struct SclParser<'src> {
    src: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    b: TreeBuilder<'src>,
    depth: usize,
}

impl SclParser<'_> {
    // =========================================================================
    // Program and declarations
    // =========================================================================

    fn program(&mut self) -> NodeId {
        let mut kids = Children::new();
        while !self.at_eof() {
            if self.at("type") {
                kids.push(self.type_decl());
            } else if self.at("context") {
                kids.push(self.context_decl());
            } else if self.at("state") {
                kids.push(self.state_decl());
            } else {
                kids.push(self.error_until(|p| p.at_decl_start(), false));
            }
        }
        self.b.node(kind::PROGRAM, kids, 0)
    }

    /// A declaration keyword followed by a name; used to stop recovery.
    fn at_decl_start(&self) -> bool {
        ["type", "context", "state"].iter().any(|k| self.at(k))
            && self.nth(1).tok == Tok::Ident
    }

    fn type_decl(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.bump("type"));
        kids.field(field::NAME, self.identifier());
        kids.push(self.expect("{"));
        self.typed_fields(&mut kids, kind::TYPE_FIELD);
        kids.push(self.expect("}"));
        self.b.node(kind::TYPE_DECL, kids, self.gap())
    }

    fn context_decl(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.bump("context"));
        kids.field(field::NAME, self.identifier());
        kids.push(self.expect("{"));
        self.typed_fields(&mut kids, kind::CONTEXT_FIELD);
        kids.push(self.expect("}"));
        self.b.node(kind::CONTEXT_DECL, kids, self.gap())
    }

    /// `name: Type;` entries up to the closing brace.
    fn typed_fields(&mut self, kids: &mut Children, node_kind: &'static str) {
        loop {
            if self.at_eof() || self.at("}") || self.at_decl_start() {
                return;
            }
            if self.peek().tok == Tok::Ident {
                kids.push(self.typed_field(node_kind));
            } else {
                kids.push(self.error_until(|p| p.at("}") || p.peek().tok == Tok::Ident, true));
            }
        }
    }

    fn typed_field(&mut self, node_kind: &'static str) -> NodeId {
        let mut kids = Children::new();
        kids.field(field::NAME, self.identifier());
        kids.push(self.expect(":"));
        kids.field(field::TYPE, self.ty());
        kids.push(self.expect(";"));
        self.b.node(node_kind, kids, self.gap())
    }

    fn state_decl(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.bump("state"));
        kids.field(field::NAME, self.identifier());
        kids.push(self.expect("uses"));
        kids.field(field::USES, self.identifier());
        while self.at(",") {
            kids.push(self.bump(","));
            kids.field(field::USES, self.identifier());
        }
        kids.push(self.expect("{"));

        while self.at("use") {
            kids.push(self.use_stmt());
        }
        if self.at("precondition") || self.at("pre") {
            kids.push(self.precondition_block());
        }
        self.statements(&mut kids, |p| p.at("next"));
        if self.at("next") {
            kids.push(self.next_block());
        } else {
            kids.push(self.b.missing(kind::NEXT_BLOCK, true, self.gap()));
        }
        kids.push(self.expect("}"));
        self.b.node(kind::STATE_DECL, kids, self.gap())
    }

    // =========================================================================
    // use
    // =========================================================================

    fn use_stmt(&mut self) -> NodeId {
        let inner = match self.nth(1) {
            t if self.token_is(t, "state") => self.use_state_stmt(),
            t if self.token_is(t, "context") => {
                self.use_named(kind::USE_CONTEXT_STMT, "context", field::CONTEXT)
            }
            t if self.token_is(t, "type") => self.use_named(kind::USE_TYPE_STMT, "type", field::TYPE),
            _ => self.error_until(|p| p.at("use") || p.at("}"), true),
        };
        let mut kids = Children::new();
        kids.push(inner);
        self.b.node(kind::USE_STMT, kids, self.gap())
    }

    fn use_state_stmt(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.bump("use"));
        kids.push(self.bump("state"));
        kids.field(field::SOURCE, self.qualified_name());
        kids.push(self.expect("{"));
        self.typed_fields(&mut kids, kind::USE_FIELD);
        kids.push(self.expect("}"));
        self.b.node(kind::USE_STATE_STMT, kids, self.gap())
    }

    fn use_named(
        &mut self,
        node_kind: &'static str,
        keyword: &'static str,
        name_field: &'static str,
    ) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.bump("use"));
        kids.push(self.bump(keyword));
        kids.field(name_field, self.qualified_name());
        kids.push(self.expect(";"));
        self.b.node(node_kind, kids, self.gap())
    }

    fn qualified_name(&mut self) -> NodeId {
        let mut kids = Children::new();
        if self.peek().tok == Tok::Str {
            kids.push(self.leaf(kind::STRING));
            kids.push(self.expect("::"));
        }
        kids.push(self.identifier());
        self.b.node(kind::QUALIFIED_NAME, kids, self.gap())
    }

    // =========================================================================
    // Precondition and statements
    // =========================================================================

    fn precondition_block(&mut self) -> NodeId {
        let mut kids = Children::new();
        let keyword = if self.at("pre") { "pre" } else { "precondition" };
        kids.push(self.bump(keyword));
        kids.push(self.expect("{"));
        while !(self.at_eof() || self.at("}") || self.at_decl_start()) {
            let before = self.pos;
            kids.push(self.condition(false));
            kids.push(self.expect(";"));
            if self.pos == before {
                kids.push(self.error_until(|p| p.at("}"), true));
            }
        }
        kids.push(self.expect("}"));
        self.b.node(kind::PRECONDITION_BLOCK, kids, self.gap())
    }

    /// Statements until `}` or a token `stop` accepts.
    fn statements(&mut self, kids: &mut Children, stop: impl Fn(&Self) -> bool) {
        loop {
            if self.at_eof() || self.at("}") || stop(self) || self.at_decl_start() {
                return;
            }
            if STATEMENT_KEYWORDS.iter().any(|k| self.at(k)) {
                kids.push(self.statement());
            } else {
                kids.push(self.error_until(
                    |p| p.at("}") || p.at("next") || STATEMENT_KEYWORDS.iter().any(|k| p.at(k)),
                    true,
                ));
            }
        }
    }

    fn statement(&mut self) -> NodeId {
        let inner = if self.at("let") {
            self.let_stmt()
        } else if self.at("select") {
            self.select_stmt()
        } else if self.at("foreach") {
            self.foreach_stmt()
        } else if self.at("update") {
            self.update_stmt()
        } else if self.at("insert") {
            self.insert_stmt()
        } else if self.at("delete") {
            self.delete_stmt()
        } else if self.at("assert") {
            let mut kids = Children::new();
            kids.push(self.bump("assert"));
            kids.push(self.expr());
            kids.push(self.expect(";"));
            self.b.node(kind::ASSERT_STMT, kids, self.gap())
        } else {
            let mut kids = Children::new();
            kids.push(self.expect("commit"));
            kids.push(self.expect(";"));
            self.b.node(kind::COMMIT_STMT, kids, self.gap())
        };
        let mut kids = Children::new();
        kids.push(inner);
        self.b.node(kind::STATEMENT, kids, self.gap())
    }

    fn let_stmt(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.bump("let"));
        kids.field(field::NAME, self.identifier());
        kids.push(self.expect(":"));
        kids.field(field::TYPE, self.ty());
        kids.push(self.expect("="));
        kids.field(field::VALUE, self.expr());
        kids.push(self.expect(";"));
        self.b.node(kind::LET_STMT, kids, self.gap())
    }

    fn select_stmt(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.bump("select"));
        kids.field(field::NAME, self.identifier());
        kids.push(self.expect(":"));
        kids.field(field::TYPE, self.ty());
        kids.push(self.expect("from"));
        kids.field(field::ENTITY, self.identifier());
        kids.push_opt(self.where_clause());
        if self.at("limit") {
            let mut limit = Children::new();
            limit.push(self.bump("limit"));
            if self.peek().tok == Tok::Number {
                limit.push(self.leaf(kind::NUMBER));
            } else {
                limit.push(self.b.missing(kind::NUMBER, true, self.gap()));
            }
            kids.push(self.b.node(kind::LIMIT_CLAUSE, limit, self.gap()));
        }
        kids.push(self.expect(";"));
        self.b.node(kind::SELECT_STMT, kids, self.gap())
    }

    fn foreach_stmt(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.bump("foreach"));
        kids.field(field::ITEM, self.identifier());
        kids.push(self.expect(":"));
        kids.field(field::ITEM_TYPE, self.ty());
        kids.push(self.expect("in"));
        kids.field(field::COLLECTION, self.identifier());
        kids.push(self.expect("{"));
        if self.depth < MAX_NESTING {
            self.depth += 1;
            self.statements(&mut kids, |p| p.at("next"));
            self.depth -= 1;
        } else {
            kids.push(self.error_rest());
        }
        kids.push(self.expect("}"));
        self.b.node(kind::FOREACH_STMT, kids, self.gap())
    }

    fn update_stmt(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.bump("update"));
        kids.field(field::ENTITY, self.identifier());
        kids.push(self.expect("set"));
        kids.push(self.assignment());
        while self.at(",") {
            kids.push(self.bump(","));
            kids.push(self.assignment());
        }
        kids.push_opt(self.where_clause());
        kids.push(self.expect(";"));
        self.b.node(kind::UPDATE_STMT, kids, self.gap())
    }

    fn assignment(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.field(field::FIELD, self.identifier());
        kids.push(self.expect("="));
        kids.field(field::VALUE, self.expr());
        self.b.node(kind::ASSIGNMENT, kids, self.gap())
    }

    fn insert_stmt(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.bump("insert"));
        kids.push(self.expect("into"));
        kids.field(field::ENTITY, self.identifier());
        kids.push(self.expect("("));
        if !self.at(")") {
            kids.field(field::COLUMN, self.identifier());
            while self.at(",") {
                kids.push(self.bump(","));
                kids.field(field::COLUMN, self.identifier());
            }
        }
        kids.push(self.expect(")"));
        kids.push(self.expect("values"));
        kids.push(self.expect("("));
        if !self.at(")") {
            kids.field(field::VALUE, self.expr());
            while self.at(",") {
                kids.push(self.bump(","));
                kids.field(field::VALUE, self.expr());
            }
        }
        kids.push(self.expect(")"));
        kids.push(self.expect(";"));
        self.b.node(kind::INSERT_STMT, kids, self.gap())
    }

    fn delete_stmt(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.bump("delete"));
        kids.push(self.expect("from"));
        kids.field(field::ENTITY, self.identifier());
        kids.push_opt(self.where_clause());
        kids.push(self.expect(";"));
        self.b.node(kind::DELETE_STMT, kids, self.gap())
    }

    fn where_clause(&mut self) -> Option<NodeId> {
        if !self.at("where") {
            return None;
        }
        let mut kids = Children::new();
        kids.push(self.bump("where"));
        kids.push(self.expr());
        Some(self.b.node(kind::WHERE_CLAUSE, kids, self.gap()))
    }

    // =========================================================================
    // next
    // =========================================================================

    fn next_block(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.bump("next"));
        kids.push(self.expect("{"));
        loop {
            if self.at("when") || self.at("otherwise") {
                kids.push(self.next_case());
            } else if self.at_eof() || self.at("}") || self.at_decl_start() {
                break;
            } else {
                kids.push(self.error_until(|p| p.at("when") || p.at("otherwise") || p.at("}"), false));
            }
        }
        kids.push(self.expect("}"));
        self.b.node(kind::NEXT_BLOCK, kids, self.gap())
    }

    fn next_case(&mut self) -> NodeId {
        let mut kids = Children::new();
        if self.at("when") {
            kids.push(self.bump("when"));
            kids.push(self.condition(true));
        } else {
            kids.push(self.bump("otherwise"));
        }
        kids.push(self.expect("=>"));
        kids.field(field::TARGET, self.identifier());
        if self.at("{") {
            kids.push(self.edge_export_block());
        }
        self.b.node(kind::NEXT_CASE, kids, self.gap())
    }

    fn edge_export_block(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.bump("{"));
        kids.push(self.expect("export"));
        self.typed_fields(&mut kids, kind::EDGE_FIELD);
        kids.push(self.expect("}"));
        self.b.node(kind::EDGE_EXPORT_BLOCK, kids, self.gap())
    }

    /// True at the `=>` that separates a case condition from its target.
    fn at_case_arrow(&self) -> bool {
        self.at("=>")
            && self.nth(1).tok == Tok::Ident
            && {
                let after = self.nth(2);
                after.tok == Tok::Eof
                    || ["when", "otherwise", "{", "}"]
                        .iter()
                        .any(|w| self.token_is(after, w))
            }
    }

    // =========================================================================
    // Conditions
    // =========================================================================

    fn condition(&mut self, in_case: bool) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.tla_expr(PREC_IMPLIES, in_case));
        self.b.node(kind::CONDITION, kids, self.gap())
    }

    fn tla_expr(&mut self, min_prec: u8, in_case: bool) -> NodeId {
        let mut lhs = self.tla_unary(in_case);
        loop {
            let (op, prec) = if self.at("=>") {
                ("=>", PREC_IMPLIES)
            } else if self.at("\\/") {
                ("\\/", PREC_OR)
            } else if self.at("/\\") {
                ("/\\", PREC_AND)
            } else {
                break;
            };
            if prec < min_prec || (in_case && self.at_case_arrow()) {
                break;
            }
            let mut kids = Children::new();
            kids.field(field::LEFT, lhs);
            kids.field(field::OPERATOR, self.bump(op));
            kids.field(field::RIGHT, self.tla_expr(prec + 1, in_case));
            let binary = self.b.node(kind::TLA_BINARY_EXPR, kids, self.gap());
            lhs = self.wrap(kind::TLA_EXPR, binary);
        }
        lhs
    }

    fn tla_unary(&mut self, in_case: bool) -> NodeId {
        let inner = if self.at("~") {
            let mut kids = Children::new();
            kids.field(field::OPERATOR, self.bump("~"));
            kids.field(field::OPERAND, self.nested(|p| p.tla_unary(in_case)));
            self.b.node(kind::TLA_UNARY_EXPR, kids, self.gap())
        } else if self.at("\\E") || self.at("\\A") {
            self.tla_quantifier(in_case)
        } else {
            self.expr()
        };
        self.wrap(kind::TLA_EXPR, inner)
    }

    fn tla_quantifier(&mut self, in_case: bool) -> NodeId {
        let mut kids = Children::new();
        let quantifier = if self.at("\\E") { "\\E" } else { "\\A" };
        kids.push(self.bump(quantifier));
        kids.push(self.expect("Relation"));
        kids.field(field::RELATION, self.identifier());
        kids.field(field::VAR, self.identifier());
        kids.push(self.expect("by"));
        kids.field(field::BINDING, self.expr());
        kids.push(self.expect(":"));
        kids.field(field::BODY, self.nested(|p| p.tla_expr(PREC_IMPLIES, in_case)));
        self.b.node(kind::TLA_QUANTIFIER, kids, self.gap())
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expr(&mut self) -> NodeId {
        self.expr_prec(PREC_EQ)
    }

    fn binary_op(&self) -> Option<(&'static str, u8)> {
        let Tok::Punct(op) = self.peek().tok else {
            return None;
        };
        let prec = match op {
            "=" | "#" | "==" | "!=" => PREC_EQ,
            "<" | "<=" | ">" | ">=" => PREC_REL,
            "+" | "-" => PREC_ADD,
            "*" | "/" => PREC_MUL,
            _ => return None,
        };
        Some((op, prec))
    }

    fn expr_prec(&mut self, min_prec: u8) -> NodeId {
        let mut lhs = self.unary();
        while let Some((op, prec)) = self.binary_op() {
            if prec < min_prec {
                break;
            }
            let mut kids = Children::new();
            kids.field(field::LEFT, lhs);
            kids.field(field::OPERATOR, self.bump(op));
            kids.field(field::RIGHT, self.expr_prec(prec + 1));
            let binary = self.b.node(kind::BINARY_EXPR, kids, self.gap());
            lhs = self.wrap(kind::EXPR, binary);
        }
        lhs
    }

    fn unary(&mut self) -> NodeId {
        let op = if self.at("!") {
            "!"
        } else if self.at("-") {
            "-"
        } else {
            return self.primary();
        };
        let mut kids = Children::new();
        kids.field(field::OPERATOR, self.bump(op));
        kids.field(field::OPERAND, self.nested(Self::unary));
        let unary = self.b.node(kind::UNARY_EXPR, kids, self.gap());
        self.wrap(kind::EXPR, unary)
    }

    fn primary(&mut self) -> NodeId {
        let token = self.peek();
        let inner = match token.tok {
            Tok::Punct("(") => {
                let mut kids = Children::new();
                kids.push(self.bump("("));
                kids.push(self.nested(Self::expr));
                kids.push(self.expect(")"));
                return self.b.node(kind::EXPR, kids, self.gap());
            }
            Tok::Punct("{") => self.nested(Self::struct_literal),
            Tok::Number => {
                let number = self.leaf(kind::NUMBER);
                self.wrap(kind::LITERAL, number)
            }
            Tok::Str => {
                let string = self.leaf(kind::STRING);
                self.wrap(kind::LITERAL, string)
            }
            Tok::Ident if self.at("true") || self.at("false") => {
                let word = if self.at("true") { "true" } else { "false" };
                let boolean = self.bump(word);
                let boolean = self.wrap(kind::BOOLEAN, boolean);
                self.wrap(kind::LITERAL, boolean)
            }
            Tok::Ident if self.at("null") => {
                let null = self.bump("null");
                self.wrap(kind::LITERAL, null)
            }
            Tok::Ident if self.token_is(self.nth(1), ".") => {
                let mut kids = Children::new();
                kids.field(field::OBJECT, self.identifier());
                kids.push(self.bump("."));
                kids.field(field::FIELD, self.identifier());
                self.b.node(kind::FIELD_ACCESS, kids, self.gap())
            }
            Tok::Ident => self.identifier(),
            _ => return self.b.missing(kind::EXPR, true, self.gap()),
        };
        self.wrap(kind::EXPR, inner)
    }

    fn struct_literal(&mut self) -> NodeId {
        let mut kids = Children::new();
        kids.push(self.bump("{"));
        loop {
            let mut entry = Children::new();
            entry.field(field::NAME, self.identifier());
            entry.push(self.expect(":"));
            entry.field(field::VALUE, self.expr());
            kids.push(self.b.node(kind::STRUCT_FIELD, entry, self.gap()));
            if !self.at(",") {
                break;
            }
            kids.push(self.bump(","));
        }
        kids.push(self.expect("}"));
        self.b.node(kind::STRUCT_LITERAL, kids, self.gap())
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn ty(&mut self) -> NodeId {
        if self.peek().tok != Tok::Ident {
            return self.b.missing(kind::TYPE, true, self.gap());
        }
        let inner = if let Some(prim) = PRIMITIVE_TYPES.into_iter().find(|p| self.at(p)) {
            let word = self.bump(prim);
            self.wrap(kind::PRIMITIVE_TYPE, word)
        } else if self.token_is(self.nth(1), "[") {
            let mut kids = Children::new();
            kids.field(field::BASE, self.identifier());
            kids.push(self.bump("["));
            kids.field(field::PARAM, self.nested(Self::ty));
            kids.push(self.expect("]"));
            self.b.node(kind::GENERIC_TYPE, kids, self.gap())
        } else {
            self.identifier()
        };
        self.wrap(kind::TYPE, inner)
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    fn peek(&self) -> Token {
        self.nth(0)
    }

    fn nth(&self, n: usize) -> Token {
        let last = self.tokens.len() - 1;
        self.tokens[(self.pos + n).min(last)]
    }

    fn at_eof(&self) -> bool {
        self.peek().tok == Tok::Eof
    }

    fn token_is(&self, token: Token, word: &str) -> bool {
        match token.tok {
            Tok::Ident => &self.src[token.start..token.end] == word,
            Tok::Punct(p) => p == word,
            _ => false,
        }
    }

    fn at(&self, word: &str) -> bool {
        self.token_is(self.peek(), word)
    }

    /// End of the previous token; where `MISSING` nodes are placed.
    fn gap(&self) -> usize {
        match self.pos.checked_sub(1) {
            Some(prev) => self.tokens[prev].end,
            None => 0,
        }
    }

    /// Consumes the current token as an anonymous `word` node.
    fn bump(&mut self, word: &'static str) -> NodeId {
        let token = self.peek();
        self.pos += 1;
        self.b.token(word, token.start, token.end)
    }

    /// Consumes the current token as a named leaf.
    fn leaf(&mut self, node_kind: &'static str) -> NodeId {
        let token = self.peek();
        self.pos += 1;
        self.b.leaf(node_kind, token.start, token.end)
    }

    fn expect(&mut self, word: &'static str) -> NodeId {
        if self.at(word) {
            self.bump(word)
        } else {
            self.b.missing(word, false, self.gap())
        }
    }

    fn identifier(&mut self) -> NodeId {
        if self.peek().tok == Tok::Ident {
            self.leaf(kind::IDENTIFIER)
        } else {
            self.b.missing(kind::IDENTIFIER, true, self.gap())
        }
    }

    fn wrap(&mut self, node_kind: &'static str, child: NodeId) -> NodeId {
        let mut kids = Children::new();
        kids.push(child);
        self.b.node(node_kind, kids, self.gap())
    }

    /// Runs `parse` one level deeper, or swallows the rest of the input as an
    /// `ERROR` node once nesting reaches [`MAX_NESTING`].
    fn nested(&mut self, parse: impl FnOnce(&mut Self) -> NodeId) -> NodeId {
        if self.depth >= MAX_NESTING {
            return self.error_rest();
        }
        self.depth += 1;
        let node = parse(self);
        self.depth -= 1;
        node
    }

    fn error_rest(&mut self) -> NodeId {
        self.error_until(|_| false, false)
    }

    /// Wraps at least one token in an `ERROR` node, stopping before a token
    /// `stop` accepts or, with `through_semicolon`, after a `;`.
    fn error_until(&mut self, stop: impl Fn(&Self) -> bool, through_semicolon: bool) -> NodeId {
        let first = self.peek().start;
        let mut kids = Children::new();
        let mut consumed = false;
        while !self.at_eof() && !(consumed && stop(self)) {
            let semicolon = self.at(";");
            let token = self.peek();
            let node = match token.tok {
                Tok::Ident => match KEYWORDS.into_iter().find(|k| self.at(k)) {
                    Some(keyword) => Some(self.bump(keyword)),
                    None => Some(self.leaf(kind::IDENTIFIER)),
                },
                Tok::Number => Some(self.leaf(kind::NUMBER)),
                Tok::Str => Some(self.leaf(kind::STRING)),
                Tok::Punct(p) => Some(self.bump(p)),
                Tok::Unknown | Tok::Eof => {
                    self.pos += 1;
                    None
                }
            };
            kids.push_opt(node);
            consumed = true;
            if semicolon && through_semicolon {
                break;
            }
        }
        self.b.error(kids, first, self.gap().max(first))
    }
}
