//! Syntax tree to AST.
//!
//! The grammar binding produces a concrete tree for any input. A tree with
//! `ERROR` or `MISSING` nodes is rejected with a report of every problem;
//! otherwise the tree is walked into [`Diagram`].

use statecraft_foundation::{Error, Result};
use statecraft_grammar::{Language, Node, Parser, SyntaxDiagnostic, Tree};
use statecraft_grammar_ad::{LANGUAGE, field, kind};
use tracing::{debug, trace};

use crate::ast::{Ast, AstKind, CondBody, Condition, Diagram, IfElseBlock, Loop};

/// Parses activity diagrams into [`Diagram`]s.
#[derive(Debug)]
pub struct AdParser {
    parser: Parser,
}

impl AdParser {
    /// Loads the activity diagram grammar.
    ///
    /// # Errors
    /// Returns a language load error if the runtime rejects the grammar.
    pub fn new() -> Result<Self> {
        Self::with_language(&LANGUAGE.into())
    }

    /// Builds a parser around an explicit grammar handle.
    ///
    /// # Errors
    /// Returns `Error loading ActivityDiagram grammar` if the runtime rejects `language`.
    pub(crate) fn with_language(language: &Language) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|e| Error::language_load(format!("Error loading ActivityDiagram grammar: {e}")))?;
        Ok(Self { parser })
    }

    /// Parses a diagram.
    ///
    /// # Errors
    /// Returns a parse error describing the first syntax problem; its
    /// context holds the report of every problem found.
    pub fn parse(&self, source: &str) -> Result<Diagram> {
        let tree = self
            .parser
            .parse(source)
            .map_err(|e| Error::language_load(e.to_string()))?;
        ensure_well_formed(&tree)?;
        let diagram = document(tree.root_node());
        debug!(statements = diagram.body.len(), "parsed activity diagram");
        Ok(diagram)
    }
}

/// Fails with a parse error if the tree holds any `ERROR` or `MISSING` node.
fn ensure_well_formed(tree: &Tree) -> Result<()> {
    let diagnostics = SyntaxDiagnostic::collect(tree);
    let Some(first) = diagnostics.first() else {
        return Ok(());
    };
    for diagnostic in &diagnostics {
        debug!(line = diagnostic.line(), "{}", diagnostic.message());
    }
    let report = diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n");
    Err(Error::parse(first.message(), first.line(), first.column(), report))
}

// =========================================================================
// Tree walk
// =========================================================================

fn document(root: Node<'_>) -> Diagram {
    let mut diagram = Diagram::default();
    for child in root.children() {
        match child.kind() {
            kind::STARTUML_DIRECTIVE => {
                diagram.title = child.named_children().next().map(|t| t.text().to_string());
            }
            "end" => diagram.body.push(Ast::new(AstKind::Stop, child.span())),
            "start" | kind::ENDUML_DIRECTIVE => {}
            _ => statement(child, &mut diagram.body),
        }
    }
    diagram
}

fn block(node: Option<Node<'_>>) -> Vec<Ast> {
    let mut out = Vec::new();
    if let Some(node) = node {
        for child in node.named_children() {
            statement(child, &mut out);
        }
    }
    out
}

fn statement(node: Node<'_>, out: &mut Vec<Ast>) {
    let span = node.span();
    match node.kind() {
        kind::IF_STATEMENT => out.push(Ast::new(AstKind::IfElse(if_else(node)), span)),
        kind::SWITCH_STATEMENT => {
            let cases = node
                .named_children()
                .filter(|c| c.kind() == kind::CASE_CLAUSE)
                .map(|c| cond_body(c, None))
                .collect();
            let expr = condition(node.child_by_field_name(field::EXPRESSION));
            out.push(Ast::new(AstKind::Case { expr, cases }, span));
        }
        kind::WHILE_STATEMENT => {
            let lp = Loop {
                cond: Some(condition(node.child_by_field_name(field::EXPRESSION))),
                label: text_of(node, field::LABEL),
                exit_label: text_of(node, field::EXIT_LABEL),
                body: block(node.child_by_field_name(field::BLOCK_STATEMENT_LIST)),
            };
            out.push(Ast::new(AstKind::While(lp), span));
        }
        kind::REPEAT_STATEMENT => {
            let end = node.child_of_kind(kind::REPEAT_STATEMENT_END);
            let lp = Loop {
                cond: end
                    .and_then(|e| e.child_by_field_name(field::EXPRESSION))
                    .map(|e| condition(Some(e))),
                label: end.and_then(|e| text_of(e, field::LABEL)),
                exit_label: end.and_then(|e| text_of(e, field::EXIT_LABEL)),
                body: block(node.child_by_field_name(field::BLOCK_STATEMENT_LIST)),
            };
            out.push(Ast::new(AstKind::Repeat(lp), span));
        }
        kind::GROUP_STATEMENT => {
            for body in node.children_by_field_name(field::BLOCK_STATEMENT_LIST) {
                out.extend(block(Some(body)));
            }
        }
        kind::TERMINAL_STATEMENT => {
            if let Some(inner) = node.named_children().next() {
                terminal(inner, out);
            }
        }
        other => trace!(kind = other, "dropped"),
    }
}

fn terminal(node: Node<'_>, out: &mut Vec<Ast>) {
    let span = node.span();
    match node.kind() {
        kind::STOP => out.push(Ast::new(AstKind::Stop, span)),
        kind::BREAK_STATEMENT => out.push(Ast::new(AstKind::Break, span)),
        kind::GOTO_STATEMENT => {
            let name = text_of(node, field::NAME).unwrap_or_default();
            let is_label = node.child(0).is_some_and(|k| k.kind() == "label");
            let stmt = if is_label {
                AstKind::Label(name)
            } else {
                AstKind::Goto(name)
            };
            out.push(Ast::new(stmt, span));
        }
        kind::ARROW => {
            out.push(Ast::new(AstKind::Arrow(text_of(node, field::LABEL)), span));
            if let Some(inner) = node.child_of_kind(kind::ACTION_STATEMENT) {
                out.push(action(inner));
            }
        }
        kind::ACTION_STATEMENT => out.push(action(node)),
        other => trace!(kind = other, "dropped"),
    }
}

fn action(node: Node<'_>) -> Ast {
    let text = node
        .child_by_field_name(field::ACTION)
        .map(|t| normalize(t.text()))
        .unwrap_or_default();
    let stmt = match activity_name(&text) {
        Some(name) => AstKind::ActivityRef(name.to_string()),
        None => AstKind::Action(text),
    };
    Ast::new(stmt, node.span())
}

/// `activity Name` with a single identifier after the keyword.
fn activity_name(text: &str) -> Option<&str> {
    let name = text.strip_prefix("activity ")?.trim();
    let valid = name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then_some(name)
}

fn if_else(node: Node<'_>) -> IfElseBlock {
    let mut result = IfElseBlock {
        branches: Vec::new(),
        else_branch: None,
    };
    for child in node.named_children() {
        match child.kind() {
            kind::IF_CONDITION | kind::ELSEIF_CONDITION => {
                result.branches.push(cond_body(child, text_of(child, field::LABEL)));
            }
            kind::ELSE_CONDITION => {
                let body = block(child.child_by_field_name(field::BLOCK_STATEMENT_LIST));
                result.else_branch = Some((text_of(child, field::LABEL), body));
            }
            _ => {}
        }
    }
    result
}

fn cond_body(node: Node<'_>, label: Option<String>) -> CondBody {
    CondBody::new(
        condition(node.child_by_field_name(field::EXPRESSION)),
        label,
        block(node.child_by_field_name(field::BLOCK_STATEMENT_LIST)),
    )
}

fn condition(expr: Option<Node<'_>>) -> Condition {
    let Some(expr) = expr else {
        return Condition::Text(String::new());
    };
    if let Some(name) = expr.child_by_field_name(field::ACTIVITY_IDENTIFIER) {
        return Condition::Activity(name.text().to_string());
    }
    let text = expr
        .child_by_field_name(field::EXPRESSION_CONTENT)
        .map_or("", |t| t.text());
    Condition::Text(normalize(text))
}

fn text_of(node: Node<'_>, name: &str) -> Option<String> {
    node.child_by_field_name(name).map(|t| normalize(t.text()))
}

/// Trims every line and drops blank ones.
fn normalize(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
