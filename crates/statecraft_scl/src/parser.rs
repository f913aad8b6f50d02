//! Syntax tree to AST.
//!
//! Syntax errors are reported the same way as for activity diagrams: every
//! `ERROR` and `MISSING` node goes into the report, the first one decides the
//! position. A well-formed tree can still hold values the AST rejects (empty
//! types, integer literals that overflow); those fail with the position of
//! the offending node.

use statecraft_foundation::{Error, ErrorContext, Result};
use statecraft_grammar::{Language, Node, Parser, SyntaxDiagnostic, Tree};
use statecraft_grammar_scl::{LANGUAGE, field, kind};
use tracing::{debug, trace};

use crate::ast::{
    Assignment, BinaryOp, CompareOp, Condition, ContextDecl, Expr, Field, Literal, Name,
    NextBlock, NextCase, PrimitiveType, Program, QualifiedName, QuantifierKind, StateDecl, Stmt,
    Type, TypeDecl, UnaryOp, UseStmt,
};

/// Parses SCL source into [`Program`]s.
#[derive(Debug)]
pub struct SclParser {
    parser: Parser,
}

impl SclParser {
    /// Loads the SCL grammar.
    ///
    /// # Errors
    /// Returns a language load error if the runtime rejects the grammar.
    pub fn new() -> Result<Self> {
        Self::with_language(&LANGUAGE.into())
    }

    /// Builds a parser around an explicit grammar handle.
    ///
    /// # Errors
    /// Returns `Error loading SCL grammar` if the runtime rejects `language`.
    pub(crate) fn with_language(language: &Language) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|e| Error::language_load(format!("Error loading SCL grammar: {e}")))?;
        Ok(Self { parser })
    }

    /// Parses a program.
    ///
    /// # Errors
    /// Returns a parse error for malformed syntax, or an invalid item error
    /// for a well-formed declaration the AST does not accept.
    pub fn parse(&self, source: &str) -> Result<Program> {
        let tree = self
            .parser
            .parse(source)
            .map_err(|e| Error::language_load(e.to_string()))?;
        ensure_well_formed(&tree)?;
        let program = program(tree.root_node())?;
        debug!(
            types = program.types.len(),
            contexts = program.contexts.len(),
            states = program.states.len(),
            "parsed SCL program"
        );
        Ok(program)
    }
}

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

/// Attaches the position of `node` to an error raised while converting it.
fn located(node: Node<'_>, err: Error) -> Error {
    let span = node.span();
    err.with_context(
        ErrorContext::new().with_position(span.line as usize, span.column as usize),
    )
}

fn malformed(node: Node<'_>, what: &str) -> Error {
    located(
        node,
        Error::internal(format!("{} node without {what}", node.kind())),
    )
}

fn required<'t>(node: Node<'t>, name: &str) -> Result<Node<'t>> {
    node.child_by_field_name(name)
        .ok_or_else(|| malformed(node, name))
}

fn first_named(node: Node<'_>) -> Result<Node<'_>> {
    node.named_children()
        .next()
        .ok_or_else(|| malformed(node, "children"))
}

fn name(node: Node<'_>) -> Result<Name> {
    Name::new(node.text()).map_err(|e| located(node, e))
}

fn name_of(node: Node<'_>, field_name: &str) -> Result<Name> {
    name(required(node, field_name)?)
}

// =========================================================================
// Declarations
// =========================================================================

fn program(root: Node<'_>) -> Result<Program> {
    let mut program = Program::default();
    for child in root.named_children() {
        match child.kind() {
            kind::TYPE_DECL => {
                let declared = fields(child, kind::TYPE_FIELD)?;
                let decl = TypeDecl::new(name_of(child, field::NAME)?, declared, child.span())
                    .map_err(|e| located(child, e))?;
                program.types.push(decl);
            }
            kind::CONTEXT_DECL => program.contexts.push(ContextDecl {
                name: name_of(child, field::NAME)?,
                fields: fields(child, kind::CONTEXT_FIELD)?,
                span: child.span(),
            }),
            kind::STATE_DECL => program.states.push(state(child)?),
            other => trace!(kind = other, "dropped"),
        }
    }
    Ok(program)
}

fn fields(node: Node<'_>, field_kind: &str) -> Result<Vec<Field>> {
    node.named_children()
        .filter(|c| c.kind() == field_kind)
        .map(|c| {
            Ok(Field::new(
                name_of(c, field::NAME)?,
                ty(required(c, field::TYPE)?)?,
                c.span(),
            ))
        })
        .collect()
}

fn state(node: Node<'_>) -> Result<StateDecl> {
    let state_name = name_of(node, field::NAME)?;
    let uses = node
        .children_by_field_name(field::USES)
        .map(name)
        .collect::<Result<Vec<_>>>()?;

    let mut imports = Vec::new();
    let mut precondition = Vec::new();
    let mut body = Vec::new();
    let mut next = None;
    for child in node.named_children() {
        match child.kind() {
            kind::USE_STMT => imports.push(use_stmt(first_named(child)?)?),
            kind::PRECONDITION_BLOCK => {
                for cond in child.named_children().filter(|c| c.kind() == kind::CONDITION) {
                    precondition.push(condition(cond)?);
                }
            }
            kind::STATEMENT => body.push(statement(child)?),
            kind::NEXT_BLOCK => {
                let cases = child
                    .named_children()
                    .filter(|c| c.kind() == kind::NEXT_CASE)
                    .map(next_case)
                    .collect::<Result<Vec<_>>>()?;
                next = Some(NextBlock::new(&state_name, cases).map_err(|e| located(child, e))?);
            }
            _ => {}
        }
    }
    let next = next.ok_or_else(|| malformed(node, "next block"))?;

    Ok(StateDecl {
        name: state_name,
        uses,
        imports,
        precondition,
        body,
        next,
        span: node.span(),
    })
}

fn use_stmt(node: Node<'_>) -> Result<UseStmt> {
    match node.kind() {
        kind::USE_STATE_STMT => Ok(UseStmt::State {
            source: qualified_name(required(node, field::SOURCE)?)?,
            fields: fields(node, kind::USE_FIELD)?,
        }),
        kind::USE_CONTEXT_STMT => Ok(UseStmt::Context(qualified_name(required(
            node,
            field::CONTEXT,
        )?)?)),
        kind::USE_TYPE_STMT => Ok(UseStmt::Type(qualified_name(required(node, field::TYPE)?)?)),
        _ => Err(malformed(node, "use form")),
    }
}

fn qualified_name(node: Node<'_>) -> Result<QualifiedName> {
    let ident = node
        .child_of_kind(kind::IDENTIFIER)
        .ok_or_else(|| malformed(node, "identifier"))?;
    let ident = name(ident)?;
    Ok(match node.child_of_kind(kind::STRING) {
        Some(path) => QualifiedName::with_path(unquote(path.text()), ident),
        None => QualifiedName::local(ident),
    })
}

fn next_case(node: Node<'_>) -> Result<NextCase> {
    let guard = node.child_of_kind(kind::CONDITION).map(condition).transpose()?;
    let exports = match node.child_of_kind(kind::EDGE_EXPORT_BLOCK) {
        Some(block) => fields(block, kind::EDGE_FIELD)?,
        None => Vec::new(),
    };
    Ok(NextCase {
        condition: guard,
        target: name_of(node, field::TARGET)?,
        exports,
        span: node.span(),
    })
}

// =========================================================================
// Statements
// =========================================================================

fn statement(node: Node<'_>) -> Result<Stmt> {
    let inner = first_named(node)?;
    match inner.kind() {
        kind::LET_STMT => Ok(Stmt::Let {
            name: name_of(inner, field::NAME)?,
            ty: ty(required(inner, field::TYPE)?)?,
            value: expr(required(inner, field::VALUE)?)?,
        }),
        kind::SELECT_STMT => Ok(Stmt::Select {
            name: name_of(inner, field::NAME)?,
            ty: ty(required(inner, field::TYPE)?)?,
            entity: name_of(inner, field::ENTITY)?,
            filter: where_clause(inner)?,
            limit: inner
                .child_of_kind(kind::LIMIT_CLAUSE)
                .and_then(|l| l.child_of_kind(kind::NUMBER))
                .map(|n| {
                    n.text().parse::<u64>().map_err(|e| {
                        located(n, Error::invalid("limit", format!("{}: {e}", n.text())))
                    })
                })
                .transpose()?,
        }),
        kind::FOREACH_STMT => Ok(Stmt::Foreach {
            item: name_of(inner, field::ITEM)?,
            item_type: ty(required(inner, field::ITEM_TYPE)?)?,
            collection: name_of(inner, field::COLLECTION)?,
            body: inner
                .named_children()
                .filter(|c| c.kind() == kind::STATEMENT)
                .map(statement)
                .collect::<Result<_>>()?,
        }),
        kind::UPDATE_STMT => Ok(Stmt::Update {
            entity: name_of(inner, field::ENTITY)?,
            assignments: inner
                .named_children()
                .filter(|c| c.kind() == kind::ASSIGNMENT)
                .map(|a| {
                    Ok(Assignment {
                        field: name_of(a, field::FIELD)?,
                        value: expr(required(a, field::VALUE)?)?,
                    })
                })
                .collect::<Result<_>>()?,
            filter: where_clause(inner)?,
        }),
        kind::INSERT_STMT => Ok(Stmt::Insert {
            entity: name_of(inner, field::ENTITY)?,
            columns: inner
                .children_by_field_name(field::COLUMN)
                .map(name)
                .collect::<Result<_>>()?,
            values: inner
                .children_by_field_name(field::VALUE)
                .map(expr)
                .collect::<Result<_>>()?,
        }),
        kind::DELETE_STMT => Ok(Stmt::Delete {
            entity: name_of(inner, field::ENTITY)?,
            filter: where_clause(inner)?,
        }),
        kind::ASSERT_STMT => Ok(Stmt::Assert(expr(first_named(inner)?)?)),
        kind::COMMIT_STMT => Ok(Stmt::Commit),
        _ => Err(malformed(node, "statement")),
    }
}

fn where_clause(node: Node<'_>) -> Result<Option<Expr>> {
    node.child_of_kind(kind::WHERE_CLAUSE)
        .map(|w| expr(first_named(w)?))
        .transpose()
}

// =========================================================================
// Conditions and expressions
// =========================================================================

fn condition(node: Node<'_>) -> Result<Condition> {
    match node.kind() {
        kind::CONDITION | kind::TLA_EXPR => condition(first_named(node)?),
        kind::TLA_BINARY_EXPR => {
            let lhs = Box::new(condition(required(node, field::LEFT)?)?);
            let rhs = Box::new(condition(required(node, field::RIGHT)?)?);
            match required(node, field::OPERATOR)?.kind() {
                "/\\" => Ok(Condition::And(lhs, rhs)),
                "\\/" => Ok(Condition::Or(lhs, rhs)),
                "=>" => Ok(Condition::Implies(lhs, rhs)),
                _ => Err(malformed(node, "known operator")),
            }
        }
        kind::TLA_UNARY_EXPR => Ok(Condition::Not(Box::new(condition(required(
            node,
            field::OPERAND,
        )?)?))),
        kind::TLA_QUANTIFIER => {
            let quantifier = match node.child(0).map(|t| t.kind()) {
                Some("\\E") => QuantifierKind::Exists,
                Some("\\A") => QuantifierKind::Forall,
                _ => return Err(malformed(node, "quantifier")),
            };
            Ok(Condition::Quantifier {
                kind: quantifier,
                relation: name_of(node, field::RELATION)?,
                var: name_of(node, field::VAR)?,
                binding: expr(required(node, field::BINDING)?)?,
                body: Box::new(condition(required(node, field::BODY)?)?),
            })
        }
        kind::EXPR => Ok(Condition::from_expr(expr(node)?)),
        _ => Err(malformed(node, "condition")),
    }
}

fn expr(node: Node<'_>) -> Result<Expr> {
    match node.kind() {
        // Also covers parenthesized expressions, whose only named child is
        // the inner expression.
        kind::EXPR => expr(first_named(node)?),
        kind::LITERAL => literal(node).map(Expr::Literal),
        kind::IDENTIFIER => name(node).map(Expr::Var),
        kind::FIELD_ACCESS => Ok(Expr::Field {
            object: name_of(node, field::OBJECT)?,
            field: name_of(node, field::FIELD)?,
        }),
        kind::STRUCT_LITERAL => node
            .named_children()
            .filter(|c| c.kind() == kind::STRUCT_FIELD)
            .map(|f| Ok((name_of(f, field::NAME)?, expr(required(f, field::VALUE)?)?)))
            .collect::<Result<_>>()
            .map(Expr::Struct),
        kind::UNARY_EXPR => {
            let op = match required(node, field::OPERATOR)?.kind() {
                "!" => UnaryOp::Not,
                "-" => UnaryOp::Neg,
                _ => return Err(malformed(node, "known operator")),
            };
            Ok(Expr::Unary {
                op,
                operand: Box::new(expr(required(node, field::OPERAND)?)?),
            })
        }
        kind::BINARY_EXPR => {
            let symbol = required(node, field::OPERATOR)?.kind();
            let lhs = Box::new(expr(required(node, field::LEFT)?)?);
            let rhs = Box::new(expr(required(node, field::RIGHT)?)?);
            if let Some(op) = CompareOp::from_symbol(symbol) {
                Ok(Expr::Compare { lhs, op, rhs })
            } else if let Some(op) = BinaryOp::from_symbol(symbol) {
                Ok(Expr::Binary { lhs, op, rhs })
            } else {
                Err(malformed(node, "known operator"))
            }
        }
        _ => Err(malformed(node, "expression")),
    }
}

fn literal(node: Node<'_>) -> Result<Literal> {
    let inner = node.child(0).ok_or_else(|| malformed(node, "value"))?;
    match inner.kind() {
        kind::NUMBER => inner.text().parse::<i64>().map(Literal::Int).map_err(|e| {
            located(
                inner,
                Error::invalid("literal", format!("{}: {e}", inner.text())),
            )
        }),
        kind::STRING => Ok(Literal::String(unquote(inner.text()))),
        kind::BOOLEAN => Ok(Literal::Bool(
            inner.child(0).is_some_and(|t| t.kind() == "true"),
        )),
        "null" => Ok(Literal::Null),
        _ => Err(malformed(node, "value")),
    }
}

fn ty(node: Node<'_>) -> Result<Type> {
    let inner = first_named(node)?;
    match inner.kind() {
        kind::PRIMITIVE_TYPE => PrimitiveType::from_keyword(inner.text())
            .map(Type::Primitive)
            .ok_or_else(|| malformed(inner, "primitive keyword")),
        kind::GENERIC_TYPE => Ok(Type::Generic {
            base: name_of(inner, field::BASE)?,
            param: Box::new(ty(required(inner, field::PARAM)?)?),
        }),
        kind::IDENTIFIER => name(inner).map(Type::Named),
        _ => Err(malformed(node, "type")),
    }
}

/// Strips the quotes of a string token and resolves its escapes.
fn unquote(token: &str) -> String {
    let body = token
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(token);
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
