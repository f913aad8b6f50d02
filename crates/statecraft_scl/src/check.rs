//! Semantic checks on a parsed program.
//!
//! Only names are resolved here; expressions are not type-checked. Names
//! qualified with a file path refer to other programs and are not followed.

use std::collections::HashSet;

use statecraft_foundation::{Error, ErrorContext, ErrorKind, Result, Span};
use tracing::debug;

use crate::ast::{Field, Name, NextBlock, Program, StateDecl, Stmt, UseStmt};

/// Checks that every name a program uses is declared once.
///
/// Stops at the first problem; the error context holds its position.
///
/// # Errors
/// - a duplicate error for a type, context, state, field or export declared
///   twice
/// - an undefined error for a `uses` context, local `use` or `next` target
///   that is not declared
/// - an invalid next block error when `otherwise` is repeated or not last
/// - an invalid error for a program without states or an `insert` whose
///   column and value counts differ
pub fn check(program: &Program) -> Result<()> {
    if program.states.is_empty() {
        return Err(Error::invalid("program", "no state is declared"));
    }

    unique(
        "type",
        program.types.iter().map(|t| (t.name(), t.span())),
    )?;
    unique(
        "context",
        program.contexts.iter().map(|c| (&c.name, c.span)),
    )?;
    unique("state", program.states.iter().map(|s| (&s.name, s.span)))?;

    for ty in &program.types {
        unique_fields("field", ty.fields())?;
    }
    for context in &program.contexts {
        unique_fields("field", &context.fields)?;
    }
    for state in &program.states {
        check_state(program, state)?;
    }

    debug!(states = program.states.len(), "checked SCL program");
    Ok(())
}

fn at(span: Span, err: Error) -> Error {
    err.with_context(
        ErrorContext::new().with_position(span.line as usize, span.column as usize),
    )
}

fn unique<'a>(what: &'static str, names: impl Iterator<Item = (&'a Name, Span)>) -> Result<()> {
    let mut seen = HashSet::new();
    for (name, span) in names {
        if !seen.insert(name) {
            return Err(at(span, Error::duplicate(what, name.as_str())));
        }
    }
    Ok(())
}

fn unique_fields(what: &'static str, fields: &[Field]) -> Result<()> {
    unique(what, fields.iter().map(|f| (&f.name, f.span)))
}

fn check_state(program: &Program, state: &StateDecl) -> Result<()> {
    for context in &state.uses {
        if program.context(context.as_str()).is_none() {
            return Err(at(state.span, Error::undefined("context", context.as_str())));
        }
    }

    for import in &state.imports {
        match import {
            UseStmt::State { source, fields } => {
                if source.is_local() && program.state(source.name().as_str()).is_none() {
                    return Err(at(state.span, Error::undefined("state", source.to_string())));
                }
                unique_fields("imported value", fields)?;
            }
            UseStmt::Context(name) => {
                if name.is_local() && program.context(name.name().as_str()).is_none() {
                    return Err(at(state.span, Error::undefined("context", name.to_string())));
                }
            }
            UseStmt::Type(name) => {
                if name.is_local() && program.type_decl(name.name().as_str()).is_none() {
                    return Err(at(state.span, Error::undefined("type", name.to_string())));
                }
            }
        }
    }

    check_statements(state, &state.body)?;
    check_next(program, state, &state.next)
}

fn check_statements(state: &StateDecl, body: &[Stmt]) -> Result<()> {
    for stmt in body {
        match stmt {
            Stmt::Insert {
                entity,
                columns,
                values,
            } if columns.len() != values.len() => {
                return Err(at(
                    state.span,
                    Error::invalid(
                        "insert",
                        format!(
                            "{} columns but {} values for {entity}",
                            columns.len(),
                            values.len()
                        ),
                    ),
                ));
            }
            Stmt::Foreach { body, .. } => check_statements(state, body)?,
            _ => {}
        }
    }
    Ok(())
}

fn check_next(program: &Program, state: &StateDecl, next: &NextBlock) -> Result<()> {
    let cases = next.cases();
    for (i, case) in cases.iter().enumerate() {
        if program.state(case.target.as_str()).is_none() {
            return Err(at(case.span, Error::undefined("state", case.target.as_str())));
        }
        if case.is_otherwise() && i + 1 != cases.len() {
            return Err(at(
                case.span,
                Error::new(ErrorKind::InvalidNextBlock {
                    state: state.name.to_string(),
                    message: "otherwise must be the last case".to_string(),
                }),
            ));
        }
        unique_fields("export", &case.exports)?;
    }
    Ok(())
}
