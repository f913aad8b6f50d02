//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use statecraft_foundation::{Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn parse_error_carries_position_and_report() {
    let err = Error::parse("missing endif in if_statement", 4, 1, "position: [4,1; 4,1]".into());
    assert!(err.is_parse_error());
    assert_eq!(
        err.to_string(),
        "parse error at 4:1: missing endif in if_statement"
    );
    let ErrorKind::ParseError { context, .. } = &err.kind else {
        panic!("expected parse error");
    };
    assert!(context.starts_with("position:"));
}

#[test]
fn error_kinds_display() {
    let cases = [
        (Error::language_load("SCL: bad tables"), "grammar load failed: SCL: bad tables"),
        (Error::undefined_label("retry"), "undefined label: retry"),
        (Error::new(ErrorKind::BreakOutsideLoop { line: 7 }), "break outside loop at line 7"),
        (Error::duplicate("state", "Idle"), "duplicate state: Idle"),
        (Error::undefined("context", "Db"), "undefined context: Db"),
        (Error::invalid("name", "names must not be empty"), "invalid name: names must not be empty"),
        (
            Error::new(ErrorKind::InvalidNextBlock {
                state: "Pay".into(),
                message: "otherwise must be the last case".into(),
            }),
            "invalid next block in state Pay: otherwise must be the last case",
        ),
        (Error::new(ErrorKind::Codegen("template".into())), "code generation failed: template"),
        (Error::internal("oops"), "internal error: oops"),
    ];
    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
        assert!(!err.is_parse_error());
    }
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn context_survives_and_displays() {
    let err = Error::undefined("state", "Nowhere").with_context(
        ErrorContext::new()
            .with_source("orders.scl")
            .with_position(12, 5)
            .with_note("in state Pay"),
    );
    let context = err.context.as_ref().expect("context");
    let text = context.to_string();
    assert!(text.starts_with("at orders.scl:12:5"));
    assert!(text.contains("note: in state Pay"));
}

#[test]
fn io_errors_convert_with_question_mark() {
    fn read() -> statecraft_foundation::Result<String> {
        Ok(std::fs::read_to_string("/nonexistent/diagram.puml")?)
    }
    let err = read().expect_err("missing file");
    assert!(matches!(err.kind, ErrorKind::Io(_)));
}
