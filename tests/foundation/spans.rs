//! Integration tests for Span
//!
//! Tests span arithmetic and text extraction.

use statecraft_foundation::Span;

#[test]
fn span_text_and_length() {
    let source = "start\n:hello;\nstop\n";
    let span = Span::new(6, 13, 2, 1);
    assert_eq!(span.text(source), ":hello;");
    assert_eq!(span.len(), 7);
    assert!(!span.is_empty());
}

#[test]
fn joined_span_keeps_first_position() {
    let a = Span::new(6, 13, 2, 1);
    let b = Span::new(14, 18, 3, 1);
    let joined = a.to(b);
    assert_eq!((joined.start, joined.end), (6, 18));
    assert_eq!((joined.line, joined.column), (2, 1));
}

#[test]
fn out_of_range_text_is_empty() {
    assert_eq!(Span::new(10, 20, 1, 11).text("short"), "");
}
