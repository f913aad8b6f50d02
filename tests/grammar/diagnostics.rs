//! Syntax error reports from both grammars.

use statecraft_grammar::{
    DiagnosticKind, Parser, SexpOptions, SyntaxDiagnostic, Tree, node_to_sexp_with_text,
};

fn parse_ad(source: &str) -> Tree {
    let mut parser = Parser::new();
    parser
        .set_language(&statecraft_grammar_ad::LANGUAGE.into())
        .expect("Error loading ActivityDiagram grammar");
    parser.parse(source).expect("language set")
}

fn parse_scl(source: &str) -> Tree {
    let mut parser = Parser::new();
    parser
        .set_language(&statecraft_grammar_scl::LANGUAGE.into())
        .expect("Error loading SCL grammar");
    parser.parse(source).expect("language set")
}

// =============================================================================
// Activity diagrams
// =============================================================================

#[test]
fn well_formed_diagram_has_no_diagnostics() {
    let tree = parse_ad("@startuml\nstart\n:a;\nif (x) then\n:b;\nendif\nstop\n@enduml\n");
    assert!(SyntaxDiagnostic::collect(&tree).is_empty());
}

#[test]
fn missing_endif_points_past_the_body() {
    let diags = SyntaxDiagnostic::collect(&parse_ad("if (a) then\n:x;\n"));
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, DiagnosticKind::Missing("endif"));
    assert_eq!(diags[0].message(), "missing endif in endif_directive");
    assert_eq!(diags[0].line(), 3);
}

#[test]
fn stray_closer_is_unexpected() {
    let diags = SyntaxDiagnostic::collect(&parse_ad(":a;\nendif\n:b;\n"));
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, DiagnosticKind::Unexpected);
    assert_eq!(diags[0].excerpt, "endif");
    assert_eq!(diags[0].line(), 2);
    assert!(diags[0].message().starts_with("unexpected \"endif\""));
}

#[test]
fn report_lists_position_and_text() {
    let diags = SyntaxDiagnostic::collect(&parse_ad(":a;\nendif\n"));
    let report = diags[0].to_string();
    assert!(report.starts_with("position: [2,1;"), "{report}");
    assert!(report.contains("text: [endif]"), "{report}");
}

// =============================================================================
// SCL
// =============================================================================

#[test]
fn missing_next_block_is_named() {
    let diags = SyntaxDiagnostic::collect(&parse_scl("context C { }\nstate S uses C { commit; }"));
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].message(), "missing next_block in state_decl");
}

#[test]
fn garbage_is_reported_once() {
    let diags = SyntaxDiagnostic::collect(&parse_scl("@@ junk\ntype T { a: int; }"));
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].excerpt, "@@ junk");
    assert_eq!((diags[0].line(), diags[0].column()), (1, 1));
}

// =============================================================================
// S-expressions
// =============================================================================

#[test]
fn sexp_text_can_be_hidden() {
    let tree = parse_ad(":hello;");
    let root = tree.root_node();
    let bare = node_to_sexp_with_text(&root, &SexpOptions::default().with_text(false));
    assert!(!bare.contains("hello"));
    let full = node_to_sexp_with_text(&root, &SexpOptions::default());
    assert!(full.contains("text=\"hello\""), "{full}");
}

#[test]
fn sexp_positions_are_zero_based() {
    let tree = parse_ad(":hello;");
    let text = node_to_sexp_with_text(
        &tree.root_node(),
        &SexpOptions::default().with_text(false).with_position(true),
    );
    assert!(text.starts_with("([pos=(0,0)-(0,7)]:document"), "{text}");
}
