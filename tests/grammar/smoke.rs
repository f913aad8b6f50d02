//! Grammar load smoke tests
//!
//! Each binding must resolve to a valid language handle the runtime
//! accepts; broken tables must be rejected.

use statecraft_grammar::{
    LANGUAGE_VERSION, Language, LanguageError, LanguageFn, LanguageInfo, NodeKind, Parser, Tree,
};

#[test]
fn test_can_load_activity_diagram_grammar() {
    let mut parser = Parser::new();
    parser
        .set_language(&statecraft_grammar_ad::LANGUAGE.into())
        .expect("Error loading ActivityDiagram grammar");
}

#[test]
fn test_can_load_scl_grammar() {
    let mut parser = Parser::new();
    parser
        .set_language(&statecraft_grammar_scl::LANGUAGE.into())
        .expect("Error loading SCL grammar");
}

#[test]
fn loading_is_idempotent() {
    assert_eq!(statecraft_grammar_ad::language(), statecraft_grammar_ad::language());
    assert_eq!(statecraft_grammar_scl::language(), statecraft_grammar_scl::language());
    assert_ne!(statecraft_grammar_ad::language(), statecraft_grammar_scl::language());

    let mut parser = Parser::new();
    for _ in 0..2 {
        parser
            .set_language(&statecraft_grammar_ad::language())
            .expect("Error loading ActivityDiagram grammar");
    }
    assert_eq!(parser.language(), Some(statecraft_grammar_ad::language()));
}

#[test]
fn handles_describe_their_grammar() {
    let ad = statecraft_grammar_ad::language();
    assert_eq!(ad.name(), statecraft_grammar_ad::GRAMMAR_NAME);
    assert_eq!(ad.abi_version(), LANGUAGE_VERSION);
    assert!(ad.node_kind_count() > 0);
    assert!(ad.id_for_node_kind("if_statement", true).is_some());

    let scl = statecraft_grammar_scl::language();
    assert_eq!(scl.name(), "scl");
    assert!(scl.field_id_for_name("target").is_some());
}

#[test]
fn parser_without_language_refuses_to_parse() {
    let parser = Parser::new();
    assert_eq!(parser.parse("start").err(), Some(LanguageError::NoLanguage));
}

// =============================================================================
// Broken grammar tables
// =============================================================================

fn borrowed_parse(language: Language, source: &str) -> Tree {
    let scl = statecraft_grammar_scl::LANGUAGE.into_raw()();
    (scl.parse)(language, source)
}

static KINDS: &[NodeKind] = &[NodeKind::named("document")];

static FUTURE_ABI: LanguageInfo = LanguageInfo {
    name: "future",
    abi_version: LANGUAGE_VERSION + 1,
    node_kinds: KINDS,
    field_names: &[],
    parse: borrowed_parse,
};

static EMPTY_TABLE: LanguageInfo = LanguageInfo {
    name: "empty",
    abi_version: LANGUAGE_VERSION,
    node_kinds: &[],
    field_names: &[],
    parse: borrowed_parse,
};

static DUPLICATE_FIELD: LanguageInfo = LanguageInfo {
    name: "duplicate",
    abi_version: LANGUAGE_VERSION,
    node_kinds: KINDS,
    field_names: &["name", "name"],
    parse: borrowed_parse,
};

fn load(info: fn() -> &'static LanguageInfo) -> Result<(), LanguageError> {
    let mut parser = Parser::new();
    parser.set_language(&LanguageFn::from_raw(info).into())
}

#[test]
fn incompatible_abi_is_rejected() {
    let err = load(|| &FUTURE_ABI).expect_err("future ABI");
    assert!(matches!(err, LanguageError::IncompatibleVersion { name: "future", .. }));
}

#[test]
fn empty_node_table_is_rejected() {
    let err = load(|| &EMPTY_TABLE).expect_err("empty table");
    assert_eq!(err, LanguageError::EmptyNodeTable { name: "empty" });
}

#[test]
fn duplicate_field_is_rejected() {
    let err = load(|| &DUPLICATE_FIELD).expect_err("duplicate field");
    assert_eq!(
        err.to_string(),
        "grammar 'duplicate' declares field 'name' more than once"
    );
}

#[test]
fn rejected_load_keeps_previous_language() {
    let mut parser = Parser::new();
    parser
        .set_language(&statecraft_grammar_ad::language())
        .expect("Error loading ActivityDiagram grammar");
    assert!(load(|| &EMPTY_TABLE).is_err());
    assert!(
        parser
            .set_language(&LanguageFn::from_raw(|| &EMPTY_TABLE).into())
            .is_err()
    );
    assert_eq!(parser.language(), Some(statecraft_grammar_ad::language()));
}
