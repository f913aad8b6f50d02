//! State Construction Language grammar for the Statecraft grammar runtime.
//!
//! SCL describes a state machine as `state` declarations, each with an
//! optional precondition, a body of data statements and a `next` block whose
//! cases pick the successor state. `type` and `context` declarations name the
//! records and data sources the states work with.
//!
//! ```
//! use statecraft_grammar::Parser;
//!
//! let mut parser = Parser::new();
//! parser
//!     .set_language(&statecraft_grammar_scl::LANGUAGE.into())
//!     .expect("Error loading SCL grammar");
//! let tree = parser
//!     .parse("state Idle uses Db { next { otherwise => Idle } }")
//!     .expect("language set");
//! assert!(!tree.root_node().has_error());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod field;
mod fuzz_tests;
pub mod kind;
mod lexer;
mod parser;

use statecraft_grammar::{LANGUAGE_VERSION, Language, LanguageFn, LanguageInfo, NodeKind};

/// Name recorded in the grammar tables.
pub const GRAMMAR_NAME: &str = "scl";

/// Node kinds of the grammar; a kind's id is its index.
pub const NODE_KINDS: &[NodeKind] = &[
    NodeKind::named(kind::PROGRAM),
    NodeKind::named(kind::TYPE_DECL),
    NodeKind::named(kind::TYPE_FIELD),
    NodeKind::named(kind::CONTEXT_DECL),
    NodeKind::named(kind::CONTEXT_FIELD),
    NodeKind::named(kind::STATE_DECL),
    NodeKind::named(kind::USE_STMT),
    NodeKind::named(kind::USE_STATE_STMT),
    NodeKind::named(kind::USE_CONTEXT_STMT),
    NodeKind::named(kind::USE_TYPE_STMT),
    NodeKind::named(kind::USE_FIELD),
    NodeKind::named(kind::PRECONDITION_BLOCK),
    NodeKind::named(kind::STATEMENT),
    NodeKind::named(kind::LET_STMT),
    NodeKind::named(kind::SELECT_STMT),
    NodeKind::named(kind::FOREACH_STMT),
    NodeKind::named(kind::UPDATE_STMT),
    NodeKind::named(kind::ASSIGNMENT),
    NodeKind::named(kind::INSERT_STMT),
    NodeKind::named(kind::DELETE_STMT),
    NodeKind::named(kind::WHERE_CLAUSE),
    NodeKind::named(kind::LIMIT_CLAUSE),
    NodeKind::named(kind::ASSERT_STMT),
    NodeKind::named(kind::COMMIT_STMT),
    NodeKind::named(kind::NEXT_BLOCK),
    NodeKind::named(kind::NEXT_CASE),
    NodeKind::named(kind::EDGE_EXPORT_BLOCK),
    NodeKind::named(kind::EDGE_FIELD),
    NodeKind::named(kind::CONDITION),
    NodeKind::named(kind::TLA_EXPR),
    NodeKind::named(kind::TLA_BINARY_EXPR),
    NodeKind::named(kind::TLA_UNARY_EXPR),
    NodeKind::named(kind::TLA_QUANTIFIER),
    NodeKind::named(kind::EXPR),
    NodeKind::named(kind::STRUCT_LITERAL),
    NodeKind::named(kind::STRUCT_FIELD),
    NodeKind::named(kind::BINARY_EXPR),
    NodeKind::named(kind::UNARY_EXPR),
    NodeKind::named(kind::FIELD_ACCESS),
    NodeKind::named(kind::TYPE),
    NodeKind::named(kind::PRIMITIVE_TYPE),
    NodeKind::named(kind::GENERIC_TYPE),
    NodeKind::named(kind::QUALIFIED_NAME),
    NodeKind::named(kind::LITERAL),
    NodeKind::named(kind::NUMBER),
    NodeKind::named(kind::BOOLEAN),
    NodeKind::named(kind::STRING),
    NodeKind::named(kind::IDENTIFIER),
    NodeKind::anonymous("type"),
    NodeKind::anonymous("context"),
    NodeKind::anonymous("state"),
    NodeKind::anonymous("uses"),
    NodeKind::anonymous("use"),
    NodeKind::anonymous("precondition"),
    NodeKind::anonymous("pre"),
    NodeKind::anonymous("let"),
    NodeKind::anonymous("select"),
    NodeKind::anonymous("from"),
    NodeKind::anonymous("foreach"),
    NodeKind::anonymous("in"),
    NodeKind::anonymous("update"),
    NodeKind::anonymous("set"),
    NodeKind::anonymous("insert"),
    NodeKind::anonymous("into"),
    NodeKind::anonymous("values"),
    NodeKind::anonymous("delete"),
    NodeKind::anonymous("where"),
    NodeKind::anonymous("limit"),
    NodeKind::anonymous("assert"),
    NodeKind::anonymous("commit"),
    NodeKind::anonymous("next"),
    NodeKind::anonymous("when"),
    NodeKind::anonymous("otherwise"),
    NodeKind::anonymous("export"),
    NodeKind::anonymous("Relation"),
    NodeKind::anonymous("by"),
    NodeKind::anonymous("true"),
    NodeKind::anonymous("false"),
    NodeKind::anonymous("null"),
    NodeKind::anonymous("int"),
    NodeKind::anonymous("bool"),
    NodeKind::anonymous("string"),
    NodeKind::anonymous("float"),
    NodeKind::anonymous("=>"),
    NodeKind::anonymous("\\/"),
    NodeKind::anonymous("/\\"),
    NodeKind::anonymous("\\E"),
    NodeKind::anonymous("\\A"),
    NodeKind::anonymous("::"),
    NodeKind::anonymous("=="),
    NodeKind::anonymous("!="),
    NodeKind::anonymous("<="),
    NodeKind::anonymous(">="),
    NodeKind::anonymous("<"),
    NodeKind::anonymous(">"),
    NodeKind::anonymous("="),
    NodeKind::anonymous("#"),
    NodeKind::anonymous("+"),
    NodeKind::anonymous("-"),
    NodeKind::anonymous("*"),
    NodeKind::anonymous("/"),
    NodeKind::anonymous("!"),
    NodeKind::anonymous("~"),
    NodeKind::anonymous("."),
    NodeKind::anonymous(","),
    NodeKind::anonymous(":"),
    NodeKind::anonymous(";"),
    NodeKind::anonymous("{"),
    NodeKind::anonymous("}"),
    NodeKind::anonymous("("),
    NodeKind::anonymous(")"),
    NodeKind::anonymous("["),
    NodeKind::anonymous("]"),
];

/// Field names of the grammar; a field's id is its index plus one.
pub const FIELD_NAMES: &[&str] = &[
    field::NAME,
    field::TYPE,
    field::USES,
    field::SOURCE,
    field::CONTEXT,
    field::TARGET,
    field::RELATION,
    field::VAR,
    field::BINDING,
    field::BODY,
    field::ITEM,
    field::ITEM_TYPE,
    field::COLLECTION,
    field::ENTITY,
    field::FIELD,
    field::VALUE,
    field::COLUMN,
    field::OBJECT,
    field::BASE,
    field::PARAM,
    field::LEFT,
    field::OPERATOR,
    field::RIGHT,
    field::OPERAND,
];

static INFO: LanguageInfo = LanguageInfo {
    name: GRAMMAR_NAME,
    abi_version: LANGUAGE_VERSION,
    node_kinds: NODE_KINDS,
    field_names: FIELD_NAMES,
    parse: parser::parse,
};

fn language_info() -> &'static LanguageInfo {
    &INFO
}

/// Loader for the SCL grammar.
pub const LANGUAGE: LanguageFn = LanguageFn::from_raw(language_info);

/// Resolves [`LANGUAGE`] into a handle.
#[must_use]
pub fn language() -> Language {
    Language::new(LANGUAGE)
}
