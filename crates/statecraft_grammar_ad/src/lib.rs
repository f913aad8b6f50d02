//! PlantUML activity diagram grammar for the Statecraft grammar runtime.
//!
//! This crate provides:
//! - [`LANGUAGE`] - the loader handed to [`statecraft_grammar::Parser::set_language`]
//! - [`kind`] and [`field`] - node kind and field name constants
//!
//! ```
//! use statecraft_grammar::Parser;
//!
//! let mut parser = Parser::new();
//! parser
//!     .set_language(&statecraft_grammar_ad::LANGUAGE.into())
//!     .expect("Error loading ActivityDiagram grammar");
//! let tree = parser.parse("start\n:hello;\nstop\n").expect("language set");
//! assert!(!tree.root_node().has_error());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod field;
mod fuzz_tests;
pub mod kind;
mod parser;
mod scanner;

use statecraft_grammar::{LANGUAGE_VERSION, Language, LanguageFn, LanguageInfo, NodeKind};

/// Name recorded in the grammar tables.
pub const GRAMMAR_NAME: &str = "activity_diagram";

/// Node kinds of the grammar; a kind's id is its index.
pub const NODE_KINDS: &[NodeKind] = &[
    NodeKind::named(kind::DOCUMENT),
    NodeKind::named(kind::STARTUML_DIRECTIVE),
    NodeKind::named(kind::ENDUML_DIRECTIVE),
    NodeKind::named(kind::DEFINE_STATEMENT),
    NodeKind::named(kind::TERMINAL_STATEMENT),
    NodeKind::named(kind::STOP),
    NodeKind::named(kind::IF_STATEMENT),
    NodeKind::named(kind::ENDIF_DIRECTIVE),
    NodeKind::named(kind::IF_CONDITION),
    NodeKind::named(kind::ELSEIF_CONDITION),
    NodeKind::named(kind::ELSE_CONDITION),
    NodeKind::named(kind::BLOCK_STATEMENT_LIST),
    NodeKind::named(kind::SWITCH_STATEMENT),
    NodeKind::named(kind::ENDSWITCH_DIRECTIVE),
    NodeKind::named(kind::CASE_CLAUSE),
    NodeKind::named(kind::REPEAT_STATEMENT),
    NodeKind::named(kind::REPEAT_STATEMENT_END),
    NodeKind::named(kind::WHILE_STATEMENT),
    NodeKind::named(kind::ENDWHILE_DIRECTIVE),
    NodeKind::named(kind::BREAK_STATEMENT),
    NodeKind::named(kind::GOTO_STATEMENT),
    NodeKind::named(kind::GROUP_TYPE),
    NodeKind::named(kind::GROUP_STATEMENT),
    NodeKind::named(kind::NOTE_STATEMENT),
    NodeKind::named(kind::ARROW),
    NodeKind::named(kind::ARROW_STYLE),
    NodeKind::named(kind::ARROW_PROPERTIES),
    NodeKind::named(kind::ARROW_PROPERTY_ELEMENT),
    NodeKind::named(kind::TITLE_STATEMENT),
    NodeKind::named(kind::SKINPARAM),
    NodeKind::named(kind::SKINPARAM_VALUE),
    NodeKind::named(kind::STYLE_BLOCK),
    NodeKind::named(kind::STYLE_RULE),
    NodeKind::named(kind::STYLE_PROPERTY),
    NodeKind::named(kind::PRAGMA),
    NodeKind::named(kind::EXPRESSION),
    NodeKind::named(kind::TEXT_CONTENT),
    NodeKind::named(kind::TEXT_WORD),
    NodeKind::named(kind::ACTION_STATEMENT),
    NodeKind::named(kind::IDENTIFIER),
    NodeKind::named(kind::COLOR_VALUE),
    NodeKind::named(kind::COLOR_VALUE_ITEM),
    NodeKind::anonymous("@startuml"),
    NodeKind::anonymous("start"),
    NodeKind::anonymous("end"),
    NodeKind::anonymous("stop"),
    NodeKind::anonymous(";"),
    NodeKind::anonymous("if"),
    NodeKind::anonymous("("),
    NodeKind::anonymous(")"),
    NodeKind::anonymous("then"),
    NodeKind::anonymous("elseif"),
    NodeKind::anonymous("else"),
    NodeKind::anonymous("endif"),
    NodeKind::anonymous("switch"),
    NodeKind::anonymous("endswitch"),
    NodeKind::anonymous("case"),
    NodeKind::anonymous("repeat"),
    NodeKind::anonymous("repeatwhile"),
    NodeKind::anonymous("while"),
    NodeKind::anonymous("is"),
    NodeKind::anonymous("not"),
    NodeKind::anonymous("endwhile"),
    NodeKind::anonymous("label"),
    NodeKind::anonymous("goto"),
    NodeKind::anonymous("group"),
    NodeKind::anonymous("partition"),
    NodeKind::anonymous("package"),
    NodeKind::anonymous("rectangle"),
    NodeKind::anonymous("card"),
    NodeKind::anonymous("{"),
    NodeKind::anonymous("}"),
    NodeKind::anonymous("floating"),
    NodeKind::anonymous("note"),
    NodeKind::anonymous("left"),
    NodeKind::anonymous("right"),
    NodeKind::anonymous("top"),
    NodeKind::anonymous("bottom"),
    NodeKind::anonymous(":"),
    NodeKind::anonymous("endnote"),
    NodeKind::anonymous("->"),
    NodeKind::anonymous("-->"),
    NodeKind::anonymous("-"),
    NodeKind::anonymous("["),
    NodeKind::anonymous("]"),
    NodeKind::anonymous("hidden"),
    NodeKind::anonymous(","),
    NodeKind::anonymous("bold"),
    NodeKind::anonymous("dashed"),
    NodeKind::anonymous("dotted"),
    NodeKind::anonymous("title"),
    NodeKind::anonymous("skinparam"),
    NodeKind::anonymous("<style>"),
    NodeKind::anonymous("</style>"),
    NodeKind::anonymous("!pragma"),
    NodeKind::anonymous("="),
    NodeKind::anonymous("on"),
    NodeKind::anonymous("off"),
    NodeKind::anonymous("activity"),
    NodeKind::anonymous("/"),
    NodeKind::anonymous("\\"),
];

/// Field names of the grammar; a field's id is its index plus one.
pub const FIELD_NAMES: &[&str] = &[
    field::EXPRESSION,
    field::BLOCK_STATEMENT_LIST,
    field::LABEL,
    field::EXIT_LABEL,
    field::TYPE,
    field::NAME,
    field::COLOR,
    field::POSITION,
    field::CONTENT,
    field::ARROW,
    field::TEXT,
    field::ELEMENT,
    field::PROPERTY,
    field::VALUE,
    field::SELECTOR,
    field::OPERATOR,
    field::ACTION,
    field::ACTIVITY_IDENTIFIER,
    field::EXPRESSION_CONTENT,
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

/// Loader for the activity diagram grammar.
pub const LANGUAGE: LanguageFn = LanguageFn::from_raw(language_info);

/// Resolves [`LANGUAGE`] into a handle.
#[must_use]
pub fn language() -> Language {
    Language::new(LANGUAGE)
}
