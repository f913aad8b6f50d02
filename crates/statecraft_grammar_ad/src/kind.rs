//! Named node kinds produced by the activity diagram grammar.

/// Whole file.
pub const DOCUMENT: &str = "document";
/// `@startuml [title]`.
pub const STARTUML_DIRECTIVE: &str = "startuml_directive";
/// `@enduml`.
pub const ENDUML_DIRECTIVE: &str = "enduml_directive";
/// Wrapper around title, skinparam, style and pragma statements.
pub const DEFINE_STATEMENT: &str = "define_statement";
/// Wrapper around stop, break, goto, note, arrow and action statements.
pub const TERMINAL_STATEMENT: &str = "terminal_statement";
/// `stop`.
pub const STOP: &str = "stop";
/// `if ... endif`.
pub const IF_STATEMENT: &str = "if_statement";
/// `endif` or `end if`.
pub const ENDIF_DIRECTIVE: &str = "endif_directive";
/// The `if` branch of an if statement.
pub const IF_CONDITION: &str = "if_condition";
/// An `elseif` branch.
pub const ELSEIF_CONDITION: &str = "elseif_condition";
/// The `else` branch.
pub const ELSE_CONDITION: &str = "else_condition";
/// Statements of a branch, loop or group body.
pub const BLOCK_STATEMENT_LIST: &str = "block_statement_list";
/// `switch ... endswitch`.
pub const SWITCH_STATEMENT: &str = "switch_statement";
/// `endswitch` or `end switch`.
pub const ENDSWITCH_DIRECTIVE: &str = "endswitch_directive";
/// `case (...)` and its body.
pub const CASE_CLAUSE: &str = "case_clause";
/// `repeat ... repeat while`.
pub const REPEAT_STATEMENT: &str = "repeat_statement";
/// `repeat while (...)` or `repeatwhile (...)`.
pub const REPEAT_STATEMENT_END: &str = "repeat_statement_end";
/// `while ... endwhile`.
pub const WHILE_STATEMENT: &str = "while_statement";
/// `endwhile` or `end while`.
pub const ENDWHILE_DIRECTIVE: &str = "endwhile_directive";
/// `break`.
pub const BREAK_STATEMENT: &str = "break_statement";
/// `label X` or `goto X`.
pub const GOTO_STATEMENT: &str = "goto_statement";
/// `group`, `partition`, `package`, `rectangle` or `card`.
pub const GROUP_TYPE: &str = "group_type";
/// A group with its body.
pub const GROUP_STATEMENT: &str = "group_statement";
/// A floating or attached note.
pub const NOTE_STATEMENT: &str = "note_statement";
/// An arrow with an action or a label.
pub const ARROW: &str = "arrow";
/// `->`, `-->` or `-[...]->`.
pub const ARROW_STYLE: &str = "arrow_style";
/// Comma separated properties inside `-[...]->`.
pub const ARROW_PROPERTIES: &str = "arrow_properties";
/// A single arrow property.
pub const ARROW_PROPERTY_ELEMENT: &str = "arrow_property_element";
/// `title ...`.
pub const TITLE_STATEMENT: &str = "title_statement";
/// `skinparam ...`.
pub const SKINPARAM: &str = "skinparam";
/// Value of a skinparam.
pub const SKINPARAM_VALUE: &str = "skinparam_value";
/// `<style> ... </style>`.
pub const STYLE_BLOCK: &str = "style_block";
/// `selector { ... }` inside a style block.
pub const STYLE_RULE: &str = "style_rule";
/// `Property: value;` inside a style rule.
pub const STYLE_PROPERTY: &str = "style_property";
/// `!pragma ...`.
pub const PRAGMA: &str = "pragma";
/// A branch or loop condition.
pub const EXPRESSION: &str = "expression";
/// A run of words.
pub const TEXT_CONTENT: &str = "text_content";
/// One whitespace-delimited word.
pub const TEXT_WORD: &str = "text_word";
/// `:text;`.
pub const ACTION_STATEMENT: &str = "action_statement";
/// `[a-zA-Z_][a-zA-Z0-9_]*`.
pub const IDENTIFIER: &str = "identifier";
/// A color or a two-color gradient.
pub const COLOR_VALUE: &str = "color_value";
/// `#hex` or a named color.
pub const COLOR_VALUE_ITEM: &str = "color_value_item";
