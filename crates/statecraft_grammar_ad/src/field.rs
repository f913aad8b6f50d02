//! Field names used by the activity diagram grammar.

/// Condition of a branch, case or loop.
pub const EXPRESSION: &str = "expression";
/// Body of a branch, case, loop or group.
pub const BLOCK_STATEMENT_LIST: &str = "block_statement_list";
/// `(label)` of a branch, the `is (label)` of a loop, or an arrow label.
pub const LABEL: &str = "label";
/// Label shown on the edge leaving a loop.
pub const EXIT_LABEL: &str = "exit_label";
/// Group keyword.
pub const TYPE: &str = "type";
/// Group name, label/goto target, or pragma name.
pub const NAME: &str = "name";
/// Group color.
pub const COLOR: &str = "color";
/// Note position.
pub const POSITION: &str = "position";
/// Note text.
pub const CONTENT: &str = "content";
/// Arrow style of an arrow.
pub const ARROW: &str = "arrow";
/// Title text.
pub const TEXT: &str = "text";
/// Skinparam element.
pub const ELEMENT: &str = "element";
/// Skinparam or style property.
pub const PROPERTY: &str = "property";
/// Skinparam, style or pragma value.
pub const VALUE: &str = "value";
/// Style rule selector.
pub const SELECTOR: &str = "selector";
/// Pragma operator.
pub const OPERATOR: &str = "operator";
/// Text of an action.
pub const ACTION: &str = "action";
/// Name after `activity` in a condition.
pub const ACTIVITY_IDENTIFIER: &str = "activity_identifier";
/// Free text of a condition.
pub const EXPRESSION_CONTENT: &str = "expression_content";
