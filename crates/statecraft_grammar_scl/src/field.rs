//! Field names used by the SCL grammar.

/// Declared name of a type, context, state, field or binding.
pub const NAME: &str = "name";
/// Type of a field or binding; type name of `use type`.
pub const TYPE: &str = "type";
/// Context named in a state's `uses` list.
pub const USES: &str = "uses";
/// State imported by `use state`.
pub const SOURCE: &str = "source";
/// Context imported by `use context`.
pub const CONTEXT: &str = "context";
/// Target state of a next case.
pub const TARGET: &str = "target";
/// Relation of a quantifier.
pub const RELATION: &str = "relation";
/// Bound variable of a quantifier.
pub const VAR: &str = "var";
/// Primary key binding of a quantifier.
pub const BINDING: &str = "binding";
/// Body of a quantifier.
pub const BODY: &str = "body";
/// Loop variable of `foreach`.
pub const ITEM: &str = "item";
/// Type of the `foreach` loop variable.
pub const ITEM_TYPE: &str = "item_type";
/// Collection iterated by `foreach`.
pub const COLLECTION: &str = "collection";
/// Entity read or written by a statement.
pub const ENTITY: &str = "entity";
/// Assigned field, or the field of a field access.
pub const FIELD: &str = "field";
/// Assigned, bound or inserted value.
pub const VALUE: &str = "value";
/// Column listed in an insert.
pub const COLUMN: &str = "column";
/// Object of a field access.
pub const OBJECT: &str = "object";
/// Base of a generic type.
pub const BASE: &str = "base";
/// Parameter of a generic type.
pub const PARAM: &str = "param";
/// Left operand of a binary node.
pub const LEFT: &str = "left";
/// Operator token of a unary or binary node.
pub const OPERATOR: &str = "operator";
/// Right operand of a binary node.
pub const RIGHT: &str = "right";
/// Operand of a unary node.
pub const OPERAND: &str = "operand";
