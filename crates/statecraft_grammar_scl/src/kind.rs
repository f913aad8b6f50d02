//! Named node kinds produced by the SCL grammar.

/// Whole file.
pub const PROGRAM: &str = "program";
/// `type Name { ... }`.
pub const TYPE_DECL: &str = "type_decl";
/// `name: Type;` inside a type declaration.
pub const TYPE_FIELD: &str = "type_field";
/// `context Name { ... }`.
pub const CONTEXT_DECL: &str = "context_decl";
/// `name: Type;` inside a context declaration.
pub const CONTEXT_FIELD: &str = "context_field";
/// `state Name uses A, B { ... }`.
pub const STATE_DECL: &str = "state_decl";
/// Wrapper around the three `use` forms.
pub const USE_STMT: &str = "use_stmt";
/// `use state Source { ... }`.
pub const USE_STATE_STMT: &str = "use_state_stmt";
/// `use context Name;`.
pub const USE_CONTEXT_STMT: &str = "use_context_stmt";
/// `use type Name;`.
pub const USE_TYPE_STMT: &str = "use_type_stmt";
/// `name: Type;` inside `use state`.
pub const USE_FIELD: &str = "use_field";
/// `precondition { cond; ... }`.
pub const PRECONDITION_BLOCK: &str = "precondition_block";
/// Wrapper around executable statements.
pub const STATEMENT: &str = "statement";
/// `let x: T = e;`.
pub const LET_STMT: &str = "let_stmt";
/// `select x: T from E [where] [limit];`.
pub const SELECT_STMT: &str = "select_stmt";
/// `foreach x: T in xs { ... }`.
pub const FOREACH_STMT: &str = "foreach_stmt";
/// `update E set a = e, ... [where];`.
pub const UPDATE_STMT: &str = "update_stmt";
/// `field = value` in an update.
pub const ASSIGNMENT: &str = "assignment";
/// `insert into E (cols) values (exprs);`.
pub const INSERT_STMT: &str = "insert_stmt";
/// `delete from E [where];`.
pub const DELETE_STMT: &str = "delete_stmt";
/// `where expr`.
pub const WHERE_CLAUSE: &str = "where_clause";
/// `limit n`.
pub const LIMIT_CLAUSE: &str = "limit_clause";
/// `assert expr;`.
pub const ASSERT_STMT: &str = "assert_stmt";
/// `commit;`.
pub const COMMIT_STMT: &str = "commit_stmt";
/// `next { ... }`.
pub const NEXT_BLOCK: &str = "next_block";
/// `when cond => Target` or `otherwise => Target`.
pub const NEXT_CASE: &str = "next_case";
/// `{ export name: T; ... }` after a case target.
pub const EDGE_EXPORT_BLOCK: &str = "edge_export_block";
/// `name: Type;` inside an export block.
pub const EDGE_FIELD: &str = "edge_field";
/// Top of a TLA condition.
pub const CONDITION: &str = "condition";
/// Wrapper around every TLA condition node.
pub const TLA_EXPR: &str = "tla_expr";
/// `=>`, `\/` or `/\`.
pub const TLA_BINARY_EXPR: &str = "tla_binary_expr";
/// `~cond`.
pub const TLA_UNARY_EXPR: &str = "tla_unary_expr";
/// `\E Relation r v by e : cond` or `\A ...`.
pub const TLA_QUANTIFIER: &str = "tla_quantifier";
/// Wrapper around every expression node.
pub const EXPR: &str = "expr";
/// `{ a: e, ... }`.
pub const STRUCT_LITERAL: &str = "struct_literal";
/// `a: e` inside a struct literal.
pub const STRUCT_FIELD: &str = "struct_field";
/// Binary arithmetic or comparison.
pub const BINARY_EXPR: &str = "binary_expr";
/// `!e` or `-e`.
pub const UNARY_EXPR: &str = "unary_expr";
/// `object.field`.
pub const FIELD_ACCESS: &str = "field_access";
/// Wrapper around every type.
pub const TYPE: &str = "type";
/// `int`, `bool`, `string` or `float`.
pub const PRIMITIVE_TYPE: &str = "primitive_type";
/// `Base[Param]`.
pub const GENERIC_TYPE: &str = "generic_type";
/// `Name` or `"path"::Name`.
pub const QUALIFIED_NAME: &str = "qualified_name";
/// Number, string, boolean or `null`.
pub const LITERAL: &str = "literal";
/// Decimal integer.
pub const NUMBER: &str = "number";
/// `true` or `false`.
pub const BOOLEAN: &str = "boolean";
/// Double-quoted string.
pub const STRING: &str = "string";
/// `[a-zA-Z_][a-zA-Z0-9_]*`.
pub const IDENTIFIER: &str = "identifier";
