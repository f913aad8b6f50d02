//! Abstract syntax of SCL programs.
//!
//! Constructors that can be handed malformed input validate it: names must be
//! non-empty, a type must declare at least one field and a `next` block at
//! least one case. `Display` prints conditions, expressions and types back
//! as SCL source.

use std::fmt;

use statecraft_foundation::{Error, ErrorKind, Result, Span};

// =============================================================================
// Names
// =============================================================================

/// A non-empty identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    /// Creates a name.
    ///
    /// # Errors
    /// Returns an invalid name error if `s` is empty.
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(Error::invalid("name", "names must not be empty"));
        }
        Ok(Self(s))
    }

    /// The identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A name, optionally imported from another file: `"orders.scl"::Order`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    path: Option<String>,
    name: Name,
}

impl QualifiedName {
    /// A name defined in the same program.
    #[must_use]
    pub fn local(name: Name) -> Self {
        Self { path: None, name }
    }

    /// A name defined in the file at `path`.
    #[must_use]
    pub fn with_path(path: impl Into<String>, name: Name) -> Self {
        Self {
            path: Some(path.into()),
            name,
        }
    }

    /// The unqualified name.
    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The file path, if qualified.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// True if the name refers to the current program.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.path.is_none()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "\"{}\"::{}", escape(path), self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

// =============================================================================
// Types
// =============================================================================

/// Built-in scalar types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// `int`
    Int,
    /// `bool`
    Bool,
    /// `string`
    String,
    /// `float`
    Float,
}

impl PrimitiveType {
    /// Looks up a primitive type by keyword.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "int" => Some(Self::Int),
            "bool" => Some(Self::Bool),
            "string" => Some(Self::String),
            "float" => Some(Self::Float),
            _ => None,
        }
    }

    /// The keyword spelling.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Float => "float",
        }
    }
}

/// A field or binding type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// `int`, `bool`, `string` or `float`.
    Primitive(PrimitiveType),
    /// A declared or imported type.
    Named(Name),
    /// `Base[Param]`, e.g. `List[Order]`.
    Generic {
        /// Type constructor.
        base: Name,
        /// Element type.
        param: Box<Type>,
    },
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => f.write_str(p.keyword()),
            Self::Named(name) => write!(f, "{name}"),
            Self::Generic { base, param } => write!(f, "{base}[{param}]"),
        }
    }
}

/// `name: Type`, as declared in types, contexts, `use state` and exports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    /// Field name.
    pub name: Name,
    /// Field type.
    pub ty: Type,
    /// Where the field was declared.
    pub span: Span,
}

impl Field {
    /// Creates a field.
    #[must_use]
    pub fn new(name: Name, ty: Type, span: Span) -> Self {
        Self { name, ty, span }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

// =============================================================================
// Expressions
// =============================================================================

/// A literal value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Literal {
    /// Decimal integer.
    Int(i64),
    /// `true` or `false`.
    Bool(bool),
    /// String with escapes resolved.
    String(String),
    /// `null`
    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "\"{}\"", escape(s)),
            Self::Null => f.write_str("null"),
        }
    }
}

/// Prefix operators of expressions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `-`
    Neg,
}

impl UnaryOp {
    /// Operator spelling.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Neg => "-",
        }
    }
}

/// Arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl BinaryOp {
    /// Looks up an operator by spelling.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            _ => None,
        }
    }

    /// Operator spelling.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => PREC_ADD,
            Self::Mul | Self::Div => PREC_MUL,
        }
    }
}

/// Comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `=` or `==`
    Eq,
    /// `#` or `!=`
    Neq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    /// Looks up an operator by spelling.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" | "==" => Some(Self::Eq),
            "#" | "!=" => Some(Self::Neq),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            _ => None,
        }
    }

    /// Canonical spelling.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    const fn precedence(self) -> u8 {
        match self {
            Self::Eq | Self::Neq => PREC_EQ,
            Self::Lt | Self::Le | Self::Gt | Self::Ge => PREC_REL,
        }
    }
}

const PREC_EQ: u8 = 1;
const PREC_REL: u8 = 2;
const PREC_ADD: u8 = 3;
const PREC_MUL: u8 = 4;
const PREC_UNARY: u8 = 5;
const PREC_ATOM: u8 = 6;

/// A value expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// A literal.
    Literal(Literal),
    /// A variable: a binding, context field or imported name.
    Var(Name),
    /// `object.field`
    Field {
        /// Accessed variable.
        object: Name,
        /// Field read from it.
        field: Name,
    },
    /// `{ a: e, ... }`
    Struct(Vec<(Name, Expr)>),
    /// `!e` or `-e`
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },
    /// Arithmetic.
    Binary {
        /// Left operand.
        lhs: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// Comparison.
    Compare {
        /// Left operand.
        lhs: Box<Expr>,
        /// Operator.
        op: CompareOp,
        /// Right operand.
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Shorthand for a variable reference.
    ///
    /// # Errors
    /// Returns an invalid name error if `name` is empty.
    pub fn var(name: &str) -> Result<Self> {
        Name::new(name).map(Self::Var)
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Literal(_) | Self::Var(_) | Self::Field { .. } | Self::Struct(_) => PREC_ATOM,
            Self::Unary { .. } => PREC_UNARY,
            Self::Binary { op, .. } => op.precedence(),
            Self::Compare { op, .. } => op.precedence(),
        }
    }

    /// Prints `self` as an operand of an operator with precedence `outer`,
    /// adding parentheses when the operand binds looser.
    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, outer: u8, right: bool) -> fmt::Result {
        let prec = self.precedence();
        if prec < outer || (right && prec == outer) {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(lit) => write!(f, "{lit}"),
            Self::Var(name) => write!(f, "{name}"),
            Self::Field { object, field } => write!(f, "{object}.{field}"),
            Self::Struct(fields) => {
                f.write_str("{ ")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str(" }")
            }
            Self::Unary { op, operand } => {
                f.write_str(op.symbol())?;
                operand.fmt_operand(f, PREC_UNARY, false)
            }
            Self::Binary { lhs, op, rhs } => {
                lhs.fmt_operand(f, op.precedence(), false)?;
                write!(f, " {} ", op.symbol())?;
                rhs.fmt_operand(f, op.precedence(), true)
            }
            Self::Compare { lhs, op, rhs } => {
                lhs.fmt_operand(f, op.precedence(), false)?;
                write!(f, " {} ", op.symbol())?;
                rhs.fmt_operand(f, op.precedence(), true)
            }
        }
    }
}

// =============================================================================
// Conditions
// =============================================================================

/// `\E` or `\A`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuantifierKind {
    /// `\E`: some row satisfies the body.
    Exists,
    /// `\A`: every row satisfies the body.
    Forall,
}

impl QuantifierKind {
    /// Operator spelling.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Exists => "\\E",
            Self::Forall => "\\A",
        }
    }
}

/// A TLA-style condition, as used by preconditions and `when` cases.
///
/// Conditions have no parentheses of their own: binary operators associate
/// to the left and a quantifier body extends to the end of the condition, so
/// printing a parsed condition reproduces its structure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    /// `a /\ b`
    And(Box<Condition>, Box<Condition>),
    /// `a \/ b`
    Or(Box<Condition>, Box<Condition>),
    /// `a => b`
    Implies(Box<Condition>, Box<Condition>),
    /// `~a`
    Not(Box<Condition>),
    /// A comparison at the top of a condition.
    Compare {
        /// Left operand.
        lhs: Expr,
        /// Operator.
        op: CompareOp,
        /// Right operand.
        rhs: Expr,
    },
    /// `\E Relation r v by key : body`
    Quantifier {
        /// `\E` or `\A`.
        kind: QuantifierKind,
        /// Relation ranged over.
        relation: Name,
        /// Variable bound to each row.
        var: Name,
        /// Key expression rows are matched by.
        binding: Expr,
        /// Condition tested per row.
        body: Box<Condition>,
    },
    /// Any other boolean expression.
    Expr(Expr),
}

impl Condition {
    /// Wraps an expression, lifting a top-level comparison.
    #[must_use]
    pub fn from_expr(expr: Expr) -> Self {
        match expr {
            Expr::Compare { lhs, op, rhs } => Self::Compare {
                lhs: *lhs,
                op,
                rhs: *rhs,
            },
            other => Self::Expr(other),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(a, b) => write!(f, "{a} /\\ {b}"),
            Self::Or(a, b) => write!(f, "{a} \\/ {b}"),
            Self::Implies(a, b) => write!(f, "{a} => {b}"),
            Self::Not(a) => write!(f, "~{a}"),
            Self::Compare { lhs, op, rhs } => {
                lhs.fmt_operand(f, op.precedence(), false)?;
                write!(f, " {} ", op.symbol())?;
                rhs.fmt_operand(f, op.precedence(), true)
            }
            Self::Quantifier {
                kind,
                relation,
                var,
                binding,
                body,
            } => write!(
                f,
                "{} Relation {relation} {var} by {binding} : {body}",
                kind.symbol()
            ),
            Self::Expr(expr) => write!(f, "{expr}"),
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

/// `field = value` in an `update`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    /// Assigned column.
    pub field: Name,
    /// New value.
    pub value: Expr,
}

/// A data statement in a state body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    /// `let x: T = e;`
    Let {
        /// Bound name.
        name: Name,
        /// Declared type.
        ty: Type,
        /// Bound value.
        value: Expr,
    },
    /// `select x: T from Entity [where e] [limit n];`
    Select {
        /// Bound name.
        name: Name,
        /// Declared type of the result.
        ty: Type,
        /// Entity read.
        entity: Name,
        /// Row filter.
        filter: Option<Expr>,
        /// Row limit.
        limit: Option<u64>,
    },
    /// `foreach x: T in xs { ... }`
    Foreach {
        /// Loop variable.
        item: Name,
        /// Type of the loop variable.
        item_type: Type,
        /// Iterated collection.
        collection: Name,
        /// Loop body.
        body: Vec<Stmt>,
    },
    /// `update Entity set a = e, ... [where e];`
    Update {
        /// Entity written.
        entity: Name,
        /// Column assignments.
        assignments: Vec<Assignment>,
        /// Row filter.
        filter: Option<Expr>,
    },
    /// `insert into Entity (a, b) values (e1, e2);`
    Insert {
        /// Entity written.
        entity: Name,
        /// Columns, in value order.
        columns: Vec<Name>,
        /// Inserted values.
        values: Vec<Expr>,
    },
    /// `delete from Entity [where e];`
    Delete {
        /// Entity written.
        entity: Name,
        /// Row filter.
        filter: Option<Expr>,
    },
    /// `assert e;`
    Assert(Expr),
    /// `commit;`
    Commit,
}

// =============================================================================
// Declarations
// =============================================================================

/// `use` forms at the top of a state body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UseStmt {
    /// `use state Source { name: T; ... }`: values exported by `Source`.
    State {
        /// State the values come from.
        source: QualifiedName,
        /// Imported values.
        fields: Vec<Field>,
    },
    /// `use context Name;`
    Context(QualifiedName),
    /// `use type Name;`
    Type(QualifiedName),
}

/// `type Name { field: T; ... }`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDecl {
    name: Name,
    fields: Vec<Field>,
    span: Span,
}

impl TypeDecl {
    /// Creates a type declaration.
    ///
    /// # Errors
    /// Returns an invalid type error if `fields` is empty.
    pub fn new(name: Name, fields: Vec<Field>, span: Span) -> Result<Self> {
        if fields.is_empty() {
            return Err(Error::invalid("type", format!("{name} declares no fields")));
        }
        Ok(Self { name, fields, span })
    }

    /// Declared name.
    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Declared fields, at least one.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Where the type was declared.
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }
}

/// `context Name { field: T; ... }`: a data source states can use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextDecl {
    /// Declared name.
    pub name: Name,
    /// Declared fields; may be empty.
    pub fields: Vec<Field>,
    /// Where the context was declared.
    pub span: Span,
}

/// One case of a `next` block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NextCase {
    /// Guard; `None` for `otherwise`.
    pub condition: Option<Condition>,
    /// Successor state.
    pub target: Name,
    /// Values handed to the successor.
    pub exports: Vec<Field>,
    /// Where the case was written.
    pub span: Span,
}

impl NextCase {
    /// True for the `otherwise` case.
    #[must_use]
    pub fn is_otherwise(&self) -> bool {
        self.condition.is_none()
    }
}

/// `next { ... }`: the successor of a state, chosen by the first case whose
/// guard holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NextBlock {
    cases: Vec<NextCase>,
}

impl NextBlock {
    /// Creates the `next` block of `state`.
    ///
    /// # Errors
    /// Returns an invalid next block error if `cases` is empty.
    pub fn new(state: &Name, cases: Vec<NextCase>) -> Result<Self> {
        if cases.is_empty() {
            return Err(Error::new(ErrorKind::InvalidNextBlock {
                state: state.to_string(),
                message: "a next block needs at least one case".to_string(),
            }));
        }
        Ok(Self { cases })
    }

    /// Cases in source order, at least one.
    #[must_use]
    pub fn cases(&self) -> &[NextCase] {
        &self.cases
    }
}

/// `state Name uses A, B { ... }`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateDecl {
    /// Declared name.
    pub name: Name,
    /// Contexts listed after `uses`.
    pub uses: Vec<Name>,
    /// `use` statements of the body.
    pub imports: Vec<UseStmt>,
    /// Conditions that must hold on entry.
    pub precondition: Vec<Condition>,
    /// Data statements.
    pub body: Vec<Stmt>,
    /// Successor selection.
    pub next: NextBlock,
    /// Where the state was declared.
    pub span: Span,
}

/// A whole SCL file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    /// Type declarations in source order.
    pub types: Vec<TypeDecl>,
    /// Context declarations in source order.
    pub contexts: Vec<ContextDecl>,
    /// State declarations in source order.
    pub states: Vec<StateDecl>,
}

impl Program {
    /// Finds a state by name.
    #[must_use]
    pub fn state(&self, name: &str) -> Option<&StateDecl> {
        self.states.iter().find(|s| s.name.as_str() == name)
    }

    /// Finds a context by name.
    #[must_use]
    pub fn context(&self, name: &str) -> Option<&ContextDecl> {
        self.contexts.iter().find(|c| c.name.as_str() == name)
    }

    /// Finds a type by name.
    #[must_use]
    pub fn type_decl(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.name.as_str() == name)
    }
}

/// Escapes a string for a double-quoted SCL literal.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
