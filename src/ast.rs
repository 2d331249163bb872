//! Abstract Syntax Tree for schist

use std::rc::Rc;

pub type Ident = String;

/// Source location of a token or node.
///
/// `line` and `column` are 1-indexed (column counts characters, not bytes);
/// `offset` is the 0-indexed byte offset into the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: Rc<str>,
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl Location {
    pub fn new(file: Rc<str>, line: u32, column: u32, offset: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset,
        }
    }

    /// The location `n` characters to the right on the same line
    pub fn shifted(&self, n: u32) -> Location {
        Location {
            file: self.file.clone(),
            line: self.line,
            column: self.column + n,
            offset: self.offset + n as usize,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self {
            file: Rc::from("<input>"),
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// An AST node tagged with the location of its leftmost token
#[derive(Debug, Clone, PartialEq)]
pub struct Located<T> {
    pub node: T,
    pub loc: Location,
}

impl<T> Located<T> {
    pub fn new(node: T, loc: Location) -> Self {
        Self { node, loc }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Unit,
    /// Only produced by patterns
    Null,
}

// ============================================================================
// Expressions
// ============================================================================

pub type Expr = Located<ExprKind>;

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // Literals
    Lit(Literal),

    // Variable reference (constructors included: `Some`, `None`)
    Var(Ident),

    UnaryOp {
        op: UnaryOp,
        expr: Box<Expr>,
    },

    BinOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    // Call: f(a, b)
    App {
        func: Box<Expr>,
        args: Vec<Expr>,
    },

    // Lambda: (x, y: Int): Int => body
    Lambda {
        params: Vec<LambdaParam>,
        return_type: Option<TypeExpr>,
        body: Box<Expr>,
    },

    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },

    Match {
        expr: Box<Expr>,
        cases: Vec<MatchCase>,
    },

    // Record construction: { x: 1, y }
    Record {
        fields: Vec<RecordEntry>,
    },

    // Record update: { ...base, x: 1 }
    RecordUpdate {
        record: Box<Expr>,
        updates: Vec<RecordEntry>,
    },

    List {
        elements: Vec<ListElement>,
    },

    // Field access: r.field
    RecordAccess {
        record: Box<Expr>,
        field: Ident,
    },

    // x |> f
    Pipe {
        expr: Box<Expr>,
        func: Box<Expr>,
    },

    Block {
        exprs: Vec<Expr>,
    },

    Unsafe {
        expr: Box<Expr>,
    },

    // (e : T)
    TypeAnnotation {
        expr: Box<Expr>,
        type_expr: TypeExpr,
    },

    While {
        condition: Box<Expr>,
        body: Box<Expr>,
    },

    Tuple {
        elements: Vec<Expr>,
    },

    /// Block-local binding statement: `let [mut] [rec] pat = value;`
    Let {
        pattern: Pattern,
        value: Box<Expr>,
        mutable: bool,
        recursive: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    LogicalNot,
    Deref,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Concat,
    Cons,
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    LogicalAnd,
    LogicalOr,
    ForwardCompose,
    BackwardCompose,
    RefAssign,
}

impl BinOp {
    /// Source spelling of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Subtract => "-",
            BinOp::Multiply => "*",
            BinOp::Divide => "/",
            BinOp::Modulo => "%",
            BinOp::Concat => "&",
            BinOp::Cons => "::",
            BinOp::Equal => "==",
            BinOp::NotEqual => "!=",
            BinOp::LessThan => "<",
            BinOp::LessEqual => "<=",
            BinOp::GreaterThan => ">",
            BinOp::GreaterEqual => ">=",
            BinOp::LogicalAnd => "&&",
            BinOp::LogicalOr => "||",
            BinOp::ForwardCompose => ">>",
            BinOp::BackwardCompose => "<<",
            BinOp::RefAssign => ":=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaParam {
    pub pattern: Pattern,
    /// Absent when the parameter is unannotated
    pub type_annotation: Option<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchCase {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: Expr,
    pub loc: Location,
}

/// Entry of a record literal or record update, kept in source order.
/// Later entries override earlier ones on conflicting field names.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordEntry {
    Field {
        name: Ident,
        value: Expr,
        loc: Location,
    },
    Spread(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListElement {
    Element(Expr),
    Spread(Expr),
}

// ============================================================================
// Patterns
// ============================================================================

pub type Pattern = Located<PatternKind>;

#[derive(Debug, Clone, PartialEq)]
pub enum PatternKind {
    Var(Ident),
    Wildcard,
    Literal(Literal),
    // Some(x), Ok(Some(_))
    Constructor {
        constructor: Ident,
        args: Vec<Pattern>,
    },
    // { x, y: p }
    Record {
        fields: Vec<RecordPatternField>,
    },
    // [a, b, ...rest]
    List {
        elements: Vec<Pattern>,
        rest: Option<Box<Pattern>>,
    },
    /// Always holds at least two alternatives
    Or {
        patterns: Vec<Pattern>,
    },
    TypeAnnotated {
        pattern: Box<Pattern>,
        type_expr: TypeExpr,
    },
    Tuple {
        elements: Vec<Pattern>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordPatternField {
    pub name: Ident,
    /// `{ x }` is stored as `{ x: x }`
    pub pattern: Pattern,
    pub loc: Location,
}

// ============================================================================
// Type expressions
// ============================================================================

pub type TypeExpr = Located<TypeExprKind>;

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExprKind {
    // Lowercase-leading name: a
    Var(Ident),
    // Uppercase-leading name: Int, T
    Const(Ident),
    // (A, B) -> C
    Function {
        params: Vec<TypeExpr>,
        return_type: Box<TypeExpr>,
    },
    // List<Int>, Result(A, E)
    App {
        constructor: Box<TypeExpr>,
        args: Vec<TypeExpr>,
    },
    Record {
        fields: Vec<RecordTypeField>,
    },
    /// Always holds at least two alternatives
    Union {
        types: Vec<TypeExpr>,
    },
    Tuple {
        elements: Vec<TypeExpr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordTypeField {
    pub name: Ident,
    pub type_expr: TypeExpr,
    pub loc: Location,
}

// ============================================================================
// Declarations
// ============================================================================

pub type Declaration = Located<DeclKind>;

#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    Let {
        pattern: Pattern,
        value: Expr,
        mutable: bool,
        recursive: bool,
        exported: bool,
    },

    /// `let rec a = ... and b = ...`
    LetRecGroup {
        bindings: Vec<LetBinding>,
        exported: bool,
    },

    Type {
        name: Ident,
        params: Vec<Ident>,
        definition: TypeDefinition,
        exported: bool,
    },

    External {
        name: Ident,
        type_expr: TypeExpr,
        js_name: String,
        from: Option<String>,
        exported: bool,
    },

    ExternalBlock {
        items: Vec<ExternalItem>,
        from: Option<String>,
        exported: bool,
    },

    Import {
        items: Vec<ImportItem>,
        from: String,
    },

    /// `export { a } from "m"`; `items` is `None` for `export * from "m"`
    ReExport {
        items: Option<Vec<ImportItem>>,
        from: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetBinding {
    pub pattern: Pattern,
    pub value: Expr,
    pub mutable: bool,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefinition {
    Alias(TypeExpr),
    Record(Vec<RecordTypeField>),
    Variant(Vec<VariantConstructor>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantConstructor {
    pub name: Ident,
    pub args: Vec<TypeExpr>,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExternalItem {
    Value {
        name: Ident,
        type_expr: TypeExpr,
        js_name: String,
        loc: Location,
    },
    Type {
        name: Ident,
        params: Vec<Ident>,
        type_expr: TypeExpr,
        loc: Location,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportItem {
    // a, type T, a as b
    Named {
        name: Ident,
        alias: Option<Ident>,
        is_type: bool,
        loc: Location,
    },
    // * as M
    Namespace {
        alias: Ident,
        loc: Location,
    },
}

impl DeclKind {
    pub fn is_import(&self) -> bool {
        matches!(self, DeclKind::Import { .. })
    }
}

/// A parsed source file
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub imports: Vec<Declaration>,
    pub declarations: Vec<Declaration>,
    pub loc: Location,
}
