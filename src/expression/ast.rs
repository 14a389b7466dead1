//! AST for the `{{expr}}` expression language

/// Byte range in expression text
pub type Span = std::ops::Range<usize>;

/// A parsed expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A bare name: `name`
    Identifier(String),
    /// Two or more dot-separated segments: `user.address.city`
    Path(Vec<String>),
    /// An integer index into an array variable: `items[2]`
    Index { name: String, index: i64 },
    /// `cond ? a : b`
    Ternary(Box<Ternary>),
    /// A lone literal such as `"text"` or `42`
    Literal(Literal),
}

impl Expr {
    /// The variable name the expression is rooted at, if any
    pub fn root(&self) -> Option<&str> {
        match self {
            Expr::Identifier(name) | Expr::Index { name, .. } => Some(name.as_str()),
            Expr::Path(segments) => segments.first().map(|s| s.as_str()),
            Expr::Ternary(t) => t.condition.root(),
            Expr::Literal(_) => None,
        }
    }
}

/// A conditional with two literal branches
///
/// Branch text is emitted verbatim when chosen; it is never resolved again.
#[derive(Debug, Clone, PartialEq)]
pub struct Ternary {
    pub condition: Condition,
    pub then_branch: String,
    pub else_branch: String,
}

/// The test of a ternary
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Trimmed source text of the whole condition
    pub text: String,
    /// Present when the condition has the shape `left OP right`
    pub comparison: Option<Comparison>,
}

impl Condition {
    fn root(&self) -> Option<&str> {
        match &self.comparison {
            Some(cmp) if cmp.left.is_reference => Some(cmp.left.text.as_str()),
            Some(_) => None,
            None => Some(self.text.as_str()),
        }
    }
}

/// `left OP right`
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Operand,
    pub op: CompareOp,
    pub right: Operand,
}

/// One side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    /// Source text, used as the variable key to look up
    pub text: String,
    /// Text used when the operand is not a known variable; string literals
    /// lose their quotes, everything else keeps its source text
    pub literal: String,
    /// Whether the operand is a name/path/index rather than a literal
    pub is_reference: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `==`
    LooseEq,
    /// `===`
    StrictEq,
    /// `!=`
    LooseNotEq,
    /// `!==`
    StrictNotEq,
    /// `>`
    Greater,
    /// `<`
    Less,
    /// `>=`
    GreaterOrEqual,
    /// `<=`
    LessOrEqual,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::LooseEq => "==",
            CompareOp::StrictEq => "===",
            CompareOp::LooseNotEq => "!=",
            CompareOp::StrictNotEq => "!==",
            CompareOp::Greater => ">",
            CompareOp::Less => "<",
            CompareOp::GreaterOrEqual => ">=",
            CompareOp::LessOrEqual => "<=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    /// Kept as source text
    Number(String),
}
