use std::fmt;

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    /// Logical negation (`NOT`)
    Not,
    /// Numeric negation (`-`)
    Negate,
}

/// Binary operators.
///
/// Comparison, LIKE, and IN share the highest precedence group (8),
/// above `NOT` (6), `AND` (5), and `OR` (4). Arithmetic and bitwise
/// tokens are reserved at levels 9-10 but have no operator here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Comparison
    /// Equal (`=`)
    Eq,
    /// Not equal (`!=` or `<>`)
    Ne,
    /// Less than (`<`)
    Lt,
    /// Greater than (`>`)
    Gt,
    /// Less than or equal (`<=`)
    Le,
    /// Greater than or equal (`>=`)
    Ge,

    // Logical
    /// Logical AND (`AND`)
    And,
    /// Logical OR (`OR`)
    Or,

    // Pattern and membership
    /// Regex pattern match (`LIKE`)
    Like,
    /// Negated pattern match (`NOT LIKE`)
    NotLike,
    /// Membership test (`IN`)
    In,
    /// Negated membership test (`NOT IN`)
    NotIn,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BinOp::Eq => "=",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::And => "AND",
            BinOp::Or => "OR",
            BinOp::Like => "LIKE",
            BinOp::NotLike => "NOT LIKE",
            BinOp::In => "IN",
            BinOp::NotIn => "NOT IN",
        };
        f.write_str(text)
    }
}
