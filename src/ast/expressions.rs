use std::fmt;

use rust_decimal::Decimal;

use crate::ast::{BinOp, Token, UnOp};

/// Abstract Syntax Tree node representing a parsed expression.
///
/// Expressions appear in `WHERE` clauses and on the right-hand side of
/// `UPDATE SET` assignments. The tree is immutable once parsed and is
/// re-evaluated, unmodified, against every candidate file.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Reference to a catalog property
    ///
    /// # Example
    /// ```text
    /// Title
    /// ```
    Property(String),

    /// Literal arbitrary-precision decimal
    ///
    /// # Example
    /// ```text
    /// 1999
    /// ```
    Number(Decimal),

    /// Literal string
    ///
    /// # Example
    /// ```text
    /// 'Rock;Pop'
    /// ```
    Text(String),

    /// Parenthesized expression list
    ///
    /// Only meaningful as the right operand of `IN` / `NOT IN`, where it
    /// evaluates to an ordered collection of values.
    ///
    /// # Example
    /// ```text
    /// (1, 2, 3)
    /// ```
    Tuple(Vec<Expression>),

    /// Unary operation (`NOT x`, `-x`)
    Unary { op: UnOp, operand: Box<Expression> },

    /// Binary operation (comparison, logical, pattern, membership)
    Binary {
        op: BinOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn unary(op: UnOp, operand: Expression) -> Expression {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinOp, left: Expression, right: Expression) -> Expression {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Visit every property name referenced anywhere in this expression.
    pub fn visit_properties<'a>(&'a self, visit: &mut impl FnMut(&'a str)) {
        match self {
            Expression::Property(name) => visit(name),
            Expression::Number(_) | Expression::Text(_) => {}
            Expression::Tuple(items) => {
                for item in items {
                    item.visit_properties(visit);
                }
            }
            Expression::Unary { operand, .. } => operand.visit_properties(visit),
            Expression::Binary { left, right, .. } => {
                left.visit_properties(visit);
                right.visit_properties(visit);
            }
        }
    }
}

/// Render an identifier, quoting it when it is not a bare word or would
/// collide with a keyword.
pub(crate) fn write_identifier(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let bare = !name.is_empty()
        && name
            .chars()
            .enumerate()
            .all(|(i, c)| c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit()))
        && Token::keyword(name).is_none();
    if bare {
        f.write_str(name)
    } else {
        write!(f, "\"{}\"", name.replace('"', "\"\""))
    }
}

impl fmt::Display for Expression {
    /// Canonical fully parenthesized rendering; re-parsing it yields a
    /// structurally equal expression.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Property(name) => write_identifier(f, name),
            Expression::Number(n) => write!(f, "{}", n),
            Expression::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Expression::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
            Expression::Unary { op, operand } => match op {
                UnOp::Not => write!(f, "(NOT {})", operand),
                UnOp::Negate => write!(f, "(-{})", operand),
            },
            Expression::Binary { op, left, right } => {
                write!(f, "({} {} {})", left, op, right)
            }
        }
    }
}
