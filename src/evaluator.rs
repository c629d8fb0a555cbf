//! Expression evaluation against one file's tag record.
//!
//! The evaluator walks an [`Expression`] tree, resolving property
//! references through the catalog and applying the SQL-flavored coercion
//! rules of the statement language. Every coercion failure is reported as
//! an [`EvalError`]; nothing is silently defaulted.

use std::fmt;
use std::path::Path;

use regex::RegexBuilder;

use crate::{
    ast::{BinOp, Expression, UnOp},
    catalog::PropertyCatalog,
    options::ExecutionOptions,
    record::TagRecord,
    value::Value,
};

/// Errors raised while evaluating an expression against a specific file.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Operand of a numeric operator is not a number
    NotNumeric { operator: &'static str, found: &'static str },

    /// Operand of LIKE / NOT LIKE is not text
    NotText { operator: &'static str, found: &'static str },

    /// Right operand of IN / NOT IN is neither delimited text nor a list
    NotEnumerable { found: &'static str },

    /// Value used as a condition is neither boolean nor numeric
    NotBoolean { found: &'static str },

    /// LIKE pattern is not a valid regular expression
    InvalidPattern { pattern: String, message: String },

    /// Property reference the catalog does not expose
    UnknownProperty(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::NotNumeric { operator, found } => {
                write!(f, "operator {} requires numbers, got {}", operator, found)
            }
            EvalError::NotText { operator, found } => {
                write!(f, "operator {} requires text, got {}", operator, found)
            }
            EvalError::NotEnumerable { found } => {
                write!(f, "right side of IN must be delimited text or a list, got {}", found)
            }
            EvalError::NotBoolean { found } => {
                write!(f, "{} cannot be used as a condition", found)
            }
            EvalError::InvalidPattern { pattern, message } => {
                write!(f, "invalid LIKE pattern '{}': {}", pattern, message)
            }
            EvalError::UnknownProperty(name) => {
                write!(f, "unknown property: {}", name)
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// Coerce a value to a condition: booleans pass through, numbers are true
/// when nonzero, anything else is an error.
pub fn as_condition(value: &Value) -> Result<bool, EvalError> {
    match value {
        Value::Boolean(b) => Ok(*b),
        Value::Number(n) => Ok(!n.is_zero()),
        other => Err(EvalError::NotBoolean {
            found: other.type_name(),
        }),
    }
}

/// Evaluates expressions against a `(record, path)` pair.
///
/// Holds only borrowed, read-only state; one evaluator serves every file
/// of a run.
pub struct Evaluator<'a> {
    catalog: &'a PropertyCatalog,
    options: &'a ExecutionOptions,
}

impl<'a> Evaluator<'a> {
    pub fn new(catalog: &'a PropertyCatalog, options: &'a ExecutionOptions) -> Self {
        Evaluator { catalog, options }
    }

    pub fn eval(
        &self,
        expr: &Expression,
        record: &dyn TagRecord,
        path: &Path,
    ) -> Result<Value, EvalError> {
        match expr {
            Expression::Property(name) => match self.catalog.get(name) {
                Some(property) => Ok(property.read(record, path)),
                None => Err(EvalError::UnknownProperty(name.clone())),
            },
            Expression::Number(n) => Ok(Value::Number(*n)),
            Expression::Text(s) => Ok(Value::Text(s.clone())),
            Expression::Tuple(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval(item, record, path)?);
                }
                Ok(Value::List(values))
            }
            Expression::Unary { op, operand } => {
                let value = self.eval(operand, record, path)?;
                self.apply_unop(*op, value)
            }
            Expression::Binary { op, left, right } => {
                let left = self.eval(left, record, path)?;
                let right = self.eval(right, record, path)?;
                self.apply_binop(*op, left, right)
            }
        }
    }

    fn apply_unop(&self, op: UnOp, value: Value) -> Result<Value, EvalError> {
        match op {
            UnOp::Not => Ok(Value::Boolean(!as_condition(&value)?)),
            UnOp::Negate => match value {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(EvalError::NotNumeric {
                    operator: "-",
                    found: other.type_name(),
                }),
            },
        }
    }

    fn apply_binop(&self, op: BinOp, left: Value, right: Value) -> Result<Value, EvalError> {
        match op {
            BinOp::Eq => Ok(Value::Boolean(self.values_equal(&left, &right))),
            BinOp::Ne => Ok(Value::Boolean(!self.values_equal(&left, &right))),
            BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => {
                let (a, b) = match (&left, &right) {
                    (Value::Number(a), Value::Number(b)) => (a, b),
                    (Value::Number(_), other) | (other, _) => {
                        return Err(EvalError::NotNumeric {
                            operator: ordering_symbol(op),
                            found: other.type_name(),
                        })
                    }
                };
                let result = match op {
                    BinOp::Lt => a < b,
                    BinOp::Gt => a > b,
                    BinOp::Le => a <= b,
                    _ => a >= b,
                };
                Ok(Value::Boolean(result))
            }
            // Both sides are always evaluated before this point; expressions
            // have no side effects, so not short-circuiting is observationally
            // equivalent.
            BinOp::And => Ok(Value::Boolean(as_condition(&left)? && as_condition(&right)?)),
            BinOp::Or => Ok(Value::Boolean(as_condition(&left)? || as_condition(&right)?)),
            BinOp::Like => Ok(Value::Boolean(self.like(&left, &right)?)),
            BinOp::NotLike => Ok(Value::Boolean(!self.like(&left, &right)?)),
            BinOp::In => Ok(Value::Boolean(self.membership(&left, &right)?)),
            BinOp::NotIn => Ok(Value::Boolean(!self.membership(&left, &right)?)),
        }
    }

    /// Equality semantics for `=` / `!=`: numbers compare numerically, a
    /// list against delimited text compares as ordered string sequences,
    /// anything else compares structurally.
    fn values_equal(&self, left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::List(items), Value::Text(text)) | (Value::Text(text), Value::List(items)) => {
                let split: Vec<&str> = text.split(self.options.list_separator).collect();
                items.len() == split.len()
                    && items
                        .iter()
                        .zip(&split)
                        .all(|(item, part)| item.render(self.options.list_separator) == **part)
            }
            (a, b) => a == b,
        }
    }

    fn like(&self, left: &Value, right: &Value) -> Result<bool, EvalError> {
        let (subject, pattern) = match (left, right) {
            (Value::Text(subject), Value::Text(pattern)) => (subject, pattern),
            (Value::Text(_), other) | (other, _) => {
                return Err(EvalError::NotText {
                    operator: "LIKE",
                    found: other.type_name(),
                })
            }
        };

        let regex = RegexBuilder::new(pattern)
            .case_insensitive(self.options.like_ignore_case)
            .build()
            .map_err(|e| EvalError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
        Ok(regex.is_match(subject))
    }

    /// Membership for `IN` / `NOT IN`. Delimited text on the right is split
    /// on the list separator and matched by exact string equality against
    /// the rendered left value; a list on the right is matched element-wise
    /// with `=` semantics.
    fn membership(&self, left: &Value, right: &Value) -> Result<bool, EvalError> {
        match right {
            Value::Text(text) => {
                let needle = left.render(self.options.list_separator);
                Ok(text
                    .split(self.options.list_separator)
                    .any(|part| part == needle))
            }
            Value::List(items) => Ok(items.iter().any(|item| self.values_equal(left, item))),
            other => Err(EvalError::NotEnumerable {
                found: other.type_name(),
            }),
        }
    }
}

fn ordering_symbol(op: BinOp) -> &'static str {
    match op {
        BinOp::Lt => "<",
        BinOp::Gt => ">",
        BinOp::Le => "<=",
        _ => ">=",
    }
}
