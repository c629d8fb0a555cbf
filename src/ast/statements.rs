use std::fmt;

use crate::ast::expressions::write_identifier;
use crate::ast::Expression;

/// Column projection of a `SELECT` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSpec {
    /// `SELECT *` - every catalog property, in canonical catalog order
    All,
    /// Explicit column list; duplicates permitted, order is print order
    Named(Vec<String>),
}

/// One `property = expression` pair in an `UPDATE SET` list.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub property: String,
    pub value: Expression,
}

/// A parsed statement.
///
/// Built exactly once per invocation and applied, unmodified, to every
/// candidate file.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Print matching files
    ///
    /// # Example
    /// ```text
    /// SELECT Title, Album WHERE Year > 2000
    /// ```
    Select {
        columns: ColumnSpec,
        filter: Option<Expression>,
    },

    /// Assign tag fields on matching files
    ///
    /// Assignments apply in declared order; a successful run commits the
    /// record once after all assignments.
    ///
    /// # Example
    /// ```text
    /// UPDATE SET Genres = 'Rock;Pop' WHERE Album = 'Legacy'
    /// ```
    Update {
        assignments: Vec<Assignment>,
        filter: Option<Expression>,
    },

    /// Remove matching files from disk (or move them to the recycle bin)
    ///
    /// # Example
    /// ```text
    /// DELETE WHERE Track NOT IN (1, 2, 3)
    /// ```
    Delete { filter: Option<Expression> },
}

impl Statement {
    pub fn filter(&self) -> Option<&Expression> {
        match self {
            Statement::Select { filter, .. }
            | Statement::Update { filter, .. }
            | Statement::Delete { filter } => filter.as_ref(),
        }
    }
}

fn write_filter(f: &mut fmt::Formatter<'_>, filter: &Option<Expression>) -> fmt::Result {
    if let Some(expr) = filter {
        write!(f, " WHERE {}", expr)?;
    }
    Ok(())
}

impl fmt::Display for Statement {
    /// Canonical rendering; re-parsing it yields an equal statement.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Select { columns, filter } => {
                f.write_str("SELECT ")?;
                match columns {
                    ColumnSpec::All => f.write_str("*")?,
                    ColumnSpec::Named(names) => {
                        for (i, name) in names.iter().enumerate() {
                            if i > 0 {
                                f.write_str(", ")?;
                            }
                            write_identifier(f, name)?;
                        }
                    }
                }
                write_filter(f, filter)
            }
            Statement::Update {
                assignments,
                filter,
            } => {
                f.write_str("UPDATE SET ")?;
                for (i, assignment) in assignments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_identifier(f, &assignment.property)?;
                    write!(f, " = {}", assignment.value)?;
                }
                write_filter(f, filter)
            }
            Statement::Delete { filter } => {
                f.write_str("DELETE")?;
                write_filter(f, filter)
            }
        }
    }
}
