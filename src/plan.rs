//! Statement compilation: identifier validation and the executable plan.
//!
//! Compilation is fail-fast: every property name the statement mentions,
//! whether in an explicit column/assignment list or inside a WHERE or
//! assignment expression, is resolved against the catalog before any file
//! is opened. A typo therefore aborts the whole invocation with zero file
//! operations instead of mutating part of a file set.

use std::fmt;

use crate::{
    ast::{ColumnSpec, Expression, Statement},
    catalog::{PropertyCatalog, PropertyDef},
    parser::{self, ParseError},
};

/// Build-time failure: the statement cannot be compiled into a plan.
#[derive(Debug)]
pub enum CompileError {
    /// Malformed statement text
    Parse(ParseError),
    /// Statement references a name the catalog does not expose
    UnknownProperty(String),
    /// Assignment targets a property with no setter
    ReadOnlyProperty(String),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Parse(e) => write!(f, "{}", e),
            CompileError::UnknownProperty(name) => write!(f, "unknown property: {}", name),
            CompileError::ReadOnlyProperty(name) => {
                write!(f, "property {} is read-only", name)
            }
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        CompileError::Parse(e)
    }
}

/// The effect a plan applies to each matched file.
#[derive(Debug)]
pub enum RowAction {
    /// Print one line per matched file, one resolved property per column
    Select { columns: Vec<&'static PropertyDef> },
    /// Stage assignments in declared order, then commit once
    Update {
        assignments: Vec<(&'static PropertyDef, Expression)>,
    },
    /// Remove the file (permanently or to the recycle bin)
    Delete,
}

/// A compiled statement: the `{predicate, action}` pair applied to every
/// candidate file.
///
/// Built exactly once per statement and reused, unmodified, across the
/// whole run.
#[derive(Debug)]
pub struct ExecutionPlan {
    predicate: Option<Expression>,
    action: RowAction,
}

impl ExecutionPlan {
    /// Validate `statement` against `catalog` and compile it.
    pub fn compile(
        statement: Statement,
        catalog: &PropertyCatalog,
    ) -> Result<ExecutionPlan, CompileError> {
        let filter = statement.filter().cloned();
        if let Some(expr) = &filter {
            validate_expression(expr, catalog)?;
        }

        let action = match statement {
            Statement::Select { columns, .. } => {
                let columns = match columns {
                    ColumnSpec::All => catalog.properties().collect(),
                    ColumnSpec::Named(names) => {
                        let mut resolved = Vec::with_capacity(names.len());
                        for name in names {
                            let property = catalog
                                .get(&name)
                                .ok_or(CompileError::UnknownProperty(name))?;
                            resolved.push(property);
                        }
                        resolved
                    }
                };
                RowAction::Select { columns }
            }
            Statement::Update { assignments, .. } => {
                let mut resolved = Vec::with_capacity(assignments.len());
                for assignment in assignments {
                    let property = catalog
                        .get(&assignment.property)
                        .ok_or(CompileError::UnknownProperty(assignment.property.clone()))?;
                    if !property.writable() {
                        return Err(CompileError::ReadOnlyProperty(assignment.property));
                    }
                    validate_expression(&assignment.value, catalog)?;
                    resolved.push((property, assignment.value));
                }
                RowAction::Update {
                    assignments: resolved,
                }
            }
            Statement::Delete { .. } => RowAction::Delete,
        };

        Ok(ExecutionPlan {
            predicate: filter,
            action,
        })
    }

    /// Parse and compile statement text in one step.
    pub fn prepare(text: &str, catalog: &PropertyCatalog) -> Result<ExecutionPlan, CompileError> {
        let statement = parser::parse(text)?;
        ExecutionPlan::compile(statement, catalog)
    }

    /// The WHERE expression; `None` means every file matches.
    pub fn predicate(&self) -> Option<&Expression> {
        self.predicate.as_ref()
    }

    pub fn action(&self) -> &RowAction {
        &self.action
    }

    /// Header row for SELECT output, used when column names are requested.
    pub fn column_header(&self, column_separator: &str) -> Option<String> {
        match &self.action {
            RowAction::Select { columns } => {
                let names: Vec<&str> = columns.iter().map(|c| c.name).collect();
                Some(names.join(column_separator))
            }
            _ => None,
        }
    }
}

/// Eagerly resolve every property reference inside an expression, so an
/// unknown name fails the build instead of failing per file at evaluation
/// time.
fn validate_expression(
    expr: &Expression,
    catalog: &PropertyCatalog,
) -> Result<(), CompileError> {
    let mut unknown: Option<String> = None;
    expr.visit_properties(&mut |name| {
        if unknown.is_none() && catalog.get(name).is_none() {
            unknown = Some(name.to_string());
        }
    });
    match unknown {
        Some(name) => Err(CompileError::UnknownProperty(name)),
        None => Ok(()),
    }
}
