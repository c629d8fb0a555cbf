//! Sequential plan execution with per-file failure containment.
//!
//! The runner owns the iteration contract of the statement language: files
//! are processed one at a time in the order supplied, each record is opened
//! before the predicate runs and released before the next file begins, and
//! any per-file failure is reported and skipped without stopping the run.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::{
    catalog::{AssignmentError, PropertyCatalog},
    evaluator::{as_condition, EvalError, Evaluator},
    options::ExecutionOptions,
    plan::{ExecutionPlan, RowAction},
    record::{CommitError, OpenError, RecordProvider},
};

/// Failure removing a file from disk.
#[derive(Debug)]
pub struct RemoveError {
    pub message: String,
}

impl fmt::Display for RemoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot remove file: {}", self.message)
    }
}

impl std::error::Error for RemoveError {}

/// Removes files, permanently or to the platform recycle bin.
pub trait FileRemover {
    fn remove(&mut self, path: &Path, recycle: bool) -> Result<(), RemoveError>;
}

/// Receives run output: select rows, action notices, per-file failures.
pub trait Reporter {
    /// One SELECT output line.
    fn row(&mut self, line: &str);
    /// One action log line ("deleted ...", "would update ...").
    fn notice(&mut self, message: &str);
    /// A contained per-file failure; the run continues.
    fn failure(&mut self, path: &Path, error: &FileError);
}

/// Everything that can go wrong for one file without aborting the run.
#[derive(Debug)]
pub enum FileError {
    Open(OpenError),
    Eval(EvalError),
    Assignment(AssignmentError),
    Commit(CommitError),
    Remove(RemoveError),
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::Open(e) => write!(f, "{}", e),
            FileError::Eval(e) => write!(f, "{}", e),
            FileError::Assignment(e) => write!(f, "{}", e),
            FileError::Commit(e) => write!(f, "{}", e),
            FileError::Remove(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::Open(e) => Some(e),
            FileError::Eval(e) => Some(e),
            FileError::Assignment(e) => Some(e),
            FileError::Commit(e) => Some(e),
            FileError::Remove(e) => Some(e),
        }
    }
}

/// Counts for the final outcome line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Files whose predicate and action completed without error
    pub processed: usize,
    /// Files the predicate matched
    pub matched: usize,
    /// Files skipped because of a contained failure
    pub failed: usize,
}

/// Applies one compiled plan to a sequence of candidate files.
pub struct Runner<'a> {
    plan: &'a ExecutionPlan,
    catalog: &'a PropertyCatalog,
    options: &'a ExecutionOptions,
}

impl<'a> Runner<'a> {
    pub fn new(
        plan: &'a ExecutionPlan,
        catalog: &'a PropertyCatalog,
        options: &'a ExecutionOptions,
    ) -> Self {
        Runner {
            plan,
            catalog,
            options,
        }
    }

    pub fn run(
        &self,
        paths: &[PathBuf],
        provider: &dyn RecordProvider,
        remover: &mut dyn FileRemover,
        reporter: &mut dyn Reporter,
    ) -> RunOutcome {
        let mut outcome = RunOutcome::default();

        if self.options.print_column_names {
            if let Some(header) = self.plan.column_header(&self.options.column_separator) {
                reporter.row(&header);
            }
        }

        let evaluator = Evaluator::new(self.catalog, self.options);

        for path in paths {
            match self.run_one(path, &evaluator, provider, remover, reporter) {
                Ok(matched) => {
                    outcome.processed += 1;
                    if matched {
                        outcome.matched += 1;
                    }
                }
                Err(error) => {
                    outcome.failed += 1;
                    tracing::warn!(path = %path.display(), error = %error, "skipping file");
                    reporter.failure(path, &error);
                }
            }
        }

        outcome
    }

    /// Process one file: open, test the predicate, apply the action.
    /// Returns whether the predicate matched.
    fn run_one(
        &self,
        path: &Path,
        evaluator: &Evaluator<'_>,
        provider: &dyn RecordProvider,
        remover: &mut dyn FileRemover,
        reporter: &mut dyn Reporter,
    ) -> Result<bool, FileError> {
        let mut record = provider.open(path).map_err(FileError::Open)?;

        let matched = match self.plan.predicate() {
            Some(expr) => {
                let value = evaluator
                    .eval(expr, record.as_ref(), path)
                    .map_err(FileError::Eval)?;
                as_condition(&value).map_err(FileError::Eval)?
            }
            None => true,
        };
        if !matched {
            tracing::debug!(path = %path.display(), "predicate did not match");
            return Ok(false);
        }

        match self.plan.action() {
            RowAction::Select { columns } => {
                let line: Vec<String> = columns
                    .iter()
                    .map(|column| {
                        column
                            .read(record.as_ref(), path)
                            .render(self.options.list_separator)
                    })
                    .collect();
                reporter.row(&line.join(&self.options.column_separator));
            }
            RowAction::Update { assignments } => {
                for (property, expr) in assignments {
                    let value = evaluator
                        .eval(expr, record.as_ref(), path)
                        .map_err(FileError::Eval)?;
                    property
                        .write(record.as_mut(), value, self.options)
                        .map_err(FileError::Assignment)?;
                }
                if self.options.dry_run {
                    self.notice(reporter, &format!("would update {}", path.display()));
                } else {
                    record.commit().map_err(FileError::Commit)?;
                    self.notice(reporter, &format!("updated {}", path.display()));
                }
            }
            RowAction::Delete => {
                // release the record before touching the file itself
                drop(record);
                if self.options.dry_run {
                    self.notice(reporter, &format!("would delete {}", path.display()));
                } else {
                    remover
                        .remove(path, self.options.recycle)
                        .map_err(FileError::Remove)?;
                    let verb = if self.options.recycle {
                        "recycled"
                    } else {
                        "deleted"
                    };
                    self.notice(reporter, &format!("{} {}", verb, path.display()));
                }
            }
        }

        Ok(true)
    }

    fn notice(&self, reporter: &mut dyn Reporter, message: &str) {
        tracing::debug!("{}", message);
        if self.options.verbose || self.options.dry_run {
            reporter.notice(message);
        }
    }
}
