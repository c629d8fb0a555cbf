//! CLI support for tagsql
//!
//! Thin I/O wrappers around the statement compiler: directory scanning,
//! the console reporter, the file remover, and the end-to-end `execute`
//! entry point the binary calls.

mod tag_file;

pub use tag_file::TagFileProvider;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::{
    catalog::PropertyCatalog,
    options::ExecutionOptions,
    plan::{CompileError, ExecutionPlan},
    runner::{FileError, FileRemover, RemoveError, Reporter, RunOutcome, Runner},
};

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Statement failed to parse or validate
    Compile(CompileError),
    /// Invalid file-name regex
    Regex(regex::Error),
    /// IO error
    Io(io::Error),
    /// No directory given and no platform music directory available
    NoDirectory,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Compile(e) => write!(f, "Statement error: {}", e),
            CliError::Regex(e) => write!(f, "Invalid file regex: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoDirectory => write!(
                f,
                "No directory given and no platform music directory found. Use -d/--directory."
            ),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Compile(e) => Some(e),
            CliError::Regex(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::NoDirectory => None,
        }
    }
}

impl From<CompileError> for CliError {
    fn from(e: CompileError) -> Self {
        CliError::Compile(e)
    }
}

impl From<regex::Error> for CliError {
    fn from(e: regex::Error) -> Self {
        CliError::Regex(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

/// Recursively collect candidate files under `root` whose path matches
/// `file_regex`, in a deterministic (file-name sorted) order.
pub fn collect_files(root: &Path, file_regex: &Regex) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| file_regex.is_match(&path.to_string_lossy()))
        .collect()
}

/// Console reporter: rows and notices to stdout, failures to stderr.
///
/// Failures always print a concise message; the full error chain only
/// under verbose.
pub struct ConsoleReporter {
    pub verbose: bool,
}

impl Reporter for ConsoleReporter {
    fn row(&mut self, line: &str) {
        println!("{}", line);
    }

    fn notice(&mut self, message: &str) {
        println!("{}", message);
    }

    fn failure(&mut self, path: &Path, error: &FileError) {
        eprintln!("{}: {}", path.display(), error);
        if self.verbose {
            let mut source = std::error::Error::source(error);
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
        }
    }
}

/// Deletion provider over the real file system: permanent removal or the
/// platform recycle bin.
pub struct FsRemover;

impl FileRemover for FsRemover {
    fn remove(&mut self, path: &Path, recycle: bool) -> Result<(), RemoveError> {
        let result = if recycle {
            trash::delete(path).map_err(|e| e.to_string())
        } else {
            std::fs::remove_file(path).map_err(|e| e.to_string())
        };
        result.map_err(|message| RemoveError { message })
    }
}

/// Compile `statement`, scan `directory`, and run the plan over every
/// matching file. Compilation failures abort before any file is opened.
pub fn execute(
    statement: &str,
    directory: &Path,
    file_regex: &Regex,
    options: &ExecutionOptions,
) -> Result<RunOutcome, CliError> {
    let catalog = PropertyCatalog::global();
    let plan = ExecutionPlan::prepare(statement, catalog)?;

    let files = collect_files(directory, file_regex);
    tracing::debug!(count = files.len(), "collected candidate files");

    let runner = Runner::new(&plan, catalog, options);
    let mut reporter = ConsoleReporter {
        verbose: options.verbose,
    };
    Ok(runner.run(&files, &TagFileProvider, &mut FsRemover, &mut reporter))
}
