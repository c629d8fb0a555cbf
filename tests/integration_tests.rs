// tests/integration_tests.rs
//
// End-to-end runs over in-memory tag records: a path-keyed provider hands
// out shared handles so tests can inspect record state after the run.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tagsql::catalog::PropertyCatalog;
use tagsql::options::ExecutionOptions;
use tagsql::plan::ExecutionPlan;
use tagsql::record::{
    CommitError, MemoryRecord, OpenError, RecordProvider, TagField, TagRecord,
};
use tagsql::runner::{FileError, FileRemover, RemoveError, Reporter, RunOutcome, Runner};

/// Handle into a provider-owned record, so a test can look at the record
/// after the runner has released its boxed view.
struct SharedRecord(Rc<RefCell<MemoryRecord>>);

impl TagRecord for SharedRecord {
    fn text(&self, field: TagField) -> Option<String> {
        self.0.borrow().text(field)
    }

    fn text_list(&self, field: TagField) -> Vec<String> {
        self.0.borrow().text_list(field)
    }

    fn number(&self, field: TagField) -> Option<u32> {
        self.0.borrow().number(field)
    }

    fn set_text(&mut self, field: TagField, value: String) {
        self.0.borrow_mut().set_text(field, value)
    }

    fn set_text_list(&mut self, field: TagField, values: Vec<String>) {
        self.0.borrow_mut().set_text_list(field, values)
    }

    fn set_number(&mut self, field: TagField, value: u32) {
        self.0.borrow_mut().set_number(field, value)
    }

    fn commit(&mut self) -> Result<(), CommitError> {
        self.0.borrow_mut().commit()
    }
}

#[derive(Default)]
struct MapProvider {
    records: HashMap<PathBuf, Rc<RefCell<MemoryRecord>>>,
    opens: Cell<usize>,
}

impl MapProvider {
    /// Register a record and return the shared handle for later inspection.
    fn add(&mut self, path: &str, record: MemoryRecord) -> Rc<RefCell<MemoryRecord>> {
        let handle = Rc::new(RefCell::new(record));
        self.records.insert(PathBuf::from(path), Rc::clone(&handle));
        handle
    }
}

impl RecordProvider for MapProvider {
    fn open(&self, path: &Path) -> Result<Box<dyn TagRecord>, OpenError> {
        self.opens.set(self.opens.get() + 1);
        match self.records.get(path) {
            Some(handle) => Ok(Box::new(SharedRecord(Rc::clone(handle)))),
            None => Err(OpenError {
                message: format!("no record for {}", path.display()),
            }),
        }
    }
}

#[derive(Default)]
struct RecordingReporter {
    rows: Vec<String>,
    notices: Vec<String>,
    failures: Vec<String>,
}

impl Reporter for RecordingReporter {
    fn row(&mut self, line: &str) {
        self.rows.push(line.to_string());
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn failure(&mut self, path: &Path, error: &FileError) {
        self.failures.push(format!("{}: {}", path.display(), error));
    }
}

#[derive(Default)]
struct CountingRemover {
    removed: Vec<(PathBuf, bool)>,
}

impl FileRemover for CountingRemover {
    fn remove(&mut self, path: &Path, recycle: bool) -> Result<(), RemoveError> {
        self.removed.push((path.to_path_buf(), recycle));
        Ok(())
    }
}

fn run(
    statement: &str,
    paths: &[&str],
    provider: &MapProvider,
    options: &ExecutionOptions,
) -> (RunOutcome, RecordingReporter, CountingRemover) {
    let catalog = PropertyCatalog::global();
    let plan = ExecutionPlan::prepare(statement, catalog).expect("compile failure");
    let paths: Vec<PathBuf> = paths.iter().map(|p| PathBuf::from(*p)).collect();
    let mut reporter = RecordingReporter::default();
    let mut remover = CountingRemover::default();
    let outcome = Runner::new(&plan, catalog, options).run(
        &paths,
        provider,
        &mut remover,
        &mut reporter,
    );
    (outcome, reporter, remover)
}

fn library() -> MapProvider {
    let mut provider = MapProvider::default();
    provider.add(
        "/music/a.mp3",
        MemoryRecord::new()
            .with_text(TagField::Title, "Dawn")
            .with_text(TagField::Album, "Legacy")
            .with_number(TagField::Year, 1999)
            .with_number(TagField::Track, 1),
    );
    provider.add(
        "/music/b.mp3",
        MemoryRecord::new()
            .with_text(TagField::Title, "Noon")
            .with_text(TagField::Album, "Legacy")
            .with_number(TagField::Year, 2001)
            .with_number(TagField::Track, 2),
    );
    provider.add(
        "/music/c.mp3",
        MemoryRecord::new()
            .with_text(TagField::Title, "Dusk")
            .with_text(TagField::Album, "Horizon")
            .with_number(TagField::Year, 2005)
            .with_number(TagField::Track, 7),
    );
    provider
}

const PATHS: [&str; 3] = ["/music/a.mp3", "/music/b.mp3", "/music/c.mp3"];

// ============================================================================
// SELECT
// ============================================================================

#[test]
fn test_select_prints_matching_rows() {
    let provider = library();
    let (outcome, reporter, _) = run(
        "SELECT Title WHERE Year > 2000",
        &PATHS,
        &provider,
        &ExecutionOptions::default(),
    );
    assert_eq!(reporter.rows, vec!["Noon", "Dusk"]);
    assert_eq!(outcome.processed, 3);
    assert_eq!(outcome.matched, 2);
    assert_eq!(outcome.failed, 0);
}

#[test]
fn test_select_without_where_visits_all_in_order() {
    let provider = library();
    let (outcome, reporter, _) = run(
        "SELECT FilePath",
        &PATHS,
        &provider,
        &ExecutionOptions::default(),
    );
    assert_eq!(reporter.rows, PATHS.to_vec());
    assert_eq!(outcome.matched, 3);
    assert_eq!(provider.opens.get(), 3);
}

#[test]
fn test_select_joins_columns_and_renders_lists() {
    let mut provider = MapProvider::default();
    provider.add(
        "/music/a.mp3",
        MemoryRecord::new()
            .with_text(TagField::Title, "Dawn")
            .with_list(TagField::Genres, &["Rock", "Pop"]),
    );
    let (_, reporter, _) = run(
        "SELECT Title, Genres, Year",
        &["/music/a.mp3"],
        &provider,
        &ExecutionOptions::default(),
    );
    // absent Year renders as the empty string
    assert_eq!(reporter.rows, vec!["Dawn\tRock;Pop\t"]);
}

#[test]
fn test_column_header_row_comes_first() {
    let provider = library();
    let options = ExecutionOptions {
        print_column_names: true,
        ..ExecutionOptions::default()
    };
    let (_, reporter, _) = run(
        "SELECT Title, Album WHERE Year > 2000",
        &PATHS,
        &provider,
        &options,
    );
    assert_eq!(reporter.rows[0], "Title\tAlbum");
    assert_eq!(reporter.rows.len(), 3);
}

#[test]
fn test_custom_column_separator() {
    let provider = library();
    let options = ExecutionOptions {
        column_separator: " | ".to_string(),
        ..ExecutionOptions::default()
    };
    let (_, reporter, _) = run(
        "SELECT Title, Year WHERE Track = 1",
        &PATHS,
        &provider,
        &options,
    );
    assert_eq!(reporter.rows, vec!["Dawn | 1999"]);
}

// ============================================================================
// UPDATE
// ============================================================================

#[test]
fn test_update_stages_and_commits_once() {
    let mut provider = MapProvider::default();
    let matched = provider.add(
        "/music/a.mp3",
        MemoryRecord::new().with_text(TagField::Album, "Legacy"),
    );
    let untouched = provider.add(
        "/music/b.mp3",
        MemoryRecord::new().with_text(TagField::Album, "Horizon"),
    );

    let (outcome, _, _) = run(
        "UPDATE SET Genres = 'Rock;Pop' WHERE Album = 'Legacy'",
        &["/music/a.mp3", "/music/b.mp3"],
        &provider,
        &ExecutionOptions::default(),
    );

    assert_eq!(outcome.matched, 1);
    assert_eq!(
        matched.borrow().text_list(TagField::Genres),
        vec!["Rock", "Pop"]
    );
    assert_eq!(matched.borrow().commit_calls, 1);
    assert_eq!(untouched.borrow().set_calls, 0);
    assert_eq!(untouched.borrow().commit_calls, 0);
}

#[test]
fn test_update_numeric_assignment() {
    let mut provider = MapProvider::default();
    let handle = provider.add(
        "/music/a.mp3",
        MemoryRecord::new().with_number(TagField::Year, 1999),
    );
    run(
        "UPDATE SET Year = 2024",
        &["/music/a.mp3"],
        &provider,
        &ExecutionOptions::default(),
    );
    assert_eq!(handle.borrow().number(TagField::Year), Some(2024));
}

#[test]
fn test_update_dry_run_never_commits() {
    let mut provider = MapProvider::default();
    let handle = provider.add(
        "/music/a.mp3",
        MemoryRecord::new().with_text(TagField::Title, "Old"),
    );
    let options = ExecutionOptions {
        dry_run: true,
        ..ExecutionOptions::default()
    };
    let (_, reporter, _) = run(
        "UPDATE SET Title = 'New'",
        &["/music/a.mp3"],
        &provider,
        &options,
    );
    assert_eq!(handle.borrow().commit_calls, 0);
    assert_eq!(reporter.notices, vec!["would update /music/a.mp3"]);
}

#[test]
fn test_update_notices_require_verbose() {
    let provider = library();
    let (_, quiet, _) = run(
        "UPDATE SET Comment = 'x' WHERE Track = 1",
        &PATHS,
        &provider,
        &ExecutionOptions::default(),
    );
    assert!(quiet.notices.is_empty());

    let provider = library();
    let options = ExecutionOptions {
        verbose: true,
        ..ExecutionOptions::default()
    };
    let (_, verbose, _) = run(
        "UPDATE SET Comment = 'x' WHERE Track = 1",
        &PATHS,
        &provider,
        &options,
    );
    assert_eq!(verbose.notices, vec!["updated /music/a.mp3"]);
}

#[test]
fn test_update_type_mismatch_is_contained() {
    let mut provider = MapProvider::default();
    let bad = provider.add("/music/a.mp3", MemoryRecord::new());
    let good = provider.add(
        "/music/b.mp3",
        MemoryRecord::new().with_number(TagField::Year, 1999),
    );

    let (outcome, reporter, _) = run(
        "UPDATE SET Year = 'soon'",
        &["/music/a.mp3", "/music/b.mp3"],
        &provider,
        &ExecutionOptions::default(),
    );

    // the shape check fails on every file, nothing ever commits
    assert_eq!(outcome.failed, 2);
    assert_eq!(reporter.failures.len(), 2);
    assert_eq!(bad.borrow().commit_calls, 0);
    assert_eq!(good.borrow().commit_calls, 0);
    assert_eq!(good.borrow().number(TagField::Year), Some(1999));
}

// ============================================================================
// DELETE
// ============================================================================

#[test]
fn test_delete_removes_only_matching_files() {
    let provider = library();
    let (outcome, _, remover) = run(
        "DELETE WHERE Track NOT IN (1, 2, 3)",
        &PATHS,
        &provider,
        &ExecutionOptions::default(),
    );
    assert_eq!(outcome.matched, 1);
    assert_eq!(
        remover.removed,
        vec![(PathBuf::from("/music/c.mp3"), false)]
    );
}

#[test]
fn test_delete_recycle_flag_reaches_the_remover() {
    let provider = library();
    let options = ExecutionOptions {
        recycle: true,
        verbose: true,
        ..ExecutionOptions::default()
    };
    let (_, reporter, remover) = run("DELETE WHERE Track = 2", &PATHS, &provider, &options);
    assert_eq!(remover.removed, vec![(PathBuf::from("/music/b.mp3"), true)]);
    assert_eq!(reporter.notices, vec!["recycled /music/b.mp3"]);
}

#[test]
fn test_delete_dry_run_touches_nothing() {
    let provider = library();
    let options = ExecutionOptions {
        dry_run: true,
        ..ExecutionOptions::default()
    };
    let (outcome, reporter, remover) = run(
        "DELETE WHERE Track NOT IN (1, 2, 3)",
        &PATHS,
        &provider,
        &options,
    );
    assert!(remover.removed.is_empty());
    // dry-run notices are emitted even without verbose
    assert_eq!(reporter.notices, vec!["would delete /music/c.mp3"]);
    assert_eq!(outcome.matched, 1);
}

// ============================================================================
// Failure containment
// ============================================================================

#[test]
fn test_open_failure_skips_the_file_and_continues() {
    let provider = library();
    let paths = ["/music/a.mp3", "/music/missing.mp3", "/music/c.mp3"];
    let (outcome, reporter, _) = run(
        "SELECT Title",
        &paths,
        &provider,
        &ExecutionOptions::default(),
    );
    assert_eq!(outcome.processed, 2);
    assert_eq!(outcome.failed, 1);
    assert_eq!(reporter.rows, vec!["Dawn", "Dusk"]);
    assert_eq!(reporter.failures.len(), 1);
    assert!(reporter.failures[0].contains("/music/missing.mp3"));
}

#[test]
fn test_predicate_failure_skips_the_file_and_continues() {
    let mut provider = MapProvider::default();
    // no Year tag, so the comparison sees null
    provider.add(
        "/music/a.mp3",
        MemoryRecord::new().with_text(TagField::Title, "Dawn"),
    );
    provider.add(
        "/music/b.mp3",
        MemoryRecord::new()
            .with_text(TagField::Title, "Noon")
            .with_number(TagField::Year, 2001),
    );
    let (outcome, reporter, _) = run(
        "SELECT Title WHERE Year > 2000",
        &["/music/a.mp3", "/music/b.mp3"],
        &provider,
        &ExecutionOptions::default(),
    );
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.matched, 1);
    assert_eq!(reporter.rows, vec!["Noon"]);
}

#[test]
fn test_unknown_property_fails_before_any_file_is_opened() {
    let provider = library();
    let result = ExecutionPlan::prepare("SELECT Bogus", PropertyCatalog::global());
    assert!(result.is_err());
    assert_eq!(provider.opens.get(), 0);
}

// ============================================================================
// Permanent removal through the real remover
// ============================================================================

#[cfg(feature = "cli")]
#[test]
fn test_fs_remover_deletes_from_disk() {
    use tagsql::cli::FsRemover;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("song.mp3");
    std::fs::write(&file, b"data").unwrap();

    let mut provider = MapProvider::default();
    provider.add(file.to_str().unwrap(), MemoryRecord::new());

    let catalog = PropertyCatalog::global();
    let plan = ExecutionPlan::prepare("DELETE", catalog).unwrap();
    let mut reporter = RecordingReporter::default();
    let mut remover = FsRemover;
    let options = ExecutionOptions::default();
    let outcome = Runner::new(&plan, catalog, &options).run(
        &[file.clone()],
        &provider,
        &mut remover,
        &mut reporter,
    );

    assert_eq!(outcome.matched, 1);
    assert!(!file.exists());
}
