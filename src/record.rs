use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// One facet of a file's tag metadata.
///
/// Each field has exactly one shape (scalar text, ordered text list, or
/// unsigned number); the property catalog binds statement identifiers to
/// these fields and enforces the shape on assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagField {
    Album,
    AlbumArtists,
    AlbumArtistsSort,
    AlbumSort,
    BeatsPerMinute,
    Comment,
    Composers,
    ComposersSort,
    Conductor,
    Copyright,
    Disc,
    DiscCount,
    Genres,
    Grouping,
    Lyrics,
    Performers,
    PerformersSort,
    Title,
    TitleSort,
    Track,
    TrackCount,
    Year,
}

/// Failure opening a file as a tag record.
#[derive(Debug)]
pub struct OpenError {
    pub message: String,
}

impl fmt::Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot open tag record: {}", self.message)
    }
}

impl std::error::Error for OpenError {}

/// Failure writing a modified record back to disk.
#[derive(Debug)]
pub struct CommitError {
    pub message: String,
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot save tag record: {}", self.message)
    }
}

impl std::error::Error for CommitError {}

/// The tag metadata of one file.
///
/// A record is opened per file, owned exclusively by the iteration that
/// opened it, and released before the next file begins. Getters never
/// mutate; setters stage changes that only reach disk on [`commit`].
///
/// Shape validation happens in the property catalog, so the accessors here
/// are infallible; only `commit` touches the file system.
///
/// [`commit`]: TagRecord::commit
pub trait TagRecord {
    fn text(&self, field: TagField) -> Option<String>;
    fn text_list(&self, field: TagField) -> Vec<String>;
    fn number(&self, field: TagField) -> Option<u32>;

    fn set_text(&mut self, field: TagField, value: String);
    fn set_text_list(&mut self, field: TagField, values: Vec<String>);
    fn set_number(&mut self, field: TagField, value: u32);

    /// Write staged changes back to the file.
    fn commit(&mut self) -> Result<(), CommitError>;
}

/// Opens files as tag records.
pub trait RecordProvider {
    fn open(&self, path: &Path) -> Result<Box<dyn TagRecord>, OpenError>;
}

/// In-memory tag record.
///
/// Backs the test suite and doubles as a reference implementation of the
/// record contract; call counters let tests assert that non-matching files
/// are never read, written, or committed.
#[derive(Debug, Default, Clone)]
pub struct MemoryRecord {
    texts: HashMap<TagField, String>,
    lists: HashMap<TagField, Vec<String>>,
    numbers: HashMap<TagField, u32>,
    pub get_calls: std::cell::Cell<usize>,
    pub set_calls: usize,
    pub commit_calls: usize,
}

impl MemoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, field: TagField, value: &str) -> Self {
        self.texts.insert(field, value.to_string());
        self
    }

    pub fn with_list(mut self, field: TagField, values: &[&str]) -> Self {
        self.lists
            .insert(field, values.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn with_number(mut self, field: TagField, value: u32) -> Self {
        self.numbers.insert(field, value);
        self
    }
}

impl TagRecord for MemoryRecord {
    fn text(&self, field: TagField) -> Option<String> {
        self.get_calls.set(self.get_calls.get() + 1);
        self.texts.get(&field).cloned()
    }

    fn text_list(&self, field: TagField) -> Vec<String> {
        self.get_calls.set(self.get_calls.get() + 1);
        self.lists.get(&field).cloned().unwrap_or_default()
    }

    fn number(&self, field: TagField) -> Option<u32> {
        self.get_calls.set(self.get_calls.get() + 1);
        self.numbers.get(&field).copied()
    }

    fn set_text(&mut self, field: TagField, value: String) {
        self.set_calls += 1;
        self.texts.insert(field, value);
    }

    fn set_text_list(&mut self, field: TagField, values: Vec<String>) {
        self.set_calls += 1;
        self.lists.insert(field, values);
    }

    fn set_number(&mut self, field: TagField, value: u32) {
        self.set_calls += 1;
        self.numbers.insert(field, value);
    }

    fn commit(&mut self) -> Result<(), CommitError> {
        self.commit_calls += 1;
        Ok(())
    }
}
