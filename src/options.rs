/// Options threaded, unmodified, through compilation, evaluation, and
/// every row action of a run.
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Log destructive actions without touching the file system
    pub dry_run: bool,
    /// DELETE moves files to the recycle bin instead of removing them
    pub recycle: bool,
    /// Emit full diagnostics instead of concise messages
    pub verbose: bool,
    /// Separator splitting/joining delimited text for list-valued fields
    pub list_separator: char,
    /// LIKE patterns match case-insensitively
    pub like_ignore_case: bool,
    /// SELECT prints a header row of column names first
    pub print_column_names: bool,
    /// Separator between SELECT output columns
    pub column_separator: String,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        ExecutionOptions {
            dry_run: false,
            recycle: false,
            verbose: false,
            list_separator: ';',
            like_ignore_case: true,
            print_column_names: false,
            column_separator: "\t".to_string(),
        }
    }
}
