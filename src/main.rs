use std::path::PathBuf;

use clap::Parser as ClapParser;
use regex::Regex;
use tagsql::cli::{self, CliError};
use tagsql::ExecutionOptions;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILE_REGEX: &str = r"(?i).*\.(mp3|m4a|flac|ogg|wav|wma)$";

#[derive(ClapParser)]
#[command(name = "tagsql")]
#[command(about = "tagsql - Bulk-edit audio file tags with SQL-like statements")]
#[command(version)]
struct Cli {
    /// The statement to run: SELECT, UPDATE SET, or DELETE
    statement: String,

    /// Directory to recursively search for audio files.
    /// Defaults to the platform music directory
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Regex deciding which files are candidates
    #[arg(short = 'f', long = "file-regex", default_value = DEFAULT_FILE_REGEX)]
    file_regex: String,

    /// Print more information as the run progresses
    #[arg(short, long)]
    verbose: bool,

    /// DELETE moves files to the recycle bin instead of removing them
    #[arg(short, long)]
    recycle: bool,

    /// Log what UPDATE/DELETE would do without changing any file
    #[arg(short = 'y', long = "dry-run")]
    dry_run: bool,

    /// Separator for list-valued tag fields in literals and output
    #[arg(long, default_value_t = ';')]
    list_separator: char,

    /// Make LIKE patterns case-sensitive
    #[arg(long)]
    case_sensitive_like: bool,

    /// Print a header row of column names before SELECT output
    #[arg(long)]
    column_names: bool,

    /// Separator between SELECT output columns
    #[arg(long, default_value = "\t")]
    column_separator: String,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let directory = match cli.directory {
        Some(dir) => dir,
        None => dirs::audio_dir().ok_or(CliError::NoDirectory)?,
    };
    let file_regex = Regex::new(&cli.file_regex)?;

    let options = ExecutionOptions {
        dry_run: cli.dry_run,
        recycle: cli.recycle,
        verbose: cli.verbose,
        list_separator: cli.list_separator,
        like_ignore_case: !cli.case_sensitive_like,
        print_column_names: cli.column_names,
        column_separator: cli.column_separator,
    };

    let outcome = cli::execute(&cli.statement, &directory, &file_regex, &options)?;
    if options.verbose {
        eprintln!(
            "processed {} files ({} matched, {} failed)",
            outcome.processed, outcome.matched, outcome.failed
        );
    }
    Ok(())
}
