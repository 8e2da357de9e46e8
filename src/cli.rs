use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Load LCA disclosure files into the filings datastore", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clean, reconcile, and upsert every disclosure file in a directory
    Load(LoadArgs),
    /// Render the first rows of the cleaned dataset without writing
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Directory containing .xlsx/.xls/.csv disclosure files
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Plain-text parent company list, one name fragment per line
    #[arg(short = 'p', long = "parents", default_value = "parent_employers.txt")]
    pub parents: PathBuf,
    /// Maximum rows per decoded batch
    #[arg(long = "batch-size", default_value_t = 1000)]
    pub batch_size: usize,
    /// Base URL of the datastore REST endpoint (required unless --dry-run)
    #[arg(long = "endpoint")]
    pub endpoint: Option<String>,
    /// Destination table name
    #[arg(long = "table", default_value = "lca_filings")]
    pub table: String,
    /// Name of the environment variable holding the service key
    #[arg(long = "key-env", default_value = "DATASTORE_SERVICE_KEY")]
    pub key_env: String,
    /// Character encoding for CSV inputs (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Maximum upsert attempts before the run fails
    #[arg(long = "max-attempts", default_value_t = 3)]
    pub max_attempts: u32,
    /// Minimum retry backoff in seconds
    #[arg(long = "min-backoff-secs", default_value_t = 4)]
    pub min_backoff_secs: u64,
    /// Maximum retry backoff in seconds
    #[arg(long = "max-backoff-secs", default_value_t = 10)]
    pub max_backoff_secs: u64,
    /// Run the whole pipeline but skip the datastore write
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Directory containing .xlsx/.xls/.csv disclosure files
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Optional parent company list; omitted means no parent labels
    #[arg(short = 'p', long = "parents")]
    pub parents: Option<PathBuf>,
    /// Maximum rows per decoded batch
    #[arg(long = "batch-size", default_value_t = 1000)]
    pub batch_size: usize,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Restrict the table to this comma-separated list of columns
    #[arg(short = 'C', long = "columns", action = clap::ArgAction::Append)]
    pub columns: Vec<String>,
    /// Character encoding for CSV inputs (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}
