use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Reconcile two tabular datasets and report their differences",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compare two datasets and report row- and cell-level differences
    Compare(CompareArgs),
    /// Show the columns and first rows of a single dataset
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Left-hand dataset "A" (CSV/TSV text, or XLS/XLSX by extension)
    #[arg(short = 'a', long = "left")]
    pub left: PathBuf,
    /// Right-hand dataset "B"
    #[arg(short = 'b', long = "right")]
    pub right: PathBuf,
    /// Key columns identifying the same logical row in both datasets
    #[arg(short = 'k', long = "key", value_delimiter = ',')]
    pub keys: Vec<String>,
    /// Column correspondences `left_name=right_name` for datasets that share
    /// no column names (mapped names double as keys when --key is omitted)
    #[arg(long = "map", action = clap::ArgAction::Append)]
    pub map: Vec<String>,
    /// Report file; `.xlsx` selects the multi-sheet spreadsheet report,
    /// anything else CSV. Prints a table to stdout when omitted
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Force the report format regardless of the output extension
    #[arg(long = "format", value_enum)]
    pub format: Option<ReportFormat>,
    /// Maximum number of data rows ingested per file source
    #[arg(long = "max-rows")]
    pub max_rows: Option<usize>,
    /// Character encoding of the left input (defaults to utf-8)
    #[arg(long = "left-encoding")]
    pub left_encoding: Option<String>,
    /// Character encoding of the right input (defaults to utf-8)
    #[arg(long = "right-encoding")]
    pub right_encoding: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum ReportFormat {
    Csv,
    Xlsx,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input dataset (CSV/TSV text, or XLS/XLSX by extension)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 3)]
    pub rows: usize,
    /// Maximum number of data rows ingested
    #[arg(long = "max-rows")]
    pub max_rows: Option<usize>,
    /// Character encoding of the input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}
