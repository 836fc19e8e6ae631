use std::path::PathBuf;

use clap::Parser;
use pefunds::sources::{DEFAULT_OPERS_LIMIT, SourceKind};

pub const DEFAULT_CSV_PATH: &str = "data/output/funds.csv";

pub const INPUT_HELP: &str = "Read the fund table from the given file instead of the embedded CalPERS data. Required for --source opers (the OPERF portfolio CSV export).";
pub const SAVE_CSV_HELP: &str = "Also save the exported funds to the given CSV file (defaults to data/output/funds.csv when no path is provided). Use --archive-csv to store a .gz instead.";
pub const ARCHIVE_CSV_HELP: &str = "Archive the saved CSV into a .gz file.";
pub const LIMIT_HELP: &str = "Maximum number of OPERS funds to export, best multiple first.";

#[derive(Debug, Parser)]
#[command(
    name = "pefunds",
    about = "Turn public pension private equity disclosures into TypeScript preset fund literals.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    #[arg(long, value_enum, default_value_t = SourceKind::Calpers, help = "Disclosure format to read.")]
    pub source: SourceKind,
    #[arg(long, value_name = "FILE", help = INPUT_HELP)]
    pub input: Option<PathBuf>,
    #[arg(long, value_name = "N", default_value_t = DEFAULT_OPERS_LIMIT, help = LIMIT_HELP)]
    pub limit: usize,
    #[arg(
        long,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_CSV_PATH,
        help = SAVE_CSV_HELP
    )]
    pub save_csv: Option<PathBuf>,
    #[arg(long, requires = "save_csv", help = ARCHIVE_CSV_HELP)]
    pub archive_csv: bool,
    #[arg(long, help = "Do not print the run summary to stderr.")]
    pub no_summary: bool,
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Log more detail to stderr (-v for info, -vv for every skipped line)."
    )]
    pub verbose: u8,
}
