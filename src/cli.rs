//! Command-line interface. Each subcommand maps to exactly one query.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DEFAULT_DATA_FILE: &str = "SAMPLE_dashboard_output.xlsx";

/// Browse and export the news-mentions dataset.
///
/// ```sh
/// daily-news --data SAMPLE_dashboard_output.xlsx graph --start 0 --end 30 --country Germany
/// daily-news summary                      # latest day
/// daily-news export-daily --date 2025-01-31 --format csv
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Source table (.xlsx, .csv, .json or .parquet)
    #[arg(short, long, env = "DAILY_NEWS_DATA", default_value = DEFAULT_DATA_FILE, global = true)]
    pub data: PathBuf,

    /// Optional JSON file overriding the allowed countries/topics
    #[arg(short, long, env = "DAILY_NEWS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record count, date bounds, countries and topics
    Info,
    /// The latest date in the dataset
    Latest,
    /// Mention counts per day and topic
    Graph {
        #[command(flatten)]
        selection: GraphSelection,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Articles of one day grouped by topic
    Summary {
        /// ISO date; defaults to the latest date
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Write the graph data to a spreadsheet
    ExportGraph {
        #[command(flatten)]
        selection: GraphSelection,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Write one day's articles to a spreadsheet
    ExportDaily {
        /// ISO date; defaults to the latest date
        #[arg(long)]
        date: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Slider position and country dropdown.
#[derive(Args, Debug, Clone)]
pub struct GraphSelection {
    /// Start offset in days from the earliest date
    #[arg(long, conflicts_with = "from")]
    pub start: Option<i64>,
    /// End offset in days from the earliest date (default: last day)
    #[arg(long, conflicts_with = "to")]
    pub end: Option<i64>,
    /// Start date, converted to an offset
    #[arg(long)]
    pub from: Option<String>,
    /// End date, converted to an offset
    #[arg(long)]
    pub to: Option<String>,
    /// Country to keep (default: all countries)
    #[arg(long)]
    pub country: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output path (default: filtered_*_data.<format> in the current directory)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = ExportFormat::Xlsx)]
    pub format: ExportFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}
