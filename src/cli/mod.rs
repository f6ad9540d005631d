//! Command-line parsing for the FRED panel builder.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline code.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "fredpanel",
    version,
    about = "Date-aligned panels from FRED economic series"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch series from FRED, align them on the date axis, and print/write
    /// the canonical panel.
    Pull(PullArgs),
    /// Print a preview of a previously written panel CSV.
    Show(ShowArgs),
}

/// A `--series` flag value: a FRED series id with an optional column label.
#[derive(Debug, Clone)]
pub struct SeriesSpec {
    pub id: String,
    pub label: Option<String>,
}

impl FromStr for SeriesSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, label) = match s.split_once('=') {
            Some((id, label)) => (id.trim(), Some(label.trim())),
            None => (s.trim(), None),
        };
        if id.is_empty() {
            return Err("series id must be non-empty (use ID or ID=Column Label)".to_string());
        }
        if let Some(label) = label {
            if label.is_empty() {
                return Err(format!("empty column label for series {id}"));
            }
        }
        Ok(SeriesSpec {
            id: id.to_string(),
            label: label.map(str::to_string),
        })
    }
}

/// Options for pulling and aligning series.
#[derive(Debug, Parser, Clone)]
pub struct PullArgs {
    /// Series to pull, as `ID` or `ID=Column Label` (repeatable).
    ///
    /// Defaults to PAYEMS, GDPC1, and CPIAUCSL when omitted.
    #[arg(short = 's', long = "series", value_name = "ID[=LABEL]")]
    pub series: Vec<SeriesSpec>,

    /// Observation start date (FRED accepts any date from 1776-07-04 on).
    #[arg(long, default_value = "1776-07-04")]
    pub start: NaiveDate,

    /// Observation end date.
    #[arg(long, default_value = "9999-12-31")]
    pub end: NaiveDate,

    /// Write the canonical panel to this CSV path.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub out: Option<PathBuf>,

    /// Maximum concurrent FRED requests.
    #[arg(long, default_value_t = 4)]
    pub jobs: usize,

    /// Extra attempts per fetch for transient (transport) failures.
    #[arg(long, default_value_t = 2)]
    pub retries: usize,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Rows to print in the terminal preview.
    #[arg(long, default_value_t = 10)]
    pub preview: usize,
}

/// Options for previewing a saved panel.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Panel CSV produced by `fredpanel pull --out`.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Rows to print.
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}
