use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Normalize Jira CSV exports and classify release lifecycles", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import a Jira issue export into the store
    Import(ImportArgs),
    /// Import a release-description export into the store
    Releases(ReleasesArgs),
    /// Partition stored releases into open and closed
    Classify(ClassifyArgs),
    /// Summarize stored issues per release
    Stats(StatsArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Input CSV file ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Store file to upsert into
    #[arg(short = 's', long = "store", default_value = "store.json")]
    pub store: PathBuf,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Exit nonzero when any row was structurally rejected
    #[arg(long)]
    pub strict: bool,
    /// Emit the run report as JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ReleasesArgs {
    /// Input CSV file with RELEASE and DESCRIÇÃO columns ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Store file to upsert into
    #[arg(short = 's', long = "store", default_value = "store.json")]
    pub store: PathBuf,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Emit the run report as JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Store file to read
    #[arg(short = 's', long = "store", default_value = "store.json")]
    pub store: PathBuf,
    /// Only classify releases referenced by stored issues
    #[arg(long = "referenced-only")]
    pub referenced_only: bool,
    /// Emit the partition as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Store file to read
    #[arg(short = 's', long = "store", default_value = "store.json")]
    pub store: PathBuf,
    /// Drop issues attributed to open releases before aggregating
    #[arg(long = "closed-only")]
    pub closed_only: bool,
    /// Inclusive lower bound on the resolution date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_cli_date)]
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the resolution date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_cli_date)]
    pub to: Option<NaiveDate>,
    /// Only issues attributed to this system
    #[arg(long)]
    pub system: Option<String>,
    /// Only issues attributed to this fix-version
    #[arg(long = "fix-version")]
    pub fix_version: Option<String>,
    /// Only issues of this type
    #[arg(long = "issue-type")]
    pub issue_type: Option<String>,
    /// Emit the summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

fn parse_cli_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("'{value}' is not a YYYY-MM-DD date"))
}
