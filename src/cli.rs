use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use daily_arxiv_digest::feed::Language;
use daily_arxiv_digest::index::SortMode;

#[derive(Parser)]
#[command(name = "daily-arxiv-digest")]
#[command(about = "Browse daily AI-enhanced arXiv paper digests from the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List dates with a published digest
    Dates(DatesArgs),

    /// Show one page of a day's digest
    Show(ShowArgs),

    /// Overview numbers and featured papers for the latest digest
    Stats(StatsArgs),

    /// Interactive browser reading commands from stdin
    Browse(BrowseArgs),

    /// Manage stored keyword and author tags
    Prefs(PrefsArgs),
}

/// Where digests are read from, shared by all commands
#[derive(Args, Clone)]
pub struct SourceArgs {
    /// Base URL of the published site (contains assets/ and data/)
    #[arg(long, env = "DAILY_ARXIV_BASE_URL")]
    pub base_url: Option<String>,

    /// Local checkout of the published data, used when no base URL is given
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Preferred feed language (English or Chinese)
    #[arg(long, env = "DAILY_ARXIV_LANGUAGE")]
    pub language: Option<Language>,

    /// Stored keyword/author tags
    #[arg(long, env = "DAILY_ARXIV_PREFS", default_value = "preferences.json")]
    pub prefs: PathBuf,

    /// Logging level (DEBUG, INFO, WARN, ERROR)
    #[arg(short, long, default_value = "WARN")]
    pub log_level: String,
}

#[derive(Args, Clone)]
pub struct DatesArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print as JSON
    #[arg(long, default_value = "false")]
    pub json: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Digest date (YYYY-MM-DD), defaults to the latest available
    #[arg(short, long)]
    pub date: Option<String>,

    /// Category code, or "all"
    #[arg(short, long)]
    pub category: Option<String>,

    /// Extra keyword tag to rank first (repeatable)
    #[arg(short, long)]
    pub keyword: Vec<String>,

    /// Extra author tag to rank first (repeatable)
    #[arg(short, long)]
    pub author: Vec<String>,

    /// Ignore stored keyword/author tags
    #[arg(long, default_value = "false")]
    pub no_preferences: bool,

    /// Free-text search; matching papers are listed first
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort by date or title
    #[arg(long)]
    pub sort: Option<SortMode>,

    /// Page number (1-based)
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Show the detail view of the Nth paper (1-based) of the filtered listing
    #[arg(long)]
    pub detail: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Clone)]
pub struct BrowseArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Milliseconds to wait after search input before applying it
    #[arg(long, default_value = "300")]
    pub search_delay_ms: u64,
}

#[derive(Args, Clone)]
pub struct PrefsArgs {
    /// Stored keyword/author tags
    #[arg(long, env = "DAILY_ARXIV_PREFS", default_value = "preferences.json")]
    pub prefs: PathBuf,

    #[command(subcommand)]
    pub action: PrefsAction,
}

#[derive(Subcommand, Clone)]
pub enum PrefsAction {
    /// Print stored tags
    List,
    AddKeyword { keyword: String },
    RemoveKeyword { keyword: String },
    AddAuthor { author: String },
    RemoveAuthor { author: String },
}
