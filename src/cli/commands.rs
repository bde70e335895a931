use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tb", about = concat!("taskboard v", env!("CARGO_PKG_VERSION"), " - browse and triage tasks from the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Base URL of the task API (overrides TASKBOARD_BASE_URL and config)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Config file (default: $XDG_CONFIG_HOME/taskboard/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level or filter directive (overrides config; RUST_LOG wins)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Start the dashboard at this query string, e.g. "active_tab=CLOSED&label=bug"
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks of one status, filtered and sorted
    List(ListArgs),
    /// Show task counts per status
    Counts,
    /// List known assignees
    Assignees,
    /// Change a task's status (a comment is required)
    SetStatus(SetStatusArgs),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Status tab (OPEN, IN_PROGRESS, CLOSED; default OPEN)
    #[arg(long)]
    pub status: Option<String>,
    /// Case-insensitive substring of the task name
    #[arg(long)]
    pub search: Option<String>,
    /// Label (bug, feature, doc)
    #[arg(long)]
    pub label: Option<String>,
    /// Exact assignee name
    #[arg(long)]
    pub assignee: Option<String>,
    /// Sort by creation time: ASC or DESC
    #[arg(long)]
    pub sort: Option<String>,
    /// Seed the selection from a query string; explicit flags win
    #[arg(long)]
    pub query: Option<String>,
    /// Stop after this many pages (default: fetch all)
    #[arg(long)]
    pub max_pages: Option<u32>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SetStatusArgs {
    /// Task ID
    pub id: i64,
    /// New status (OPEN, IN_PROGRESS, CLOSED)
    pub status: String,
    /// Reason for the change
    #[arg(long, short = 'm')]
    pub comment: String,
}
