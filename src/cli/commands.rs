use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tl", about = concat!("tasklist v", env!("CARGO_PKG_VERSION"), " - a to-do list in a JSON file"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,

    /// Task file to use (default: tasks.json, or [store] file in tasklist.toml)
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks
    List(ListArgs),
    /// Add a task
    Add(AddArgs),
    /// Replace a task's text (the task moves to the end and is no longer completed)
    Edit(EditArgs),
    /// Delete a task (by text: every exact match)
    Rm(TaskArg),
    /// Mark a task completed (by text: the first exact match)
    Done(TaskArg),
    /// Clear a task's completed flag
    Undo(TaskArg),
    /// Show task counts
    Stats,
    /// View or prune the recovery log
    Recovery(RecoveryArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Only tasks that are not completed
    #[arg(long, conflicts_with = "completed")]
    pub pending: bool,
    /// Only completed tasks
    #[arg(long)]
    pub completed: bool,
    /// Only tasks whose text matches this regex (case-insensitive)
    #[arg(long)]
    pub grep: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    pub text: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task id (`3` or `#3`) or exact text
    pub task: String,
    /// New text
    pub text: String,
}

#[derive(Args)]
pub struct TaskArg {
    /// Task id (`3` or `#3`) or exact text
    pub task: String,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Remove entries older than 30 days
    #[arg(long)]
    pub prune: bool,
    /// With --prune, remove every entry
    #[arg(long, requires = "prune")]
    pub all: bool,
}
