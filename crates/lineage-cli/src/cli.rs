use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lineage", about = "Commit history queries and merges", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print short id, full id and summary per commit, and debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty repository
    Init(InitArgs),
    /// Record the working directory as a commit on the current branch
    Commit(CommitArgs),
    /// Merge one commit into another
    Merge(MergeArgs),
    /// Find common ancestors, independent commits or ancestry
    MergeBase(MergeBaseArgs),
    /// Show history reachable from a revision
    Log(LogArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct CommitArgs {
    pub path: PathBuf,
    #[arg(short, long)]
    pub message: String,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Repository path
    pub path: PathBuf,
    /// Revision being merged into
    pub base: String,
    /// Revision being merged
    pub target: String,
    /// Message for the merge commit
    #[arg(short, long)]
    pub message: Option<String>,
    /// Refuse anything but a fast-forward (exits 1 when refused)
    #[arg(long)]
    pub ff_only: bool,
    /// Create a merge commit even when a fast-forward is possible
    #[arg(long, conflicts_with = "ff_only")]
    pub no_ff: bool,
    /// Stop before recording the merge commit
    #[arg(long)]
    pub no_commit: bool,
    #[arg(long)]
    pub allow_unrelated_histories: bool,
}

#[derive(Args, Debug)]
pub struct MergeBaseArgs {
    pub path: PathBuf,
    /// Print the revisions that are not ancestors of any other
    #[arg(long, conflicts_with = "is_ancestor")]
    pub independent: bool,
    /// Exit 0 if the first revision is an ancestor of the second, 1 if not
    #[arg(long)]
    pub is_ancestor: bool,
    #[arg(required = true)]
    pub revs: Vec<String>,
}

#[derive(Args, Debug)]
pub struct LogArgs {
    pub path: PathBuf,
    #[arg(default_value = "HEAD")]
    pub rev: String,
    /// Stop after this many commits; 0 shows everything
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}
