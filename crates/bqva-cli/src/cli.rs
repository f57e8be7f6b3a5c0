//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// BigQuery View Analyzer
///
/// Visualize the dependencies of a view and manage the authorized-view
/// entries its cross-dataset reads require.
#[derive(Parser, Debug)]
#[command(name = "bqva")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write detailed logs to debug.log in the working directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Path to the config file (default: ./bqva.yml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Project used for views written as DATASET.VIEW
    #[arg(short, long, global = true)]
    pub project: Option<String>,

    /// Use an offline catalog file instead of BigQuery
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the dependency tree of a view
    Tree(TreeArgs),

    /// Grant every authorized view the tree needs
    Authorize(ReconcileArgs),

    /// Remove the authorized views the tree needs
    Revoke(ReconcileArgs),

    /// Write the dependency tree as a Graphviz DOT file
    Export(ExportArgs),
}

/// Arguments for the tree command
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// View in the format [PROJECT:]DATASET.VIEW
    pub view: String,

    /// Show whether each edge is authorized
    #[arg(short, long)]
    pub status: bool,

    /// Hide the colour key
    #[arg(long)]
    pub no_key: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: TreeOutput,
}

/// Tree output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeOutput {
    /// Indented tree
    Text,
    /// Nested JSON objects
    Json,
    /// Graphviz digraph
    Dot,
}

/// Arguments for the authorize and revoke commands
#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// View in the format [PROJECT:]DATASET.VIEW
    pub view: String,

    /// Report what would change without writing access lists
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: ReportOutput,
}

/// Reconciliation report formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutput {
    /// Per-edge summary followed by the tree with status
    Text,
    /// Report as JSON
    Json,
}

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// View in the format [PROJECT:]DATASET.VIEW
    pub view: String,

    /// Destination DOT file
    #[arg(short, long)]
    pub file: PathBuf,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
