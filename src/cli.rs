//! Command-line interface definitions.
//!
//! ```bash
//! # List duplicate/similar clusters under a directory
//! imgdupe ~/Pictures
//!
//! # Flat scan with a tighter threshold, JSON output
//! imgdupe ~/Pictures --no-recurse --threshold 5 --output json
//!
//! # Move the redundant byte-identical copies aside
//! imgdupe ~/Pictures --move-to ~/Pictures/dupes
//!
//! # Permanently delete redundant copies (confirmation required)
//! imgdupe ~/Pictures --delete --yes
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::clusters::DEFAULT_THRESHOLD;

/// Find duplicate and visually similar images, then move or delete
/// the spares.
#[derive(Debug, Parser)]
#[command(name = "imgdupe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// List only the direct children of PATH instead of the full subtree
    #[arg(long)]
    pub no_recurse: bool,

    /// Hamming distance threshold for visual similarity (64-bit pHash)
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: u32,

    /// Worker threads for fingerprinting (0 = one per CPU core)
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub threads: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Which redundant copies to auto-select before --move-to/--delete
    #[arg(long, value_enum, default_value = "identical")]
    pub select: SelectMode,

    /// Move auto-selected files into this directory
    #[arg(long, value_name = "DIR", conflicts_with = "delete")]
    pub move_to: Option<PathBuf>,

    /// Permanently delete auto-selected files (requires --yes)
    ///
    /// There is no trash; deletion cannot be undone.
    #[arg(long, requires = "yes")]
    pub delete: bool,

    /// Confirm destructive operations without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit top-level errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,
}

/// Report format for the cluster listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable cluster listing.
    Text,
    /// Machine-readable JSON report.
    Json,
}

/// Which auto-selection passes run before a move/delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SelectMode {
    /// Redundant byte-identical copies only.
    Identical,
    /// Redundant visually-similar members only.
    Similar,
    /// Both passes.
    All,
}
