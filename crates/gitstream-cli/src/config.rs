// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the gitstream command line
//!
//! Flags map one-to-one onto the library option types; nothing here
//! changes how records are decoded beyond the scheme and statistics
//! switches the decoders already expose.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use gitstream_log::CommitOrder;

/// gitstream - stream git history, blame and tree listings as records
#[derive(Parser, Debug, Clone)]
#[command(name = "gitstream")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to the repository to read
    #[arg(short = 'C', long, env = "GITSTREAM_REPO", default_value = ".")]
    pub repo: PathBuf,

    /// Emit one JSON record per line instead of text
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so record output on stdout stays clean.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Stream commit history
    Log {
        /// Include per-file line statistics
        #[arg(long)]
        stats: bool,

        /// Exclude merge commits
        #[arg(long)]
        no_merges: bool,

        /// Follow only the first parent of merges
        #[arg(long)]
        first_parent: bool,

        /// Decode git's raw dump format instead of the tagged format
        #[arg(long)]
        raw: bool,

        /// Commit ordering mode
        #[arg(long, value_enum)]
        order: Option<OrderArg>,

        /// Restrict history to commits touching this path
        #[arg(long)]
        path: Option<String>,
    },

    /// Attribute each line of a file to the commit that last touched it
    Blame {
        /// File to blame, relative to the repository root
        file: String,

        /// Blame as of this revision instead of the working tree
        #[arg(long)]
        rev: Option<String>,
    },

    /// List the contents of a tree-ish
    LsTree {
        /// Tree-ish to list
        #[arg(default_value = "HEAD")]
        treeish: String,

        /// Recurse into subtrees
        #[arg(short, long)]
        recurse: bool,
    },

    /// List tracked files
    LsFiles {
        /// Pattern filtering the files to list
        pattern: Option<String>,

        /// Do not list empty directories
        #[arg(long)]
        no_empty_directory: bool,
    },
}

/// Commit ordering modes, as command-line values
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    /// Commit-date order
    Date,
    /// Author-date order
    AuthorDate,
    /// Topological order
    Topo,
    /// Oldest first
    Reverse,
}

impl From<OrderArg> for CommitOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Date => CommitOrder::Date,
            OrderArg::AuthorDate => CommitOrder::AuthorDate,
            OrderArg::Topo => CommitOrder::Topo,
            OrderArg::Reverse => CommitOrder::Reverse,
        }
    }
}

impl Config {
    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}
