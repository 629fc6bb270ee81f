// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Subprocess supervision and the public history iterator
//!
//! `git log` runs concurrently with the caller as an independent OS
//! process; the only synchronization points are reading its stdout and,
//! once the stream ends, waiting for its exit status. Iteration is
//! single-threaded and pull-based — nothing is prefetched, and each
//! [`LogIterator::next`] call may block on subprocess output.

use crate::commit::Commit;
use crate::error::LogError;
use crate::format::{Scheme, format_arg};
use crate::lines::DEFAULT_MAX_LINE_BYTES;
use crate::parser::CommitStream;
use std::ffi::OsString;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use tracing::debug;

/// Handle to a resolved git executable.
///
/// The decoder never looks the program up globally; whoever constructs the
/// handle decides what runs. The default resolves `git` through `PATH` at
/// spawn time.
#[derive(Debug, Clone)]
pub struct Git {
    program: PathBuf,
}

impl Default for Git {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }
}

impl Git {
    /// Handle resolving `git` through `PATH` at spawn time.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to a specific executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The program this handle spawns.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Spawn a git subcommand inside `repo_path` with stdout and stderr
    /// piped. Callers wrap the raw spawn failure in their own error type.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the process cannot be started.
    pub fn spawn(&self, repo_path: &Path, args: &[OsString]) -> std::io::Result<Child> {
        debug!(program = %self.program.display(), ?args, "spawning git");
        Command::new(&self.program)
            .args(args)
            .current_dir(repo_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
    }
}

/// Commit ordering modes accepted by `git log`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOrder {
    /// `--date-order`
    Date,
    /// `--author-date-order`
    AuthorDate,
    /// `--topo-order`
    Topo,
    /// `--reverse`
    Reverse,
}

impl CommitOrder {
    /// The command-line flag for this ordering.
    #[must_use]
    pub fn as_arg(self) -> &'static str {
        match self {
            CommitOrder::Date => "--date-order",
            CommitOrder::AuthorDate => "--author-date-order",
            CommitOrder::Topo => "--topo-order",
            CommitOrder::Reverse => "--reverse",
        }
    }
}

/// Configuration for a history walk.
///
/// Only `scheme` and `stats` change how the output is decoded; everything
/// else merely shapes the argument list handed to git.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Output scheme to request and decode
    pub scheme: Scheme,
    /// Include per-file numstat records (`--numstat`)
    pub stats: bool,
    /// Exclude merge commits (`--no-merges`)
    pub no_merges: bool,
    /// Follow only the first parent of merges (`--first-parent`)
    pub first_parent: bool,
    /// Show diffs of merge commits against every parent (`-m`)
    pub diff_merges: bool,
    /// Commit ordering mode
    pub order: Option<CommitOrder>,
    /// Restrict history to commits touching this path
    pub path: Option<String>,
    /// Per-line byte ceiling override for the output stream
    pub max_line_bytes: Option<usize>,
}

impl LogOptions {
    /// Options selecting the raw scheme.
    #[must_use]
    pub fn raw() -> Self {
        Self {
            scheme: Scheme::Raw,
            ..Self::default()
        }
    }

    /// Request per-file line statistics.
    #[must_use]
    pub fn with_stats(mut self) -> Self {
        self.stats = true;
        self
    }

    /// Exclude merge commits.
    #[must_use]
    pub fn no_merges(mut self) -> Self {
        self.no_merges = true;
        self
    }

    /// Follow only the first parent of merges.
    #[must_use]
    pub fn first_parent(mut self) -> Self {
        self.first_parent = true;
        self
    }

    /// Show merge commits against every parent.
    #[must_use]
    pub fn diff_merges(mut self) -> Self {
        self.diff_merges = true;
        self
    }

    /// Set the commit ordering mode.
    #[must_use]
    pub fn order(mut self, order: CommitOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Restrict history to commits touching `path`.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Override the per-line byte ceiling.
    #[must_use]
    pub fn max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = Some(max_line_bytes);
        self
    }
}

pub(crate) fn build_args(options: &LogOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "log".into(),
        format_arg(options.scheme).into(),
        "--no-decorate".into(),
        "-w".into(),
    ];
    if options.no_merges {
        args.push("--no-merges".into());
    }
    if options.first_parent {
        args.push("--first-parent".into());
    }
    if let Some(order) = options.order {
        args.push(order.as_arg().into());
    }
    if options.diff_merges {
        args.push("-m".into());
    }
    if options.stats {
        args.push("--numstat".into());
    }
    if let Some(path) = &options.path {
        args.push("--".into());
        args.push(path.as_str().into());
    }
    args
}

/// A git repository on disk, addressed through a [`Git`] handle.
#[derive(Debug, Clone)]
pub struct GitRepo {
    git: Git,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at the given path using the default handle.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::RepositoryNotFound`] if the path is not a
    /// directory. Whether it actually holds a repository is git's call to
    /// make when it runs.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LogError> {
        Self::with_git(Git::new(), path)
    }

    /// Open a repository through a specific git handle.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::RepositoryNotFound`] if the path is not a
    /// directory.
    pub fn with_git(git: Git, path: impl AsRef<Path>) -> Result<Self, LogError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(LogError::RepositoryNotFound {
                path: path.display().to_string(),
            });
        }
        Ok(Self {
            git,
            path: path.to_path_buf(),
        })
    }

    /// The repository path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The git handle used to spawn subcommands.
    #[must_use]
    pub fn git(&self) -> &Git {
        &self.git
    }

    /// Start `git log` and return the streaming history iterator.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Spawn`] if git cannot be started.
    pub fn log(&self, options: &LogOptions) -> Result<LogIterator, LogError> {
        let args = build_args(options);
        let mut child = self
            .git
            .spawn(&self.path, &args)
            .map_err(|source| LogError::Spawn {
                program: self.git.program.display().to_string(),
                source,
            })?;
        let Some(stdout) = child.stdout.take() else {
            return Err(LogError::Spawn {
                program: self.git.program.display().to_string(),
                source: std::io::Error::other("stdout was not piped"),
            });
        };
        let max_line_bytes = options.max_line_bytes.unwrap_or(DEFAULT_MAX_LINE_BYTES);
        Ok(LogIterator {
            stream: CommitStream::with_max_line_bytes(
                BufReader::new(stdout),
                options.scheme,
                max_line_bytes,
            ),
            child,
            done: false,
        })
    }
}

/// Pull-based cursor over decoded commits.
///
/// Records are yielded in the exact order git emitted them. At
/// end-of-stream the subprocess's exit status decides how iteration ends:
/// a non-zero exit surfaces as [`LogError::Process`] — after every record
/// that was successfully decoded has been yielded, with any record left
/// open when the pipe closed discarded rather than guessed at — while a
/// clean exit releases the final record. Once the iterator has returned
/// `None` or an error it stays exhausted.
pub struct LogIterator {
    stream: CommitStream<BufReader<ChildStdout>>,
    child: Child,
    done: bool,
}

impl LogIterator {
    fn next_record(&mut self) -> Result<Option<Commit>, LogError> {
        if let Some(commit) = self.stream.next_commit()? {
            return Ok(Some(commit));
        }

        // stream over: the exit status decides whether the record still
        // open when the pipe closed is complete
        let stderr = self.read_stderr();
        let status = self.child.wait()?;
        debug!(code = ?status.code(), "git log exited");
        if !status.success() {
            drop(self.stream.take_pending());
            return Err(LogError::Process {
                code: status.code(),
                stderr,
            });
        }
        Ok(self.stream.take_pending())
    }

    fn read_stderr(&mut self) -> String {
        let mut buf = String::new();
        if let Some(mut stderr) = self.child.stderr.take() {
            let _ = stderr.read_to_string(&mut buf);
        }
        buf.trim().to_string()
    }
}

impl Iterator for LogIterator {
    type Item = Result<Commit, LogError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(commit)) => Some(Ok(commit)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl Drop for LogIterator {
    // reap the child if the caller abandons iteration early
    fn drop(&mut self) {
        if self.child.try_wait().ok().flatten().is_none() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
