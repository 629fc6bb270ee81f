// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Decoder for `git ls-tree` output
//!
//! The default output format is one entry per line:
//! `<mode> <type> <hash>\t<path>`.

use crate::error::TreeError;
use gitstream_log::GitRepo;
use gitstream_log::lines::LineReader;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::io::{BufReader, Read};
use std::process::{Child, ChildStdout};
use tracing::debug;

/// The git object modes a tree entry can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// `100644`, a normal file
    NormalFile,
    /// `100755`, an executable file
    ExecutableFile,
    /// `120000`, a symbolic link
    SymbolicLink,
    /// `040000`, a subdirectory
    Tree,
    /// `160000`, a submodule (gitlink)
    Submodule,
}

impl Mode {
    /// Map an octal mode string to the mode it names, `None` for modes
    /// this listing does not know about.
    #[must_use]
    pub fn from_octal(octal: &str) -> Option<Self> {
        match octal {
            "100644" => Some(Mode::NormalFile),
            "100755" => Some(Mode::ExecutableFile),
            "120000" => Some(Mode::SymbolicLink),
            "040000" => Some(Mode::Tree),
            "160000" => Some(Mode::Submodule),
            _ => None,
        }
    }

    /// The octal representation git prints for this mode.
    #[must_use]
    pub fn as_octal(self) -> &'static str {
        match self {
            Mode::NormalFile => "100644",
            Mode::ExecutableFile => "100755",
            Mode::SymbolicLink => "120000",
            Mode::Tree => "040000",
            Mode::Submodule => "160000",
        }
    }
}

/// One entry of a tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    /// Octal mode string exactly as git printed it; unknown modes are
    /// carried through rather than erased
    pub mode: String,
    /// Object type: `blob`, `tree`, or `commit` for submodules
    pub kind: String,
    /// Object hash
    pub hash: String,
    /// Path of the entry within the tree
    pub path: String,
}

impl Object {
    /// The typed mode, when the octal string names a known one.
    #[must_use]
    pub fn object_mode(&self) -> Option<Mode> {
        Mode::from_octal(&self.mode)
    }

    /// Parse a single line of the default `git ls-tree` output format.
    pub(crate) fn from_output_line(line: &str) -> Result<Self, TreeError> {
        let entry_err = || TreeError::Entry {
            value: line.to_string(),
        };

        let mut fields = line.splitn(3, ' ');
        let (Some(mode), Some(kind), Some(rest)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(entry_err());
        };
        let (hash, path) = rest.split_once('\t').ok_or_else(entry_err)?;

        Ok(Self {
            mode: mode.to_string(),
            kind: kind.to_string(),
            hash: hash.to_string(),
            path: path.to_string(),
        })
    }
}

impl fmt::Display for Object {
    // same shape as a line of the default ls-tree output
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}\t{}",
            self.mode, self.kind, self.hash, self.path
        )
    }
}

/// Configuration for a tree listing.
#[derive(Debug, Clone, Default)]
pub struct LsTreeOptions {
    /// Recurse into subtrees (`-r`)
    pub recurse: bool,
}

impl LsTreeOptions {
    /// Recurse into subtrees.
    #[must_use]
    pub fn recurse(mut self) -> Self {
        self.recurse = true;
        self
    }
}

pub(crate) fn build_args(treeish: &str, options: &LsTreeOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["ls-tree".into()];
    if options.recurse {
        args.push("-r".into());
    }
    args.push(treeish.into());
    args
}

/// Streaming iterator over the entries of a tree listing.
///
/// End-of-stream consults the subprocess's exit status, the same contract
/// as the history iterator: non-zero exit surfaces as
/// [`TreeError::Process`] after every decoded entry has been yielded.
pub struct TreeIterator {
    lines: LineReader<BufReader<ChildStdout>>,
    child: Child,
    done: bool,
}

impl TreeIterator {
    fn next_entry(&mut self) -> Result<Option<Object>, TreeError> {
        while let Some(line) = self.lines.next_line()? {
            if line.is_empty() {
                continue;
            }
            return Object::from_output_line(&line).map(Some);
        }

        let mut stderr = String::new();
        if let Some(mut pipe) = self.child.stderr.take() {
            let _ = pipe.read_to_string(&mut stderr);
        }
        let status = self.child.wait()?;
        debug!(code = ?status.code(), "git ls-tree exited");
        if !status.success() {
            return Err(TreeError::Process {
                code: status.code(),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(None)
    }
}

impl Iterator for TreeIterator {
    type Item = Result<Object, TreeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_entry() {
            Ok(Some(object)) => Some(Ok(object)),
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

impl Drop for TreeIterator {
    // reap the child if the caller abandons iteration early
    fn drop(&mut self) {
        if self.child.try_wait().ok().flatten().is_none() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Run `git ls-tree` for a tree-ish and return the streaming iterator.
///
/// # Errors
///
/// Returns [`TreeError::Spawn`] if git cannot be started.
pub fn ls_tree(
    repo: &GitRepo,
    treeish: &str,
    options: &LsTreeOptions,
) -> Result<TreeIterator, TreeError> {
    let args = build_args(treeish, options);
    let mut child = repo
        .git()
        .spawn(repo.path(), &args)
        .map_err(|source| TreeError::Spawn {
            program: repo.git().program().display().to_string(),
            source,
        })?;
    let Some(stdout) = child.stdout.take() else {
        return Err(TreeError::Spawn {
            program: repo.git().program().display().to_string(),
            source: std::io::Error::other("stdout was not piped"),
        });
    };
    Ok(TreeIterator {
        lines: LineReader::new(BufReader::new(stdout)),
        child,
        done: false,
    })
}
