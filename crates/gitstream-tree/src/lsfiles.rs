// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Decoder for `git ls-files` output — one path per line.

use crate::error::TreeError;
use gitstream_log::GitRepo;
use gitstream_log::lines::LineReader;
use std::ffi::OsString;
use std::io::{BufReader, Read};
use std::process::{Child, ChildStdout};
use tracing::debug;

/// Configuration for a file listing.
#[derive(Debug, Clone, Default)]
pub struct LsFilesOptions {
    /// Pattern filtering the files to list; git's `<file>` argument
    pub files: Option<String>,
    /// Do not list empty directories (`--no-empty-directory`)
    pub no_empty_directory: bool,
}

impl LsFilesOptions {
    /// Filter the listing to paths matching `pattern`.
    #[must_use]
    pub fn files(mut self, pattern: impl Into<String>) -> Self {
        self.files = Some(pattern.into());
        self
    }

    /// Do not list empty directories.
    #[must_use]
    pub fn no_empty_directory(mut self) -> Self {
        self.no_empty_directory = true;
        self
    }
}

pub(crate) fn build_args(options: &LsFilesOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["ls-files".into()];
    if options.no_empty_directory {
        args.push("--no-empty-directory".into());
    }
    // the pattern has to be the last argument
    if let Some(files) = &options.files {
        args.push(files.as_str().into());
    }
    args
}

/// Streaming iterator over listed paths, with the shared
/// end-of-stream/exit-status contract.
pub struct FilesIterator {
    lines: LineReader<BufReader<ChildStdout>>,
    child: Child,
    done: bool,
}

impl FilesIterator {
    fn next_path(&mut self) -> Result<Option<String>, TreeError> {
        if let Some(line) = self.lines.next_line()? {
            return Ok(Some(line));
        }

        let mut stderr = String::new();
        if let Some(mut pipe) = self.child.stderr.take() {
            let _ = pipe.read_to_string(&mut stderr);
        }
        let status = self.child.wait()?;
        debug!(code = ?status.code(), "git ls-files exited");
        if !status.success() {
            return Err(TreeError::Process {
                code: status.code(),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(None)
    }
}

impl Iterator for FilesIterator {
    type Item = Result<String, TreeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_path() {
            Ok(Some(path)) => Some(Ok(path)),
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

impl Drop for FilesIterator {
    // reap the child if the caller abandons iteration early
    fn drop(&mut self) {
        if self.child.try_wait().ok().flatten().is_none() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Run `git ls-files` and return the streaming iterator of paths.
///
/// # Errors
///
/// Returns [`TreeError::Spawn`] if git cannot be started.
pub fn ls_files(repo: &GitRepo, options: &LsFilesOptions) -> Result<FilesIterator, TreeError> {
    let args = build_args(options);
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
    Ok(FilesIterator {
        lines: LineReader::new(BufReader::new(stdout)),
        child,
        done: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn args_strings(options: &LsFilesOptions) -> Vec<String> {
        build_args(options)
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_default_args() {
        assert_eq!(args_strings(&LsFilesOptions::default()), ["ls-files"]);
    }

    #[test]
    fn test_pattern_is_last() {
        let options = LsFilesOptions::default()
            .no_empty_directory()
            .files("src/*.rs");
        assert_eq!(
            args_strings(&options),
            ["ls-files", "--no-empty-directory", "src/*.rs"]
        );
    }
}
