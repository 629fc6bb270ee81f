// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for gitstream-log

use std::io;
use thiserror::Error;

/// Transport errors raised while reading lines from the output stream
#[derive(Debug, Error)]
pub enum LineError {
    /// The underlying stream could not be read
    #[error("I/O error reading output: {0}")]
    Io(#[from] io::Error),

    /// A single line exceeded the configured buffer ceiling
    #[error("line exceeded the {limit} byte ceiling")]
    TooLong {
        /// The per-line byte ceiling that was in effect
        limit: usize,
    },
}

/// Format errors raised while decoding fields of a record
#[derive(Debug, Error)]
pub enum ParseError {
    /// An ISO 8601 date field could not be parsed
    #[error("malformed date {value:?}: {source}")]
    Date {
        /// The field text as it appeared in the stream
        value: String,
        /// The underlying chrono parse failure
        #[source]
        source: chrono::ParseError,
    },

    /// An epoch-seconds field was not a valid integer timestamp
    #[error("malformed epoch seconds {value:?}")]
    Epoch {
        /// The field text as it appeared in the stream
        value: String,
    },

    /// A `±HHMM` timezone offset could not be parsed
    #[error("malformed timezone offset {value:?}")]
    Offset {
        /// The field text as it appeared in the stream
        value: String,
    },

    /// An author/committer line did not decompose into name, email,
    /// epoch and offset
    #[error("malformed identity line {value:?}")]
    Identity {
        /// The line as it appeared in the stream
        value: String,
    },

    /// A numstat count was neither an integer nor the `-` sentinel
    #[error("malformed stat count {value:?}")]
    StatCount {
        /// The column text as it appeared in the stream
        value: String,
    },
}

/// Errors that can occur while decoding `git log` output
#[derive(Debug, Error)]
pub enum LogError {
    /// The output stream could not be read, or a line was oversized
    #[error(transparent)]
    Line(#[from] LineError),

    /// A record field was malformed; the stream is aborted
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Repository not found at the specified path
    #[error("repository not found: {path}")]
    RepositoryNotFound {
        /// The path that was expected to hold a repository
        path: String,
    },

    /// The git executable could not be spawned
    #[error("could not run {program}: {source}")]
    Spawn {
        /// The program that was invoked
        program: String,
        /// The underlying spawn failure
        #[source]
        source: io::Error,
    },

    /// Waiting on the subprocess failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// git exited non-zero after its output was drained
    #[error("git exited with status {code:?}: {stderr}")]
    Process {
        /// The exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Captured standard error output, trimmed
        stderr: String,
    },
}
