// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for gitstream-blame

use gitstream_log::{LineError, ParseError};
use std::io;
use thiserror::Error;

/// Errors that can occur while decoding `git blame` output
#[derive(Debug, Error)]
pub enum BlameError {
    /// The output stream could not be read, or a line was oversized
    #[error(transparent)]
    Line(#[from] LineError),

    /// A porcelain field was malformed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A porcelain header line did not carry a SHA and line numbers
    #[error("malformed blame header {value:?}")]
    Header {
        /// The line as it appeared in the stream
        value: String,
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

    /// git exited non-zero
    #[error("git blame exited with status {code:?}: {stderr}")]
    Process {
        /// The exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Captured standard error output, trimmed
        stderr: String,
    },
}
