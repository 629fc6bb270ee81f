//! Line source over a byte stream
//!
//! Commit messages contain blank lines that are semantically significant,
//! so the splitter must hand every line through verbatim — including empty
//! ones and a final line with no terminating newline. A configurable byte
//! ceiling keeps a pathological single line (an enormous message) from
//! growing the buffer without bound; exceeding it is an explicit error,
//! never silent truncation.

use crate::error::LineError;
use std::io::{BufRead, Read};

/// Default per-line byte ceiling
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

/// Lazy sequence of text lines read from a byte stream.
pub struct LineReader<R> {
    inner: R,
    max_line_bytes: usize,
}

impl<R: BufRead> LineReader<R> {
    /// Wrap a reader with the default line ceiling.
    pub fn new(inner: R) -> Self {
        Self::with_max_line_bytes(inner, DEFAULT_MAX_LINE_BYTES)
    }

    /// Wrap a reader with a specific per-line byte ceiling.
    pub fn with_max_line_bytes(inner: R, max_line_bytes: usize) -> Self {
        Self {
            inner,
            max_line_bytes,
        }
    }

    /// Produce the next line without its trailing newline, `Ok(None)` at
    /// end-of-stream. Blank lines are returned as empty strings, never
    /// coalesced or dropped. Invalid UTF-8 is replaced, not rejected.
    pub fn next_line(&mut self) -> Result<Option<String>, LineError> {
        let mut buf = Vec::new();
        let limit = self.max_line_bytes as u64 + 1;
        let n = self
            .inner
            .by_ref()
            .take(limit)
            .read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        } else if buf.len() > self.max_line_bytes {
            return Err(LineError::TooLong {
                limit: self.max_line_bytes,
            });
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}
