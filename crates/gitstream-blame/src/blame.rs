//! Blame record types

use gitstream_log::Event;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribution of one line of a file to the commit that last touched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blame {
    /// SHA of the commit the line is attributed to
    pub sha: String,
    /// Line number in the attributed commit's version of the file
    pub original_line_no: usize,
    /// Line number in the final version of the file
    pub final_line_no: usize,
    /// Number of lines in the group this line belongs to, when the
    /// porcelain reports one
    pub lines_in_group: usize,
    /// Author of the attributed commit
    pub author: Event,
    /// Committer of the attributed commit
    pub committer: Event,
    /// The line content itself
    pub line: String,
    /// First line of the attributed commit's message
    pub summary: String,
    /// Whether the attributed commit is a boundary commit (e.g. the root
    /// of a shallow clone)
    pub boundary: bool,
    /// `<sha> <path>` of the previous commit/file pair, when the line was
    /// carried over
    // TODO(ndc): split into a SHA and a path
    pub previous: Option<String>,
    /// Path of the file the line was attributed in
    pub filename: String,
}

impl Blame {
    /// Open an attribution shell from the header line's fields. The rest
    /// is filled in as porcelain lines arrive.
    pub(crate) fn open(
        sha: String,
        original_line_no: usize,
        final_line_no: usize,
        lines_in_group: usize,
    ) -> Self {
        Self {
            sha,
            original_line_no,
            final_line_no,
            lines_in_group,
            author: Event::default(),
            committer: Event::default(),
            line: String::new(),
            summary: String::new(),
            boundary: false,
            previous: None,
            filename: String::new(),
        }
    }
}

impl fmt::Display for Blame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} <{}>",
            self.sha, self.author.name, self.author.email
        )
    }
}

/// Configuration for a blame run.
#[derive(Debug, Clone, Default)]
pub struct BlameOptions {
    /// Blame the file as of this revision instead of the working tree
    pub revision: Option<String>,
    /// Per-line byte ceiling override for the output stream
    pub max_line_bytes: Option<usize>,
}

impl BlameOptions {
    /// Blame the file as of `revision`.
    #[must_use]
    pub fn revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    /// Override the per-line byte ceiling.
    #[must_use]
    pub fn max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = Some(max_line_bytes);
        self
    }
}
