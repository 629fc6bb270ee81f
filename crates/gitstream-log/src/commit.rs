//! Commit record types and helpers

use crate::format;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// The who and when of a commit event.
///
/// Author and committer are both events; they differ for cherry-picks,
/// rebases and amended commits. The timestamp keeps the offset the commit
/// was recorded in, not the local zone of whoever decodes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Display name
    pub name: String,
    /// Email address, without the angle-bracket delimiters
    pub email: String,
    /// Timestamp in the original UTC offset
    pub when: DateTime<FixedOffset>,
}

impl Default for Event {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            when: DateTime::<Utc>::UNIX_EPOCH.fixed_offset(),
        }
    }
}

/// Per-file added/deleted line counts for one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    /// Path of the file within the repository
    pub path: String,
    /// Lines added, or `None` for binary files
    pub additions: Option<u64>,
    /// Lines deleted, or `None` for binary files
    pub deletions: Option<u64>,
}

/// One decoded revision from `git log`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// The commit SHA (40 hex characters)
    pub sha: String,
    /// The tree SHA (40 hex characters)
    pub tree: String,
    /// Parent commit SHAs in source order; the first parent is the
    /// mainline parent. Empty for root commits.
    pub parents: Vec<String>,
    /// Author event
    pub author: Event,
    /// Committer event
    pub committer: Event,
    /// Commit message body. Blank lines inside the body are preserved.
    pub message: String,
    /// Signature block, when the raw scheme was used and the commit is
    /// signed. Opaque multi-line text.
    pub signature: Option<String>,
    /// Per-file numstat records, when statistics were requested
    pub stats: Vec<Stat>,
    // Whether the source stream carried a blank separator line after the
    // body terminator; needed to re-encode the stream byte-for-byte.
    #[serde(skip)]
    pub(crate) trailing_blank: bool,
}

impl Commit {
    /// Open an empty record shell for the given SHA. Fields are filled in
    /// as subsequent lines arrive.
    pub(crate) fn open(sha: String) -> Self {
        Self {
            sha,
            tree: String::new(),
            parents: Vec::new(),
            author: Event::default(),
            committer: Event::default(),
            message: String::new(),
            signature: None,
            stats: Vec::new(),
            trailing_blank: false,
        }
    }

    /// Validate that a SHA is a valid 40-character hex string
    #[must_use]
    pub fn is_valid_sha(sha: &str) -> bool {
        sha.len() == 40 && sha.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Get the short SHA (first 7 characters)
    #[must_use]
    pub fn short_sha(&self) -> &str {
        &self.sha[..7.min(self.sha.len())]
    }

    /// Check if this is a merge commit (has multiple parents)
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Check if this is a root commit (has no parents)
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Get the first line of the commit message (subject)
    #[must_use]
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Re-encode this record in the tagged output format, reproducing the
    /// bytes `git log` emits for the template from
    /// [`format::tagged_template`]. The exact inverse of the tagged
    /// decoder; decoding a stream and re-encoding every record yields the
    /// original bytes.
    #[must_use]
    pub fn render_tagged(&self) -> String {
        let mut s = String::new();

        s.push_str(&format!("{}{}\n", format::COMMIT_TAG, self.sha));
        s.push_str(&format!("{}{}\n", format::TREE_TAG, self.tree));
        s.push_str(&format!(
            "{}{}\n",
            format::PARENTS_TAG,
            self.parents.join(" ")
        ));

        s.push_str(&format!("{}{}\n", format::AUTHOR_NAME_TAG, self.author.name));
        s.push_str(&format!(
            "{}{}\n",
            format::AUTHOR_EMAIL_TAG, self.author.email
        ));
        s.push_str(&format!(
            "{}{}\n",
            format::AUTHOR_DATE_TAG,
            self.author.when.to_rfc3339_opts(SecondsFormat::Secs, false)
        ));

        s.push_str(&format!(
            "{}{}\n",
            format::COMMITTER_NAME_TAG, self.committer.name
        ));
        s.push_str(&format!(
            "{}{}\n",
            format::COMMITTER_EMAIL_TAG, self.committer.email
        ));
        s.push_str(&format!(
            "{}{}\n",
            format::COMMITTER_DATE_TAG,
            self.committer.when.to_rfc3339_opts(SecondsFormat::Secs, false)
        ));

        // The template terminates the body with `%n%x00`, and the decoder
        // strips that newline when it closes the body; re-add both.
        s.push_str(&format!(
            "{}{}\n{}\n",
            format::BODY_TAG,
            self.message,
            format::BODY_TERMINATOR
        ));

        if !self.stats.is_empty() || self.trailing_blank {
            s.push('\n');
        }

        for stat in &self.stats {
            let additions = stat
                .additions
                .map_or_else(|| "-".to_string(), |n| n.to_string());
            let deletions = stat
                .deletions
                .map_or_else(|| "-".to_string(), |n| n.to_string());
            s.push_str(&format!(
                "{}\t{}\t{}\n",
                additions, deletions, stat.path
            ));
        }

        s
    }
}
