// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Commit assembly state machines
//!
//! One record spans many lines, and the stream carries no explicit
//! end-of-record marker in the tagged scheme: a record is known to be
//! complete only when the next record's identity line appears, or when the
//! stream ends. The assemblers here are one-line-lookahead state machines —
//! each line is classified, applied to the open record, and a new identity
//! line freezes the previous record for emission.
//!
//! The two output schemes are interchangeable strategies behind the same
//! contract ("feed a line, maybe emit; finish at end-of-stream"), so each
//! scheme's edge cases stay independently testable.

use crate::commit::{Commit, Event, Stat};
use crate::error::{LogError, ParseError};
use crate::format::{
    AUTHOR_DATE_TAG, AUTHOR_EMAIL_TAG, AUTHOR_NAME_TAG, BODY_TAG, BODY_TERMINATOR,
    COMMITTER_DATE_TAG, COMMITTER_EMAIL_TAG, COMMITTER_NAME_TAG, COMMIT_TAG, PARENTS_TAG, Scheme,
    TREE_TAG,
};
use crate::lines::{DEFAULT_MAX_LINE_BYTES, LineReader};
use chrono::{DateTime, FixedOffset, TimeZone};
use std::io::BufRead;

// Field keywords of the raw scheme (`git log --pretty=raw`).
const RAW_COMMIT: &str = "commit ";
const RAW_TREE: &str = "tree ";
const RAW_PARENT: &str = "parent ";
const RAW_AUTHOR: &str = "author ";
const RAW_COMMITTER: &str = "committer ";
const RAW_GPGSIG: &str = "gpgsig ";
// The raw scheme indents the message body by four columns and signature
// continuation lines by one; that indentation is the only thing that
// distinguishes a body line starting with a reserved keyword from the
// field itself.
const RAW_BODY_INDENT: &str = "    ";

/// One scheme's line classifier behind the shared assembler contract.
trait Assemble: Send {
    /// Feed one line; returns the record this line froze, if any.
    fn feed(&mut self, line: &str) -> Result<Option<Commit>, ParseError>;
    /// Release the record left open when the stream ended.
    fn finish(&mut self) -> Option<Commit>;
}

/// Assembler for the tagged scheme.
#[derive(Default)]
struct TaggedAssembler {
    current: Option<Commit>,
    in_body: bool,
}

impl TaggedAssembler {
    // The template terminates the body with `%n%x00`; dropping that one
    // newline leaves the message exactly as the commit stores it.
    fn close_body(&mut self) {
        if !self.in_body {
            return;
        }
        self.in_body = false;
        if let Some(commit) = self.current.as_mut() {
            if commit.message.ends_with('\n') {
                commit.message.pop();
            }
        }
    }
}

impl Assemble for TaggedAssembler {
    fn feed(&mut self, line: &str) -> Result<Option<Commit>, ParseError> {
        if let Some(sha) = line.strip_prefix(COMMIT_TAG) {
            self.close_body();
            return Ok(self.current.replace(Commit::open(sha.to_string())));
        }
        let Some(commit) = self.current.as_mut() else {
            // no record open yet; unrecognized preamble is ignored
            return Ok(None);
        };

        if let Some(rest) = line.strip_prefix(TREE_TAG) {
            commit.tree = rest.to_string();
        } else if let Some(rest) = line.strip_prefix(PARENTS_TAG) {
            // all parents arrive space-joined on one line; a root commit
            // leaves the field empty and contributes no parents
            commit
                .parents
                .extend(rest.split_whitespace().map(str::to_string));
        } else if let Some(rest) = line.strip_prefix(AUTHOR_NAME_TAG) {
            commit.author.name = rest.to_string();
        } else if let Some(rest) = line.strip_prefix(AUTHOR_EMAIL_TAG) {
            commit.author.email = rest.to_string();
        } else if let Some(rest) = line.strip_prefix(AUTHOR_DATE_TAG) {
            commit.author.when = parse_iso_date(rest)?;
        } else if let Some(rest) = line.strip_prefix(COMMITTER_NAME_TAG) {
            commit.committer.name = rest.to_string();
        } else if let Some(rest) = line.strip_prefix(COMMITTER_EMAIL_TAG) {
            commit.committer.email = rest.to_string();
        } else if let Some(rest) = line.strip_prefix(COMMITTER_DATE_TAG) {
            commit.committer.when = parse_iso_date(rest)?;
        } else if let Some(rest) = line.strip_prefix(BODY_TAG) {
            self.in_body = true;
            commit.message = format!("{rest}\n");
        } else if line.starts_with(BODY_TERMINATOR) {
            self.close_body();
        } else if self.in_body {
            commit.message.push_str(line);
            commit.message.push('\n');
        } else {
            // between the body terminator and the next record: the blank
            // separator git emits before numstat output, and the numstat
            // lines themselves
            commit.trailing_blank = true;
            parse_stat_line(line, &mut commit.stats)?;
        }
        Ok(None)
    }

    fn finish(&mut self) -> Option<Commit> {
        self.close_body();
        self.current.take()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum RawState {
    #[default]
    Header,
    Signature,
    Body,
    Trailer,
}

/// Assembler for the raw scheme.
#[derive(Default)]
struct RawAssembler {
    current: Option<Commit>,
    state: RawState,
}

impl RawAssembler {
    fn close_current(&mut self) -> Option<Commit> {
        self.state = RawState::Header;
        let mut commit = self.current.take()?;
        normalize_raw_message(&mut commit.message);
        Some(commit)
    }

    fn feed_header(&mut self, line: &str) -> Result<(), ParseError> {
        let Some(commit) = self.current.as_mut() else {
            return Ok(());
        };
        if let Some(rest) = line.strip_prefix(RAW_TREE) {
            commit.tree = rest.to_string();
        } else if let Some(rest) = line.strip_prefix(RAW_PARENT) {
            commit.parents.push(rest.to_string());
        } else if let Some(rest) = line.strip_prefix(RAW_AUTHOR) {
            commit.author = parse_raw_event(rest)?;
        } else if let Some(rest) = line.strip_prefix(RAW_COMMITTER) {
            commit.committer = parse_raw_event(rest)?;
        } else if let Some(rest) = line.strip_prefix(RAW_GPGSIG) {
            commit.signature = Some(format!("{rest}\n"));
            self.state = RawState::Signature;
        } else if line.is_empty() {
            self.state = RawState::Body;
        }
        // unrecognized header fields (mergetag, encoding, ...) are ignored
        Ok(())
    }

    fn feed_body(&mut self, line: &str) -> Result<(), ParseError> {
        let Some(commit) = self.current.as_mut() else {
            return Ok(());
        };
        if let Some(rest) = line.strip_prefix(RAW_BODY_INDENT) {
            commit.message.push_str(rest);
            commit.message.push('\n');
        } else if line.is_empty() {
            self.state = RawState::Trailer;
        } else {
            // unindented non-field line: the body is over
            self.state = RawState::Trailer;
            self.feed_trailer(line)?;
        }
        Ok(())
    }

    fn feed_trailer(&mut self, line: &str) -> Result<(), ParseError> {
        let Some(commit) = self.current.as_mut() else {
            return Ok(());
        };
        if !line.is_empty() {
            parse_stat_line(line, &mut commit.stats)?;
        }
        Ok(())
    }
}

impl Assemble for RawAssembler {
    fn feed(&mut self, line: &str) -> Result<Option<Commit>, ParseError> {
        if matches!(self.state, RawState::Signature) {
            if let Some(rest) = line.strip_prefix(' ') {
                if let Some(commit) = self.current.as_mut() {
                    if let Some(sig) = commit.signature.as_mut() {
                        sig.push_str(rest);
                        sig.push('\n');
                    }
                }
                return Ok(None);
            }
            self.state = RawState::Header;
        }

        if let Some(sha) = line.strip_prefix(RAW_COMMIT) {
            let emitted = self.close_current();
            self.current = Some(Commit::open(sha.to_string()));
            return Ok(emitted);
        }

        match self.state {
            RawState::Header => self.feed_header(line)?,
            RawState::Body => self.feed_body(line)?,
            RawState::Trailer => self.feed_trailer(line)?,
            // continuation handled above
            RawState::Signature => {}
        }
        Ok(None)
    }

    fn finish(&mut self) -> Option<Commit> {
        self.close_current()
    }
}

/// Assembles commits from a sequence of lines.
///
/// Construct with the scheme the stream was produced in; the two schemes
/// are full alternatives with the same contract.
pub struct CommitAssembler {
    inner: Box<dyn Assemble>,
}

impl CommitAssembler {
    /// An assembler for the given output scheme.
    #[must_use]
    pub fn new(scheme: Scheme) -> Self {
        let inner: Box<dyn Assemble> = match scheme {
            Scheme::Tagged => Box::new(TaggedAssembler::default()),
            Scheme::Raw => Box::new(RawAssembler::default()),
        };
        Self { inner }
    }

    /// Feed one line. Returns the record this line froze, if any: a new
    /// identity line emits the previously open record.
    pub fn feed_line(&mut self, line: &str) -> Result<Option<Commit>, ParseError> {
        self.inner.feed(line)
    }

    /// Release the record left open when the stream ended, if any.
    pub fn finish(&mut self) -> Option<Commit> {
        self.inner.finish()
    }
}

/// Pull-based commit decoder over any line-oriented reader.
///
/// Drives a [`LineReader`] through a [`CommitAssembler`]. The record still
/// open when the stream ends is *held back* rather than emitted — whether
/// it is complete can only be judged by whoever knows how the stream ended
/// (see the exit-status handling in [`crate::exec::LogIterator`]); it is
/// released through [`CommitStream::take_pending`].
pub struct CommitStream<R> {
    lines: LineReader<R>,
    assembler: CommitAssembler,
    pending: Option<Commit>,
    eof: bool,
}

impl<R: BufRead> CommitStream<R> {
    /// Decoder over `reader` with the default line ceiling.
    pub fn new(reader: R, scheme: Scheme) -> Self {
        Self::with_max_line_bytes(reader, scheme, DEFAULT_MAX_LINE_BYTES)
    }

    /// Decoder over `reader` with a specific per-line byte ceiling.
    pub fn with_max_line_bytes(reader: R, scheme: Scheme, max_line_bytes: usize) -> Self {
        Self {
            lines: LineReader::with_max_line_bytes(reader, max_line_bytes),
            assembler: CommitAssembler::new(scheme),
            pending: None,
            eof: false,
        }
    }

    /// Produce the next completed record, or `Ok(None)` once the stream
    /// has ended. After an error or end-of-stream every further call
    /// returns `Ok(None)`; the stream is never resurrected.
    pub fn next_commit(&mut self) -> Result<Option<Commit>, LogError> {
        if self.eof {
            return Ok(None);
        }
        loop {
            let line = match self.lines.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.eof = true;
                    self.pending = self.assembler.finish();
                    return Ok(None);
                }
                Err(err) => {
                    self.eof = true;
                    return Err(LogError::from(err));
                }
            };
            match self.assembler.feed_line(&line) {
                Ok(Some(commit)) => return Ok(Some(commit)),
                Ok(None) => {}
                Err(err) => {
                    self.eof = true;
                    return Err(LogError::from(err));
                }
            }
        }
    }

    /// The record still open when the stream ended, if any. `None` if the
    /// stream failed mid-record — a record known to be incomplete is
    /// never handed out.
    pub fn take_pending(&mut self) -> Option<Commit> {
        self.pending.take()
    }
}

fn parse_iso_date(value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    DateTime::parse_from_rfc3339(value).map_err(|source| ParseError::Date {
        value: value.to_string(),
        source,
    })
}

/// Decompose a raw-scheme identity line: `<name> <email> <epoch> <±HHMM>`.
/// The name may itself contain spaces, so the last three
/// whitespace-separated tokens are taken from the right and everything
/// before them is the name.
fn parse_raw_event(value: &str) -> Result<Event, ParseError> {
    let identity_err = || ParseError::Identity {
        value: value.to_string(),
    };

    let rest = value.trim_end();
    let (rest, offset) = rest.rsplit_once(' ').ok_or_else(identity_err)?;
    let (rest, epoch) = rest.trim_end().rsplit_once(' ').ok_or_else(identity_err)?;
    let (name, email) = match rest.trim_end().rsplit_once(' ') {
        Some((name, email)) => (name.trim(), email),
        None => ("", rest.trim_end()),
    };

    let epoch: i64 = epoch.parse().map_err(|_| ParseError::Epoch {
        value: epoch.to_string(),
    })?;
    let offset = parse_zone_offset(offset)?;
    let when = offset
        .timestamp_opt(epoch, 0)
        .single()
        .ok_or_else(|| ParseError::Epoch {
            value: epoch.to_string(),
        })?;

    Ok(Event {
        name: name.to_string(),
        email: email.trim_matches(['<', '>']).to_string(),
        when,
    })
}

/// Parse a `±HHMM` zone token into the offset it names.
///
/// git prints zone offsets in this shape in both the raw commit dump and
/// the blame porcelain output.
///
/// # Errors
///
/// Returns [`ParseError::Offset`] when the token is not `±HHMM` or names
/// an impossible offset.
pub fn parse_zone_offset(value: &str) -> Result<FixedOffset, ParseError> {
    let offset_err = || ParseError::Offset {
        value: value.to_string(),
    };

    if value.len() != 5 || !value.is_ascii() {
        return Err(offset_err());
    }
    let sign = match &value[..1] {
        "+" => 1,
        "-" => -1,
        _ => return Err(offset_err()),
    };
    let hours: i32 = value[1..3].parse().map_err(|_| offset_err())?;
    let minutes: i32 = value[3..5].parse().map_err(|_| offset_err())?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(offset_err)
}

/// Parse a numstat line `<added>\t<deleted>\t<path>` into `stats`. Lines
/// of any other shape are ignored; a malformed count in a line of the
/// right shape fails the stream.
fn parse_stat_line(line: &str, stats: &mut Vec<Stat>) -> Result<(), ParseError> {
    let mut columns = line.split('\t');
    let (Some(added), Some(deleted), Some(path)) = (columns.next(), columns.next(), columns.next())
    else {
        return Ok(());
    };
    if columns.next().is_some() {
        return Ok(());
    }
    let additions = parse_stat_count(added)?;
    let deletions = parse_stat_count(deleted)?;
    stats.push(Stat {
        path: path.to_string(),
        additions,
        deletions,
    });
    Ok(())
}

/// `-` in a numstat count column means "binary file, no line count" and
/// maps to `None`, distinct from zero.
fn parse_stat_count(value: &str) -> Result<Option<u64>, ParseError> {
    if value == "-" {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|_| ParseError::StatCount {
        value: value.to_string(),
    })
}

fn normalize_raw_message(message: &mut String) {
    let trimmed = message.trim_start_matches('\n');
    if trimmed.len() != message.len() {
        *message = trimmed.to_string();
    }
    while message.ends_with("\n\n") {
        message.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;
    use std::io::Cursor;

    fn parse_all(input: &str, scheme: Scheme) -> Result<Vec<Commit>, LogError> {
        let mut stream = CommitStream::new(Cursor::new(input.as_bytes().to_vec()), scheme);
        let mut commits = Vec::new();
        while let Some(commit) = stream.next_commit()? {
            commits.push(commit);
        }
        if let Some(commit) = stream.take_pending() {
            commits.push(commit);
        }
        Ok(commits)
    }

    const SHA_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const SHA_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
    const SHA_C: &str = "cccccccccccccccccccccccccccccccccccccccc";
    const TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

    fn tagged_record(sha: &str, parents: &str, message: &str) -> String {
        format!(
            "_H:{sha}\n_T:{TREE}\n_P:{parents}\n\
             _aN:Jane A. Doe\n_aE:jane@example.com\n_aI:2023-07-22T01:46:40-04:00\n\
             _cN:Jane A. Doe\n_cE:jane@example.com\n_cI:2023-07-22T01:46:40-04:00\n\
             _B:{message}\n\u{0}\n"
        )
    }

    // ------------------------------------------------------------------
    // Tagged scheme
    // ------------------------------------------------------------------

    #[test]
    fn test_tagged_single_commit() {
        let input = tagged_record(SHA_A, SHA_B, "subject\n");
        let commits = parse_all(&input, Scheme::Tagged).expect("parse");
        assert_eq!(commits.len(), 1);
        let commit = &commits[0];
        assert_eq!(commit.sha, SHA_A);
        assert_eq!(commit.tree, TREE);
        assert_eq!(commit.parents, vec![SHA_B.to_string()]);
        assert_eq!(commit.author.name, "Jane A. Doe");
        assert_eq!(commit.author.email, "jane@example.com");
        assert_eq!(commit.message, "subject\n");
    }

    #[test]
    fn test_tagged_timestamp_keeps_offset() {
        let input = tagged_record(SHA_A, "", "m\n");
        let commits = parse_all(&input, Scheme::Tagged).expect("parse");
        let when = commits[0].author.when;
        assert_eq!(when.timestamp(), 1_690_000_000);
        assert_eq!(when.offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_tagged_empty_message_is_empty_string() {
        let input = tagged_record(SHA_A, "", "");
        let commits = parse_all(&input, Scheme::Tagged).expect("parse");
        assert_eq!(commits[0].message, "");
    }

    #[test]
    fn test_tagged_root_commit_has_empty_parents() {
        let input = tagged_record(SHA_A, "", "m\n");
        let commits = parse_all(&input, Scheme::Tagged).expect("parse");
        assert_eq!(commits[0].parents, Vec::<String>::new());
        assert!(commits[0].is_root());
    }

    #[test]
    fn test_tagged_merge_commit_preserves_parent_order() {
        let input = tagged_record(SHA_A, &format!("{SHA_C} {SHA_B}"), "m\n");
        let commits = parse_all(&input, Scheme::Tagged).expect("parse");
        assert_eq!(
            commits[0].parents,
            vec![SHA_C.to_string(), SHA_B.to_string()]
        );
        assert!(commits[0].is_merge());
    }

    #[test]
    fn test_tagged_message_preserves_blank_lines() {
        let input = tagged_record(SHA_A, "", "subject\n\npara one\n\n\npara two\n");
        let commits = parse_all(&input, Scheme::Tagged).expect("parse");
        assert_eq!(commits[0].message, "subject\n\npara one\n\n\npara two\n");
    }

    #[test]
    fn test_tagged_body_keeps_stat_shaped_lines() {
        let input = tagged_record(SHA_A, "", "subject\n1\t2\tnot-a-stat\n");
        let commits = parse_all(&input, Scheme::Tagged).expect("parse");
        assert_eq!(commits[0].message, "subject\n1\t2\tnot-a-stat\n");
        assert!(commits[0].stats.is_empty());
    }

    #[test]
    fn test_tagged_lookahead_emits_first_commit_mid_stream() {
        let input = format!(
            "{}{}",
            tagged_record(SHA_A, "", "first subject\n\nfirst body\n"),
            tagged_record(SHA_B, SHA_A, "second\n")
        );
        let mut stream = CommitStream::new(Cursor::new(input.into_bytes()), Scheme::Tagged);

        let first = stream.next_commit().expect("first").expect("some");
        assert_eq!(first.sha, SHA_A);
        assert_eq!(first.message, "first subject\n\nfirst body\n");

        assert!(stream.next_commit().expect("eof").is_none());
        let second = stream.take_pending().expect("pending");
        assert_eq!(second.sha, SHA_B);
        assert_eq!(second.parents, vec![SHA_A.to_string()]);
    }

    #[test]
    fn test_tagged_stats_with_binary_sentinel() {
        // git separates the format expansion from numstat output with one
        // blank line
        let input = format!(
            "{}\n3\t1\tsrc/lib.rs\n-\t-\tassets/logo.png\n",
            tagged_record(SHA_A, "", "m\n")
        );
        let commits = parse_all(&input, Scheme::Tagged).expect("parse");
        let stats = &commits[0].stats;
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].path, "src/lib.rs");
        assert_eq!(stats[0].additions, Some(3));
        assert_eq!(stats[0].deletions, Some(1));
        assert_eq!(stats[1].path, "assets/logo.png");
        assert_eq!(stats[1].additions, None);
        assert_eq!(stats[1].deletions, None);
    }

    #[test]
    fn test_tagged_malformed_stat_count_fails_stream() {
        let input = format!("{}\nx\t1\tfile\n", tagged_record(SHA_A, "", "m\n"));
        match parse_all(&input, Scheme::Tagged) {
            Err(LogError::Parse(ParseError::StatCount { value })) => assert_eq!(value, "x"),
            other => panic!("expected StatCount error, got {other:?}"),
        }
    }

    #[test]
    fn test_tagged_malformed_date_fails_stream() {
        let input = tagged_record(SHA_A, "", "m\n").replace("2023-07-22T01:46:40-04:00", "yesterday");
        match parse_all(&input, Scheme::Tagged) {
            Err(LogError::Parse(ParseError::Date { value, .. })) => {
                assert_eq!(value, "yesterday");
            }
            other => panic!("expected Date error, got {other:?}"),
        }
    }

    #[test]
    fn test_tagged_unrecognized_line_is_not_fatal() {
        let input = tagged_record(SHA_A, "", "m\n").replace("\u{0}\n", "\u{0}\n_Z:future field\n");
        let commits = parse_all(&input, Scheme::Tagged).expect("parse");
        assert_eq!(commits[0].sha, SHA_A);
    }

    #[test]
    fn test_tagged_round_trip_bytes() {
        let input = format!(
            "{}\n3\t1\tsrc/lib.rs\n-\t-\tassets/logo.png\n{}",
            tagged_record(SHA_A, &format!("{SHA_B} {SHA_C}"), "subject\n\nbody line\n"),
            tagged_record(SHA_B, "", "")
        );
        let commits = parse_all(&input, Scheme::Tagged).expect("parse");
        let rendered: String = commits.iter().map(Commit::render_tagged).collect();
        assert_eq!(rendered, input);
    }

    #[test]
    fn test_tagged_idempotent_termination() {
        let input = tagged_record(SHA_A, "", "m\n");
        let mut stream = CommitStream::new(Cursor::new(input.into_bytes()), Scheme::Tagged);
        assert!(stream.next_commit().expect("first").is_none());
        assert!(stream.take_pending().is_some());
        assert!(stream.next_commit().expect("eof").is_none());
        assert!(stream.next_commit().expect("still eof").is_none());
        assert!(stream.take_pending().is_none());
    }

    #[test]
    fn test_tagged_error_is_terminal() {
        let input = tagged_record(SHA_A, "", "m\n").replace("2023-07-22T01:46:40-04:00", "bogus");
        let mut stream = CommitStream::new(Cursor::new(input.into_bytes()), Scheme::Tagged);
        assert!(stream.next_commit().is_err());
        // dead after the error: no record, no pending partial
        assert!(stream.next_commit().expect("terminal").is_none());
        assert!(stream.take_pending().is_none());
    }

    // ------------------------------------------------------------------
    // Raw scheme
    // ------------------------------------------------------------------

    fn raw_record(sha: &str, parents: &[&str], body: &str) -> String {
        let mut s = format!("commit {sha}\ntree {TREE}\n");
        for parent in parents {
            s.push_str(&format!("parent {parent}\n"));
        }
        s.push_str("author Jane A. Doe <jane@example.com> 1690000000 -0400\n");
        s.push_str("committer Jane A. Doe <jane@example.com> 1690000000 -0400\n");
        s.push('\n');
        for line in body.lines() {
            if line.is_empty() {
                s.push_str("    \n");
            } else {
                s.push_str(&format!("    {line}\n"));
            }
        }
        s.push('\n');
        s
    }

    #[test]
    fn test_raw_single_commit() {
        let input = raw_record(SHA_A, &[SHA_B], "subject\n\nbody para\n");
        let commits = parse_all(&input, Scheme::Raw).expect("parse");
        assert_eq!(commits.len(), 1);
        let commit = &commits[0];
        assert_eq!(commit.sha, SHA_A);
        assert_eq!(commit.tree, TREE);
        assert_eq!(commit.parents, vec![SHA_B.to_string()]);
        assert_eq!(commit.message, "subject\n\nbody para\n");
    }

    #[test]
    fn test_raw_multi_word_author_name() {
        let input = raw_record(SHA_A, &[], "m\n");
        let commits = parse_all(&input, Scheme::Raw).expect("parse");
        let author = &commits[0].author;
        assert_eq!(author.name, "Jane A. Doe");
        assert_eq!(author.email, "jane@example.com");
        assert_eq!(author.when.timestamp(), 1_690_000_000);
        assert_eq!(author.when.offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_raw_two_commits() {
        let input = format!(
            "{}{}",
            raw_record(SHA_A, &[SHA_B], "first\n"),
            raw_record(SHA_B, &[], "second\n")
        );
        let commits = parse_all(&input, Scheme::Raw).expect("parse");
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].sha, SHA_A);
        assert_eq!(commits[0].message, "first\n");
        assert_eq!(commits[1].sha, SHA_B);
        assert!(commits[1].is_root());
    }

    #[test]
    fn test_raw_merge_parent_order() {
        let input = raw_record(SHA_A, &[SHA_C, SHA_B], "merge\n");
        let commits = parse_all(&input, Scheme::Raw).expect("parse");
        assert_eq!(
            commits[0].parents,
            vec![SHA_C.to_string(), SHA_B.to_string()]
        );
    }

    #[test]
    fn test_raw_body_keyword_line_stays_in_body() {
        // a body line starting with a reserved keyword is only a body
        // line because of its indentation
        let input = raw_record(SHA_A, &[], &format!("subject\n\ncommit {SHA_B}\ntree deadbeef\n"));
        let commits = parse_all(&input, Scheme::Raw).expect("parse");
        assert_eq!(commits.len(), 1);
        assert_eq!(
            commits[0].message,
            format!("subject\n\ncommit {SHA_B}\ntree deadbeef\n")
        );
    }

    #[test]
    fn test_raw_signature_block() {
        let input = "commit aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\n\
                     tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n\
                     author A <a@example.com> 1690000000 +0000\n\
                     committer A <a@example.com> 1690000000 +0000\n\
                     gpgsig -----BEGIN PGP SIGNATURE-----\n \n iQEzBAABCAAdFiEE\n -----END PGP SIGNATURE-----\n\
                     \n    signed subject\n\n";
        let commits = parse_all(input, Scheme::Raw).expect("parse");
        let commit = &commits[0];
        assert_eq!(
            commit.signature.as_deref(),
            Some("-----BEGIN PGP SIGNATURE-----\n\niQEzBAABCAAdFiEE\n-----END PGP SIGNATURE-----\n")
        );
        assert_eq!(commit.message, "signed subject\n");
    }

    #[test]
    fn test_raw_trims_leading_and_trailing_blank_run() {
        let input = "commit aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\n\
                     tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n\
                     author A <a@example.com> 1690000000 +0000\n\
                     committer A <a@example.com> 1690000000 +0000\n\
                     \n    \n    subject\n    \n    \n\n";
        let commits = parse_all(input, Scheme::Raw).expect("parse");
        assert_eq!(commits[0].message, "subject\n");
    }

    #[test]
    fn test_raw_empty_body() {
        let input = "commit aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\n\
                     tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n\
                     author A <a@example.com> 1690000000 +0000\n\
                     committer A <a@example.com> 1690000000 +0000\n\n\n";
        let commits = parse_all(input, Scheme::Raw).expect("parse");
        assert_eq!(commits[0].message, "");
    }

    #[test]
    fn test_raw_numstat_trailer() {
        let input = format!("{}3\t0\tsrc/main.rs\n-\t-\tblob.bin\n", raw_record(SHA_A, &[], "m\n"));
        let commits = parse_all(&input, Scheme::Raw).expect("parse");
        let stats = &commits[0].stats;
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].additions, Some(3));
        assert_eq!(stats[1].additions, None);
    }

    #[test]
    fn test_raw_malformed_epoch_fails_stream() {
        let input = raw_record(SHA_A, &[], "m\n").replace("1690000000", "soon");
        match parse_all(&input, Scheme::Raw) {
            Err(LogError::Parse(ParseError::Epoch { value })) => assert_eq!(value, "soon"),
            other => panic!("expected Epoch error, got {other:?}"),
        }
    }

    #[test]
    fn test_raw_malformed_offset_fails_stream() {
        let input = raw_record(SHA_A, &[], "m\n").replace("-0400", "-04x0");
        match parse_all(&input, Scheme::Raw) {
            Err(LogError::Parse(ParseError::Offset { value })) => assert_eq!(value, "-04x0"),
            other => panic!("expected Offset error, got {other:?}"),
        }
    }

    #[test]
    fn test_raw_unknown_header_ignored() {
        let input = raw_record(SHA_A, &[], "m\n").replace(
            "committer Jane",
            "mergetag object 9c0f1f104c972e8d8d71efd84cb9d2605d9e80d4\ncommitter Jane",
        );
        let commits = parse_all(&input, Scheme::Raw).expect("parse");
        assert_eq!(commits[0].sha, SHA_A);
        assert_eq!(commits[0].message, "m\n");
    }

    // ------------------------------------------------------------------
    // Identity line decomposition
    // ------------------------------------------------------------------

    #[test]
    fn test_parse_raw_event_nameless() {
        let event = parse_raw_event("<a@example.com> 1690000000 +0530").expect("parse");
        assert_eq!(event.name, "");
        assert_eq!(event.email, "a@example.com");
        assert_eq!(event.when.offset().local_minus_utc(), 5 * 3600 + 30 * 60);
    }

    #[test]
    fn test_parse_raw_event_too_few_tokens() {
        assert!(matches!(
            parse_raw_event("1690000000 +0000"),
            Err(ParseError::Identity { .. }) | Err(ParseError::Epoch { .. })
        ));
    }

    #[test]
    fn test_parse_zone_offset_rejects_garbage() {
        assert!(parse_zone_offset("0400").is_err());
        assert!(parse_zone_offset("+04").is_err());
        assert!(parse_zone_offset("~0400").is_err());
        assert!(parse_zone_offset("+9900").is_err());
    }
}
