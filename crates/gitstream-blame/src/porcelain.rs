// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Decoder for `git blame --line-porcelain` output
//!
//! The porcelain repeats a full header block for every attributed line: a
//! `<sha> <original> <final> [<group>]` header, `author-*`/`committer-*`
//! fields with the epoch and zone split across two lines, assorted
//! metadata, and finally the line content behind a tab. A new header line
//! closes the previous record — the same one-line-lookahead shape as the
//! history decoder, with the whole result collected rather than streamed.

use crate::blame::{Blame, BlameOptions};
use crate::error::BlameError;
use gitstream_log::error::ParseError;
use gitstream_log::lines::{DEFAULT_MAX_LINE_BYTES, LineReader};
use gitstream_log::parser::parse_zone_offset;
use gitstream_log::GitRepo;
use chrono::{DateTime, FixedOffset};
use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use tracing::debug;

const AUTHOR: &str = "author ";
const AUTHOR_MAIL: &str = "author-mail ";
const AUTHOR_TIME: &str = "author-time ";
const AUTHOR_TZ: &str = "author-tz ";
const COMMITTER: &str = "committer ";
const COMMITTER_MAIL: &str = "committer-mail ";
const COMMITTER_TIME: &str = "committer-time ";
const COMMITTER_TZ: &str = "committer-tz ";
const SUMMARY: &str = "summary ";
const BOUNDARY: &str = "boundary";
const PREVIOUS: &str = "previous ";
const FILENAME: &str = "filename ";
const LINE_PREFIX: &str = "\t";

/// Decode `git blame --line-porcelain` output into per-line attributions.
///
/// # Errors
///
/// Fails on transport errors, malformed header lines, and malformed
/// epoch/offset fields.
pub fn parse_line_porcelain<R: BufRead>(
    reader: R,
    max_line_bytes: usize,
) -> Result<Vec<Blame>, BlameError> {
    let mut lines = LineReader::with_max_line_bytes(reader, max_line_bytes);
    let mut result = Vec::new();
    let mut current: Option<Blame> = None;

    while let Some(line) = lines.next_line()? {
        apply_line(&line, &mut current, &mut result)?;
    }
    if let Some(blame) = current {
        result.push(blame);
    }
    Ok(result)
}

fn apply_line(
    line: &str,
    current: &mut Option<Blame>,
    result: &mut Vec<Blame>,
) -> Result<(), BlameError> {
    if let Some(opened) = parse_header(line)? {
        if let Some(finished) = current.replace(opened) {
            result.push(finished);
        }
        return Ok(());
    }
    let Some(blame) = current.as_mut() else {
        // nothing open yet; preamble is ignored
        return Ok(());
    };

    if let Some(rest) = line.strip_prefix(AUTHOR) {
        blame.author.name = rest.to_string();
    } else if let Some(rest) = line.strip_prefix(AUTHOR_MAIL) {
        blame.author.email = rest.trim_matches(['<', '>']).to_string();
    } else if let Some(rest) = line.strip_prefix(AUTHOR_TIME) {
        blame.author.when = parse_epoch(rest)?;
    } else if let Some(rest) = line.strip_prefix(AUTHOR_TZ) {
        // the zone arrives on its own line after the epoch; shift the
        // already-parsed instant into it
        let offset = parse_zone_offset(rest)?;
        blame.author.when = blame.author.when.with_timezone(&offset);
    } else if let Some(rest) = line.strip_prefix(COMMITTER_MAIL) {
        blame.committer.email = rest.trim_matches(['<', '>']).to_string();
    } else if let Some(rest) = line.strip_prefix(COMMITTER_TIME) {
        blame.committer.when = parse_epoch(rest)?;
    } else if let Some(rest) = line.strip_prefix(COMMITTER_TZ) {
        let offset = parse_zone_offset(rest)?;
        blame.committer.when = blame.committer.when.with_timezone(&offset);
    } else if let Some(rest) = line.strip_prefix(COMMITTER) {
        blame.committer.name = rest.to_string();
    } else if let Some(rest) = line.strip_prefix(SUMMARY) {
        blame.summary = rest.to_string();
    } else if line.starts_with(BOUNDARY) {
        blame.boundary = true;
    } else if let Some(rest) = line.strip_prefix(PREVIOUS) {
        blame.previous = Some(rest.to_string());
    } else if let Some(rest) = line.strip_prefix(FILENAME) {
        blame.filename = rest.to_string();
    } else if let Some(rest) = line.strip_prefix(LINE_PREFIX) {
        blame.line = rest.to_string();
    }
    // anything else: unrecognized porcelain field, ignored
    Ok(())
}

/// A header line starts with a 40-character token followed by line
/// numbers. Anything else is not a header.
fn parse_header(line: &str) -> Result<Option<Blame>, BlameError> {
    let mut tokens = line.split(' ');
    let Some(sha) = tokens.next() else {
        return Ok(None);
    };
    if sha.len() != 40 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return Ok(None);
    }
    let header_err = || BlameError::Header {
        value: line.to_string(),
    };

    let original_line_no: usize = tokens
        .next()
        .ok_or_else(header_err)?
        .parse()
        .map_err(|_| header_err())?;
    let final_line_no: usize = tokens
        .next()
        .ok_or_else(header_err)?
        .parse()
        .map_err(|_| header_err())?;
    let lines_in_group: usize = match tokens.next() {
        Some(token) => token.parse().map_err(|_| header_err())?,
        None => 0,
    };

    Ok(Some(Blame::open(
        sha.to_string(),
        original_line_no,
        final_line_no,
        lines_in_group,
    )))
}

fn parse_epoch(value: &str) -> Result<DateTime<FixedOffset>, BlameError> {
    let epoch: i64 = value.parse().map_err(|_| {
        BlameError::Parse(ParseError::Epoch {
            value: value.to_string(),
        })
    })?;
    let when = DateTime::from_timestamp(epoch, 0).ok_or_else(|| {
        BlameError::Parse(ParseError::Epoch {
            value: value.to_string(),
        })
    })?;
    Ok(when.fixed_offset())
}

pub(crate) fn build_args(file_path: &str, options: &BlameOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["blame".into(), "--line-porcelain".into()];
    if let Some(revision) = &options.revision {
        args.push(revision.as_str().into());
    }
    args.push("--".into());
    args.push(file_path.into());
    args
}

/// Run `git blame --line-porcelain` on one file and decode the result.
///
/// The whole output is decoded before the exit status is checked, so a
/// failing run surfaces git's stderr instead of a half-parsed result.
///
/// # Errors
///
/// Fails on spawn, transport, format, and non-zero-exit conditions.
pub fn blame(
    repo: &GitRepo,
    file_path: &str,
    options: &BlameOptions,
) -> Result<Vec<Blame>, BlameError> {
    let args = build_args(file_path, options);
    let mut child = repo
        .git()
        .spawn(repo.path(), &args)
        .map_err(|source| BlameError::Spawn {
            program: repo.git().program().display().to_string(),
            source,
        })?;
    let Some(stdout) = child.stdout.take() else {
        return Err(BlameError::Spawn {
            program: repo.git().program().display().to_string(),
            source: std::io::Error::other("stdout was not piped"),
        });
    };

    let max_line_bytes = options.max_line_bytes.unwrap_or(DEFAULT_MAX_LINE_BYTES);
    let parsed = parse_line_porcelain(BufReader::new(stdout), max_line_bytes);

    let mut stderr = String::new();
    if let Some(mut pipe) = child.stderr.take() {
        let _ = pipe.read_to_string(&mut stderr);
    }
    let status = child.wait()?;

    let result = parsed?;
    if !status.success() {
        return Err(BlameError::Process {
            code: status.code(),
            stderr: stderr.trim().to_string(),
        });
    }
    debug!(lines = result.len(), "decoded blame");
    Ok(result)
}
