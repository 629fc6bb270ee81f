// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Format spec construction for `git log`
//!
//! The tagged scheme asks git for a custom `--format=` template in which
//! every field sits on its own line behind a reserved sentinel tag, and the
//! free-form message body is closed by a NUL byte — a byte git never emits
//! inside decoded text. The raw scheme selects git's own structured dump
//! (`--pretty=raw`). The template built here is a byte-exact contract with
//! the parser; the two must never drift apart, which is why the tags live
//! in shared constants.

/// Sentinel tag opening a new record: the commit SHA line
pub(crate) const COMMIT_TAG: &str = "_H:";
/// Tree SHA line tag
pub(crate) const TREE_TAG: &str = "_T:";
/// Parent SHAs line tag (space-separated, empty for root commits)
pub(crate) const PARENTS_TAG: &str = "_P:";
/// Author name line tag
pub(crate) const AUTHOR_NAME_TAG: &str = "_aN:";
/// Author email line tag
pub(crate) const AUTHOR_EMAIL_TAG: &str = "_aE:";
/// Author date line tag (strict ISO 8601)
pub(crate) const AUTHOR_DATE_TAG: &str = "_aI:";
/// Committer name line tag
pub(crate) const COMMITTER_NAME_TAG: &str = "_cN:";
/// Committer email line tag
pub(crate) const COMMITTER_EMAIL_TAG: &str = "_cE:";
/// Committer date line tag (strict ISO 8601)
pub(crate) const COMMITTER_DATE_TAG: &str = "_cI:";
/// Message body line tag; the body runs until the terminator byte
pub(crate) const BODY_TAG: &str = "_B:";
/// Reserved control byte closing the message body
pub(crate) const BODY_TERMINATOR: char = '\0';

/// Which output scheme the decoder speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    /// Custom placeholder-tagged `--format=` template with a NUL body
    /// terminator. Robust against message lines that resemble field
    /// lines.
    #[default]
    Tagged,
    /// git's native structured dump (`--pretty=raw`): fixed field
    /// keywords, four-column body indent, one-space signature indent.
    Raw,
}

/// Build the literal format template requested from git for the tagged
/// scheme. Each placeholder expands on its own line behind its tag; the
/// body is closed by `%x00`.
#[must_use]
pub fn tagged_template() -> String {
    let mut t = String::new();
    t.push_str(COMMIT_TAG);
    t.push_str("%H%n");
    t.push_str(TREE_TAG);
    t.push_str("%T%n");
    t.push_str(PARENTS_TAG);
    t.push_str("%P%n");

    t.push_str(AUTHOR_NAME_TAG);
    t.push_str("%aN%n");
    t.push_str(AUTHOR_EMAIL_TAG);
    t.push_str("%aE%n");
    t.push_str(AUTHOR_DATE_TAG);
    t.push_str("%aI%n");

    t.push_str(COMMITTER_NAME_TAG);
    t.push_str("%cN%n");
    t.push_str(COMMITTER_EMAIL_TAG);
    t.push_str("%cE%n");
    t.push_str(COMMITTER_DATE_TAG);
    t.push_str("%cI%n");

    t.push_str(BODY_TAG);
    t.push_str("%B%n%x00");

    t
}

/// The `git log` argument selecting the given scheme's output format.
#[must_use]
pub fn format_arg(scheme: Scheme) -> String {
    match scheme {
        Scheme::Tagged => format!("--format={}", tagged_template()),
        Scheme::Raw => "--pretty=raw".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_tagged_template_exact_bytes() {
        assert_eq!(
            tagged_template(),
            "_H:%H%n_T:%T%n_P:%P%n\
             _aN:%aN%n_aE:%aE%n_aI:%aI%n\
             _cN:%cN%n_cE:%cE%n_cI:%cI%n\
             _B:%B%n%x00"
        );
    }

    #[test]
    fn test_format_arg_tagged() {
        let arg = format_arg(Scheme::Tagged);
        assert!(arg.starts_with("--format=_H:%H%n"));
        assert!(arg.ends_with("%B%n%x00"));
    }

    #[test]
    fn test_format_arg_raw() {
        assert_eq!(format_arg(Scheme::Raw), "--pretty=raw");
    }

    #[test]
    fn test_default_scheme_is_tagged() {
        assert_eq!(Scheme::default(), Scheme::Tagged);
    }
}
