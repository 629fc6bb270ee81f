// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gitstream-blame: decoder for `git blame --line-porcelain` output
//!
//! Shells out to `git blame` and decodes the line-porcelain stream into
//! one [`Blame`] record per attributed line. Author and committer reuse
//! the [`gitstream_log::Event`] type; the porcelain splits the epoch and
//! zone across two lines and they are reassembled here with the original
//! offset intact.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use gitstream_blame::{BlameOptions, blame};
//! use gitstream_log::GitRepo;
//!
//! let repo = GitRepo::open(".").expect("open repo");
//! let result = blame(&repo, "src/lib.rs", &BlameOptions::default()).expect("blame");
//!
//! for attribution in &result {
//!     println!("{}: {}", attribution.final_line_no, attribution.sha);
//! }
//! ```

pub mod blame;
pub mod error;
pub mod porcelain;

pub use blame::{Blame, BlameOptions};
pub use error::BlameError;
pub use porcelain::{blame, parse_line_porcelain};
