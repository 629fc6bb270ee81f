// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gitstream-tree: decoders for `git ls-tree` and `git ls-files` listings
//!
//! Both decoders shell out through the shared [`gitstream_log::Git`]
//! handle and stream one record per output line, with the same
//! end-of-stream and exit-status contract as the history iterator.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use gitstream_log::GitRepo;
//! use gitstream_tree::{LsTreeOptions, ls_tree};
//!
//! let repo = GitRepo::open(".").expect("open repo");
//! let entries = ls_tree(&repo, "HEAD", &LsTreeOptions::default().recurse())
//!     .expect("start git ls-tree");
//!
//! for entry in entries {
//!     let entry = entry.expect("decode entry");
//!     println!("{} {}", entry.hash, entry.path);
//! }
//! ```

pub mod error;
pub mod lsfiles;
pub mod lstree;

pub use error::TreeError;
pub use lsfiles::{FilesIterator, LsFilesOptions, ls_files};
pub use lstree::{LsTreeOptions, Mode, Object, TreeIterator, ls_tree};
