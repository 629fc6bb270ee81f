// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gitstream: stream git history, blame and tree listings as records

use anyhow::Result;
use clap::Parser;
use gitstream_blame::BlameOptions;
use gitstream_log::{GitRepo, LogOptions, Scheme};
use gitstream_tree::{LsFilesOptions, LsTreeOptions, ls_files, ls_tree};
use serde::Serialize;
use tracing::debug;

use gitstream_cli::config::{Command, Config};

fn main() -> Result<()> {
    let config = Config::parse();

    // logs go to stderr; stdout carries the records
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let repo = GitRepo::open(&config.repo)?;
    debug!(repo = %repo.path().display(), "opened repository");

    match &config.command {
        Command::Log {
            stats,
            no_merges,
            first_parent,
            raw,
            order,
            path,
        } => {
            let options = LogOptions {
                scheme: if *raw { Scheme::Raw } else { Scheme::Tagged },
                stats: *stats,
                no_merges: *no_merges,
                first_parent: *first_parent,
                order: order.map(Into::into),
                path: path.clone(),
                ..LogOptions::default()
            };

            for commit in repo.log(&options)? {
                let commit = commit?;
                if config.json {
                    emit_json(&commit)?;
                } else {
                    println!("{} {}", commit.short_sha(), commit.subject());
                    for stat in &commit.stats {
                        let additions = stat
                            .additions
                            .map_or_else(|| "-".to_string(), |n| n.to_string());
                        let deletions = stat
                            .deletions
                            .map_or_else(|| "-".to_string(), |n| n.to_string());
                        println!("  {additions}\t{deletions}\t{}", stat.path);
                    }
                }
            }
        }
        Command::Blame { file, rev } => {
            let mut options = BlameOptions::default();
            if let Some(rev) = rev {
                options = options.revision(rev.clone());
            }
            for attribution in gitstream_blame::blame(&repo, file, &options)? {
                if config.json {
                    emit_json(&attribution)?;
                } else {
                    println!("{:>5} {}", attribution.final_line_no, attribution);
                }
            }
        }
        Command::LsTree { treeish, recurse } => {
            let options = LsTreeOptions { recurse: *recurse };
            for entry in ls_tree(&repo, treeish, &options)? {
                let entry = entry?;
                if config.json {
                    emit_json(&entry)?;
                } else {
                    println!("{entry}");
                }
            }
        }
        Command::LsFiles {
            pattern,
            no_empty_directory,
        } => {
            let options = LsFilesOptions {
                files: pattern.clone(),
                no_empty_directory: *no_empty_directory,
            };
            for path in ls_files(&repo, &options)? {
                let path = path?;
                if config.json {
                    emit_json(&path)?;
                } else {
                    println!("{path}");
                }
            }
        }
    }

    Ok(())
}

fn emit_json<T: Serialize>(record: &T) -> Result<()> {
    println!("{}", serde_json::to_string(record)?);
    Ok(())
}
