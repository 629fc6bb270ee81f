// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gitstream-cli library
//!
//! Exports the command-line configuration for use in integration tests.

pub mod config;
