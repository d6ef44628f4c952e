// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for WmiLite
//!
//! Provides one-off query execution, an interactive WQL console (REPL)
//! and the memory/storage reports.

pub mod commands;
pub mod error;
pub mod handlers;
pub mod output;
pub mod reports;

pub use commands::{Cli, Commands};
pub use error::CliResult;
pub use handlers::{
    handle_memory, handle_query, handle_report, handle_shell, handle_storage, handle_version,
    ConnectOptions,
};
