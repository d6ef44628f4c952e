// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error type for CLI command handlers

use rustyline::error::ReadlineError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Fixture not found at {0:?}. Pass --fixture <path to JSON snapshot>.")]
    FixtureNotFound(PathBuf),

    #[error(transparent)]
    Library(#[from] wmilite::Error),

    #[error("Console error: {0}")]
    Readline(#[from] ReadlineError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CliResult<T> = std::result::Result<T, CliError>;
