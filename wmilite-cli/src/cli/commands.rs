// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command definitions for WmiLite

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only errors
    Error,
    /// Warnings and errors
    Warn,
    /// Info, warnings, and errors
    Info,
    /// Debug messages and above (verbose)
    Debug,
    /// All messages including trace (very verbose)
    Trace,
    /// Disable all logging
    Off,
}

impl LogLevel {
    /// Convert to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// WmiLite CLI - management queries from the command line
#[derive(Parser)]
#[command(name = "wmilite")]
#[command(about = "WmiLite - Lazy, type-safe WQL queries against a management provider")]
#[command(version)]
pub struct Cli {
    /// JSON snapshot of the management store to query
    #[arg(
        short = 'f',
        long = "fixture",
        global = true,
        default_value = "fixtures/sample_host.json"
    )]
    pub fixture: PathBuf,

    /// Namespace to connect to
    #[arg(short = 'n', long = "namespace", global = true, default_value = "cimv2")]
    pub namespace: String,

    /// Records requested per fetch
    #[arg(short = 'b', long = "batch-size", global = true, default_value_t = 10)]
    pub batch_size: usize,

    /// Set log level (error, warn, info, debug, trace, off)
    #[arg(short = 'l', long = "log-level", global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Verbose mode (equivalent to --log-level debug)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show detailed version information
    Version,

    /// Execute a WQL query
    Query {
        /// The WQL query to execute
        query: String,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        format: OutputFormat,

        /// Comma-separated columns to show (default: every returned property)
        #[arg(short, long, value_delimiter = ',')]
        properties: Vec<String>,
    },

    /// Interactive WQL console (REPL)
    Shell,

    /// Operating system memory totals and installed memory modules
    Memory,

    /// Logical and physical disks
    Storage,

    /// Memory and storage reports with elapsed time
    Report,
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}
