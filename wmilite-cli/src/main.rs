// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! WmiLite command-line entry point

mod cli;

use clap::Parser;
use cli::{Cli, CliResult, Commands, ConnectOptions};
use colored::Colorize;

fn main() {
    let cli = Cli::parse();

    let level = match (cli.log_level, cli.verbose) {
        (Some(level), _) => level.to_level_filter(),
        (None, true) => log::LevelFilter::Debug,
        (None, false) => log::LevelFilter::Warn,
    };
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .init();

    let options = ConnectOptions {
        fixture: cli.fixture,
        namespace: cli.namespace,
        batch_size: cli.batch_size,
    };

    let result: CliResult<()> = match cli.command {
        Commands::Version => {
            cli::handle_version();
            Ok(())
        }
        Commands::Query {
            query,
            format,
            properties,
        } => cli::handle_query(options, query, format, properties),
        Commands::Shell => cli::handle_shell(options),
        Commands::Memory => cli::handle_memory(options),
        Commands::Storage => cli::handle_storage(options),
        Commands::Report => cli::handle_report(options),
    };

    if let Err(e) = result {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}
