// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for WmiLite

use colored::Colorize;
use rustyline::{error::ReadlineError, CompletionType, Config, EditMode, Editor};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use super::commands::OutputFormat;
use super::error::{CliError, CliResult};
use super::output::{ResultFormatter, ResultSet};
use super::reports::{memory_report, storage_report};
use wmilite::provider::memory::MemoryPlatform;
use wmilite::{InitOptions, Runtime, Session, SessionConfig};

/// Where and how to connect
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub fixture: PathBuf,
    pub namespace: String,
    pub batch_size: usize,
}

/// Runtime guard plus the session opened under it
struct Connection {
    session: Arc<Session>,
    runtime: Runtime,
}

/// Load the fixture, initialize the subsystem and open a session
fn connect(options: &ConnectOptions) -> CliResult<Connection> {
    if !options.fixture.exists() {
        return Err(CliError::FixtureNotFound(options.fixture.clone()));
    }

    let platform = MemoryPlatform::from_json_file(&options.fixture)?;
    let runtime = Runtime::initialize(Arc::new(platform), InitOptions::default())?;

    let config =
        SessionConfig::new(options.namespace.clone()).with_batch_size(options.batch_size);
    let session = Session::connect(&runtime, config)?;

    Ok(Connection { session, runtime })
}

/// Handle the query command (one-off query execution)
pub fn handle_query(
    options: ConnectOptions,
    query: String,
    format: OutputFormat,
    properties: Vec<String>,
) -> CliResult<()> {
    let connection = connect(&options)?;

    let result = connection.session.execute_query(&query)?;

    let mut iterator = result.begin();
    let rows = ResultSet::from_objects(iterator.by_ref(), &properties);
    println!("{}", ResultFormatter::format(&rows, format));

    if let Some(code) = iterator.fetch_error() {
        eprintln!(
            "{}",
            format!("Warning: enumeration stopped early ({})", code).yellow()
        );
    }
    Ok(())
}

/// Handle the shell (REPL) command
pub fn handle_shell(options: ConnectOptions) -> CliResult<()> {
    let connection = connect(&options)?;
    let session = &connection.session;

    println!("{}", "WmiLite".bold().green());
    println!("Type 'help' for commands, 'exit' or 'quit' to exit");
    println!("Multi-line queries supported - use ';' to terminate");
    println!("{}", format!("Connected to: {}", session.namespace_path()).cyan());

    let config = Config::builder()
        .edit_mode(EditMode::Emacs)
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .auto_add_history(false)
        .build();

    let mut rl = Editor::<(), _>::with_config(config)?;

    let history_path = ".wmilite/.wql_history.txt";
    if let Some(parent) = Path::new(&history_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let _ = rl.load_history(&history_path);

    let mut query_buffer = String::new();

    loop {
        let prompt = if query_buffer.is_empty() {
            format!("{}::wql> ", options.namespace.cyan())
        } else {
            format!("{}::...> ", options.namespace.cyan())
        };

        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                if !query_buffer.is_empty() {
                    query_buffer.clear();
                    println!("{}", "\nQuery buffer cleared".yellow());
                }
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let trimmed = line.trim();

        if query_buffer.is_empty() {
            match trimmed.to_lowercase().as_str() {
                "exit" | "quit" => {
                    println!("{}", "Goodbye!".green());
                    break;
                }
                "help" => {
                    print_help();
                    continue;
                }
                "clear" => {
                    print!("\x1B[2J\x1B[1;1H");
                    std::io::Write::flush(&mut std::io::stdout())?;
                    continue;
                }
                "" => continue,
                _ => {}
            }
        }

        query_buffer.push_str(&line);
        query_buffer.push('\n');

        if trimmed.ends_with(';') {
            let query = query_buffer.trim().to_string();
            rl.add_history_entry(&query)?;

            let statement = query.trim_end_matches(';').trim();
            match session.execute_query(statement) {
                Ok(result) => {
                    let rows = ResultSet::from_objects(&result, &[]);
                    println!("{}", ResultFormatter::format(&rows, OutputFormat::Table));
                }
                Err(e) => {
                    eprintln!("{}", format!("Error: {}", e).red());
                }
            }

            query_buffer.clear();
        }
    }

    let _ = rl.save_history(&history_path);

    Ok(())
}

/// Handle the memory command
pub fn handle_memory(options: ConnectOptions) -> CliResult<()> {
    let connection = connect(&options)?;
    print!("{}", memory_report(&connection.session)?);
    Ok(())
}

/// Handle the storage command
pub fn handle_storage(options: ConnectOptions) -> CliResult<()> {
    let connection = connect(&options)?;
    print!("{}", storage_report(&connection.session)?);
    Ok(())
}

/// Handle the report command: both reports, timed
///
/// A failing report is printed and the next one still runs.
pub fn handle_report(options: ConnectOptions) -> CliResult<()> {
    let start = Instant::now();
    let connection = connect(&options)?;

    if connection.runtime.is_initialized() {
        println!("Subsystem initialized by this process.");
    } else {
        println!("Subsystem was already initialized (using existing initialization).");
    }
    println!();
    println!("{}", format!("Connected to {}", connection.session.namespace_path()).green());
    println!();

    println!("{}", "Memory Information".bold());
    match memory_report(&connection.session) {
        Ok(text) => print!("{}", text),
        Err(e) => eprintln!("{}", format!("Memory query error: {}", e).red()),
    }
    println!();

    println!("{}", "Storage Information".bold());
    match storage_report(&connection.session) {
        Ok(text) => print!("{}", text),
        Err(e) => eprintln!("{}", format!("Storage query error: {}", e).red()),
    }
    println!();

    println!(
        "{}",
        format!(
            "All queries completed! ({} ms)",
            start.elapsed().as_millis()
        )
        .green()
    );
    Ok(())
}

/// Handle the version command
pub fn handle_version() {
    println!("{}", "WmiLite".bold().green());
    println!("  version: {}", env!("CARGO_PKG_VERSION"));
    println!("  license: {}", env!("CARGO_PKG_LICENSE"));
    println!(
        "  default batch size: {}",
        wmilite::BatchIterator::DEFAULT_BATCH_SIZE
    );
}

/// Print help message
fn print_help() {
    println!("{}", "Available commands:".bold().green());
    println!("  {}  - Show this help message", "help".cyan());
    println!("  {}  - Exit the WQL console", "exit/quit".cyan());
    println!("  {}  - Clear the screen", "clear".cyan());
    println!("\n{}", "Query syntax:".bold().green());
    println!("  Multi-line queries are supported");
    println!("  Terminate queries with semicolon (;)");
    println!("\n{}", "WQL examples:".bold().green());
    println!("  {}", "SELECT * FROM Win32_LogicalDisk;".yellow());
    println!("  {}", "SELECT Name, NumberOfCores FROM Win32_Processor;".yellow());
    println!(
        "  {}",
        "SELECT DeviceID FROM Win32_LogicalDisk WHERE DriveType = 3;".yellow()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(fixture: PathBuf) -> ConnectOptions {
        ConnectOptions {
            fixture,
            namespace: "cimv2".to_string(),
            batch_size: 10,
        }
    }

    #[test]
    fn test_missing_fixture_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = connect(&options(path.clone())).err().unwrap();
        assert!(matches!(&err, CliError::FixtureNotFound(p) if *p == path));
        assert!(err.to_string().starts_with("Fixture not found at"));
        assert!(err.to_string().ends_with("Pass --fixture <path to JSON snapshot>."));
    }

    #[test]
    fn test_library_errors_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = connect(&options(path)).err().unwrap();
        assert!(matches!(err, CliError::Library(_)));
    }
}
