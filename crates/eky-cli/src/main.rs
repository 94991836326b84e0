//! eky CLI entry point.

use std::io;
use std::process;

use tracing_subscriber::{fmt, EnvFilter};

use eky_cli::cli::parse_command;
use eky_cli::commands;
use eky_store::config;

fn main() {
    // Diagnostics go to stderr so stdout stays scriptable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let command = match parse_command(std::env::args_os()) {
        Ok(command) => command,
        Err((message, 0)) => {
            println!("{}", message);
            process::exit(0);
        }
        Err((message, code)) => {
            eprintln!("{}", message);
            process::exit(code);
        }
    };

    let path = match config::store_file() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = commands::run(command, &path, &mut io::stdout().lock()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
