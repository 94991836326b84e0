//! Command handlers for CLI subcommands.

use std::io::Write;
use std::path::Path;

use eky_store::{render, Store};
use tracing::debug;

use crate::cli::Commands;

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Load the store at `path` and execute a command against it.
///
/// Load failures abort before the command runs.
pub fn run<W: Write>(command: Commands, path: &Path, out: &mut W) -> Result<()> {
    let mut store = Store::open(path)?;
    execute(command, &mut store, out)
}

/// Execute a CLI command against a loaded store.
pub fn execute<W: Write>(command: Commands, store: &mut Store, out: &mut W) -> Result<()> {
    match command {
        Commands::Get { key } => cmd_get(store, &key, out),
        Commands::Set { key, value } => cmd_set(store, &key, &value),
        Commands::List => cmd_list(store, out),
        Commands::Rm { keys } => cmd_rm(store, &keys),
        Commands::Clear => cmd_clear(store),
    }
}

fn cmd_get<W: Write>(store: &Store, key: &str, out: &mut W) -> Result<()> {
    match store.get(key) {
        Some(value) => writeln!(out, "{}", render(value))?,
        // Absent keys print nothing and still succeed
        None => debug!(key = %key, "Key not found"),
    }
    Ok(())
}

fn cmd_set(store: &mut Store, key: &str, value: &str) -> Result<()> {
    store.set(key, value)?;
    Ok(())
}

fn cmd_list<W: Write>(store: &Store, out: &mut W) -> Result<()> {
    for key in store.list() {
        writeln!(out, "{}", key)?;
    }
    Ok(())
}

fn cmd_rm(store: &mut Store, keys: &[String]) -> Result<()> {
    let removed = store.remove(keys)?;
    debug!(removed, "Removed keys");
    Ok(())
}

fn cmd_clear(store: &mut Store) -> Result<()> {
    store.clear()?;
    Ok(())
}
