//! eky CLI library.
//!
//! Argument parsing and subcommand handlers for the `eky` binary. Handlers
//! write to any `io::Write` sink so they can be exercised without a
//! terminal.

pub mod cli;
pub mod commands;
