//! Command-line interface definition using clap.

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

/// Printed when the subcommand is missing or unknown.
pub const USAGE_HINT: &str =
    "Please specify a subcommand: `get`, `set`, `list`, `rm` or `clear`.";

/// `<pkg version> (<git hash>, <build date>)`, filled in by build.rs.
const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", ",
    env!("BUILD_DATE"),
    ")"
);

/// eky - a tiny JSON key-value store in your home directory
#[derive(Parser, Debug)]
#[command(name = "eky")]
#[command(author, version = VERSION, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Print the value stored under a key
    Get {
        /// Attribute name
        key: String,
    },

    /// Store a value under a key (parsed as JSON, otherwise kept as text)
    Set {
        /// Attribute name
        key: String,

        /// Value to store
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// List all keys, one per line
    List,

    /// Remove one or more keys
    Rm {
        /// Attribute names
        #[arg(required = true, num_args = 1..)]
        keys: Vec<String>,
    },

    /// Remove every key
    Clear,
}

/// Parses process arguments into a subcommand.
///
/// On failure returns the message to print and the exit code: `0` for
/// `--help`/`--version` (printed to stdout), `1` for everything else.
pub fn parse_command<I, T>(args: I) -> Result<Commands, (String, i32)>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(Cli {
            command: Some(command),
        }) => Ok(command),
        Ok(Cli { command: None }) => Err((USAGE_HINT.to_string(), 1)),
        Err(e) => Err(parse_failure(&e)),
    }
}

/// Turns a clap error into the message to print and the exit code.
pub fn parse_failure(err: &clap::Error) -> (String, i32) {
    let rendered = err.render().to_string();
    let rendered = rendered.trim_end();

    if !err.use_stderr() {
        return (rendered.to_string(), 0);
    }
    match err.kind() {
        ErrorKind::InvalidSubcommand => (format!("{}\n{}", rendered, USAGE_HINT), 1),
        _ => (rendered.to_string(), 1),
    }
}
