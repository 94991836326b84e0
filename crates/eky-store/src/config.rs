//! Location of the backing file.
//!
//! The store lives in a single file directly under the user's home
//! directory:
//!
//! ```text
//! ~/
//! └── .eky.json
//! ```
//!
//! The path is not configurable through flags or environment variables.

use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

/// File name of the backing file under the home directory.
pub const STORE_FILE_NAME: &str = ".eky.json";

/// Get the current user's home directory.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(StoreError::HomeDirUnavailable)
}

/// Get the backing file path, `~/.eky.json`.
pub fn store_file() -> Result<PathBuf> {
    home_dir().map(|home| store_file_in(&home))
}

/// Get the backing file path under an arbitrary base directory.
pub fn store_file_in(base: &Path) -> PathBuf {
    base.join(STORE_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_file_name() {
        if let Ok(file) = store_file() {
            assert!(file.ends_with(".eky.json"));
        }
    }

    #[test]
    fn test_store_file_in_base() {
        let file = store_file_in(Path::new("/home/someone"));
        assert_eq!(file, PathBuf::from("/home/someone/.eky.json"));
    }
}
