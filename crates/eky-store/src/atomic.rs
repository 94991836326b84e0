//! Atomic file operations for the backing file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{Result, StoreError};

/// Writes data to a file atomically.
///
/// The data goes to a temporary file in the target's directory first and is
/// then renamed over the target, so readers never see a half-written file.
/// A symlinked target is followed and the file it points at is replaced.
/// The replaced file keeps its permissions; new files are created `0644`.
///
/// # Errors
/// Returns an error if the directory, write, or rename step fails.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let target = resolve_target(path);

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Directory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let write_error = |source: io::Error| StoreError::Write {
        path: target.clone(),
        source,
    };

    // Same directory keeps the rename on one filesystem
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;

    temp_file.write_all(data).map_err(write_error)?;
    temp_file.flush().map_err(write_error)?;

    if let Some(permissions) = target_permissions(&target) {
        temp_file
            .as_file()
            .set_permissions(permissions)
            .map_err(write_error)?;
    }

    temp_file
        .persist(&target)
        .map_err(|e| write_error(e.error))?;

    Ok(())
}

/// Writes a value as compact JSON followed by a newline, atomically.
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_vec(value)?;
    json.push(b'\n');
    atomic_write(path, &json)
}

/// Reads a JSON value from a file.
///
/// Returns `None` when the file does not exist or holds only whitespace.
pub fn read_json_optional(path: &Path) -> Result<Option<Value>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if data.trim().is_empty() {
        tracing::debug!(path = %path.display(), "Backing file is empty");
        return Ok(None);
    }

    let value = serde_json::from_str(&data).map_err(|source| StoreError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(value))
}

/// Returns the file a write to `path` should replace.
///
/// Symlinks are followed, including dangling ones, so the link itself
/// survives the rename.
fn resolve_target(path: &Path) -> PathBuf {
    let is_symlink = fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if !is_symlink {
        return path.to_path_buf();
    }

    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    match fs::read_link(path) {
        Ok(link) if link.is_absolute() => link,
        Ok(link) => path.parent().unwrap_or(Path::new(".")).join(link),
        Err(_) => path.to_path_buf(),
    }
}

fn target_permissions(target: &Path) -> Option<fs::Permissions> {
    match fs::metadata(target) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => new_file_permissions(),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}
