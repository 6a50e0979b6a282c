//! Filesystem utilities for atomic config writes.
//!
//! A process killed mid-write must never leave the config file
//! half-written, so writes land in a temp sibling and are renamed over
//! the destination.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// Write `contents` to `path` atomically, creating parent directories as
/// needed (idempotent).
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
    }

    let temp_path = temp_sibling(path);
    fs::write(&temp_path, contents).map_err(|e| CoreError::io(&temp_path, e))?;
    rename_with_fallback(&temp_path, path).map_err(|e| CoreError::io(path, e))
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Rename a file over its destination, tolerating platforms where rename
/// fails if the target exists (notably Windows). The temp file is removed
/// if the rename ultimately fails.
fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}
