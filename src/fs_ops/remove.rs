//! Deletion helpers. Kept separate from the move helpers so that "move the
//! contents" and "delete the emptied source" are always two visible steps.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::Path;

use super::helpers::io_error_with_help;

/// Recursively delete `dir` if it exists. Returns whether anything was removed.
pub fn remove_dir_if_present(dir: &Path) -> Result<bool> {
    match fs::symlink_metadata(dir) {
        Ok(m) if m.is_dir() => {
            fs::remove_dir_all(dir).map_err(io_error_with_help("remove folder", dir))?;
            Ok(true)
        }
        Ok(_) => Ok(false),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_error_with_help("stat folder", dir)(e)),
    }
}

/// Remove whatever sits at `path`: a folder recursively, anything else as a file.
/// Symlinks are removed, never followed.
pub fn remove_existing(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path).map_err(io_error_with_help("stat", path))?;
    if meta.is_dir() {
        fs::remove_dir_all(path).map_err(io_error_with_help("remove existing folder", path))
    } else {
        fs::remove_file(path).map_err(io_error_with_help("remove existing file", path))
    }
}
