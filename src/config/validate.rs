//! Root validation.
//! Verifies the root folder exists, is a directory, and is readable and writable
//! before any pass runs. Failures here are fatal to the whole run.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::errors::TidyError;

/// Validate `root` and return its canonical form.
pub fn validate_root(root: &Path) -> Result<PathBuf> {
    let meta = match fs::metadata(root) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!("root does not exist: {}", root.display());
            return Err(TidyError::RootNotFound(root.to_path_buf()).into());
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(TidyError::PermissionDenied {
                path: root.to_path_buf(),
                context: e.to_string(),
            }
            .into());
        }
        Err(e) => return Err(e).with_context(|| format!("stat root '{}'", root.display())),
    };
    if !meta.is_dir() {
        error!("root is not a directory: {}", root.display());
        return Err(TidyError::RootNotDirectory(root.to_path_buf()).into());
    }

    fs::read_dir(root).with_context(|| {
        format!("Cannot read root directory '{}'; check permissions", root.display())
    })?;
    debug!("root readable: {}", root.display());

    is_writable_probe(root).map_err(|e| TidyError::PermissionDenied {
        path: root.to_path_buf(),
        context: format!("root is not writable: {e}"),
    })?;
    debug!("root writable: {}", root.display());

    let canonical = dunce::canonicalize(root)
        .with_context(|| format!("canonicalize root '{}'", root.display()))?;
    info!("Root validated: '{}'", canonical.display());
    Ok(canonical)
}

/// Quick writable probe: create and remove a small file in `dir`.
/// Uses create_new to avoid clobbering existing files.
fn is_writable_probe(dir: &Path) -> std::io::Result<()> {
    let probe = dir.join(format!(".course_tidy_probe_{}.tmp", std::process::id()));
    fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&probe)?;
    fs::remove_file(&probe)
}
