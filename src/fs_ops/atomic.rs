//! Single-entry move.
//! - Tries an atomic rename first.
//! - On a cross-filesystem error, copies the entry (file, link or whole folder) and
//!   removes the source afterwards.
//! - Unix: best-effort fsync of the destination directory after a rename.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;

use super::helpers::io_error_with_help;

fn is_cross_device(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::CrossesDevices
}

#[cfg(unix)]
fn fsync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

/// Move `src` to `dst`. `dst` must not exist.
pub fn move_entry(src: &Path, dst: &Path) -> Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => {
            if let Some(parent) = dst.parent() {
                let _ = fsync_dir(parent);
            }
            Ok(())
        }
        Err(e) if is_cross_device(&e) => {
            warn!(src = %src.display(), dest = %dst.display(), "rename crosses filesystems; copying instead");
            copy_then_remove(src, dst)
        }
        Err(e) => Err(io_error_with_help("rename", src)(e))
            .with_context(|| format!("move '{}' -> '{}'", src.display(), dst.display())),
    }
}

/// Recreate the link at `src` as `dst`, pointing at the same target.
#[cfg(unix)]
fn copy_link(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(src)?, dst)
}

#[cfg(windows)]
fn copy_link(src: &Path, dst: &Path) -> io::Result<()> {
    let target = fs::read_link(src)?;
    if fs::metadata(src).is_ok_and(|m| m.is_dir()) {
        std::os::windows::fs::symlink_dir(target, dst)
    } else {
        std::os::windows::fs::symlink_file(target, dst)
    }
}

/// Links are recreated rather than followed, matching what a rename does.
fn copy_then_remove(src: &Path, dst: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(src).map_err(io_error_with_help("stat", src))?;
    if meta.file_type().is_symlink() {
        copy_link(src, dst).map_err(io_error_with_help("recreate link at destination", dst))?;
        fs::remove_file(src).map_err(io_error_with_help("remove original link", src))?;
        return Ok(());
    }
    if !meta.is_dir() {
        fs::copy(src, dst).map_err(io_error_with_help("copy file to destination", dst))?;
        fs::remove_file(src).map_err(io_error_with_help("remove original file", src))?;
        return Ok(());
    }

    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walk '{}'", src.display()))?;
        let rel = entry.path().strip_prefix(src)?;
        let target = dst.join(rel);
        if entry.file_type().is_symlink() {
            copy_link(entry.path(), &target).map_err(io_error_with_help("recreate link at destination", &target))?;
        } else if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_error_with_help("create folder", &target))?;
        } else {
            fs::copy(entry.path(), &target)
                .map_err(io_error_with_help("copy file to destination", &target))?;
        }
    }
    fs::remove_dir_all(src).map_err(io_error_with_help("remove source folder", src))
}
