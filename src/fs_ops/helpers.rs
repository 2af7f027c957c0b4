//! I/O helper utilities.
//!
//! Enriches io::Error with the operation, the path and a platform hint.
//!
//! Usage:
//!   fs::remove_dir_all(dir).map_err(io_error_with_help("remove folder", dir))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

/// Hint for a raw OS error code, if we know a useful one.
#[cfg(unix)]
fn os_hint(code: i32) -> Option<&'static str> {
    Some(match code {
        libc::EACCES | libc::EPERM => "permission denied; check ownership and write permissions",
        libc::EXDEV => "cross-filesystem; atomic rename not possible",
        libc::EBUSY => "resource busy; is another program holding the file open?",
        libc::ENOENT => "path not found; it may have been moved by an earlier step",
        libc::EEXIST => "already exists",
        libc::ENOTEMPTY => "directory not empty",
        libc::ENOSPC => "insufficient space on device",
        libc::EROFS => "read-only filesystem; cannot write here",
        libc::ELOOP => "too many symbolic link levels; possible symlink cycle",
        libc::ENAMETOOLONG => "filename or path too long; shorten the page title or folder names",
        libc::EMFILE => "process file descriptor limit reached",
        _ => return None,
    })
}

#[cfg(windows)]
fn os_hint(code: i32) -> Option<&'static str> {
    Some(match code {
        5 => "access denied; check permissions",        // ERROR_ACCESS_DENIED
        17 => "not same device; cross-filesystem move", // ERROR_NOT_SAME_DEVICE
        32 => "sharing violation; file is in use",      // ERROR_SHARING_VIOLATION
        2 | 3 => "path not found",                      // FILE/PATH NOT FOUND
        80 | 183 => "already exists",                   // ERROR_FILE_EXISTS / ALREADY_EXISTS
        145 => "directory not empty",                   // ERROR_DIR_NOT_EMPTY
        206 => "filename or path too long",             // ERROR_FILENAME_EXCED_RANGE
        _ => return None,
    })
}

fn kind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found; it may have been moved by an earlier step"),
        io::ErrorKind::AlreadyExists => Some("already exists"),
        _ => None,
    }
}

/// Format a human-friendly message with op/path plus platform-aware hints.
fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    match e.raw_os_error() {
        Some(code) => {
            if let Some(h) = os_hint(code) {
                msg.push_str("; ");
                msg.push_str(h);
            }
            msg.push_str(&format!(" [os code: {code}]"));
        }
        None => {
            if let Some(h) = kind_hint(e.kind()) {
                msg.push_str("; ");
                msg.push_str(h);
            }
        }
    }
    msg
}

/// Adapter for anyhow::Result code.
/// Returns a closure suitable for `.map_err(...)` that converts io::Error -> anyhow::Error.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}
