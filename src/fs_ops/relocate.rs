//! Bulk relocation of a folder's entries into another folder.
//!
//! Collisions are resolved overwrite-wins-incoming: the destination entry is
//! removed first (recursively for folders, never merged), then the source
//! entry is moved in. The source folder itself is left in place; deleting it is
//! the caller's explicit second step.

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::config::Taxonomy;
use crate::report::{Action, Report};
use crate::shutdown;

use super::atomic::move_entry;
use super::helpers::io_error_with_help;
use super::remove::remove_existing;

/// Move every entry of `src_dir` into `dest_dir`, skipping the ignored metadata
/// file. Returns the number of entries moved.
///
/// Fails before moving anything when an incoming entry would replace a folder
/// that contains `src_dir` itself.
pub fn relocate_contents(
    src_dir: &Path,
    dest_dir: &Path,
    taxonomy: &Taxonomy,
    report: &mut Report,
) -> Result<usize> {
    let mut entries: Vec<_> = fs::read_dir(src_dir)
        .map_err(io_error_with_help("list folder", src_dir))?
        .collect::<Result<_, _>>()
        .map_err(io_error_with_help("read entry in", src_dir))?;
    entries.sort_by_key(|e| e.file_name());
    entries.retain(|e| !taxonomy.is_ignored(&e.file_name()));

    for entry in &entries {
        let dst = dest_dir.join(entry.file_name());
        if src_dir.starts_with(&dst) {
            bail!(
                "'{}' would replace '{}', which contains the folder being emptied",
                entry.path().display(),
                dst.display()
            );
        }
    }

    let mut moved = 0;
    for entry in entries {
        if shutdown::is_requested() {
            bail!(crate::errors::TidyError::Interrupted);
        }
        let src = entry.path();
        let dst = dest_dir.join(entry.file_name());
        if fs::symlink_metadata(&dst).is_ok() {
            debug!(dest = %dst.display(), "destination exists; incoming entry wins");
            remove_existing(&dst)?;
        }
        move_entry(&src, &dst)?;
        report.record_move(Action::Moved, &src, &dst);
        moved += 1;
    }
    Ok(moved)
}
