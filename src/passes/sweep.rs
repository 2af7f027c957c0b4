//! Empty-folder sweep.

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::fs_ops::{dirs_bottom_up, io_error_with_help};
use crate::report::{Action, Report};

use super::check_shutdown;

/// Delete every folder below `root` that has no entries at all, deepest first,
/// so a parent emptied by this pass goes in the same run. The root itself is
/// never removed. A folder holding only the metadata file is not empty.
pub fn sweep_empty(root: &Path) -> Result<Report> {
    let mut report = Report::new();
    for dir in dirs_bottom_up(root) {
        check_shutdown()?;
        let empty = match fs::read_dir(&dir) {
            Ok(mut entries) => entries.next().is_none(),
            Err(e) => {
                report.fail(&dir, &io_error_with_help("list folder", &dir)(e));
                continue;
            }
        };
        if !empty {
            continue;
        }
        match fs::remove_dir(&dir) {
            Ok(()) => report.record(Action::Deleted, &dir),
            Err(e) => report.fail(&dir, &io_error_with_help("remove empty folder", &dir)(e)),
        }
    }
    Ok(report)
}
