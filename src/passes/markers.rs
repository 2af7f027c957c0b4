//! Marker-folder removal for trees whose deliverables live outside the
//! marker layout.

use anyhow::Result;
use std::path::Path;

use crate::config::Taxonomy;
use crate::fs_ops::{dirs_bottom_up, remove_dir_if_present};
use crate::report::{Action, Report};

use super::check_shutdown;

/// Delete every folder below `root` named like a marker category, at any
/// depth and with all its contents.
pub fn drop_markers(root: &Path, taxonomy: &Taxonomy) -> Result<Report> {
    let mut report = Report::new();
    let targets: Vec<_> = dirs_bottom_up(root)
        .into_iter()
        .filter(|d| d.file_name().is_some_and(|n| taxonomy.is_marker(n)))
        .collect();
    for dir in targets {
        check_shutdown()?;
        // A nested marker may already be gone with its outer one.
        match remove_dir_if_present(&dir) {
            Ok(true) => report.record(Action::Deleted, &dir),
            Ok(false) => {}
            Err(e) => report.fail(&dir, &e),
        }
    }
    Ok(report)
}
