//! Removal of OS metadata folders left behind by archive tools.

use anyhow::Result;
use std::ffi::OsStr;
use std::path::Path;

use crate::config::OS_METADATA_DIR;
use crate::fs_ops::{dirs_bottom_up, remove_dir_if_present};
use crate::report::{Action, Report};

use super::check_shutdown;

/// Delete every `__MACOSX` folder below `root`, with its contents.
pub fn strip_os_metadata(root: &Path) -> Result<Report> {
    let mut report = Report::new();
    let targets: Vec<_> = dirs_bottom_up(root)
        .into_iter()
        .filter(|d| d.file_name() == Some(OsStr::new(OS_METADATA_DIR)))
        .collect();
    for dir in targets {
        check_shutdown()?;
        match remove_dir_if_present(&dir) {
            Ok(true) => report.record(Action::Deleted, &dir),
            Ok(false) => {}
            Err(e) => report.fail(&dir, &e),
        }
    }
    Ok(report)
}
