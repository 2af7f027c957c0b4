//! Passes for deliveries from the CrawfordTech vendor: log screenshots,
//! quote folders, and due-date wrappers around unit content.

use anyhow::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::info;

use crate::config::{Taxonomy, DUE_FOLDER_PATTERN, LOG_IMAGE_SUFFIX, QUOTE_FOLDER_PATTERN};
use crate::fs_ops::{
    dirs_bottom_up, files_matching, io_error_with_help, relocate_contents, remove_dir_if_present,
    subdirs, unit_folders,
};
use crate::report::{Action, Report};

use super::{check_shutdown, is_interrupted};

static QUOTE_FOLDER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(QUOTE_FOLDER_PATTERN).ok());
static DUE_FOLDER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(DUE_FOLDER_PATTERN).ok());

fn name_matches(path: &Path, re: &Regex) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| re.is_match(n))
}

/// Delete every file whose name ends in `LOG.png` (case-sensitive), anywhere
/// under `root`.
pub fn drop_log_images(root: &Path) -> Result<Report> {
    let mut report = Report::new();
    let files = files_matching(root, |p| {
        p.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(LOG_IMAGE_SUFFIX))
    });
    for file in files {
        check_shutdown()?;
        match fs::remove_file(&file) {
            Ok(()) => report.record(Action::Deleted, &file),
            Err(e) => report.fail(&file, &io_error_with_help("remove file", &file)(e)),
        }
    }
    Ok(report)
}

/// Delete every folder named exactly `Quote #<digits>`, deepest first.
pub fn drop_quote_folders(root: &Path) -> Result<Report> {
    let mut report = Report::new();
    let Some(re) = QUOTE_FOLDER.as_ref() else {
        return Ok(report);
    };
    let targets: Vec<_> = dirs_bottom_up(root)
        .into_iter()
        .filter(|d| name_matches(d, re))
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

/// For every unit, move the contents of each child folder whose name has
/// `Due` as a whole word (`Due 2023-05-01`, `Math - Due Friday`) up into the
/// unit, incoming entries winning, then delete the emptied folder.
pub fn flatten_due_folders(root: &Path, taxonomy: &Taxonomy) -> Result<Report> {
    let mut report = Report::new();
    let Some(re) = DUE_FOLDER.as_ref() else {
        return Ok(report);
    };
    for unit in unit_folders(root)? {
        let due_folders = match subdirs(&unit) {
            Ok(dirs) => dirs.into_iter().filter(|d| name_matches(d, re)).collect::<Vec<_>>(),
            Err(e) => {
                report.fail(&unit, &e);
                continue;
            }
        };
        for due in due_folders {
            check_shutdown()?;
            info!(src = %due.display(), dest = %unit.display(), "flattening due-date folder");
            if let Err(e) = relocate_contents(&due, &unit, taxonomy, &mut report) {
                if is_interrupted(&e) {
                    return Err(e);
                }
                report.fail(&due, &e);
                continue;
            }
            match remove_dir_if_present(&due) {
                Ok(true) => report.record(Action::Deleted, &due),
                Ok(false) => {}
                Err(e) => report.fail(&due, &e),
            }
        }
    }
    Ok(report)
}
