//! Unit tagging: append a fixed suffix to every unit folder name.

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::errors::TidyError;
use crate::fs_ops::{io_error_with_help, unit_folders};
use crate::report::{Action, Report};

use super::check_shutdown;

/// Rename `<root>/<unit>` to `<root>/<unit><suffix>`. Units already ending in
/// the suffix are left alone; an existing target is a per-item collision.
pub fn tag_units(root: &Path, suffix: &str) -> Result<Report> {
    let mut report = Report::new();
    if suffix.is_empty() {
        return Ok(report);
    }
    for unit in unit_folders(root)? {
        check_shutdown()?;
        let Some(name) = unit.file_name().and_then(|n| n.to_str()) else {
            report.skip(&unit, "folder name is not valid UTF-8");
            continue;
        };
        if name.ends_with(suffix) {
            continue;
        }
        let dest = root.join(format!("{name}{suffix}"));
        if fs::symlink_metadata(&dest).is_ok() {
            let collision = TidyError::RenameCollision { src: unit.clone(), dest };
            report.refuse(&unit, collision.to_string());
            continue;
        }
        match fs::rename(&unit, &dest) {
            Ok(()) => report.record_move(Action::Renamed, &unit, &dest),
            Err(e) => report.fail(&unit, &io_error_with_help("rename folder", &unit)(e)),
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn suffix_is_applied_once() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("Biology").create_dir_all().unwrap();
        dir.child("Chemistry-CT").create_dir_all().unwrap();
        let first = tag_units(dir.path(), "-CT").unwrap();
        assert_eq!(first.count(Action::Renamed), 1);
        assert!(dir.path().join("Biology-CT").is_dir());
        let second = tag_units(dir.path(), "-CT").unwrap();
        assert!(second.is_empty());
    }
}
