//! Irrelevance pruning: delete unit folders that never reached a finished state.

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::config::{PruneOrder, Taxonomy};
use crate::fs_ops::{holds_files, io_error_with_help, remove_dir_if_present, unit_folders};
use crate::report::{Action, Report};

use super::check_shutdown;

/// Whether `unit` is worth keeping under the given prune placement.
///
/// A unit with any completed folder is always kept. Otherwise:
/// - before promotion, a unit that still carries a marker folder is
///   unfinished; one with no marker folder at all is kept only if it holds
///   payload. Such a unit looks exactly like one a previous run already
///   promoted, so loose files like `Stray/notes.pdf` keep their unit;
/// - after promotion, a unit is kept when any non-marker entry holds payload,
///   which is what promotion leaves behind.
pub fn is_relevant(unit: &Path, taxonomy: &Taxonomy, order: PruneOrder) -> Result<bool> {
    if taxonomy.completed_paths(unit).iter().any(|(_, p)| p.is_dir()) {
        return Ok(true);
    }

    let mut has_marker = false;
    let mut payload_outside_markers = false;
    for entry in fs::read_dir(unit).map_err(io_error_with_help("list folder", unit))? {
        let entry = entry.map_err(io_error_with_help("read entry in", unit))?;
        let name = entry.file_name();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir && taxonomy.is_marker(&name) {
            has_marker = true;
        } else if taxonomy.is_ignored(&name) {
            continue;
        } else if !is_dir || holds_files(&entry.path(), taxonomy) {
            payload_outside_markers = true;
        }
    }

    Ok(match order {
        PruneOrder::BeforePromotion => !has_marker && payload_outside_markers,
        PruneOrder::AfterPromotion => payload_outside_markers,
        PruneOrder::Never => true,
    })
}

/// Remove every irrelevant unit folder under `root`.
pub fn prune_irrelevant(root: &Path, taxonomy: &Taxonomy, order: PruneOrder) -> Result<Report> {
    let mut report = Report::new();
    if order == PruneOrder::Never {
        debug!("pruning disabled");
        return Ok(report);
    }
    for unit in unit_folders(root)? {
        check_shutdown()?;
        match is_relevant(&unit, taxonomy, order) {
            Ok(true) => continue,
            Ok(false) => {}
            Err(e) => {
                report.fail(&unit, &e);
                continue;
            }
        }
        info!("No completed folder in '{}'; removing it", unit.display());
        match remove_dir_if_present(&unit) {
            Ok(true) => report.record(Action::Pruned, &unit),
            Ok(false) => {}
            Err(e) => report.fail(&unit, &e),
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn unfinished_marker_layout_is_irrelevant_in_both_orders() {
        let tax = Taxonomy::default();
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("U/Magnification/In Progress/x.html").touch().unwrap();
        let unit = dir.path().join("U");
        assert!(!is_relevant(&unit, &tax, PruneOrder::BeforePromotion).unwrap());
        assert!(!is_relevant(&unit, &tax, PruneOrder::AfterPromotion).unwrap());
        assert!(is_relevant(&unit, &tax, PruneOrder::Never).unwrap());
    }

    #[test]
    fn promoted_unit_stays_relevant() {
        let tax = Taxonomy::default();
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("U/Doc/Doc.html").touch().unwrap();
        let unit = dir.path().join("U");
        assert!(is_relevant(&unit, &tax, PruneOrder::BeforePromotion).unwrap());
        assert!(is_relevant(&unit, &tax, PruneOrder::AfterPromotion).unwrap());
    }

    #[test]
    fn empty_unit_is_pruned() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("Empty").create_dir_all().unwrap();
        dir.child("Empty/.DS_Store").touch().unwrap();
        let r = prune_irrelevant(dir.path(), &Taxonomy::default(), PruneOrder::BeforePromotion).unwrap();
        assert_eq!(r.count(Action::Pruned), 1);
        assert!(!dir.path().join("Empty").exists());
    }

    #[test]
    fn never_leaves_everything() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("Empty").create_dir_all().unwrap();
        let r = prune_irrelevant(dir.path(), &Taxonomy::default(), PruneOrder::Never).unwrap();
        assert!(r.is_empty());
        assert!(dir.path().join("Empty").exists());
    }
}
