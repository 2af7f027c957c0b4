//! Marker-folder promotion: lift the finished deliverables of every marker
//! category up into the unit folder and drop the marker folder.

use anyhow::Result;
use std::path::Path;
use tracing::{debug, info};

use crate::config::Taxonomy;
use crate::fs_ops::{relocate_contents, remove_dir_if_present, unit_folders};
use crate::report::{Action, Report};

use super::{check_shutdown, is_interrupted};

/// For every unit and every marker, move `<unit>/<marker>/<completed>/*` into
/// `<unit>` (incoming entries win) and delete `<unit>/<marker>` afterwards.
///
/// A marker whose relocation fails keeps its folder so nothing is lost.
pub fn promote_completed(root: &Path, taxonomy: &Taxonomy) -> Result<Report> {
    let mut report = Report::new();
    for unit in unit_folders(root)? {
        for (marker, completed) in taxonomy.completed_paths(&unit) {
            check_shutdown()?;
            if !completed.is_dir() {
                debug!(path = %completed.display(), "no completed folder");
                continue;
            }
            info!("Moving contents of '{}' to '{}'", completed.display(), unit.display());
            if let Err(e) = relocate_contents(&completed, &unit, taxonomy, &mut report) {
                if is_interrupted(&e) {
                    return Err(e);
                }
                report.fail(&completed, &e);
                continue;
            }
            let marker_dir = unit.join(&marker);
            match remove_dir_if_present(&marker_dir) {
                Ok(true) => report.record(Action::Deleted, &marker_dir),
                Ok(false) => {}
                Err(e) => report.fail(&marker_dir, &e),
            }
        }
    }
    Ok(report)
}
