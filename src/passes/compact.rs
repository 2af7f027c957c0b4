//! Folder compaction: collapse chains of wrapper folders (folders holding no
//! files of their own) so that payload files sit as high as they can.
//!
//! Inside a unit, a wrapper chain `W/.../F` ending at the first file-bearing
//! folder `F` is flattened:
//! - into the unit itself, when the unit holds no files directly;
//! - into the chain head `W` otherwise.
//!
//! `F` is deleted once emptied. Intermediate wrappers are left empty for the
//! empty-folder sweep. The same rule then applies inside every file-bearing
//! folder, so nested chains collapse too, and a second run finds nothing to do.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::Taxonomy;
use crate::fs_ops::{has_direct_files, relocate_contents, remove_dir_if_present, subdirs, unit_folders};
use crate::report::{Action, Report};

use super::{check_shutdown, is_interrupted};

/// Compact every unit folder under `root`.
pub fn compact_units(root: &Path, taxonomy: &Taxonomy) -> Result<Report> {
    let mut report = Report::new();
    for unit in unit_folders(root)? {
        check_shutdown()?;
        if let Err(e) = collapse(&unit, true, taxonomy, &mut report) {
            if is_interrupted(&e) {
                return Err(e);
            }
            report.fail(&unit, &e);
        }
    }
    Ok(report)
}

/// Shallowest file-bearing folders strictly below `dir`. The search does not
/// descend into a folder once it holds files.
fn payload_folders(dir: &Path, taxonomy: &Taxonomy) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for child in subdirs(dir)? {
        if has_direct_files(&child, taxonomy)? {
            found.push(child);
        } else {
            found.extend(payload_folders(&child, taxonomy)?);
        }
    }
    Ok(found)
}

fn collapse(target: &Path, is_unit: bool, taxonomy: &Taxonomy, report: &mut Report) -> Result<()> {
    // Content lifted into `target` may bring new wrappers with it, so repeat
    // until a round moves nothing.
    loop {
        let mut changed = false;
        let target_has_files = has_direct_files(target, taxonomy)?;

        for head in subdirs(target)? {
            // An earlier relocation in this round may have replaced it.
            if !head.is_dir() || has_direct_files(&head, taxonomy)? {
                continue;
            }
            let payloads = payload_folders(&head, taxonomy)?;
            if payloads.is_empty() {
                continue;
            }
            let dest = if is_unit && !target_has_files { target } else { head.as_path() };
            debug!(head = %head.display(), dest = %dest.display(), count = payloads.len(), "collapsing wrapper chain");

            for payload in payloads {
                check_shutdown()?;
                if let Err(e) = relocate_contents(&payload, dest, taxonomy, report) {
                    if is_interrupted(&e) {
                        return Err(e);
                    }
                    report.fail(&payload, &e);
                    continue;
                }
                match remove_dir_if_present(&payload) {
                    Ok(true) => report.record(Action::Deleted, &payload),
                    Ok(false) => {}
                    Err(e) => report.fail(&payload, &e),
                }
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    for child in subdirs(target)? {
        if has_direct_files(&child, taxonomy)? {
            collapse(&child, false, taxonomy, report)?;
        }
    }
    Ok(())
}
