//! Archive expander: unzip every archive in place, then delete it.

use anyhow::Result;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::ZipArchive;

use crate::config::Taxonomy;
use crate::errors::TidyError;
use crate::fs_ops::{files_matching, io_error_with_help};
use crate::report::{Action, Report};

use super::check_shutdown;

/// Archives may contain archives; re-scan this many times at most.
const MAX_ROUNDS: usize = 8;

fn corrupt(archive: &Path, reason: impl ToString) -> anyhow::Error {
    TidyError::CorruptArchive {
        path: archive.to_path_buf(),
        reason: reason.to_string(),
    }
    .into()
}

/// Expand `archive` into `dest`. Entries that would land outside `dest` are
/// skipped and reported. Returns the number of files written.
pub fn expand_into(archive: &Path, dest: &Path, report: &mut Report) -> Result<usize> {
    let file = File::open(archive).map_err(io_error_with_help("open archive", archive))?;
    let mut zip = ZipArchive::new(file).map_err(|e| corrupt(archive, e))?;

    let mut written = 0;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| corrupt(archive, e))?;
        let Some(rel) = entry.enclosed_name() else {
            report.skip(archive, format!("entry '{}' escapes the archive folder", entry.name()));
            continue;
        };
        let out = dest.join(rel);
        if entry.is_dir() {
            fs::create_dir_all(&out).map_err(io_error_with_help("create folder", &out))?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).map_err(io_error_with_help("create folder", parent))?;
        }
        let mut target = File::create(&out).map_err(io_error_with_help("create file", &out))?;
        // Decompression and checksum failures surface as io errors from the entry reader.
        io::copy(&mut entry, &mut target).map_err(|e| corrupt(archive, e))?;
        written += 1;
    }
    Ok(written)
}

/// Expand every archive under `root` into its own folder and remove it.
/// Corrupt archives stay in place and are reported as skipped.
pub fn expand_archives(root: &Path, taxonomy: &Taxonomy) -> Result<Report> {
    let mut report = Report::new();
    let mut kept: HashSet<PathBuf> = HashSet::new();

    for round in 0..MAX_ROUNDS {
        let pending = files_matching(root, |p| taxonomy.is_archive(p) && !kept.contains(p));
        if pending.is_empty() {
            break;
        }
        debug!(round, count = pending.len(), "archives to expand");

        for archive in pending {
            check_shutdown()?;
            let Some(dest) = archive.parent() else {
                continue;
            };
            let name = archive.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            match expand_into(&archive, dest, &mut report) {
                Ok(files) => match fs::remove_file(&archive) {
                    Ok(()) => {
                        info!(files, "Unzipped '{name}'");
                        report.record(Action::Expanded, &archive);
                    }
                    Err(e) => {
                        report.fail(&archive, &io_error_with_help("remove archive", &archive)(e));
                        kept.insert(archive);
                    }
                },
                Err(e) => {
                    match e.downcast_ref::<TidyError>() {
                        Some(TidyError::CorruptArchive { reason, .. }) => report.skip(
                            &archive,
                            format!("'{name}' is not a zip file or it is corrupted ({reason})"),
                        ),
                        _ => report.fail(&archive, &e),
                    }
                    kept.insert(archive);
                }
            }
        }
    }
    Ok(report)
}
