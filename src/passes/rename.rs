//! Markup renaming passes:
//! - rename markup files after their `<title>`;
//! - strip a markup extension that ended up on a folder name;
//! - move markup files sitting directly in a unit into a same-named folder.

use anyhow::Result;
use scraper::{Html, Selector};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

use crate::config::Taxonomy;
use crate::errors::TidyError;
use crate::fs_ops::{depth_below, dirs_bottom_up, files_matching, io_error_with_help, move_entry, remove_existing};
use crate::report::{Action, Report};

use super::{check_shutdown, is_interrupted};

static TITLE: LazyLock<Option<Selector>> = LazyLock::new(|| Selector::parse("title").ok());

/// Characters that cannot appear in a file name on at least one target platform.
const FORBIDDEN: [char; 8] = ['/', '\\', ':', '*', '?', '<', '>', '|'];

/// Depth below the root at which loose documents are relocated: `root/unit/doc.html`.
const DOCUMENT_DEPTH: usize = 2;

/// Text of the first `<title>` element, whitespace-collapsed. `None` when the
/// element is missing or blank.
pub fn page_title(markup: &str) -> Option<String> {
    let selector = TITLE.as_ref()?;
    let doc = Html::parse_document(markup);
    let raw: String = doc.select(selector).next()?.text().collect();
    let title = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    (!title.is_empty()).then_some(title)
}

/// Replace every forbidden file-name character with `_`.
pub fn sanitize_title(title: &str) -> Cow<'_, str> {
    if title.contains(FORBIDDEN) {
        Cow::Owned(title.replace(FORBIDDEN, "_"))
    } else {
        Cow::Borrowed(title)
    }
}

/// Rename every markup file under `root` to `<sanitized title>.<ext>`.
///
/// Files without a usable title and renames onto an existing entry are
/// reported and skipped. A file already carrying its title is left alone.
pub fn rename_by_title(root: &Path, taxonomy: &Taxonomy) -> Result<Report> {
    let mut report = Report::new();
    let files = files_matching(root, |p| {
        p.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| taxonomy.markup_extension(n).is_some())
    });

    for file in files {
        check_shutdown()?;
        let (Some(parent), Some(name)) = (file.parent(), file.file_name().and_then(|n| n.to_str())) else {
            continue;
        };
        let Some(ext) = taxonomy.markup_extension(name) else {
            continue;
        };
        let bytes = match fs::read(&file) {
            Ok(b) => b,
            Err(e) => {
                report.fail(&file, &io_error_with_help("read", &file)(e));
                continue;
            }
        };
        let Some(title) = page_title(&String::from_utf8_lossy(&bytes)) else {
            report.refuse(&file, TidyError::MissingTitle(file.clone()).to_string());
            continue;
        };

        let new_name = format!("{}.{ext}", sanitize_title(&title));
        if new_name == name {
            debug!(path = %file.display(), "already named after its title");
            continue;
        }
        let dest = parent.join(&new_name);
        if fs::symlink_metadata(&dest).is_ok() {
            let collision = TidyError::RenameCollision { src: file.clone(), dest };
            report.refuse(&file, collision.to_string());
            continue;
        }
        match fs::rename(&file, &dest) {
            Ok(()) => report.record_move(Action::Renamed, &file, &dest),
            Err(e) => report.fail(&file, &io_error_with_help("rename", &file)(e)),
        }
    }
    Ok(report)
}

/// Rename every folder named like `<name>.<markup ext>` to `<name>` (all
/// trailing markup extensions go), deepest first. An existing `<name>` is a per-item collision.
pub fn strip_dir_suffix(root: &Path, taxonomy: &Taxonomy) -> Result<Report> {
    let mut report = Report::new();
    for dir in dirs_bottom_up(root) {
        check_shutdown()?;
        let (Some(parent), Some(name)) = (dir.parent(), dir.file_name().and_then(|n| n.to_str())) else {
            continue;
        };
        let Some(stem) = folder_stem(name, taxonomy) else {
            continue;
        };
        let dest = parent.join(stem);
        if fs::symlink_metadata(&dest).is_ok() {
            let collision = TidyError::RenameCollision { src: dir.clone(), dest };
            report.refuse(&dir, collision.to_string());
            continue;
        }
        match fs::rename(&dir, &dest) {
            Ok(()) => report.record_move(Action::Renamed, &dir, &dest),
            Err(e) => report.fail(&dir, &io_error_with_help("rename folder", &dir)(e)),
        }
    }
    Ok(report)
}

/// Move every markup file lying directly in a unit folder into
/// `<unit>/<stem>/<file>`, creating the folder when needed. An existing file
/// at the destination is replaced.
pub fn relocate_documents(root: &Path, taxonomy: &Taxonomy) -> Result<Report> {
    let mut report = Report::new();
    let docs = files_matching(root, |p| {
        depth_below(root, p) == Some(DOCUMENT_DEPTH)
            && p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| taxonomy.markup_extension(n).is_some())
    });

    for doc in docs {
        check_shutdown()?;
        if let Err(e) = relocate_document(&doc, taxonomy, &mut report) {
            if is_interrupted(&e) {
                return Err(e);
            }
            report.fail(&doc, &e);
        }
    }
    Ok(report)
}

/// Folder name for a loose document: its name with every trailing markup
/// extension removed, so `index.html.html` lands in `index/`. `None` when
/// nothing is left.
fn folder_stem<'a>(name: &'a str, taxonomy: &Taxonomy) -> Option<&'a str> {
    let mut stem = name;
    while let Some(ext) = taxonomy.markup_extension(stem) {
        let shorter = &stem[..stem.len() - ext.len() - 1];
        if shorter.is_empty() {
            break;
        }
        stem = shorter;
    }
    (stem != name).then_some(stem)
}

fn relocate_document(doc: &Path, taxonomy: &Taxonomy, report: &mut Report) -> Result<()> {
    let (Some(unit), Some(name)) = (doc.parent(), doc.file_name().and_then(|n| n.to_str())) else {
        return Ok(());
    };
    let Some(stem) = folder_stem(name, taxonomy) else {
        return Ok(());
    };
    let folder = unit.join(stem);
    fs::create_dir_all(&folder).map_err(io_error_with_help("create folder", &folder))?;
    let dest = folder.join(name);
    if fs::symlink_metadata(&dest).is_ok() {
        remove_existing(&dest)?;
    }
    move_entry(doc, &dest)?;
    report.record_move(Action::Moved, doc, &dest);
    Ok(())
}
