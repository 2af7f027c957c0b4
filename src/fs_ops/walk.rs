//! Read-only tree queries.
//!
//! Passes collect their targets with these helpers before mutating anything,
//! so no walk ever iterates a directory that is being rewritten underneath it.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Taxonomy;

use super::helpers::io_error_with_help;

/// Immediate child folders of `dir`, sorted by name. Symlinks are not followed.
pub fn subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error_with_help("list folder", dir))? {
        let entry = entry.map_err(io_error_with_help("read entry in", dir))?;
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            out.push(entry.path());
        }
    }
    out.sort();
    Ok(out)
}

/// Unit folders: the immediate child folders of the root.
pub fn unit_folders(root: &Path) -> Result<Vec<PathBuf>> {
    subdirs(root)
}

/// True when `dir` itself holds at least one non-folder entry other than the
/// ignored metadata file.
pub fn has_direct_files(dir: &Path, taxonomy: &Taxonomy) -> Result<bool> {
    for entry in fs::read_dir(dir).map_err(io_error_with_help("list folder", dir))? {
        let entry = entry.map_err(io_error_with_help("read entry in", dir))?;
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir && !taxonomy.is_ignored(&entry.file_name()) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// True when any folder at or below `dir` holds a payload file.
pub fn holds_files(dir: &Path, taxonomy: &Taxonomy) -> bool {
    WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .any(|e| !e.file_type().is_dir() && !taxonomy.is_ignored(e.file_name()))
}

/// Every folder strictly below `root`, children listed before their parents.
pub fn dirs_bottom_up(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .contents_first(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .collect()
}

/// Every regular file below `root` accepted by `keep`, in walk order.
pub fn files_matching(root: &Path, mut keep: impl FnMut(&Path) -> bool) -> Vec<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| keep(p))
        .collect()
}

/// Number of path components between `root` and `path` (`root/a` is 1).
pub fn depth_below(root: &Path, path: &Path) -> Option<usize> {
    path.strip_prefix(root).ok().map(|rel| rel.components().count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn metadata_file_is_not_payload() {
        let tax = Taxonomy::default();
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child(".DS_Store").touch().unwrap();
        dir.child("sub").create_dir_all().unwrap();
        assert!(!has_direct_files(dir.path(), &tax).unwrap());
        assert!(!holds_files(dir.path(), &tax));

        dir.child("sub/page.html").touch().unwrap();
        assert!(!has_direct_files(dir.path(), &tax).unwrap());
        assert!(holds_files(dir.path(), &tax));
    }

    #[test]
    fn bottom_up_lists_children_first() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("a/b/c").create_dir_all().unwrap();
        let dirs = dirs_bottom_up(dir.path());
        let pos = |s: &str| dirs.iter().position(|p| p.ends_with(s)).unwrap();
        assert!(pos("a/b/c") < pos("a/b"));
        assert!(pos("a/b") < pos("a"));
        assert!(!dirs.contains(&dir.path().to_path_buf()));
    }

    #[test]
    fn depth_counts_components() {
        let root = Path::new("/r");
        assert_eq!(depth_below(root, Path::new("/r/unit/doc.html")), Some(2));
        assert_eq!(depth_below(root, Path::new("/elsewhere")), None);
    }
}
