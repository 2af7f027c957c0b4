//! Directory index written at the root of the tree: JSON, and optionally an
//! HTML page of nested lists.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::config::Taxonomy;
use crate::fs_ops::io_error_with_help;
use crate::platform::atomic_write_mode;
use crate::report::{Action, Report};

const VCS_DIR: &str = ".git";

/// Node kind, derived from folder depth below the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    Course,
    Coursefolder,
    Images,
    File,
}

impl NodeKind {
    fn child_folder(self) -> NodeKind {
        match self {
            NodeKind::Directory => NodeKind::Course,
            NodeKind::Course => NodeKind::Coursefolder,
            _ => NodeKind::Images,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<IndexNode>>,
}

/// Build the index tree for `root`. The ignored metadata file, `.git` folders
/// and the root-level files named in `skip` (the index outputs) are left out.
pub fn build_index(root: &Path, taxonomy: &Taxonomy, skip: &[&str]) -> Result<IndexNode> {
    walk(root, NodeKind::Directory, taxonomy, skip)
}

fn walk(dir: &Path, kind: NodeKind, taxonomy: &Taxonomy, skip: &[&str]) -> Result<IndexNode> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error_with_help("list folder", dir))? {
        let entry = entry.map_err(io_error_with_help("read entry in", dir))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            if name != VCS_DIR {
                children.push(walk(&entry.path(), kind.child_folder(), taxonomy, &[])?);
            }
        } else if !taxonomy.is_ignored(&entry.file_name()) && !skip.contains(&name.as_str()) {
            children.push(IndexNode {
                kind: NodeKind::File,
                name,
                children: None,
            });
        }
    }
    children.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(IndexNode {
        kind,
        name: dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        children: Some(children),
    })
}

fn render_json(node: &IndexNode) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    node.serialize(&mut ser).context("serialize directory index")?;
    Ok(out)
}

const FOLDER_STYLE: &str = "font-size: 17px; font-weight: bold; list-style-type: disc; \
line-height: 40px; font-family: Arial, sans-serif; background-color: blue;";
const FILE_STYLE: &str = "font-size: 15px; font-weight: normal; list-style-type: circle; \
line-height: 37px; font-family: Arial, sans-serif; color: white; background-color: red; \
margin: 4px; padding-left: 10px;";

/// Nested `<ul>` lists; entries directly below the root all take the folder style.
fn render_list(node: &IndexNode, depth: usize, out: &mut String) {
    out.push_str("<ul>\n");
    for child in node.children.iter().flatten() {
        let style = if child.kind == NodeKind::File && depth > 0 {
            FILE_STYLE
        } else {
            FOLDER_STYLE
        };
        let name = html_escape::encode_text(&child.name);
        out.push_str(&format!("<li style=\"{style}\">{name}"));
        if child.children.is_some() {
            render_list(child, depth + 1, out);
        }
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n");
}

/// A complete page whose `<title>` is the file name minus its markup
/// extension, so title-based renaming leaves it where it is.
fn render_html(node: &IndexNode, html_file: &str, taxonomy: &Taxonomy) -> Vec<u8> {
    let title = match taxonomy.markup_extension(html_file) {
        Some(ext) => &html_file[..html_file.len() - ext.len() - 1],
        None => html_file,
    };
    let mut out = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n",
        html_escape::encode_text(title)
    );
    render_list(node, 0, &mut out);
    out.push_str("</body>\n</html>\n");
    out.into_bytes()
}

fn write_if_changed(target: &Path, bytes: &[u8], report: &mut Report) -> Result<()> {
    if fs::read(target).is_ok_and(|existing| existing == bytes) {
        debug!(path = %target.display(), "index unchanged");
        return Ok(());
    }
    atomic_write_mode(target, bytes, 0o644)?;
    report.record(Action::Written, target);
    Ok(())
}

/// Write `<root>/<index_file>` atomically, plus `<root>/<html_file>` when
/// given. An output that is already up to date is not rewritten.
pub fn write_index(root: &Path, taxonomy: &Taxonomy, index_file: &str, html_file: Option<&str>) -> Result<Report> {
    let mut report = Report::new();
    let skip: Vec<&str> = std::iter::once(index_file).chain(html_file).collect();
    let tree = build_index(root, taxonomy, &skip)?;
    write_if_changed(&root.join(index_file), &render_json(&tree)?, &mut report)?;
    if let Some(html_file) = html_file {
        let page = render_html(&tree, html_file, taxonomy);
        write_if_changed(&root.join(html_file), &page, &mut report)?;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn kinds_follow_depth() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("Course/Folder/img/deeper/pic.png").touch().unwrap();
        dir.child("Course/.DS_Store").touch().unwrap();
        dir.child(".git/HEAD").touch().unwrap();
        dir.child("data.json").touch().unwrap();

        let tree = build_index(dir.path(), &Taxonomy::default(), &["data.json"]).unwrap();
        assert_eq!(tree.kind, NodeKind::Directory);
        let top = tree.children.as_ref().unwrap();
        assert_eq!(top.len(), 1);
        let course = &top[0];
        assert_eq!(course.kind, NodeKind::Course);
        assert_eq!(course.children.as_ref().unwrap().len(), 1);
        let folder = &course.children.as_ref().unwrap()[0];
        assert_eq!(folder.kind, NodeKind::Coursefolder);
        let img = &folder.children.as_ref().unwrap()[0];
        assert_eq!(img.kind, NodeKind::Images);
        let deeper = &img.children.as_ref().unwrap()[0];
        assert_eq!(deeper.kind, NodeKind::Images);
        assert_eq!(deeper.children.as_ref().unwrap()[0].kind, NodeKind::File);
    }

    #[test]
    fn second_write_is_a_no_op() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("A/b.txt").touch().unwrap();
        let tax = Taxonomy::default();
        assert_eq!(write_index(dir.path(), &tax, "data.json", None).unwrap().count(Action::Written), 1);
        assert!(write_index(dir.path(), &tax, "data.json", None).unwrap().is_empty());
    }

    #[test]
    fn html_page_nests_lists_and_escapes_names() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("Course/Q&A <1>.html").touch().unwrap();
        dir.child("loose.txt").touch().unwrap();
        let tax = Taxonomy::default();
        let r = write_index(dir.path(), &tax, "data.json", Some("Courses.html")).unwrap();
        assert_eq!(r.count(Action::Written), 2);

        let page = std::fs::read_to_string(dir.path().join("Courses.html")).unwrap();
        assert!(page.contains("<title>Courses</title>"));
        assert!(page.contains("Q&amp;A &lt;1&gt;.html"));
        assert_eq!(page.matches("<ul>").count(), 2);
        assert!(page.contains(&format!("<li style=\"{FOLDER_STYLE}\">loose.txt</li>")));
        assert!(page.contains(&format!("<li style=\"{FILE_STYLE}\">Q&amp;A")));

        let tree = build_index(dir.path(), &tax, &["data.json", "Courses.html"]).unwrap();
        assert_eq!(tree.children.as_ref().unwrap().len(), 2);
        assert!(write_index(dir.path(), &tax, "data.json", Some("Courses.html")).unwrap().is_empty());
    }
}
