use assert_fs::prelude::*;
use assert_fs::TempDir;

use course_tidy::passes::rename::{rename_by_title, strip_dir_suffix};
use course_tidy::{Action, Taxonomy};

fn page(title: &str) -> String {
    format!("<!DOCTYPE html><html><head><title>{title}</title></head><body><p>body</p></body></html>")
}

#[test]
fn file_is_renamed_after_its_sanitized_title() {
    let root = TempDir::new().unwrap();
    root.child("U/x.html").write_str(&page("  Unit 1: Cells/Tissues? ")).unwrap();
    root.child("U/y.htm").write_str(&page("Quiz")).unwrap();

    let report = rename_by_title(root.path(), &Taxonomy::default()).unwrap();

    assert!(root.path().join("U/Unit 1_ Cells_Tissues_.html").exists());
    assert!(root.path().join("U/Quiz.htm").exists());
    assert_eq!(report.count(Action::Renamed), 2);
}

#[test]
fn collision_keeps_the_second_file_and_reports_it() {
    let root = TempDir::new().unwrap();
    root.child("U/a.html").write_str(&page("Same")).unwrap();
    root.child("U/b.html").write_str(&page("Same")).unwrap();

    let report = rename_by_title(root.path(), &Taxonomy::default()).unwrap();

    assert!(root.path().join("U/Same.html").exists());
    assert!(!root.path().join("U/a.html").exists());
    assert!(root.path().join("U/b.html").exists());
    assert_eq!(report.count(Action::Renamed), 1);
    assert_eq!(report.count(Action::Skipped), 1);
    assert!(report.paths(Action::Skipped).any(|p| p.ends_with("b.html")));
}

#[test]
fn missing_title_leaves_the_file() {
    let root = TempDir::new().unwrap();
    root.child("U/untitled.html").write_str("<html><body>no title</body></html>").unwrap();
    root.child("U/blank.html").write_str(&page("   ")).unwrap();

    let report = rename_by_title(root.path(), &Taxonomy::default()).unwrap();

    assert!(root.path().join("U/untitled.html").exists());
    assert!(root.path().join("U/blank.html").exists());
    assert_eq!(report.count(Action::Skipped), 2);
    assert_eq!(report.changes(), 0);
}

#[test]
fn invalid_utf8_is_decoded_lossily() {
    let root = TempDir::new().unwrap();
    let mut bytes = b"<html><head><title>Caf".to_vec();
    bytes.extend_from_slice(&[0xe9, 0xff]);
    bytes.extend_from_slice(b" Menu</title></head></html>");
    root.child("U/menu.html").write_binary(&bytes).unwrap();

    let report = rename_by_title(root.path(), &Taxonomy::default()).unwrap();

    assert_eq!(report.count(Action::Renamed), 1);
    assert!(!root.path().join("U/menu.html").exists());
}

#[test]
fn renaming_twice_is_a_no_op() {
    let root = TempDir::new().unwrap();
    root.child("U/x.html").write_str(&page("Stable")).unwrap();

    rename_by_title(root.path(), &Taxonomy::default()).unwrap();
    let again = rename_by_title(root.path(), &Taxonomy::default()).unwrap();

    assert!(again.is_empty());
    assert!(root.path().join("U/Stable.html").exists());
}

#[test]
fn directory_suffixes_are_stripped_bottom_up() {
    let root = TempDir::new().unwrap();
    root.child("U/Outer.html/Inner.htm/f.txt").touch().unwrap();

    let report = strip_dir_suffix(root.path(), &Taxonomy::default()).unwrap();

    assert!(root.path().join("U/Outer/Inner/f.txt").exists());
    assert_eq!(report.count(Action::Renamed), 2);
}
