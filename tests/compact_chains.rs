use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::fs;
use std::path::PathBuf;

use course_tidy::passes::compact::compact_units;
use course_tidy::passes::sweep::sweep_empty;
use course_tidy::{Action, Taxonomy};

fn compact_and_sweep(root: &std::path::Path) {
    compact_units(root, &Taxonomy::default()).unwrap();
    sweep_empty(root).unwrap();
}

fn chain(depth: usize) -> PathBuf {
    (1..=depth).map(|i| format!("W{i}")).collect()
}

#[test]
fn chains_of_any_length_collapse_into_a_bare_unit() {
    for n in 1..=5 {
        let root = TempDir::new().unwrap();
        let payload = PathBuf::from("U").join(chain(n)).join("F");
        root.child(payload.join("x.txt")).write_str("x").unwrap();
        root.child(payload.join("img/pic.png")).touch().unwrap();

        compact_and_sweep(root.path());

        root.child("U/x.txt").assert("x");
        assert!(root.path().join("U/img/pic.png").exists(), "n={n}");
        let left: Vec<_> = fs::read_dir(root.path().join("U"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(left.len(), 2, "n={n}: {left:?}");
    }
}

#[test]
fn unit_with_own_files_collapses_into_chain_head() {
    let root = TempDir::new().unwrap();
    root.child("U/own.txt").touch().unwrap();
    root.child("U/W1/W2/W3/F/x.txt").touch().unwrap();

    compact_and_sweep(root.path());

    assert!(root.path().join("U/own.txt").exists());
    assert!(root.path().join("U/W1/x.txt").exists());
    assert!(!root.path().join("U/W1/W2").exists());
}

#[test]
fn file_bearing_folders_are_never_emptied() {
    let root = TempDir::new().unwrap();
    root.child("U/F/a.txt").touch().unwrap();
    root.child("U/F/W/G/b.txt").touch().unwrap();

    compact_and_sweep(root.path());

    assert!(root.path().join("U/F/a.txt").exists());
    assert!(root.path().join("U/F/W/b.txt").exists());
    assert!(!root.path().join("U/F/W/G").exists());
}

#[test]
fn second_compaction_changes_nothing() {
    let root = TempDir::new().unwrap();
    root.child("U/W1/W2/F/x.txt").touch().unwrap();
    root.child("U/W1/W2/F/sub/W/G/y.txt").touch().unwrap();
    root.child("V/own.txt").touch().unwrap();
    root.child("V/A/B/C/z.txt").touch().unwrap();

    compact_and_sweep(root.path());
    let again = compact_units(root.path(), &Taxonomy::default()).unwrap();
    let swept = sweep_empty(root.path()).unwrap();

    assert_eq!(again.changes(), 0, "{:?}", again.events());
    assert!(swept.is_empty());
}

#[test]
fn metadata_file_does_not_make_a_folder_file_bearing() {
    let root = TempDir::new().unwrap();
    root.child("U/W/.DS_Store").touch().unwrap();
    root.child("U/W/F/x.txt").touch().unwrap();

    let report = compact_units(root.path(), &Taxonomy::default()).unwrap();

    assert!(report.count(Action::Moved) >= 1);
    assert!(root.path().join("U/x.txt").exists());
}
